use serde::{Deserialize, Serialize};

pub const DEFAULT_FETCH_LIMIT: usize = 25;

/// Keyword and length rules a video has to satisfy to trigger a notification.
///
/// Every field is optional; an empty list or a zero length means the rule is off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub title_include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub title_exclude: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description_include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub description_exclude: Vec<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub min_length_seconds: u64,
    #[serde(skip_serializing_if = "is_zero")]
    pub max_length_seconds: u64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

fn default_limit() -> usize {
    DEFAULT_FETCH_LIMIT
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRewrite {
    pub pattern: String,
    pub replacement: String,
}

/// A monitored channel. `url` doubles as the key into the seen-state document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feed {
    pub url: String,
    #[serde(default)]
    pub criteria: Criteria,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_rewrite: Option<UrlRewrite>,
}

impl Feed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            criteria: Criteria::default(),
            limit: DEFAULT_FETCH_LIMIT,
            url_rewrite: None,
        }
    }

    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_defaults_when_fields_missing() {
        let feed: Feed =
            serde_json::from_str(r#"{"url": "https://www.youtube.com/@chan"}"#).unwrap();
        assert_eq!(feed.limit, DEFAULT_FETCH_LIMIT);
        assert_eq!(feed.criteria, Criteria::default());
        assert!(feed.url_rewrite.is_none());
    }

    #[test]
    fn test_criteria_reads_legacy_document() {
        let json = r#"{
            "url": "https://www.youtube.com/@chan",
            "criteria": {"title_include": ["launch"], "min_length_seconds": 60}
        }"#;
        let feed: Feed = serde_json::from_str(json).unwrap();
        assert_eq!(feed.criteria.title_include, vec!["launch"]);
        assert_eq!(feed.criteria.min_length_seconds, 60);
        assert_eq!(feed.criteria.max_length_seconds, 0);
    }

    #[test]
    fn test_unset_rules_are_not_serialized() {
        let feed = Feed::new("https://www.youtube.com/@chan");
        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["criteria"], serde_json::json!({}));
        assert!(json.get("url_rewrite").is_none());
    }
}
