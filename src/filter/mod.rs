//! Criteria evaluation.
//!
//! [`matches`] is the fast path used while scanning; [`explain_rejection`]
//! reports every rule an item breaks, for logging and `preview` output.
//! Both agree: an item matches exactly when there are no rejections.

use std::fmt;

use crate::domain::{Criteria, Item};

const MATCHED: &str = "Matched";

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TitleMissing(Vec<String>),
    TitleExcluded(Vec<String>),
    DescriptionMissing(Vec<String>),
    DescriptionExcluded(Vec<String>),
    TooShort { duration: u64, min: u64 },
    TooLong { duration: u64, max: u64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TitleMissing(words) => write!(f, "Title missing: {}", words.join(", ")),
            Rejection::TitleExcluded(words) => write!(f, "Title excluded: {}", words.join(", ")),
            Rejection::DescriptionMissing(words) => {
                write!(f, "Description missing: {}", words.join(", "))
            }
            Rejection::DescriptionExcluded(words) => {
                write!(f, "Description excluded: {}", words.join(", "))
            }
            Rejection::TooShort { duration, .. } => write!(f, "Too short ({}s)", duration),
            Rejection::TooLong { duration, .. } => write!(f, "Too long ({}s)", duration),
        }
    }
}

pub fn matches(item: &Item, criteria: &Criteria) -> bool {
    let title = item.title.to_lowercase();
    let description = item.description.to_lowercase();

    include_ok(&title, &criteria.title_include)
        && exclude_hits(&title, &criteria.title_exclude).is_empty()
        && include_ok(&description, &criteria.description_include)
        && exclude_hits(&description, &criteria.description_exclude).is_empty()
        && !too_short(item.duration, criteria.min_length_seconds)
        && !too_long(item.duration, criteria.max_length_seconds)
}

/// Every rule `item` fails, in rule order. Empty when the item matches.
pub fn explain_rejection(item: &Item, criteria: &Criteria) -> Vec<Rejection> {
    let title = item.title.to_lowercase();
    let description = item.description.to_lowercase();
    let mut reasons = Vec::new();

    if !include_ok(&title, &criteria.title_include) {
        reasons.push(Rejection::TitleMissing(active(&criteria.title_include)));
    }
    let hits = exclude_hits(&title, &criteria.title_exclude);
    if !hits.is_empty() {
        reasons.push(Rejection::TitleExcluded(hits));
    }
    if !include_ok(&description, &criteria.description_include) {
        reasons.push(Rejection::DescriptionMissing(active(
            &criteria.description_include,
        )));
    }
    let hits = exclude_hits(&description, &criteria.description_exclude);
    if !hits.is_empty() {
        reasons.push(Rejection::DescriptionExcluded(hits));
    }
    if too_short(item.duration, criteria.min_length_seconds) {
        reasons.push(Rejection::TooShort {
            duration: item.duration,
            min: criteria.min_length_seconds,
        });
    }
    if too_long(item.duration, criteria.max_length_seconds) {
        reasons.push(Rejection::TooLong {
            duration: item.duration,
            max: criteria.max_length_seconds,
        });
    }

    reasons
}

/// Human readable verdict: the joined rejection reasons, or `Matched`.
pub fn explain(item: &Item, criteria: &Criteria) -> String {
    let reasons = explain_rejection(item, criteria);
    if reasons.is_empty() {
        return MATCHED.to_string();
    }
    reasons
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn active(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

/// True when the list is empty or any keyword appears in `haystack` (already lowercased).
fn include_ok(haystack: &str, keywords: &[String]) -> bool {
    let keywords = active(keywords);
    keywords.is_empty()
        || keywords
            .iter()
            .any(|k| haystack.contains(&k.to_lowercase()))
}

fn exclude_hits(haystack: &str, keywords: &[String]) -> Vec<String> {
    active(keywords)
        .into_iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .collect()
}

fn too_short(duration: u64, min: u64) -> bool {
    min > 0 && duration < min
}

fn too_long(duration: u64, max: u64) -> bool {
    max > 0 && duration > max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria() -> Criteria {
        Criteria::default()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_no_rules_always_matches() {
        let item = Item::new("a", "Anything");
        assert!(matches(&item, &criteria()));
        assert!(explain_rejection(&item, &criteria()).is_empty());
        assert_eq!(explain(&item, &criteria()), "Matched");
    }

    #[test]
    fn test_title_include_is_case_insensitive_substring() {
        let c = Criteria {
            title_include: words(&["LAUNCH"]),
            ..criteria()
        };
        assert!(matches(&Item::new("a", "Relaunched today"), &c));
        assert!(!matches(&Item::new("b", "Random"), &c));
    }

    #[test]
    fn test_title_exclude() {
        let c = Criteria {
            title_exclude: words(&["#shorts", "live"]),
            ..criteria()
        };
        let item = Item::new("a", "LIVE now #Shorts");
        assert!(!matches(&item, &c));
        assert_eq!(
            explain_rejection(&item, &c),
            vec![Rejection::TitleExcluded(words(&["#shorts", "live"]))]
        );
    }

    #[test]
    fn test_description_rules() {
        let c = Criteria {
            description_include: words(&["tutorial"]),
            description_exclude: words(&["sponsored"]),
            ..criteria()
        };
        let ok = Item::new("a", "x").with_description("A Tutorial on things");
        let missing = Item::new("b", "x").with_description("Vlog");
        let excluded = Item::new("c", "x").with_description("Tutorial, sponsored");
        assert!(matches(&ok, &c));
        assert!(!matches(&missing, &c));
        assert!(!matches(&excluded, &c));
    }

    #[test]
    fn test_length_bounds() {
        let c = Criteria {
            min_length_seconds: 60,
            max_length_seconds: 600,
            ..criteria()
        };
        assert!(!matches(&Item::new("a", "x").with_duration(59), &c));
        assert!(matches(&Item::new("b", "x").with_duration(60), &c));
        assert!(matches(&Item::new("c", "x").with_duration(600), &c));
        assert!(!matches(&Item::new("d", "x").with_duration(601), &c));
    }

    #[test]
    fn test_unknown_duration_fails_min_length() {
        let c = Criteria {
            min_length_seconds: 1,
            ..criteria()
        };
        assert!(!matches(&Item::new("a", "x"), &c));
    }

    #[test]
    fn test_explain_reports_every_failing_rule() {
        let c = Criteria {
            title_include: words(&["launch"]),
            description_exclude: words(&["ad"]),
            min_length_seconds: 60,
            ..criteria()
        };
        let item = Item::new("a", "Random")
            .with_description("an ad")
            .with_duration(30);
        let reasons = explain_rejection(&item, &c);
        assert_eq!(reasons.len(), 3);
        assert_eq!(
            explain(&item, &c),
            "Title missing: launch; Description excluded: ad; Too short (30s)"
        );
    }

    #[test]
    fn test_length_reasons_show_duration() {
        let c = Criteria {
            max_length_seconds: 600,
            ..criteria()
        };
        let item = Item::new("a", "x").with_duration(601);
        assert_eq!(explain(&item, &c), "Too long (601s)");
    }

    #[test]
    fn test_blank_keywords_are_ignored() {
        let c = Criteria {
            title_include: words(&["", "  "]),
            title_exclude: words(&[""]),
            ..criteria()
        };
        assert!(matches(&Item::new("a", "Anything"), &c));
    }

    #[test]
    fn test_matches_agrees_with_explain() {
        let rule_sets = vec![
            criteria(),
            Criteria {
                title_include: words(&["launch"]),
                min_length_seconds: 60,
                ..criteria()
            },
            Criteria {
                title_exclude: words(&["recap"]),
                max_length_seconds: 100,
                ..criteria()
            },
            Criteria {
                description_include: words(&["rocket"]),
                ..criteria()
            },
        ];
        let items = vec![
            Item::new("a", "Launch Day").with_duration(120),
            Item::new("b", "Random").with_duration(90),
            Item::new("c", "launch recap").with_duration(30),
            Item::new("d", "").with_description("Rocket science"),
        ];
        for c in &rule_sets {
            for item in &items {
                assert_eq!(
                    matches(item, c),
                    explain_rejection(item, c).is_empty(),
                    "disagreement for {:?} under {:?}",
                    item.id,
                    c
                );
            }
        }
    }
}
