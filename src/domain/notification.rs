use std::fmt;

use chrono::NaiveDate;

/// Upload date used to order notifications. `Unknown` sorts after every real date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateCode {
    Known(NaiveDate),
    Unknown,
}

impl DateCode {
    pub const UNKNOWN: &'static str = "unknown";

    /// Parses an 8-digit `YYYYMMDD` code.
    pub fn parse(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() != 8 || !code.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(code, "%Y%m%d")
            .ok()
            .map(DateCode::Known)
    }

    /// Like [`parse`](Self::parse) but falls back to [`DateCode::Unknown`].
    pub fn parse_or_unknown(code: Option<&str>) -> Self {
        code.and_then(Self::parse).unwrap_or(DateCode::Unknown)
    }
}

impl fmt::Display for DateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateCode::Known(date) => write!(f, "{}", date.format("%Y%m%d")),
            DateCode::Unknown => f.write_str(Self::UNKNOWN),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    pub sort_key: DateCode,
    pub text: String,
    pub dry_run: bool,
}

impl PendingNotification {
    pub fn new(sort_key: DateCode, text: impl Into<String>, dry_run: bool) -> Self {
        Self {
            sort_key,
            text: text.into(),
            dry_run,
        }
    }

    /// Message body sent for a matched video.
    pub fn message_text(channel: &str, title: &str, url: &str) -> String {
        format!("{} :: {}\n\n{}", channel, title, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_code() {
        let code = DateCode::parse("20240105").unwrap();
        assert_eq!(code.to_string(), "20240105");
    }

    #[test]
    fn test_parse_rejects_malformed_codes() {
        assert!(DateCode::parse("2024015").is_none());
        assert!(DateCode::parse("2024-01-05").is_none());
        assert!(DateCode::parse("20241345").is_none());
        assert!(DateCode::parse("NA").is_none());
    }

    #[test]
    fn test_unknown_sorts_last() {
        let mut codes = vec![
            DateCode::Unknown,
            DateCode::parse("20240105").unwrap(),
            DateCode::parse("20231231").unwrap(),
        ];
        codes.sort();
        assert_eq!(codes[0].to_string(), "20231231");
        assert_eq!(codes[1].to_string(), "20240105");
        assert_eq!(codes[2], DateCode::Unknown);
    }

    #[test]
    fn test_message_text_shape() {
        let text = PendingNotification::message_text("Chan", "Launch Day", "https://x/1");
        assert_eq!(text, "Chan :: Launch Day\n\nhttps://x/1");
    }
}
