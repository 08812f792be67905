use crate::domain::feed::{Criteria, Feed, UrlRewrite};

/// Keyword list inside [`Criteria`] an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum KeywordField {
    TitleInclude,
    TitleExclude,
    DescriptionInclude,
    DescriptionExclude,
}

impl KeywordField {
    fn list_mut(self, criteria: &mut Criteria) -> &mut Vec<String> {
        match self {
            KeywordField::TitleInclude => &mut criteria.title_include,
            KeywordField::TitleExclude => &mut criteria.title_exclude,
            KeywordField::DescriptionInclude => &mut criteria.description_include,
            KeywordField::DescriptionExclude => &mut criteria.description_exclude,
        }
    }
}

/// One configuration change to a feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedEdit {
    SetKeywords(KeywordField, Vec<String>),
    AppendKeywords(KeywordField, Vec<String>),
    ClearKeywords(KeywordField),
    /// Zero turns the rule off.
    SetMinLength(u64),
    /// Zero turns the rule off.
    SetMaxLength(u64),
    SetLimit(usize),
    SetRewrite(UrlRewrite),
    ClearRewrite,
}

impl Feed {
    /// Returns a copy of this feed with `edits` applied in order.
    pub fn apply(&self, edits: &[FeedEdit]) -> Feed {
        let mut feed = self.clone();
        for edit in edits {
            feed.apply_one(edit);
        }
        feed
    }

    fn apply_one(&mut self, edit: &FeedEdit) {
        match edit {
            FeedEdit::SetKeywords(field, words) => {
                *field.list_mut(&mut self.criteria) = normalize_keywords(words);
            }
            FeedEdit::AppendKeywords(field, words) => {
                let list = field.list_mut(&mut self.criteria);
                for word in normalize_keywords(words) {
                    if !list.contains(&word) {
                        list.push(word);
                    }
                }
            }
            FeedEdit::ClearKeywords(field) => field.list_mut(&mut self.criteria).clear(),
            FeedEdit::SetMinLength(secs) => self.criteria.min_length_seconds = *secs,
            FeedEdit::SetMaxLength(secs) => self.criteria.max_length_seconds = *secs,
            FeedEdit::SetLimit(limit) => self.limit = (*limit).max(1),
            FeedEdit::SetRewrite(rewrite) => self.url_rewrite = Some(rewrite.clone()),
            FeedEdit::ClearRewrite => self.url_rewrite = None,
        }
    }
}

/// Splits comma separated input, trims, and drops empty keywords.
pub fn normalize_keywords(words: &[String]) -> Vec<String> {
    words
        .iter()
        .flat_map(|w| w.split(','))
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}
