pub mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::Result;
use crate::config::PresetLibrary;
use crate::domain::{FeedEdit, KeywordField};

#[derive(Parser)]
#[command(name = "reelwatch")]
#[command(about = "Watch video channels and send Telegram notifications for new matches", long_about = None)]
pub struct Cli {
    /// Directory holding config, channel list, seen-state and presets
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Hide "already notified" and "skipped" messages
    #[arg(long, global = true)]
    pub suppress_skip_msgs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan all channels and send notifications
    Run {
        /// Repeat every N hours (0 runs once)
        #[arg(long, default_value_t = 0.0)]
        interval_hours: f64,
    },
    /// Scan all channels and print notifications instead of sending them
    DryRun {
        /// Repeat every N hours (0 runs once)
        #[arg(long, default_value_t = 0.0)]
        interval_hours: f64,

        /// Record printed videos as notified
        #[arg(long)]
        mark_seen: bool,
    },
    /// Add a channel
    Add {
        /// Channel URL
        url: String,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },
    /// Change a channel's filters
    Edit {
        /// Channel URL
        url: String,

        #[command(flatten)]
        criteria: CriteriaArgs,
    },
    /// Remove a channel
    Remove {
        /// Channel URL
        url: String,
    },
    /// List channels and their filters
    List,
    /// Fetch recent videos and show which would match
    Preview {
        /// Channel URL
        url: String,

        /// Number of recent videos to check
        #[arg(long, default_value_t = 15)]
        count: usize,

        /// Filter changes to try without saving them
        #[command(flatten)]
        criteria: CriteriaArgs,
    },
    /// Manage named URL rewrite presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Set Telegram credentials
    Config {
        /// Bot token from @BotFather
        #[arg(long)]
        bot_token: Option<String>,

        /// Target chat (@username or numeric ID)
        #[arg(long)]
        chat_id: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PresetAction {
    /// Add or replace a preset
    Add {
        name: String,
        pattern: String,
        replacement: String,
    },
    /// Remove a preset
    Remove { name: String },
    /// List presets
    List,
}

/// Filter flags shared by `add`, `edit` and `preview`.
#[derive(Args, Debug, Default, Clone)]
pub struct CriteriaArgs {
    /// Require one of these words in the title (repeatable, comma separated)
    #[arg(long, value_name = "KEYWORD")]
    pub title_include: Vec<String>,

    /// Reject titles containing any of these words
    #[arg(long, value_name = "KEYWORD")]
    pub title_exclude: Vec<String>,

    /// Require one of these words in the description
    #[arg(long, value_name = "KEYWORD")]
    pub description_include: Vec<String>,

    /// Reject descriptions containing any of these words
    #[arg(long, value_name = "KEYWORD")]
    pub description_exclude: Vec<String>,

    /// Empty a keyword list before adding to it
    #[arg(long, value_enum, value_name = "FIELD")]
    pub clear: Vec<KeywordField>,

    /// Minimum length in seconds (0 removes the rule)
    #[arg(long, value_name = "SECONDS")]
    pub min_length: Option<u64>,

    /// Maximum length in seconds (0 removes the rule)
    #[arg(long, value_name = "SECONDS")]
    pub max_length: Option<u64>,

    /// Videos to request per scan
    #[arg(long)]
    pub limit: Option<usize>,

    /// Rewrite video URLs with a regex before sending
    #[arg(long, num_args = 2, value_names = ["PATTERN", "REPLACEMENT"], conflicts_with = "preset")]
    pub rewrite: Option<Vec<String>>,

    /// Use a saved rewrite preset
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Drop the URL rewrite
    #[arg(long, conflicts_with_all = ["rewrite", "preset"])]
    pub clear_rewrite: bool,
}

impl CriteriaArgs {
    /// Translates the flags into edits: clears first, then additions, then
    /// scalar settings.
    pub fn edits(&self, presets: &PresetLibrary) -> Result<Vec<FeedEdit>> {
        let mut edits: Vec<FeedEdit> = self
            .clear
            .iter()
            .map(|field| FeedEdit::ClearKeywords(*field))
            .collect();

        let lists = [
            (KeywordField::TitleInclude, &self.title_include),
            (KeywordField::TitleExclude, &self.title_exclude),
            (KeywordField::DescriptionInclude, &self.description_include),
            (KeywordField::DescriptionExclude, &self.description_exclude),
        ];
        for (field, words) in lists {
            if !words.is_empty() {
                edits.push(FeedEdit::AppendKeywords(field, words.clone()));
            }
        }

        if let Some(secs) = self.min_length {
            edits.push(FeedEdit::SetMinLength(secs));
        }
        if let Some(secs) = self.max_length {
            edits.push(FeedEdit::SetMaxLength(secs));
        }
        if let Some(limit) = self.limit {
            edits.push(FeedEdit::SetLimit(limit));
        }

        if let Some([pattern, replacement]) = self.rewrite.as_deref() {
            crate::rewrite::validate(pattern)?;
            edits.push(FeedEdit::SetRewrite(crate::domain::UrlRewrite {
                pattern: pattern.clone(),
                replacement: replacement.clone(),
            }));
        } else if let Some(ref name) = self.preset {
            edits.push(FeedEdit::SetRewrite(presets.get(name)?.clone()));
        } else if self.clear_rewrite {
            edits.push(FeedEdit::ClearRewrite);
        }

        Ok(edits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ReelwatchError;
    use crate::domain::UrlRewrite;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = parse(&["reelwatch", "--data-dir", "/tmp/rw"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/rw")));
    }

    #[test]
    fn test_dry_run_flags() {
        let cli = parse(&[
            "reelwatch",
            "dry-run",
            "--interval-hours",
            "1.5",
            "--mark-seen",
            "--suppress-skip-msgs",
        ]);
        assert!(cli.suppress_skip_msgs);
        match cli.command {
            Some(Commands::DryRun {
                interval_hours,
                mark_seen,
            }) => {
                assert_eq!(interval_hours, 1.5);
                assert!(mark_seen);
            }
            _ => panic!("expected dry-run"),
        }
    }

    #[test]
    fn test_add_flags_to_edits() {
        let cli = parse(&[
            "reelwatch",
            "add",
            "https://www.youtube.com/@rockets",
            "--title-include",
            "launch,static fire",
            "--clear",
            "title-exclude",
            "--min-length",
            "60",
            "--rewrite",
            "www\\.youtube\\.com",
            "youtu.be",
        ]);
        let Some(Commands::Add { criteria, .. }) = cli.command else {
            panic!("expected add");
        };
        let edits = criteria.edits(&PresetLibrary::default()).unwrap();
        assert_eq!(
            edits,
            vec![
                FeedEdit::ClearKeywords(KeywordField::TitleExclude),
                FeedEdit::AppendKeywords(
                    KeywordField::TitleInclude,
                    vec!["launch,static fire".to_string()]
                ),
                FeedEdit::SetMinLength(60),
                FeedEdit::SetRewrite(UrlRewrite {
                    pattern: "www\\.youtube\\.com".into(),
                    replacement: "youtu.be".into(),
                }),
            ]
        );
    }

    #[test]
    fn test_invalid_rewrite_flag_is_rejected() {
        let cli = parse(&["reelwatch", "edit", "u", "--rewrite", "(bad", "x"]);
        let Some(Commands::Edit { criteria, .. }) = cli.command else {
            panic!("expected edit");
        };
        assert!(matches!(
            criteria.edits(&PresetLibrary::default()),
            Err(ReelwatchError::Rewrite(_))
        ));
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let args = CriteriaArgs {
            preset: Some("nope".into()),
            ..Default::default()
        };
        assert!(matches!(
            args.edits(&PresetLibrary::default()),
            Err(ReelwatchError::PresetNotFound(_))
        ));
    }

    #[test]
    fn test_rewrite_and_preset_conflict() {
        assert!(Cli::try_parse_from([
            "reelwatch",
            "edit",
            "u",
            "--rewrite",
            "a",
            "b",
            "--preset",
            "p"
        ])
        .is_err());
    }
}
