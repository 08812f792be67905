use std::sync::Arc;

use url::Url;

use crate::app::{ReelwatchError, Result, RunContext};
use crate::cli::CriteriaArgs;
use crate::config::{PresetLibrary, Settings};
use crate::domain::{Criteria, Feed, UrlRewrite};
use crate::fetcher::Fetcher;
use crate::filter;
use crate::monitor::{Monitor, MonitorConfig};
use crate::notify::{DispatchPolicy, Dispatcher, TelegramTransport};
use crate::scanner::{oldest_first, ScanOptions, Scanner};
use crate::store::{FeedStore, JsonSeenStore};

/// `run` and `dry-run`.
pub async fn run_monitor(
    ctx: &RunContext,
    interval_hours: f64,
    options: ScanOptions,
) -> Result<()> {
    let dispatcher = if options.dry_run {
        Dispatcher::print_only()
    } else {
        let settings = Settings::load_or_prompt(&ctx.paths.config)?;
        let transport =
            TelegramTransport::new(&settings.telegram_bot_token, &settings.telegram_chat_id)?;
        Dispatcher::new(Arc::new(transport), DispatchPolicy::default())
    };

    let scanner = Scanner::new(
        ctx.fetcher.clone(),
        Arc::new(JsonSeenStore::new(&ctx.paths.seen)),
        options,
    );
    let config = MonitorConfig::default().with_interval_hours(interval_hours);
    let mut monitor = Monitor::new(
        FeedStore::new(&ctx.paths.channels),
        scanner,
        dispatcher,
        config,
    );
    monitor.install_signal_handlers();
    monitor.run().await
}

pub fn add_feed(ctx: &RunContext, url: &str, criteria: &CriteriaArgs) -> Result<()> {
    Url::parse(url)?;
    let store = FeedStore::new(&ctx.paths.channels);

    if store.get(url)?.is_some() {
        println!("Feed already exists: {}", url);
        println!("Use `reelwatch edit {}` to change its filters", url);
        return Ok(());
    }

    let presets = PresetLibrary::load(&ctx.paths.presets)?;
    let feed = Feed::new(url).apply(&criteria.edits(&presets)?);
    store.upsert(feed.clone())?;

    println!("Added feed: {}", url);
    print_feed(&feed);
    Ok(())
}

pub fn edit_feed(ctx: &RunContext, url: &str, criteria: &CriteriaArgs) -> Result<()> {
    let store = FeedStore::new(&ctx.paths.channels);
    let feed = store
        .get(url)?
        .ok_or_else(|| ReelwatchError::FeedNotFound(url.to_string()))?;

    let presets = PresetLibrary::load(&ctx.paths.presets)?;
    let edits = criteria.edits(&presets)?;
    if edits.is_empty() {
        println!("Nothing to change");
        print_feed(&feed);
        return Ok(());
    }

    let edited = feed.apply(&edits);
    store.upsert(edited.clone())?;
    println!("Updated feed: {}", url);
    print_feed(&edited);
    Ok(())
}

pub fn remove_feed(ctx: &RunContext, url: &str) -> Result<()> {
    FeedStore::new(&ctx.paths.channels).remove(url)?;
    println!("Removed feed: {}", url);
    Ok(())
}

pub fn list_feeds(ctx: &RunContext) -> Result<()> {
    let feeds = FeedStore::new(&ctx.paths.channels).load()?;

    if feeds.is_empty() {
        println!("No feeds");
        return Ok(());
    }

    for feed in feeds {
        print_feed(&feed);
    }
    Ok(())
}

/// Fetches recent videos and prints the verdict for each, without touching
/// seen-state or sending anything.
pub async fn preview_feed(
    ctx: &RunContext,
    url: &str,
    count: usize,
    criteria: &CriteriaArgs,
) -> Result<()> {
    let store = FeedStore::new(&ctx.paths.channels);
    let base = store.get(url)?.unwrap_or_else(|| Feed::new(url));
    let presets = PresetLibrary::load(&ctx.paths.presets)?;
    let feed = base.apply(&criteria.edits(&presets)?);

    let fetched = ctx.fetcher.fetch(url, count).await?;
    if fetched.items.is_empty() {
        println!("No videos found");
        return Ok(());
    }

    println!(
        "Recent videos from {}:",
        fetched.channel.as_deref().unwrap_or(url)
    );
    for row in preview_rows(&feed.criteria, &fetched.items) {
        println!("{}", row);
    }
    Ok(())
}

fn preview_rows(criteria: &Criteria, items: &[crate::domain::Item]) -> Vec<String> {
    oldest_first(items.to_vec())
        .iter()
        .rev()
        .map(|item| {
            let duration = if item.duration > 0 {
                format!("{}s", item.duration)
            } else {
                "N/A".to_string()
            };
            format!(
                "{:<60} {:>7}  {}",
                truncate(item.display_title(), 60),
                duration,
                filter::explain(item, criteria)
            )
        })
        .collect()
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

pub fn add_preset(ctx: &RunContext, name: &str, pattern: &str, replacement: &str) -> Result<()> {
    let mut presets = PresetLibrary::load(&ctx.paths.presets)?;
    presets.insert(
        name,
        UrlRewrite {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        },
    )?;
    presets.save(&ctx.paths.presets)?;
    println!("Saved preset: {}", name);
    Ok(())
}

pub fn remove_preset(ctx: &RunContext, name: &str) -> Result<()> {
    let mut presets = PresetLibrary::load(&ctx.paths.presets)?;
    presets.remove(name)?;
    presets.save(&ctx.paths.presets)?;
    println!("Removed preset: {}", name);
    Ok(())
}

pub fn list_presets(ctx: &RunContext) -> Result<()> {
    let presets = PresetLibrary::load(&ctx.paths.presets)?;
    if presets.is_empty() {
        println!("No presets");
        return Ok(());
    }
    for (name, rule) in presets.iter() {
        println!("{}\n  s/{}/{}/", name, rule.pattern, rule.replacement);
    }
    Ok(())
}

/// `config`: flags overwrite, anything still missing is prompted for.
pub fn configure(
    ctx: &RunContext,
    bot_token: Option<String>,
    chat_id: Option<String>,
) -> Result<()> {
    let mut settings = Settings::load(&ctx.paths.config)?;
    let interactive = bot_token.is_none() && chat_id.is_none();

    if interactive {
        settings = Settings::default();
    }
    if let Some(token) = bot_token {
        settings.telegram_bot_token = token;
    }
    if let Some(chat) = chat_id {
        settings.telegram_chat_id = chat;
    }

    if !settings.is_complete() {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        settings = Settings::prompt(&mut stdin.lock(), &mut stdout.lock(), settings)?;
    }

    settings.save(&ctx.paths.config)?;
    println!("Configuration updated.");
    Ok(())
}

fn print_feed(feed: &Feed) {
    println!("{}", feed.url);
    let c = &feed.criteria;
    let lists = [
        ("title include", &c.title_include),
        ("title exclude", &c.title_exclude),
        ("description include", &c.description_include),
        ("description exclude", &c.description_exclude),
    ];
    for (label, words) in lists {
        if !words.is_empty() {
            println!("  {}: {}", label, words.join(", "));
        }
    }
    if c.min_length_seconds > 0 {
        println!("  min length: {}s", c.min_length_seconds);
    }
    if c.max_length_seconds > 0 {
        println!("  max length: {}s", c.max_length_seconds);
    }
    println!("  limit: {}", feed.limit);
    if let Some(ref rule) = feed.url_rewrite {
        println!("  rewrite: s/{}/{}/", rule.pattern, rule.replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;
    use crate::scanner::tests::MockFetcher;

    fn context(dir: &tempfile::TempDir) -> RunContext {
        RunContext::with_fetcher(dir.path(), Arc::new(MockFetcher::default()))
    }

    #[test]
    fn test_add_edit_remove_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        let url = "https://www.youtube.com/@rockets";

        let args = CriteriaArgs {
            title_include: vec!["launch".into()],
            min_length: Some(60),
            ..Default::default()
        };
        add_feed(&ctx, url, &args).unwrap();

        let edit = CriteriaArgs {
            title_exclude: vec!["recap".into()],
            min_length: Some(0),
            ..Default::default()
        };
        edit_feed(&ctx, url, &edit).unwrap();

        let feed = FeedStore::new(&ctx.paths.channels).get(url).unwrap().unwrap();
        assert_eq!(feed.criteria.title_include, vec!["launch"]);
        assert_eq!(feed.criteria.title_exclude, vec!["recap"]);
        assert_eq!(feed.criteria.min_length_seconds, 0);

        remove_feed(&ctx, url).unwrap();
        assert!(FeedStore::new(&ctx.paths.channels).load().unwrap().is_empty());
    }

    #[test]
    fn test_add_rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        let err = add_feed(&ctx, "not a url", &CriteriaArgs::default()).unwrap_err();
        assert!(matches!(err, ReelwatchError::InvalidUrl(_)));
    }

    #[test]
    fn test_add_with_preset() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        add_preset(&ctx, "short", r"www\.youtube\.com/watch\?v=", "youtu.be/").unwrap();

        let args = CriteriaArgs {
            preset: Some("short".into()),
            ..Default::default()
        };
        add_feed(&ctx, "https://www.youtube.com/@rockets", &args).unwrap();

        let feed = FeedStore::new(&ctx.paths.channels)
            .get("https://www.youtube.com/@rockets")
            .unwrap()
            .unwrap();
        assert_eq!(feed.url_rewrite.unwrap().replacement, "youtu.be/");
    }

    #[test]
    fn test_edit_missing_feed() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        let err = edit_feed(&ctx, "https://www.youtube.com/@none", &CriteriaArgs::default())
            .unwrap_err();
        assert!(matches!(err, ReelwatchError::FeedNotFound(_)));
    }

    #[test]
    fn test_configure_with_flags() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(&dir);
        configure(&ctx, Some("123:abc".into()), Some("@me".into())).unwrap();
        assert_eq!(
            Settings::load(&ctx.paths.config).unwrap(),
            Settings::new("123:abc", "@me")
        );
    }

    #[test]
    fn test_preview_rows_newest_first_with_verdicts() {
        let criteria = Criteria {
            title_include: vec!["launch".into()],
            ..Default::default()
        };
        let items = vec![
            Item::new("b", "Random").with_duration(90),
            Item::new("a", "Launch Day"),
        ];
        let rows = preview_rows(&criteria, &items);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("Random"));
        assert!(rows[0].contains("90s"));
        assert!(rows[0].ends_with("Title missing: launch"));
        assert!(rows[1].contains("N/A"));
        assert!(rows[1].ends_with("Matched"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
