use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use crate::app::{ReelwatchError, Result};
use crate::domain::{DateCode, Item};
use crate::fetcher::{FetchedFeed, Fetcher};

const DEFAULT_PROGRAM: &str = "yt-dlp";

/// Lists channels by shelling out to `yt-dlp`.
pub struct YtDlpFetcher {
    program: String,
    cookies: Option<PathBuf>,
}

impl YtDlpFetcher {
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            cookies: None,
        }
    }

    /// Passes `--cookies` when the file exists, otherwise logs how to enable it.
    pub fn with_cookies(path: &Path) -> Self {
        let cookies = if path.exists() {
            tracing::info!("Using yt-dlp cookies from {}", path.display());
            Some(path.to_path_buf())
        } else {
            tracing::info!(
                "No cookies file at {}; place a Netscape-format cookies.txt there if channels require sign-in",
                path.display()
            );
            None
        };
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            cookies,
        }
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Options first, then `--` so a locator starting with `-` is never read
    /// as an option.
    fn command(&self, locator: &str, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(ref cookies) = self.cookies {
            cmd.arg("--cookies").arg(cookies);
        }
        cmd.arg("--").arg(locator);
        cmd
    }

    async fn run(&self, locator: &str, args: &[String]) -> Result<String> {
        let mut cmd = self.command(locator, args);

        let output = cmd.output().await.map_err(|e| ReelwatchError::Fetch {
            locator: locator.to_string(),
            reason: format!("spawn {}: {}", self.program, e),
        })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ReelwatchError::Fetch {
                locator: locator.to_string(),
                reason: format!("{} failed ({}): {}", self.program, output.status, stderr.trim()),
            })
        }
    }
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetcher for YtDlpFetcher {
    async fn fetch(&self, locator: &str, limit: usize) -> Result<FetchedFeed> {
        let args = vec![
            "--flat-playlist".to_string(),
            "--dump-single-json".to_string(),
            "--no-warnings".to_string(),
            "--playlist-end".to_string(),
            limit.max(1).to_string(),
        ];
        let stdout = self.run(locator, &args).await?;
        let mut feed = parse_listing(locator, &stdout)?;
        feed.items.truncate(limit.max(1));
        Ok(feed)
    }

    async fn resolve_upload_date(&self, url: &str) -> Result<String> {
        let args = vec![
            "--skip-download".to_string(),
            "--no-warnings".to_string(),
            "--print".to_string(),
            "upload_date".to_string(),
        ];
        let stdout = self.run(url, &args).await?;
        let code = stdout.lines().next().unwrap_or_default().trim();
        match DateCode::parse(code) {
            Some(date) => Ok(date.to_string()),
            None => Err(ReelwatchError::Fetch {
                locator: url.to_string(),
                reason: format!("unexpected upload date {:?}", code),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default)]
    entries: Vec<Option<Entry>>,
    channel: Option<String>,
    uploader: Option<String>,
    playlist_uploader: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(rename = "_type")]
    kind: Option<String>,
    id: Option<String>,
    title: Option<String>,
    description: Option<String>,
    duration: Option<f64>,
    url: Option<String>,
    webpage_url: Option<String>,
    upload_date: Option<String>,
}

impl Entry {
    fn into_item(self) -> Option<Item> {
        if self.kind.as_deref() == Some("playlist") {
            return None;
        }
        let id = self.id.filter(|id| !id.is_empty())?;
        let url = self
            .webpage_url
            .or(self.url)
            .filter(|u| u.starts_with("http"))
            .unwrap_or_else(|| Item::watch_url(&id));

        Some(Item {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            duration: self
                .duration
                .filter(|d| d.is_finite() && *d > 0.0)
                .map(|d| d as u64)
                .unwrap_or(0),
            url,
            upload_date: self.upload_date.filter(|d| DateCode::parse(d).is_some()),
            id,
        })
    }
}

/// Parses `--dump-single-json` output.
pub fn parse_listing(locator: &str, stdout: &str) -> Result<FetchedFeed> {
    let listing: Listing = serde_json::from_str(stdout).map_err(|e| ReelwatchError::Fetch {
        locator: locator.to_string(),
        reason: format!("malformed extractor output: {}", e),
    })?;

    let channel = listing
        .channel
        .or(listing.uploader)
        .or(listing.playlist_uploader)
        .or(listing.title)
        .filter(|name| !name.is_empty());

    let items = listing
        .entries
        .into_iter()
        .flatten()
        .filter_map(Entry::into_item)
        .collect();

    Ok(FetchedFeed { channel, items })
}
