use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app::error::{ReelwatchError, Result};
use crate::fetcher::ytdlp::YtDlpFetcher;
use crate::fetcher::Fetcher;

/// Locations of every document kept in the data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub dir: PathBuf,
    pub config: PathBuf,
    pub channels: PathBuf,
    pub seen: PathBuf,
    pub presets: PathBuf,
    pub cookies: PathBuf,
}

impl DataPaths {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            config: dir.join("config.json"),
            channels: dir.join("channels.json"),
            seen: dir.join("seen_videos.json"),
            presets: dir.join("regex_presets.json"),
            cookies: dir.join("cookies.txt"),
        }
    }
}

pub struct RunContext {
    pub paths: DataPaths,
    pub fetcher: Arc<dyn Fetcher + Send + Sync>,
}

impl RunContext {
    pub fn new(data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(p) => p,
            None => Self::default_data_dir()?,
        };
        std::fs::create_dir_all(&data_dir)?;

        let paths = DataPaths::new(&data_dir);
        let fetcher: Arc<dyn Fetcher + Send + Sync> =
            Arc::new(YtDlpFetcher::with_cookies(&paths.cookies));

        Ok(Self { paths, fetcher })
    }

    /// Builds a context around an arbitrary fetcher, used by tests and previews.
    pub fn with_fetcher(data_dir: &Path, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            paths: DataPaths::new(data_dir),
            fetcher,
        }
    }

    fn default_data_dir() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| ReelwatchError::Other("Could not find data directory".into()))?;
        Ok(data_dir.join("reelwatch"))
    }
}
