pub mod context;
pub mod error;

pub use context::{DataPaths, RunContext};
pub use error::{ReelwatchError, Result};
