pub mod config;
pub mod error;
pub mod types;

pub use config::HeadlineConfig;
pub use error::{HeadlineError, Result, Stage};
pub use types::*;
