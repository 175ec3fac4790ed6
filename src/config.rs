use std::{path::PathBuf, time::Duration};

pub const DEFAULT_LOG_FILTER: &str = "posts_fetcher=info";

pub struct Config {
    /// Base URL from `API_URL`. Not used to build the posts request.
    pub api_url: Option<String>,
    pub command: Command,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Posts { compact: bool },
    CheckImages(CheckOptions),
}

#[derive(Debug, PartialEq)]
pub struct CheckOptions {
    pub file: PathBuf,
    pub delay: Duration,
    pub timeout: Duration,
    pub json: bool,
}
