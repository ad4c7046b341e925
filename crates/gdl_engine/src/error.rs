use std::io;

use thiserror::Error;

use crate::PersistError;

/// Any failure while asking the extractor for metadata.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not launch extractor: {0}")]
    Launch(#[source] io::Error),
    #[error("{0}")]
    Extractor(String),
    #[error("unreadable extractor output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Any failure while downloading and muxing the selected streams.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("could not launch downloader: {0}")]
    Launch(#[source] io::Error),
    #[error("{0}")]
    Downloader(String),
    #[error("reading downloader output failed: {0}")]
    Io(#[source] io::Error),
    #[error(transparent)]
    OutputDir(#[from] PersistError),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build worker pool: {0}")]
    Runtime(#[source] io::Error),
    #[error("failed to start dispatcher thread: {0}")]
    Dispatcher(#[source] io::Error),
}
