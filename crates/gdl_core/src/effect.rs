use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Extract { url: String },
    StartDownload(DownloadRequest),
    SaveSettings { output_dir: Option<PathBuf> },
}

/// A user's stream selection, ready to be handed to the downloader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub video_format_id: String,
    pub audio_format_ids: Vec<String>,
    pub allow_drm: bool,
    /// `None` means the current working directory.
    pub output_dir: Option<PathBuf>,
}
