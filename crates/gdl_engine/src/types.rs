use std::path::{Path, PathBuf};

use crate::MediaInfo;

pub type TaskId = uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    Video,
    Audio,
}

/// Transfer state carried by a progress event. Error reports never become events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
    Downloading,
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub task_id: TaskId,
    pub phase: TransferPhase,
    pub kind: MediaKind,
    pub title: Option<String>,
    pub size_mb: u64,
    pub percent: u8,
    pub fragment_index: Option<u64>,
    pub fragment_count: Option<u64>,
    pub speed_kbps: u64,
    pub eta_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ExtractionSucceeded { url: String, info: MediaInfo },
    ExtractionFailed { url: String, message: String },
    DownloadStarted { task_id: TaskId, url: String },
    Progress(ProgressEvent),
    DownloadFailed { task_id: TaskId, message: String },
    DownloadCompleted { task_id: TaskId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadJob {
    pub url: String,
    pub video_format_id: String,
    pub audio_format_ids: Vec<String>,
    pub allow_drm: bool,
    pub output_dir: Option<PathBuf>,
}

impl DownloadJob {
    /// Video id followed by every audio id, joined for muxing into one file.
    pub fn format_selector(&self) -> String {
        std::iter::once(self.video_format_id.as_str())
            .chain(self.audio_format_ids.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join("+")
    }

    /// Falls back to the working directory when unset.
    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }
}
