use std::path::PathBuf;

use crate::{MediaSummary, ProgressUpdate, TaskId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a URL for metadata extraction.
    UrlSubmitted(String),
    /// Extraction finished with classified streams.
    ExtractionSucceeded(MediaSummary),
    /// Extraction failed; the message is already sanitized for display.
    ExtractionFailed(String),
    /// User picked a video stream by its position in the video list.
    VideoSelected(usize),
    /// User checked or unchecked an audio stream by its position in the audio list.
    AudioToggled(usize),
    /// User clicked Download in the stream selection.
    DownloadClicked,
    /// User closed the stream selection without downloading.
    SelectionDismissed,
    /// User changed the output directory. Blank means the working directory.
    OutputDirChanged(Option<PathBuf>),
    /// A download task registered itself; always precedes its progress.
    TaskStarted { task_id: TaskId, url: String },
    /// Periodic progress for a running download task.
    TaskProgress(ProgressUpdate),
    /// A download task failed; its completion follows.
    TaskFailed { task_id: TaskId, message: String },
    /// Terminal event of a download task, success or failure.
    TaskCompleted { task_id: TaskId },
    /// User acknowledged the oldest notification.
    NotificationDismissed,
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
