use std::collections::VecDeque;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::media::{MediaSummary, Selection};
use crate::view_model::{self, AppViewModel};

/// Identifier correlating every event of one download task.
pub type TaskId = uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Downloading,
    Finished,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferStatus::Downloading => write!(f, "Downloading"),
            TransferStatus::Finished => write!(f, "Finished"),
        }
    }
}

/// Which stream a download task is believed to be transferring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaKind {
    #[default]
    Video,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub task_id: TaskId,
    pub status: TransferStatus,
    pub kind: MediaKind,
    pub title: Option<String>,
    /// Whole megabytes (10^6 bytes) of the estimated total.
    pub size_mb: u64,
    pub percent: u8,
    pub fragment_index: Option<u64>,
    pub fragment_count: Option<u64>,
    pub speed_kbps: u64,
    pub eta_secs: Option<u64>,
}

/// One row of the progress table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TaskRow {
    pub(crate) task_id: TaskId,
    pub(crate) url: String,
    pub(crate) progress: Option<ProgressUpdate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    rows: Vec<TaskRow>,
    selection: Option<Selection>,
    notifications: VecDeque<String>,
    status_line: Option<String>,
    output_dir: Option<PathBuf>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a previously persisted output directory without emitting a save.
    pub fn with_output_dir(output_dir: Option<PathBuf>) -> Self {
        Self {
            output_dir,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status_line: self.status_line.clone(),
            output_dir: self.output_dir.clone(),
            rows: self.rows.iter().map(view_model::task_row_view).collect(),
            selection: self.selection.as_ref().map(view_model::selection_view),
            notifications: self.notifications.iter().cloned().collect(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn task_count(&self) -> usize {
        self.rows.len()
    }

    pub fn has_task(&self, task_id: TaskId) -> bool {
        self.rows.iter().any(|row| row.task_id == task_id)
    }

    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>) {
        self.status_line = Some(text.into());
        self.mark_dirty();
    }

    pub(crate) fn set_output_dir(&mut self, output_dir: Option<PathBuf>) -> bool {
        if self.output_dir == output_dir {
            return false;
        }
        self.output_dir = output_dir;
        self.mark_dirty();
        true
    }

    pub(crate) fn push_notification(&mut self, message: String) {
        self.notifications.push_back(message);
        self.mark_dirty();
    }

    pub(crate) fn dismiss_notification(&mut self) {
        if self.notifications.pop_front().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn open_selection(&mut self, media: MediaSummary) {
        self.selection = Some(Selection::new(media));
        self.mark_dirty();
    }

    pub(crate) fn selection_mut(&mut self) -> Option<&mut Selection> {
        self.selection.as_mut()
    }

    pub(crate) fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub(crate) fn close_selection(&mut self) {
        if self.selection.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Newest task goes to the top of the table.
    pub(crate) fn insert_task(&mut self, task_id: TaskId, url: String) {
        self.rows.insert(
            0,
            TaskRow {
                task_id,
                url,
                progress: None,
            },
        );
        self.mark_dirty();
    }

    /// Returns false if no row carries the update's task id.
    pub(crate) fn apply_progress(&mut self, update: ProgressUpdate) -> bool {
        match self.rows.iter_mut().find(|row| row.task_id == update.task_id) {
            Some(row) => {
                row.progress = Some(update);
                self.mark_dirty();
                true
            }
            None => false,
        }
    }

    /// Returns false if no row carries the task id.
    pub(crate) fn remove_task(&mut self, task_id: TaskId) -> bool {
        match self.rows.iter().position(|row| row.task_id == task_id) {
            Some(index) => {
                self.rows.remove(index);
                self.mark_dirty();
                true
            }
            None => false,
        }
    }
}
