use serde::Deserialize;

use crate::{MediaKind, ProgressEvent, TaskId, TransferPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    #[default]
    Downloading,
    Finished,
    Error,
}

/// One progress report from the downloader, fields as the downloader names them.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RawProgress {
    pub status: ProgressStatus,
    #[serde(default)]
    pub total_bytes_estimate: Option<f64>,
    #[serde(default)]
    pub downloaded_bytes: Option<f64>,
    #[serde(default)]
    pub eta: Option<f64>,
    #[serde(default)]
    pub fragment_index: Option<u64>,
    #[serde(default)]
    pub fragment_count: Option<u64>,
    #[serde(default)]
    pub speed: Option<f64>,
}

/// Whole megabytes of the estimate and whole percent downloaded.
///
/// Both values are zero unless the estimate and the downloaded count are
/// present and non-zero.
pub fn size_and_percent(total_estimate: Option<f64>, downloaded: Option<f64>) -> (u64, u8) {
    match (total_estimate, downloaded) {
        (Some(total), Some(done)) if total > 0.0 && done > 0.0 => {
            let size_mb = (total / 1_000_000.0).floor() as u64;
            let percent = (done / total * 100.0).floor().min(100.0) as u8;
            (size_mb, percent)
        }
        _ => (0, 0),
    }
}

/// Turns raw reports of one download task into progress events.
///
/// A task is assumed to fetch its video first. The first `finished` report
/// with zero computed progress marks the start of the audio phase; the kind
/// never returns to video afterwards.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    task_id: TaskId,
    title: Option<String>,
    kind: MediaKind,
}

impl ProgressTracker {
    pub fn new(task_id: TaskId, title: Option<String>) -> Self {
        Self {
            task_id,
            title,
            kind: MediaKind::Video,
        }
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Returns `None` for error reports; the task's failure path reports those once.
    pub fn observe(&mut self, raw: &RawProgress) -> Option<ProgressEvent> {
        let phase = match raw.status {
            ProgressStatus::Error => return None,
            ProgressStatus::Downloading => TransferPhase::Downloading,
            ProgressStatus::Finished => TransferPhase::Finished,
        };

        let (size_mb, percent) = size_and_percent(raw.total_bytes_estimate, raw.downloaded_bytes);
        if phase == TransferPhase::Finished && percent == 0 {
            self.kind = MediaKind::Audio;
        }

        Some(ProgressEvent {
            task_id: self.task_id,
            phase,
            kind: self.kind,
            title: self.title.clone(),
            size_mb,
            percent,
            fragment_index: raw.fragment_index,
            fragment_count: raw.fragment_count,
            speed_kbps: raw
                .speed
                .filter(|speed| speed.is_finite() && *speed > 0.0)
                .map_or(0, |speed| (speed / 1000.0) as u64),
            eta_secs: raw
                .eta
                .filter(|eta| eta.is_finite() && *eta > 0.0)
                .map(|eta| eta as u64),
        })
    }
}
