use std::path::PathBuf;

use crate::media::Selection;
use crate::state::TaskRow;
use crate::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status_line: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub rows: Vec<TaskRowView>,
    pub selection: Option<SelectionView>,
    pub notifications: Vec<String>,
    pub dirty: bool,
}

/// Display text for one row of the progress table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRowView {
    pub task_id: TaskId,
    pub status: String,
    pub name: String,
    pub size: String,
    pub percent: u8,
    pub fragments: String,
    pub speed: String,
    pub eta: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionView {
    pub url: String,
    pub title: Option<String>,
    pub resolution: String,
    pub duration: String,
    pub drm: &'static str,
    pub video: Vec<StreamChoiceView>,
    pub audio: Vec<StreamChoiceView>,
    pub can_download: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamChoiceView {
    pub label: String,
    pub chosen: bool,
}

/// Formats seconds as `Hh Mm Ss`.
pub fn format_duration(secs: u64) -> String {
    let (minutes, seconds) = (secs / 60, secs % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    format!("{hours}h {minutes}m {seconds}s")
}

pub(crate) fn task_row_view(row: &TaskRow) -> TaskRowView {
    let Some(progress) = &row.progress else {
        return TaskRowView {
            task_id: row.task_id,
            status: "Starting...".to_string(),
            name: row.url.clone(),
            size: String::new(),
            percent: 0,
            fragments: String::new(),
            speed: String::new(),
            eta: String::new(),
        };
    };

    let fragments = format!(
        "{}/{}",
        optional_count(progress.fragment_index),
        optional_count(progress.fragment_count)
    );
    let eta = match progress.eta_secs {
        Some(secs) if secs > 0 => format_duration(secs),
        _ => "N/A".to_string(),
    };

    TaskRowView {
        task_id: row.task_id,
        status: format!("{} {}", progress.status, progress.kind),
        name: progress.title.clone().unwrap_or_else(|| row.url.clone()),
        size: format!("{} MB", progress.size_mb),
        percent: progress.percent,
        fragments,
        speed: format!("{} KB/s", progress.speed_kbps),
        eta,
    }
}

fn optional_count(value: Option<u64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

pub(crate) fn selection_view(selection: &Selection) -> SelectionView {
    let media = selection.media();
    let video = media
        .video
        .iter()
        .enumerate()
        .map(|(index, stream)| StreamChoiceView {
            label: stream.video_label(),
            chosen: index == selection.video_index(),
        })
        .collect();
    let audio = media
        .audio
        .iter()
        .enumerate()
        .map(|(index, stream)| StreamChoiceView {
            label: stream.audio_label(),
            chosen: selection.is_audio_checked(index),
        })
        .collect();

    SelectionView {
        url: media.webpage_url.clone(),
        title: media.title.clone(),
        resolution: media.resolution.clone().unwrap_or_default(),
        duration: media
            .duration_secs
            .filter(|secs| *secs > 0)
            .map(format_duration)
            .unwrap_or_default(),
        drm: if media.has_drm { "DRM" } else { "No DRM" },
        video,
        audio,
        can_download: selection.can_download(),
    }
}
