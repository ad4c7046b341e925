use std::path::PathBuf;

use crate::DownloadRequest;

/// One selectable audio or video variant, already classified by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamDescriptor {
    pub format_id: String,
    pub ext: Option<String>,
    pub resolution: Option<String>,
    pub bitrate_kbps: Option<u32>,
    pub codec: Option<String>,
    pub language: Option<String>,
    pub has_drm: bool,
}

impl StreamDescriptor {
    /// `ext | resolution | bitrate | codec | DRM`, absent columns omitted.
    pub fn video_label(&self) -> String {
        let mut columns = Vec::new();
        push_padded(&mut columns, self.ext.as_deref(), 5);
        push_padded(&mut columns, self.resolution.as_deref(), 10);
        push_padded(&mut columns, self.bitrate_text().as_deref(), 7);
        push_padded(&mut columns, self.codec.as_deref(), 14);
        if self.has_drm {
            columns.push("DRM".to_string());
        }
        columns.join(" | ")
    }

    /// `language | ext | bitrate | codec | DRM`, absent columns omitted.
    pub fn audio_label(&self) -> String {
        let mut columns = Vec::new();
        push_padded(&mut columns, self.language.as_deref(), 4);
        push_padded(&mut columns, self.ext.as_deref(), 5);
        push_padded(&mut columns, self.bitrate_text().as_deref(), 7);
        push_padded(&mut columns, self.codec.as_deref(), 14);
        if self.has_drm {
            columns.push("DRM".to_string());
        }
        columns.join(" | ")
    }

    fn bitrate_text(&self) -> Option<String> {
        self.bitrate_kbps
            .filter(|kbps| *kbps > 0)
            .map(|kbps| format!("{kbps}k"))
    }
}

fn push_padded(columns: &mut Vec<String>, value: Option<&str>, width: usize) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        columns.push(format!("{value:<width$}"));
    }
}

/// Extraction result as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MediaSummary {
    pub webpage_url: String,
    pub title: Option<String>,
    pub resolution: Option<String>,
    pub duration_secs: Option<u64>,
    pub has_drm: bool,
    pub video: Vec<StreamDescriptor>,
    pub audio: Vec<StreamDescriptor>,
}

/// An open stream selection: single video choice, any number of audio choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Selection {
    media: MediaSummary,
    video_index: usize,
    audio_checked: Vec<bool>,
}

impl Selection {
    pub(crate) fn new(media: MediaSummary) -> Self {
        let audio_checked = vec![false; media.audio.len()];
        Self {
            media,
            video_index: 0,
            audio_checked,
        }
    }

    pub(crate) fn media(&self) -> &MediaSummary {
        &self.media
    }

    pub(crate) fn video_index(&self) -> usize {
        self.video_index
    }

    pub(crate) fn is_audio_checked(&self, index: usize) -> bool {
        self.audio_checked.get(index).copied().unwrap_or(false)
    }

    pub(crate) fn can_download(&self) -> bool {
        !self.media.video.is_empty()
    }

    /// Returns false when the index is out of range.
    pub(crate) fn select_video(&mut self, index: usize) -> bool {
        if index >= self.media.video.len() || index == self.video_index {
            return false;
        }
        self.video_index = index;
        true
    }

    /// Returns false when the index is out of range.
    pub(crate) fn toggle_audio(&mut self, index: usize) -> bool {
        match self.audio_checked.get_mut(index) {
            Some(checked) => {
                *checked = !*checked;
                true
            }
            None => false,
        }
    }

    pub(crate) fn to_request(&self, output_dir: Option<PathBuf>) -> Option<DownloadRequest> {
        let video = self.media.video.get(self.video_index)?;
        let audio_format_ids = self
            .media
            .audio
            .iter()
            .zip(&self.audio_checked)
            .filter(|(_, checked)| **checked)
            .map(|(stream, _)| stream.format_id.clone())
            .collect();
        Some(DownloadRequest {
            url: self.media.webpage_url.clone(),
            video_format_id: video.format_id.clone(),
            audio_format_ids,
            allow_drm: self.media.has_drm,
            output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(id: &str) -> StreamDescriptor {
        StreamDescriptor {
            format_id: id.to_string(),
            ..StreamDescriptor::default()
        }
    }

    #[test]
    fn video_label_pads_columns_and_flags_drm() {
        let descriptor = StreamDescriptor {
            format_id: "137".to_string(),
            ext: Some("mp4".to_string()),
            resolution: Some("1920x1080".to_string()),
            bitrate_kbps: Some(4400),
            codec: Some("avc1.640028".to_string()),
            language: None,
            has_drm: true,
        };
        assert_eq!(
            descriptor.video_label(),
            "mp4   | 1920x1080  | 4400k   | avc1.640028    | DRM"
        );
    }

    #[test]
    fn audio_label_skips_missing_columns() {
        let descriptor = StreamDescriptor {
            format_id: "140".to_string(),
            ext: Some("m4a".to_string()),
            bitrate_kbps: Some(0),
            ..StreamDescriptor::default()
        };
        assert_eq!(descriptor.audio_label(), "m4a  ");
    }

    #[test]
    fn request_collects_checked_audio_in_list_order() {
        let media = MediaSummary {
            webpage_url: "https://example.com/watch".to_string(),
            video: vec![stream("137"), stream("136")],
            audio: vec![stream("140"), stream("251"), stream("139")],
            ..MediaSummary::default()
        };
        let mut selection = Selection::new(media);
        assert!(selection.select_video(1));
        assert!(selection.toggle_audio(2));
        assert!(selection.toggle_audio(0));
        assert!(!selection.toggle_audio(3));

        let request = selection.to_request(None).unwrap();
        assert_eq!(request.video_format_id, "136");
        assert_eq!(request.audio_format_ids, vec!["140", "139"]);
    }
}
