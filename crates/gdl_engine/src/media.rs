//! Metadata as reported by the extractor's JSON dump.
//!
//! Conventions of the external tool (the literal codec `"none"`, storyboard
//! pseudo-formats, the `"maybe"` DRM marker) are resolved here and do not
//! leak past this module.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MediaInfo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(rename = "_has_drm", default, deserialize_with = "drm_flag")]
    pub has_drm: bool,
    #[serde(default)]
    pub formats: Vec<MediaFormat>,
}

impl MediaInfo {
    /// Every format that carries a video track, in extractor order.
    pub fn video_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats.iter().filter(|format| format.has_video)
    }

    /// Audio-only formats, excluding storyboard pseudo-tracks.
    pub fn audio_formats(&self) -> impl Iterator<Item = &MediaFormat> {
        self.formats
            .iter()
            .filter(|format| !format.has_video && !format.is_storyboard)
    }

    pub fn duration_secs(&self) -> Option<u64> {
        self.duration
            .filter(|secs| secs.is_finite() && *secs > 0.0)
            .map(|secs| secs as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "FormatRecord")]
pub struct MediaFormat {
    pub format_id: String,
    pub ext: Option<String>,
    pub resolution: Option<String>,
    pub bitrate_kbps: Option<u32>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub language: Option<String>,
    pub has_drm: bool,
    /// False only when the extractor explicitly reports no video codec.
    pub has_video: bool,
    pub is_storyboard: bool,
}

#[derive(Deserialize)]
struct FormatRecord {
    #[serde(default)]
    format_id: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default)]
    tbr: Option<f64>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    format_note: Option<String>,
    #[serde(default, deserialize_with = "drm_flag")]
    has_drm: bool,
}

impl From<FormatRecord> for MediaFormat {
    fn from(record: FormatRecord) -> Self {
        let has_video = record.vcodec.as_deref() != Some("none");
        Self {
            format_id: record.format_id.unwrap_or_default(),
            ext: record.ext,
            resolution: record.resolution,
            bitrate_kbps: record
                .tbr
                .filter(|tbr| tbr.is_finite() && *tbr >= 1.0)
                .map(|tbr| tbr as u32),
            video_codec: known_codec(record.vcodec),
            audio_codec: known_codec(record.acodec),
            language: record.language,
            has_drm: record.has_drm,
            has_video,
            is_storyboard: record.format_note.as_deref() == Some("storyboard"),
        }
    }
}

fn known_codec(codec: Option<String>) -> Option<String> {
    codec.filter(|c| !c.is_empty() && c != "none")
}

// The extractor reports DRM as a bool, or as the string "maybe" when unsure.
fn drm_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    })
}
