use std::sync::{mpsc, Arc};
use std::thread;

use gdl_core::{
    DownloadRequest, Effect, MediaKind, MediaSummary, Msg, ProgressUpdate, StreamDescriptor,
    TransferStatus,
};
use gdl_engine::{
    DownloadJob, EngineError, EngineEvent, EngineEvents, EngineHandle, MediaFormat, MediaInfo,
    ProgressEvent, YtDlpBackend,
};
use gdl_logging::{gdl_debug, gdl_info};

use super::app::ControlEvent;
use super::config::AppConfig;
use super::persistence::{Settings, SettingsStore};

/// Executes effects returned by `update` and feeds engine events back as messages.
pub struct EffectRunner {
    engine: EngineHandle,
    settings: SettingsStore,
}

impl EffectRunner {
    pub fn new(
        config: &AppConfig,
        settings: SettingsStore,
        control_tx: mpsc::Sender<ControlEvent>,
    ) -> Result<Self, EngineError> {
        let backend = Arc::new(YtDlpBackend::new(config.ytdlp.clone()));
        let (engine, events) = EngineHandle::spawn(config.engine.clone(), backend)?;
        spawn_event_forwarder(events, control_tx);
        Ok(Self { engine, settings })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Extract { url } => {
                    gdl_info!("Extract url={}", url);
                    self.engine.extract(url);
                }
                Effect::StartDownload(request) => {
                    gdl_info!(
                        "StartDownload url={} video={} audio={:?}",
                        request.url,
                        request.video_format_id,
                        request.audio_format_ids
                    );
                    self.engine.download(download_job(request));
                }
                Effect::SaveSettings { output_dir } => {
                    self.settings.save(&Settings { output_dir });
                }
            }
        }
    }
}

fn spawn_event_forwarder(events: EngineEvents, control_tx: mpsc::Sender<ControlEvent>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if control_tx.send(ControlEvent::Msg(map_event(event))).is_err() {
                break;
            }
        }
        gdl_debug!("Engine event forwarder stopped");
    });
}

fn download_job(request: DownloadRequest) -> DownloadJob {
    DownloadJob {
        url: request.url,
        video_format_id: request.video_format_id,
        audio_format_ids: request.audio_format_ids,
        allow_drm: request.allow_drm,
        output_dir: request.output_dir,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ExtractionSucceeded { url, info } => {
            Msg::ExtractionSucceeded(media_summary(url, &info))
        }
        EngineEvent::ExtractionFailed { message, .. } => Msg::ExtractionFailed(message),
        EngineEvent::DownloadStarted { task_id, url } => Msg::TaskStarted { task_id, url },
        EngineEvent::Progress(progress) => Msg::TaskProgress(progress_update(progress)),
        EngineEvent::DownloadFailed { task_id, message } => Msg::TaskFailed { task_id, message },
        EngineEvent::DownloadCompleted { task_id } => Msg::TaskCompleted { task_id },
    }
}

fn media_summary(url: String, info: &MediaInfo) -> MediaSummary {
    MediaSummary {
        webpage_url: info.webpage_url.clone().unwrap_or(url),
        title: info.title.clone(),
        resolution: info.resolution.clone(),
        duration_secs: info.duration_secs(),
        has_drm: info.has_drm,
        video: info
            .video_formats()
            .map(|format| stream_descriptor(format, format.video_codec.clone()))
            .collect(),
        audio: info
            .audio_formats()
            .map(|format| stream_descriptor(format, format.audio_codec.clone()))
            .collect(),
    }
}

fn stream_descriptor(format: &MediaFormat, codec: Option<String>) -> StreamDescriptor {
    StreamDescriptor {
        format_id: format.format_id.clone(),
        ext: format.ext.clone(),
        resolution: format.resolution.clone(),
        bitrate_kbps: format.bitrate_kbps,
        codec,
        language: format.language.clone(),
        has_drm: format.has_drm,
    }
}

fn progress_update(progress: ProgressEvent) -> ProgressUpdate {
    ProgressUpdate {
        task_id: progress.task_id,
        status: match progress.phase {
            gdl_engine::TransferPhase::Downloading => TransferStatus::Downloading,
            gdl_engine::TransferPhase::Finished => TransferStatus::Finished,
        },
        kind: match progress.kind {
            gdl_engine::MediaKind::Video => MediaKind::Video,
            gdl_engine::MediaKind::Audio => MediaKind::Audio,
        },
        title: progress.title,
        size_mb: progress.size_mb,
        percent: progress.percent,
        fragment_index: progress.fragment_index,
        fragment_count: progress.fragment_count,
        speed_kbps: progress.speed_kbps,
        eta_secs: progress.eta_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(id: &str, vcodec: &str, note: Option<&str>) -> MediaFormat {
        MediaFormat {
            format_id: id.to_string(),
            video_codec: Some(vcodec.to_string()).filter(|c| c != "none"),
            has_video: vcodec != "none",
            is_storyboard: note == Some("storyboard"),
            ..MediaFormat::default()
        }
    }

    #[test]
    fn extraction_result_becomes_classified_summary() {
        let info = MediaInfo {
            title: Some("Sample".to_string()),
            duration: Some(61.0),
            formats: vec![
                format("137", "avc1", None),
                format("140", "none", None),
                format("sb0", "none", Some("storyboard")),
            ],
            ..MediaInfo::default()
        };

        let msg = map_event(EngineEvent::ExtractionSucceeded {
            url: "https://example.com/watch?v=abc".to_string(),
            info,
        });

        let summary = match msg {
            Msg::ExtractionSucceeded(summary) => summary,
            other => panic!("unexpected message: {other:?}"),
        };
        assert_eq!(summary.webpage_url, "https://example.com/watch?v=abc");
        assert_eq!(summary.duration_secs, Some(61));
        let video: Vec<_> = summary.video.iter().map(|s| s.format_id.as_str()).collect();
        let audio: Vec<_> = summary.audio.iter().map(|s| s.format_id.as_str()).collect();
        assert_eq!(video, vec!["137"]);
        assert_eq!(audio, vec!["140"]);
        assert_eq!(summary.video[0].codec.as_deref(), Some("avc1"));
    }

    #[test]
    fn download_request_maps_to_job_selector() {
        let job = download_job(DownloadRequest {
            url: "https://example.com/watch?v=abc".to_string(),
            video_format_id: "137".to_string(),
            audio_format_ids: vec!["140".to_string(), "251".to_string()],
            allow_drm: true,
            output_dir: None,
        });
        assert_eq!(job.format_selector(), "137+140+251");
        assert!(job.allow_drm);
    }

    #[test]
    fn progress_event_maps_phase_and_kind() {
        let task_id = gdl_engine::TaskId::new_v4();
        let update = progress_update(ProgressEvent {
            task_id,
            phase: gdl_engine::TransferPhase::Finished,
            kind: gdl_engine::MediaKind::Audio,
            title: None,
            size_mb: 3,
            percent: 0,
            fragment_index: None,
            fragment_count: Some(9),
            speed_kbps: 0,
            eta_secs: None,
        });
        assert_eq!(update.task_id, task_id);
        assert_eq!(update.status, TransferStatus::Finished);
        assert_eq!(update.kind, MediaKind::Audio);
        assert_eq!(update.fragment_count, Some(9));
    }
}
