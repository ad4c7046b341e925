use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use gdl_logging::{gdl_debug, gdl_info, gdl_trace};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use crate::{
    DownloadError, DownloadJob, ExtractionError, MediaBackend, MediaInfo, ProgressHook,
    RawProgress,
};

/// Prefix of stdout lines carrying a JSON progress report.
const PROGRESS_MARKER: &str = "[gdl-progress]";
const OUTPUT_TEMPLATE: &str = "%(title)s-%(id)s.%(ext)s";

#[derive(Debug, Clone)]
pub struct YtDlpSettings {
    pub binary: PathBuf,
}

impl Default for YtDlpSettings {
    fn default() -> Self {
        let binary = if cfg!(target_os = "windows") {
            "yt-dlp.exe"
        } else {
            "yt-dlp"
        };
        Self {
            binary: PathBuf::from(binary),
        }
    }
}

/// Runs the `yt-dlp` executable, one child process per call.
#[derive(Debug, Clone, Default)]
pub struct YtDlpBackend {
    settings: YtDlpSettings,
}

impl YtDlpBackend {
    pub fn new(settings: YtDlpSettings) -> Self {
        Self { settings }
    }

    fn command(&self, args: &[String]) -> Command {
        let mut command = Command::new(&self.settings.binary);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        command
    }
}

#[async_trait::async_trait]
impl MediaBackend for YtDlpBackend {
    async fn extract_info(&self, url: &str) -> Result<MediaInfo, ExtractionError> {
        let args = extract_args(url);
        gdl_debug!("yt-dlp {}", args.join(" "));
        let output = self
            .command(&args)
            .output()
            .await
            .map_err(ExtractionError::Launch)?;

        if !output.status.success() {
            let diagnostics: Vec<String> = String::from_utf8_lossy(&output.stderr)
                .lines()
                .map(str::to_owned)
                .collect();
            return Err(ExtractionError::Extractor(failure_message(
                &diagnostics,
                output.status,
            )));
        }

        let info: MediaInfo = serde_json::from_slice(&output.stdout)?;
        gdl_info!(
            "Extracted {} formats for url={}",
            info.formats.len(),
            url
        );
        Ok(info)
    }

    async fn download(
        &self,
        job: &DownloadJob,
        hook: &mut dyn ProgressHook,
    ) -> Result<(), DownloadError> {
        let args = download_args(job);
        gdl_debug!("yt-dlp {}", args.join(" "));
        let mut child = self
            .command(&args)
            .spawn()
            .map_err(DownloadError::Launch)?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(DownloadError::Downloader(
                "downloader output pipes unavailable".to_string(),
            ));
        };

        let progress = async {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines.next_line().await? {
                match parse_progress_line(&line) {
                    Some(report) => hook.report(report),
                    None => gdl_trace!("yt-dlp: {}", line),
                }
            }
            Ok::<(), std::io::Error>(())
        };
        let (progress, diagnostics) = tokio::join!(progress, collect_lines(stderr));
        progress.map_err(DownloadError::Io)?;

        let status = child.wait().await.map_err(DownloadError::Io)?;
        if status.success() {
            Ok(())
        } else {
            Err(DownloadError::Downloader(failure_message(
                &diagnostics,
                status,
            )))
        }
    }
}

pub(crate) fn extract_args(url: &str) -> Vec<String> {
    let mut args: Vec<String> = [
        "--dump-single-json",
        "--no-playlist",
        "--no-warnings",
        "--allow-unplayable-formats",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    args.push("--".to_string());
    args.push(url.to_string());
    args
}

pub(crate) fn download_args(job: &DownloadJob) -> Vec<String> {
    let template = job.output_dir().join(OUTPUT_TEMPLATE);
    let mut args: Vec<String> = [
        "--no-playlist",
        "--no-warnings",
        "--newline",
        "--audio-multistreams",
        "--add-metadata",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    if job.allow_drm {
        args.push("--allow-unplayable-formats".to_string());
    }
    args.extend([
        "-f".to_string(),
        job.format_selector(),
        "-o".to_string(),
        template.to_string_lossy().into_owned(),
        "--progress-template".to_string(),
        format!("download:{PROGRESS_MARKER}%(progress)j"),
        "--".to_string(),
        job.url.clone(),
    ]);
    args
}

pub(crate) fn parse_progress_line(line: &str) -> Option<RawProgress> {
    let payload = line.trim_start().strip_prefix(PROGRESS_MARKER)?;
    match serde_json::from_str(payload) {
        Ok(report) => Some(report),
        Err(err) => {
            gdl_debug!("Ignoring unreadable progress report: {}", err);
            None
        }
    }
}

async fn collect_lines(reader: impl AsyncRead + Unpin) -> Vec<String> {
    let mut collected = Vec::new();
    let mut lines = BufReader::new(reader).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        collected.push(line);
    }
    collected
}

/// Prefers the last `ERROR:` line, then the last non-empty line.
fn failure_message(diagnostics: &[String], status: ExitStatus) -> String {
    diagnostics
        .iter()
        .rev()
        .find(|line| line.contains("ERROR:"))
        .or_else(|| diagnostics.iter().rev().find(|line| !line.trim().is_empty()))
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| format!("yt-dlp exited with {status}"))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::ProgressStatus;

    fn job() -> DownloadJob {
        DownloadJob {
            url: "https://example.com/watch?v=abc".to_string(),
            video_format_id: "137".to_string(),
            audio_format_ids: vec!["140".to_string(), "251".to_string()],
            allow_drm: false,
            output_dir: Some(PathBuf::from("out")),
        }
    }

    fn value_after<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
        args.iter()
            .position(|arg| arg == flag)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn download_args_join_formats_and_template() {
        let args = download_args(&job());
        assert_eq!(value_after(&args, "-f"), Some("137+140+251"));
        let expected = PathBuf::from("out").join(OUTPUT_TEMPLATE);
        assert_eq!(value_after(&args, "-o"), Some(expected.to_str().unwrap()));
        assert!(!args.iter().any(|arg| arg == "--allow-unplayable-formats"));
        assert_eq!(args.last().map(String::as_str), Some("https://example.com/watch?v=abc"));
    }

    #[test]
    fn download_args_mirror_drm_flag() {
        let job = DownloadJob {
            allow_drm: true,
            output_dir: None,
            ..job()
        };
        let args = download_args(&job);
        assert!(args.iter().any(|arg| arg == "--allow-unplayable-formats"));
        let expected = PathBuf::from(".").join(OUTPUT_TEMPLATE);
        assert_eq!(value_after(&args, "-o"), Some(expected.to_str().unwrap()));
    }

    #[test]
    fn extract_args_end_with_url_after_separator() {
        let args = extract_args("-not-a-flag");
        assert_eq!(args[args.len() - 2], "--");
        assert_eq!(args[args.len() - 1], "-not-a-flag");
    }

    #[test]
    fn progress_lines_are_recognized_by_marker() {
        let line = r#"[gdl-progress]{"status":"downloading","downloaded_bytes":10,"total_bytes_estimate":100.5,"eta":null,"tmpfilename":"x.part"}"#;
        let report = parse_progress_line(line).unwrap();
        assert_eq!(report.status, ProgressStatus::Downloading);
        assert_eq!(report.downloaded_bytes, Some(10.0));
        assert_eq!(report.eta, None);

        assert!(parse_progress_line("[download] Destination: x.mp4").is_none());
        assert!(parse_progress_line("[gdl-progress]{not json").is_none());
    }

    #[test]
    fn failure_message_prefers_error_lines() {
        let diagnostics = vec![
            "ERROR: first".to_string(),
            "ERROR: [generic] Unsupported URL".to_string(),
            "trailing noise".to_string(),
        ];
        let status = success_status();
        assert_eq!(
            failure_message(&diagnostics, status),
            "ERROR: [generic] Unsupported URL"
        );
        assert_eq!(
            failure_message(&["".to_string(), "last words".to_string()], status),
            "last words"
        );
    }

    #[cfg(unix)]
    fn success_status() -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }

    #[cfg(windows)]
    fn success_status() -> ExitStatus {
        use std::os::windows::process::ExitStatusExt;
        ExitStatus::from_raw(0)
    }
}
