use crate::{DownloadError, DownloadJob, ExtractionError, MediaInfo, RawProgress};

/// Receives the downloader's progress reports in the order they occur.
pub trait ProgressHook: Send {
    fn report(&mut self, progress: RawProgress);
}

/// The external extractor/downloader. Each call is independent; implementations
/// must not share per-call state between concurrent tasks.
#[async_trait::async_trait]
pub trait MediaBackend: Send + Sync {
    /// Metadata only, nothing is downloaded. Unplayable formats are listed too.
    async fn extract_info(&self, url: &str) -> Result<MediaInfo, ExtractionError>;

    /// Fetches the job's combined format into a single muxed file.
    async fn download(
        &self,
        job: &DownloadJob,
        hook: &mut dyn ProgressHook,
    ) -> Result<(), DownloadError>;
}
