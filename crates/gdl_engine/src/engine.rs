use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use gdl_logging::{gdl_debug, gdl_info, gdl_warn};

use crate::{
    ensure_output_dir, user_message, DownloadError, DownloadJob, EngineError, EngineEvent,
    MediaBackend, ProgressHook, ProgressTracker, RawProgress, TaskId,
};

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Size of the fixed worker pool running extraction and download tasks.
    pub worker_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { worker_threads: 4 }
    }
}

enum EngineCommand {
    Extract { url: String },
    Download(DownloadJob),
}

/// Submits fire-and-forget tasks to the worker pool.
///
/// Dropping every handle shuts the pool down; tasks still running at that
/// point are abandoned.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

/// Receiving half of the engine's event stream. Events of one task arrive in
/// the order the task emitted them.
pub struct EngineEvents {
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn spawn(
        config: EngineConfig,
        backend: Arc<dyn MediaBackend>,
    ) -> Result<(Self, EngineEvents), EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(config.worker_threads.max(1))
            .thread_name("gdl-worker")
            .enable_all()
            .build()
            .map_err(EngineError::Runtime)?;

        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("gdl-dispatch".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        handle_command(backend.as_ref(), command, event_tx).await;
                    });
                }
                gdl_debug!("Engine command channel closed, stopping worker pool");
            })
            .map_err(EngineError::Dispatcher)?;

        gdl_info!("Engine started with {} workers", config.worker_threads.max(1));
        Ok((Self { cmd_tx }, EngineEvents { event_rx }))
    }

    pub fn extract(&self, url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Extract { url: url.into() });
    }

    pub fn download(&self, job: DownloadJob) {
        let _ = self.cmd_tx.send(EngineCommand::Download(job));
    }
}

impl EngineEvents {
    /// Blocks until an event arrives; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    backend: &dyn MediaBackend,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Extract { url } => run_extraction(backend, url, &event_tx).await,
        EngineCommand::Download(job) => run_download(backend, job, &event_tx).await,
    }
}

async fn run_extraction(
    backend: &dyn MediaBackend,
    url: String,
    events: &mpsc::Sender<EngineEvent>,
) {
    gdl_info!("Extraction started url={}", url);
    let event = match backend.extract_info(&url).await {
        Ok(info) => EngineEvent::ExtractionSucceeded { url, info },
        Err(err) => {
            gdl_warn!("Extraction failed url={}: {}", url, err);
            EngineEvent::ExtractionFailed {
                url,
                message: user_message(&err),
            }
        }
    };
    let _ = events.send(event);
}

/// Emits `DownloadStarted`, any progress, an optional `DownloadFailed`, and
/// always exactly one `DownloadCompleted` last.
async fn run_download(
    backend: &dyn MediaBackend,
    job: DownloadJob,
    events: &mpsc::Sender<EngineEvent>,
) {
    let task_id = TaskId::new_v4();
    let _ = events.send(EngineEvent::DownloadStarted {
        task_id,
        url: job.url.clone(),
    });
    gdl_info!(
        "Download task {} started url={} formats={}",
        task_id,
        job.url,
        job.format_selector()
    );

    match perform_download(backend, task_id, &job, events).await {
        Ok(()) => gdl_info!("Download task {} finished", task_id),
        Err(err) => {
            gdl_warn!("Download task {} failed: {}", task_id, err);
            let _ = events.send(EngineEvent::DownloadFailed {
                task_id,
                message: user_message(&err),
            });
        }
    }

    let _ = events.send(EngineEvent::DownloadCompleted { task_id });
}

async fn perform_download(
    backend: &dyn MediaBackend,
    task_id: TaskId,
    job: &DownloadJob,
    events: &mpsc::Sender<EngineEvent>,
) -> Result<(), DownloadError> {
    ensure_output_dir(job.output_dir())?;

    // Display title only; a failed lookup does not stop the download.
    let title = match backend.extract_info(&job.url).await {
        Ok(info) => info.title,
        Err(err) => {
            gdl_warn!("Title lookup for task {} failed: {}", task_id, err);
            None
        }
    };

    let mut hook = ChannelProgressHook {
        tracker: ProgressTracker::new(task_id, title),
        events: events.clone(),
    };
    backend.download(job, &mut hook).await
}

struct ChannelProgressHook {
    tracker: ProgressTracker,
    events: mpsc::Sender<EngineEvent>,
}

impl ProgressHook for ChannelProgressHook {
    fn report(&mut self, progress: RawProgress) {
        if let Some(event) = self.tracker.observe(&progress) {
            let _ = self.events.send(EngineEvent::Progress(event));
        }
    }
}
