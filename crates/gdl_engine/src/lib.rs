//! GDL engine: worker pool and the boundary to the external extractor/downloader.
mod backend;
mod engine;
mod error;
mod media;
mod persist;
mod progress;
mod sanitize;
mod types;
mod ytdlp;

pub use backend::{MediaBackend, ProgressHook};
pub use engine::{EngineConfig, EngineEvents, EngineHandle};
pub use error::{DownloadError, EngineError, ExtractionError};
pub use media::{MediaFormat, MediaInfo};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use progress::{size_and_percent, ProgressStatus, ProgressTracker, RawProgress};
pub use sanitize::{strip_ansi, user_message};
pub use types::{DownloadJob, EngineEvent, MediaKind, ProgressEvent, TaskId, TransferPhase};
pub use ytdlp::{YtDlpBackend, YtDlpSettings};
