//! GDL core: pure state machine and view-model helpers.
mod effect;
mod media;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{DownloadRequest, Effect};
pub use media::{MediaSummary, StreamDescriptor};
pub use msg::Msg;
pub use state::{AppState, MediaKind, ProgressUpdate, TaskId, TransferStatus};
pub use update::update;
pub use view_model::{format_duration, AppViewModel, SelectionView, StreamChoiceView, TaskRowView};
