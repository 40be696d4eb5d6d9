pub mod history;
pub mod patch;
pub mod remote;
pub mod status;
pub mod watch_record;

pub use history::{HistoryAfter, HistoryContent, HistoryData, HistoryEvent, HistoryPage, WATCH_HISTORY_TYPE};
pub use patch::{EntryUpdate, Patch};
pub use remote::{RemoteEntry, RemoteMedia};
pub use status::{ListStatus, WatchStatus};
pub use watch_record::WatchRecord;
