pub mod status;
pub mod filter;
pub mod diff;
pub mod update;
pub mod sync;

pub use status::{normalize_status, normalize_token};
pub use filter::latest_watch_records;
pub use diff::{diff, NormalizedRecord};
pub use update::{prepare_update, write_decision, WriteDecision};
pub use sync::{CycleSummary, ItemOutcome, ItemReport, PacingPolicy, SyncDriver, SyncOptions};
