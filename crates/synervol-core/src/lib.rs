pub mod error;
pub mod ids;
pub mod scan;
pub mod time;

pub use error::{ErrorCode, SvError, SvResult};
pub use ids::{DispatchId, SessionId};
pub use scan::ScanType;
pub use time::{millis_since, now_epoch_millis, EpochMillis};
