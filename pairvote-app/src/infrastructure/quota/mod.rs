mod clock;
mod quota_tracker;

pub use clock::{Clock, SystemClock};
pub use quota_tracker::{civil_date, QuotaLimits, QuotaTracker};
