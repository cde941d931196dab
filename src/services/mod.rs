pub mod pulse;

pub use pulse::{PulseHandle, PulseService, RefreshClock};
