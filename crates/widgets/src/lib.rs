pub mod clock;
pub mod dashboard;
pub mod faults;

pub use clock::{clock_labels, date_suffix, Label};
pub use dashboard::Dashboard;
pub use faults::FaultLog;
