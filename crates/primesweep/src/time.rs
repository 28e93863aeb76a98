use chrono::{DateTime, Local};
use core::fmt;

/// Format used for discovery timestamps, e.g. `2025-03-14 09:26:53.589`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A source of wall-clock instants used to stamp matches.
///
/// This abstraction lets tests pin the clock so streamed output is
/// reproducible.
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Local, TimeZone};
/// use primesweep::TimeSource;
///
/// struct FixedTime(DateTime<Local>);
/// impl TimeSource for FixedTime {
///     fn now(&self) -> DateTime<Local> {
///         self.0
///     }
/// }
///
/// let instant = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(FixedTime(instant).now(), instant);
/// ```
pub trait TimeSource: Send + Sync {
    /// Returns the current instant in local time.
    fn now(&self) -> DateTime<Local>;
}

/// The system clock in the local time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Display adapter rendering an instant with millisecond precision.
#[derive(Debug, Clone, Copy)]
pub struct Timestamp<'a>(pub &'a DateTime<Local>);

impl fmt::Display for Timestamp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}
