use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generator epoch: Thursday, July 13, 2017 15:11:53.647 UTC
///
/// Every timestamp embedded in a [`FlakeId`] is the number of milliseconds
/// elapsed since this instant. Two deployments must share this constant for
/// their IDs to be comparable.
///
/// [`FlakeId`]: crate::FlakeId
pub const FLAKE_EPOCH: Duration = Duration::from_millis(1_499_958_713_647);

/// A trait for time sources that return the current wall-clock timestamp.
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// time source in tests.
///
/// The unit is **milliseconds since the Unix epoch**; the generator subtracts
/// [`FLAKE_EPOCH`] itself when packing IDs.
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

/// A time source that reads the host's wall clock on every call.
///
/// The clock is deliberately read raw, with no monotonic smoothing layered on
/// top: the generator's contract is to *detect* backward jumps and surface
/// them to the caller, which requires observing the wall clock as the host
/// reports it.
#[derive(Default, Clone, Debug)]
pub struct WallClock;

impl TimeSource for WallClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("System clock before UNIX_EPOCH")
            .as_millis() as u64
    }
}
