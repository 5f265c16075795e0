use core::fmt;
use thiserror::Error;

/// The identity fields validated when a generator is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentityField {
    Region,
    Worker,
    Business,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region => write!(f, "region"),
            Self::Worker => write!(f, "worker"),
            Self::Business => write!(f, "business"),
        }
    }
}

/// All errors that `flakeid` can produce.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A region, worker, or business id exceeded its field's bit width.
    ///
    /// Raised once, at construction. The caller must supply a corrected value
    /// and retry construction.
    #[error("{field} id {value} out of range [0, {max}]")]
    InvalidIdentity {
        field: IdentityField,
        value: u64,
        max: u64,
    },

    /// The host clock reported a time earlier than the last recorded
    /// allocation.
    ///
    /// The generator never corrects for this itself; the caller decides
    /// whether to wait, alert, or abort. Allocation state is left unchanged,
    /// so a later call with a recovered clock proceeds normally.
    #[error(
        "clock moved backwards: last allocation at {last_millis} ms, clock reports {now_millis} ms"
    )]
    ClockRegression { last_millis: u64, now_millis: u64 },
}
