use std::sync::Arc;

use core::cmp::Ordering;
use core::fmt;
use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Error, FLAKE_EPOCH, FlakeId, IdentityField, RandSource, TimeSource};

const EPOCH_MILLIS: u64 = FLAKE_EPOCH.as_millis() as u64;

/// Number of distinct values a freshly seeded sequence may start from.
///
/// Each time a new millisecond begins, the sequence restarts at a random
/// value in `[0, 10)` rather than at zero. This spreads low-order bits across
/// a range even under low load, so two generators that were misconfigured
/// with colliding identity fields are less likely to emit identical IDs in
/// the same millisecond. Values below 10 always fit the 8-bit sequence field,
/// so no second mask is applied.
const SEQUENCE_SEED_RANGE: u64 = 10;

/// Allocation state. Mutated only while the generator's lock is held.
struct AllocState {
    /// Wall-clock milliseconds of the last allocation, `None` before the
    /// first one.
    last_millis: Option<u64>,
    sequence: u64,
}

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// The generator packs a timestamp offset, the region/worker/business
/// identity fixed at construction, and a per-millisecond sequence counter
/// into one [`FlakeId`]. Allocation state lives in an [`Arc<Mutex<_>>`],
/// allowing safe shared use across threads: the entire allocation, from clock
/// read to state update, runs under the lock, so exactly one allocation
/// proceeds at a time per instance.
///
/// When the 8-bit sequence is exhausted within a single millisecond, the
/// allocating thread busy-polls the clock until the next millisecond begins,
/// still holding the lock. Concurrent callers block for that duration, which
/// is bounded by one clock tick.
///
/// Multiple generators with distinct identities may coexist in one process,
/// each with its own state.
///
/// # Example
/// ```
/// use flakeid::{LockFlakeGenerator, ThreadRandom, WallClock};
///
/// let generator = LockFlakeGenerator::new(1, 1, 2, WallClock, ThreadRandom)
///     .expect("identity fields in range");
///
/// let id = generator.next_id().expect("clock did not move backwards");
/// assert_eq!(id.region_id(), 1);
/// assert_eq!(id.worker_id(), 1);
/// assert_eq!(id.business_id(), 2);
/// ```
#[derive(Clone)]
pub struct LockFlakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    region_id: u64,
    worker_id: u64,
    business_id: u64,
    state: Arc<Mutex<AllocState>>,
    time: T,
    rand: R,
}

impl<T, R> LockFlakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    /// Creates a new [`LockFlakeGenerator`] with a fixed identity.
    ///
    /// # Parameters
    ///
    /// - `region_id`: deployment location, in `[0, 3]`
    /// - `worker_id`: machine within the region, in `[0, 127]`
    /// - `business_id`: logical service line, in `[0, 127]`
    /// - `time`: a [`TimeSource`] (e.g. [`WallClock`]) read on every
    ///   allocation
    /// - `rand`: a [`RandSource`] (e.g. [`ThreadRandom`]) used to seed the
    ///   sequence on each fresh millisecond
    ///
    /// Identity fields are validated once, here; the generator trusts its
    /// caller to keep them collision-free across instances.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentity`] naming the offending field if any
    /// id exceeds its bit width.
    ///
    /// [`WallClock`]: crate::WallClock
    /// [`ThreadRandom`]: crate::ThreadRandom
    pub fn new(
        region_id: u64,
        worker_id: u64,
        business_id: u64,
        time: T,
        rand: R,
    ) -> Result<Self, Error> {
        if region_id > FlakeId::max_region_id() {
            return Err(Error::InvalidIdentity {
                field: IdentityField::Region,
                value: region_id,
                max: FlakeId::max_region_id(),
            });
        }
        if worker_id > FlakeId::max_worker_id() {
            return Err(Error::InvalidIdentity {
                field: IdentityField::Worker,
                value: worker_id,
                max: FlakeId::max_worker_id(),
            });
        }
        if business_id > FlakeId::max_business_id() {
            return Err(Error::InvalidIdentity {
                field: IdentityField::Business,
                value: business_id,
                max: FlakeId::max_business_id(),
            });
        }

        Ok(Self {
            region_id,
            worker_id,
            business_id,
            state: Arc::new(Mutex::new(AllocState {
                last_millis: None,
                sequence: 0,
            })),
            time,
            rand,
        })
    }

    /// Returns the region id encoded into every generated ID.
    pub fn region_id(&self) -> u64 {
        self.region_id
    }

    /// Returns the worker id encoded into every generated ID.
    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// Returns the business id encoded into every generated ID.
    pub fn business_id(&self) -> u64 {
        self.business_id
    }

    /// Generates the next available ID.
    ///
    /// Safe to call concurrently; callers serialize on the instance lock. If
    /// the sequence is exhausted within the current millisecond, the call
    /// blocks (spinning on the clock) until the millisecond advances, then
    /// succeeds with a freshly seeded sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the time source reports a time
    /// earlier than the last recorded allocation. Allocation state is left
    /// unchanged, so the caller may retry once the clock recovers.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<FlakeId, Error> {
        let mut state = self.state.lock();
        let mut now = self.time.current_millis();

        match state.last_millis {
            Some(last) => match now.cmp(&last) {
                Ordering::Less => return Err(Self::cold_clock_behind(last, now)),
                Ordering::Equal => {
                    state.sequence = (state.sequence + 1) & FlakeId::max_sequence();
                    if state.sequence == 0 {
                        // Sequence space exhausted for this millisecond.
                        now = self.wait_until_next_millis(last);
                        state.sequence = self.seed_sequence();
                    }
                }
                Ordering::Greater => state.sequence = self.seed_sequence(),
            },
            // First allocation: treated like a fresh millisecond.
            None => state.sequence = self.seed_sequence(),
        }
        state.last_millis = Some(now);

        Ok(FlakeId::from_components(
            now - EPOCH_MILLIS,
            self.region_id,
            self.worker_id,
            self.business_id,
            state.sequence,
        ))
    }

    /// Busy-polls the time source until it advances strictly past `last`.
    ///
    /// Runs while the allocation lock is held; all other callers block until
    /// the clock reaches the next millisecond.
    fn wait_until_next_millis(&self, last: u64) -> u64 {
        let mut now = self.time.current_millis();
        while now <= last {
            core::hint::spin_loop();
            now = self.time.current_millis();
        }
        now
    }

    fn seed_sequence(&self) -> u64 {
        self.rand.rand() % SEQUENCE_SEED_RANGE
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        Error::ClockRegression {
            last_millis: last,
            now_millis: now,
        }
    }
}

impl<T, R> fmt::Debug for LockFlakeGenerator<T, R>
where
    T: TimeSource,
    R: RandSource,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockFlakeGenerator")
            .field("region_id", &self.region_id)
            .field("worker_id", &self.worker_id)
            .field("business_id", &self.business_id)
            .finish_non_exhaustive()
    }
}
