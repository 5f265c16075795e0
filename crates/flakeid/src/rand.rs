use rand::{Rng, rng};

/// A trait for random sources that return random integers.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests. The generator only ever uses a small remainder of
/// the returned value, so implementations need not bound their output.
///
/// # Example
/// ```
/// use flakeid::RandSource;
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource {
    /// Returns a random integer.
    fn rand(&self) -> u64;
}

/// A [`RandSource`] that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, automatically reseeded periodically, and more than
/// strong enough for sequence seeding.
///
/// Each OS thread has its own RNG instance, so calls from multiple threads
/// are contention-free. This type does **not** store the RNG itself; it
/// simply accesses the thread-local generator on each call, which is why the
/// wrapper itself may be freely shared across threads.
#[derive(Default, Clone, Debug)]
pub struct ThreadRandom;

impl RandSource for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}
