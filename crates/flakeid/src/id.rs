use core::fmt;

/// A 64-bit ID partitioned by region, worker, and business line.
///
/// - 1 bit reserved (always zero)
/// - 39 bits timestamp (ms since [`FLAKE_EPOCH`])
/// - 2 bits region id
/// - 7 bits worker id
/// - 7 bits business id
/// - 8 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            24 23        22 21         15 14            8 7            0
///              +--------------+----------------+------------+-------------+---------------+--------------+
///  Field:      | reserved (1) | timestamp (39) | region (2) | worker (7)  | business (7)  | sequence (8) |
///              +--------------+----------------+------------+-------------+---------------+--------------+
///              |<------------------------ MSB --------- 64 bits --------- LSB ------------------------->|
/// ```
/// [`FLAKE_EPOCH`]: crate::FLAKE_EPOCH
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    /// Bitmask for extracting the 39-bit timestamp field. Occupies bits 24
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 39) - 1;

    /// Bitmask for extracting the 2-bit region id field. Occupies bits 22
    /// through 23.
    pub const REGION_ID_MASK: u64 = (1 << 2) - 1;

    /// Bitmask for extracting the 7-bit worker id field. Occupies bits 15
    /// through 21.
    pub const WORKER_ID_MASK: u64 = (1 << 7) - 1;

    /// Bitmask for extracting the 7-bit business id field. Occupies bits 8
    /// through 14.
    pub const BUSINESS_ID_MASK: u64 = (1 << 7) - 1;

    /// Bitmask for extracting the 8-bit sequence field. Occupies bits 0
    /// through 7.
    pub const SEQUENCE_MASK: u64 = (1 << 8) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 24).
    pub const TIMESTAMP_SHIFT: u64 = 24;

    /// Number of bits to shift the region id to its correct position (bit 22).
    pub const REGION_ID_SHIFT: u64 = 22;

    /// Number of bits to shift the worker id to its correct position (bit 15).
    pub const WORKER_ID_SHIFT: u64 = 15;

    /// Number of bits to shift the business id to its correct position (bit 8).
    pub const BUSINESS_ID_SHIFT: u64 = 8;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    pub const fn from(
        timestamp: u64,
        region_id: u64,
        worker_id: u64,
        business_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let region_id = (region_id & Self::REGION_ID_MASK) << Self::REGION_ID_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let business_id = (business_id & Self::BUSINESS_ID_MASK) << Self::BUSINESS_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | region_id | worker_id | business_id | sequence,
        }
    }

    /// Constructs a new ID from its components, checking field widths.
    pub fn from_components(
        timestamp: u64,
        region_id: u64,
        worker_id: u64,
        business_id: u64,
        sequence: u64,
    ) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(region_id <= Self::REGION_ID_MASK, "region_id overflow");
        debug_assert!(worker_id <= Self::WORKER_ID_MASK, "worker_id overflow");
        debug_assert!(business_id <= Self::BUSINESS_ID_MASK, "business_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, region_id, worker_id, business_id, sequence)
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the region id from the packed ID.
    pub const fn region_id(&self) -> u64 {
        (self.id >> Self::REGION_ID_SHIFT) & Self::REGION_ID_MASK
    }

    /// Extracts the worker id from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the business id from the packed ID.
    pub const fn business_id(&self) -> u64 {
        (self.id >> Self::BUSINESS_ID_SHIFT) & Self::BUSINESS_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the maximum representable timestamp value.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the maximum representable region id.
    pub const fn max_region_id() -> u64 {
        Self::REGION_ID_MASK
    }

    /// Returns the maximum representable worker id.
    pub const fn max_worker_id() -> u64 {
        Self::WORKER_ID_MASK
    }

    /// Returns the maximum representable business id.
    pub const fn max_business_id() -> u64 {
        Self::BUSINESS_ID_MASK
    }

    /// Returns the maximum representable sequence value.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Converts this ID into its raw `u64` representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Converts a raw `u64` into this type.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("region_id", &self.region_id())
            .field("worker_id", &self.worker_id())
            .field("business_id", &self.business_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flake_id_fields_and_bounds() {
        let ts = FlakeId::max_timestamp();
        let region = FlakeId::max_region_id();
        let worker = FlakeId::max_worker_id();
        let business = FlakeId::max_business_id();
        let seq = FlakeId::max_sequence();

        let id = FlakeId::from(ts, region, worker, business, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.region_id(), region);
        assert_eq!(id.worker_id(), worker);
        assert_eq!(id.business_id(), business);
        assert_eq!(id.sequence(), seq);
        assert_eq!(FlakeId::from_components(ts, region, worker, business, seq), id);
    }

    #[test]
    fn reserved_bit_is_always_zero() {
        let id = FlakeId::from(
            FlakeId::max_timestamp(),
            FlakeId::max_region_id(),
            FlakeId::max_worker_id(),
            FlakeId::max_business_id(),
            FlakeId::max_sequence(),
        );
        assert_eq!(id.to_raw() >> 63, 0);
    }

    #[test]
    fn raw_round_trip() {
        let id = FlakeId::from(1000, 2, 17, 99, 42);
        assert_eq!(FlakeId::from_raw(id.to_raw()), id);
        assert_eq!(id.to_padded_string().len(), 20);
    }

    #[test]
    fn newer_timestamp_sorts_higher() {
        let older = FlakeId::from(1000, 3, 127, 127, 255);
        let newer = FlakeId::from(1001, 0, 0, 0, 0);
        assert!(newer > older);
    }

    #[test]
    #[should_panic(expected = "timestamp overflow")]
    fn timestamp_overflow_panics() {
        let ts = FlakeId::max_timestamp() + 1;
        FlakeId::from_components(ts, 0, 0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "region_id overflow")]
    fn region_id_overflow_panics() {
        let region = FlakeId::max_region_id() + 1;
        FlakeId::from_components(0, region, 0, 0, 0);
    }

    #[test]
    #[should_panic(expected = "worker_id overflow")]
    fn worker_id_overflow_panics() {
        let worker = FlakeId::max_worker_id() + 1;
        FlakeId::from_components(0, 0, worker, 0, 0);
    }

    #[test]
    #[should_panic(expected = "business_id overflow")]
    fn business_id_overflow_panics() {
        let business = FlakeId::max_business_id() + 1;
        FlakeId::from_components(0, 0, 0, business, 0);
    }

    #[test]
    #[should_panic(expected = "sequence overflow")]
    fn sequence_overflow_panics() {
        let seq = FlakeId::max_sequence() + 1;
        FlakeId::from_components(0, 0, 0, 0, seq);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let id = FlakeId::from(1000, 2, 17, 99, 42);
        let json = serde_json::to_string(&id).unwrap();
        let back: FlakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
