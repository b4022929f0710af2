use core::{fmt, num::ParseIntError, str::FromStr};

use crate::decompose::Decomposition;

/// A 64-bit Snowflake ID with separate partition and node fields.
///
/// - 1 bit reserved (always zero)
/// - 41 bits timestamp (ms since the generator's epoch)
/// - 5 bits partition ID
/// - 5 bits node ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            22 21             17 16        12 11             0
///              +--------------+----------------+-----------------+------------+---------------+
///  Field:      | reserved (1) | timestamp (41) | partition (5)   | node (5)   | sequence (12) |
///              +--------------+----------------+-----------------+------------+---------------+
///              |<------------------- MSB ------------- 64 bits ------------ LSB -------------->|
/// ```
///
/// The widths and shifts are a stable wire contract: any system parsing these
/// IDs must use the same constants.
///
/// # Example
///
/// ```
/// use flakeid::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 3, 30, 7);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.partition_id(), 3);
/// assert_eq!(id.node_id(), 30);
/// assert_eq!(id.sequence(), 7);
/// assert_eq!(id.to_string(), id.to_u64().to_string());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Width of the timestamp field.
    pub const TIMESTAMP_BITS: u32 = 41;
    /// Width of the partition ID field.
    pub const PARTITION_ID_BITS: u32 = 5;
    /// Width of the node ID field.
    pub const NODE_ID_BITS: u32 = 5;
    /// Width of the sequence field.
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for extracting the 41-bit timestamp field. Occupies bits 22
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for extracting the 5-bit partition ID field. Occupies bits 17
    /// through 21.
    pub const PARTITION_ID_MASK: u64 = (1 << Self::PARTITION_ID_BITS) - 1;

    /// Bitmask for extracting the 5-bit node ID field. Occupies bits 12
    /// through 16.
    pub const NODE_ID_MASK: u64 = (1 << Self::NODE_ID_BITS) - 1;

    /// Bitmask for extracting the combined 10-bit partition and node field.
    /// Occupies bits 12 through 21.
    pub const MACHINE_ID_MASK: u64 =
        (1 << (Self::PARTITION_ID_BITS + Self::NODE_ID_BITS)) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u32 =
        Self::PARTITION_ID_SHIFT + Self::PARTITION_ID_BITS;

    /// Number of bits to shift the partition ID to its position (bit 17).
    pub const PARTITION_ID_SHIFT: u32 = Self::NODE_ID_SHIFT + Self::NODE_ID_BITS;

    /// Number of bits to shift the node ID to its position (bit 12).
    pub const NODE_ID_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;

    /// Number of bits to shift the combined machine field (bit 12).
    pub const MACHINE_ID_SHIFT: u32 = Self::NODE_ID_SHIFT;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// Packs the given components into an ID. Each component is masked to its
    /// field width, so oversized values never bleed into neighbouring fields.
    pub const fn from_components(
        timestamp: u64,
        partition_id: u64,
        node_id: u64,
        sequence: u64,
    ) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let partition_id = (partition_id & Self::PARTITION_ID_MASK) << Self::PARTITION_ID_SHIFT;
        let node_id = (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | partition_id | node_id | sequence,
        }
    }

    /// Wraps a raw value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw packed value.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the ID as an unsigned 64-bit integer.
    pub const fn to_u64(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp (ms since epoch) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the partition ID from the packed ID.
    pub const fn partition_id(&self) -> u64 {
        (self.id >> Self::PARTITION_ID_SHIFT) & Self::PARTITION_ID_MASK
    }

    /// Extracts the node ID from the packed ID.
    pub const fn node_id(&self) -> u64 {
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Extracts the combined partition and node bits as one 10-bit value.
    pub const fn machine_id(&self) -> u64 {
        (self.id >> Self::MACHINE_ID_SHIFT) & Self::MACHINE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    /// Returns the largest value the timestamp field can hold.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Returns the largest value the partition and node fields can hold.
    pub const fn max_partition_id() -> u64 {
        Self::PARTITION_ID_MASK
    }

    /// See [`SnowflakeId::max_partition_id`].
    pub const fn max_node_id() -> u64 {
        Self::NODE_ID_MASK
    }

    /// Returns the largest value the sequence field can hold.
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns `true` if the reserved high bit is clear, i.e. the value could
    /// have been produced by a generator.
    pub const fn is_valid(&self) -> bool {
        self.id >> (Self::TIMESTAMP_SHIFT + Self::TIMESTAMP_BITS) == 0
    }

    /// Returns the ID as a zero-padded 20-digit string.
    ///
    /// Padded strings sort lexicographically in the same order as the IDs
    /// themselves.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }

    /// Splits the ID into its fields. See [`crate::decompose`].
    pub const fn decompose(&self) -> Decomposition {
        crate::decompose::decompose(*self)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("0x{:016x} ({})", self.id, self.id))
            .field("timestamp", &self.timestamp())
            .field("partition_id", &self.partition_id())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_u64()
    }
}

impl FromStr for SnowflakeId {
    type Err = ParseIntError;

    /// Parses the decimal form produced by [`fmt::Display`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::from_raw)
    }
}
