use core::time::Duration;

use crate::id::SnowflakeId;

/// The fields of a [`SnowflakeId`], as returned by [`decompose`].
///
/// `machine_id` carries the combined 10-bit partition and node field, which is
/// what existing consumers of the decomposition expect. The same bits are also
/// split into `partition_id` and `node_id`.
///
/// With the `serde` feature this serializes as a map using the keys listed in
/// [`Decomposition::fields`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Decomposition {
    /// The raw ID.
    pub id: u64,
    /// Milliseconds since the generator's epoch.
    pub time: u64,
    /// Per-millisecond sequence counter.
    pub sequence: u64,
    /// Combined partition and node bits (`partition << 5 | node`).
    #[cfg_attr(feature = "serde", serde(rename = "machine-id"))]
    pub machine_id: u64,
    /// Partition identifier (bits 17..=21).
    #[cfg_attr(feature = "serde", serde(rename = "partition-id"))]
    pub partition_id: u64,
    /// Node identifier (bits 12..=16).
    #[cfg_attr(feature = "serde", serde(rename = "node-id"))]
    pub node_id: u64,
}

impl Decomposition {
    /// Stable key names, in the order [`Decomposition::fields`] yields them.
    pub const KEYS: [&'static str; 6] = [
        "id",
        "time",
        "sequence",
        "machine-id",
        "partition-id",
        "node-id",
    ];

    /// Returns `(key, value)` pairs for every field.
    pub const fn fields(&self) -> [(&'static str, u64); 6] {
        [
            (Self::KEYS[0], self.id),
            (Self::KEYS[1], self.time),
            (Self::KEYS[2], self.sequence),
            (Self::KEYS[3], self.machine_id),
            (Self::KEYS[4], self.partition_id),
            (Self::KEYS[5], self.node_id),
        ]
    }

    /// Looks up a field by its key.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.fields()
            .into_iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Converts `time` to milliseconds since the Unix epoch, given the epoch
    /// the ID was generated against. Saturates at `u64::MAX`.
    pub const fn unix_millis(&self, epoch: Duration) -> u64 {
        let epoch = epoch.as_millis();
        let epoch = if epoch > u64::MAX as u128 {
            u64::MAX
        } else {
            epoch as u64
        };
        self.time.saturating_add(epoch)
    }
}

/// Splits an ID into its timestamp, sequence and machine fields.
///
/// Total: any 64-bit value decomposes, whether or not a generator produced it.
///
/// # Example
///
/// ```
/// use flakeid::{SnowflakeId, decompose};
///
/// let id = SnowflakeId::from_components(42, 1, 2, 3);
/// let parts = decompose(id);
/// assert_eq!(parts.time, 42);
/// assert_eq!(parts.sequence, 3);
/// assert_eq!(parts.machine_id, (1 << 5) | 2);
/// assert_eq!(parts.get("machine-id"), Some(34));
/// ```
pub const fn decompose(id: SnowflakeId) -> Decomposition {
    Decomposition {
        id: id.to_u64(),
        time: id.to_u64() >> SnowflakeId::TIMESTAMP_SHIFT,
        sequence: id.sequence(),
        machine_id: id.machine_id(),
        partition_id: id.partition_id(),
        node_id: id.node_id(),
    }
}
