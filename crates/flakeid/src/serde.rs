//! Field adapters for `#[serde(with = ...)]`.
//!
//! [`SnowflakeId`] already serializes transparently as a `u64`. These modules
//! add validation on the way in, and a decimal-string form for consumers whose
//! number type cannot hold 64-bit integers exactly (JSON in JavaScript).

use serde::{
    Deserialize, Deserializer, Serializer,
    de::{self, Unexpected},
};

use crate::id::SnowflakeId;

const EXPECTED: &str = "a snowflake id with the reserved high bit clear";

fn validated<E: de::Error>(raw: u64) -> Result<SnowflakeId, E> {
    let id = SnowflakeId::from_raw(raw);
    if !id.is_valid() {
        return Err(E::invalid_value(Unexpected::Unsigned(raw), &EXPECTED));
    }
    Ok(id)
}

pub mod as_native {
    use super::{Deserialize, Deserializer, Serializer, validated};
    use crate::id::SnowflakeId;

    /// Serialize an ID as its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_u64(id.to_u64())
    }

    /// Deserialize an ID from its native integer representation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The value sets the reserved high bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        validated(u64::deserialize(d)?)
    }
}

pub mod as_decimal_str {
    use super::{Deserializer, Serializer, validated};
    use crate::id::SnowflakeId;

    /// Serialize an ID as a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// Deserialize an ID from a decimal string.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The underlying deserializer fails
    /// - The string is not a decimal `u64`
    /// - The value sets the reserved high bit
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal snowflake id string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                let raw = v.parse::<u64>().map_err(E::custom)?;
                validated(raw)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}
