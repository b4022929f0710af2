//! Coordination-free, time-ordered 64-bit Snowflake IDs.
//!
//! Each [`Generator`] owns a node ID and a partition ID (5 bits each) and packs
//! them together with a 41-bit millisecond timestamp and a 12-bit sequence:
//!
//! ```text
//! [ 0 | timestamp (41) | partition (5) | node (5) | sequence (12) ]
//! ```
//!
//! ```
//! use flakeid::{Generator, decompose};
//!
//! let generator = Generator::new(30, 3)?;
//! let id = generator.generate()?;
//!
//! let parts = decompose(id);
//! assert_eq!(parts.node_id, 30);
//! assert_eq!(parts.partition_id, 3);
//! println!("{id} -> {:?}", parts.fields());
//! # Ok::<(), flakeid::Error>(())
//! ```
//!
//! ## Features
//!
//! - `tracing`: trace-level spans around generation and a warning event when
//!   the clock moves backward.
//! - `serde`: `Serialize`/`Deserialize` for [`SnowflakeId`] and
//!   [`Decomposition`], plus `#[serde(with = ...)]` adapters.
//! - `cache-padded`: pads the generator's lock to a cache line.
//! - `async-tokio`: `Generator::generate_async` with Tokio sleep providers.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod decompose;
mod error;
#[cfg(feature = "async-tokio")]
mod futures;
mod generator;
mod id;
#[cfg(feature = "serde")]
pub mod serde;
mod time;

pub use crate::decompose::*;
pub use crate::error::*;
#[cfg_attr(docsrs, doc(cfg(feature = "async-tokio")))]
#[cfg(feature = "async-tokio")]
pub use crate::futures::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
