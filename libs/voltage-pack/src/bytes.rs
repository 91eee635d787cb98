//! Binary layout utilities
//!
//! Provides the byte order tables, integer/float word encoding and hex nibble
//! packing that the pack and unpack engines share.
//!
//! # Design Principles
//!
//! - **Portable**: no memory reinterpretation, only shifts, masks and `to_bits`
//! - **Compile-time tables**: host order comes from `target_endian`
//! - **Type-safe**: `ByteOrder` and `WordWidth` enums instead of raw sizes

pub mod byte_order;
pub mod conversions;
pub mod hex;

pub use byte_order::{ByteOrder, WordWidth};
pub use conversions::*;
pub use hex::NibbleOrder;
