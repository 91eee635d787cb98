//! voltage-pack - Format-string driven binary codec for VoltageEMS
//!
//! Builds and parses byte buffers the way PHP's `pack()`/`unpack()` do, so
//! payloads exchanged with PHP tooling round-trip byte for byte.
//!
//! # Features
//!
//! - **Fixed directive alphabet**: strings, hex, 8/16/32/64-bit integers,
//!   floats and doubles in machine, big-endian or little-endian order
//! - **Portable encoding**: layout tables and `to_bits`, no memory reinterpretation
//! - **Non-fatal diagnostics**: routed to a [`DiagnosticSink`], logged with `tracing` by default
//! - **Configurable**: [`CodecConfig`] loads from files and `VOLTAGE_PACK_*` variables via figment
//!
//! # Example
//!
//! ```rust
//! use voltage_pack::{pack, scalars, unpack, Value};
//!
//! let bytes = pack("nA4C", &scalars![0x1234, "ab", 7]).unwrap();
//! assert_eq!(bytes, b"\x12\x34ab  \x07");
//!
//! let fields = unpack("nid/A4tag/Cflag", &bytes, 0).unwrap();
//! assert_eq!(fields.get("id"), Some(&Value::Int(0x1234)));
//! assert_eq!(fields.get("tag"), Some(&Value::Bytes(b"ab".to_vec())));
//! assert_eq!(fields.get("flag"), Some(&Value::Int(7)));
//! ```
//!
//! # Directives
//!
//! | Code | Width | Meaning |
//! |------|-------|---------|
//! | `a` `A` `Z` | repeat | NUL-padded, space-padded, NUL-terminated string |
//! | `h` `H` | repeat / 2 | Hex string, low or high nibble first |
//! | `c` `C` | 1 | Signed / unsigned char |
//! | `s` `S` | 2 | Signed / unsigned short, machine order |
//! | `n` `v` | 2 | Unsigned short, big / little endian |
//! | `i` `I` `l` `L` | 4 | Signed / unsigned int, machine order |
//! | `N` `V` | 4 | Unsigned long, big / little endian |
//! | `q` `Q` | 8 | Signed / unsigned long long, machine order |
//! | `J` `P` | 8 | Unsigned long long, big / little endian |
//! | `f` `g` `G` | 4 | Float: machine, little, big endian |
//! | `d` `e` `E` | 8 | Double: machine, little, big endian |
//! | `x` `X` `@` | - | NUL byte, back up one byte, absolute position |
//!
//! A repeat of `*` consumes all remaining arguments (pack) or input (unpack).

pub mod bytes;
pub mod config;
pub mod diagnostics;
pub mod directive;
pub mod error;
pub mod format;
pub mod pack;
pub mod scalar;
pub mod unpack;
pub mod value;

// Re-exports for convenience
pub use bytes::{ByteOrder, WordWidth};
pub use config::{Codec, CodecConfig};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticLevel, DiagnosticSink, TracingSink};
pub use error::{PackError, Result};
pub use format::{parse_format, parse_groups, FormatProgram, Repeat};
pub use pack::PackPlan;
pub use scalar::Scalar;
pub use value::{Unpacked, Value};

/// Pack `args` with the default codec; diagnostics are logged at WARN
pub fn pack(format: &str, args: &[Scalar]) -> Result<Vec<u8>> {
    Codec::default().pack(format, args)
}

/// Pack `args` with the default codec, reporting diagnostics to `sink`
pub fn pack_with(format: &str, args: &[Scalar], sink: &mut dyn DiagnosticSink) -> Result<Vec<u8>> {
    Codec::default().pack_with(format, args, sink)
}

/// Unpack `input[offset..]` with the default codec
pub fn unpack(format: &str, input: &[u8], offset: usize) -> Result<Unpacked> {
    Codec::default().unpack(format, input, offset)
}

/// Unpack `input[offset..]` with the default codec, reporting diagnostics to `sink`
pub fn unpack_with(
    format: &str,
    input: &[u8],
    offset: usize,
    sink: &mut dyn DiagnosticSink,
) -> Result<Unpacked> {
    Codec::default().unpack_with(format, input, offset, sink)
}
