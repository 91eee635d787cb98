//! Numeric word encoding with byte order support
//!
//! Provides functions for converting between:
//! - `i64` values ↔ 1/2/4/8-byte integer words (through the layout tables)
//! - `f32`/`f64` values ↔ IEEE-754 bit patterns in a given byte order
//!
//! Floats never go through the layout tables: their bit pattern is taken with
//! `to_bits`, swapped when the requested order differs from the host, and
//! stored in host order.

use super::byte_order::{layout, swap32, swap64, ByteOrder, WordWidth};

// ============================================================================
// Integer Words
// ============================================================================

/// Write the low `width` bytes of `value` into `dst` in the given order
///
/// Higher bytes are dropped, so `-1000` written as a 4-byte word becomes
/// `0xFFFFFC18`. `dst` must hold at least `width.bytes()` bytes.
pub fn write_integer(value: i64, width: WordWidth, order: ByteOrder, dst: &mut [u8]) {
    let image = value.to_le_bytes();
    for (byte, &index) in dst.iter_mut().zip(layout(width, order)) {
        *byte = image[index];
    }
}

/// Read a `width`-byte word from `src`, sign- or zero-extending it to `i64`
///
/// 64-bit words are returned as their two's complement bit pattern, so
/// unsigned values above `i64::MAX` come back negative.
pub fn read_integer(src: &[u8], width: WordWidth, order: ByteOrder, signed: bool) -> i64 {
    let mut image = [0u8; 8];
    for (&byte, &index) in src.iter().zip(layout(width, order)) {
        image[index] = byte;
    }
    let raw = u64::from_le_bytes(image);

    let shift = 64 - 8 * width.bytes() as u32;
    if signed && shift > 0 {
        ((raw << shift) as i64) >> shift
    } else {
        raw as i64
    }
}

// ============================================================================
// IEEE-754 Floats
// ============================================================================

/// Encode an `f32` as 4 bytes in the given order
pub fn f32_to_bytes(value: f32, order: ByteOrder) -> [u8; 4] {
    let bits = value.to_bits();
    let bits = if order.needs_swap() { swap32(bits) } else { bits };
    bits.to_ne_bytes()
}

/// Encode an `f64` as 8 bytes in the given order
pub fn f64_to_bytes(value: f64, order: ByteOrder) -> [u8; 8] {
    let bits = value.to_bits();
    let bits = if order.needs_swap() { swap64(bits) } else { bits };
    bits.to_ne_bytes()
}

/// Decode 4 bytes in the given order to `f32`
pub fn bytes_to_f32(bytes: &[u8; 4], order: ByteOrder) -> f32 {
    let bits = u32::from_ne_bytes(*bytes);
    f32::from_bits(if order.needs_swap() { swap32(bits) } else { bits })
}

/// Decode 8 bytes in the given order to `f64`
pub fn bytes_to_f64(bytes: &[u8; 8], order: ByteOrder) -> f64 {
    let bits = u64::from_ne_bytes(*bytes);
    f64::from_bits(if order.needs_swap() { swap64(bits) } else { bits })
}

/// Copy the first `N` bytes of `src` into an array
///
/// Callers bounds-check `src` before decoding a field.
pub(crate) fn word<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&src[..N]);
    out
}
