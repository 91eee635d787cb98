//! Hex nibble packing for the `h`/`H` directives
//!
//! `h` stores the low nibble of each byte first, `H` the high nibble first.
//! Rendering always produces lowercase ASCII digits.

/// Which nibble of a byte is filled (or read) first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NibbleOrder {
    /// `h`: low nibble first
    LowFirst,
    /// `H`: high nibble first
    HighFirst,
}

impl NibbleOrder {
    const fn first_shift(self) -> u32 {
        match self {
            Self::LowFirst => 0,
            Self::HighFirst => 4,
        }
    }
}

/// Value of an ASCII hex digit, either case
#[inline]
pub fn hex_digit_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Pack ASCII hex digits two per byte into `dst`
///
/// Invalid digits are passed to `on_invalid` and stored as 0. Each touched
/// byte is cleared before its first nibble is written. Returns the number of
/// bytes touched, `ceil(digits.len() / 2)`; `dst` must be at least that long.
pub fn pack_nibbles(
    digits: &[u8],
    order: NibbleOrder,
    dst: &mut [u8],
    mut on_invalid: impl FnMut(u8),
) -> usize {
    let mut shift = order.first_shift();
    for (i, &c) in digits.iter().enumerate() {
        let nibble = hex_digit_value(c).unwrap_or_else(|| {
            on_invalid(c);
            0
        });

        let byte = &mut dst[i / 2];
        if i % 2 == 0 {
            *byte = 0;
        }
        *byte |= nibble << shift;
        shift = (shift + 4) & 7;
    }
    digits.len().div_ceil(2)
}

/// Render `count` nibbles of `src` as lowercase ASCII hex
///
/// `src` must hold at least `ceil(count / 2)` bytes.
pub fn render_nibbles(src: &[u8], count: usize, order: NibbleOrder) -> Vec<u8> {
    let mut out = Vec::with_capacity(count);
    let mut shift = order.first_shift();
    for i in 0..count {
        let nibble = (src[i / 2] >> shift) & 0x0F;
        out.push(if nibble < 10 {
            b'0' + nibble
        } else {
            b'a' + nibble - 10
        });
        shift = (shift + 4) & 7;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_digit_value() {
        assert_eq!(hex_digit_value(b'0'), Some(0));
        assert_eq!(hex_digit_value(b'9'), Some(9));
        assert_eq!(hex_digit_value(b'a'), Some(10));
        assert_eq!(hex_digit_value(b'F'), Some(15));
        assert_eq!(hex_digit_value(b'g'), None);
        assert_eq!(hex_digit_value(b' '), None);
    }

    #[test]
    fn test_pack_high_first() {
        let mut buf = [0u8; 2];
        let used = pack_nibbles(b"1234", NibbleOrder::HighFirst, &mut buf, |_| {});
        assert_eq!(used, 2);
        assert_eq!(buf, [0x12, 0x34]);
    }

    #[test]
    fn test_pack_low_first() {
        let mut buf = [0u8; 2];
        pack_nibbles(b"1234", NibbleOrder::LowFirst, &mut buf, |_| {});
        assert_eq!(buf, [0x21, 0x43]);
    }

    #[test]
    fn test_pack_odd_length_clears_stale_byte() {
        let mut buf = [0xFFu8; 2];
        let used = pack_nibbles(b"abc", NibbleOrder::HighFirst, &mut buf, |_| {});
        assert_eq!(used, 2);
        assert_eq!(buf, [0xAB, 0xC0]);
    }

    #[test]
    fn test_pack_invalid_digit_becomes_zero() {
        let mut buf = [0u8; 1];
        let mut invalid = Vec::new();
        pack_nibbles(b"z7", NibbleOrder::HighFirst, &mut buf, |c| invalid.push(c));
        assert_eq!(buf, [0x07]);
        assert_eq!(invalid, vec![b'z']);
    }

    #[test]
    fn test_render() {
        assert_eq!(render_nibbles(&[0x12, 0xAB], 4, NibbleOrder::HighFirst), b"12ab");
        assert_eq!(render_nibbles(&[0x12, 0xAB], 4, NibbleOrder::LowFirst), b"21ba");
        assert_eq!(render_nibbles(&[0x40], 1, NibbleOrder::HighFirst), b"4");
        assert!(render_nibbles(&[], 0, NibbleOrder::HighFirst).is_empty());
    }
}
