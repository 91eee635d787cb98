//! Byte order resolution and the integer layout tables
//!
//! Integer directives coerce their argument to `i64` and lay it out from the
//! 8-byte little-endian image produced by [`i64::to_le_bytes`]. Each table maps
//! an output position inside a word to the index of the image byte that lands
//! there, so the same table drives both writing and reading.
//!
//! For the 32-bit value `0x12345678` written as a 4-byte word:
//! - `BigEndian`: [0x12, 0x34, 0x56, 0x78] (table `[3, 2, 1, 0]`)
//! - `LittleEndian`: [0x78, 0x56, 0x34, 0x12] (table `[0, 1, 2, 3]`)
//! - `Machine`: whichever of the two the host uses
//!
//! All tables are `const` and computed at compile time from `target_endian`.

/// `true` when the host stores integers least significant byte first.
pub const HOST_IS_LITTLE_ENDIAN: bool = cfg!(target_endian = "little");

/// Byte order requested by a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Host order, resolved once at compile time.
    Machine,

    /// Most significant byte first (network order).
    BigEndian,

    /// Least significant byte first.
    LittleEndian,
}

/// Width of an integer word handled by the layout tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordWidth {
    /// 1 byte (`c`, `C`)
    Byte,
    /// 2 bytes (`s`, `S`, `n`, `v`)
    Short,
    /// 4 bytes (`i`, `I`, `l`, `L`, `N`, `V`)
    Long,
    /// 8 bytes (`q`, `Q`, `J`, `P`)
    LongLong,
}

impl WordWidth {
    /// Number of bytes in the word
    pub const fn bytes(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Short => 2,
            Self::Long => 4,
            Self::LongLong => 8,
        }
    }
}

impl ByteOrder {
    /// Host byte order as a concrete variant
    pub const fn host() -> Self {
        if HOST_IS_LITTLE_ENDIAN {
            Self::LittleEndian
        } else {
            Self::BigEndian
        }
    }

    /// Replace `Machine` with the concrete host order
    pub const fn resolve(self) -> Self {
        match self {
            Self::Machine => Self::host(),
            other => other,
        }
    }

    /// Check if values in this order must be byte-swapped relative to the host
    pub fn needs_swap(self) -> bool {
        self.resolve() != Self::host()
    }

    /// Check if this order resolves to big-endian
    pub fn is_big_endian(self) -> bool {
        self.resolve() == Self::BigEndian
    }

    /// Get descriptive name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Machine => "machine",
            Self::BigEndian => "big-endian",
            Self::LittleEndian => "little-endian",
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for ByteOrder {
    fn default() -> Self {
        Self::Machine
    }
}

// ============================================================================
// Layout Tables
// ============================================================================

const fn little_endian_map<const W: usize>() -> [usize; W] {
    let mut map = [0usize; W];
    let mut i = 0;
    while i < W {
        map[i] = i;
        i += 1;
    }
    map
}

const fn big_endian_map<const W: usize>() -> [usize; W] {
    let mut map = [0usize; W];
    let mut i = 0;
    while i < W {
        map[i] = W - 1 - i;
        i += 1;
    }
    map
}

pub const BYTE_MAP: [usize; 1] = [0];

pub const BIG_ENDIAN_SHORT_MAP: [usize; 2] = big_endian_map::<2>();
pub const LITTLE_ENDIAN_SHORT_MAP: [usize; 2] = little_endian_map::<2>();

pub const BIG_ENDIAN_LONG_MAP: [usize; 4] = big_endian_map::<4>();
pub const LITTLE_ENDIAN_LONG_MAP: [usize; 4] = little_endian_map::<4>();

pub const BIG_ENDIAN_LONG_LONG_MAP: [usize; 8] = big_endian_map::<8>();
pub const LITTLE_ENDIAN_LONG_LONG_MAP: [usize; 8] = little_endian_map::<8>();

/// Layout table for a word width and byte order
///
/// `table[i]` is the index into the little-endian `i64` image of the byte
/// stored at offset `i` of the word.
pub fn layout(width: WordWidth, order: ByteOrder) -> &'static [usize] {
    let big = order.is_big_endian();
    match width {
        WordWidth::Byte => &BYTE_MAP,
        WordWidth::Short if big => &BIG_ENDIAN_SHORT_MAP,
        WordWidth::Short => &LITTLE_ENDIAN_SHORT_MAP,
        WordWidth::Long if big => &BIG_ENDIAN_LONG_MAP,
        WordWidth::Long => &LITTLE_ENDIAN_LONG_MAP,
        WordWidth::LongLong if big => &BIG_ENDIAN_LONG_LONG_MAP,
        WordWidth::LongLong => &LITTLE_ENDIAN_LONG_LONG_MAP,
    }
}

// ============================================================================
// Byte Swapping
// ============================================================================

/// Reverse the bytes of a 16-bit word
#[inline]
pub const fn swap16(value: u16) -> u16 {
    (value << 8) | (value >> 8)
}

/// Reverse the bytes of a 32-bit word
#[inline]
pub const fn swap32(value: u32) -> u32 {
    ((value & 0xFF) << 24) | ((value & 0xFF00) << 8) | ((value >> 8) & 0xFF00) | (value >> 24)
}

/// Reverse the bytes of a 64-bit word
#[inline]
pub const fn swap64(value: u64) -> u64 {
    ((swap32(value as u32) as u64) << 32) | (swap32((value >> 32) as u32) as u64)
}
