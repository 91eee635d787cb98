//! Format directive table
//!
//! One static [`DirectiveSpec`] per format code. Both engines look a code up
//! here to learn how many arguments it takes, how wide each element is, how
//! arguments are coerced and how bytes are laid out.
//!
//! | Codes | Arguments | Width | Order |
//! |-------|-----------|-------|-------|
//! | `x X @` | none | 1 / 1 / 0 | - |
//! | `a A Z h H` | one string | 1 per char (½ for hex) | - |
//! | `c C` | one per repeat | 1 | - |
//! | `s S` / `n` / `v` | one per repeat | 2 | machine / big / little |
//! | `i I l L` / `N` / `V` | one per repeat | 4 | machine / big / little |
//! | `q Q` / `J` / `P` | one per repeat | 8 | machine / big / little |
//! | `f` / `G` / `g` | one per repeat | 4 | machine / big / little |
//! | `d` / `E` / `e` | one per repeat | 8 | machine / big / little |
//!
//! `i`/`I` are always 4 bytes regardless of the platform's C `int`.

use crate::bytes::{ByteOrder, NibbleOrder, WordWidth};

use ByteOrder::{BigEndian as Big, LittleEndian as Little, Machine};
use WordWidth::{Byte, Long, LongLong, Short};

/// How many arguments a directive consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentClass {
    /// `x`, `X`, `@`: positioning only, a greedy repeat is ignored
    NoArgument,
    /// `a`, `A`, `Z`, `h`, `H`: exactly one argument, repeat is a length
    SingleString,
    /// Numeric codes: one argument per repetition, greedy takes the rest
    PerRepetition,
}

/// Byte layout of one directive
///
/// The layout also fixes the argument coercion: string and hex layouts take
/// [`Scalar::to_bytes`](crate::Scalar::to_bytes), `Integer` takes
/// [`Scalar::to_integer`](crate::Scalar::to_integer), `Float` and `Double`
/// take [`Scalar::to_float`](crate::Scalar::to_float).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// `a`: NUL-padded string
    NulPadded,
    /// `A`: space-padded string
    SpacePadded,
    /// `Z`: NUL-terminated, NUL-padded string
    NulTerminated,
    /// `h`/`H`: hex string, two digits per byte
    Hex(NibbleOrder),
    Integer {
        width: WordWidth,
        order: ByteOrder,
        signed: bool,
    },
    /// IEEE-754 single precision
    Float(ByteOrder),
    /// IEEE-754 double precision
    Double(ByteOrder),
    /// `x`: NUL byte
    NulByte,
    /// `X`: back up one byte
    BackUp,
    /// `@`: jump to absolute position
    Absolute,
}

/// Static metadata for one format code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveSpec {
    pub code: u8,
    pub class: ArgumentClass,
    /// Bytes per repetition (0 for `@`; hex counts bytes per two digits)
    pub width: usize,
    pub layout: Layout,
}

impl DirectiveSpec {
    /// Format code as a `char`
    pub fn code(&self) -> char {
        char::from(self.code)
    }
}

const fn string(code: u8, layout: Layout) -> DirectiveSpec {
    DirectiveSpec {
        code,
        class: ArgumentClass::SingleString,
        width: 1,
        layout,
    }
}

const fn integer(code: u8, width: WordWidth, order: ByteOrder, signed: bool) -> DirectiveSpec {
    DirectiveSpec {
        code,
        class: ArgumentClass::PerRepetition,
        width: width.bytes(),
        layout: Layout::Integer {
            width,
            order,
            signed,
        },
    }
}

const fn float(code: u8, order: ByteOrder) -> DirectiveSpec {
    DirectiveSpec {
        code,
        class: ArgumentClass::PerRepetition,
        width: 4,
        layout: Layout::Float(order),
    }
}

const fn double(code: u8, order: ByteOrder) -> DirectiveSpec {
    DirectiveSpec {
        code,
        class: ArgumentClass::PerRepetition,
        width: 8,
        layout: Layout::Double(order),
    }
}

const fn positioning(code: u8, width: usize, layout: Layout) -> DirectiveSpec {
    DirectiveSpec {
        code,
        class: ArgumentClass::NoArgument,
        width,
        layout,
    }
}

/// Every supported directive
pub static DIRECTIVES: [DirectiveSpec; 30] = [
    string(b'a', Layout::NulPadded),
    string(b'A', Layout::SpacePadded),
    string(b'Z', Layout::NulTerminated),
    string(b'h', Layout::Hex(NibbleOrder::LowFirst)),
    string(b'H', Layout::Hex(NibbleOrder::HighFirst)),
    integer(b'c', Byte, Machine, true),
    integer(b'C', Byte, Machine, false),
    integer(b's', Short, Machine, true),
    integer(b'S', Short, Machine, false),
    integer(b'n', Short, Big, false),
    integer(b'v', Short, Little, false),
    integer(b'i', Long, Machine, true),
    integer(b'I', Long, Machine, false),
    integer(b'l', Long, Machine, true),
    integer(b'L', Long, Machine, false),
    integer(b'N', Long, Big, false),
    integer(b'V', Long, Little, false),
    integer(b'q', LongLong, Machine, true),
    integer(b'Q', LongLong, Machine, false),
    integer(b'J', LongLong, Big, false),
    integer(b'P', LongLong, Little, false),
    float(b'f', Machine),
    float(b'g', Little),
    float(b'G', Big),
    double(b'd', Machine),
    double(b'e', Little),
    double(b'E', Big),
    positioning(b'x', 1, Layout::NulByte),
    positioning(b'X', 1, Layout::BackUp),
    positioning(b'@', 0, Layout::Absolute),
];

/// Look up a format code
pub fn lookup(code: u8) -> Option<&'static DirectiveSpec> {
    DIRECTIVES.iter().find(|spec| spec.code == code)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_full_alphabet_is_known() {
        for code in "aAZhHcCsSiIlLnNvVqQJPfgGdeExX@".bytes() {
            let spec = lookup(code).unwrap();
            assert_eq!(spec.code, code);
        }
    }

    #[test]
    fn test_unknown_codes() {
        for code in [b'y', b'b', b'/', b'*', b'1', b' ', 0xC3] {
            assert!(lookup(code).is_none(), "code {:?} should be unknown", code);
        }
    }

    #[test]
    fn test_widths() {
        let width = |c: u8| lookup(c).unwrap().width;
        for c in *b"cC" {
            assert_eq!(width(c), 1);
        }
        for c in *b"sSnv" {
            assert_eq!(width(c), 2);
        }
        for c in *b"iIlLNVfgG" {
            assert_eq!(width(c), 4);
        }
        for c in *b"qQJPdeE" {
            assert_eq!(width(c), 8);
        }
        assert_eq!(width(b'@'), 0);
    }

    #[test]
    fn test_classes_and_layouts() {
        let spec = lookup(b'Z').unwrap();
        assert_eq!(spec.class, ArgumentClass::SingleString);
        assert_eq!(spec.layout, Layout::NulTerminated);

        let spec = lookup(b'N').unwrap();
        assert_eq!(spec.class, ArgumentClass::PerRepetition);
        assert_eq!(
            spec.layout,
            Layout::Integer {
                width: WordWidth::Long,
                order: ByteOrder::BigEndian,
                signed: false
            }
        );

        assert_eq!(lookup(b'e').unwrap().layout, Layout::Double(ByteOrder::LittleEndian));
        assert_eq!(lookup(b'G').unwrap().layout, Layout::Float(ByteOrder::BigEndian));
        assert_eq!(lookup(b'X').unwrap().class, ArgumentClass::NoArgument);
        assert_eq!(lookup(b'@').unwrap().class, ArgumentClass::NoArgument);
    }
}
