//! Unpack engine
//!
//! Walks `/`-separated groups and extracts fields from the input into an
//! [`Unpacked`] mapping. Each group is one directive with an optional repeat
//! and an optional name:
//!
//! - A single field with a name is stored under the name.
//! - Anything else is stored under the name followed by the 1-based
//!   repetition index (`"val1"`, `"val2"`, or just `"1"` without a name).
//!
//! Running out of input ends a greedy numeric directive quietly; for any
//! other directive it is an `Argument` error.

use tracing::trace;

use crate::bytes::{conversions, hex, ByteOrder, WordWidth};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::directive::Layout;
use crate::error::{PackError, Result};
use crate::format::{Group, Repeat};
use crate::value::{Unpacked, Value};

/// Bytes trimmed from the end of an `A` field
const SPACE_PADDING: [u8; 5] = [0, b' ', b'\t', b'\r', b'\n'];

/// Decode `input[offset..]` according to `groups`
pub fn unpack_groups(
    groups: &[Group],
    input: &[u8],
    offset: usize,
    sink: &mut dyn DiagnosticSink,
) -> Result<Unpacked> {
    if offset > input.len() {
        return Err(PackError::Range {
            offset,
            len: input.len(),
        });
    }

    let mut reader = Reader {
        input: &input[offset..],
        pos: 0,
    };
    let mut result = Unpacked::new();

    for group in groups {
        reader.group(group, &mut result, sink)?;
    }

    Ok(result)
}

/// Input cursor shared by all groups of one call
struct Reader<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn not_enough_input(&self, code: char, need: usize) -> PackError {
        PackError::argument(format!(
            "type {}: not enough input, need {}, have {}",
            code,
            need,
            self.remaining()
        ))
    }

    fn group(
        &mut self,
        group: &Group,
        result: &mut Unpacked,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<()> {
        let spec = group.directive.spec;
        let code = spec.code();
        let repeat = group.directive.repeat;
        trace!(%code, ?repeat, name = %group.name, pos = self.pos, "unpack group");

        match spec.layout {
            Layout::NulByte => self.skip(code, seek_count(code, repeat, sink)),
            Layout::BackUp => {
                let n = seek_count(code, repeat, sink);
                self.back_up(code, n, sink);
                Ok(())
            },
            Layout::Absolute => {
                let n = seek_count(code, repeat, sink);
                self.jump(code, n, sink);
                Ok(())
            },
            Layout::NulPadded
            | Layout::SpacePadded
            | Layout::NulTerminated
            | Layout::Hex(_) => {
                let value = self.string_field(spec.layout, code, repeat)?;
                result.insert(key(&group.name, 1, true), value);
                Ok(())
            },
            Layout::Integer {
                width,
                order,
                signed,
            } => self.numbers(group, Number::Integer { width, order, signed }, result),
            Layout::Float(order) => self.numbers(group, Number::Float(order), result),
            Layout::Double(order) => self.numbers(group, Number::Double(order), result),
        }
    }

    /// Numeric codes: one field per repetition
    fn numbers(&mut self, group: &Group, number: Number, result: &mut Unpacked) -> Result<()> {
        let code = group.directive.code();
        let repeat = group.directive.repeat;
        let width = group.directive.spec.width;
        let single = repeat == Repeat::Count(1);
        let mut i = 0usize;
        loop {
            if let Repeat::Count(n) = repeat {
                if i >= n {
                    break;
                }
            }
            if width > self.remaining() {
                if repeat.is_greedy() {
                    break;
                }
                return Err(self.not_enough_input(code, width));
            }

            let field = &self.input[self.pos..self.pos + width];
            i += 1;
            result.insert(key(&group.name, i, single), number.decode(field));
            self.pos += width;
        }
        Ok(())
    }

    /// `x`: skip `n` bytes of input
    fn skip(&mut self, code: char, n: usize) -> Result<()> {
        if n > self.remaining() {
            return Err(self.not_enough_input(code, n));
        }
        self.pos += n;
        Ok(())
    }

    /// `X`: rewind `n` bytes, clamping at the start
    fn back_up(&mut self, code: char, n: usize, sink: &mut dyn DiagnosticSink) {
        match self.pos.checked_sub(n) {
            Some(p) => self.pos = p,
            None => {
                sink.report(Diagnostic::OutsideOfString { code });
                self.pos = 0;
            },
        }
    }

    /// `@`: move to absolute position `n`; out of range leaves the cursor
    fn jump(&mut self, code: char, n: usize, sink: &mut dyn DiagnosticSink) {
        if n <= self.input.len() {
            self.pos = n;
        } else {
            sink.report(Diagnostic::OutsideOfString { code });
        }
    }

    /// `a`, `A`, `Z`, `h`, `H`: one field whose repeat is a length
    fn string_field(&mut self, layout: Layout, code: char, repeat: Repeat) -> Result<Value> {
        let size = match (layout, repeat) {
            (_, Repeat::Greedy) => self.remaining(),
            (Layout::Hex(_), Repeat::Count(n)) => n.div_ceil(2),
            (_, Repeat::Count(n)) => n,
        };
        if size > self.remaining() {
            return Err(self.not_enough_input(code, size));
        }

        let field = &self.input[self.pos..self.pos + size];
        let value = match layout {
            Layout::SpacePadded => {
                let end = field
                    .iter()
                    .rposition(|b| !SPACE_PADDING.contains(b))
                    .map_or(0, |last| last + 1);
                field[..end].to_vec()
            },
            Layout::NulTerminated => {
                let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
                field[..end].to_vec()
            },
            Layout::Hex(order) => {
                let nibbles = match repeat {
                    Repeat::Count(n) => n,
                    Repeat::Greedy => size * 2,
                };
                hex::render_nibbles(field, nibbles, order)
            },
            _ => field.to_vec(),
        };

        self.pos += size;
        Ok(Value::Bytes(value))
    }
}

/// Repeat of `x`, `X` or `@`; `*` is reported and counts as 1
fn seek_count(code: char, repeat: Repeat, sink: &mut dyn DiagnosticSink) -> usize {
    match repeat {
        Repeat::Greedy => {
            sink.report(Diagnostic::GreedyIgnored { code });
            1
        },
        Repeat::Count(n) => n,
    }
}

/// Result key for repetition `index` (1-based)
fn key(name: &str, index: usize, single: bool) -> String {
    if single && !name.is_empty() {
        return name.to_string();
    }
    let mut key = String::with_capacity(name.len() + 4);
    key.push_str(name);
    key.push_str(itoa::Buffer::new().format(index));
    key
}

/// Numeric field layouts
#[derive(Debug, Clone, Copy)]
enum Number {
    Integer {
        width: WordWidth,
        order: ByteOrder,
        signed: bool,
    },
    Float(ByteOrder),
    Double(ByteOrder),
}

impl Number {
    /// Decode one field; `field` is exactly the directive's width
    fn decode(self, field: &[u8]) -> Value {
        match self {
            Number::Integer {
                width,
                order,
                signed,
            } => Value::Int(conversions::read_integer(field, width, order, signed)),
            Number::Float(order) => Value::Float(f64::from(conversions::bytes_to_f32(
                &conversions::word::<4>(field),
                order,
            ))),
            Number::Double(order) => {
                Value::Float(conversions::bytes_to_f64(&conversions::word::<8>(field), order))
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use crate::format::{parse_groups, DEFAULT_NAME_LIMIT};

    fn unpack(format: &str, input: &[u8]) -> Result<Unpacked> {
        unpack_at(format, input, 0)
    }

    fn unpack_at(format: &str, input: &[u8], offset: usize) -> Result<Unpacked> {
        let groups = parse_groups(format, DEFAULT_NAME_LIMIT)?;
        unpack_groups(&groups, input, offset, &mut CollectingSink::new())
    }

    fn unpack_collect(format: &str, input: &[u8]) -> (Unpacked, Vec<Diagnostic>) {
        let groups = parse_groups(format, DEFAULT_NAME_LIMIT).unwrap();
        let mut sink = CollectingSink::new();
        let out = unpack_groups(&groups, input, 0, &mut sink).unwrap();
        (out, sink.into_inner())
    }

    fn entries(map: &Unpacked) -> Vec<(String, Value)> {
        map.clone().into_iter().collect()
    }

    #[test]
    fn test_keys() {
        let out = unpack("c2chars/nint", &[1, 2, 0, 3]).unwrap();
        assert_eq!(
            entries(&out),
            vec![
                ("chars1".to_string(), Value::Int(1)),
                ("chars2".to_string(), Value::Int(2)),
                ("int".to_string(), Value::Int(3)),
            ]
        );

        let out = unpack("C", &[9]).unwrap();
        assert_eq!(out.get("1"), Some(&Value::Int(9)));
    }

    #[test]
    fn test_unnamed_groups_overwrite() {
        let out = unpack("C/C", &[1, 2]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.get("1"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_strings() {
        let out = unpack("a4", b"ab\0 ").unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(b"ab\0 ".to_vec())));

        let out = unpack("A6", b"ab \t\r\n").unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(b"ab".to_vec())));

        let out = unpack("Z5", b"ab\0cd").unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(b"ab".to_vec())));

        let out = unpack("A*", b"hello world").unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(b"hello world".to_vec())));
    }

    #[test]
    fn test_all_padding_trims_to_empty() {
        let out = unpack("A3", b"   ").unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(Vec::new())));
        let out = unpack("Z3", b"\0\0\0").unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(Vec::new())));
    }

    #[test]
    fn test_string_consumes_full_width() {
        let out = unpack("Z4name/Cnext", b"a\0bc\x07").unwrap();
        assert_eq!(out.get("name"), Some(&Value::Bytes(b"a".to_vec())));
        assert_eq!(out.get("next"), Some(&Value::Int(7)));
    }

    #[test]
    fn test_hex() {
        let out = unpack("H4", &[0x12, 0xAB]).unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(b"12ab".to_vec())));
        let out = unpack("h*", &[0x12, 0xAB]).unwrap();
        assert_eq!(out.get("1"), Some(&Value::Bytes(b"21ba".to_vec())));
        let out = unpack("H3/C", &[0x12, 0xA0, 5]).unwrap();
        assert_eq!(entries(&out), vec![("1".to_string(), Value::Int(5))]);
        let out = unpack("H3h/Cc", &[0x12, 0xA0, 5]).unwrap();
        assert_eq!(out.get("h"), Some(&Value::Bytes(b"12a".to_vec())));
        assert_eq!(out.get("c"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_integer_signedness() {
        let out = unpack("cs/Cu", &[0xFF, 0xFF]).unwrap();
        assert_eq!(out.get("s"), Some(&Value::Int(-1)));
        assert_eq!(out.get("u"), Some(&Value::Int(255)));

        let out = unpack("nn/vv/Nbig/Vlittle", &[0xFF, 0xFE, 0xFE, 0xFF, 0, 0, 1, 0, 0, 1, 0, 0])
            .unwrap();
        assert_eq!(out.get("n"), Some(&Value::Int(0xFFFE)));
        assert_eq!(out.get("v"), Some(&Value::Int(0xFFFE)));
        assert_eq!(out.get("big"), Some(&Value::Int(256)));
        assert_eq!(out.get("little"), Some(&Value::Int(256)));

        let out = unpack("J", &[0xFF; 8]).unwrap();
        assert_eq!(out.get("1"), Some(&Value::Int(-1)));
    }

    #[test]
    fn test_floats() {
        let out = unpack("Gg/Ee", &[0x3F, 0xC0, 0, 0, 0x3F, 0xF8, 0, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(out.get("g"), Some(&Value::Float(1.5)));
        assert_eq!(out.get("e"), Some(&Value::Float(1.5)));
    }

    #[test]
    fn test_greedy_stops_at_end() {
        let out = unpack("n*", &[0, 1, 0, 2, 9]).unwrap();
        assert_eq!(
            entries(&out),
            vec![
                ("1".to_string(), Value::Int(1)),
                ("2".to_string(), Value::Int(2)),
            ]
        );
        assert!(unpack("C*", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_not_enough_input() {
        let err = unpack("A", &[]).unwrap_err();
        assert_eq!(err, PackError::argument("type A: not enough input, need 1, have 0"));
        assert!(matches!(unpack("N", &[1, 2, 3]), Err(PackError::Argument(_))));
        assert!(matches!(unpack("C3", &[1, 2]), Err(PackError::Argument(_))));
        assert!(matches!(unpack("x", &[]), Err(PackError::Argument(_))));
    }

    #[test]
    fn test_offset() {
        let out = unpack_at("C*", &[1, 2, 3], 1).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out.get("1"), Some(&Value::Int(2)));

        assert!(unpack_at("C*", &[1, 2, 3], 3).unwrap().is_empty());
        assert_eq!(
            unpack_at("C", &[1, 2, 3], 4).unwrap_err(),
            PackError::Range { offset: 4, len: 3 }
        );
    }

    #[test]
    fn test_seeks() {
        let out = unpack("Ca/x/Cb/X2/Cc/@3/Cd", &[1, 2, 3, 4]).unwrap();
        assert_eq!(out.get("a"), Some(&Value::Int(1)));
        assert_eq!(out.get("b"), Some(&Value::Int(3)));
        assert_eq!(out.get("c"), Some(&Value::Int(2)));
        assert_eq!(out.get("d"), Some(&Value::Int(4)));
    }

    #[test]
    fn test_seek_diagnostics() {
        let (out, diags) = unpack_collect("X3/Ca/@9/Cb", &[5, 6]);
        assert_eq!(out.get("a"), Some(&Value::Int(5)));
        assert_eq!(out.get("b"), Some(&Value::Int(6)));
        assert_eq!(
            diags,
            vec![
                Diagnostic::OutsideOfString { code: 'X' },
                Diagnostic::OutsideOfString { code: '@' },
            ]
        );

        let (_, diags) = unpack_collect("x*", &[0]);
        assert_eq!(diags, vec![Diagnostic::GreedyIgnored { code: 'x' }]);
    }

    #[test]
    fn test_seek_is_relative_to_offset() {
        let groups = parse_groups("@0/Cfirst", DEFAULT_NAME_LIMIT).unwrap();
        let out = unpack_groups(&groups, &[7, 8], 1, &mut CollectingSink::new()).unwrap();
        assert_eq!(out.get("first"), Some(&Value::Int(8)));
    }
}
