//! Pack engine
//!
//! Packing runs in two passes over a [`FormatProgram`]:
//!
//! 1. **Sizing** ([`PackPlan::build`]): resolve greedy repeats, check the
//!    argument count and track the projected write cursor. The output size is
//!    the furthest position the cursor ever reaches.
//! 2. **Writing** ([`PackPlan::write`]): allocate a zero-filled buffer of that
//!    size and replay the directives, coercing each argument and storing its
//!    bytes at the cursor.
//!
//! The size depends only on the format and the argument count, except for
//! greedy string directives whose length comes from the argument itself.

use tracing::trace;

use crate::bytes::{conversions, hex};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::directive::{ArgumentClass, Layout};
use crate::error::{PackError, Result};
use crate::format::{Directive, FormatProgram, Repeat};
use crate::scalar::Scalar;

/// Largest cursor position the engine will produce
const MAX_POSITION: usize = isize::MAX as usize;

/// A directive with its repeat resolved against the arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    directive: Directive,
    count: usize,
}

/// Result of the sizing pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackPlan {
    steps: Vec<Step>,
    size: usize,
    /// Directive that moved the cursor to `size`
    furthest: char,
    consumed: usize,
}

impl PackPlan {
    /// Run the sizing pass
    ///
    /// Fails with `Argument` when the arguments run out and with `Overflow`
    /// when the cursor leaves the addressable range. Leftover arguments are
    /// reported to `sink`.
    pub fn build(
        program: &FormatProgram,
        args: &[Scalar],
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self> {
        let mut steps = Vec::with_capacity(program.len());
        let mut consumed = 0usize;

        for directive in program {
            let code = directive.code();
            let count = match directive.spec.class {
                ArgumentClass::NoArgument => match directive.repeat {
                    Repeat::Greedy => {
                        sink.report(Diagnostic::GreedyIgnored { code });
                        1
                    },
                    Repeat::Count(n) => n,
                },
                ArgumentClass::SingleString => {
                    let arg = args.get(consumed).ok_or_else(|| {
                        PackError::argument(format!("type {}: not enough arguments", code))
                    })?;
                    consumed += 1;
                    match directive.repeat {
                        Repeat::Count(n) => n,
                        Repeat::Greedy => {
                            let len = arg.to_bytes()?.len();
                            // Z* reserves room for the terminator
                            if matches!(directive.spec.layout, Layout::NulTerminated) {
                                len + 1
                            } else {
                                len
                            }
                        },
                    }
                },
                ArgumentClass::PerRepetition => {
                    let remaining = args.len() - consumed;
                    let count = match directive.repeat {
                        Repeat::Greedy => remaining,
                        Repeat::Count(n) => n,
                    };
                    if count > remaining {
                        return Err(PackError::argument(format!(
                            "type {}: too few arguments",
                            code
                        )));
                    }
                    consumed += count;
                    count
                },
            };

            steps.push(Step {
                directive: *directive,
                count,
            });
        }

        if consumed < args.len() {
            sink.report(Diagnostic::UnusedArguments {
                count: args.len() - consumed,
            });
        }

        let (size, furthest) = measure(&steps, sink)?;
        trace!(size, steps = steps.len(), consumed, "pack plan ready");

        Ok(Self {
            steps,
            size,
            furthest,
            consumed,
        })
    }

    /// Exact length of the packed output
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of arguments the format consumes
    pub fn arguments_consumed(&self) -> usize {
        self.consumed
    }

    /// Run the write pass
    ///
    /// `args` must be the list the plan was built from. A size the allocator
    /// cannot provide is an `Overflow` error.
    pub fn write(&self, args: &[Scalar], sink: &mut dyn DiagnosticSink) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        output
            .try_reserve_exact(self.size)
            .map_err(|_| overflow(self.furthest))?;
        output.resize(self.size, 0);
        let mut pos = 0usize;
        let mut cursor = Arguments { args, next: 0 };

        for step in &self.steps {
            let code = step.directive.code();
            let n = step.count;

            match step.directive.spec.layout {
                Layout::NulPadded | Layout::SpacePadded | Layout::NulTerminated => {
                    let layout = step.directive.spec.layout;
                    let text = cursor.next(code)?.to_bytes()?;
                    let field = &mut output[pos..pos + n];
                    field.fill(if layout == Layout::SpacePadded { b' ' } else { 0 });

                    let capacity = if layout == Layout::NulTerminated {
                        n.saturating_sub(1)
                    } else {
                        n
                    };
                    let len = text.len().min(capacity);
                    field[..len].copy_from_slice(&text[..len]);
                    pos += n;
                },
                Layout::Hex(order) => {
                    let text = cursor.next(code)?.to_bytes()?;
                    let mut digits = n;
                    if digits > text.len() {
                        sink.report(Diagnostic::NotEnoughCharacters { code });
                        digits = text.len();
                    }
                    pos += hex::pack_nibbles(&text[..digits], order, &mut output[pos..], |c| {
                        sink.report(Diagnostic::IllegalHexDigit {
                            code,
                            digit: char::from(c),
                        })
                    });
                },
                Layout::Integer { width, order, .. } => {
                    let w = width.bytes();
                    for _ in 0..n {
                        let value = cursor.next(code)?.to_integer()?;
                        conversions::write_integer(value, width, order, &mut output[pos..pos + w]);
                        pos += w;
                    }
                },
                Layout::Float(order) => {
                    for _ in 0..n {
                        let value = cursor.next(code)?.to_float()? as f32;
                        output[pos..pos + 4].copy_from_slice(&conversions::f32_to_bytes(value, order));
                        pos += 4;
                    }
                },
                Layout::Double(order) => {
                    for _ in 0..n {
                        let value = cursor.next(code)?.to_float()?;
                        output[pos..pos + 8].copy_from_slice(&conversions::f64_to_bytes(value, order));
                        pos += 8;
                    }
                },
                Layout::NulByte => {
                    output[pos..pos + n].fill(0);
                    pos += n;
                },
                Layout::BackUp => {
                    pos = pos.saturating_sub(n);
                },
                Layout::Absolute => {
                    if n > pos {
                        output[pos..n].fill(0);
                    }
                    pos = n;
                },
            }
        }

        Ok(output)
    }
}

/// Walk the resolved steps and return the furthest cursor position along
/// with the code of the directive that reached it
fn measure(steps: &[Step], sink: &mut dyn DiagnosticSink) -> Result<(usize, char)> {
    let mut pos = 0usize;
    let mut size = 0usize;
    let mut furthest = '\0';

    for step in steps {
        let code = step.directive.code();
        let spec = step.directive.spec;
        let n = step.count;

        pos = match spec.layout {
            Layout::Hex(_) => advance(pos, n.div_ceil(2), 1, code)?,
            Layout::BackUp => match pos.checked_sub(n) {
                Some(p) => p,
                None => {
                    sink.report(Diagnostic::OutsideOfString { code });
                    0
                },
            },
            Layout::Absolute => {
                if n > MAX_POSITION {
                    return Err(overflow(code));
                }
                n
            },
            _ => advance(pos, n, spec.width, code)?,
        };

        if pos > size {
            size = pos;
            furthest = code;
        }
    }

    Ok((size, furthest))
}

fn advance(pos: usize, count: usize, width: usize, code: char) -> Result<usize> {
    count
        .checked_mul(width)
        .and_then(|bytes| pos.checked_add(bytes))
        .filter(|&p| p <= MAX_POSITION)
        .ok_or_else(|| overflow(code))
}

fn overflow(code: char) -> PackError {
    PackError::overflow(format!("type {}: integer overflow in format string", code))
}

/// Argument cursor for the write pass
struct Arguments<'a> {
    args: &'a [Scalar],
    next: usize,
}

impl<'a> Arguments<'a> {
    fn next(&mut self, code: char) -> Result<&'a Scalar> {
        let arg = self
            .args
            .get(self.next)
            .ok_or_else(|| PackError::argument(format!("type {}: too few arguments", code)))?;
        self.next += 1;
        Ok(arg)
    }
}

/// Size and write `args` according to `program`
pub fn pack_program(
    program: &FormatProgram,
    args: &[Scalar],
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<u8>> {
    let plan = PackPlan::build(program, args, sink)?;
    plan.write(args, sink)
}
