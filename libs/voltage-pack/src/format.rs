//! Format string parser
//!
//! A format is a sequence of directives. Each directive is one code character
//! followed by an optional repeat: `*` (greedy) or a run of decimal digits.
//! No repeat means 1.
//!
//! Unpack formats additionally split directives into `/`-separated groups,
//! each of which may carry a name after its repeat (`"C2chars/nlen"`).

use crate::directive::{lookup, DirectiveSpec};
use crate::error::{PackError, Result};

/// Default cap on unpack group names, in bytes
pub const DEFAULT_NAME_LIMIT: usize = 200;

/// Repeat count of a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Count(usize),
    /// `*`: meaning depends on the directive class
    Greedy,
}

impl Repeat {
    pub fn is_greedy(self) -> bool {
        matches!(self, Repeat::Greedy)
    }
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(1)
    }
}

/// One parsed directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive {
    pub spec: &'static DirectiveSpec,
    pub repeat: Repeat,
    /// Byte offset of the code in the format string
    pub position: usize,
}

impl Directive {
    pub fn code(&self) -> char {
        self.spec.code()
    }
}

/// Ordered directives of one format string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatProgram {
    directives: Vec<Directive>,
}

impl FormatProgram {
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Directive> {
        self.directives.iter()
    }
}

impl<'a> IntoIterator for &'a FormatProgram {
    type Item = &'a Directive;
    type IntoIter = std::slice::Iter<'a, Directive>;

    fn into_iter(self) -> Self::IntoIter {
        self.directives.iter()
    }
}

/// One `/`-separated unpack group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub directive: Directive,
    /// Result key prefix, possibly empty
    pub name: String,
}

/// Parse a pack format string
pub fn parse_format(format: &str) -> Result<FormatProgram> {
    let bytes = format.as_bytes();
    let mut pos = 0;
    let mut directives = Vec::new();

    while pos < bytes.len() {
        directives.push(read_directive(format, &mut pos)?);
    }

    Ok(FormatProgram { directives })
}

/// Parse an unpack format string into named groups
///
/// Names run from the end of the repeat to the next `/` and are cut to
/// `name_limit` bytes. A trailing `/` is ignored; an empty group is an error.
pub fn parse_groups(format: &str, name_limit: usize) -> Result<Vec<Group>> {
    let bytes = format.as_bytes();
    let mut pos = 0;
    let mut groups = Vec::new();

    while pos < bytes.len() {
        let directive = read_directive(format, &mut pos)?;

        let name_start = pos;
        while pos < bytes.len() && bytes[pos] != b'/' {
            pos += 1;
        }
        let name_end = name_start + (pos - name_start).min(name_limit);
        let name = String::from_utf8_lossy(&bytes[name_start..name_end]).into_owned();

        // skip the separator
        if pos < bytes.len() {
            pos += 1;
        }

        groups.push(Group { directive, name });
    }

    Ok(groups)
}

/// Read one code plus its repeat starting at `*pos`
fn read_directive(format: &str, pos: &mut usize) -> Result<Directive> {
    let bytes = format.as_bytes();
    let position = *pos;
    let code = bytes[position];

    let spec = lookup(code).ok_or_else(|| {
        let shown = format
            .get(position..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or(char::from(code));
        PackError::format(shown, position, "unknown format code")
    })?;
    *pos += 1;

    let repeat = match bytes.get(*pos) {
        Some(b'*') => {
            *pos += 1;
            Repeat::Greedy
        },
        Some(c) if c.is_ascii_digit() => {
            let mut count: usize = 0;
            while let Some(&d) = bytes.get(*pos).filter(|d| d.is_ascii_digit()) {
                count = count
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(usize::from(d - b'0')))
                    .ok_or_else(|| {
                        PackError::format(spec.code(), position, "repeat count is too large")
                    })?;
                *pos += 1;
            }
            Repeat::Count(count)
        },
        _ => Repeat::Count(1),
    };

    Ok(Directive {
        spec,
        repeat,
        position,
    })
}
