//! Non-fatal diagnostics
//!
//! Conditions such as unused arguments or a clamped seek do not abort a call.
//! The engines report them to a [`DiagnosticSink`]; the default
//! [`TracingSink`] turns them into `tracing` events, while
//! [`CollectingSink`] keeps them for inspection.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};

/// A recoverable irregularity found while packing or unpacking
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `*` on `x`, `X` or `@`; treated as a repeat of 1
    GreedyIgnored { code: char },
    /// Pack finished with arguments left over
    UnusedArguments { count: usize },
    /// A seek would leave the buffer; the cursor was clamped or kept
    OutsideOfString { code: char },
    /// Hex string shorter than the repeat count
    NotEnoughCharacters { code: char },
    /// Non-hex character packed as 0
    IllegalHexDigit { code: char, digit: char },
}

impl Diagnostic {
    /// Stable name used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::GreedyIgnored { .. } => "greedy_ignored",
            Diagnostic::UnusedArguments { .. } => "unused_arguments",
            Diagnostic::OutsideOfString { .. } => "outside_of_string",
            Diagnostic::NotEnoughCharacters { .. } => "not_enough_characters",
            Diagnostic::IllegalHexDigit { .. } => "illegal_hex_digit",
        }
    }

    /// Directive the diagnostic refers to, if any
    pub fn code(&self) -> Option<char> {
        match self {
            Diagnostic::GreedyIgnored { code }
            | Diagnostic::OutsideOfString { code }
            | Diagnostic::NotEnoughCharacters { code }
            | Diagnostic::IllegalHexDigit { code, .. } => Some(*code),
            Diagnostic::UnusedArguments { .. } => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::GreedyIgnored { code } => write!(f, "type {}: '*' ignored", code),
            Diagnostic::UnusedArguments { count } => write!(f, "{} arguments unused", count),
            Diagnostic::OutsideOfString { code } => write!(f, "type {}: outside of string", code),
            Diagnostic::NotEnoughCharacters { code } => {
                write!(f, "type {}: not enough characters in string", code)
            },
            Diagnostic::IllegalHexDigit { code, digit } => {
                write!(f, "type {}: illegal hex digit {}", code, digit)
            },
        }
    }
}

/// Receiver for non-fatal diagnostics
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Log level used by [`TracingSink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

/// Emits each diagnostic as a `tracing` event
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    level: DiagnosticLevel,
}

impl TracingSink {
    pub fn new(level: DiagnosticLevel) -> Self {
        Self { level }
    }

    pub fn level(&self) -> DiagnosticLevel {
        self.level
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        let kind = diagnostic.kind();
        match self.level {
            DiagnosticLevel::Trace => trace!(kind, "{}", diagnostic),
            DiagnosticLevel::Debug => debug!(kind, "{}", diagnostic),
            DiagnosticLevel::Info => info!(kind, "{}", diagnostic),
            DiagnosticLevel::Warn => warn!(kind, "{}", diagnostic),
            DiagnosticLevel::Error => error!(kind, "{}", diagnostic),
        }
    }
}

/// Keeps every reported diagnostic in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectingSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_inner(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}
