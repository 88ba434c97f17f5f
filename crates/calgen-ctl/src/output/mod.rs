//! Styled terminal output for `calgen-ctl`.
//!
//! `anstyle` defines the styles and `anstream` strips them when stdout is not
//! a terminal, so progress lines such as `Autogenerating <path>` reach pipes
//! and logs as plain text.

mod styles;

use std::fmt::Display;
use std::io::Write;

pub(crate) use styles::clap_styles;

use styles::{DIM, ERROR, HEADER, HINT, LABEL, SUCCESS, WARNING};

/// Print a success message (green checkmark prefix). Used after a single-file
/// regeneration.
pub(crate) fn success(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{SUCCESS}✓{SUCCESS:#} {SUCCESS}{msg}{SUCCESS:#}").ok();
}

/// Print an error message to stderr (red X prefix).
pub(crate) fn error(msg: impl Display) {
    let mut out = anstream::stderr().lock();
    writeln!(out, "{ERROR}✗ {msg}{ERROR:#}").ok();
}

/// Print a warning to stdout, alongside the progress lines, so a missing
/// worklist file shows up next to the files that were regenerated.
pub(crate) fn warning(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{WARNING}! {msg}{WARNING:#}").ok();
}

pub(crate) fn header(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{HEADER}{msg}{HEADER:#}").ok();
}

/// Print "  Label: value" with the label bolded.
pub(crate) fn label(name: impl Display, value: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "  {LABEL}{name}:{LABEL:#} {value}").ok();
}

/// De-emphasized detail, e.g. an entry's address range in `dump-schema`.
pub(crate) fn dim(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{DIM}{msg}{DIM:#}").ok();
}

/// Follow-up advice under a warning, such as checking `--root`.
pub(crate) fn hint(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{HINT}{msg}{HINT:#}").ok();
}

pub(crate) fn blank() {
    let mut out = anstream::stdout().lock();
    writeln!(out).ok();
}

/// Print unstyled text to stdout.
///
/// `Autogenerating <path>`, `Ignoring <path>` and the completion banner go
/// through here so scripts can match them exactly.
pub(crate) fn plain(msg: impl Display) {
    let mut out = anstream::stdout().lock();
    writeln!(out, "{msg}").ok();
}
