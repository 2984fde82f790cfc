//! Turning sequences of displayable values into message text.

use std::fmt::{self, Write};

/// Concatenate the renderings of `values` with `separator` between them.
pub fn join(values: &[&dyn fmt::Display], separator: &str) -> String {
    let mut out = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        // Writing into a String cannot fail.
        let _ = write!(out, "{}", value);
    }
    out
}

/// Plain rendering: no separator.
pub fn plain(values: &[&dyn fmt::Display]) -> String {
    join(values, "")
}

/// `println`-style rendering: single spaces between operands, always
/// terminated by a newline.
pub fn line(values: &[&dyn fmt::Display]) -> String {
    ensure_newline(join(values, " "))
}

/// Rendering of the extra context attached to a check failure.
///
/// Reads as free text: values separated by one space, no enclosing
/// brackets, and the empty sequence renders as the empty string.
pub fn extra(values: &[&dyn fmt::Display]) -> String {
    join(values, " ")
}

pub fn ensure_newline(mut s: String) -> String {
    if !s.ends_with('\n') {
        s.push('\n');
    }
    s
}
