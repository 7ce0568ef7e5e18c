//! Keep raw console input safe to drop into single-line log records.

/// Longest input preview written to the log.
pub const MAX_INPUT_PREVIEW: usize = 64;

/// Quote a line of user input for logging: control characters become `\xNN`
/// escapes (newline and tab get their short forms) and anything past
/// [`MAX_INPUT_PREVIEW`] characters is replaced by an ellipsis.
pub fn preview_input(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_INPUT_PREVIEW) + 2);
    out.push('"');
    for (count, ch) in raw.chars().enumerate() {
        if count >= MAX_INPUT_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
