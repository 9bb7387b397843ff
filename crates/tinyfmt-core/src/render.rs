//! Field renderer.
//!
//! Lays out one directive's content inside its field and streams the result
//! to the sink, in this fixed order:
//!
//! 1. leading spaces (right-aligned, not zero-padded)
//! 2. sign
//! 3. alternate-form prefix (`0x`/`0X`/`0`)
//! 4. zeros making up a precision shortfall
//! 5. zeros filling the width (zero flag)
//! 6. the content, stopping early at an embedded NUL
//! 7. trailing spaces (left-aligned, not zero-padded)
//!
//! All fill counts come from one width budget that each component draws
//! down; a component that would overdraw it leaves nothing for the fill.

use crate::directive::FormatDirective;
use crate::sink::Sink;

/// Render `content` laid out per `directive`.
///
/// `content` is the digit string for numeric conversions or the bounded
/// byte string for `%s`. The prefix is only written when at least one digit
/// is, so `%#.0x` of zero renders nothing.
pub fn render_field<S: Sink + ?Sized>(directive: &FormatDirective, content: &[u8], sink: &mut S) {
    let prefix = if directive.alt_form && !content.is_empty() {
        directive.base.prefix(directive.upper)
    } else {
        b""
    };
    let precision_zeros = directive
        .precision
        .map_or(0, |p| p.saturating_sub(content.len()));

    let mut width = directive.width.saturating_sub(content.len());
    if directive.sign.is_some() {
        width = width.saturating_sub(1);
    }
    width = width.saturating_sub(prefix.len());
    width = width.saturating_sub(precision_zeros);

    if !directive.zero_pad && !directive.left_align {
        pad(sink, b' ', width);
    }
    if let Some(sign) = directive.sign {
        sink.emit(sign);
    }
    emit_all(sink, prefix);
    pad(sink, b'0', precision_zeros);
    if directive.zero_pad {
        pad(sink, b'0', width);
    }
    for &byte in content {
        if byte == 0 {
            break;
        }
        sink.emit(byte);
    }
    if !directive.zero_pad && directive.left_align {
        pad(sink, b' ', width);
    }
}

fn emit_all<S: Sink + ?Sized>(sink: &mut S, bytes: &[u8]) {
    for &byte in bytes {
        sink.emit(byte);
    }
}

fn pad<S: Sink + ?Sized>(sink: &mut S, byte: u8, count: usize) {
    for _ in 0..count {
        sink.emit(byte);
    }
}
