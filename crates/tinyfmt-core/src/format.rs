//! Format string interpreter.
//!
//! Walks the format string once, left to right. Literal bytes go straight
//! to the sink; each `%` directive is parsed, resolved against the argument
//! cursor, converted into a stack-local digit buffer when numeric, and handed
//! to the field renderer.
//!
//! Malformed input never fails loudly. An unknown conversion, a format
//! string that ends inside a directive, or an argument list that runs dry
//! stops processing on the spot; whatever was already emitted stays emitted.

use crate::args::{self, ArgCursor, FormatArg, IntWidth, POINTER_WIDTH};
use crate::digits::{Base, DigitBuf};
use crate::directive::{Conversion, FormatDirective, FormatSpec, parse_format_spec};
use crate::error::FormatError;
use crate::render::render_field;
use crate::sink::{BoundedBuf, Sink, UnboundedBuf};

/// Format `fmt` with `args` into `sink`.
///
/// `fmt` ends at its first NUL byte, or at the end of the slice if it has
/// none. `args` is anything that yields [`FormatArg`]s in order: an array
/// from [`fmt_args!`](crate::fmt_args), `slice.iter().copied()`, or
/// `&mut Args` to see afterwards how many were used. Processing stops
/// silently at the first malformed directive; use [`try_format`] to learn why.
pub fn format<'a, S, I>(sink: &mut S, fmt: &[u8], args: I)
where
    S: Sink + ?Sized,
    I: IntoIterator<Item = FormatArg<'a>>,
{
    let _ = try_format(sink, fmt, args);
}

/// Like [`format`], but reports why processing stopped early.
///
/// Output emitted before the failing directive is not rolled back.
pub fn try_format<'a, S, I>(sink: &mut S, fmt: &[u8], args: I) -> Result<(), FormatError>
where
    S: Sink + ?Sized,
    I: IntoIterator<Item = FormatArg<'a>>,
{
    let mut args = args.into_iter();
    let fmt = until_nul(fmt);
    let mut scratch = DigitBuf::default();
    let mut pos = 0;

    while pos < fmt.len() {
        let byte = fmt[pos];
        if byte != b'%' {
            sink.emit(byte);
            pos += 1;
            continue;
        }

        let start = pos;
        let (spec, consumed) = parse_format_spec(&fmt[pos + 1..]).map_err(|e| e.at(start))?;
        pos += 1 + consumed;
        write_directive(sink, &spec, &mut args, &mut scratch).map_err(|e| e.at(start))?;
    }
    Ok(())
}

/// `snprintf`: format into `dest`, truncating to `dest.len() - 1` bytes plus
/// a NUL terminator.
///
/// Returns the length the full output would have had, which exceeds
/// `dest.len() - 1` when it was truncated. An empty `dest` is left alone
/// and 0 is returned.
pub fn snprintf<'a, I>(dest: &mut [u8], fmt: &[u8], args: I) -> usize
where
    I: IntoIterator<Item = FormatArg<'a>>,
{
    if dest.is_empty() {
        return 0;
    }
    let mut buf = BoundedBuf::new(dest);
    format(&mut buf, fmt, args);
    buf.finish()
}

/// `sprintf`: format into `dest` and NUL-terminate. Returns the byte count.
///
/// # Panics
///
/// Panics if `dest` cannot hold the output plus its terminator.
pub fn sprintf<'a, I>(dest: &mut [u8], fmt: &[u8], args: I) -> usize
where
    I: IntoIterator<Item = FormatArg<'a>>,
{
    let mut buf = UnboundedBuf::new(dest);
    format(&mut buf, fmt, args);
    buf.finish()
}

/// Format into a fresh `Vec<u8>` (no terminator).
#[cfg(feature = "alloc")]
#[must_use]
pub fn format_to_vec<'a, I>(fmt: &[u8], args: I) -> alloc::vec::Vec<u8>
where
    I: IntoIterator<Item = FormatArg<'a>>,
{
    let mut out = alloc::vec::Vec::new();
    format(&mut |b: u8| out.push(b), fmt, args);
    out
}

fn write_directive<'a, S, A>(
    sink: &mut S,
    spec: &FormatSpec,
    args: &mut A,
    scratch: &mut DigitBuf,
) -> Result<(), FormatError>
where
    S: Sink + ?Sized,
    A: ArgCursor<'a>,
{
    let mut directive = spec.resolve(args)?;

    match spec.conversion {
        Conversion::Percent => sink.emit(b'%'),
        Conversion::Char => sink.emit(args::next_char(args)?),
        Conversion::Str => {
            let s = args::next_str(args)?;
            let limit = directive.precision.unwrap_or(usize::MAX);
            let content = until_nul(&s[..s.len().min(limit)]);
            directive.precision = None;
            render_field(&directive, content, sink);
        }
        Conversion::Signed => {
            let precision = numeric_precision(&mut directive, Base::Decimal);
            if args::fetch_signed(args, spec.length.int_width(), precision, scratch)? {
                directive.sign = Some(b'-');
            }
            render_field(&directive, scratch.as_bytes(), sink);
        }
        Conversion::Unsigned => {
            let precision = numeric_precision(&mut directive, Base::Decimal);
            args::fetch_unsigned(args, spec.length.int_width(), Base::Decimal, false, precision, scratch)?;
            render_field(&directive, scratch.as_bytes(), sink);
        }
        Conversion::Octal => {
            let precision = numeric_precision(&mut directive, Base::Octal);
            args::fetch_unsigned(args, IntWidth::Int, Base::Octal, false, precision, scratch)?;
            render_field(&directive, scratch.as_bytes(), sink);
        }
        Conversion::Hex { upper } => {
            write_hex(sink, &mut directive, spec.length.int_width(), upper, args, scratch)?;
        }
        Conversion::Pointer => {
            directive.alt_form = true;
            write_hex(sink, &mut directive, POINTER_WIDTH, false, args, scratch)?;
        }
    }
    Ok(())
}

/// Shared by `%x`, `%X` and `%p`.
fn write_hex<'a, S, A>(
    sink: &mut S,
    directive: &mut FormatDirective,
    width: IntWidth,
    upper: bool,
    args: &mut A,
    scratch: &mut DigitBuf,
) -> Result<(), FormatError>
where
    S: Sink + ?Sized,
    A: ArgCursor<'a>,
{
    directive.upper = upper;
    let precision = numeric_precision(directive, Base::Hex);
    args::fetch_unsigned(args, width, Base::Hex, upper, precision, scratch)?;
    render_field(directive, scratch.as_bytes(), sink);
    Ok(())
}

/// Set the base and default an unspecified precision to one digit.
fn numeric_precision(directive: &mut FormatDirective, base: Base) -> Option<usize> {
    directive.base = base;
    let precision = *directive.precision.get_or_insert(1);
    Some(precision)
}

fn until_nul(bytes: &[u8]) -> &[u8] {
    match bytes.iter().position(|&b| b == 0) {
        Some(end) => &bytes[..end],
        None => bytes,
    }
}
