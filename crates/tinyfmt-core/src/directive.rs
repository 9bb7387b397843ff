//! Directive parsing and resolution.
//!
//! A directive is parsed in two steps. [`parse_format_spec`] reads the bytes
//! after `%` into a [`FormatSpec`] without touching any argument; then
//! [`FormatSpec::resolve`] pulls `*` widths and precisions from the argument
//! cursor and produces the [`FormatDirective`] the renderer works from.

use core::ffi::c_int;

use crate::args::{self, ArgCursor, IntWidth, SIZE_T_WIDTH};
use crate::digits::Base;
use crate::error::FormatError;

// ---------------------------------------------------------------------------
// Parsed form
// ---------------------------------------------------------------------------

/// Flags parsed from a directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags {
    pub left_justify: bool, // '-'
    pub zero_pad: bool,     // '0'
    pub alt_form: bool,     // '#'
}

/// Width specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    None,
    Fixed(usize),
    FromArg, // '*'
}

/// Precision specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    None,
    Fixed(usize),
    FromArg, // '.*'
}

/// Length modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthMod {
    None,
    L,  // 'l'
    Ll, // 'll'
    Z,  // 'z'
}

impl LengthMod {
    /// Argument width this modifier selects for integer conversions.
    #[must_use]
    pub const fn int_width(self) -> IntWidth {
        match self {
            Self::None => IntWidth::Int,
            Self::L => IntWidth::Long,
            Self::Ll => IntWidth::LongLong,
            Self::Z => SIZE_T_WIDTH,
        }
    }
}

/// Conversion character of a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// `d` / `i`
    Signed,
    /// `u`
    Unsigned,
    /// `x` / `X`
    Hex { upper: bool },
    /// `o`
    Octal,
    /// `p`
    Pointer,
    /// `c`
    Char,
    /// `s`
    Str,
    /// `%`
    Percent,
}

impl Conversion {
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            b'd' | b'i' => Self::Signed,
            b'u' => Self::Unsigned,
            b'x' => Self::Hex { upper: false },
            b'X' => Self::Hex { upper: true },
            b'o' => Self::Octal,
            b'p' => Self::Pointer,
            b'c' => Self::Char,
            b's' => Self::Str,
            b'%' => Self::Percent,
            _ => return None,
        })
    }
}

/// A parsed directive, before any argument has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatSpec {
    pub flags: FormatFlags,
    pub width: Width,
    pub precision: Precision,
    pub length: LengthMod,
    pub conversion: Conversion,
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse a single directive starting after the '%' character.
///
/// `fmt` holds the bytes following '%' up to (not including) the format
/// string's terminator. Returns `(spec, bytes_consumed)`. Running out of
/// bytes is [`FormatError::UnexpectedEnd`]; a byte that is not a known
/// conversion where one is expected is [`FormatError::UnknownConversion`].
/// Error offsets are left at 0 for the caller to anchor.
pub fn parse_format_spec(fmt: &[u8]) -> Result<(FormatSpec, usize), FormatError> {
    let mut pos = 0;
    let len = fmt.len();

    // --- flags ---
    let mut flags = FormatFlags::default();
    while pos < len {
        match fmt[pos] {
            b'-' => flags.left_justify = true,
            b'0' => flags.zero_pad = true,
            b'#' => flags.alt_form = true,
            _ => break,
        }
        pos += 1;
    }
    if flags.left_justify {
        flags.zero_pad = false;
    }

    // --- width ---
    let width = if pos < len && fmt[pos] == b'*' {
        pos += 1;
        Width::FromArg
    } else {
        let start = pos;
        while pos < len && fmt[pos].is_ascii_digit() {
            pos += 1;
        }
        if pos > start {
            Width::Fixed(parse_decimal(&fmt[start..pos]))
        } else {
            Width::None
        }
    };

    // --- precision ---
    let precision = if pos < len && fmt[pos] == b'.' {
        pos += 1;
        if pos < len && fmt[pos] == b'*' {
            pos += 1;
            Precision::FromArg
        } else {
            let start = pos;
            while pos < len && fmt[pos].is_ascii_digit() {
                pos += 1;
            }
            Precision::Fixed(if pos > start {
                parse_decimal(&fmt[start..pos])
            } else {
                0
            })
        }
    } else {
        Precision::None
    };

    // --- length modifier ---
    let length = match fmt.get(pos) {
        Some(b'z') => {
            pos += 1;
            LengthMod::Z
        }
        Some(b'l') => {
            pos += 1;
            if fmt.get(pos) == Some(&b'l') {
                pos += 1;
                LengthMod::Ll
            } else {
                LengthMod::L
            }
        }
        _ => LengthMod::None,
    };

    // --- conversion specifier ---
    let Some(&byte) = fmt.get(pos) else {
        return Err(FormatError::UnexpectedEnd { offset: 0 });
    };
    pos += 1;
    let conversion = Conversion::from_byte(byte).ok_or(FormatError::UnknownConversion {
        conversion: char::from(byte),
        offset: 0,
    })?;

    Ok((
        FormatSpec {
            flags,
            width,
            precision,
            length,
            conversion,
        },
        pos,
    ))
}

/// Literal widths and precisions saturate at `int` range, as a C `int` field would.
fn parse_decimal(digits: &[u8]) -> usize {
    let limit = c_int::MAX as usize;
    let mut result = 0_usize;
    for &d in digits {
        result = result
            .saturating_mul(10)
            .saturating_add((d - b'0') as usize)
            .min(limit);
    }
    result
}

// ---------------------------------------------------------------------------
// Resolved form
// ---------------------------------------------------------------------------

/// A directive with every parameter settled: what the field renderer consumes.
///
/// `width` is never negative by construction; an unspecified precision is
/// `None`. `sign` and `base` are filled in by the conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatDirective {
    pub left_align: bool,
    pub zero_pad: bool,
    pub alt_form: bool,
    pub upper: bool,
    pub width: usize,
    pub precision: Option<usize>,
    pub sign: Option<u8>,
    pub base: Base,
}

impl FormatSpec {
    /// Settle width and precision, consuming `*` arguments in order.
    ///
    /// A negative `*` width turns on left alignment and uses its magnitude;
    /// a negative `*` precision counts as unspecified. An explicit precision
    /// switches zero padding off; the `-` flag already did so while parsing,
    /// but a negative `*` width leaves the zero flag alone, so the field is
    /// zero-filled with no trailing spaces.
    pub fn resolve<'a, A: ArgCursor<'a> + ?Sized>(
        &self,
        args: &mut A,
    ) -> Result<FormatDirective, FormatError> {
        let mut directive = FormatDirective {
            left_align: self.flags.left_justify,
            zero_pad: self.flags.zero_pad,
            alt_form: self.flags.alt_form,
            ..FormatDirective::default()
        };

        directive.width = match self.width {
            Width::None => 0,
            Width::Fixed(w) => w,
            Width::FromArg => {
                let w = args::next_int(args)?;
                if w < 0 {
                    directive.left_align = true;
                }
                w.unsigned_abs() as usize
            }
        };

        directive.precision = match self.precision {
            Precision::None => None,
            Precision::Fixed(p) => Some(p),
            Precision::FromArg => {
                let p = args::next_int(args)?;
                usize::try_from(p).ok()
            }
        };

        if directive.precision.is_some() {
            directive.zero_pad = false;
        }
        Ok(directive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::FormatArg;

    #[test]
    fn test_parse_simple_int() {
        let (spec, consumed) = parse_format_spec(b"d").unwrap();
        assert_eq!(consumed, 1);
        assert_eq!(spec.conversion, Conversion::Signed);
        assert_eq!(spec.width, Width::None);
        assert_eq!(spec.precision, Precision::None);
    }

    #[test]
    fn test_parse_width_precision() {
        let (spec, consumed) = parse_format_spec(b"10.5u rest").unwrap();
        assert_eq!(consumed, 5);
        assert_eq!(spec.conversion, Conversion::Unsigned);
        assert_eq!(spec.width, Width::Fixed(10));
        assert_eq!(spec.precision, Precision::Fixed(5));
    }

    #[test]
    fn test_parse_flags_any_order() {
        let (spec, _) = parse_format_spec(b"#0-#8x").unwrap();
        assert!(spec.flags.left_justify);
        assert!(spec.flags.alt_form);
        assert!(!spec.flags.zero_pad); // overridden by '-'
        assert_eq!(spec.width, Width::Fixed(8));
    }

    #[test]
    fn test_parse_bare_dot_is_zero_precision() {
        let (spec, _) = parse_format_spec(b".d").unwrap();
        assert_eq!(spec.precision, Precision::Fixed(0));
    }

    #[test]
    fn test_parse_length_modifiers() {
        assert_eq!(parse_format_spec(b"ld").unwrap().0.length, LengthMod::L);
        assert_eq!(parse_format_spec(b"llu").unwrap().0.length, LengthMod::Ll);
        assert_eq!(parse_format_spec(b"zx").unwrap().0.length, LengthMod::Z);
        assert_eq!(LengthMod::Z.int_width(), SIZE_T_WIDTH);
    }

    #[test]
    fn test_parse_star_fields() {
        let (spec, _) = parse_format_spec(b"*.*d").unwrap();
        assert_eq!(spec.width, Width::FromArg);
        assert_eq!(spec.precision, Precision::FromArg);
    }

    #[test]
    fn test_parse_unknown_conversion() {
        assert_eq!(
            parse_format_spec(b"5q"),
            Err(FormatError::UnknownConversion {
                conversion: 'q',
                offset: 0
            })
        );
        // only one modifier token: "lz" leaves 'z' as the conversion
        assert!(matches!(
            parse_format_spec(b"lzd"),
            Err(FormatError::UnknownConversion { conversion: 'z', .. })
        ));
        assert!(parse_format_spec(b"hd").is_err());
    }

    #[test]
    fn test_parse_truncated_directive() {
        for fmt in [&b""[..], b"-", b"08", b"5.", b".*", b"ll"] {
            assert_eq!(
                parse_format_spec(fmt),
                Err(FormatError::UnexpectedEnd { offset: 0 }),
                "{fmt:?}"
            );
        }
    }

    #[test]
    fn test_parse_width_saturates_at_int_max() {
        let (spec, _) = parse_format_spec(b"99999999999999999999d").unwrap();
        assert_eq!(spec.width, Width::Fixed(c_int::MAX as usize));
    }

    #[test]
    fn test_resolve_negative_star_width() {
        let (spec, _) = parse_format_spec(b"0*d").unwrap();
        let mut args = [FormatArg::SignedInt(-6)].into_iter();
        let directive = spec.resolve(&mut args).unwrap();
        assert!(directive.left_align);
        assert!(directive.zero_pad);
        assert_eq!(directive.width, 6);
    }

    #[test]
    fn test_resolve_negative_star_precision_is_unspecified() {
        let (spec, _) = parse_format_spec(b"05.*d").unwrap();
        let mut args = [FormatArg::SignedInt(-1)].into_iter();
        let directive = spec.resolve(&mut args).unwrap();
        assert_eq!(directive.precision, None);
        assert!(directive.zero_pad);
    }

    #[test]
    fn test_resolve_precision_disables_zero_pad() {
        let (spec, _) = parse_format_spec(b"05.3d").unwrap();
        let directive = spec.resolve(&mut core::iter::empty::<FormatArg>()).unwrap();
        assert_eq!(directive.precision, Some(3));
        assert!(!directive.zero_pad);
    }

    #[test]
    fn test_resolve_star_without_argument() {
        let (spec, _) = parse_format_spec(b"*d").unwrap();
        assert_eq!(
            spec.resolve(&mut core::iter::empty::<FormatArg>()),
            Err(FormatError::MissingArgument { offset: 0 })
        );
    }
}
