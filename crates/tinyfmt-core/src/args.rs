//! Argument values and width-correct fetching.
//!
//! A C `va_list` hands back whatever bits sit in the next slot, reinterpreted
//! at the width the conversion asks for. [`FormatArg`] carries those bits
//! with enough type information to refuse a string where an integer is
//! expected; integer arguments are truncated or sign-extended exactly the
//! way a promoted variadic argument would be.

use core::ffi::{CStr, c_int, c_long, c_longlong, c_uint, c_ulong, c_ulonglong};
use core::mem::size_of;

use crate::digits::{self, Base, DigitBuf};
use crate::error::FormatError;

/// Typed argument value consumed by one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg<'a> {
    SignedInt(i64),
    UnsignedInt(u64),
    Char(u8),
    Pointer(usize),
    /// Byte string; ends at its first NUL or at the end of the slice.
    Str(&'a [u8]),
}

impl FormatArg<'_> {
    /// The argument's bits as a 64-bit slot, or `None` for strings.
    #[must_use]
    pub const fn raw_bits(self) -> Option<u64> {
        match self {
            Self::SignedInt(v) => Some(v as u64),
            Self::UnsignedInt(v) => Some(v),
            Self::Char(c) => Some(c as u64),
            Self::Pointer(p) => Some(p as u64),
            Self::Str(_) => None,
        }
    }
}

macro_rules! impl_from_int {
    ($variant:ident as $wide:ty: $($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            fn from(value: $t) -> Self {
                Self::$variant(value as $wide)
            }
        }
    )*};
}

impl_from_int!(SignedInt as i64: i8, i16, i32, i64, isize);
impl_from_int!(UnsignedInt as u64: u8, u16, u32, u64, usize);

impl From<char> for FormatArg<'_> {
    fn from(value: char) -> Self {
        Self::Char(value as u32 as u8)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(value: &'a str) -> Self {
        Self::Str(value.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(value: &'a [u8]) -> Self {
        Self::Str(value)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for FormatArg<'a> {
    fn from(value: &'a [u8; N]) -> Self {
        Self::Str(value)
    }
}

impl<'a> From<&'a CStr> for FormatArg<'a> {
    fn from(value: &'a CStr) -> Self {
        Self::Str(value.to_bytes())
    }
}

impl<T> From<*const T> for FormatArg<'_> {
    fn from(value: *const T) -> Self {
        Self::Pointer(value as usize)
    }
}

impl<T> From<*mut T> for FormatArg<'_> {
    fn from(value: *mut T) -> Self {
        Self::Pointer(value as usize)
    }
}

/// Build a `[FormatArg; N]` from mixed values.
///
/// ```
/// use tinyfmt_core::{fmt_args, snprintf};
///
/// let mut out = [0u8; 32];
/// let n = snprintf(&mut out, b"%s=%#x", fmt_args!["id", 26u32]);
/// assert_eq!(&out[..n], b"id=0x1a");
/// ```
#[macro_export]
macro_rules! fmt_args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::FormatArg::from($arg)),*]
    };
}

/// Source of arguments, consumed left to right.
///
/// The fetch helpers below take any cursor; every iterator over
/// [`FormatArg`] is one.
pub trait ArgCursor<'a> {
    fn next_arg(&mut self) -> Option<FormatArg<'a>>;
}

impl<'a, I> ArgCursor<'a> for I
where
    I: Iterator<Item = FormatArg<'a>>,
{
    fn next_arg(&mut self) -> Option<FormatArg<'a>> {
        self.next()
    }
}

/// Cursor over a borrowed argument slice that remembers how far it got.
#[derive(Debug, Clone)]
pub struct Args<'s, 'a> {
    slice: &'s [FormatArg<'a>],
    next: usize,
}

impl<'s, 'a> Args<'s, 'a> {
    #[must_use]
    pub const fn new(slice: &'s [FormatArg<'a>]) -> Self {
        Self { slice, next: 0 }
    }

    /// Number of arguments handed out so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.next
    }
}

impl<'a> Iterator for Args<'_, 'a> {
    type Item = FormatArg<'a>;

    fn next(&mut self) -> Option<FormatArg<'a>> {
        let arg = self.slice.get(self.next).copied()?;
        self.next += 1;
        Some(arg)
    }
}

// ---------------------------------------------------------------------------
// Width selection
// ---------------------------------------------------------------------------

/// C integer width an argument is fetched at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    Int,
    Long,
    LongLong,
}

/// Width `%z` maps to on this platform.
pub const SIZE_T_WIDTH: IntWidth = if size_of::<usize>() == size_of::<c_ulong>() {
    IntWidth::Long
} else if size_of::<usize>() == size_of::<c_ulonglong>() {
    IntWidth::LongLong
} else {
    IntWidth::Int
};

/// Width `%p` fetches at: the narrowest C integer that holds a pointer.
pub const POINTER_WIDTH: IntWidth = if size_of::<*const ()>() <= size_of::<c_uint>() {
    IntWidth::Int
} else if size_of::<*const ()>() <= size_of::<c_ulong>() {
    IntWidth::Long
} else {
    IntWidth::LongLong
};

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------
//
// Errors carry offset 0; the interpreter re-anchors them on the directive.

fn next_integer<'a, A: ArgCursor<'a> + ?Sized>(args: &mut A) -> Result<u64, FormatError> {
    args.next_arg()
        .ok_or(FormatError::MissingArgument { offset: 0 })?
        .raw_bits()
        .ok_or(FormatError::ArgumentMismatch {
            expected: "an integer",
            offset: 0,
        })
}

/// Fetch an `int` (used by `*` width and precision).
pub fn next_int<'a, A: ArgCursor<'a> + ?Sized>(args: &mut A) -> Result<c_int, FormatError> {
    Ok(next_integer(args)? as c_int)
}

/// Fetch a character: promoted to `int`, then truncated to a byte.
pub fn next_char<'a, A: ArgCursor<'a> + ?Sized>(args: &mut A) -> Result<u8, FormatError> {
    Ok(next_int(args)? as u8)
}

/// Fetch a string argument.
pub fn next_str<'a, A: ArgCursor<'a> + ?Sized>(args: &mut A) -> Result<&'a [u8], FormatError> {
    match args.next_arg() {
        Some(FormatArg::Str(s)) => Ok(s),
        Some(_) => Err(FormatError::ArgumentMismatch {
            expected: "a string",
            offset: 0,
        }),
        None => Err(FormatError::MissingArgument { offset: 0 }),
    }
}

/// Fetch a signed integer at `width` and render its magnitude in decimal.
///
/// Returns whether the value was negative.
pub fn fetch_signed<'a, A: ArgCursor<'a> + ?Sized>(
    args: &mut A,
    width: IntWidth,
    precision: Option<usize>,
    out: &mut DigitBuf,
) -> Result<bool, FormatError> {
    let raw = next_integer(args)?;
    let negative = match width {
        IntWidth::Int => digits::write_signed(raw as c_int, Base::Decimal, false, precision, out),
        IntWidth::Long => digits::write_signed(raw as c_long, Base::Decimal, false, precision, out),
        IntWidth::LongLong => {
            digits::write_signed(raw as c_longlong, Base::Decimal, false, precision, out)
        }
    };
    Ok(negative)
}

/// Fetch an unsigned integer at `width` and render it in `base`.
pub fn fetch_unsigned<'a, A: ArgCursor<'a> + ?Sized>(
    args: &mut A,
    width: IntWidth,
    base: Base,
    upper: bool,
    precision: Option<usize>,
    out: &mut DigitBuf,
) -> Result<(), FormatError> {
    let raw = next_integer(args)?;
    match width {
        IntWidth::Int => digits::write_unsigned(raw as c_uint, base, upper, precision, out),
        IntWidth::Long => digits::write_unsigned(raw as c_ulong, base, upper, precision, out),
        IntWidth::LongLong => {
            digits::write_unsigned(raw as c_ulonglong, base, upper, precision, out)
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_fetch_truncates_like_va_arg() {
        let args = [FormatArg::SignedInt(0x1_0000_0005), FormatArg::UnsignedInt(u64::MAX)];
        let mut cursor = args.iter().copied();
        assert_eq!(next_int(&mut cursor), Ok(5));
        assert_eq!(next_int(&mut cursor), Ok(-1));
        assert_eq!(
            next_int(&mut cursor),
            Err(FormatError::MissingArgument { offset: 0 })
        );
    }

    #[test]
    fn char_fetch_keeps_low_byte() {
        let args = fmt_args![0x141i32, 'z'];
        let mut cursor = args.into_iter();
        assert_eq!(next_char(&mut cursor), Ok(b'A'));
        assert_eq!(next_char(&mut cursor), Ok(b'z'));
    }

    #[test]
    fn string_and_integer_do_not_mix() {
        let args = fmt_args!["text", 3i32];
        let mut cursor = Args::new(&args);
        assert!(matches!(
            next_int(&mut cursor),
            Err(FormatError::ArgumentMismatch { .. })
        ));
        assert!(matches!(
            next_str(&mut cursor),
            Err(FormatError::ArgumentMismatch { .. })
        ));
        assert_eq!(cursor.consumed(), 2);
    }

    #[test]
    fn signed_fetch_respects_width() {
        let mut buf = DigitBuf::new();
        let args = fmt_args![-1i64, -1i64];
        let mut cursor = args.into_iter();
        assert!(fetch_signed(&mut cursor, IntWidth::LongLong, None, &mut buf).unwrap());
        assert_eq!(buf.as_bytes(), b"1");
        let negative = fetch_signed(&mut cursor, IntWidth::Int, None, &mut buf).unwrap();
        assert!(negative);
        assert_eq!(buf.as_bytes(), b"1");
    }

    #[test]
    fn unsigned_fetch_at_int_drops_high_bits() {
        let mut buf = DigitBuf::new();
        let args = fmt_args![u64::MAX, u64::MAX];
        let mut cursor = args.into_iter();
        fetch_unsigned(&mut cursor, IntWidth::Int, Base::Hex, false, None, &mut buf).unwrap();
        assert_eq!(buf.as_bytes(), b"ffffffff");
        fetch_unsigned(&mut cursor, IntWidth::LongLong, Base::Hex, true, None, &mut buf).unwrap();
        assert_eq!(buf.as_bytes(), b"FFFFFFFFFFFFFFFF");
    }

    #[test]
    fn platform_widths_match_pointer_size() {
        let bits = match POINTER_WIDTH {
            IntWidth::Int => size_of::<c_uint>(),
            IntWidth::Long => size_of::<c_ulong>(),
            IntWidth::LongLong => size_of::<c_ulonglong>(),
        };
        assert!(bits >= size_of::<usize>());
        let size_bits = match SIZE_T_WIDTH {
            IntWidth::Int => size_of::<c_uint>(),
            IntWidth::Long => size_of::<c_ulong>(),
            IntWidth::LongLong => size_of::<c_ulonglong>(),
        };
        assert_eq!(size_bits, size_of::<usize>());
    }

    #[test]
    fn conversions_pick_variants() {
        assert_eq!(FormatArg::from(-3i8), FormatArg::SignedInt(-3));
        assert_eq!(FormatArg::from(7usize), FormatArg::UnsignedInt(7));
        assert_eq!(FormatArg::from(b"ab"), FormatArg::Str(b"ab"));
        assert_eq!(FormatArg::from(c"ab"), FormatArg::Str(b"ab"));
        let p = 0x1000 as *const u8;
        assert_eq!(FormatArg::from(p), FormatArg::Pointer(0x1000));
    }
}
