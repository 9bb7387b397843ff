//! Integer-to-digit conversion.
//!
//! Renders one integer into a fixed scratch buffer, most significant digit
//! first. The largest power of the base not exceeding the value is found
//! up front, so digits come out in order and no reversal pass is needed.
//!
//! The engine is generic over the integer width: `int`, `long` and
//! `long long` arguments all go through [`write_unsigned`].

use core::ops::{Div, Mul, Rem};

/// Scratch capacity: `u64::MAX` in octal is 22 digits.
pub const DIGIT_CAPACITY: usize = 22;

/// Numeric base of an integer conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Base {
    Octal,
    #[default]
    Decimal,
    Hex,
}

impl Base {
    #[must_use]
    pub const fn radix(self) -> u8 {
        match self {
            Self::Octal => 8,
            Self::Decimal => 10,
            Self::Hex => 16,
        }
    }

    /// Alternate-form prefix (`#` flag) for this base.
    #[must_use]
    pub const fn prefix(self, upper: bool) -> &'static [u8] {
        match self {
            Self::Octal => b"0",
            Self::Decimal => b"",
            Self::Hex if upper => b"0X",
            Self::Hex => b"0x",
        }
    }
}

/// Unsigned integer widths the engine can render.
pub trait Unsigned:
    Copy + PartialOrd + From<u8> + Div<Output = Self> + Rem<Output = Self> + Mul<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;

    /// Truncating cast; only called on values below the radix.
    fn low_byte(self) -> u8;
}

/// Signed integer widths. Negation happens in the unsigned counterpart so
/// the minimum value does not overflow.
pub trait Signed: Copy {
    type Unsigned: Unsigned;

    /// Returns `(is_negative, magnitude)`.
    fn magnitude(self) -> (bool, Self::Unsigned);
}

macro_rules! impl_digit_widths {
    ($($u:ty => $s:ty),* $(,)?) => {$(
        impl Unsigned for $u {
            const ZERO: Self = 0;
            const ONE: Self = 1;

            #[inline]
            fn low_byte(self) -> u8 {
                self as u8
            }
        }

        impl Signed for $s {
            type Unsigned = $u;

            #[inline]
            fn magnitude(self) -> (bool, $u) {
                (self < 0, self.unsigned_abs())
            }
        }
    )*};
}

impl_digit_widths!(u8 => i8, u16 => i16, u32 => i32, u64 => i64, usize => isize);

/// Fixed-capacity buffer holding one directive's digits.
#[derive(Debug, Clone, Copy)]
pub struct DigitBuf {
    bytes: [u8; DIGIT_CAPACITY],
    len: usize,
}

impl DigitBuf {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: [0; DIGIT_CAPACITY],
            len: 0,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn clear(&mut self) {
        self.len = 0;
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }
}

impl Default for DigitBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `num` in `base` into `out`, replacing its previous contents.
///
/// An explicit precision of 0 with a zero value produces no digits at all.
pub fn write_unsigned<U: Unsigned>(
    num: U,
    base: Base,
    upper: bool,
    precision: Option<usize>,
    out: &mut DigitBuf,
) {
    out.clear();
    if precision == Some(0) && num == U::ZERO {
        return;
    }

    let radix = U::from(base.radix());
    let mut scale = U::ONE;
    while num / scale >= radix {
        scale = scale * radix;
    }

    let mut rest = num;
    while scale != U::ZERO {
        let digit = (rest / scale).low_byte();
        rest = rest % scale;
        scale = scale / radix;
        out.push(digit_byte(digit, upper));
    }
}

/// Signed variant of [`write_unsigned`]. Returns whether the value was negative;
/// the sign itself is not written into `out`.
pub fn write_signed<S: Signed>(
    num: S,
    base: Base,
    upper: bool,
    precision: Option<usize>,
    out: &mut DigitBuf,
) -> bool {
    let (negative, magnitude) = num.magnitude();
    write_unsigned(magnitude, base, upper, precision, out);
    negative
}

fn digit_byte(digit: u8, upper: bool) -> u8 {
    if digit < 10 {
        b'0' + digit
    } else if upper {
        b'A' + (digit - 10)
    } else {
        b'a' + (digit - 10)
    }
}
