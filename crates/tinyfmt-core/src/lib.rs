//! # tinyfmt-core
//!
//! A printf-subset formatting engine for freestanding targets.
//!
//! Supports `%d %i %u %x %X %o %p %c %s %%` with the `- 0 #` flags, literal
//! or `*` width and precision, and the `l`, `ll` and `z` length modifiers.
//! There is no floating point, no locale and no allocation: output goes one
//! byte at a time to a caller-supplied [`Sink`], and all scratch space lives
//! on the stack.
//!
//! Arguments are passed as a cursor of typed [`FormatArg`] values instead of
//! a C `va_list`; integers are reinterpreted at the width the directive's
//! length modifier selects, just as a variadic fetch would.
//!
//! # Example
//!
//! ```
//! use tinyfmt_core::{fmt_args, snprintf};
//!
//! let mut buf = [0u8; 16];
//! let n = snprintf(&mut buf, b"[%-4d|%04x]", fmt_args![7i32, 0xbeu32]);
//! assert_eq!(&buf[..n], b"[7   |00be]");
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod args;
pub mod digits;
pub mod directive;
pub mod error;
pub mod format;
pub mod render;
pub mod sink;

pub use args::{ArgCursor, Args, FormatArg};
pub use error::FormatError;
#[cfg(feature = "alloc")]
pub use format::format_to_vec;
pub use format::{format, snprintf, sprintf, try_format};
pub use sink::{BoundedBuf, CallbackSink, EmitFn, Sink, UnboundedBuf};
