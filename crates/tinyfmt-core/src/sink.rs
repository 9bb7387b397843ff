//! Character sinks and buffer adapters.
//!
//! The interpreter calls [`Sink::emit`] once per output byte and assumes it
//! succeeds. Anything that needs limits (a fixed buffer, a UART FIFO) has to
//! enforce them itself; [`BoundedBuf`] is the `snprintf`-style adapter that
//! does so, [`UnboundedBuf`] the `sprintf`-style one that does not.

use core::ffi::{c_char, c_void};

/// Single-byte output destination.
pub trait Sink {
    fn emit(&mut self, byte: u8);
}

impl<F: FnMut(u8)> Sink for F {
    #[inline]
    fn emit(&mut self, byte: u8) {
        self(byte);
    }
}

/// C-style emit callback: `void putc(void *context, char ch)`.
pub type EmitFn = extern "C" fn(context: *mut c_void, ch: c_char);

/// Sink built from an opaque context pointer and an emit callback.
///
/// The pointer is only ever handed back to `emit`; this type never reads
/// through it.
#[derive(Debug, Clone, Copy)]
pub struct CallbackSink {
    context: *mut c_void,
    emit: EmitFn,
}

impl CallbackSink {
    #[must_use]
    pub const fn new(context: *mut c_void, emit: EmitFn) -> Self {
        Self { context, emit }
    }
}

impl Sink for CallbackSink {
    #[inline]
    fn emit(&mut self, byte: u8) {
        (self.emit)(self.context, byte as c_char);
    }
}

// ---------------------------------------------------------------------------
// Bounded buffer (snprintf)
// ---------------------------------------------------------------------------

/// Fixed-capacity destination that truncates but keeps counting.
///
/// Bytes land at `dest[count]` only while `count < capacity - 1`, leaving
/// room for the terminator. `count` always advances, so after
/// [`finish`](Self::finish) a count above `capacity - 1` means the output
/// was cut short.
#[derive(Debug)]
pub struct BoundedBuf<'a> {
    dest: &'a mut [u8],
    count: usize,
}

impl<'a> BoundedBuf<'a> {
    #[must_use]
    pub fn new(dest: &'a mut [u8]) -> Self {
        Self { dest, count: 0 }
    }

    /// Logical number of bytes emitted so far, stored or not.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Whether some emitted bytes did not fit.
    #[must_use]
    pub fn truncated(&self) -> bool {
        self.count >= self.dest.len()
    }

    /// NUL-terminate at `min(count, capacity - 1)` and return the logical count.
    pub fn finish(self) -> usize {
        if let Some(last) = self.dest.len().checked_sub(1) {
            self.dest[self.count.min(last)] = 0;
        }
        self.count
    }
}

impl Sink for BoundedBuf<'_> {
    #[inline]
    fn emit(&mut self, byte: u8) {
        if self.count + 1 < self.dest.len() {
            self.dest[self.count] = byte;
        }
        self.count += 1;
    }
}

// ---------------------------------------------------------------------------
// Unbounded buffer (sprintf)
// ---------------------------------------------------------------------------

/// Destination the caller guarantees is large enough.
///
/// Every byte is stored. A destination that turns out too small panics on
/// the first byte that does not fit instead of writing past it.
#[derive(Debug)]
pub struct UnboundedBuf<'a> {
    dest: &'a mut [u8],
    count: usize,
}

impl<'a> UnboundedBuf<'a> {
    #[must_use]
    pub fn new(dest: &'a mut [u8]) -> Self {
        Self { dest, count: 0 }
    }

    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// NUL-terminate after the last byte and return the exact count.
    ///
    /// # Panics
    ///
    /// Panics when the destination has no room left for the terminator.
    pub fn finish(self) -> usize {
        self.dest[self.count] = 0;
        self.count
    }
}

impl Sink for UnboundedBuf<'_> {
    /// # Panics
    ///
    /// Panics when the destination is full.
    #[inline]
    fn emit(&mut self, byte: u8) {
        self.dest[self.count] = byte;
        self.count += 1;
    }
}
