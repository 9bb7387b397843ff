#![no_main]
use libfuzzer_sys::fuzz_target;
use tinyfmt_core::{BoundedBuf, FormatArg, format, snprintf};

// Input layout: [arg_seed: 8 bytes][capacity: 1 byte][format string ...].
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }
    let (seed, rest) = data.split_at(8);
    let capacity = usize::from(rest[0]);
    let fmt = &rest[1..];
    let seed = u64::from_le_bytes([
        seed[0], seed[1], seed[2], seed[3], seed[4], seed[5], seed[6], seed[7],
    ]);

    // Long literal widths only make runs slow.
    if fmt.windows(5).any(|w| w.iter().all(u8::is_ascii_digit)) {
        return;
    }

    // A fixed mix of argument kinds so both mismatches and matches occur.
    // Early integers stay small since `*` may consume them as widths.
    let small = (seed & 0xFFF) as i64;
    let args = [
        FormatArg::SignedInt(small - 0x800),
        FormatArg::UnsignedInt(small as u64),
        FormatArg::Str(fmt),
        FormatArg::Char(seed as u8),
        FormatArg::Pointer(small as usize),
        FormatArg::UnsignedInt(seed),
    ];

    // Total output length is bounded by what the sink counts.
    let mut total = 0usize;
    format(&mut |_: u8| total += 1, fmt, args);

    let mut dest = vec![0xAAu8; capacity];
    let n = snprintf(&mut dest, fmt, args);
    if capacity == 0 {
        assert_eq!(n, 0);
    } else {
        assert_eq!(n, total);
        let stored = n.min(capacity - 1);
        assert_eq!(dest[stored], 0);
    }

    // Streaming into a bounded adapter must agree with the one-shot call.
    let mut again = vec![0xAAu8; capacity];
    let mut sink = BoundedBuf::new(&mut again);
    format(&mut sink, fmt, args);
    if capacity > 0 {
        assert_eq!(sink.finish(), n);
        assert_eq!(again, dest);
    }
});
