//! Fuzz target: `LineDecoder::feed`
//!
//! Arbitrary serial bytes must only ever produce non-empty lines within
//! the line capacity, and the decoder must accept input again after a
//! reset.
//!
//! cargo fuzz run fuzz_line_decoder

#![no_main]

use battmon::app::ports::LINE_CAPACITY;
use battmon::console::codec::LineDecoder;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = LineDecoder::new();
    decoder.feed(data, |line| {
        assert!(!line.is_empty());
        assert!(line.len() <= LINE_CAPACITY);
    });

    decoder.reset();
    decoder.feed(b":read\n", |line| assert_eq!(line.as_str(), ":read"));
});
