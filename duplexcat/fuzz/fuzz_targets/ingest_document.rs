#![no_main]

use duplexcat::DuplexcatError;
use duplexcat::io::reader::parse_source;
use libfuzzer_sys::fuzz_target;
use std::path::PathBuf;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes either ingest or fail as unreadable, never anything else.
    match parse_source(PathBuf::from("fuzz.pdf"), data) {
        Ok(source) => assert!(source.page_count() > 0),
        Err(err) => assert!(matches!(err, DuplexcatError::UnreadableDocument { .. })),
    }
});
