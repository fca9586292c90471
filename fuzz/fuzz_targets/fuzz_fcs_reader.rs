#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use cytocat::fcs::{FcsFile, ParseMode};
use cytocat::metadata::extract_from_reader;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce an error, never a panic
    if let Ok(fcs) = FcsFile::from_reader(Cursor::new(data), ParseMode::Full) {
        let _ = fcs.parameters();
        if let Some(events) = &fcs.events {
            for p in 0..events.parameter_count().min(16) {
                let _: f64 = events.column(p).sum();
            }
        }
    }

    // Extraction turns every failure into a diagnostic
    let result = extract_from_reader(Cursor::new(data));
    if let Some(meta) = result.metadata() {
        let _ = meta.fluorophores();
    }
});
