#![no_main]

use duplexcat::{InputDocument, Processor};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Builder::new_multi_thread().enable_all().build().unwrap())
}

fuzz_target!(|data: &[u8]| {
    let documents = vec![InputDocument::new("fuzz.pdf", data.to_vec())];

    // Arbitrary input is skipped, never fatal.
    let result = runtime()
        .block_on(Processor::new().process(documents, |_| {}))
        .expect("merge must not fail on unparsable input");

    assert_eq!(result.report.outcomes.len(), 1);
    assert_eq!(
        result.report.total_pages % 2,
        0,
        "every merged document is padded to an even length"
    );
});
