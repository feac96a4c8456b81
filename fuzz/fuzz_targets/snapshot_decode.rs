#![no_main]

use libfuzzer_sys::fuzz_target;
use topkit::topk::TopKCounter;

// Fuzz snapshot decoding with arbitrary bytes
//
// Decoding must never panic or over-allocate. Whatever decodes must satisfy
// every structural invariant and re-encode to the exact input bytes.
fuzz_target!(|data: &[u8]| {
    if let Ok(counter) = TopKCounter::<Vec<u8>>::decode(data) {
        counter.check_invariants().unwrap();
        assert!(counter.size() <= counter.capacity());
        assert_eq!(counter.encode(), data);
    }
});
