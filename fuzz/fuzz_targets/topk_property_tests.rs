#![no_main]

use std::collections::HashMap;

use libfuzzer_sys::fuzz_target;
use topkit::topk::TopKCounter;

// Property checks for TopKCounter under arbitrary streams
//
// Byte 0 picks the capacity; the rest is a stream of (item, increment)
// pairs. Checks size bound, count/error brackets around the true
// frequency, the running total and the snapshot round trip.
fuzz_target!(|data: &[u8]| {
    let Some((&first, stream)) = data.split_first() else {
        return;
    };
    let capacity = usize::from(first % 16) + 1;
    let mut counter = TopKCounter::new(capacity);
    let mut truth: HashMap<u64, u64> = HashMap::new();
    let mut total = 0u64;

    for pair in stream.chunks_exact(2) {
        let item = u64::from(pair[0] % 48);
        let increment = u64::from(pair[1] % 8);
        let outcome = counter.offer_return_all(item, increment);

        assert!(counter.size() <= capacity);
        assert!(counter.contains(&item));
        if let Some(dropped) = outcome.dropped {
            assert!(outcome.is_new);
            assert!(!counter.contains(&dropped));
        }
        *truth.entry(item).or_default() += increment;
        total += increment;
    }

    counter.check_invariants().unwrap();

    let top = counter.top_k(capacity);
    assert!(top.windows(2).all(|pair| pair[0].count >= pair[1].count));
    assert_eq!(top.iter().map(|entry| entry.count).sum::<u64>(), total);
    for entry in &top {
        let actual = truth[&entry.item];
        assert!(entry.error <= entry.count);
        assert!(entry.guaranteed_count() <= actual && actual <= entry.count);
    }

    let restored = TopKCounter::<u64>::decode(&counter.encode()).unwrap();
    assert_eq!(restored.capacity(), capacity);
    assert_eq!(restored.top_k(capacity), top);
});
