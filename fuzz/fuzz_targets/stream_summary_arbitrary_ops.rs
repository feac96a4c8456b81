#![no_main]

use libfuzzer_sys::fuzz_target;
use topkit::ds::StreamSummary;

// Fuzz arbitrary operation sequences on StreamSummary
//
// Drives insert, increment, replace_min, peek_min and clear directly on the
// bucket structure and validates the linkage after every step.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    let mut summary: StreamSummary<u8> = StreamSummary::new();

    for chunk in data.chunks_exact(3) {
        let op = chunk[0] % 6;
        let item = chunk[1] % 32;
        let amount = u64::from(chunk[2]);

        match op {
            0 => {
                let was_tracked = summary.contains(&item);
                assert_eq!(summary.insert(item), !was_tracked);
            },
            1 => {
                let before = summary.get(&item).map(|meta| meta.count);
                let promotion = summary.increment(&item, amount);
                assert_eq!(promotion.is_some(), before.is_some());
                if let (Some(before), Some(promotion)) = (before, promotion) {
                    assert_eq!(promotion.count, before + amount);
                }
            },
            2 => {
                let len = summary.len();
                let floor = summary.min_count();
                if summary.replace_min(item).is_some() {
                    assert_eq!(summary.len(), len);
                    assert_eq!(summary.get(&item).map(|meta| meta.error), floor);
                }
            },
            3 => {
                if let Some(min) = summary.peek_min() {
                    assert_eq!(Some(min.count), summary.min_count());
                }
            },
            4 => {
                let ranked: Vec<u64> = summary.iter().map(|meta| meta.count).collect();
                assert_eq!(ranked.len(), summary.len());
                assert!(ranked.windows(2).all(|pair| pair[0] >= pair[1]));
            },
            5 => {
                summary.clear();
                assert!(summary.is_empty());
                assert_eq!(summary.bucket_count(), 0);
            },
            _ => unreachable!(),
        }

        summary.debug_validate_invariants();
    }
});
