// ==============================================
// TOP-K BEHAVIOR (integration)
// ==============================================
//
// End-to-end offer/peek/top_k scenarios through the public API only.

use std::collections::{HashMap, HashSet};

use topkit::prelude::*;

fn reference_stream() -> Vec<String> {
    "X X Y Z A B C X X A C A A X"
        .split(' ')
        .map(str::to_string)
        .collect()
}

// ==============================================
// Reference Scenarios
// ==============================================

mod scenarios {
    use super::*;

    #[test]
    fn capacity_three_keeps_a_x_c() {
        let mut counter = TopKCounter::new(3);
        for item in reference_stream() {
            counter.offer(item);
        }

        let top: HashSet<String> = counter.peek(3).into_iter().collect();
        let expected: HashSet<String> = ["A", "X", "C"].map(String::from).into();
        assert_eq!(top, expected);
    }

    #[test]
    fn capacity_one_drops_previous_item() {
        let mut counter = TopKCounter::new(1);
        assert_eq!(counter.offer_return_dropped("a".to_string(), 1), None);
        assert_eq!(
            counter.offer_return_dropped("b".to_string(), 1),
            Some("a".to_string())
        );

        assert_eq!(counter.peek(10), vec!["b".to_string()]);
        let entry = &counter.top_k(1)[0];
        assert_eq!(entry.error, 1);
        assert_eq!(entry.guaranteed_count(), 1);
    }

    #[test]
    fn offer_reports_new_on_every_introduction() {
        let mut counter = TopKCounter::new(2);
        let mut tracked = HashSet::new();
        for item in ["a", "b", "a", "c", "a", "b", "b", "c"] {
            let outcome = counter.offer_return_all(item.to_string(), 1);
            assert_eq!(outcome.is_new, !tracked.contains(item), "item {item}");
            tracked.insert(item.to_string());
            if let Some(dropped) = outcome.dropped {
                tracked.remove(&dropped);
            }
            assert_eq!(counter.size(), tracked.len());
        }
    }
}

// ==============================================
// Accuracy Guarantees
// ==============================================

mod guarantees {
    use super::*;

    #[test]
    fn heavy_hitters_survive_noise() {
        let mut counter = TopKCounter::new(8);
        for round in 0..200u64 {
            counter.offer(1_000);
            if round % 2 == 0 {
                counter.offer(2_000);
            }
            counter.offer(round);
        }

        let top = counter.peek(2);
        assert!(top.contains(&1_000));
        assert!(top.contains(&2_000));
        assert_eq!(counter.peek(1), vec![1_000]);
    }

    #[test]
    fn counts_bracket_true_frequency() {
        let mut counter = TopKCounter::new(5);
        let mut truth: HashMap<u64, u64> = HashMap::new();
        let mut state = 17u64;
        for _ in 0..2_000 {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let item = (state >> 33) % 32;
            counter.offer(item);
            *truth.entry(item).or_default() += 1;
        }

        for entry in counter.top_k(5) {
            let actual = truth[&entry.item];
            assert!(entry.guaranteed_count() <= actual);
            assert!(actual <= entry.count);
        }
        assert!(counter.check_invariants().is_ok());
    }

    #[test]
    fn total_count_matches_stream_length() {
        let mut counter = TopKCounter::new(4);
        let mut offered = 0u64;
        for (i, weight) in [3u64, 1, 4, 1, 5, 9, 2, 6].into_iter().enumerate() {
            counter.offer_n(i as u64, weight);
            offered += weight;
        }
        let total: u64 = counter.iter().map(|meta| meta.count).sum();
        assert_eq!(total, offered);
    }
}

// ==============================================
// Configuration
// ==============================================

mod configuration {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected_everywhere() {
        assert!(TopKCounter::<String>::try_new(0).is_err());
        assert!(TopKBuilder::new(0).build::<String>().is_err());
    }

    #[test]
    fn bucket_hint_does_not_change_results() {
        let mut small = TopKBuilder::new(3).bucket_hint(0).build().unwrap();
        let mut large = TopKBuilder::new(3).bucket_hint(1_000).build().unwrap();
        for item in reference_stream() {
            small.offer(item.clone());
            large.offer(item);
        }
        assert_eq!(small.top_k(3), large.top_k(3));
    }
}
