//! Item streams for top-K benchmarks.
//!
//! All generators are seeded so runs are comparable.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Zipf};

#[derive(Debug, Clone, Copy)]
pub enum Workload {
    /// Uniform items in `[0, universe)`. Worst case: constant eviction churn.
    Uniform,
    /// Zipf-distributed items; `exponent` near 1.0 models web/log traffic.
    Zipfian { exponent: f64 },
    /// A small hot set receives `hot_prob` of the traffic.
    Hotset { hot_fraction: f64, hot_prob: f64 },
}

#[derive(Debug, Clone, Copy)]
pub struct WorkloadSpec {
    pub universe: u64,
    pub workload: Workload,
    pub seed: u64,
}

impl WorkloadSpec {
    pub fn generate(self, len: usize) -> Vec<u64> {
        let universe = self.universe.max(2);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        match self.workload {
            Workload::Uniform => (0..len).map(|_| rng.random_range(0..universe)).collect(),
            Workload::Zipfian { exponent } => {
                let zipf = Zipf::new(universe as f64, exponent).unwrap();
                (0..len)
                    .map(|_| zipf.sample(&mut rng) as u64 - 1)
                    .collect()
            },
            Workload::Hotset {
                hot_fraction,
                hot_prob,
            } => {
                let hot = ((universe as f64 * hot_fraction).round() as u64).clamp(1, universe - 1);
                (0..len)
                    .map(|_| {
                        if rng.random_bool(hot_prob) {
                            rng.random_range(0..hot)
                        } else {
                            rng.random_range(hot..universe)
                        }
                    })
                    .collect()
            },
        }
    }
}

pub fn string_items(keys: &[u64]) -> Vec<String> {
    keys.iter().map(|key| format!("item-{key:08}")).collect()
}
