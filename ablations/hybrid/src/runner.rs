//! 程序运行函数.

use crate::result::AblationResult;
use crate::strategies::{self, Outcome, STRATEGIES};
use chamfer_berry::mask::registry::default_mask;
use std::thread;
use utils::{config, phantom};

/// 实际运行.
pub fn run() -> AblationResult {
    let n = config::size_from_env();
    let phantoms = phantom::all(n);
    let mask = default_mask();
    log::info!(
        "Running ablation studies on {} phantom(s) of {n}x{n}...",
        phantoms.len()
    );

    let outcomes: Vec<Outcome> = if utils::cpus() >= STRATEGIES.len() {
        thread::scope(|s| {
            let p = phantoms.as_slice();
            let handles = STRATEGIES.map(|(name, st)| s.spawn(move || strategies::run(name, st, p, mask)));
            handles
                .into_iter()
                .map(|th| th.join().expect("Thread joining error"))
                .collect()
        })
    } else {
        STRATEGIES
            .iter()
            .map(|&(name, st)| strategies::run(name, st, &phantoms, mask))
            .collect()
    };

    // 第一个策略为基准.
    let baseline = outcomes[0].maps.clone();
    let mut data = Vec::with_capacity(outcomes.len());
    let mut maps = Vec::new();
    for ((name, _), outcome) in STRATEGIES.into_iter().zip(outcomes) {
        let Outcome { mut profile, maps: own } = outcome;
        for ((p, a), b) in phantoms.iter().zip(own).zip(baseline.iter()) {
            profile.count_mismatched(strategies::mismatched(&a, b));
            maps.push((name, p.name, a));
        }
        data.push((name, profile));
    }
    AblationResult::new(data, maps)
}
