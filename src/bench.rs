//! Plays many local games to compare strategies.

use crate::bot::{BotOptions, GuessBot, PlayStatus};
use crate::engine::GameEngine;
use crate::error::Result;
use crate::strategy::StrategyKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STRATEGY_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Debug, PartialEq)]
pub struct BenchReport {
    pub strategy: StrategyKind,
    pub rounds: usize,
    pub completed: usize,
    pub aborted: usize,
    pub min_attempts: usize,
    pub max_attempts: usize,
    pub mean_attempts: f64,
}

/// Plays `rounds` games with targets drawn uniformly from the bot's initial
/// range. Attempt statistics cover every game, aborted ones included.
pub fn run(
    strategy: StrategyKind,
    rounds: usize,
    options: BotOptions,
    seed: Option<u64>,
) -> Result<BenchReport> {
    let mut targets = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
    let range = options.initial_range;
    // Targets and picks must come from different streams or a seeded random
    // strategy would draw every target on its first guess
    let strategy_seed = seed.map(|s| s.wrapping_add(STRATEGY_SEED_OFFSET));
    let mut engine = GameEngine::new();
    let mut bot = GuessBot::new(&mut engine, strategy.build(strategy_seed), options);

    let mut report = BenchReport {
        strategy,
        rounds,
        completed: 0,
        aborted: 0,
        min_attempts: usize::MAX,
        max_attempts: 0,
        mean_attempts: 0.0,
    };
    let mut total = 0usize;

    for _ in 0..rounds {
        let target = targets.gen_range(range.min..=range.max);
        let game_id = bot.authority_mut().create(Some(target)).id().to_string();
        let result = bot.play(&game_id)?;

        match result.status {
            PlayStatus::Completed => report.completed += 1,
            PlayStatus::Aborted => report.aborted += 1,
        }
        report.min_attempts = report.min_attempts.min(result.attempts);
        report.max_attempts = report.max_attempts.max(result.attempts);
        total += result.attempts;
    }

    if rounds == 0 {
        report.min_attempts = 0;
    } else {
        report.mean_attempts = total as f64 / rounds as f64;
    }
    log::info!(
        "{} over {} rounds: mean {:.2}, worst {}",
        strategy,
        rounds,
        report.mean_attempts,
        report.max_attempts
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::Range;

    #[test]
    fn test_binary_worst_case_within_bound() {
        let report = run(StrategyKind::Binary, 300, BotOptions::default(), Some(1)).unwrap();
        assert_eq!(report.completed, 300);
        assert_eq!(report.aborted, 0);
        assert!(report.max_attempts <= 15);
        assert!(report.min_attempts >= 1);
        assert!(report.mean_attempts > 10.0);
    }

    #[test]
    fn test_all_strategies_complete_on_small_range() {
        let options = BotOptions {
            initial_range: Range::new(1, 100).unwrap(),
            ..BotOptions::default()
        };
        for kind in StrategyKind::ALL {
            let report = run(kind, 50, options, Some(9)).unwrap();
            assert_eq!(report.completed, 50, "{kind}");
            assert!(report.min_attempts <= report.max_attempts);
            // Every strategy needs more than one guess on average over 100 numbers
            assert!(report.mean_attempts > 2.0, "{kind}: mean {}", report.mean_attempts);
        }
    }

    #[test]
    fn test_seeded_random_searches_instead_of_hitting() {
        let options = BotOptions {
            initial_range: Range::new(1, 100).unwrap(),
            ..BotOptions::default()
        };
        for seed in [9, 42] {
            let report = run(StrategyKind::Random, 200, options, Some(seed)).unwrap();
            assert_eq!(report.completed, 200);
            assert!(report.max_attempts > 1, "seed {seed}");
            assert!(report.mean_attempts > 3.0, "seed {seed}: mean {}", report.mean_attempts);
        }
    }

    #[test]
    fn test_seeded_bench_is_reproducible() {
        let a = run(StrategyKind::Random, 50, BotOptions::default(), Some(7)).unwrap();
        let b = run(StrategyKind::Random, 50, BotOptions::default(), Some(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tight_budget_counts_aborts() {
        let options = BotOptions {
            max_attempts: 1,
            ..BotOptions::default()
        };
        let report = run(StrategyKind::Binary, 20, options, Some(5)).unwrap();
        assert_eq!(report.completed + report.aborted, 20);
        assert_eq!(report.max_attempts, 1);
    }

    #[test]
    fn test_zero_rounds() {
        let report = run(StrategyKind::Fibonacci, 0, BotOptions::default(), Some(1)).unwrap();
        assert_eq!(report.rounds, 0);
        assert_eq!(report.min_attempts, 0);
        assert_eq!(report.mean_attempts, 0.0);
    }
}
