use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{CoreError, CoreResult};

/// The only source of nondeterminism in a booking run.
///
/// Implementations are shared between stage tasks, so every method takes
/// `&self` and synchronizes internally.
pub trait RandomOutcomeSource: Send + Sync {
    /// Uniform integer in `[min, max]`, both ends inclusive.
    fn random_int(&self, min: i64, max: i64) -> CoreResult<i64>;

    /// `true` with the given probability. Out-of-range probabilities are
    /// clamped to `[0, 1]` and NaN counts as 0.
    fn random_bool(&self, probability_true: f64) -> bool;

    /// `length` characters drawn independently, with replacement, from `alphabet`.
    fn random_code(&self, alphabet: &str, length: usize) -> CoreResult<String> {
        let symbols: Vec<char> = alphabet.chars().collect();
        if symbols.is_empty() {
            return if length == 0 {
                Ok(String::new())
            } else {
                Err(CoreError::EmptyAlphabet { length })
            };
        }

        let last = (symbols.len() - 1) as i64;
        (0..length)
            .map(|_| self.random_int(0, last).map(|idx| symbols[idx as usize]))
            .collect()
    }
}

pub(crate) fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    }
}

fn check_range(min: i64, max: i64) -> CoreResult<()> {
    if min > max {
        return Err(CoreError::InvalidRange { min, max });
    }
    Ok(())
}

/// `StdRng`-backed source, seeded from entropy or from a fixed seed for
/// reproducible runs.
pub struct StdOutcomeSource {
    rng: Mutex<StdRng>,
}

impl StdOutcomeSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        tracing::debug!(seed, "Using seeded random outcome source");
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for StdOutcomeSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomOutcomeSource for StdOutcomeSource {
    fn random_int(&self, min: i64, max: i64) -> CoreResult<i64> {
        check_range(min, max)?;
        Ok(self.rng().gen_range(min..=max))
    }

    fn random_bool(&self, probability_true: f64) -> bool {
        self.rng().gen_bool(clamp_probability(probability_true))
    }
}

#[derive(Default)]
struct Script {
    ints: VecDeque<i64>,
    bools: VecDeque<bool>,
    codes: VecDeque<String>,
    int_draws: usize,
    bool_draws: usize,
    code_draws: usize,
    bool_probabilities: Vec<f64>,
}

/// Deterministic source that replays queued values and counts draws.
///
/// Queued integers are clamped into the requested range. When a queue runs
/// dry it falls back to `min`, `false`, and the first alphabet character
/// repeated `length` times.
#[derive(Default)]
pub struct ScriptedOutcomeSource {
    script: Mutex<Script>,
}

impl ScriptedOutcomeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ints(self, values: impl IntoIterator<Item = i64>) -> Self {
        self.script().ints.extend(values);
        self
    }

    pub fn with_bools(self, values: impl IntoIterator<Item = bool>) -> Self {
        self.script().bools.extend(values);
        self
    }

    pub fn with_codes<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        self.script().codes.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn int_draws(&self) -> usize {
        self.script().int_draws
    }

    pub fn bool_draws(&self) -> usize {
        self.script().bool_draws
    }

    pub fn code_draws(&self) -> usize {
        self.script().code_draws
    }

    /// Probabilities passed to `random_bool`, in call order.
    pub fn bool_probabilities(&self) -> Vec<f64> {
        self.script().bool_probabilities.clone()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RandomOutcomeSource for ScriptedOutcomeSource {
    fn random_int(&self, min: i64, max: i64) -> CoreResult<i64> {
        check_range(min, max)?;
        let mut script = self.script();
        script.int_draws += 1;
        Ok(script.ints.pop_front().map_or(min, |v| v.clamp(min, max)))
    }

    fn random_bool(&self, probability_true: f64) -> bool {
        let mut script = self.script();
        script.bool_draws += 1;
        script.bool_probabilities.push(clamp_probability(probability_true));
        script.bools.pop_front().unwrap_or(false)
    }

    fn random_code(&self, alphabet: &str, length: usize) -> CoreResult<String> {
        let first = alphabet.chars().next();
        if first.is_none() && length > 0 {
            return Err(CoreError::EmptyAlphabet { length });
        }

        let mut script = self.script();
        script.code_draws += 1;
        Ok(script.codes.pop_front().unwrap_or_else(|| {
            first.map(|c| std::iter::repeat(c).take(length).collect::<String>()).unwrap_or_default()
        }))
    }
}
