//! Episode-style adapter for reinforcement-learning controllers.
//!
//! [`GridEnv`] wraps a [`Microgrid`] behind `step`/`reset`, accepts
//! normalized actions and turns step costs into a scalar reward.

use rand::Rng;
use serde::Serialize;

use crate::config::MicrogridConfig;
use crate::error::{ConfigError, Result};
use crate::sim::Microgrid;
use crate::sim::types::{ACTION_SIZE, Costs, OBSERVATION_SIZE, Observation};

/// Strategy turning step costs into a reward.
pub trait Reward {
    /// Reward for a step with the given costs.
    fn reward(&self, costs: &Costs) -> f32;
}

/// Rewards the negated total cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct NegativeTotalCost;

impl Reward for NegativeTotalCost {
    fn reward(&self, costs: &Costs) -> f32 {
        -costs.total()
    }
}

impl<F: Fn(&Costs) -> f32> Reward for F {
    fn reward(&self, costs: &Costs) -> f32 {
        self(costs)
    }
}

/// Axis-aligned box of `N` scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxSpace<const N: usize> {
    pub low: [f32; N],
    pub high: [f32; N],
}

impl<const N: usize> BoxSpace<N> {
    pub fn new(low: [f32; N], high: [f32; N]) -> Self {
        Self { low, high }
    }

    /// Whether every component lies within its bounds.
    pub fn contains(&self, x: &[f32; N]) -> bool {
        x.iter()
            .zip(self.low.iter().zip(&self.high))
            .all(|(v, (lo, hi))| (*lo..=*hi).contains(v))
    }

    /// Draws a point uniformly from the box.
    pub fn sample(&self, rng: &mut impl Rng) -> [f32; N] {
        std::array::from_fn(|i| {
            if self.high[i] > self.low[i] {
                rng.random_range(self.low[i]..=self.high[i])
            } else {
                self.low[i]
            }
        })
    }
}

/// Result of one environment step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transition {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
    pub costs: Costs,
}

/// A microgrid exposed as an episodic environment.
///
/// Actions are given in the normalized `[-1, 1]` box and rescaled by the
/// microgrid. The observation space is the microgrid's observation box.
#[derive(Debug, Clone)]
pub struct GridEnv<R: Reward = NegativeTotalCost> {
    microgrid: Microgrid,
    reward: R,
}

impl GridEnv {
    /// Builds an environment with the default reward.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the microgrid cannot be built.
    pub fn new(config: &MicrogridConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self::from_microgrid(Microgrid::new(config)?, NegativeTotalCost))
    }
}

impl<R: Reward> GridEnv<R> {
    /// Wraps an existing microgrid with a reward strategy.
    pub fn from_microgrid(microgrid: Microgrid, reward: R) -> Self {
        Self { microgrid, reward }
    }

    /// Runs one step with a normalized action.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`Microgrid::run_normalized_timestep`].
    pub fn step(&mut self, action: [f32; ACTION_SIZE]) -> Result<Transition> {
        let outcome = self.microgrid.run_normalized_timestep(action)?;
        Ok(Transition {
            observation: outcome.observation,
            reward: self.reward.reward(&outcome.costs),
            done: outcome.done,
            costs: outcome.costs,
        })
    }

    /// Starts a new episode; logs are kept.
    ///
    /// # Errors
    ///
    /// Propagates errors of [`Microgrid::reset`].
    pub fn reset(&mut self) -> Result<Observation> {
        self.microgrid.reset(false)
    }

    /// The normalized action box `[-1, 1]²`.
    pub fn action_space(&self) -> BoxSpace<ACTION_SIZE> {
        BoxSpace::new([-1.0; ACTION_SIZE], [1.0; ACTION_SIZE])
    }

    /// The observation box derived from the series bounds.
    pub fn observation_space(&self) -> BoxSpace<OBSERVATION_SIZE> {
        BoxSpace::new(self.microgrid.min_values().0, self.microgrid.max_values().0)
    }

    pub fn microgrid(&self) -> &Microgrid {
        &self.microgrid
    }

    pub fn microgrid_mut(&mut self) -> &mut Microgrid {
        &mut self.microgrid
    }

    /// Unwraps the environment into its microgrid.
    pub fn into_inner(self) -> Microgrid {
        self.microgrid
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn env() -> GridEnv {
        GridEnv::new(&MicrogridConfig::small()).unwrap_or_else(|e| panic!("{e}"))
    }

    #[test]
    fn reward_is_negated_total_cost() {
        let mut env = env();
        let tr = env.step([0.0, 0.1]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(tr.reward, -tr.costs.total());
    }

    #[test]
    fn closures_are_rewards() {
        let mg = Microgrid::new(&MicrogridConfig::small()).unwrap_or_else(|e| panic!("{e}"));
        let mut env = GridEnv::from_microgrid(mg, |c: &Costs| -c.grid);
        let tr = env.step([0.0, 0.5]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(tr.reward, -tr.costs.grid);
    }

    #[test]
    fn sampled_actions_stay_in_action_space() {
        let env = env();
        let space = env.action_space();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
        assert!(!space.contains(&[1.5, 0.0]));
    }

    #[test]
    fn observations_stay_in_observation_space() {
        let mut env = env();
        let space = env.observation_space();
        let mut rng = StdRng::seed_from_u64(1);
        let first = env.reset().unwrap_or_else(|e| panic!("{e}"));
        assert!(space.contains(first.as_array()));
        loop {
            let action = env.action_space().sample(&mut rng);
            let tr = env.step(action).unwrap_or_else(|e| panic!("{e}"));
            assert!(space.contains(tr.observation.as_array()));
            if tr.done {
                break;
            }
        }
        assert_eq!(env.microgrid().t(), 46);
    }

    #[test]
    fn reset_keeps_logs() {
        let mut env = env();
        env.step([0.0, 0.0]).ok();
        env.reset().ok();
        assert_eq!(env.microgrid().t(), 0);
        assert_eq!(env.microgrid().get_logs().len(), 1);
    }

    #[test]
    fn degenerate_box_samples_its_bound() {
        let space = BoxSpace::new([2.0], [2.0]);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(space.sample(&mut rng), [2.0]);
    }
}
