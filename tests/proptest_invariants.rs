//! Property-based tests for the battery, the grid and the microgrid step.
//!
//! Uses proptest to generate random request sequences and series, then
//! verify the invariants hold.

mod common;

use microgrid_sim::devices::{Battery, Grid};
use microgrid_sim::sim::Microgrid;
use microgrid_sim::sim::types::Action;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// Energy requests spanning interior moves and far out-of-band requests.
fn arb_request() -> impl Strategy<Value = f32> {
    prop_oneof![-5e4f32..5e4f32, -1e8f32..1e8f32]
}

/// Equal-length, non-negative price series.
fn arb_prices() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (2usize..50).prop_flat_map(|n| {
        (
            proptest::collection::vec(0.0f32..100.0, n),
            proptest::collection::vec(0.0f32..100.0, n),
        )
    })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn soc_stays_in_unit_interval(requests in proptest::collection::vec(arb_request(), 1..100)) {
        let mut battery = Battery::new(&common::default_battery());
        for r in requests {
            battery.charge_discharge(r).unwrap();
            let soc = battery.state_of_charge().unwrap();
            prop_assert!((0.0..=1.0).contains(&soc));
            let e = battery.energy().unwrap();
            prop_assert!(e >= battery.low_capacity && e <= battery.high_capacity);
        }
    }

    #[test]
    fn overflow_sign_follows_request(r in arb_request()) {
        let mut battery = Battery::new(&common::default_battery());
        let overflow = battery.charge_discharge(r).unwrap();
        if r >= 0.0 {
            prop_assert!(overflow <= 0.0);
        } else {
            prop_assert!(overflow >= 0.0);
        }
    }

    #[test]
    fn grid_cost_sign_follows_energy((import, export) in arb_prices(), e in -1e4f32..1e4f32) {
        let n = import.len();
        let grid = Grid::new(import, export, 1.0, 1.0).unwrap();
        for t in 0..n {
            prop_assert_eq!(grid.get_cost(t, 0.0), 0.0);
            let cost = grid.get_cost(t, e);
            prop_assert!(cost * e >= 0.0);
        }
    }

    #[test]
    fn done_first_true_at_horizon_minus_two(n in 2usize..60) {
        let mut mg = Microgrid::new(&common::daily_config(n)).unwrap();
        let mut steps = 0;
        while !mg.done() {
            mg.run_timestep(Action::idle()).unwrap();
            steps += 1;
        }
        prop_assert_eq!(steps, n - 2);
        prop_assert!(mg.run_timestep(Action::idle()).is_err());
    }

    #[test]
    fn scaled_actions_stay_within_bounds(b in -3.0f32..3.0, g in -3.0f32..3.0) {
        let mg = Microgrid::new(&common::daily_config(24)).unwrap();
        let a = mg.scale_action([b, g]);
        let (lo, hi) = (mg.min_actions(), mg.max_actions());
        prop_assert!(lo[0] <= a.battery && a.battery <= hi[0]);
        prop_assert!(lo[1] <= a.grid && a.grid <= hi[1]);
    }

    #[test]
    fn random_episodes_keep_observations_in_box(
        actions in proptest::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 22)
    ) {
        let mut mg = Microgrid::new(&common::daily_config(24)).unwrap();
        let (lo, hi) = (mg.min_values(), mg.max_values());
        for (b, g) in actions {
            let out = mg.run_normalized_timestep([b, g]).unwrap();
            for i in 0..5 {
                prop_assert!(lo.0[i] <= out.observation.0[i] && out.observation.0[i] <= hi.0[i]);
            }
        }
        prop_assert!(mg.done());
    }
}
