//! Synthetic daily profiles for prices, production and consumption.

use rand::{Rng, rngs::StdRng};

/// Builds a sinusoidal variation of a quantity over `size` timesteps.
///
/// The signal oscillates between `min_val` and `max_val` with the given
/// `period`; its phase is centred on the midpoint of `time_max` and
/// `time_min`.
///
/// # Examples
///
/// ```
/// use microgrid_sim::profile::hourly_variation;
///
/// let prices = hourly_variation(10.0, 6.0, 24.0, 15.0, 3.0, 48);
/// assert_eq!(prices.len(), 48);
/// assert!(prices.iter().all(|p| (6.0 - 1e-4..=10.0 + 1e-4).contains(p)));
/// ```
pub fn hourly_variation(
    max_val: f32,
    min_val: f32,
    period: f32,
    time_max: f32,
    time_min: f32,
    size: usize,
) -> Vec<f32> {
    let amplitude = 0.5 * (max_val - min_val);
    let shift = 0.5 * (time_max + time_min);
    let centre = 0.5 * (max_val + min_val);
    let pulsation = 2.0 * std::f32::consts::PI / period;
    (0..size)
        .map(|i| amplitude * (pulsation * (i as f32 - shift)).sin() + centre)
        .collect()
}

/// Adds uniform noise drawn from `[low, high)` to every value and clamps at zero.
///
/// Used to roughen synthetic production and load profiles, which can never
/// be negative.
pub fn with_uniform_noise(values: &[f32], low: f32, high: f32, rng: &mut StdRng) -> Vec<f32> {
    values
        .iter()
        .map(|v| {
            let noise = if high > low {
                rng.random_range(low..high)
            } else {
                0.0
            };
            (v + noise).max(0.0)
        })
        .collect()
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn variation_stays_within_bounds() {
        let v = hourly_variation(1000.0, 300.0, 24.0, 12.0, 0.0, 240);
        let lo = v.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!(lo >= 300.0 - 1e-2);
        assert!(hi <= 1000.0 + 1e-2);
    }

    #[test]
    fn variation_is_periodic() {
        let v = hourly_variation(10.0, 6.0, 24.0, 15.0, 3.0, 72);
        for i in 0..48 {
            assert!((v[i] - v[i + 24]).abs() < 1e-3);
        }
    }

    #[test]
    fn empty_size_yields_empty_profile() {
        assert!(hourly_variation(1.0, 0.0, 24.0, 0.0, 0.0, 0).is_empty());
    }

    #[test]
    fn uniform_noise_never_goes_negative() {
        let mut rng = StdRng::seed_from_u64(7);
        let base = vec![10.0; 100];
        let noisy = with_uniform_noise(&base, -100.0, 0.0, &mut rng);
        assert!(noisy.iter().all(|v| *v >= 0.0 && *v <= 10.0));
    }

    #[test]
    fn uniform_noise_is_deterministic_per_seed() {
        let base = vec![50.0; 20];
        let a = with_uniform_noise(&base, -5.0, 5.0, &mut StdRng::seed_from_u64(1));
        let b = with_uniform_noise(&base, -5.0, 5.0, &mut StdRng::seed_from_u64(1));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_std_noise_is_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(gaussian_noise(&mut rng, 0.0), 0.0);
    }
}
