//! Common types and traits for series-backed microgrid components.

/// A fixed-length numeric time series with a multiplicative scaling factor.
///
/// The raw values are never mutated; every read applies the factor.
///
/// # Examples
///
/// ```
/// use microgrid_sim::devices::TimeSeries;
///
/// let ts = TimeSeries::new(vec![1.0, 2.0, 3.0], 2.0);
/// assert_eq!(ts.get(1), 4.0);
/// assert_eq!(ts.len(), 3);
/// assert_eq!(ts.mean(), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    values: Vec<f32>,
    factor: f32,
}

impl TimeSeries {
    /// Creates a new series from raw values and a scaling factor.
    pub fn new(values: Vec<f32>, factor: f32) -> Self {
        Self { values, factor }
    }

    /// Returns the scaled value at timestep `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is out of range. Callers guard indices with the horizon.
    pub fn get(&self, t: usize) -> f32 {
        self.values[t] * self.factor
    }

    /// Number of timesteps covered by the series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the series holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Scaling factor applied on every read.
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Raw, unscaled values.
    pub fn raw(&self) -> &[f32] {
        &self.values
    }

    /// Iterates over the scaled values.
    pub fn iter(&self) -> impl Iterator<Item = f32> + '_ {
        self.values.iter().map(move |v| v * self.factor)
    }

    /// Arithmetic mean of the scaled values (0.0 for an empty series).
    pub fn mean(&self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.iter().sum::<f32>() / self.values.len() as f32
    }

    /// Largest scaled value (0.0 for an empty series).
    pub fn max(&self) -> f32 {
        self.iter().reduce(f32::max).unwrap_or(0.0)
    }

    /// Smallest scaled value (0.0 for an empty series).
    pub fn min(&self) -> f32 {
        self.iter().reduce(f32::min).unwrap_or(0.0)
    }
}

/// Capability shared by every component backed by a time series.
///
/// Lets the microgrid check horizon consistency uniformly across the grid,
/// photovoltaic and load models.
pub trait TimedSeries {
    /// Number of timesteps the component can serve.
    fn length(&self) -> usize;

    /// Scale-adjusted arithmetic mean of the underlying series.
    fn mean(&self) -> f32;

    /// Human-readable component name, used in configuration errors.
    fn series_name(&self) -> &'static str;
}
