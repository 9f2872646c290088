/// A step counter over a fixed horizon with a look-ahead margin.
///
/// The clock starts at step 0 and counts completed steps. It reports
/// `done` once fewer than `lookahead` indices remain ahead of the current
/// step, so that reading index `current + 1` after a tick always stays in
/// range.
///
/// # Examples
///
/// ```
/// use microgrid_sim::sim::clock::Clock;
///
/// let mut clock = Clock::new(4, 2);
/// assert_eq!(clock.tick(), Some(1));
/// assert_eq!(clock.tick(), Some(2));
/// assert!(clock.is_done());
/// assert_eq!(clock.tick(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Clock {
    /// Number of completed steps
    current: usize,
    /// Horizon length
    total: usize,
    /// Indices that must remain readable ahead of `current`
    lookahead: usize,
}

impl Clock {
    /// Creates a clock at step 0.
    ///
    /// # Arguments
    ///
    /// * `total` - Horizon length (number of indices in every series)
    /// * `lookahead` - Margin kept between the current step and the horizon
    pub fn new(total: usize, lookahead: usize) -> Self {
        Self {
            current: 0,
            total,
            lookahead,
        }
    }

    /// Current step.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Horizon length.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the clock reached `total - lookahead`.
    pub fn is_done(&self) -> bool {
        self.current + self.lookahead >= self.total
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// * `Some(step)` - The new current step after advancing
    /// * `None` - If the clock is already done
    pub fn tick(&mut self) -> Option<usize> {
        if self.is_done() {
            None
        } else {
            self.current += 1;
            Some(self.current)
        }
    }

    /// Moves the clock back to step 0.
    pub fn reset(&mut self) {
        self.current = 0;
    }
}
