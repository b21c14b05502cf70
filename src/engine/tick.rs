use std::time::Duration;

/// Upper bound on simulation steps run for a single `accumulate` call. Time beyond it is dropped
/// so a stalled host does not spend the next frame catching up.
pub const MAX_CATCH_UP_STEPS: u32 = 25;

/// Turns wall-clock time into a whole number of fixed simulation steps.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    accumulator: Duration,
}

impl FixedTimestep {
    pub fn new(step: Duration) -> Self {
        Self { step, accumulator: Duration::ZERO }
    }

    /// Step length in seconds, identical for every step.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.step.as_secs_f64()
    }

    /// Adds `elapsed` and returns how many steps are now due.
    pub fn accumulate(&mut self, elapsed: Duration) -> u32 {
        if self.step.is_zero() {
            return 0;
        }

        self.accumulator += elapsed;
        let mut steps = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            steps += 1;
            if steps == MAX_CATCH_UP_STEPS {
                if self.accumulator >= self.step {
                    log::debug!("dropping {:?} of simulation time", self.accumulator);
                }
                self.accumulator = Duration::ZERO;
                break;
            }
        }
        steps
    }
}

// Outcome of one or more fixed simulation steps
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct TickResult {
    /// Number of fixed steps that were run
    pub steps: u32,
    /// Lap count after the last wrap, if the player wrapped during these steps
    pub wrapped_to_lap: Option<i64>,
    /// Did the player hit the end of the road (clamp policy)
    pub end_reached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_steps() {
        let mut ts = FixedTimestep::new(Duration::from_millis(20));
        assert_eq!(ts.accumulate(Duration::from_millis(16)), 0);
        assert_eq!(ts.accumulate(Duration::from_millis(16)), 1);
        // 12 ms carried over
        assert_eq!(ts.accumulate(Duration::from_millis(7)), 0);
        assert_eq!(ts.accumulate(Duration::from_millis(41)), 3);
        assert_eq!(ts.accumulate(Duration::from_millis(19)), 0);
    }

    #[test]
    fn long_stalls_are_capped() {
        let mut ts = FixedTimestep::new(Duration::from_millis(20));
        assert_eq!(ts.accumulate(Duration::from_secs(10)), MAX_CATCH_UP_STEPS);
        // The backlog is gone, not deferred
        assert_eq!(ts.accumulate(Duration::from_millis(19)), 0);
        assert_eq!(ts.accumulate(Duration::from_millis(1)), 1);
    }

    #[test]
    fn dt_is_the_step_in_seconds() {
        let ts = FixedTimestep::new(Duration::from_millis(20));
        assert_eq!(ts.dt(), 0.02);
    }
}
