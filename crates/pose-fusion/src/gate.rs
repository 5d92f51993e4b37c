//! Frame admission: throttle plus single-flight

use std::time::Duration;

/// Outcome of offering a frame to the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Frame may enter the pipeline
    Accepted,
    /// Arrived too soon after the previously accepted frame
    Throttled,
    /// A fusion pass is already in flight
    Busy,
}

impl Admission {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Admission::Accepted)
    }
}

/// Acceptance state checked and updated as one step.
///
/// Callers keep a single instance behind one lock so two frames can never be
/// admitted concurrently.
#[derive(Debug, Clone)]
pub struct FrameGate {
    min_interval_ns: u64,
    last_accepted_ns: Option<u64>,
    in_flight: bool,
}

impl FrameGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval_ns: u64::try_from(min_interval.as_nanos()).unwrap_or(u64::MAX),
            last_accepted_ns: None,
            in_flight: false,
        }
    }

    /// Throttle is checked before single-flight; a frame arriving early is
    /// throttled even if the pipeline is idle.
    pub fn try_admit(&mut self, timestamp_ns: u64) -> Admission {
        if let Some(last) = self.last_accepted_ns {
            if timestamp_ns.saturating_sub(last) < self.min_interval_ns {
                return Admission::Throttled;
            }
        }

        if self.in_flight {
            return Admission::Busy;
        }

        self.last_accepted_ns = Some(timestamp_ns);
        self.in_flight = true;
        Admission::Accepted
    }

    /// Mark the in-flight pass finished
    pub fn complete(&mut self) {
        self.in_flight = false;
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn last_accepted_ns(&self) -> Option<u64> {
        self.last_accepted_ns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MS: u64 = 1_000_000;

    fn gate() -> FrameGate {
        FrameGate::new(Duration::from_millis(33))
    }

    #[test]
    fn test_first_frame_accepted() {
        let mut gate = gate();
        assert_eq!(gate.try_admit(0), Admission::Accepted);
        assert!(gate.is_in_flight());
        assert_eq!(gate.last_accepted_ns(), Some(0));
    }

    #[test]
    fn test_throttle_sequence() {
        let mut gate = gate();
        assert_eq!(gate.try_admit(0), Admission::Accepted);
        gate.complete();

        assert_eq!(gate.try_admit(40 * MS), Admission::Accepted);
        gate.complete();

        assert_eq!(gate.try_admit(50 * MS), Admission::Throttled);
        assert_eq!(gate.last_accepted_ns(), Some(40 * MS));
    }

    #[test]
    fn test_busy_while_in_flight() {
        let mut gate = gate();
        assert_eq!(gate.try_admit(0), Admission::Accepted);
        assert_eq!(gate.try_admit(100 * MS), Admission::Busy);

        // A busy frame does not move the throttle reference
        assert_eq!(gate.last_accepted_ns(), Some(0));

        gate.complete();
        assert_eq!(gate.try_admit(100 * MS), Admission::Accepted);
    }

    #[test]
    fn test_throttled_frames_do_not_reset_interval() {
        let mut gate = gate();
        assert_eq!(gate.try_admit(0), Admission::Accepted);
        gate.complete();

        assert_eq!(gate.try_admit(20 * MS), Admission::Throttled);
        assert_eq!(gate.try_admit(34 * MS), Admission::Accepted);
    }

    #[test]
    fn test_exact_interval_is_accepted() {
        let mut gate = gate();
        gate.try_admit(0);
        gate.complete();
        assert_eq!(gate.try_admit(33 * MS), Admission::Accepted);
    }

    #[test]
    fn test_out_of_order_timestamp_is_throttled() {
        let mut gate = gate();
        gate.try_admit(100 * MS);
        gate.complete();
        assert_eq!(gate.try_admit(50 * MS), Admission::Throttled);
    }

    proptest! {
        #[test]
        fn prop_accepted_frames_respect_interval(
            gaps in prop::collection::vec(0u64..100 * MS, 1..50),
        ) {
            let mut gate = gate();
            let mut now = 0u64;
            let mut accepted: Vec<u64> = Vec::new();

            for gap in gaps {
                now += gap;
                if gate.try_admit(now).is_accepted() {
                    accepted.push(now);
                    gate.complete();
                }
            }

            for pair in accepted.windows(2) {
                prop_assert!(pair[1] - pair[0] >= 33 * MS);
            }
        }
    }
}
