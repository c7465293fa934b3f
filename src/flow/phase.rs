//! Timed phases of the liquid fill sequence.
//!
//! Phases occupy contiguous half-open windows `[T(i-1), Ti)` measured from
//! the flow start. Locating a phase is a pure function of elapsed time.

use std::time::Duration;

use super::segment::{Part, Pipe, SegmentId};
use crate::options::FlowOptions;

/// What a phase fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseTarget {
    /// One specific run of a bent pipe.
    Segment(SegmentId),
    /// The single run of a straight pipe, whichever orientation it was
    /// built with.
    Straight(Pipe),
}

impl PhaseTarget {
    /// Pipe this target belongs to.
    #[must_use]
    pub const fn pipe(self) -> Pipe {
        match self {
            Self::Segment(id) => id.pipe,
            Self::Straight(pipe) => pipe,
        }
    }
}

/// One timed step of the sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowPhase {
    /// Short label for logs.
    pub label: &'static str,
    /// Meshes driven together in this window.
    pub targets: Vec<PhaseTarget>,
    /// Window length.
    pub duration: Duration,
}

/// Where elapsed time falls in a plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WalkPosition {
    /// Inside phase `index` with local progress in `[0, 1)`.
    InPhase {
        /// Active phase.
        index: usize,
        /// Local progress.
        progress: f32,
    },
    /// Past the last boundary.
    Complete,
}

/// Ordered phases with cached prefix-sum boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct PhasePlan {
    phases: Vec<FlowPhase>,
    ends: Vec<Duration>,
}

impl PhasePlan {
    /// Plan from phases in order.
    #[must_use]
    pub fn new(phases: Vec<FlowPhase>) -> Self {
        let ends = phases
            .iter()
            .scan(Duration::ZERO, |acc, phase| {
                *acc += phase.duration;
                Some(*acc)
            })
            .collect();
        Self { phases, ends }
    }

    /// The full FADEC unit fill: supply, below-mid, both branches in
    /// lockstep, mid, spool, then both outputs.
    #[must_use]
    pub fn fadec(options: &FlowOptions) -> Self {
        let ms = Duration::from_millis;
        let seg = |pipe, part| PhaseTarget::Segment(SegmentId::new(pipe, part));
        let branches = |part| vec![seg(Pipe::Left, part), seg(Pipe::Right, part)];
        Self::new(vec![
            FlowPhase {
                label: "supply rise",
                targets: vec![seg(Pipe::Supply, Part::Vertical)],
                duration: ms(options.supply_rise_ms),
            },
            FlowPhase {
                label: "supply turn",
                targets: vec![seg(Pipe::Supply, Part::Horizontal)],
                duration: ms(options.supply_turn_ms),
            },
            FlowPhase {
                label: "below mid",
                targets: vec![PhaseTarget::Straight(Pipe::BelowMid)],
                duration: ms(options.below_mid_ms),
            },
            FlowPhase {
                label: "branch rise",
                targets: branches(Part::Vertical),
                duration: ms(options.branch_rise_ms),
            },
            FlowPhase {
                label: "branch cross",
                targets: branches(Part::Horizontal),
                duration: ms(options.branch_cross_ms),
            },
            FlowPhase {
                label: "branch drop",
                targets: branches(Part::SecondVertical),
                duration: ms(options.branch_drop_ms),
            },
            FlowPhase {
                label: "mid",
                targets: vec![PhaseTarget::Straight(Pipe::Mid)],
                duration: ms(options.mid_ms),
            },
            FlowPhase {
                label: "spool",
                targets: vec![PhaseTarget::Straight(Pipe::Spool)],
                duration: ms(options.spool_ms),
            },
            FlowPhase {
                label: "outputs",
                targets: vec![
                    PhaseTarget::Straight(Pipe::LeftOutput),
                    PhaseTarget::Straight(Pipe::RightOutput),
                ],
                duration: ms(options.outputs_ms),
            },
        ])
    }

    /// Phases in order.
    #[must_use]
    pub fn phases(&self) -> &[FlowPhase] {
        &self.phases
    }

    /// Sum of all phase durations.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.ends.last().copied().unwrap_or_default()
    }

    /// Start offset of phase `index`.
    #[must_use]
    pub fn start_of(&self, index: usize) -> Duration {
        index
            .checked_sub(1)
            .and_then(|i| self.ends.get(i).copied())
            .unwrap_or_default()
    }

    /// Distinct pipes touched by the plan, in first-use order.
    #[must_use]
    pub fn pipes(&self) -> Vec<Pipe> {
        let mut pipes = Vec::new();
        for target in self.phases.iter().flat_map(|p| &p.targets) {
            if !pipes.contains(&target.pipe()) {
                pipes.push(target.pipe());
            }
        }
        pipes
    }

    /// Locate `elapsed` in the plan. A time exactly on a boundary belongs
    /// to the later phase; zero-length phases are never active.
    #[must_use]
    pub fn locate(&self, elapsed: Duration) -> WalkPosition {
        let Some(index) = self.ends.iter().position(|&end| elapsed < end) else {
            return WalkPosition::Complete;
        };
        let local = elapsed.saturating_sub(self.start_of(index));
        let duration = self.phases[index].duration;
        let progress = (local.as_secs_f32() / duration.as_secs_f32()).clamp(0.0, 1.0);
        WalkPosition::InPhase { index, progress }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> PhasePlan {
        PhasePlan::fadec(&FlowOptions::default())
    }

    #[test]
    fn total_is_sum_of_durations() {
        let plan = plan();
        let sum: Duration = plan.phases().iter().map(|p| p.duration).sum();
        assert_eq!(plan.total(), sum);
        assert_eq!(plan.total(), Duration::from_millis(13900));
    }

    #[test]
    fn boundary_belongs_to_later_phase() {
        let plan = plan();
        for i in 1..plan.phases().len() {
            let at = plan.start_of(i);
            assert_eq!(
                plan.locate(at),
                WalkPosition::InPhase { index: i, progress: 0.0 }
            );
        }
        assert_eq!(plan.locate(plan.total()), WalkPosition::Complete);
    }

    #[test]
    fn progress_is_linear_within_phase() {
        let plan = plan();
        match plan.locate(Duration::from_millis(1000)) {
            WalkPosition::InPhase { index, progress } => {
                assert_eq!(index, 0);
                assert!((progress - 0.5).abs() < 1e-6);
            }
            WalkPosition::Complete => unreachable!(),
        }
        match plan.locate(Duration::from_millis(2750)) {
            WalkPosition::InPhase { index, progress } => {
                assert_eq!(index, 1);
                assert!((progress - 0.5).abs() < 1e-6);
            }
            WalkPosition::Complete => unreachable!(),
        }
    }

    #[test]
    fn zero_length_phase_is_skipped() {
        let mut options = FlowOptions::default();
        options.supply_turn_ms = 0;
        let plan = PhasePlan::fadec(&options);
        assert_eq!(
            plan.locate(Duration::from_millis(2000)),
            WalkPosition::InPhase { index: 2, progress: 0.0 }
        );
    }

    #[test]
    fn empty_plan_is_immediately_complete() {
        let plan = PhasePlan::new(Vec::new());
        assert_eq!(plan.total(), Duration::ZERO);
        assert_eq!(plan.locate(Duration::ZERO), WalkPosition::Complete);
    }

    #[test]
    fn pipes_in_flow_order() {
        assert_eq!(plan().pipes(), Pipe::ALL.to_vec());
    }
}
