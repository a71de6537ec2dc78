use super::sim::ForceSimulation;

pub(in crate::app) const TICKS_PER_FRAME: usize = 25;
pub(in crate::app) const ALPHA_MIN: f32 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Bridges the simulation to the host's frame cadence. Each presented frame
/// runs a fixed batch of integration steps, and another frame is requested
/// only while the simulation still carries energy; `Stopped` is terminal and
/// only entered from teardown.
pub(in crate::app) struct TickScheduler {
    state: SchedulerState,
    ticks_per_frame: usize,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            ticks_per_frame: TICKS_PER_FRAME,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    pub fn start(&mut self) {
        if self.state == SchedulerState::Idle {
            self.state = SchedulerState::Running;
        }
    }

    pub fn restart(&mut self) {
        if self.state != SchedulerState::Stopped {
            self.state = SchedulerState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.state = SchedulerState::Stopped;
    }

    /// Advances one display frame: the whole batch completes before positions
    /// are published by the caller. Returns whether the host must schedule
    /// another frame.
    pub fn on_frame(&mut self, sim: &mut ForceSimulation) -> bool {
        if self.state != SchedulerState::Running {
            return false;
        }

        for _ in 0..self.ticks_per_frame {
            sim.step();
        }

        if sim.alpha() > ALPHA_MIN {
            true
        } else {
            self.state = SchedulerState::Idle;
            false
        }
    }
}
