use crate::{BookingError, BookingResult};

/// Where a booking run is. Runs only move forward, one stage at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    CheckingAvailability,
    PricingSearch,
    Reserving,
    Completed { success: bool },
}

impl PipelineState {
    fn step(&self) -> u8 {
        match self {
            Self::CheckingAvailability => 0,
            Self::PricingSearch => 1,
            Self::Reserving => 2,
            Self::Completed { .. } => 3,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn can_transition_to(&self, next: PipelineState) -> bool {
        next.step() == self.step() + 1
    }

    /// Transition: current → next, rejecting skips and backtracking
    pub fn advance(self, next: PipelineState) -> BookingResult<PipelineState> {
        if !self.can_transition_to(next) {
            return Err(BookingError::InvalidTransition {
                from: format!("{:?}", self),
                to: format!("{:?}", next),
            });
        }

        tracing::debug!(from = ?self, to = ?next, "Pipeline state changed");
        Ok(next)
    }
}
