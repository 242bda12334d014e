pub mod state;
pub mod pipeline;

pub use state::PipelineState;
pub use pipeline::BookingPipeline;

use waypoint_catalog::{CatalogError, InventoryError};
use waypoint_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Seat count must be positive, got {0}")]
    InvalidSeatCount(u32),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("{stage} stage was interrupted: {reason}")]
    Interrupted { stage: &'static str, reason: String },

    #[error(transparent)]
    Random(#[from] CoreError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

pub type BookingResult<T> = Result<T, BookingError>;
