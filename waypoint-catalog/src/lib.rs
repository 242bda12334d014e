pub mod catalog;
pub mod selection;
pub mod inventory;

pub use catalog::{FixedTicketSource, TicketCatalog, TicketSource};
pub use selection::select_best;
pub use inventory::{reserve_seats, InventoryError};

use waypoint_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Random(#[from] CoreError),

    #[error("Random source returned {value}, outside the {what} range")]
    DrawOutOfRange { what: &'static str, value: i64 },
}

pub type CatalogResult<T> = Result<T, CatalogError>;
