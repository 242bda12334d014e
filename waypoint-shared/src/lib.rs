pub mod models;

pub use models::booking::{
    AvailabilityOutcome, BookingOutcome, BookingRequest, FailureReason, PriceOutcome, Ticket,
    TransportationMode,
};
pub use models::events::{BookingEvent, BookingEventKind};
