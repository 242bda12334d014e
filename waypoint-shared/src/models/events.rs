use uuid::Uuid;
use crate::models::booking::{FailureReason, Ticket, TransportationMode};

/// Progress notification published while a booking run moves through its stages
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingEvent {
    pub run_id: Uuid,
    pub timestamp: i64,
    pub kind: BookingEventKind,
}

impl BookingEvent {
    pub fn new(run_id: Uuid, kind: BookingEventKind) -> Self {
        Self {
            run_id,
            timestamp: chrono::Utc::now().timestamp_millis(),
            kind,
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BookingEventKind {
    AvailabilityCheckStarted {
        destination: String,
        mode: TransportationMode,
    },
    AvailabilityChecked {
        destination: String,
        mode: TransportationMode,
        available: bool,
    },
    PriceSearchStarted {
        destination: String,
        mode: TransportationMode,
        seats: u32,
    },
    PriceSearchSkipped,
    TicketOptionsFound {
        tickets: Vec<Ticket>,
    },
    TicketSelected {
        ticket: Ticket,
    },
    NoTicketQualified {
        seats: u32,
    },
    ReservationStarted,
    ReservationSkipped,
    Reserved {
        code: String,
        price: u32,
    },
    ReservationFailed {
        reason: FailureReason,
    },
}
