use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;

/// Transport the traveller wants to book on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransportationMode {
    Plane,
    Train,
    Bus,
}

impl TransportationMode {
    pub const ALL: [TransportationMode; 3] = [Self::Plane, Self::Train, Self::Bus];

    /// Position in the interactive menu (1-based)
    pub fn from_menu_choice(choice: u32) -> Option<Self> {
        match choice {
            1 => Some(Self::Plane),
            2 => Some(Self::Train),
            3 => Some(Self::Bus),
            _ => None,
        }
    }
}

impl fmt::Display for TransportationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Plane => "PLANE",
            Self::Train => "TRAIN",
            Self::Bus => "BUS",
        };
        f.write_str(name)
    }
}

/// A candidate ticket produced for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ticket {
    pub code: String,
    pub price: u32,
    pub available_seats: u32,
}

impl Ticket {
    pub fn new(code: impl Into<String>, price: u32, available_seats: u32) -> Self {
        Self {
            code: code.into(),
            price,
            available_seats,
        }
    }

    pub fn can_seat(&self, requested_seats: u32) -> bool {
        self.available_seats >= requested_seats
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket code = {}, Price = {} USD, Seats available = {}",
            self.code, self.price, self.available_seats
        )
    }
}

/// What the caller asked the pipeline to book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub id: Uuid,
    pub destination: String,
    pub mode: TransportationMode,
    pub seats: u32,
    pub requested_at: DateTime<Utc>,
}

impl BookingRequest {
    pub fn new(destination: impl Into<String>, mode: TransportationMode, seats: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            destination: destination.into(),
            mode,
            seats,
            requested_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailabilityOutcome {
    pub available: bool,
}

/// Result of the price search. `found` is false whenever `ticket` is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PriceOutcome {
    pub ticket: Option<Ticket>,
    pub found: bool,
}

impl PriceOutcome {
    pub fn found(ticket: Ticket) -> Self {
        Self {
            ticket: Some(ticket),
            found: true,
        }
    }

    pub fn not_found() -> Self {
        Self {
            ticket: None,
            found: false,
        }
    }
}

/// Why a run ended without a booking
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FailureReason {
    #[serde(rename = "NO_TICKET")]
    NoTicket,
    #[serde(rename = "RESERVE-ERROR")]
    ReserveError,
}

impl FailureReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoTicket => "NO_TICKET",
            Self::ReserveError => "RESERVE-ERROR",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Terminal record of a pipeline run.
///
/// A successful outcome always carries a non-empty booking code, the price of
/// the ticket that was booked, and that ticket with its seats already taken.
/// A failed outcome has an empty code, a zero price and a failure reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookingOutcome {
    pub success: bool,
    pub code: String,
    pub price: u32,
    pub failure_reason: Option<FailureReason>,
    pub ticket: Option<Ticket>,
}

impl BookingOutcome {
    pub fn booked(code: String, ticket: Ticket) -> Self {
        Self {
            success: true,
            code,
            price: ticket.price,
            failure_reason: None,
            ticket: Some(ticket),
        }
    }

    pub fn failed(reason: FailureReason) -> Self {
        Self {
            success: false,
            code: String::new(),
            price: 0,
            failure_reason: Some(reason),
            ticket: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_codes() {
        assert_eq!(FailureReason::NoTicket.to_string(), "NO_TICKET");
        assert_eq!(FailureReason::ReserveError.to_string(), "RESERVE-ERROR");

        let json = serde_json::to_string(&FailureReason::ReserveError).unwrap();
        assert_eq!(json, "\"RESERVE-ERROR\"");
    }

    #[test]
    fn test_booked_outcome_carries_ticket_price() {
        let ticket = Ticket::new("ABCDE12345", 150, 1);
        let outcome = BookingOutcome::booked("XY12AB34".to_string(), ticket);

        assert!(outcome.success);
        assert_eq!(outcome.price, 150);
        assert!(outcome.failure_reason.is_none());
    }

    #[test]
    fn test_failed_outcome_is_empty() {
        let outcome = BookingOutcome::failed(FailureReason::NoTicket);
        assert!(!outcome.success);
        assert!(outcome.code.is_empty());
        assert_eq!(outcome.price, 0);
        assert!(outcome.ticket.is_none());
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(TransportationMode::from_menu_choice(1), Some(TransportationMode::Plane));
        assert_eq!(TransportationMode::from_menu_choice(3), Some(TransportationMode::Bus));
        assert_eq!(TransportationMode::from_menu_choice(0), None);
        assert_eq!(TransportationMode::from_menu_choice(4), None);
    }
}
