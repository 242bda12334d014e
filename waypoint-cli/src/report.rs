use std::fmt::Write as _;

use tokio::sync::broadcast::{self, error::RecvError};
use waypoint_shared::{BookingEvent, BookingEventKind, BookingOutcome, BookingRequest};

/// One progress line (or block) for a pipeline event
pub fn render_event(event: &BookingEvent) -> String {
    match &event.kind {
        BookingEventKind::AvailabilityCheckStarted { destination, mode } => {
            format!("Checking seat availability for a trip to {destination} by {mode}")
        }
        BookingEventKind::AvailabilityChecked {
            destination,
            mode,
            available: true,
        } => format!("Availability confirmed! Seats are available on {mode} to {destination}"),
        BookingEventKind::AvailabilityChecked {
            destination, mode, ..
        } => format!("Unfortunately, there are no free seats on {mode} to {destination}"),
        BookingEventKind::PriceSearchStarted {
            destination,
            mode,
            seats,
        } => format!(
            "Searching for the best price to {destination} by {mode} for {seats} seat(s)"
        ),
        BookingEventKind::PriceSearchSkipped => {
            "Could not look up prices because no seats are available".to_string()
        }
        BookingEventKind::TicketOptionsFound { tickets } => {
            let mut out = format!("Found {} ticket options:", tickets.len());
            for ticket in tickets {
                let _ = write!(out, "\n   - {ticket}");
            }
            out
        }
        BookingEventKind::TicketSelected { ticket } => format!("Best ticket option: {ticket}"),
        BookingEventKind::NoTicketQualified { seats } => {
            format!("No ticket has the required {seats} seat(s) available.")
        }
        BookingEventKind::ReservationStarted => "Finishing the ticket booking...".to_string(),
        BookingEventKind::ReservationSkipped => {
            "Cannot continue, no ticket was selected".to_string()
        }
        BookingEventKind::Reserved { code, .. } => format!("Ticket booked! Booking code: {code}"),
        BookingEventKind::ReservationFailed { .. } => {
            "Booking failed, please try again".to_string()
        }
    }
}

/// Final summary. Failures show only the reason code.
pub fn render_outcome(request: &BookingRequest, outcome: &BookingOutcome) -> String {
    let mut out = String::from("\n=== Booking Process Complete ===\n");

    match outcome.failure_reason {
        None if outcome.success => {
            out.push_str("Your ticket has been booked! Booking details:\n");
            let _ = writeln!(out, "  Destination: {}", request.destination);
            let _ = writeln!(out, "  Transportation: {}", request.mode);
            let _ = writeln!(out, "  Booking code: {}", outcome.code);
            let _ = writeln!(out, "  Price: {} USD", outcome.price);
            let _ = write!(out, "  Seats: {}", request.seats);
        }
        reason => {
            let code = reason.map(|r| r.code()).unwrap_or("UNKNOWN");
            let _ = write!(out, "Booking failed with error code {code}");
        }
    }

    out
}

/// Print events until every sender is gone
pub async fn print_progress(mut events: broadcast::Receiver<BookingEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => println!("{}", render_event(&event)),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Progress output fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_shared::{FailureReason, Ticket, TransportationMode};

    fn request() -> BookingRequest {
        BookingRequest::new("Kyiv", TransportationMode::Plane, 2)
    }

    fn event(kind: BookingEventKind) -> BookingEvent {
        BookingEvent::new(request().id, kind)
    }

    #[test]
    fn test_success_summary() {
        let outcome = BookingOutcome::booked("K3X9PL2M".to_string(), Ticket::new("ABCDEFGHIJ", 150, 1));
        let text = render_outcome(&request(), &outcome);

        assert!(text.contains("Destination: Kyiv"));
        assert!(text.contains("Transportation: PLANE"));
        assert!(text.contains("Booking code: K3X9PL2M"));
        assert!(text.contains("Price: 150 USD"));
        assert!(text.contains("Seats: 2"));
    }

    #[test]
    fn test_failure_summary_shows_code_only() {
        let text = render_outcome(&request(), &BookingOutcome::failed(FailureReason::ReserveError));
        assert!(text.ends_with("Booking failed with error code RESERVE-ERROR"));
        assert!(!text.contains("Price"));

        let text = render_outcome(&request(), &BookingOutcome::failed(FailureReason::NoTicket));
        assert!(text.ends_with("NO_TICKET"));
    }

    #[test]
    fn test_ticket_listing() {
        let text = render_event(&event(BookingEventKind::TicketOptionsFound {
            tickets: vec![Ticket::new("ABCDEFGHIJ", 150, 3), Ticket::new("JIHGFEDCBA", 120, 1)],
        }));

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Found 2 ticket options:");
        assert!(lines[2].contains("JIHGFEDCBA") && lines[2].contains("120 USD"));
    }

    #[test]
    fn test_availability_lines() {
        let yes = render_event(&event(BookingEventKind::AvailabilityChecked {
            destination: "Lviv".into(),
            mode: TransportationMode::Bus,
            available: true,
        }));
        let no = render_event(&event(BookingEventKind::AvailabilityChecked {
            destination: "Lviv".into(),
            mode: TransportationMode::Bus,
            available: false,
        }));

        assert!(yes.starts_with("Availability confirmed"));
        assert!(no.contains("no free seats on BUS to Lviv"));
    }

    #[tokio::test]
    async fn test_progress_printer_stops_when_senders_drop() {
        let (tx, rx) = broadcast::channel(8);
        tx.send(event(BookingEventKind::ReservationStarted)).unwrap();
        drop(tx);

        // returns instead of waiting forever
        print_progress(rx).await;
    }
}
