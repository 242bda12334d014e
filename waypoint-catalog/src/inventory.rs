use waypoint_shared::Ticket;

/// Take `seats` from the ticket's capacity, returning what is left.
///
/// The full request is deducted in one step; a ticket that cannot hold the
/// whole request is left untouched.
pub fn reserve_seats(ticket: &mut Ticket, seats: u32) -> Result<u32, InventoryError> {
    if ticket.available_seats < seats {
        return Err(InventoryError::InsufficientSeats {
            code: ticket.code.clone(),
            requested: seats,
            available: ticket.available_seats,
        });
    }

    ticket.available_seats -= seats;
    Ok(ticket.available_seats)
}

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("Insufficient seats on ticket {code}: requested {requested}, available {available}")]
    InsufficientSeats {
        code: String,
        requested: u32,
        available: u32,
    },
}
