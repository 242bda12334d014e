use waypoint_shared::Ticket;

/// Cheapest ticket that can hold `requested_seats` on its own.
///
/// Tickets are ordered by price with a stable sort, so among equally priced
/// tickets the one generated first wins. Seats are never split across tickets.
pub fn select_best(mut tickets: Vec<Ticket>, requested_seats: u32) -> Option<Ticket> {
    tickets.sort_by_key(|t| t.price);
    tickets.into_iter().find(|t| t.can_seat(requested_seats))
}
