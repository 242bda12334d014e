use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use waypoint_config::CatalogSettings;
use waypoint_core::RandomOutcomeSource;
use waypoint_shared::{Ticket, TransportationMode};

use crate::{CatalogError, CatalogResult};

/// Supplies the candidate tickets for a destination and transport mode
#[async_trait]
pub trait TicketSource: Send + Sync {
    async fn generate_options(
        &self,
        destination: &str,
        mode: TransportationMode,
    ) -> CatalogResult<Vec<Ticket>>;
}

/// Randomized ticket catalog.
///
/// Every call produces a fresh set of tickets; nothing is shared between runs.
pub struct TicketCatalog {
    random: Arc<dyn RandomOutcomeSource>,
    settings: CatalogSettings,
}

impl TicketCatalog {
    pub fn new(random: Arc<dyn RandomOutcomeSource>, settings: CatalogSettings) -> Self {
        Self { random, settings }
    }

    fn draw(&self, what: &'static str, min: u32, max: u32) -> CatalogResult<u32> {
        let value = self.random.random_int(min.into(), max.into())?;
        u32::try_from(value)
            .ok()
            .filter(|v| (min..=max).contains(v))
            .ok_or(CatalogError::DrawOutOfRange { what, value })
    }
}

#[async_trait]
impl TicketSource for TicketCatalog {
    async fn generate_options(
        &self,
        destination: &str,
        mode: TransportationMode,
    ) -> CatalogResult<Vec<Ticket>> {
        let s = &self.settings;
        let count = self.draw("option count", s.min_options, s.max_options)?;

        let mut tickets = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let price = self.draw("price", s.min_price, s.max_price)?;
            let seats = self.draw("seat", s.min_seats, s.max_seats)?;
            let code = self
                .random
                .random_code(&s.ticket_code_alphabet, s.ticket_code_length)?;
            tickets.push(Ticket::new(code, price, seats));
        }

        tracing::debug!(destination, %mode, count, "Generated ticket options");
        Ok(tickets)
    }
}

/// Returns the same tickets on every call and counts how often it was asked
#[derive(Default)]
pub struct FixedTicketSource {
    tickets: Vec<Ticket>,
    calls: AtomicUsize,
}

impl FixedTicketSource {
    pub fn new(tickets: Vec<Ticket>) -> Self {
        Self {
            tickets,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketSource for FixedTicketSource {
    async fn generate_options(
        &self,
        _destination: &str,
        _mode: TransportationMode,
    ) -> CatalogResult<Vec<Ticket>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.tickets.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::{ScriptedOutcomeSource, StdOutcomeSource};

    fn catalog(random: Arc<dyn RandomOutcomeSource>) -> TicketCatalog {
        TicketCatalog::new(random, CatalogSettings::default())
    }

    #[tokio::test]
    async fn test_generated_options_respect_bounds() {
        for seed in 0..200 {
            let catalog = catalog(Arc::new(StdOutcomeSource::seeded(seed)));
            let tickets = catalog
                .generate_options("Lviv", TransportationMode::Train)
                .await
                .unwrap();

            assert!((2..=4).contains(&tickets.len()));
            for ticket in &tickets {
                assert!((100..=500).contains(&ticket.price));
                assert!((1..=5).contains(&ticket.available_seats));
                assert_eq!(ticket.code.chars().count(), 10);
                assert!(ticket
                    .code
                    .chars()
                    .all(|c| ('A'..='J').contains(&c) || ('1'..='9').contains(&c)));
            }
        }
    }

    #[tokio::test]
    async fn test_draw_order_is_price_seats_code() {
        let random = Arc::new(
            ScriptedOutcomeSource::new()
                .with_ints([2, 150, 3, 120, 1])
                .with_codes(["AAAAAAAAA1", "BBBBBBBBB2"]),
        );
        let tickets = catalog(random.clone())
            .generate_options("Odesa", TransportationMode::Bus)
            .await
            .unwrap();

        assert_eq!(
            tickets,
            vec![
                Ticket::new("AAAAAAAAA1", 150, 3),
                Ticket::new("BBBBBBBBB2", 120, 1),
            ]
        );
        assert_eq!(random.int_draws(), 5);
        assert_eq!(random.code_draws(), 2);
    }

    #[tokio::test]
    async fn test_inverted_bounds_surface_as_error() {
        let settings = CatalogSettings {
            min_price: 600,
            max_price: 100,
            ..Default::default()
        };
        let catalog = TicketCatalog::new(Arc::new(StdOutcomeSource::seeded(1)), settings);

        let result = catalog
            .generate_options("Kyiv", TransportationMode::Plane)
            .await;
        assert!(matches!(result, Err(CatalogError::Random(_))));
    }

    #[tokio::test]
    async fn test_fixed_source_counts_calls() {
        let source = FixedTicketSource::new(vec![Ticket::new("CODE", 100, 1)]);
        assert_eq!(source.calls(), 0);

        let tickets = source
            .generate_options("Kyiv", TransportationMode::Plane)
            .await
            .unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(source.calls(), 1);
    }
}
