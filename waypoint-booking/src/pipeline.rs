use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use waypoint_catalog::{reserve_seats, select_best, TicketCatalog, TicketSource};
use waypoint_config::{BookingSettings, PipelineSettings, Settings};
use waypoint_core::RandomOutcomeSource;
use waypoint_shared::{
    AvailabilityOutcome, BookingEvent, BookingEventKind, BookingOutcome, BookingRequest,
    FailureReason, PriceOutcome, TransportationMode,
};

use crate::state::PipelineState;
use crate::{BookingError, BookingResult};

const EVENT_CAPACITY: usize = 64;

/// Availability → price search → reservation, one spawned task per stage.
///
/// Failures flow forward as outcomes: a stage that receives a negative
/// upstream outcome returns its own negative outcome without sleeping,
/// drawing random values or touching tickets. Only runtime faults (a stage
/// task dying, a misconfigured random range) become `BookingError`s.
#[derive(Clone)]
pub struct BookingPipeline {
    random: Arc<dyn RandomOutcomeSource>,
    tickets: Arc<dyn TicketSource>,
    settings: PipelineSettings,
    booking: BookingSettings,
    events: broadcast::Sender<BookingEvent>,
}

impl BookingPipeline {
    pub fn new(
        random: Arc<dyn RandomOutcomeSource>,
        tickets: Arc<dyn TicketSource>,
        settings: PipelineSettings,
        booking: BookingSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            random,
            tickets,
            settings,
            booking,
            events,
        }
    }

    /// Pipeline backed by the randomized catalog, sharing one random source
    pub fn from_settings(settings: &Settings, random: Arc<dyn RandomOutcomeSource>) -> Self {
        let catalog = TicketCatalog::new(random.clone(), settings.catalog.clone());
        Self::new(
            random,
            Arc::new(catalog),
            settings.pipeline.clone(),
            settings.booking.clone(),
        )
    }

    /// Live progress for every run started after subscribing
    pub fn subscribe(&self) -> broadcast::Receiver<BookingEvent> {
        self.events.subscribe()
    }

    pub async fn run(
        &self,
        destination: impl Into<String>,
        mode: TransportationMode,
        seats: u32,
    ) -> BookingResult<BookingOutcome> {
        self.run_request(BookingRequest::new(destination, mode, seats))
            .await
    }

    /// Each stage is spawned only once its predecessor's outcome is known.
    pub async fn run_request(&self, request: BookingRequest) -> BookingResult<BookingOutcome> {
        if request.seats == 0 {
            return Err(BookingError::InvalidSeatCount(request.seats));
        }

        info!(
            run_id = %request.id,
            destination = %request.destination,
            mode = %request.mode,
            seats = request.seats,
            "Starting booking run"
        );
        let request = Arc::new(request);
        let state = PipelineState::CheckingAvailability;

        let availability = dispatch("availability", {
            let (this, request) = (self.clone(), request.clone());
            async move { this.check_availability(&request).await }
        })
        .await?;
        let state = state.advance(PipelineState::PricingSearch)?;

        let price = dispatch("price search", {
            let (this, request) = (self.clone(), request.clone());
            async move { this.find_best_price(availability, &request).await }
        })
        .await?;
        let state = state.advance(PipelineState::Reserving)?;

        let outcome = dispatch("reservation", {
            let (this, request) = (self.clone(), request.clone());
            async move { this.book_ticket(price, &request).await }
        })
        .await?;
        state.advance(PipelineState::Completed {
            success: outcome.success,
        })?;

        match outcome.failure_reason {
            None => info!(run_id = %request.id, code = %outcome.code, price = outcome.price, "Booking run succeeded"),
            Some(reason) => info!(run_id = %request.id, %reason, "Booking run failed"),
        }
        Ok(outcome)
    }

    /// Stage 1: always completes with an outcome.
    pub async fn check_availability(
        &self,
        request: &BookingRequest,
    ) -> BookingResult<AvailabilityOutcome> {
        self.publish(
            request.id,
            BookingEventKind::AvailabilityCheckStarted {
                destination: request.destination.clone(),
                mode: request.mode,
            },
        );
        info!(run_id = %request.id, destination = %request.destination, mode = %request.mode, "Checking seat availability");

        self.simulate_delay().await?;
        let available = self.random.random_bool(self.settings.availability_probability);

        if available {
            info!(run_id = %request.id, "Seats are available");
        } else {
            info!(run_id = %request.id, destination = %request.destination, mode = %request.mode, "No seats available");
        }
        self.publish(
            request.id,
            BookingEventKind::AvailabilityChecked {
                destination: request.destination.clone(),
                mode: request.mode,
                available,
            },
        );

        Ok(AvailabilityOutcome { available })
    }

    /// Stage 2: short-circuits without generating tickets when nothing is available.
    pub async fn find_best_price(
        &self,
        availability: AvailabilityOutcome,
        request: &BookingRequest,
    ) -> BookingResult<PriceOutcome> {
        self.publish(
            request.id,
            BookingEventKind::PriceSearchStarted {
                destination: request.destination.clone(),
                mode: request.mode,
                seats: request.seats,
            },
        );

        if !availability.available {
            debug!(run_id = %request.id, "Skipping price search, no availability");
            self.publish(request.id, BookingEventKind::PriceSearchSkipped);
            return Ok(PriceOutcome::not_found());
        }

        info!(run_id = %request.id, seats = request.seats, "Searching for the best price");
        self.simulate_delay().await?;

        let options = self
            .tickets
            .generate_options(&request.destination, request.mode)
            .await?;
        debug!(run_id = %request.id, count = options.len(), "Ticket options found");
        self.publish(
            request.id,
            BookingEventKind::TicketOptionsFound {
                tickets: options.clone(),
            },
        );

        match select_best(options, request.seats) {
            Some(ticket) => {
                info!(run_id = %request.id, code = %ticket.code, price = ticket.price, "Selected cheapest ticket");
                self.publish(
                    request.id,
                    BookingEventKind::TicketSelected {
                        ticket: ticket.clone(),
                    },
                );
                Ok(PriceOutcome::found(ticket))
            }
            None => {
                info!(run_id = %request.id, seats = request.seats, "No ticket has enough seats");
                self.publish(
                    request.id,
                    BookingEventKind::NoTicketQualified {
                        seats: request.seats,
                    },
                );
                Ok(PriceOutcome::not_found())
            }
        }
    }

    /// Stage 3: takes ownership of the selected ticket and deducts the whole
    /// request from it on success.
    pub async fn book_ticket(
        &self,
        price: PriceOutcome,
        request: &BookingRequest,
    ) -> BookingResult<BookingOutcome> {
        let PriceOutcome {
            ticket: Some(mut ticket),
            found: true,
        } = price
        else {
            debug!(run_id = %request.id, "Cannot reserve, no ticket was selected");
            self.publish(request.id, BookingEventKind::ReservationSkipped);
            return Ok(BookingOutcome::failed(FailureReason::NoTicket));
        };

        self.publish(request.id, BookingEventKind::ReservationStarted);
        info!(run_id = %request.id, code = %ticket.code, "Reserving ticket");
        self.simulate_delay().await?;

        if !self
            .random
            .random_bool(self.settings.reservation_success_probability)
        {
            warn!(run_id = %request.id, code = %ticket.code, "Reservation rejected");
            self.publish(
                request.id,
                BookingEventKind::ReservationFailed {
                    reason: FailureReason::ReserveError,
                },
            );
            return Ok(BookingOutcome::failed(FailureReason::ReserveError));
        }

        let code = self
            .random
            .random_code(&self.booking.code_alphabet, self.booking.code_length)?;
        let remaining = reserve_seats(&mut ticket, request.seats)?;
        info!(run_id = %request.id, booking_code = %code, remaining, "Ticket reserved");

        self.publish(
            request.id,
            BookingEventKind::Reserved {
                code: code.clone(),
                price: ticket.price,
            },
        );
        Ok(BookingOutcome::booked(code, ticket))
    }

    async fn simulate_delay(&self) -> BookingResult<Duration> {
        let min = i64::try_from(self.settings.min_delay_ms).unwrap_or(i64::MAX);
        let max = i64::try_from(self.settings.max_delay_ms).unwrap_or(i64::MAX);
        let millis = self.random.random_int(min, max)?;

        let delay = Duration::from_millis(u64::try_from(millis).unwrap_or_default());
        tokio::time::sleep(delay).await;
        Ok(delay)
    }

    fn publish(&self, run_id: Uuid, kind: BookingEventKind) {
        // No subscribers is fine
        let _ = self.events.send(BookingEvent::new(run_id, kind));
    }
}

/// Run one stage as its own task and wait for its outcome
async fn dispatch<T, F>(stage: &'static str, work: F) -> BookingResult<T>
where
    F: Future<Output = BookingResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work).await.map_err(|e| {
        tracing::error!(stage, "Stage task failed: {}", e);
        BookingError::Interrupted {
            stage,
            reason: e.to_string(),
        }
    })?
}
