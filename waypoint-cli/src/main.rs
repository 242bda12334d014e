use std::io;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waypoint_booking::BookingPipeline;
use waypoint_cli::{print_progress, render_outcome, Prompter};
use waypoint_config::Settings;
use waypoint_core::{RandomOutcomeSource, StdOutcomeSource};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout belongs to the conversation, logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = Settings::load().context("Failed to load settings")?;

    let random: Arc<dyn RandomOutcomeSource> = match settings.random.seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded outcome source");
            Arc::new(StdOutcomeSource::seeded(seed))
        }
        None => Arc::new(StdOutcomeSource::from_entropy()),
    };
    let pipeline = BookingPipeline::from_settings(&settings, random);

    println!("Welcome to the ticket booking system!");
    println!("=====================================");

    let request = tokio::task::spawn_blocking(|| {
        Prompter::new(io::stdin().lock(), io::stdout()).ask_request()
    })
    .await
    .context("Prompt task stopped")??;

    tracing::info!(request_id = %request.id, destination = %request.destination, "Starting booking");

    let printer = tokio::spawn(print_progress(pipeline.subscribe()));
    let outcome = pipeline
        .run_request(request.clone())
        .await
        .context("Booking pipeline stopped")?;

    // closing the channel lets the printer drain and exit
    drop(pipeline);
    printer.await.context("Progress printer stopped")?;

    println!("{}", render_outcome(&request, &outcome));
    Ok(())
}
