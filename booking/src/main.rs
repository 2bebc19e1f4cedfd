//! Boxoffice demo binary
//!
//! Walks one booking through the whole funnel against the configured
//! catalog (or the built-in demo catalog with `BOXOFFICE_OFFLINE=true`) and
//! prints the confirmation.

use anyhow::{Context, bail};
use boxoffice::{
    BookingScope, CatalogClient, Config, FlowAction, FlowEnvironment, FlowState, HttpCatalogClient,
    Screen, SeatStatus, SimulatedPaymentGateway, StaticCatalog,
};
use boxoffice_core::environment::SystemClock;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_EMAIL: &str = "demo@boxoffice.local";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boxoffice=debug,boxoffice_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let catalog: Arc<dyn CatalogClient> = if config.catalog.offline {
        tracing::info!("Using the built-in demo catalog");
        Arc::new(StaticCatalog::demo())
    } else {
        tracing::info!(base_url = %config.catalog.base_url, "Using the catalog service");
        Arc::new(HttpCatalogClient::new(config.catalog.base_url.clone()))
    };
    let payments = SimulatedPaymentGateway::with_latency(config.payment_latency()).shared();
    let environment = FlowEnvironment::from_config(&config, catalog, payments, Arc::new(SystemClock));

    let mut scope = BookingScope::start(FlowState::new(config.default_query()), environment.clone());

    println!("=== Boxoffice: booking demo ===\n");

    // Login
    scope
        .dispatch(FlowAction::Login {
            email: DEMO_EMAIL.to_string(),
            password: "demo".to_string(),
        })
        .await?;
    let state = scope.snapshot().await?;
    if let Some(error) = state.catalog_error {
        bail!("Catalog unavailable: {error}");
    }

    println!(
        "Shows in {} ({}):",
        state.query.city, state.query.category
    );
    for show in state.visible_shows() {
        println!(
            "  #{:<3} {:<28} {:<22} {}",
            show.id, show.title, show.venue_name, show.price
        );
    }
    let show_id = state
        .visible_shows()
        .first()
        .map(|show| show.id)
        .context("The catalog returned no shows")?;

    // Show detail + customer info
    scope.dispatch(FlowAction::SelectShow { show_id }).await?;
    let state = scope.snapshot().await?;
    match state.loaded_detail() {
        Some(detail) => println!(
            "\n{} | {} | {} min | {}, {}",
            detail.title, detail.genre, detail.duration_minutes, detail.venue.name, detail.venue.city
        ),
        None => println!("\n{}", boxoffice::flow::DETAIL_UNAVAILABLE),
    }

    scope
        .dispatch(FlowAction::SubmitCustomerInfo {
            name: "Demo User".to_string(),
            email: DEMO_EMAIL.to_string(),
            phone: "9999999999".to_string(),
        })
        .await?;

    // Seats
    let free_seats: Vec<String> = scope
        .read(|state| {
            state
                .seat_layout(&environment)
                .into_iter()
                .flat_map(|row| row.seats)
                .filter(|(_, status)| *status == SeatStatus::Available)
                .take(2)
                .map(|(seat, _)| seat.to_string())
                .collect()
        })
        .await?;
    for seat in free_seats {
        scope.dispatch(FlowAction::ToggleSeat { seat }).await?;
    }
    scope.dispatch(FlowAction::ProceedToPayment).await?;

    let state = scope.snapshot().await?;
    if state.screen != Screen::Paying {
        bail!(
            "Could not reach payment: {}",
            state
                .validation
                .map_or_else(|| "guard redirect".to_string(), |e| e.message)
        );
    }

    // Payment
    scope
        .dispatch(FlowAction::SubmitPayment {
            number: "4242 4242 4242 4242".to_string(),
            holder: "Demo User".to_string(),
            expiry: "12/30".to_string(),
            cvv: "123".to_string(),
        })
        .await?;

    let state = scope.snapshot().await?;
    let confirmation = state
        .confirmation
        .context("Payment did not produce a confirmation")?;
    let seats: Vec<String> = confirmation.seats.iter().map(ToString::to_string).collect();

    println!("\n=== Booking confirmed ===");
    println!("Reference: {}", confirmation.reference);
    println!("Show:      {}", confirmation.title);
    println!("Seats:     {}", seats.join(", "));
    println!("Total:     {}", confirmation.total);
    println!("Customer:  {} <{}>", confirmation.customer.name, confirmation.customer.email);
    println!("Now on:    {}", state.screen);

    scope.close(Duration::from_secs(5)).await?;
    Ok(())
}
