//! RustLift - Strength Training Tracker
//!
//! Main entry point: opens the tracked-workout store in the platform data
//! directory and logs a summary of its contents.

use anyhow::Context;
use rustlift::storage::config;
use rustlift::workouts::progress;
use rustlift::{SqliteBackend, WorkoutStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting RustLift v{}", env!("CARGO_PKG_VERSION"));

    let app_config = config::load_config().context("failed to load configuration")?;
    let backend = SqliteBackend::open(&app_config.database_path())
        .context("failed to open workout database")?;
    let store = WorkoutStore::new(backend);

    let workouts = store.workouts().context("failed to read workouts")?;
    let days = store.workout_days().context("failed to read workout days")?;
    tracing::info!(
        "Tracking {} workouts across {} workout days",
        workouts.len(),
        days.len()
    );

    if let Some(latest) = progress::latest_workout(&workouts) {
        let (weight, unit) = app_config.units.display_weight(latest.weight);
        tracing::info!(
            "Last workout: {} ({} x {} @ {:.1} {})",
            latest.name,
            latest.sets,
            latest.reps,
            weight,
            unit
        );
    }

    if let Some(name) = progress::most_frequent_name(&workouts) {
        tracing::info!("Most logged workout: {}", name);
    }

    Ok(())
}
