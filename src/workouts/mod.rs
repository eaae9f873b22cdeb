//! Workout module for tracked exercises, days, and progress queries.

pub mod progress;
pub mod store;
pub mod types;

pub use progress::{latest_workout, most_frequent_name, personal_best, progress_series, ProgressPoint};
pub use store::{StoreError, StoreEvent, WorkoutStore};
pub use types::{Warmup, Workout, WorkoutDay, WorkoutEntry};
