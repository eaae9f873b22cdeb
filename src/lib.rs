//! RustLift - Strength Training Tracker
//!
//! An open-source, self-hosted strength training tracker built in Rust.
//! Records workouts and their full performance history, groups them into
//! workout days with warmup logs, and derives weight progression data,
//! all persisted as JSON documents in a pluggable key-value store.

pub mod storage;
pub mod workouts;

// Re-export commonly used types
pub use storage::backend::{MemoryBackend, StorageBackend};
pub use storage::sqlite::SqliteBackend;
pub use workouts::store::{StoreError, StoreEvent, WorkoutStore};
pub use workouts::types::{Warmup, Workout, WorkoutDay, WorkoutEntry};
