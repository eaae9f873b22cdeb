//! Domain records for tracked workouts, workout days, and warmups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One dated performance record (sets, reps, weight) for a workout.
///
/// Entries carry their own id so that two entries logged with identical
/// values stay distinguishable in the persisted documents. Documents written
/// before the id existed deserialize with the nil uuid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    /// Unique identifier
    #[serde(default)]
    pub id: Uuid,
    /// Number of sets performed
    pub sets: u32,
    /// Repetitions per set
    pub reps: u32,
    /// Weight lifted
    pub weight: f64,
    /// When the entry was performed
    pub date: DateTime<Utc>,
}

impl WorkoutEntry {
    /// Create a new entry with a fresh identity.
    pub fn new(sets: u32, reps: u32, weight: f64, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sets,
            reps,
            weight,
            date,
        }
    }
}

/// A named exercise tracked over time.
///
/// The top-level `sets`/`reps`/`weight`/`date` fields are a denormalized
/// snapshot of the latest state; `history` holds the full log in insertion
/// order, which is chronological entry of the log and NOT necessarily sorted
/// by each entry's `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    /// Unique identifier
    pub id: Uuid,
    /// Exercise name
    pub name: String,
    /// Latest number of sets
    pub sets: u32,
    /// Latest repetitions per set
    pub reps: u32,
    /// Latest weight lifted
    pub weight: f64,
    /// Date of the latest snapshot
    pub date: DateTime<Utc>,
    /// Full performance log, present once the workout has been stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<WorkoutEntry>>,
    /// Back-reference to the owning workout day, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub day_id: Option<Uuid>,
}

impl Workout {
    /// Create a new workout with the given name and latest-state snapshot.
    pub fn new(name: String, sets: u32, reps: u32, weight: f64, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            sets,
            reps,
            weight,
            date,
            history: None,
            day_id: None,
        }
    }

    /// Assign this workout to a day.
    pub fn with_day(mut self, day_id: Uuid) -> Self {
        self.day_id = Some(day_id);
        self
    }
}

/// A timed pre-workout activity logged against a workout day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warmup {
    /// Unique identifier
    pub id: Uuid,
    /// What the warmup was
    pub description: String,
    /// Duration in minutes
    pub duration_minutes: u32,
    /// When the warmup was performed
    pub date: DateTime<Utc>,
}

impl Warmup {
    /// Create a new warmup with a fresh identity.
    pub fn new(description: String, duration_minutes: u32, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description,
            duration_minutes,
            date,
        }
    }
}

/// A named grouping of workouts (e.g. "Leg Day").
///
/// `workouts` holds member workout ids; membership is maintained by the
/// store together with each member's `day_id` back-reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    /// Unique identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Creation timestamp
    pub date: DateTime<Utc>,
    /// Member workout ids
    #[serde(default)]
    pub workouts: Vec<Uuid>,
    /// Warmup log, in insertion order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warmups: Vec<Warmup>,
}

impl WorkoutDay {
    /// Create a new workout day with the given name.
    pub fn new(name: String, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            date,
            workouts: Vec::new(),
            warmups: Vec::new(),
        }
    }
}
