//! Workout data-access layer.
//!
//! Owns the two persisted JSON documents (`workouts` and `workout-days`),
//! exposes CRUD and query operations over them, and notifies subscribers
//! after every successful mutation. Each mutation rewrites the whole
//! affected collection; there is no partial write.

use crate::storage::backend::{StorageBackend, StorageError};
use crate::workouts::types::{Warmup, Workout, WorkoutDay, WorkoutEntry};
use chrono::NaiveDate;
use crossbeam::channel::{Receiver, Sender};
use thiserror::Error;
use uuid::Uuid;

/// Document key for the workout collection.
const WORKOUTS_KEY: &str = "workouts";
/// Document key for the workout-day collection.
const WORKOUT_DAYS_KEY: &str = "workout-days";

/// Which persisted collection changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// The `workouts` document was rewritten
    WorkoutsChanged,
    /// The `workout-days` document was rewritten
    DaysChanged,
}

/// Store for workouts, workout days, and their warmup logs.
///
/// Constructed with an injected [`StorageBackend`]; use
/// [`MemoryBackend`](crate::storage::MemoryBackend) for tests and
/// [`SqliteBackend`](crate::storage::SqliteBackend) for durable storage.
pub struct WorkoutStore<B: StorageBackend> {
    backend: B,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl<B: StorageBackend> WorkoutStore<B> {
    /// Create a store over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            subscribers: Vec::new(),
        }
    }

    /// Register a change listener. Every successful mutation sends a
    /// [`StoreEvent`] for each collection it rewrote; listeners are expected
    /// to re-read the collection they care about.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = crossbeam::channel::unbounded();
        self.subscribers.push(tx);
        rx
    }

    // ========== Reads ==========

    /// Get all workouts, in insertion order.
    pub fn workouts(&self) -> Result<Vec<Workout>, StoreError> {
        self.load_workouts()
    }

    /// Get all workout days, in insertion order.
    pub fn workout_days(&self) -> Result<Vec<WorkoutDay>, StoreError> {
        self.load_days()
    }

    /// Get a workout by id.
    pub fn workout_by_id(&self, id: Uuid) -> Result<Option<Workout>, StoreError> {
        Ok(self.load_workouts()?.into_iter().find(|w| w.id == id))
    }

    /// Get a workout day by id.
    pub fn day_by_id(&self, id: Uuid) -> Result<Option<WorkoutDay>, StoreError> {
        Ok(self.load_days()?.into_iter().find(|d| d.id == id))
    }

    /// Get the workouts that belong to a day. Unknown days yield an empty
    /// list rather than an error.
    pub fn workouts_for_day(&self, day_id: Uuid) -> Result<Vec<Workout>, StoreError> {
        let day = match self.day_by_id(day_id)? {
            Some(day) => day,
            None => return Ok(Vec::new()),
        };

        Ok(self
            .load_workouts()?
            .into_iter()
            .filter(|w| day.workouts.contains(&w.id))
            .collect())
    }

    /// Get the history entries of a workout whose UTC date part equals
    /// `date`. Unknown workouts and workouts without history yield an empty
    /// list.
    pub fn entries_on(&self, workout_id: Uuid, date: NaiveDate) -> Result<Vec<WorkoutEntry>, StoreError> {
        let workout = match self.workout_by_id(workout_id)? {
            Some(workout) => workout,
            None => return Ok(Vec::new()),
        };

        let history = match workout.history {
            Some(history) => history,
            None => return Ok(Vec::new()),
        };

        Ok(history
            .into_iter()
            .filter(|entry| entry.date.date_naive() == date)
            .collect())
    }

    // ========== Workout mutations ==========

    /// Add a new workout.
    ///
    /// The stored record's history is synthesized as a single entry matching
    /// the denormalized sets/reps/weight/date fields. If the workout names a
    /// day, the day is validated up front (so a missing day cannot leave a
    /// half-linked record) and the workout is attached to it.
    pub fn add_workout(&mut self, workout: Workout) -> Result<Workout, StoreError> {
        if let Some(day_id) = workout.day_id {
            if self.day_by_id(day_id)?.is_none() {
                return Err(StoreError::DayNotFound(day_id));
            }
        }

        let mut stored = workout;
        stored.history = Some(vec![WorkoutEntry::new(
            stored.sets,
            stored.reps,
            stored.weight,
            stored.date,
        )]);

        let mut workouts = self.load_workouts()?;
        workouts.push(stored.clone());
        self.save_workouts(&workouts)?;
        tracing::debug!("Added workout {} ({})", stored.name, stored.id);

        if let Some(day_id) = stored.day_id {
            self.attach_workout_to_day(day_id, stored.id)?;
        }

        self.notify(StoreEvent::WorkoutsChanged);
        Ok(stored)
    }

    /// Add a workout to a day's membership and backfill the workout's
    /// `day_id` back-reference. A no-op if the workout is already a member.
    pub fn attach_workout_to_day(&mut self, day_id: Uuid, workout_id: Uuid) -> Result<(), StoreError> {
        let mut days = self.load_days()?;
        let day_index = days
            .iter()
            .position(|d| d.id == day_id)
            .ok_or(StoreError::DayNotFound(day_id))?;

        if days[day_index].workouts.contains(&workout_id) {
            return Ok(());
        }

        days[day_index].workouts.push(workout_id);
        self.save_days(&days)?;

        let mut workouts = self.load_workouts()?;
        let workout_index = workouts
            .iter()
            .position(|w| w.id == workout_id)
            .ok_or(StoreError::WorkoutNotFound(workout_id))?;
        workouts[workout_index].day_id = Some(day_id);
        self.save_workouts(&workouts)?;

        self.notify(StoreEvent::DaysChanged);
        self.notify(StoreEvent::WorkoutsChanged);
        Ok(())
    }

    /// Replace the stored workout with the same id wholesale.
    pub fn update_workout(&mut self, workout: Workout) -> Result<Workout, StoreError> {
        let mut workouts = self.load_workouts()?;
        let index = workouts
            .iter()
            .position(|w| w.id == workout.id)
            .ok_or(StoreError::WorkoutNotFound(workout.id))?;

        workouts[index] = workout.clone();
        self.save_workouts(&workouts)?;

        self.notify(StoreEvent::WorkoutsChanged);
        Ok(workout)
    }

    /// Delete a workout. If it belonged to a day, its id is removed from
    /// that day's membership; the unlink is best-effort and a missing day
    /// does not fail the delete.
    pub fn delete_workout(&mut self, id: Uuid) -> Result<(), StoreError> {
        let mut workouts = self.load_workouts()?;
        let index = workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or(StoreError::WorkoutNotFound(id))?;

        let removed = workouts.remove(index);
        self.save_workouts(&workouts)?;
        tracing::debug!("Deleted workout {}", id);

        if let Some(day_id) = removed.day_id {
            let mut days = self.load_days()?;
            if let Some(day_index) = days.iter().position(|d| d.id == day_id) {
                days[day_index].workouts.retain(|wid| *wid != id);
                self.save_days(&days)?;
                self.notify(StoreEvent::DaysChanged);
            }
        }

        self.notify(StoreEvent::WorkoutsChanged);
        Ok(())
    }

    // ========== Workout day mutations ==========

    /// Add a new workout day.
    pub fn add_workout_day(&mut self, day: WorkoutDay) -> Result<WorkoutDay, StoreError> {
        let mut days = self.load_days()?;
        days.push(day.clone());
        self.save_days(&days)?;

        self.notify(StoreEvent::DaysChanged);
        Ok(day)
    }

    /// Replace the stored day with the same id wholesale.
    pub fn update_workout_day(&mut self, day: WorkoutDay) -> Result<WorkoutDay, StoreError> {
        let mut days = self.load_days()?;
        let index = days
            .iter()
            .position(|d| d.id == day.id)
            .ok_or(StoreError::DayNotFound(day.id))?;

        days[index] = day.clone();
        self.save_days(&days)?;

        self.notify(StoreEvent::DaysChanged);
        Ok(day)
    }

    /// Delete a workout day.
    ///
    /// Removes the day record only: member workouts are neither deleted nor
    /// unlinked, so their `day_id` dangles afterwards. See DESIGN.md for the
    /// open question on cascade behavior.
    pub fn delete_workout_day(&mut self, id: Uuid) -> Result<(), StoreError> {
        let mut days = self.load_days()?;
        let index = days
            .iter()
            .position(|d| d.id == id)
            .ok_or(StoreError::DayNotFound(id))?;

        days.remove(index);
        self.save_days(&days)?;
        tracing::debug!("Deleted workout day {}", id);

        self.notify(StoreEvent::DaysChanged);
        Ok(())
    }

    // ========== Warmup mutations ==========

    /// Append a warmup to a day's warmup log.
    pub fn add_warmup(&mut self, day_id: Uuid, warmup: Warmup) -> Result<(), StoreError> {
        let mut days = self.load_days()?;
        let index = days
            .iter()
            .position(|d| d.id == day_id)
            .ok_or(StoreError::DayNotFound(day_id))?;

        days[index].warmups.push(warmup);
        self.save_days(&days)?;

        self.notify(StoreEvent::DaysChanged);
        Ok(())
    }

    /// Replace the warmup with the same id in a day's warmup log.
    pub fn update_warmup(&mut self, day_id: Uuid, warmup: Warmup) -> Result<(), StoreError> {
        let mut days = self.load_days()?;
        let index = days
            .iter()
            .position(|d| d.id == day_id)
            .ok_or(StoreError::DayNotFound(day_id))?;

        let warmup_index = days[index]
            .warmups
            .iter()
            .position(|w| w.id == warmup.id)
            .ok_or(StoreError::WarmupNotFound(warmup.id))?;

        days[index].warmups[warmup_index] = warmup;
        self.save_days(&days)?;

        self.notify(StoreEvent::DaysChanged);
        Ok(())
    }

    /// Remove a warmup from a day's warmup log.
    pub fn delete_warmup(&mut self, day_id: Uuid, warmup_id: Uuid) -> Result<(), StoreError> {
        let mut days = self.load_days()?;
        let index = days
            .iter()
            .position(|d| d.id == day_id)
            .ok_or(StoreError::DayNotFound(day_id))?;

        let warmup_index = days[index]
            .warmups
            .iter()
            .position(|w| w.id == warmup_id)
            .ok_or(StoreError::WarmupNotFound(warmup_id))?;

        days[index].warmups.remove(warmup_index);
        self.save_days(&days)?;

        self.notify(StoreEvent::DaysChanged);
        Ok(())
    }

    // ========== History entry mutations ==========

    /// Append an entry to a workout's history, initializing the history if
    /// absent. Entries sharing a date never overwrite each other.
    pub fn add_workout_entry(
        &mut self,
        workout_id: Uuid,
        entry: WorkoutEntry,
    ) -> Result<Workout, StoreError> {
        let mut workouts = self.load_workouts()?;
        let index = workouts
            .iter()
            .position(|w| w.id == workout_id)
            .ok_or(StoreError::WorkoutNotFound(workout_id))?;

        workouts[index].history.get_or_insert_with(Vec::new).push(entry);
        self.save_workouts(&workouts)?;

        self.notify(StoreEvent::WorkoutsChanged);
        Ok(workouts[index].clone())
    }

    /// Replace the history entry at `entry_index`.
    pub fn update_workout_entry(
        &mut self,
        workout_id: Uuid,
        entry_index: usize,
        entry: WorkoutEntry,
    ) -> Result<Workout, StoreError> {
        let mut workouts = self.load_workouts()?;
        let index = workouts
            .iter()
            .position(|w| w.id == workout_id)
            .ok_or(StoreError::WorkoutNotFound(workout_id))?;

        let history = workouts[index]
            .history
            .as_mut()
            .ok_or(StoreError::NoHistory(workout_id))?;

        let len = history.len();
        if entry_index >= len {
            return Err(StoreError::IndexOutOfBounds {
                index: entry_index,
                len,
            });
        }

        history[entry_index] = entry;
        self.save_workouts(&workouts)?;

        self.notify(StoreEvent::WorkoutsChanged);
        Ok(workouts[index].clone())
    }

    /// Remove the history entry at `entry_index`.
    pub fn delete_workout_entry(
        &mut self,
        workout_id: Uuid,
        entry_index: usize,
    ) -> Result<Workout, StoreError> {
        let mut workouts = self.load_workouts()?;
        let index = workouts
            .iter()
            .position(|w| w.id == workout_id)
            .ok_or(StoreError::WorkoutNotFound(workout_id))?;

        let history = workouts[index]
            .history
            .as_mut()
            .ok_or(StoreError::NoHistory(workout_id))?;

        let len = history.len();
        if entry_index >= len {
            return Err(StoreError::IndexOutOfBounds {
                index: entry_index,
                len,
            });
        }

        history.remove(entry_index);
        self.save_workouts(&workouts)?;

        self.notify(StoreEvent::WorkoutsChanged);
        Ok(workouts[index].clone())
    }

    // ========== Teardown ==========

    /// Remove both persisted documents.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.backend.remove(WORKOUTS_KEY)?;
        self.backend.remove(WORKOUT_DAYS_KEY)?;

        self.notify(StoreEvent::WorkoutsChanged);
        self.notify(StoreEvent::DaysChanged);
        Ok(())
    }

    // ========== Persistence helpers ==========

    fn load_workouts(&self) -> Result<Vec<Workout>, StoreError> {
        match self.backend.get(WORKOUTS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn load_days(&self) -> Result<Vec<WorkoutDay>, StoreError> {
        match self.backend.get(WORKOUT_DAYS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save_workouts(&mut self, workouts: &[Workout]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(workouts)?;
        self.backend.set(WORKOUTS_KEY, &raw)?;
        Ok(())
    }

    fn save_days(&mut self, days: &[WorkoutDay]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(days)?;
        self.backend.set(WORKOUT_DAYS_KEY, &raw)?;
        Ok(())
    }

    fn notify(&mut self, event: StoreEvent) {
        // Fire-and-forget; subscribers whose receiver is gone are pruned.
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Workout id does not resolve
    #[error("Workout not found: {0}")]
    WorkoutNotFound(Uuid),

    /// Workout day id does not resolve
    #[error("Workout day not found: {0}")]
    DayNotFound(Uuid),

    /// Warmup id does not resolve within the target day
    #[error("Warmup not found: {0}")]
    WarmupNotFound(Uuid),

    /// Entry operation on a workout without a history sequence
    #[error("Workout {0} has no history")]
    NoHistory(Uuid),

    /// Entry index invalid for the target history
    #[error("Entry index {index} out of bounds for history of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Backend failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Document encode/decode failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
