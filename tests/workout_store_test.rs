//! Integration tests for the workout store over the SQLite backend.

use chrono::{TimeZone, Utc};
use rustlift::workouts::progress;
use rustlift::{SqliteBackend, StoreEvent, Warmup, Workout, WorkoutDay, WorkoutEntry, WorkoutStore};
use tempfile::TempDir;

fn create_test_store() -> WorkoutStore<SqliteBackend> {
    let backend = SqliteBackend::open_in_memory().expect("Should open in-memory database");
    WorkoutStore::new(backend)
}

fn sample_date() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 30, 0).unwrap()
}

#[test]
fn test_full_leg_day_scenario() {
    let mut store = create_test_store();

    let day = store
        .add_workout_day(WorkoutDay::new("Leg Day".to_string(), sample_date()))
        .expect("Should add day");

    let squat = store
        .add_workout(Workout::new("Squat".to_string(), 3, 5, 135.0, sample_date()).with_day(day.id))
        .expect("Should add workout");

    // History is synthesized from the denormalized snapshot
    let history = squat.history.as_ref().expect("Should have history");
    assert_eq!(history.len(), 1);
    assert_eq!(
        (history[0].sets, history[0].reps, history[0].weight),
        (3, 5, 135.0)
    );
    assert_eq!(history[0].date, squat.date);

    // Both sides of the day link are in place
    let for_day = store.workouts_for_day(day.id).expect("Should query day");
    assert_eq!(for_day.len(), 1);
    assert_eq!(for_day[0].id, squat.id);
    assert_eq!(for_day[0].day_id, Some(day.id));

    // Log a second session a week later
    let t2 = Utc.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap();
    let entry = WorkoutEntry::new(3, 5, 140.0, t2);
    let updated = store
        .add_workout_entry(squat.id, entry.clone())
        .expect("Should add entry");
    assert_eq!(updated.history.unwrap().len(), 2);

    let on_t2 = store
        .entries_on(squat.id, t2.date_naive())
        .expect("Should query entries");
    assert_eq!(on_t2, vec![entry]);

    // Progress series sees one point per date
    let stored = store.workout_by_id(squat.id).unwrap().unwrap();
    let series = progress::progress_series(&stored);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].avg_weight, 135.0);
    assert_eq!(series[1].avg_weight, 140.0);
    assert_eq!(
        progress::personal_best(&stored).map(|e| e.weight),
        Some(140.0)
    );
}

#[test]
fn test_collections_survive_reopen() {
    let dir = TempDir::new().expect("Should create temp dir");
    let path = dir.path().join("lift.db");

    let day_id;
    let squat_id;
    {
        let backend = SqliteBackend::open(&path).expect("Should open database");
        let mut store = WorkoutStore::new(backend);

        let day = store
            .add_workout_day(WorkoutDay::new("Leg Day".to_string(), sample_date()))
            .unwrap();
        day_id = day.id;

        let squat = store
            .add_workout(
                Workout::new("Squat".to_string(), 3, 5, 135.0, sample_date()).with_day(day.id),
            )
            .unwrap();
        squat_id = squat.id;

        store
            .add_warmup(day.id, Warmup::new("Rowing".to_string(), 10, sample_date()))
            .unwrap();
    }

    let backend = SqliteBackend::open(&path).expect("Should reopen database");
    let store = WorkoutStore::new(backend);

    let day = store.day_by_id(day_id).unwrap().expect("Day should persist");
    assert_eq!(day.name, "Leg Day");
    assert_eq!(day.workouts, vec![squat_id]);
    assert_eq!(day.warmups.len(), 1);
    assert_eq!(day.warmups[0].description, "Rowing");

    let squat = store
        .workout_by_id(squat_id)
        .unwrap()
        .expect("Workout should persist");
    assert_eq!(squat.day_id, Some(day_id));
    assert_eq!(squat.history.unwrap().len(), 1);
}

#[test]
fn test_day_deletion_leaves_members_dangling() {
    let mut store = create_test_store();

    let day = store
        .add_workout_day(WorkoutDay::new("Leg Day".to_string(), sample_date()))
        .unwrap();
    let squat = store
        .add_workout(Workout::new("Squat".to_string(), 3, 5, 135.0, sample_date()).with_day(day.id))
        .unwrap();

    store.delete_workout_day(day.id).unwrap();

    // No cascade: the workout survives with its day reference dangling
    let stored = store.workout_by_id(squat.id).unwrap().unwrap();
    assert_eq!(stored.day_id, Some(day.id));
    assert!(store.workouts_for_day(day.id).unwrap().is_empty());
}

#[test]
fn test_change_events_reach_subscribers() {
    let mut store = create_test_store();
    let rx = store.subscribe();

    store
        .add_workout_day(WorkoutDay::new("Leg Day".to_string(), sample_date()))
        .unwrap();
    assert_eq!(rx.try_recv(), Ok(StoreEvent::DaysChanged));

    store
        .add_workout(Workout::new("Squat".to_string(), 3, 5, 135.0, sample_date()))
        .unwrap();
    assert_eq!(rx.try_recv(), Ok(StoreEvent::WorkoutsChanged));
}
