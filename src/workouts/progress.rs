//! Derived read-only queries over workout history.
//!
//! Pure functions: callers fetch records from the store and reduce them
//! here. Dates are grouped on the UTC date part of each entry.

use crate::workouts::types::{Workout, WorkoutEntry};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// One point of a workout's progress series: all entries logged on a date
/// and their average weight.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressPoint {
    /// The UTC date the entries fall on
    pub date: NaiveDate,
    /// Average weight across the date's entries, rounded to one decimal
    pub avg_weight: f64,
    /// The entries logged on this date, in history order
    pub entries: Vec<WorkoutEntry>,
}

/// Group a workout's history by date, one point per date with the average
/// weight, sorted by date ascending. Empty when the workout has no history.
pub fn progress_series(workout: &Workout) -> Vec<ProgressPoint> {
    let history = match &workout.history {
        Some(history) if !history.is_empty() => history,
        _ => return Vec::new(),
    };

    let mut by_date: BTreeMap<NaiveDate, Vec<WorkoutEntry>> = BTreeMap::new();
    for entry in history {
        by_date
            .entry(entry.date.date_naive())
            .or_default()
            .push(entry.clone());
    }

    by_date
        .into_iter()
        .map(|(date, entries)| {
            let total: f64 = entries.iter().map(|e| e.weight).sum();
            let avg_weight = (total / entries.len() as f64 * 10.0).round() / 10.0;
            ProgressPoint {
                date,
                avg_weight,
                entries,
            }
        })
        .collect()
}

/// The heaviest entry in a workout's history.
pub fn personal_best(workout: &Workout) -> Option<&WorkoutEntry> {
    workout
        .history
        .as_ref()?
        .iter()
        .max_by(|a, b| a.weight.total_cmp(&b.weight))
}

/// The workout with the most recent denormalized date.
pub fn latest_workout(workouts: &[Workout]) -> Option<&Workout> {
    workouts.iter().max_by_key(|w| w.date)
}

/// The workout name logged most often.
pub fn most_frequent_name(workouts: &[Workout]) -> Option<&str> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for workout in workouts {
        *counts.entry(workout.name.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by_key(|(_, count)| *count)
        .map(|(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(weight: f64, y: i32, m: u32, d: u32, h: u32) -> WorkoutEntry {
        WorkoutEntry::new(3, 5, weight, Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    fn workout_with_history(entries: Vec<WorkoutEntry>) -> Workout {
        let mut workout = Workout::new("Squat".to_string(), 3, 5, 135.0, Utc::now());
        workout.history = Some(entries);
        workout
    }

    #[test]
    fn test_progress_series_groups_and_averages() {
        // Two entries on March 1, one on February 20; insertion order is not
        // date order
        let workout = workout_with_history(vec![
            entry(100.0, 2025, 3, 1, 9),
            entry(102.5, 2025, 3, 1, 18),
            entry(95.0, 2025, 2, 20, 9),
        ]);

        let series = progress_series(&workout);
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2025, 2, 20).unwrap());
        assert_eq!(series[0].avg_weight, 95.0);
        assert_eq!(series[0].entries.len(), 1);

        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(series[1].avg_weight, 101.3);
        assert_eq!(series[1].entries.len(), 2);
    }

    #[test]
    fn test_progress_series_empty_without_history() {
        let workout = Workout::new("Squat".to_string(), 3, 5, 135.0, Utc::now());
        assert!(progress_series(&workout).is_empty());

        let workout = workout_with_history(Vec::new());
        assert!(progress_series(&workout).is_empty());
    }

    #[test]
    fn test_personal_best_is_heaviest_entry() {
        let heavy = entry(110.0, 2025, 3, 1, 9);
        let workout = workout_with_history(vec![
            entry(100.0, 2025, 2, 20, 9),
            heavy.clone(),
            entry(105.0, 2025, 3, 8, 9),
        ]);

        assert_eq!(personal_best(&workout), Some(&heavy));

        let no_history = Workout::new("Squat".to_string(), 3, 5, 135.0, Utc::now());
        assert!(personal_best(&no_history).is_none());
    }

    #[test]
    fn test_latest_workout_by_date() {
        let older = Workout::new(
            "Squat".to_string(),
            3,
            5,
            135.0,
            Utc.with_ymd_and_hms(2025, 2, 20, 9, 0, 0).unwrap(),
        );
        let newer = Workout::new(
            "Bench Press".to_string(),
            3,
            8,
            80.0,
            Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        );

        let workouts = vec![older, newer.clone()];
        assert_eq!(latest_workout(&workouts).map(|w| w.id), Some(newer.id));
        assert!(latest_workout(&[]).is_none());
    }

    #[test]
    fn test_most_frequent_name() {
        let date = Utc::now();
        let workouts = vec![
            Workout::new("Squat".to_string(), 3, 5, 135.0, date),
            Workout::new("Bench Press".to_string(), 3, 8, 80.0, date),
            Workout::new("Squat".to_string(), 5, 5, 140.0, date),
        ];

        assert_eq!(most_frequent_name(&workouts), Some("Squat"));
        assert!(most_frequent_name(&[]).is_none());
    }
}
