use std::collections::{BTreeMap, BTreeSet};

use chrono::{Days, NaiveDate};
use log::warn;

use crate::{ExerciseID, Exercises, MuscleGroup, Set, Workout};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl Interval {
    /// Smallest interval containing all given dates.
    ///
    /// A single date is widened by one day on each side to get a non-empty
    /// range.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Option<Self> {
        let mut dates = dates.into_iter().peekable();
        let start = *dates.peek()?;
        let (first, last) = dates.fold((start, start), |(first, last), date| {
            (first.min(date), last.max(date))
        });

        if first == last {
            return Some(Interval {
                first: first.checked_sub_days(Days::new(1)).unwrap_or(first),
                last: last.checked_add_days(Days::new(1)).unwrap_or(last),
            });
        }

        Some(Interval { first, last })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightStats {
    pub min: f32,
    pub max: f32,
    pub avg: f32,
}

impl WeightStats {
    #[allow(clippy::cast_precision_loss)]
    fn from_values(values: &[f32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        Some(WeightStats {
            min: values
                .iter()
                .fold(f32::MAX, |min, &val| if val < min { val } else { min }),
            max: values
                .iter()
                .fold(f32::MIN, |max, &val| if val > max { val } else { max }),
            avg: values.iter().sum::<f32>() / values.len() as f32,
        })
    }
}

/// Total volume (reps × added load) per date.
///
/// Only sets with reps and a weight are considered. Sets whose weight cannot
/// be interpreted are skipped. Bodyweight sets count with their added load,
/// so a pure bodyweight set contributes zero.
#[must_use]
pub fn volume_by_date(workouts: &[Workout], exercise: ExerciseID) -> BTreeMap<NaiveDate, f32> {
    let mut result: BTreeMap<NaiveDate, f32> = BTreeMap::new();

    for (date, set) in sets_by_date(workouts, exercise) {
        if set.reps == 0 || !set.is_weighted() {
            continue;
        }
        match set.load() {
            #[allow(clippy::cast_precision_loss)]
            Ok(load) => *result.entry(date).or_default() += set.reps as f32 * load.added(),
            Err(err) => warn!("skipping set on {date}: {err}"),
        }
    }

    result
}

/// Total reps per date, saturating at `u32::MAX`.
#[must_use]
pub fn reps_by_date(workouts: &[Workout], exercise: ExerciseID) -> BTreeMap<NaiveDate, u32> {
    let mut result: BTreeMap<NaiveDate, u32> = BTreeMap::new();

    for (date, set) in sets_by_date(workouts, exercise) {
        if set.reps > 0 {
            let total = result.entry(date).or_default();
            *total = total.saturating_add(set.reps);
        }
    }

    result
}

/// Minimum, maximum and average added load per date.
#[must_use]
pub fn weight_stats_by_date(
    workouts: &[Workout],
    exercise: ExerciseID,
) -> BTreeMap<NaiveDate, WeightStats> {
    let mut date_map: BTreeMap<NaiveDate, Vec<f32>> = BTreeMap::new();

    for (date, set) in sets_by_date(workouts, exercise) {
        if !set.is_weighted() {
            continue;
        }
        match set.load() {
            Ok(load) => date_map.entry(date).or_default().push(load.added()),
            Err(err) => warn!("skipping set on {date}: {err}"),
        }
    }

    date_map
        .into_iter()
        .filter_map(|(date, values)| WeightStats::from_values(&values).map(|s| (date, s)))
        .collect()
}

#[must_use]
pub fn sets_by_muscle_group(
    workouts: &[Workout],
    exercises: &Exercises,
) -> BTreeMap<MuscleGroup, usize> {
    let mut result: BTreeMap<MuscleGroup, usize> = BTreeMap::new();

    for set in workouts.iter().flat_map(|w| &w.sets) {
        if let Some(exercise) = exercises.by_id(set.exercise) {
            for muscle_group in &exercise.muscle_groups {
                *result.entry(*muscle_group).or_default() += 1;
            }
        }
    }

    result
}

/// Exercises with at least one set that has a weight.
#[must_use]
pub fn weighted_exercises(workouts: &[Workout]) -> BTreeSet<ExerciseID> {
    workouts
        .iter()
        .flat_map(|w| &w.sets)
        .filter(|s| s.is_weighted())
        .map(|s| s.exercise)
        .collect()
}

/// Exercises with at least one set without weight.
#[must_use]
pub fn rep_only_exercises(workouts: &[Workout]) -> BTreeSet<ExerciseID> {
    workouts
        .iter()
        .flat_map(|w| &w.sets)
        .filter(|s| !s.is_weighted())
        .map(|s| s.exercise)
        .collect()
}

fn sets_by_date(
    workouts: &[Workout],
    exercise: ExerciseID,
) -> impl Iterator<Item = (NaiveDate, &Set)> {
    workouts
        .iter()
        .filter_map(|w| match w.parsed_date() {
            Some(date) => Some((date, w)),
            None => {
                warn!("skipping workout with invalid date '{}'", w.date);
                None
            }
        })
        .flat_map(move |(date, w)| w.sets_of(exercise).map(move |s| (date, s)))
}
