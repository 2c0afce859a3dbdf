#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use strum::Display;

pub mod table;

pub use table::{
    read_exercises, read_exercises_from_path, read_workouts, read_workouts_from_path,
    write_exercises, write_workouts,
};

pub const EXERCISE_COLUMNS: [&str; 5] = [
    "name",
    "parent_exercise",
    "muscle_groups",
    "description",
    "form_notes",
];

pub const WORKOUT_COLUMNS: [&str; 5] = ["date", "exercise", "reps", "weight", "notes"];

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    #[strum(to_string = "exercise")]
    Exercises,
    #[strum(to_string = "workout log")]
    Workouts,
}

#[derive(thiserror::Error, Debug)]
pub enum ReadError {
    #[error("missing required columns in {table} table: {missing:?} (found: {found:?})")]
    Schema {
        table: Table,
        missing: Vec<String>,
        found: Vec<String>,
    },
    #[error("unknown exercise '{name}' in workout log (row {row})")]
    UnknownExercise { name: String, row: usize },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("set refers to unknown exercise #{0}")]
    UnknownExercise(usize),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
