use std::{
    collections::HashMap,
    fs::File,
    io::{Read, Write},
    path::Path,
};

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use liftlog_domain as domain;
use log::{debug, warn};

use crate::{EXERCISE_COLUMNS, ReadError, Table, WORKOUT_COLUMNS, WriteError};

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Exercise {
    pub name: String,
    pub parent_exercise: String,
    pub muscle_groups: String,
    pub description: String,
    pub form_notes: String,
}

impl Exercise {
    fn new(exercise: &domain::Exercise, exercises: &domain::Exercises) -> Self {
        Self {
            name: exercise.name.to_string(),
            parent_exercise: exercises
                .parent_of(exercise)
                .map(|p| p.name.to_string())
                .unwrap_or_default(),
            muscle_groups: exercise
                .muscle_groups
                .iter()
                .map(|m| m.label())
                .collect::<Vec<_>>()
                .join("; "),
            description: exercise.description.clone(),
            form_notes: exercise.form_notes.clone(),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Set {
    pub date: String,
    pub exercise: String,
    pub reps: String,
    pub weight: String,
    pub notes: String,
}

/// Read an exercise table.
///
/// Parent links are resolved after all rows have been read. Unknown parents
/// and unknown muscle groups are ignored.
pub fn read_exercises(reader: impl Read) -> Result<domain::Exercises, ReadError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    check_columns(reader.headers()?, &EXERCISE_COLUMNS, Table::Exercises)?;

    let mut exercises = domain::Exercises::new();
    let mut parents: Vec<(domain::ExerciseID, domain::Name)> = vec![];

    for (idx, record) in reader.deserialize::<Exercise>().enumerate() {
        let record = record?;
        let Ok(name) = domain::Name::new(&record.name) else {
            warn!("skipping exercise without name (row {})", idx + 1);
            continue;
        };
        let id = exercises.insert(
            name,
            domain::MuscleGroup::parse_list(&record.muscle_groups),
            record.description.trim().to_string(),
            record.form_notes.trim().to_string(),
        );
        parents.retain(|(child, _)| *child != id);
        if let Ok(parent) = domain::Name::new(&record.parent_exercise) {
            parents.push((id, parent));
        }
    }

    exercises.resolve_parents(parents);

    debug!("read {} exercises", exercises.len());

    Ok(exercises)
}

/// Read a workout log, grouping all sets of the same date into one workout.
///
/// Dates with a time part belong to the workout of their calendar day, which
/// keeps the date text of its first row. Workouts are ordered by date, sets
/// keep their row order.
pub fn read_workouts(
    reader: impl Read,
    exercises: &domain::Exercises,
) -> Result<Vec<domain::Workout>, ReadError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    check_columns(reader.headers()?, &WORKOUT_COLUMNS, Table::Workouts)?;

    let mut dates: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<(String, Vec<domain::Set>)> = vec![];

    for (idx, record) in reader.deserialize::<Set>().enumerate() {
        let record = record?;
        let row = idx + 1;
        let Some(exercise) = exercises.get(&record.exercise) else {
            return Err(ReadError::UnknownExercise {
                name: record.exercise.trim().to_string(),
                row,
            });
        };
        let set = domain::Set {
            exercise: exercise.id,
            reps: parse_reps(&record.reps, row),
            weight: record.weight.trim().to_string(),
            notes: record.notes.trim().to_string(),
        };
        let date = record.date.trim().to_string();
        let key = domain::parse_date(&date).map_or_else(|| date.clone(), |d| d.to_string());
        match dates.get(&key) {
            Some(&i) => grouped[i].1.push(set),
            None => {
                dates.insert(key, grouped.len());
                grouped.push((date, vec![set]));
            }
        }
    }

    let mut workouts = grouped
        .into_iter()
        .map(|(date, sets)| domain::Workout::new(&date, sets))
        .collect::<Vec<_>>();
    workouts.sort_by_cached_key(|w| (w.parsed_date(), w.date.clone()));

    for workout in workouts.iter().filter(|w| w.parsed_date().is_none()) {
        warn!("workout date '{}' is not an ISO 8601 date", workout.date);
    }

    debug!("read {} workouts", workouts.len());

    Ok(workouts)
}

pub fn write_exercises(
    writer: impl Write,
    exercises: &domain::Exercises,
) -> Result<(), WriteError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(EXERCISE_COLUMNS)?;

    for exercise in exercises {
        writer.serialize(Exercise::new(exercise, exercises))?;
    }

    writer.flush()?;

    Ok(())
}

pub fn write_workouts(
    writer: impl Write,
    workouts: &[domain::Workout],
    exercises: &domain::Exercises,
) -> Result<(), WriteError> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(writer);
    writer.write_record(WORKOUT_COLUMNS)?;

    for workout in workouts {
        for set in &workout.sets {
            let exercise = exercises
                .by_id(set.exercise)
                .ok_or(WriteError::UnknownExercise(*set.exercise))?;
            writer.serialize(Set {
                date: workout.date.clone(),
                exercise: exercise.name.to_string(),
                reps: set.reps.to_string(),
                weight: set.weight.clone(),
                notes: set.notes.clone(),
            })?;
        }
    }

    writer.flush()?;

    Ok(())
}

pub fn read_exercises_from_path(path: impl AsRef<Path>) -> Result<domain::Exercises, ReadError> {
    read_exercises(File::open(path)?)
}

pub fn read_workouts_from_path(
    path: impl AsRef<Path>,
    exercises: &domain::Exercises,
) -> Result<Vec<domain::Workout>, ReadError> {
    read_workouts(File::open(path)?, exercises)
}

fn check_columns(headers: &StringRecord, required: &[&str], table: Table) -> Result<(), ReadError> {
    let missing = required
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    if missing.is_empty() {
        return Ok(());
    }

    Err(ReadError::Schema {
        table,
        missing,
        found: headers.iter().map(ToString::to_string).collect(),
    })
}

fn parse_reps(text: &str, row: usize) -> u32 {
    let text = text.trim();

    if text.is_empty() {
        return 0;
    }

    if let Ok(reps) = text.parse::<u32>() {
        return reps;
    }

    match text.parse::<f64>() {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Ok(value) if value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value) => {
            value as u32
        }
        _ => {
            warn!("invalid reps '{text}' (row {row}), using 0");
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::tests::data::{EXERCISES_CSV, WORKOUTS_CSV, exercises};

    #[test]
    fn test_read_exercises() {
        let exercises = read_exercises(EXERCISES_CSV.as_bytes()).unwrap();

        assert_eq!(
            exercises
                .iter()
                .map(|e| e.name.to_string())
                .collect::<Vec<_>>(),
            vec![
                "Incline Bench Press",
                "Bench Press",
                "Squat",
                "Pull Up",
                "Plank"
            ]
        );

        let incline = exercises.get("Incline Bench Press").unwrap();
        assert_eq!(
            exercises.parent_of(incline).map(|e| e.name.to_string()),
            Some("Bench Press".to_string())
        );
        assert_eq!(
            incline.muscle_groups,
            BTreeSet::from([domain::MuscleGroup::Chest, domain::MuscleGroup::Shoulders])
        );

        let squat = exercises.get("Squat").unwrap();
        assert_eq!(squat.parent, None);
        assert_eq!(
            squat.muscle_groups,
            BTreeSet::from([domain::MuscleGroup::Legs, domain::MuscleGroup::Core])
        );
        assert_eq!(squat.description, "");
        assert_eq!(squat.form_notes, "Knees out");

        let pull_up = exercises.get("Pull Up").unwrap();
        assert_eq!(pull_up.parent, None);
        assert_eq!(
            pull_up.muscle_groups,
            BTreeSet::from([domain::MuscleGroup::Back])
        );

        assert_eq!(exercises.get("Plank").unwrap().muscle_groups, BTreeSet::new());
    }

    #[test]
    fn test_read_exercises_every_name_once() {
        let csv = "name,parent_exercise,muscle_groups,description,form_notes\n\
                   Squat,,Legs,,\n\
                   Front Squat,Squat,Legs,,\n\
                   Squat,,Legs;Core,High bar,\n";

        let exercises = read_exercises(csv.as_bytes()).unwrap();

        assert_eq!(exercises.len(), 2);
        assert_eq!(exercises.get("Squat").unwrap().description, "High bar");
        let front_squat = exercises.get("Front Squat").unwrap();
        assert_eq!(
            exercises.parent_of(front_squat).map(|e| e.name.to_string()),
            Some("Squat".to_string())
        );
    }

    #[test]
    fn test_read_exercises_columns_in_any_order() {
        let csv = "form_notes, name ,description,muscle_groups,parent_exercise,extra\n\
                   Brace,Deadlift,Hinge,Back,,ignored\n";

        let exercises = read_exercises(csv.as_bytes()).unwrap();

        let deadlift = exercises.get("Deadlift").unwrap();
        assert_eq!(deadlift.description, "Hinge");
        assert_eq!(deadlift.form_notes, "Brace");
    }

    #[test]
    fn test_read_exercises_skips_rows_without_name() {
        let csv = "name,parent_exercise,muscle_groups,description,form_notes\n\
                   ,,Legs,,\n\
                   Squat,,Legs,,\n";

        let exercises = read_exercises(csv.as_bytes()).unwrap();

        assert_eq!(exercises.len(), 1);
    }

    #[test]
    fn test_read_exercises_missing_column() {
        let csv = "name,parent_exercise,muscle_groups,form_notes\nSquat,,Legs,\n";

        let result = read_exercises(csv.as_bytes());

        assert!(matches!(
            result,
            Err(ReadError::Schema { table: Table::Exercises, missing, found })
                if missing == vec!["description"]
                    && found == vec!["name", "parent_exercise", "muscle_groups", "form_notes"]
        ));
    }

    #[test]
    fn test_read_exercises_blank_description() {
        let csv = "name,parent_exercise,muscle_groups,description,form_notes\nSquat,,Legs,,\n";

        let exercises = read_exercises(csv.as_bytes()).unwrap();

        assert_eq!(exercises.get("Squat").unwrap().description, "");
    }

    #[test]
    fn test_read_workouts() {
        let exercises = exercises();

        let workouts = read_workouts(WORKOUTS_CSV.as_bytes(), &exercises).unwrap();

        assert_eq!(
            workouts.iter().map(|w| w.date.as_str()).collect::<Vec<_>>(),
            vec!["2024-01-01", "2024-01-03", "2024-01-10"]
        );

        let first = &workouts[0];
        assert_eq!(
            first
                .sets
                .iter()
                .map(|s| (
                    exercises.by_id(s.exercise).unwrap().name.to_string(),
                    s.reps,
                    s.weight.as_str(),
                    s.notes.as_str()
                ))
                .collect::<Vec<_>>(),
            vec![
                ("Squat".to_string(), 5, "100", "felt strong"),
                ("Squat".to_string(), 5, "105", ""),
                ("Pull Up".to_string(), 8, "", "")
            ]
        );
        assert_eq!(first.notes.as_deref(), Some("felt strong"));

        let second = &workouts[1];
        assert_eq!(second.sets.len(), 2);
        assert_eq!(second.sets[0].reps, 0);
        assert_eq!(second.sets[1].weight, "body+10");
        assert_eq!(second.notes.as_deref(), Some("hold | last set"));

        assert_eq!(workouts[2].notes, None);
    }

    #[test]
    fn test_read_workouts_same_date_different_exercises() {
        let csv = "date,exercise,reps,weight,notes\n\
                   2024-02-01,Squat,5,100,\n\
                   2024-02-01,Bench Press,8,60,\n";

        let exercises = exercises();
        let workouts = read_workouts(csv.as_bytes(), &exercises).unwrap();

        assert_eq!(workouts.len(), 1);
        assert_eq!(
            workouts[0]
                .sets
                .iter()
                .map(|s| exercises.by_id(s.exercise).unwrap().name.to_string())
                .collect::<Vec<_>>(),
            vec!["Squat", "Bench Press"]
        );
    }

    #[test]
    fn test_read_workouts_same_day_with_time() {
        let csv = "date,exercise,reps,weight,notes\n\
                   2024-02-01,Squat,5,100,\n\
                   2024-02-02,Squat,5,100,\n\
                   2024-02-01T07:30:00,Bench Press,8,60,\n\
                   2024-02-01 18:00:00,Squat,3,110,\n";

        let workouts = read_workouts(csv.as_bytes(), &exercises()).unwrap();

        assert_eq!(
            workouts
                .iter()
                .map(|w| (w.date.as_str(), w.sets.len()))
                .collect::<Vec<_>>(),
            vec![("2024-02-01", 3), ("2024-02-02", 1)]
        );
    }

    #[test]
    fn test_read_workouts_unknown_exercise() {
        let csv = "date,exercise,reps,weight,notes\n\
                   2024-02-01,Squat,5,100,\n\
                   2024-02-01,Curl,8,20,\n";

        let result = read_workouts(csv.as_bytes(), &exercises());

        assert!(matches!(
            result,
            Err(ReadError::UnknownExercise { name, row: 2 }) if name == "Curl"
        ));
    }

    #[test]
    fn test_read_workouts_missing_columns() {
        let csv = "date,exercise,weight\n2024-02-01,Squat,100\n";

        let result = read_workouts(csv.as_bytes(), &exercises());

        assert!(matches!(
            result,
            Err(ReadError::Schema { table: Table::Workouts, missing, .. })
                if missing == vec!["reps", "notes"]
        ));
    }

    #[test]
    fn test_read_workouts_short_rows() {
        let csv = "date,exercise,reps,weight,notes\n2024-02-01,Squat,5\n";

        let workouts = read_workouts(csv.as_bytes(), &exercises()).unwrap();

        assert_eq!(workouts[0].sets[0].weight, "");
        assert_eq!(workouts[0].sets[0].notes, "");
    }

    #[rstest]
    #[case("5", 5)]
    #[case(" 12 ", 12)]
    #[case("", 0)]
    #[case("5.0", 5)]
    #[case("5.5", 0)]
    #[case("-3", 0)]
    #[case("many", 0)]
    fn test_parse_reps(#[case] text: &str, #[case] expected: u32) {
        assert_eq!(parse_reps(text, 1), expected);
    }

    #[test]
    fn test_write_exercises_round_trip() {
        let exercises = read_exercises(EXERCISES_CSV.as_bytes()).unwrap();
        let mut buffer: Vec<u8> = vec![];

        write_exercises(&mut buffer, &exercises).unwrap();

        assert_eq!(read_exercises(buffer.as_slice()).unwrap(), exercises);
    }

    #[test]
    fn test_write_workouts_round_trip() {
        let exercises = exercises();
        let workouts = read_workouts(WORKOUTS_CSV.as_bytes(), &exercises).unwrap();
        let mut buffer: Vec<u8> = vec![];

        write_workouts(&mut buffer, &workouts, &exercises).unwrap();

        let header = String::from_utf8(buffer.clone()).unwrap();
        assert!(header.starts_with("date,exercise,reps,weight,notes\n"));
        assert_eq!(
            read_workouts(buffer.as_slice(), &exercises).unwrap(),
            workouts
        );
    }

    #[test]
    fn test_write_workouts_without_workouts() {
        let mut buffer: Vec<u8> = vec![];

        write_workouts(&mut buffer, &[], &exercises()).unwrap();

        assert!(
            read_workouts(buffer.as_slice(), &exercises())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_write_workouts_unknown_exercise() {
        let workouts = vec![domain::Workout::new(
            "2024-01-01",
            vec![domain::Set {
                exercise: 42.into(),
                reps: 1,
                weight: String::new(),
                notes: String::new(),
            }],
        )];

        let result = write_workouts(Vec::<u8>::new(), &workouts, &exercises());

        assert!(matches!(result, Err(WriteError::UnknownExercise(42))));
    }
}
