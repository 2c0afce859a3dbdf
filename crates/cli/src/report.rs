use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, anyhow};
use liftlog_domain as domain;
use log::info;
use regex::Regex;

use crate::{
    chart::{self, ChartKind},
    settings::Settings,
};

static UNSAFE_CHARACTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\d]+").expect("valid pattern"));

/// Lower-cased name with every run of non-word characters replaced by `_`.
#[must_use]
pub fn safe_filename(name: &str) -> String {
    UNSAFE_CHARACTERS
        .replace_all(&name.trim().to_lowercase(), "_")
        .into_owned()
}

/// Print one line per workout, followed by the number of sets per muscle
/// group. Nothing is printed if there are no workouts.
pub fn write_summary(
    mut out: impl Write,
    workouts: &[domain::Workout],
    exercises: &domain::Exercises,
) -> io::Result<()> {
    if workouts.is_empty() {
        return Ok(());
    }

    writeln!(out, "Progress summary:")?;
    for workout in workouts {
        writeln!(
            out,
            "Date: {}, Sets: {}, Notes: {}",
            workout.date,
            workout.sets.len(),
            workout.notes.as_deref().unwrap_or("-")
        )?;
    }

    let sets_by_muscle_group = domain::sets_by_muscle_group(workouts, exercises);
    if !sets_by_muscle_group.is_empty() {
        writeln!(out, "Sets per muscle group:")?;
        for (muscle_group, sets) in sets_by_muscle_group {
            writeln!(out, "  {muscle_group}: {sets}")?;
        }
    }

    Ok(())
}

/// Render all charts into subdirectories of `output_dir`.
///
/// Exercises with weighted sets get a volume and a weight chart, exercises
/// with sets without weight get a reps chart. Returns the written files.
pub fn write_charts(
    workouts: &[domain::Workout],
    exercises: &domain::Exercises,
    output_dir: &Path,
    settings: &Settings,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut written = vec![];

    for id in domain::weighted_exercises(workouts) {
        let exercise = exercise(exercises, id)?;
        let name = exercise.name.as_str();

        let svg = chart::plot_volume(name, &domain::volume_by_date(workouts, id), settings)
            .map_err(|err| anyhow!("failed to plot volume of '{name}': {err}"))?;
        written.extend(save(ChartKind::Volume, name, svg, output_dir)?);

        let svg = chart::plot_weight_stats(
            name,
            &domain::weight_stats_by_date(workouts, id),
            settings,
        )
        .map_err(|err| anyhow!("failed to plot weight of '{name}': {err}"))?;
        written.extend(save(ChartKind::WeightStats, name, svg, output_dir)?);
    }

    for id in domain::rep_only_exercises(workouts) {
        let exercise = exercise(exercises, id)?;
        let name = exercise.name.as_str();

        let svg = chart::plot_reps(name, &domain::reps_by_date(workouts, id), settings)
            .map_err(|err| anyhow!("failed to plot reps of '{name}': {err}"))?;
        written.extend(save(ChartKind::Reps, name, svg, output_dir)?);
    }

    Ok(written)
}

fn exercise(
    exercises: &domain::Exercises,
    id: domain::ExerciseID,
) -> anyhow::Result<&domain::Exercise> {
    exercises
        .by_id(id)
        .ok_or_else(|| anyhow!("unknown exercise #{}", *id))
}

fn save(
    kind: ChartKind,
    name: &str,
    svg: Option<String>,
    output_dir: &Path,
) -> anyhow::Result<Option<PathBuf>> {
    let Some(svg) = svg else {
        info!("no {} data for '{name}', skipping chart", kind.dir_name());
        return Ok(None);
    };

    let dir = output_dir.join(kind.dir_name());
    fs::create_dir_all(&dir).with_context(|| format!("failed to create {}", dir.display()))?;

    let path = dir.join(format!("{}.svg", safe_filename(name)));
    fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;

    info!("saved {} chart to {}", kind.dir_name(), path.display());

    Ok(Some(path))
}
