use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use liftlog::{logger, readme, report, settings::Settings};
use liftlog_domain as domain;
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Workout log charts and progress summary", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose logging
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Log warnings and errors only
    #[arg(short, long, global = true, action = ArgAction::SetTrue)]
    quiet: bool,

    /// JSON file with chart settings
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    settings: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render all charts and print the progress summary
    Run(RunArgs),
    /// Print the progress summary only
    Summary(InputArgs),
    /// Update the chart table of a Markdown document from existing charts
    Readme(ReadmeArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Exercise definitions
    #[arg(long, default_value = "input/exercises.csv", value_hint = ValueHint::FilePath)]
    exercises: PathBuf,

    /// Workout log
    #[arg(long, default_value = "input/data.csv", value_hint = ValueHint::FilePath)]
    log: PathBuf,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Directory for the rendered charts
    #[arg(short, long, default_value = "output", value_hint = ValueHint::DirPath)]
    output: PathBuf,

    /// Markdown document whose chart table is updated afterwards
    #[arg(long, value_hint = ValueHint::FilePath)]
    readme: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ReadmeArgs {
    /// Directory containing the rendered charts
    #[arg(short, long, default_value = "output", value_hint = ValueHint::DirPath)]
    output: PathBuf,

    /// Markdown document to update
    #[arg(long, default_value = "README.md", value_hint = ValueHint::FilePath)]
    readme: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logger::init(logger::level(cli.verbose, cli.quiet))?;

    let settings = match &cli.settings {
        Some(path) => Settings::read(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?,
        None => Settings::default(),
    };

    match cli.command {
        Command::Run(args) => handle_run(&args, &settings),
        Command::Summary(args) => handle_summary(&args),
        Command::Readme(args) => handle_readme(&args, &settings),
    }
}

fn handle_run(args: &RunArgs, settings: &Settings) -> Result<()> {
    let (exercises, workouts) = load(&args.input)?;

    let written = report::write_charts(&workouts, &exercises, &args.output, settings)?;
    info!("saved {} charts", written.len());

    report::write_summary(io::stdout().lock(), &workouts, &exercises)?;

    if let Some(readme) = &args.readme {
        update_readme(readme, &args.output, settings)?;
    }

    Ok(())
}

fn handle_summary(args: &InputArgs) -> Result<()> {
    let (exercises, workouts) = load(args)?;

    report::write_summary(io::stdout().lock(), &workouts, &exercises)?;

    Ok(())
}

fn handle_readme(args: &ReadmeArgs, settings: &Settings) -> Result<()> {
    update_readme(&args.readme, &args.output, settings)
}

fn load(args: &InputArgs) -> Result<(domain::Exercises, Vec<domain::Workout>)> {
    let exercises = liftlog_storage::read_exercises_from_path(&args.exercises)
        .with_context(|| format!("failed to load {}", args.exercises.display()))?;
    debug!(
        "loaded {} exercises from {}",
        exercises.len(),
        args.exercises.display()
    );

    let workouts = liftlog_storage::read_workouts_from_path(&args.log, &exercises)
        .with_context(|| format!("failed to load {}", args.log.display()))?;
    debug!(
        "loaded {} workouts from {}",
        workouts.len(),
        args.log.display()
    );

    Ok((exercises, workouts))
}

fn update_readme(readme: &Path, output: &Path, settings: &Settings) -> Result<()> {
    readme::update(readme, output, &settings.weight_unit)
        .with_context(|| format!("failed to update {}", readme.display()))
}
