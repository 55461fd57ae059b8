use clap::{Parser, Subcommand};
use lift_core::records::today;
use lift_core::units::{format_duration, format_minutes};
use lift_core::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "liftstat")]
#[command(about = "Workout statistics and personal records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import sessions from a workout store JSON export
    Import {
        /// JSON file holding an array of sessions
        file: PathBuf,
    },

    /// Show statistics for every exercise, grouped by muscle group
    Stats {
        /// Also write the statistics to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Show the session history of one exercise
    History {
        /// Exercise name (case-insensitive)
        exercise: String,

        /// Treat the exercise as this category (strength, calisthenics, cardio)
        #[arg(long)]
        category: Option<String>,

        /// List oldest sessions first
        #[arg(long, conflicts_with = "newest_first")]
        oldest_first: bool,

        /// List newest sessions first
        #[arg(long, conflicts_with = "oldest_first")]
        newest_first: bool,

        /// Show every set under each session
        #[arg(long)]
        sets: bool,
    },

    /// Estimate a one-rep max from a submaximal lift
    Orm {
        /// Weight lifted, in display units
        weight: String,
        /// Repetitions performed
        reps: String,
    },

    /// Manage personal records
    #[command(subcommand)]
    Pr(PrCommand),
}

#[derive(Subcommand)]
enum PrCommand {
    /// List all personal records
    List,

    /// Show the personal record for one exercise
    Show { exercise: String },

    /// Record a lift: creates the exercise's record or improves it
    Add {
        exercise: String,
        weight: String,
        reps: String,
    },

    /// Re-estimate an existing record from a new lift
    Update {
        id: String,
        weight: String,
        reps: String,
    },

    /// Delete a record
    Delete { id: String },
}

fn main() -> ExitCode {
    lift_core::logging::init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_retryable() {
                eprintln!("Nothing was changed. Run the command again to retry.");
            } else if matches!(e, Error::Corrupt(_)) {
                eprintln!("Nothing was changed. Repair or move the file aside first.");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let data_dir = cli
        .data_dir
        .unwrap_or_else(|| config.data.data_dir.clone());
    let units = config.units.system;
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::Import { file } => cmd_import(&data_dir, &file),
        Commands::Stats { csv } => cmd_stats(&data_dir, csv.as_deref(), units),
        Commands::History {
            exercise,
            category,
            oldest_first,
            newest_first,
            sets,
        } => {
            let order = if oldest_first {
                SortOrder::OldestFirst
            } else if newest_first {
                SortOrder::NewestFirst
            } else {
                config.history.default_order
            };
            cmd_history(&data_dir, &exercise, category.as_deref(), order, sets, units)
        }
        Commands::Orm { weight, reps } => cmd_orm(&weight, &reps, units),
        Commands::Pr(command) => {
            let store = JsonRecordStore::new(Config::records_path(&data_dir));
            let mut tracker = PersonalRecordTracker::new(store, config.user.owner.clone());
            cmd_pr(&mut tracker, command, units)
        }
    }
}

fn cmd_import(data_dir: &Path, file: &Path) -> Result<()> {
    let log_path = Config::session_log_path(data_dir);
    let count = import_sessions(file, &log_path)?;
    println!("✓ Imported {} sessions", count);
    println!("  Log: {}", log_path.display());
    Ok(())
}

fn cmd_stats(data_dir: &Path, csv: Option<&Path>, units: UnitSystem) -> Result<()> {
    let sessions = read_sessions(&Config::session_log_path(data_dir))?;
    let stats = compute_exercise_statistics(&sessions);

    if stats.is_empty() {
        println!("No workouts logged yet.");
        return Ok(());
    }

    for (group, section) in group_by_muscle(&stats) {
        println!("\n── {} ──", group);
        for s in section {
            println!(
                "  {:<24} {:<28} {:>3} sets  last {}",
                s.name,
                describe_best(&s.best, units),
                s.total_sets,
                s.last_performed
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".into())
            );
        }
    }

    if let Some(path) = csv {
        let rows = export_statistics_csv(&stats, path, units)?;
        println!("\n✓ Exported {} exercises to {}", rows, path.display());
    }

    Ok(())
}

fn cmd_history(
    data_dir: &Path,
    exercise: &str,
    category: Option<&str>,
    order: SortOrder,
    show_sets: bool,
    units: UnitSystem,
) -> Result<()> {
    let sessions = read_sessions(&Config::session_log_path(data_dir))?;

    let category = match category {
        Some(raw) => ExerciseCategory::parse(raw)
            .ok_or_else(|| Error::InvalidInput(format!("unknown category '{}'", raw)))?,
        None => exercise_statistics(&sessions, exercise).category,
    };

    let history = compute_exercise_history(&sessions, exercise, category);
    let Some(summary) = &history.summary else {
        println!("No history for '{}'.", exercise.trim());
        return Ok(());
    };

    println!("\n{} ({})", history.exercise, category);
    for entry in history.entries(order) {
        let marker = if entry.is_personal_record { "★ PR" } else { "" };
        let metric = entry
            .metric
            .as_ref()
            .map(|m| describe_metric(m, units))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {}  {:<20} {:<32} {}",
            entry.date, entry.session_name, metric, marker
        );
        if show_sets {
            for (i, set) in entry.sets.iter().enumerate() {
                println!("      {}. {}", i + 1, describe_set(set, units));
            }
        }
    }

    println!();
    println!("  Sessions: {}", summary.total_sessions);
    println!(
        "  Best:     {}",
        summary
            .best_performance
            .map(|v| describe_value(v, category, units))
            .unwrap_or_else(|| "-".into())
    );
    println!(
        "  Average:  {}",
        summary
            .average_performance
            .map(|v| describe_value(v, category, units))
            .unwrap_or_else(|| "-".into())
    );
    println!("  Progress: {:+.1}%", summary.progress_percentage);

    Ok(())
}

fn cmd_orm(weight: &str, reps: &str, units: UnitSystem) -> Result<()> {
    let lift = LiftInput::parse(weight, reps)?;
    let one_rm_kg = estimate_one_rep_max(units.weight_from_display(lift.weight), lift.reps)?;
    println!(
        "Estimated 1RM: {:.1} {}",
        units.weight_to_display(one_rm_kg),
        units.weight_label()
    );
    Ok(())
}

fn cmd_pr<S: RecordStore>(
    tracker: &mut PersonalRecordTracker<S>,
    command: PrCommand,
    units: UnitSystem,
) -> Result<()> {
    let show = |kg: f64| format!("{:.1} {}", units.weight_to_display(kg), units.weight_label());

    match command {
        PrCommand::List => {
            let records = tracker.records()?;
            if records.is_empty() {
                println!("No personal records yet.");
            }
            for r in records {
                println!("  {}  {:<24} {:>10}  {}", r.id, r.exercise_name, show(r.weight_kg), r.date);
            }
        }

        PrCommand::Show { exercise } => match tracker.find(&exercise)? {
            Some(r) => println!("{}: {} (set {}, id {})", r.exercise_name, show(r.weight_kg), r.date, r.id),
            None => println!("No personal record for '{}'.", exercise.trim()),
        },

        PrCommand::Add {
            exercise,
            weight,
            reps,
        } => {
            let lift = LiftInput::parse(&weight, &reps)?;
            let kg = units.weight_from_display(lift.weight);
            match tracker.record_estimate(&exercise, kg, lift.reps, today())? {
                RecordOutcome::Created(r) => {
                    println!("✓ New record for {}: {}", r.exercise_name, show(r.weight_kg));
                    println!("  id: {}", r.id);
                }
                outcome => print_update(&outcome, &show),
            }
        }

        PrCommand::Update { id, weight, reps } => {
            let id = parse_id(&id)?;
            let lift = LiftInput::parse(&weight, &reps)?;
            let kg = units.weight_from_display(lift.weight);
            let outcome = tracker.update_record(id, kg, lift.reps, today())?;
            print_update(&outcome, &show);
        }

        PrCommand::Delete { id } => {
            let id = parse_id(&id)?;
            if tracker.delete_record(id)? {
                println!("✓ Deleted record {}", id);
            } else {
                println!("No record with id {}", id);
            }
        }
    }

    Ok(())
}

fn print_update(outcome: &RecordOutcome, show: &dyn Fn(f64) -> String) {
    match outcome {
        RecordOutcome::Improved {
            previous_kg,
            record,
        } => println!(
            "✓ Record improved for {}: {} → {}",
            record.exercise_name,
            show(*previous_kg),
            show(record.weight_kg)
        ),
        RecordOutcome::NotImproved {
            stored,
            candidate_kg,
        } => println!(
            "Estimate {} does not beat {} for {}; record unchanged.",
            show(*candidate_kg),
            show(stored.weight_kg),
            stored.exercise_name
        ),
        RecordOutcome::Created(r) => println!("✓ New record for {}: {}", r.exercise_name, show(r.weight_kg)),
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| Error::InvalidInput(format!("'{}' is not a record id", raw.trim())))
}

fn describe_value(value: f64, category: ExerciseCategory, units: UnitSystem) -> String {
    match category {
        ExerciseCategory::Strength => format!(
            "{:.1} {}",
            units.weight_to_display(value),
            units.weight_label()
        ),
        ExerciseCategory::Calisthenics => format!("{:.1} reps", value),
        ExerciseCategory::Cardio => format!(
            "{} {}",
            format_minutes(units.pace_to_display(value)),
            units.pace_label()
        ),
    }
}

fn describe_best(best: &BestMetric, units: UnitSystem) -> String {
    match best {
        BestMetric::Strength {
            max_weight: Some(max),
            reps_at_max,
        } => format!(
            "{:.1} {} x {} ({})",
            units.weight_to_display(max.value),
            units.weight_label(),
            reps_at_max.unwrap_or(0),
            max.date
        ),
        BestMetric::Calisthenics {
            max_reps: Some(max),
        } => format!("{} reps ({})", max.value, max.date),
        BestMetric::Cardio {
            best_pace: Some(pace),
            ..
        } => format!(
            "{} {} ({})",
            format_minutes(units.pace_to_display(pace.value)),
            units.pace_label(),
            pace.date
        ),
        BestMetric::Cardio {
            max_duration: Some(duration),
            ..
        } => format!("{} ({})", format_duration(duration.value), duration.date),
        _ => "-".into(),
    }
}

fn describe_metric(metric: &SessionMetric, units: UnitSystem) -> String {
    match metric {
        SessionMetric::Strength {
            max_weight_kg,
            reps_at_max,
        } => format!(
            "{:.1} {} x {}",
            units.weight_to_display(*max_weight_kg),
            units.weight_label(),
            reps_at_max
        ),
        SessionMetric::Calisthenics { max_reps } => format!("{} reps", max_reps),
        SessionMetric::Cardio {
            max_duration_secs,
            max_distance_km,
            pace,
        } => format!(
            "{:.2} {} in {} ({})",
            units.distance_to_display(*max_distance_km),
            units.distance_label(),
            format_duration(*max_duration_secs),
            pace.map(|p| format!(
                "{} {}",
                format_minutes(units.pace_to_display(p)),
                units.pace_label()
            ))
            .unwrap_or_else(|| "no pace".into())
        ),
    }
}

fn describe_set(set: &SetEntry, units: UnitSystem) -> String {
    match set {
        SetEntry::Strength { weight_kg, reps } => format!(
            "{:.1} {} x {}",
            units.weight_to_display(*weight_kg),
            units.weight_label(),
            reps
        ),
        SetEntry::Calisthenics { reps } => format!("{} reps", reps),
        SetEntry::Cardio {
            duration_secs,
            distance_km,
            ..
        } => format!(
            "{:.2} {} in {}",
            units.distance_to_display(*distance_km),
            units.distance_label(),
            format_duration(*duration_secs)
        ),
    }
}
