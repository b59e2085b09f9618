use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use sleep_core::config::validate_sleep_goal;
use sleep_core::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sleepq")]
#[command(about = "Fuzzy sleep quality scoring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single night
    Score {
        /// Hours slept
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,

        /// Average heart rate during sleep (bpm)
        #[arg(long, allow_negative_numbers = true)]
        avg_hr: f64,

        /// Minimum heart rate during sleep (defaults to the average)
        #[arg(long, allow_negative_numbers = true)]
        min_hr: Option<f64>,

        /// Maximum heart rate during sleep (defaults to the average)
        #[arg(long, allow_negative_numbers = true)]
        max_hr: Option<f64>,

        /// Daytime activity level
        #[arg(long, allow_negative_numbers = true)]
        activity: f64,

        /// Sleep goal in hours (defaults to the configured goal)
        #[arg(long, allow_negative_numbers = true)]
        goal: Option<f64>,

        /// Show per-rule contributions
        #[arg(long, conflicts_with = "json")]
        explain: bool,

        /// Print the full breakdown as JSON
        #[arg(long)]
        json: bool,

        /// Append the result to the history file
        #[arg(long)]
        record: bool,

        /// Night being recorded (YYYY-MM-DD, defaults to today)
        #[arg(long, requires = "record")]
        night: Option<String>,
    },

    /// Score every night in a CSV file
    Batch {
        /// Input CSV of nights
        #[arg(long)]
        input: PathBuf,

        /// Output CSV of scored nights
        #[arg(long)]
        output: PathBuf,

        /// Goal for rows without one (defaults to the configured goal)
        #[arg(long, allow_negative_numbers = true)]
        goal: Option<f64>,
    },

    /// Show recorded nights
    History,

    /// Show or change the sleep goal
    Goal {
        /// New goal in hours (4-12, half-hour steps)
        #[arg(long)]
        set: Option<f64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        sleep_core::logging::init_with_level("debug");
    } else {
        sleep_core::logging::init();
    }

    // Setting the goal must work even when the stored one is invalid
    let config = match cli.command {
        Commands::Goal { set: Some(_) } => Config::load_for_update(cli.config.as_deref())?,
        _ => Config::load_or_default(cli.config.as_deref())?,
    };
    tracing::debug!(
        "Config {:?}: sleep goal {}h, data dir {:?}",
        cli.config
            .clone()
            .unwrap_or_else(Config::default_config_path),
        config.profile.sleep_goal_hours,
        config.data.data_dir
    );

    match cli.command {
        Commands::Score {
            duration,
            avg_hr,
            min_hr,
            max_hr,
            activity,
            goal,
            explain,
            json,
            record,
            night,
        } => {
            let inputs = RawInputs {
                sleep_duration_hours: duration,
                min_heart_rate: min_hr.unwrap_or(avg_hr),
                avg_heart_rate: avg_hr,
                max_heart_rate: max_hr.unwrap_or(avg_hr),
                activity_level: activity,
                sleep_goal_hours: goal.unwrap_or(config.profile.sleep_goal_hours),
            };
            let output = ScoreOutput {
                explain,
                json,
                record,
                night,
            };
            cmd_score(&inputs, output, &config)
        }
        Commands::Batch {
            input,
            output,
            goal,
        } => cmd_batch(input, output, goal.unwrap_or(config.profile.sleep_goal_hours)),
        Commands::History => cmd_history(&config),
        Commands::Goal { set } => cmd_goal(set, config, cli.config),
    }
}

struct ScoreOutput {
    explain: bool,
    json: bool,
    record: bool,
    night: Option<String>,
}

fn cmd_score(inputs: &RawInputs, output: ScoreOutput, config: &Config) -> Result<()> {
    let breakdown = score_breakdown(inputs);

    if output.json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        println!(
            "Sleep Quality Score: {:.1} ({})",
            breakdown.score,
            breakdown.band()
        );
        if output.explain {
            display_breakdown(&breakdown);
        }
    }

    if output.record {
        let night = match output.night {
            Some(ref s) => parse_night(s)?,
            None => chrono::Local::now().date_naive(),
        };
        let path = config.data.history_path();
        append_record(&path, &ScoredNight::from_breakdown(night, &breakdown))?;
        // Keep stdout clean for --json consumers
        if !output.json {
            println!("✓ Recorded {} to {}", night, path.display());
        }
    }

    Ok(())
}

fn cmd_batch(input: PathBuf, output: PathBuf, default_goal: f64) -> Result<()> {
    let count = sleep_core::batch::score_csv(&input, &output, default_goal)?;

    println!("✓ Scored {} nights", count);
    println!("  Output: {}", output.display());
    Ok(())
}

fn cmd_history(config: &Config) -> Result<()> {
    let path = config.data.history_path();
    let records = load_records(&path)?;

    if records.is_empty() {
        println!("No nights recorded yet.");
        return Ok(());
    }

    println!("{:<12} {:>8} {:>8} {:>8} {:>8}  Band", "Night", "Hours", "Avg HR", "Goal", "Score");
    for r in &records {
        println!(
            "{:<12} {:>8.1} {:>8.0} {:>8.1} {:>8.1}  {}",
            r.night.to_string(),
            r.sleep_duration_hours,
            r.avg_heart_rate,
            r.sleep_goal_hours,
            r.sleep_quality,
            r.band
        );
    }
    Ok(())
}

fn cmd_goal(set: Option<f64>, mut config: Config, config_path: Option<PathBuf>) -> Result<()> {
    let Some(hours) = set else {
        println!("Sleep goal: {:.1} hours", config.profile.sleep_goal_hours);
        return Ok(());
    };

    validate_sleep_goal(hours)?;
    config.profile.sleep_goal_hours = hours;
    match config_path {
        Some(path) => config.save_to(&path)?,
        None => config.save()?,
    }

    println!("✓ Sleep goal set to {:.1} hours", hours);
    Ok(())
}

fn parse_night(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| Error::Input(format!("night '{}': {}", s, e)))
}

fn display_breakdown(breakdown: &ScoreBreakdown) {
    let m = &breakdown.memberships;

    println!();
    println!("  Memberships");
    println!(
        "    Duration    short {:.3}  medium {:.3}  long {:.3}",
        m.duration.short, m.duration.medium, m.duration.long
    );
    println!(
        "    Heart rate  low {:.3}  normal {:.3}  high {:.3}",
        m.heart_rate.low, m.heart_rate.normal, m.heart_rate.high
    );
    println!(
        "    Activity    low {:.3}  moderate {:.3}  high {:.3}",
        m.activity.low, m.activity.moderate, m.activity.high
    );
    println!();
    println!("  Rules");
    for c in &breakdown.contributions {
        println!(
            "    #{:<2} {:<48} x{:<5} {:>8.3}",
            c.id, c.description, c.weight, c.value
        );
    }
    println!();
    println!("  Rule sum      {:>10.3}", breakdown.rule_sum);
    println!("  Goal penalty  {:>10.3}", -breakdown.goal_penalty);
    println!("  Raw score     {:>10.3}", breakdown.raw_score);
    println!("  Final score   {:>10.3}", breakdown.score);
}
