mod allocator;
mod config;
mod error;
mod loader;
mod models;
mod report;

use allocator::{sort_by_priority, AllocationSummary, Allocator};
use anyhow::{Context, Result};
use clap::{Arg, Command};
use config::Config;
use loader::CsvLoader;
use std::path::Path;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let matches = Command::new("mentor-allotment")
        .version("1.0")
        .about("Allocates mentors to mentees by preference, eligibility and capacity")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config.toml"),
        )
        .arg(
            Arg::new("mentees")
                .long("mentees")
                .value_name("CSV")
                .help("Mentee registrations (overrides mentees_file)"),
        )
        .arg(
            Arg::new("mentors")
                .long("mentors")
                .value_name("CSV")
                .help("Mentor registrations (overrides mentors_file)"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory (overrides output_directory)"),
        )
        .get_matches();

    let config_file = matches
        .get_one::<String>("config")
        .map(String::as_str)
        .unwrap_or("config.toml");

    let mut config = if Path::new(config_file).exists() {
        info!(path = config_file, "loading configuration");
        Config::load_from_file(config_file)
            .with_context(|| format!("Failed to load configuration: {}", config_file))?
    } else {
        let default_config = Config::default();
        default_config.save_to_file(config_file)?;
        println!("📝 Created default configuration file: {}", config_file);
        println!("⚠️  Please review {} (column names, department codes) and run again.", config_file);
        return Ok(());
    };

    if let Some(path) = matches.get_one::<String>("mentees") {
        config.mentees_file = path.clone();
    }
    if let Some(path) = matches.get_one::<String>("mentors") {
        config.mentors_file = path.clone();
    }
    if let Some(dir) = matches.get_one::<String>("output") {
        config.output_directory = dir.clone();
    }

    let loader = CsvLoader::new(&config);
    let mut mentors = loader
        .load_mentors_from_path(&config.mentors_file)
        .with_context(|| format!("Failed to load mentors from {}", config.mentors_file))?;
    let mut mentees = loader
        .load_mentees_from_path(&config.mentees_file)
        .with_context(|| format!("Failed to load mentees from {}", config.mentees_file))?;

    sort_by_priority(&mut mentees);

    info!(policy = ?config.match_policy, "allocating mentors");
    let assignments = Allocator::new(config.match_policy).allocate(&mentees, &mut mentors);

    let written = report::write_all(&config.output_directory, &mentees, &mentors, &assignments)?;

    report::print_summary(&AllocationSummary::new(&mentees, &mentors, &assignments));
    println!("\n✅ Allocation complete!");
    for path in written {
        println!("📄 {}", path.display());
    }
    Ok(())
}
