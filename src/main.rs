use agenda::config::Config;
use agenda::directory::DirectoryClient;
use agenda::interactive::{self, activity_options::build_choices};
use agenda::logging;
use agenda::schedule::{ProfessionalRef, Weekday, WeeklySchedule};
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::process;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Weekly schedule manager for professionals", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
struct Cli {
    /// Professional whose schedule is edited (overrides the saved config)
    #[arg(short = 'p', long, global = true)]
    professional_id: Option<i64>,

    /// Display name of the professional
    #[arg(short = 'n', long, global = true)]
    professional_name: Option<String>,

    /// Base URL of the activity-type directory
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the weekly grid (default)
    Interactive,
    /// List the activity types offered by the directory
    Activities,
    /// Print stored schedule entries
    Show {
        /// Only this weekday (e.g. monday, tue)
        #[arg(short = 'w', long)]
        weekday: Option<Weekday>,
    },
    /// Save the global flags (and cache settings) as defaults, then print the config
    Config {
        /// Seconds activity types stay cached
        #[arg(long)]
        cache_ttl: Option<i64>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // The grid owns the terminal, so it logs to a file
    if matches!(cli.command, None | Some(Commands::Interactive)) {
        if let Err(e) = logging::init_with_file("agenda.log") {
            eprintln!("Warning: file logging unavailable: {}", e);
        }
    } else {
        logging::init();
    }

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    if let Some(id) = cli.professional_id {
        config.professional_id = Some(id);
    }
    if let Some(name) = cli.professional_name {
        config.professional_name = Some(name);
    }

    match cli.command {
        None | Some(Commands::Interactive) => {
            config.validate()?;
            let professional = professional(&config);
            tracing::info!(
                professional_id = ?professional.as_ref().map(|p| p.id),
                "Starting interactive session"
            );
            interactive::run_interactive(config, professional).await?;
        }
        Some(Commands::Activities) => list_activities(&config).await?,
        Some(Commands::Show { weekday }) => show_schedule(&config, weekday)?,
        Some(Commands::Config { cache_ttl }) => {
            if let Some(ttl) = cache_ttl {
                config.options_ttl_secs = ttl;
            }
            let path = config.save()?;
            println!("Configuration saved to {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

fn professional(config: &Config) -> Option<ProfessionalRef> {
    config.professional_id.map(|id| ProfessionalRef {
        id,
        name: config
            .professional_name
            .clone()
            .unwrap_or_else(|| format!("Professional #{}", id)),
    })
}

async fn list_activities(config: &Config) -> Result<()> {
    config.validate()?;
    let client = DirectoryClient::new(config)?;
    let options = client.fetch_activity_types().await?;

    println!("{:<4} {:<6} {:<20} Name", "#", "Id", "Code");
    for (index, option) in build_choices(&options).iter().enumerate() {
        println!(
            "{:<4} {:<6} {:<20} {}",
            index, option.id, option.code, option.name
        );
    }
    Ok(())
}

fn show_schedule(config: &Config, weekday: Option<Weekday>) -> Result<()> {
    let professional = professional(config)
        .ok_or_else(|| anyhow!("No professional selected; pass --professional-id"))?;
    let schedule = WeeklySchedule::load()?;

    let days: Vec<Weekday> = match weekday {
        Some(day) => vec![day],
        None => Weekday::all().to_vec(),
    };

    println!("Schedule for {} (#{})", professional.name, professional.id);
    let mut total = 0;
    for day in days {
        let entries = schedule.entries_for(professional.id, day);
        if entries.is_empty() {
            continue;
        }
        println!("\n{}", day.label());
        for entry in entries {
            let mut line = format!(
                "  {}-{}  {}",
                entry.start_time, entry.end_time, entry.activity_code
            );
            if !entry.location.is_empty() {
                line.push_str(&format!(" @ {}", entry.location));
            }
            if !entry.notes.is_empty() {
                line.push_str(&format!("  ({})", entry.notes));
            }
            println!("{}", line);
            total += 1;
        }
    }

    if total == 0 {
        println!("No entries.");
    }
    Ok(())
}
