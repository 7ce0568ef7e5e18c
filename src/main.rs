//! Binary entrypoint for the Gymkeeper CLI.
//!
//! Commands:
//! - `init` - write a starter `config.toml` and seed the gym store
//! - `start` - run the interactive front desk
//! - `visit <identity>` - a single visit for `guest` or a member email
//! - `enroll <email> <name>` - add a member to the directory
//! - `stats <identity>` - print the stored stats for an identity
//! - `equipment [--repair] [--json]` - condition report and repair pass
//! - `status` - rooms, equipment and visit counters
//!
//! See the library crate docs for module-level details: `gymkeeper::`.
use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};

use gymkeeper::config::Config;
use gymkeeper::console::StdConsole;
use gymkeeper::frontdesk::FrontDesk;
use gymkeeper::gym::{
    condition_report, format_report, format_stats, needing_attention, repair_worn, GymStore,
    Identity, MemberRecord, RandomDice, SessionEngine, StatsStore,
};
use gymkeeper::metrics;

#[derive(Parser)]
#[command(name = "gymkeeper")]
#[command(about = "An interactive gym visit simulator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration and seed the gym
    Init,
    /// Run the interactive front desk
    Start,
    /// Run a single visit
    Visit {
        /// `guest` or a member email
        identity: String,
    },
    /// Add a member to the directory
    Enroll { email: String, name: String },
    /// Show stored stats for an identity
    Stats { identity: String },
    /// Equipment condition report
    Equipment {
        /// Restore worn items to full quality
        #[arg(long)]
        repair: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show gym status and visit counters
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Init = cli.command {
        init_logging(&None, cli.verbose);
        info!("Initializing new gym configuration");
        if Path::new(&cli.config).exists() {
            warn!("{} already exists; leaving it untouched", cli.config);
        } else {
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        let config = Config::load(&cli.config).await?;
        let store = open_store(&config)?;
        let rooms = store.list_rooms()?.len();
        println!(
            "Gym ready at {} with {} room(s).",
            config.storage.resolved_db_path().display(),
            rooms
        );
        return Ok(());
    }

    let config = load_config(&cli.config).await?;
    init_logging(&Some(config.clone()), cli.verbose);
    let store = open_store(&config)?;

    match cli.command {
        Commands::Init => unreachable!("handled above"),
        Commands::Start => {
            info!("Starting Gymkeeper v{}", env!("CARGO_PKG_VERSION"));
            let dice = RandomDice::from_config(config.session.rng_seed);
            let mut desk = FrontDesk::new(&store, StdConsole::new(), dice, &config);
            let exit = desk.run();
            info!("front desk closed ({:?}) after {} visit(s)", exit, desk.visits());
        }
        Commands::Visit { identity } => {
            let dice = RandomDice::from_config(config.session.rng_seed);
            let mut engine =
                SessionEngine::new(&store, StdConsole::new(), dice, config.session.clone())
                    .with_gym_name(&config.gym.name);
            let report = engine.enter(&identity)?;
            println!(
                "Visit ended: {} ({} workout(s), {} improvement(s))",
                report.reason.label(),
                report.workouts,
                report.improvements.len()
            );
        }
        Commands::Enroll { email, name } => {
            let identity = Identity::parse(&email)?;
            let Identity::Member { email } = identity else {
                return Err(anyhow!("'guest' is reserved for the day pass"));
            };
            if name.trim().is_empty() {
                return Err(anyhow!("member name must not be empty"));
            }
            if store.get_member(&email)?.is_some() {
                println!("{} is already enrolled.", email);
                return Ok(());
            }
            store.put_member(MemberRecord::new(&email, name.trim()))?;
            info!("enrolled {}", email);
            println!("Enrolled {} as {}.", email, name.trim());
        }
        Commands::Stats { identity } => {
            let identity = Identity::parse(&identity)?;
            match StatsStore::new(&store).fetch(&identity)? {
                Some(stats) => println!("{}", format_stats(&stats)),
                None => println!("No stats recorded for {}.", identity),
            }
        }
        Commands::Equipment { repair, json } => {
            let threshold = config.maintenance.attention_threshold;
            if repair {
                let repaired =
                    repair_worn(&store, threshold, config.maintenance.repaired_quality)?;
                println!("Repaired {} item(s).", repaired);
            }
            let report = condition_report(&store)?;
            if json {
                let payload = serde_json::json!({
                    "threshold": threshold,
                    "equipment": report,
                    "needing_attention": needing_attention(&report, threshold),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                print!("{}", format_report(&report));
                let worn = needing_attention(&report, threshold);
                if !worn.is_empty() {
                    println!("{} item(s) below quality {}:", worn.len(), threshold);
                    for c in worn {
                        println!("  - {} in {} (quality {})", c.equipment_name, c.room_name, c.quality);
                    }
                }
            }
        }
        Commands::Status => {
            let rooms = store.list_rooms()?;
            let open = rooms.iter().filter(|r| r.available).count();
            let equipment = store.list_equipment()?;
            let usable = equipment.iter().filter(|e| e.is_usable()).count();
            println!("Gymkeeper v{}", env!("CARGO_PKG_VERSION"));
            println!("Gym: {}", config.gym.name);
            println!("Database: {}", config.storage.resolved_db_path().display());
            println!("Rooms: {} ({} open)", rooms.len(), open);
            println!("Equipment: {} ({} usable)", equipment.len(), usable);
            println!("Stats records: {}", store.list_stats_keys()?.len());
            let snap = metrics::snapshot();
            println!(
                "Visits this process: {} started, {} workout(s), {} injur(ies), {} aborted",
                snap.visits_started, snap.workouts, snap.injuries, snap.aborted
            );
        }
    }

    Ok(())
}

/// Load the config file, falling back to defaults when it does not exist yet.
async fn load_config(path: &str) -> Result<Config> {
    if Path::new(path).exists() {
        Config::load(path).await
    } else {
        eprintln!("Config {} not found; using defaults (run `gymkeeper init` to create it)", path);
        Ok(Config::default())
    }
}

fn open_store(config: &Config) -> Result<GymStore> {
    std::fs::create_dir_all(&config.storage.data_dir)?;
    Ok(GymStore::open(config.storage.resolved_db_path())?)
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);
    // Keep sled's internals out of the log unless tracing
    if verbosity < 2 {
        builder.filter_module("sled", log::LevelFilter::Warn);
    }
    if let Some(file) = config.as_ref().and_then(|c| c.logging.file.clone()) {
        if let Ok(f) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file)
        {
            let write_mutex = std::sync::Arc::new(std::sync::Mutex::new(f));
            // Echo to the console only when attached to a terminal
            let is_tty = atty::is(atty::Stream::Stdout);

            builder.format(move |fmt, record| {
                let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
                let line = format!("{} [{}] {}", ts, record.level(), record.args());

                if let Ok(mut guard) = write_mutex.lock() {
                    let _ = writeln!(guard, "{}", line);
                }

                if is_tty && verbosity > 0 {
                    writeln!(fmt, "{}", line)
                } else {
                    Ok(())
                }
            });
            let _ = builder.try_init();
            return;
        }
    }
    builder.format(|fmt, record| {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
    });
    let _ = builder.try_init();
}
