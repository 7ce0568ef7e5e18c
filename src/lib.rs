//! # Gymkeeper - interactive gym visit simulator
//!
//! Gymkeeper models a small health club: visitors (a shared guest pass or
//! registered members) walk through room and equipment menus, every workout
//! wears the equipment down, and each outcome changes the visitor's persisted
//! fitness stats.
//!
//! ## Features
//!
//! - **Visit Engine**: explicit state machine from entry to exhaustion, injury or exit.
//! - **Persistent Stats**: per-identity fitness records in sled, range-checked on every write.
//! - **Equipment Wear**: atomic compare-and-swap quality decay with an injury risk on worn gear.
//! - **Maintenance**: condition report and repair pass for the front office.
//! - **Deterministic Runs**: all randomness flows through an injectable [`gym::Dice`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gymkeeper::config::Config;
//! use gymkeeper::console::StdConsole;
//! use gymkeeper::gym::{GymStore, RandomDice, SessionEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let store = GymStore::open(config.storage.resolved_db_path())?;
//!     let dice = RandomDice::from_config(config.session.rng_seed);
//!     let mut engine = SessionEngine::new(&store, StdConsole::new(), dice, config.session.clone());
//!     let report = engine.enter("guest")?;
//!     println!("visit ended: {}", report.reason.label());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`gym`] - data model, sled storage, visit engine, maintenance
//! - [`config`] - configuration loading and validation
//! - [`console`] - line-oriented I/O seam used by the engine
//! - [`frontdesk`] - the interactive menu behind `start`
//! - [`metrics`] - process-wide visit counters
//! - [`logutil`] - helpers for logging user input

pub mod config;
pub mod console;
pub mod frontdesk;
pub mod gym;
pub mod logutil;
pub mod metrics;
