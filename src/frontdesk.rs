//! Front desk loop behind the `start` command.
//!
//! Offers a guest day pass, a member visit or exit, and hands each visit to a
//! [`SessionEngine`]. Storage failures end that visit only; the desk reports
//! them and asks again.

use log::{error, info};

use crate::config::Config;
use crate::console::GymConsole;
use crate::gym::dice::Dice;
use crate::gym::session::{format_stats, SessionEngine};
use crate::gym::storage::GymStore;
use crate::logutil::preview_input;

/// How the desk loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeskExit {
    Requested,
    InputClosed,
}

pub struct FrontDesk<'a, C: GymConsole, D: Dice> {
    engine: SessionEngine<'a, C, D>,
    welcome: String,
    visits: u32,
}

impl<'a, C: GymConsole, D: Dice> FrontDesk<'a, C, D> {
    pub fn new(store: &'a GymStore, console: C, dice: D, config: &Config) -> Self {
        let engine = SessionEngine::new(store, console, dice, config.session.clone())
            .with_gym_name(&config.gym.name);
        let welcome = if config.gym.welcome.is_empty() {
            format!("Welcome to {}!", config.gym.name)
        } else {
            format!("Welcome to {}!\n{}", config.gym.name, config.gym.welcome)
        };
        Self {
            engine,
            welcome,
            visits: 0,
        }
    }

    /// Visits handed to the engine so far, including aborted ones.
    pub fn visits(&self) -> u32 {
        self.visits
    }

    pub fn into_console(self) -> C {
        self.engine.into_console()
    }

    pub fn run(&mut self) -> DeskExit {
        self.engine.console_mut().say(&self.welcome);
        loop {
            self.engine.console_mut().say(
                "\nWould you like to:\n1. Purchase a 1 day guest pass\n2. Visit as a member\n3. Exit",
            );
            let answer = match self.engine.console_mut().prompt("Enter your choice: ") {
                Ok(Some(line)) => line,
                Ok(None) => return DeskExit::InputClosed,
                Err(e) => {
                    error!("front desk input failed: {}", e);
                    return DeskExit::InputClosed;
                }
            };
            match answer.trim().to_ascii_uppercase().as_str() {
                "1" | "G" | "GUEST" => self.visit("guest"),
                "2" | "M" | "MEMBER" => {
                    let email = match self.engine.console_mut().prompt("Enter your email: ") {
                        Ok(Some(line)) => line,
                        Ok(None) => return DeskExit::InputClosed,
                        Err(e) => {
                            error!("front desk input failed: {}", e);
                            return DeskExit::InputClosed;
                        }
                    };
                    self.visit(&email);
                }
                "3" | "Q" | "EXIT" => {
                    self.engine.console_mut().say("Goodbye!");
                    return DeskExit::Requested;
                }
                _ => {
                    info!("front desk ignored {}", preview_input(&answer));
                    self.engine
                        .console_mut()
                        .say("Invalid choice. Please enter 1, 2 or 3.");
                }
            }
        }
    }

    fn visit(&mut self, identity: &str) {
        self.visits += 1;
        match self.engine.enter(identity) {
            Ok(report) => {
                if let Some(stats) = &report.stats {
                    self.engine
                        .console_mut()
                        .say(&format!("Visit over ({}). Final stats:", report.reason.label()));
                    self.engine.console_mut().say(&format_stats(stats));
                }
            }
            Err(e) => {
                error!("visit for {} failed: {}", preview_input(identity), e);
                self.engine.console_mut().say(&format!(
                    "Sorry, something went wrong with your visit: {}",
                    e
                ));
            }
        }
    }
}
