//! Test doubles & fixtures shared by the integration tests.
//! Scripted console and dice let a whole visit run without a terminal or RNG.
#![allow(dead_code)] // each test binary uses a different subset

use std::collections::VecDeque;
use std::io;

use gymkeeper::console::GymConsole;
use gymkeeper::gym::{Dice, GymStore, GymStoreBuilder};
use tempfile::TempDir;

/// Console that replays queued input lines and records everything shown.
/// Once the script runs out, `prompt` reports closed input.
#[derive(Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    pub output: Vec<String>,
    pub prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(inputs: &[&str]) -> Self {
        Self {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            output: Vec::new(),
            prompts: Vec::new(),
        }
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.output.iter().any(|line| line.contains(needle))
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl GymConsole for ScriptedConsole {
    fn say(&mut self, text: &str) {
        self.output.push(text.to_string());
    }

    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        self.prompts.push(text.to_string());
        Ok(self.inputs.pop_front())
    }
}

/// Dice that answer from per-method queues and record the ranges and odds
/// they were asked for. Empty queues fall back to the low end: `roll` gives
/// `lo`, `chance` gives false, `pick` gives 0.
#[derive(Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u8>,
    chances: VecDeque<bool>,
    picks: VecDeque<usize>,
    pub roll_calls: Vec<(u8, u8)>,
    pub chance_calls: Vec<(u32, u32)>,
}

impl ScriptedDice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rolls(mut self, values: &[u8]) -> Self {
        self.rolls.extend(values.iter().copied());
        self
    }

    pub fn chances(mut self, values: &[bool]) -> Self {
        self.chances.extend(values.iter().copied());
        self
    }

    pub fn picks(mut self, values: &[usize]) -> Self {
        self.picks.extend(values.iter().copied());
        self
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, lo: u8, hi: u8) -> u8 {
        self.roll_calls.push((lo, hi));
        self.rolls.pop_front().unwrap_or(lo).clamp(lo, hi)
    }

    fn chance(&mut self, num: u32, den: u32) -> bool {
        self.chance_calls.push((num, den));
        self.chances.pop_front().unwrap_or(false)
    }

    fn pick(&mut self, len: usize) -> usize {
        self.picks.pop_front().unwrap_or(0).min(len.saturating_sub(1))
    }
}

/// Empty store (no canonical seed) in a throwaway directory. Keep the
/// `TempDir` alive for as long as the store is used.
pub fn empty_store() -> (GymStore, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = GymStoreBuilder::new(dir.path().join("gym"))
        .without_seed()
        .open()
        .expect("open store");
    (store, dir)
}

/// Store seeded with the canonical gym layout.
pub fn seeded_store() -> (GymStore, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = GymStoreBuilder::new(dir.path().join("gym"))
        .open()
        .expect("open store");
    (store, dir)
}
