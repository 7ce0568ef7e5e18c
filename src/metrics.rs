//! Process-wide visit counters, reported by the `status` command.
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

static VISITS_STARTED: AtomicU64 = AtomicU64::new(0);
static WORKOUTS: AtomicU64 = AtomicU64::new(0);
static IMPROVEMENTS: AtomicU64 = AtomicU64::new(0);
static INJURIES: AtomicU64 = AtomicU64::new(0);
static ABORTED: AtomicU64 = AtomicU64::new(0);

static END_REASONS: OnceLock<Mutex<HashMap<String, u64>>> = OnceLock::new();

pub fn inc_visit_started() {
    VISITS_STARTED.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_workout() {
    WORKOUTS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_improvement() {
    IMPROVEMENTS.fetch_add(1, Ordering::Relaxed);
}

pub fn inc_injury() {
    INJURIES.fetch_add(1, Ordering::Relaxed);
}

/// A visit that stopped on a storage failure rather than a normal ending.
/// Identities rejected before the visit starts are not counted.
pub fn inc_aborted() {
    ABORTED.fetch_add(1, Ordering::Relaxed);
}

fn end_reason_lock() -> &'static Mutex<HashMap<String, u64>> {
    END_REASONS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Count a finished visit under its end reason label; returns the new count.
pub fn record_visit_end(reason: &str) -> u64 {
    let mut guard = end_reason_lock()
        .lock()
        .expect("end reason mutex poisoned");
    let count = guard.entry(reason.to_string()).or_default();
    *count = count.saturating_add(1);
    *count
}

#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct Snapshot {
    pub visits_started: u64,
    pub workouts: u64,
    pub improvements: u64,
    pub injuries: u64,
    pub aborted: u64,
    pub ended_by: HashMap<String, u64>,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        visits_started: VISITS_STARTED.load(Ordering::Relaxed),
        workouts: WORKOUTS.load(Ordering::Relaxed),
        improvements: IMPROVEMENTS.load(Ordering::Relaxed),
        injuries: INJURIES.load(Ordering::Relaxed),
        aborted: ABORTED.load(Ordering::Relaxed),
        ended_by: end_reason_lock()
            .lock()
            .expect("end reason mutex poisoned")
            .clone(),
    }
}
