//! Gym data model, persistence and the visit engine.
//! Stats, rooms and equipment live in a sled store; the session engine walks
//! one visitor through room and equipment menus and applies each workout's
//! consequences to that store.

pub mod dice;
pub mod equipment;
pub mod errors;
pub mod maintenance;
pub mod mood;
pub mod seed;
pub mod session;
pub mod stats;
pub mod storage;
pub mod types;

pub use dice::{Dice, RandomDice};
pub use equipment::{worn_quality, EquipmentRegistry, Wear, WEAR_PER_USE};
pub use errors::GymError;
pub use maintenance::{
    condition_report, format_report, needing_attention, repair_worn, EquipmentCondition,
    DEFAULT_ATTENTION_THRESHOLD,
};
pub use mood::{narrate, Outcome};
pub use seed::{canonical_gym, CANONICAL_ROOM_IDS};
pub use session::{
    apply_injury, format_stats, recovery_stamina, stamina_after_workout, EndReason,
    SessionEngine, SessionState, VisitReport,
};
pub use stats::{roll_baseline, LoadedStats, StatsStore};
pub use storage::{GymStore, GymStoreBuilder};
pub use types::*;
