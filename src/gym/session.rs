use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::SessionConfig;
use crate::console::GymConsole;
use crate::gym::dice::Dice;
use crate::gym::equipment::EquipmentRegistry;
use crate::gym::errors::GymError;
use crate::gym::mood::{narrate, Outcome};
use crate::gym::stats::StatsStore;
use crate::gym::storage::GymStore;
use crate::gym::types::{EquipmentRecord, FitnessLevel, FitnessStats, Identity, RoomRecord, StatField};
use crate::logutil::preview_input;
use crate::metrics;

/// Stamina lost on every completed workout.
pub const STAMINA_COST: u8 = 2;

/// # Gym Visit State Machine
///
/// One call to [`SessionEngine::enter`] walks these states until `Ended`:
///
/// 1. **Entering** - resolve the identity and load or roll its stats
/// 2. **BrowsingRooms** - pick an open room or leave
/// 3. **BrowsingEquipment** - pick a usable item in that room
/// 4. **Exercising** - wear the item, then roll for injury on worn gear
/// 5. **OutcomeOk** - maybe improve one stat, always spend stamina
/// 6. **OutcomeInjured** - knock every stat down, reset stamina, end the visit
/// 7. **Ended** - terminal; the next `enter` starts from scratch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Entering,
    BrowsingRooms,
    BrowsingEquipment {
        room: RoomRecord,
    },
    Exercising {
        room: RoomRecord,
        equipment: EquipmentRecord,
    },
    OutcomeOk,
    OutcomeInjured,
    Ended(EndReason),
}

impl SessionState {
    pub fn phase(&self) -> &'static str {
        match self {
            SessionState::Entering => "entering",
            SessionState::BrowsingRooms => "browsing_rooms",
            SessionState::BrowsingEquipment { .. } => "browsing_equipment",
            SessionState::Exercising { .. } => "exercising",
            SessionState::OutcomeOk => "outcome_ok",
            SessionState::OutcomeInjured => "outcome_injured",
            SessionState::Ended(_) => "ended",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Visitor chose to leave.
    Left,
    /// Stamina hit zero after a workout.
    Exhausted,
    Injured,
    NoRoomsAvailable,
    /// Identity string did not match any member.
    UnknownMember,
    /// Input stream closed while waiting at a prompt.
    InputClosed,
}

impl EndReason {
    pub fn label(self) -> &'static str {
        match self {
            EndReason::Left => "left",
            EndReason::Exhausted => "exhausted",
            EndReason::Injured => "injured",
            EndReason::NoRoomsAvailable => "no_rooms_available",
            EndReason::UnknownMember => "unknown_member",
            EndReason::InputClosed => "input_closed",
        }
    }
}

/// What a finished visit looked like from the outside.
#[derive(Debug, Clone, Serialize)]
pub struct VisitReport {
    pub identity: Identity,
    pub reason: EndReason,
    /// Stats as persisted when the visit ended (`None` if none were loaded).
    pub stats: Option<FitnessStats>,
    /// The post-injury record shown to the visitor, before the stamina reset.
    pub injury_snapshot: Option<FitnessStats>,
    pub workouts: u32,
    pub improvements: Vec<(StatField, u8)>,
    /// Phase labels in the order they were entered.
    pub trace: Vec<&'static str>,
}

impl VisitReport {
    pub fn injured(&self) -> bool {
        self.reason == EndReason::Injured
    }
}

/// Value a trainable field reaches after one improvement, or `None` when it
/// is already at the top of its range.
pub fn improved_value(stats: &FitnessStats, field: StatField) -> Option<u8> {
    let (_, max) = field.bounds();
    let current = stats.get(field);
    if current < max {
        Some(current + 1)
    } else {
        None
    }
}

pub fn stamina_after_workout(stamina: u8) -> u8 {
    stamina.saturating_sub(STAMINA_COST)
}

/// Post-injury record: flagged injured, every trainable stat down one
/// (floored at 1), stamina emptied.
pub fn apply_injury(stats: &FitnessStats) -> FitnessStats {
    let knock = |v: u8| v.saturating_sub(1).max(1);
    let mut hurt = stats.clone();
    hurt.is_injured = true;
    hurt.fitness_level = knock(stats.fitness_level);
    hurt.strength = knock(stats.strength);
    hurt.flexibility = knock(stats.flexibility);
    hurt.endurance = knock(stats.endurance);
    hurt.stamina = 0;
    hurt
}

/// Stamina granted for recovery, keyed by fitness level.
pub fn recovery_stamina(fitness_level: u8) -> u8 {
    match FitnessLevel::from_value(fitness_level) {
        Some(FitnessLevel::Beginner) => 5,
        Some(FitnessLevel::Intermediate) => 7,
        Some(FitnessLevel::Advanced) => 10,
        None => 5,
    }
}

pub fn format_stats(stats: &FitnessStats) -> String {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    let level = match stats.level() {
        Some(l) => format!("{} ({})", stats.fitness_level, l.label()),
        None => stats.fitness_level.to_string(),
    };
    let rows = [
        ("Fitness level", level),
        ("Strength", stats.strength.to_string()),
        ("Flexibility", stats.flexibility.to_string()),
        ("Endurance", stats.endurance.to_string()),
        ("Stamina", stats.stamina.to_string()),
        ("Has water", yes_no(stats.has_water).to_string()),
        ("Has protein", yes_no(stats.has_protein).to_string()),
        ("Injured", yes_no(stats.is_injured).to_string()),
    ];
    let mut out = format!("| {:<15} | {:^16} |\n", "Metric", "Value");
    for (name, value) in rows {
        out.push_str(&format!("| {:<15} | {:^16} |\n", name, value));
    }
    out
}

struct Visit {
    identity: Identity,
    stats: Option<FitnessStats>,
    injury_snapshot: Option<FitnessStats>,
    workouts: u32,
    improvements: Vec<(StatField, u8)>,
    trace: Vec<&'static str>,
}

impl Visit {
    fn finish(self, reason: EndReason) -> VisitReport {
        VisitReport {
            identity: self.identity,
            reason,
            stats: self.stats,
            injury_snapshot: self.injury_snapshot,
            workouts: self.workouts,
            improvements: self.improvements,
            trace: self.trace,
        }
    }
}

enum Choice<T> {
    Picked(T),
    Back,
    Closed,
}

/// Drives one visit at a time against a [`GymStore`].
pub struct SessionEngine<'a, C: GymConsole, D: Dice> {
    store: &'a GymStore,
    console: C,
    dice: D,
    config: SessionConfig,
    gym_name: String,
}

impl<'a, C: GymConsole, D: Dice> SessionEngine<'a, C, D> {
    pub fn new(store: &'a GymStore, console: C, dice: D, config: SessionConfig) -> Self {
        Self {
            store,
            console,
            dice,
            config,
            gym_name: "the gym".to_string(),
        }
    }

    pub fn with_gym_name(mut self, name: &str) -> Self {
        self.gym_name = name.to_string();
        self
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    pub fn dice(&self) -> &D {
        &self.dice
    }

    /// Run one complete visit for `identity` and return how it ended.
    ///
    /// Storage failures abort the visit and come back as `Err`; nothing that
    /// was already written is rolled back. A malformed identity is refused
    /// before the visit starts.
    pub fn enter(&mut self, identity: &str) -> Result<VisitReport, GymError> {
        metrics::inc_visit_started();
        let result = self.run(identity);
        match &result {
            Ok(report) => {
                metrics::record_visit_end(report.reason.label());
                info!(
                    "visit by {} ended: {} after {} workout(s)",
                    report.identity,
                    report.reason.label(),
                    report.workouts
                );
            }
            Err(e) if e.is_data_access() => {
                metrics::inc_aborted();
                warn!("visit by {} aborted: {}", identity.trim(), e);
            }
            Err(e) => warn!("visit refused for {}: {}", preview_input(identity), e),
        }
        result
    }

    fn run(&mut self, raw_identity: &str) -> Result<VisitReport, GymError> {
        let identity = Identity::parse(raw_identity)?;
        let mut visit = Visit {
            identity,
            stats: None,
            injury_snapshot: None,
            workouts: 0,
            improvements: Vec::new(),
            trace: Vec::new(),
        };
        let mut state = SessionState::Entering;
        loop {
            visit.trace.push(state.phase());
            debug!("{}: {}", visit.identity, state.phase());
            state = match state {
                SessionState::Entering => self.on_entering(&mut visit)?,
                SessionState::BrowsingRooms => self.on_browsing_rooms()?,
                SessionState::BrowsingEquipment { room } => self.on_browsing_equipment(room)?,
                SessionState::Exercising { room, equipment } => {
                    self.on_exercising(&mut visit, &room, &equipment)?
                }
                SessionState::OutcomeOk => self.on_outcome_ok(&mut visit)?,
                SessionState::OutcomeInjured => self.on_outcome_injured(&mut visit)?,
                SessionState::Ended(reason) => return Ok(visit.finish(reason)),
            };
        }
    }

    fn read_line(&mut self, text: &str) -> Result<Option<String>, GymError> {
        let line = self.console.prompt(text)?;
        if let Some(l) = &line {
            debug!("input {}", preview_input(l));
        }
        Ok(line.map(|l| l.trim().to_ascii_uppercase()))
    }

    fn on_entering(&mut self, visit: &mut Visit) -> Result<SessionState, GymError> {
        match &visit.identity {
            Identity::Guest => {
                self.console
                    .say(&format!("Welcome to {}, Guest!", self.gym_name));
                self.console.say(
                    "To personalize your guest experience, please answer the following question:",
                );
            }
            Identity::Member { email } => match self.store.get_member(email)? {
                Some(member) => self.console.say(&format!(
                    "Welcome back to {}, {}!",
                    self.gym_name, member.name
                )),
                None => {
                    self.console.say(
                        "No member found with this email. Please register or check your email.",
                    );
                    return Ok(SessionState::Ended(EndReason::UnknownMember));
                }
            },
        }

        let console = &mut self.console;
        let loaded = StatsStore::new(self.store).initialize_or_fetch(
            &visit.identity,
            &mut self.dice,
            || ask_fitness_level(console),
        )?;
        let Some(loaded) = loaded else {
            return Ok(SessionState::Ended(EndReason::InputClosed));
        };

        if loaded.initialized {
            if visit.identity.is_guest() {
                self.console.say("Your guest stats have been initialized.");
            } else {
                self.console
                    .say("You must be a new member - your stats have been initialized.");
            }
        }
        self.console.say("Your stats:");
        self.console.say(&format_stats(&loaded.stats));
        visit.stats = Some(loaded.stats);
        Ok(SessionState::BrowsingRooms)
    }

    fn on_browsing_rooms(&mut self) -> Result<SessionState, GymError> {
        let rooms = EquipmentRegistry::new(self.store).list_available_rooms()?;
        if rooms.is_empty() {
            self.console
                .say("Currently, no rooms are available. Please try again later.");
            return Ok(SessionState::Ended(EndReason::NoRoomsAvailable));
        }

        let mut menu = String::from("----------------------------------------------------\nWhere would you like to go?\n");
        for (idx, room) in rooms.iter().enumerate() {
            menu.push_str(&format!("{}. {}\n", idx + 1, room.name));
        }
        menu.push_str("0. Leave the gym");
        self.console.say(&menu);

        match self.pick_from(&rooms, "\nEnter the number of the room you'd like to visit: ", &["0", "L", "LEAVE"], "Invalid room number. Please choose a valid number.")? {
            Choice::Picked(room) => Ok(SessionState::BrowsingEquipment { room }),
            Choice::Back => {
                self.console.say("You head for the exit. See you next time!");
                Ok(SessionState::Ended(EndReason::Left))
            }
            Choice::Closed => Ok(SessionState::Ended(EndReason::InputClosed)),
        }
    }

    fn on_browsing_equipment(&mut self, room: RoomRecord) -> Result<SessionState, GymError> {
        let items = EquipmentRegistry::new(self.store).list_usable_equipment(room.id)?;
        if items.is_empty() {
            self.console.say(&format!(
                "No equipment available in {}. Choose another room.",
                room.name
            ));
            return Ok(SessionState::BrowsingRooms);
        }

        let mut menu = format!("\nIn the {}, you can use the following equipment:\n", room.name);
        for (idx, item) in items.iter().enumerate() {
            menu.push_str(&format!("{}. {} (Quality: {})\n", idx + 1, item.name, item.quality));
        }
        menu.push_str("B. Back to the room list");
        self.console.say(&menu);

        match self.pick_from(&items, "\nEnter the number of the equipment you'd like to use: ", &["B", "BACK"], "Invalid equipment number. Please choose a valid number.")? {
            Choice::Picked(equipment) => Ok(SessionState::Exercising { room, equipment }),
            Choice::Back => Ok(SessionState::BrowsingRooms),
            Choice::Closed => Ok(SessionState::Ended(EndReason::InputClosed)),
        }
    }

    /// Prompt until the answer is a 1-based index into `options` or one of
    /// the `back` words. Anything else re-prompts.
    fn pick_from<T: Clone>(
        &mut self,
        options: &[T],
        text: &str,
        back: &[&str],
        invalid: &str,
    ) -> Result<Choice<T>, GymError> {
        loop {
            let Some(answer) = self.read_line(text)? else {
                return Ok(Choice::Closed);
            };
            if back.iter().any(|w| *w == answer) {
                return Ok(Choice::Back);
            }
            match answer.parse::<usize>() {
                Ok(n) if n >= 1 && n <= options.len() => {
                    return Ok(Choice::Picked(options[n - 1].clone()))
                }
                Ok(_) => self.console.say(invalid),
                Err(_) => self.console.say("Please enter a valid number."),
            }
        }
    }

    fn play_workout_animation(&mut self) {
        let mut trail = String::from(" ε=");
        for _ in 0..self.config.workout_frames {
            self.console
                .say(&format!("Working out...\n{}ᕕ( ᐛ )ᕗ", trail));
            trail.push_str(" ε=");
            if self.config.frame_delay_ms > 0 {
                thread::sleep(Duration::from_millis(self.config.frame_delay_ms));
            }
        }
    }

    fn on_exercising(
        &mut self,
        visit: &mut Visit,
        room: &RoomRecord,
        equipment: &EquipmentRecord,
    ) -> Result<SessionState, GymError> {
        self.console.say(&format!(
            "\nYou are now using the {}. Enjoy your workout!",
            equipment.name
        ));
        let wear = EquipmentRegistry::new(self.store).apply_wear(equipment.id)?;
        visit.workouts += 1;
        metrics::inc_workout();
        debug!(
            "{} used {} in {} (quality {} -> {})",
            visit.identity, equipment.name, room.name, wear.before, wear.after
        );

        self.play_workout_animation();

        if wear.before < self.config.low_quality_threshold {
            self.console.say(
                "Warning: Equipment has very low quality, increased chance of getting injured!",
            );
            let avoided = self.dice.roll(1, self.config.injury_avoid_odds.max(1)) == 1;
            if !avoided {
                self.console
                    .say("You have been injured due to the poor quality of the equipment!");
                return Ok(SessionState::OutcomeInjured);
            }
        }
        Ok(SessionState::OutcomeOk)
    }

    fn current_stats(&self, identity: &Identity) -> Result<FitnessStats, GymError> {
        StatsStore::new(self.store)
            .fetch(identity)?
            .ok_or_else(|| GymError::NotFound(format!("stats: {}", identity)))
    }

    fn on_outcome_ok(&mut self, visit: &mut Visit) -> Result<SessionState, GymError> {
        let stats_store = StatsStore::new(self.store);
        let mut stats = self.current_stats(&visit.identity)?;

        if self.dice.chance(1, 2) {
            let field = StatField::TRAINABLE[self.dice.pick(StatField::TRAINABLE.len())];
            match improved_value(&stats, field) {
                Some(value) => {
                    stats = stats_store.apply_delta(&visit.identity, field, value)?;
                    visit.improvements.push((field, value));
                    metrics::inc_improvement();
                    self.console
                        .say(&format!("Your {} has improved to {}.", field.name(), value));
                }
                None => self.console.say(&format!(
                    "Your {} is already at its maximum. No improvement this session.",
                    field.name()
                )),
            }
        } else {
            self.console.say("No improvements in your stats this session.");
        }

        let stamina = stamina_after_workout(stats.stamina);
        stats = stats_store.apply_delta(&visit.identity, StatField::Stamina, stamina)?;

        let line = narrate(Outcome::Ok, &mut self.dice);
        self.console.say(line);
        self.console
            .say("----------------------------------------------------");
        self.console.say(&format!("Stamina is now {}.", stamina));
        self.console.say("Updated stats after your workout:");
        self.console.say(&format_stats(&stats));
        visit.stats = Some(stats);

        if stamina == 0 {
            self.console
                .say("Your stamina has dropped to zero, you can't go on.");
            self.console
                .say("Please rest and recover before returning to the gym.");
            return Ok(SessionState::Ended(EndReason::Exhausted));
        }
        Ok(SessionState::BrowsingRooms)
    }

    fn on_outcome_injured(&mut self, visit: &mut Visit) -> Result<SessionState, GymError> {
        let stats_store = StatsStore::new(self.store);
        let before = self.current_stats(&visit.identity)?;
        let hurt = apply_injury(&before);
        stats_store.record_injury(&visit.identity, &hurt)?;
        metrics::inc_injury();
        warn!("{} injured; stats reduced", visit.identity);

        let line = narrate(Outcome::Injured, &mut self.dice);
        self.console.say(line);
        self.console
            .say("Due to an injury, all your stats have been reduced and stamina set to 0.");
        self.console.say("Updated stats after your activity:");
        self.console.say(&format_stats(&hurt));

        let reset = recovery_stamina(hurt.fitness_level);
        let recovered = stats_store.apply_delta(&visit.identity, StatField::Stamina, reset)?;
        self.console.say(&format!(
            "Stamina reset to {} based on fitness level {}.",
            reset, hurt.fitness_level
        ));
        self.console
            .say("Please rest and recover before returning to the gym.");

        visit.injury_snapshot = Some(hurt);
        visit.stats = Some(recovered);
        Ok(SessionState::Ended(EndReason::Injured))
    }
}

/// Ask for a self-reported level until the answer is 1, 2 or 3. `None` means
/// input closed before a valid answer.
fn ask_fitness_level<C: GymConsole>(console: &mut C) -> Result<Option<FitnessLevel>, GymError> {
    console.say("What is your fitness level?\n1. Beginner\n2. Intermediate\n3. Advanced");
    loop {
        let Some(answer) = console.prompt("Enter choice (1-3): ")? else {
            return Ok(None);
        };
        debug!("input {}", preview_input(&answer));
        match answer.trim().parse::<u8>().ok().and_then(FitnessLevel::from_value) {
            Some(level) => return Ok(Some(level)),
            None => console.say("Please enter 1, 2 or 3."),
        }
    }
}
