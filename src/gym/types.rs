use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::gym::errors::GymError;

pub const STATS_SCHEMA_VERSION: u8 = 1;
pub const ROOM_SCHEMA_VERSION: u8 = 1;
pub const EQUIPMENT_SCHEMA_VERSION: u8 = 1;
pub const MEMBER_SCHEMA_VERSION: u8 = 1;

/// Reserved identity string for the shared one-day-pass account.
pub const GUEST_KEY: &str = "guest";

/// Upper bound for strength, flexibility, endurance, stamina and equipment quality.
pub const STAT_MAX: u8 = 10;
/// Quality floor that normal wear never goes below.
pub const QUALITY_FLOOR: u8 = 1;

/// Who is visiting. The guest is one shared row that gets re-rolled every visit;
/// members are keyed by their (lowercased) email.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Identity {
    Guest,
    Member { email: String },
}

impl Identity {
    /// Classify a caller-supplied identity string.
    pub fn parse(raw: &str) -> Result<Self, GymError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GymError::InvalidIdentity("empty identity".to_string()));
        }
        if trimmed.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(GymError::InvalidIdentity(trimmed.to_string()));
        }
        if trimmed.eq_ignore_ascii_case(GUEST_KEY) {
            return Ok(Identity::Guest);
        }
        Ok(Identity::Member {
            email: trimmed.to_ascii_lowercase(),
        })
    }

    /// Storage key for the identity's stats row.
    pub fn key(&self) -> &str {
        match self {
            Identity::Guest => GUEST_KEY,
            Identity::Member { email } => email,
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self, Identity::Guest)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FitnessLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl FitnessLevel {
    pub const ALL: [FitnessLevel; 3] = [
        FitnessLevel::Beginner,
        FitnessLevel::Intermediate,
        FitnessLevel::Advanced,
    ];

    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            1 => Some(FitnessLevel::Beginner),
            2 => Some(FitnessLevel::Intermediate),
            3 => Some(FitnessLevel::Advanced),
            _ => None,
        }
    }

    pub fn value(self) -> u8 {
        match self {
            FitnessLevel::Beginner => 1,
            FitnessLevel::Intermediate => 2,
            FitnessLevel::Advanced => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FitnessLevel::Beginner => "Beginner",
            FitnessLevel::Intermediate => "Intermediate",
            FitnessLevel::Advanced => "Advanced",
        }
    }

    /// Inclusive range the baseline roll draws strength, flexibility, endurance
    /// and stamina from.
    pub fn baseline_range(self) -> (u8, u8) {
        match self {
            FitnessLevel::Beginner => (1, 3),
            FitnessLevel::Intermediate => (4, 7),
            FitnessLevel::Advanced => (8, 10),
        }
    }
}

/// Numeric fields of [`FitnessStats`] that can be written individually.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatField {
    FitnessLevel,
    Strength,
    Flexibility,
    Endurance,
    Stamina,
}

impl StatField {
    /// Fields a successful workout may improve.
    pub const TRAINABLE: [StatField; 4] = [
        StatField::FitnessLevel,
        StatField::Strength,
        StatField::Flexibility,
        StatField::Endurance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatField::FitnessLevel => "fitness_level",
            StatField::Strength => "strength",
            StatField::Flexibility => "flexibility",
            StatField::Endurance => "endurance",
            StatField::Stamina => "stamina",
        }
    }

    /// Closed range `(min, max)` the field must stay within.
    pub fn bounds(self) -> (u8, u8) {
        match self {
            StatField::FitnessLevel => (1, 3),
            StatField::Stamina => (0, STAT_MAX),
            StatField::Strength | StatField::Flexibility | StatField::Endurance => (1, STAT_MAX),
        }
    }

    pub fn check(self, value: u8) -> Result<u8, GymError> {
        let (min, max) = self.bounds();
        if value < min || value > max {
            return Err(GymError::InvalidField {
                field: self.name(),
                value,
                min,
                max,
            });
        }
        Ok(value)
    }
}

/// Persisted fitness record for one identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FitnessStats {
    pub fitness_level: u8,
    pub strength: u8,
    pub flexibility: u8,
    pub endurance: u8,
    pub stamina: u8,
    pub has_water: bool,
    pub has_protein: bool,
    pub is_injured: bool,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl FitnessStats {
    pub fn new(level: FitnessLevel, strength: u8, flexibility: u8, endurance: u8, stamina: u8) -> Self {
        Self {
            fitness_level: level.value(),
            strength,
            flexibility,
            endurance,
            stamina,
            has_water: false,
            has_protein: false,
            is_injured: false,
            updated_at: Utc::now(),
            schema_version: STATS_SCHEMA_VERSION,
        }
    }

    pub fn level(&self) -> Option<FitnessLevel> {
        FitnessLevel::from_value(self.fitness_level)
    }

    pub fn get(&self, field: StatField) -> u8 {
        match field {
            StatField::FitnessLevel => self.fitness_level,
            StatField::Strength => self.strength,
            StatField::Flexibility => self.flexibility,
            StatField::Endurance => self.endurance,
            StatField::Stamina => self.stamina,
        }
    }

    /// Write `value` into `field` after checking the field's range.
    pub fn set(&mut self, field: StatField, value: u8) -> Result<(), GymError> {
        let value = field.check(value)?;
        match field {
            StatField::FitnessLevel => self.fitness_level = value,
            StatField::Strength => self.strength = value,
            StatField::Flexibility => self.flexibility = value,
            StatField::Endurance => self.endurance = value,
            StatField::Stamina => self.stamina = value,
        }
        Ok(())
    }

    /// True when every numeric field sits inside its closed range.
    pub fn within_bounds(&self) -> bool {
        [
            StatField::FitnessLevel,
            StatField::Strength,
            StatField::Flexibility,
            StatField::Endurance,
            StatField::Stamina,
        ]
        .iter()
        .all(|f| f.check(self.get(*f)).is_ok())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomRecord {
    pub id: u32,
    pub name: String,
    pub available: bool,
    pub schema_version: u8,
}

impl RoomRecord {
    pub fn new(id: u32, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            available: true,
            schema_version: ROOM_SCHEMA_VERSION,
        }
    }

    pub fn closed(mut self) -> Self {
        self.available = false;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EquipmentRecord {
    pub id: u32,
    pub room_id: u32,
    pub name: String,
    /// 0 marks the item as removed; usable items sit in 1..=10.
    pub quality: u8,
    pub schema_version: u8,
}

impl EquipmentRecord {
    pub fn new(id: u32, room_id: u32, name: &str, quality: u8) -> Self {
        Self {
            id,
            room_id,
            name: name.to_string(),
            quality: quality.min(STAT_MAX),
            schema_version: EQUIPMENT_SCHEMA_VERSION,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.quality > 0
    }
}

/// Directory entry used to resolve a member identity and greet them by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemberRecord {
    pub email: String,
    pub name: String,
    pub joined_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl MemberRecord {
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            email: email.trim().to_ascii_lowercase(),
            name: name.trim().to_string(),
            joined_at: Utc::now(),
            schema_version: MEMBER_SCHEMA_VERSION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_identity_is_case_insensitive() {
        assert_eq!(Identity::parse("GUEST").unwrap(), Identity::Guest);
        assert_eq!(Identity::parse(" guest ").unwrap(), Identity::Guest);
        let member = Identity::parse("Ann@Example.com").unwrap();
        assert_eq!(member.key(), "ann@example.com");
        assert!(!member.is_guest());
    }

    #[test]
    fn blank_or_spaced_identity_rejected() {
        assert!(Identity::parse("   ").is_err());
        assert!(Identity::parse("two words").is_err());
    }

    #[test]
    fn stat_field_bounds_enforced() {
        let mut stats = FitnessStats::new(FitnessLevel::Beginner, 1, 1, 1, 5);
        assert!(stats.set(StatField::Stamina, 0).is_ok());
        assert!(stats.set(StatField::Strength, 0).is_err());
        assert!(stats.set(StatField::FitnessLevel, 4).is_err());
        assert!(stats.set(StatField::Endurance, 11).is_err());
        assert_eq!(stats.stamina, 0);
        assert!(stats.within_bounds());
    }

    #[test]
    fn baseline_ranges_follow_level() {
        assert_eq!(FitnessLevel::Beginner.baseline_range(), (1, 3));
        assert_eq!(FitnessLevel::Intermediate.baseline_range(), (4, 7));
        assert_eq!(FitnessLevel::Advanced.baseline_range(), (8, 10));
        assert_eq!(FitnessLevel::from_value(0), None);
    }
}
