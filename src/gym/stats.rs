//! Per-identity fitness records: baseline roll, load-or-initialize, single-field writes.

use log::{debug, info};

use crate::gym::dice::Dice;
use crate::gym::errors::GymError;
use crate::gym::storage::GymStore;
use crate::gym::types::{FitnessLevel, FitnessStats, Identity, StatField};

/// Result of [`StatsStore::initialize_or_fetch`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedStats {
    pub stats: FitnessStats,
    /// True when the row was (re-)rolled and written during this call.
    pub initialized: bool,
}

/// Roll a fresh record for a self-reported level.
///
/// Strength, flexibility, endurance and stamina are drawn independently from
/// the level's baseline range; water is a fair coin and protein a 1-in-4 coin.
pub fn roll_baseline<D: Dice + ?Sized>(level: FitnessLevel, dice: &mut D) -> FitnessStats {
    let (lo, hi) = level.baseline_range();
    let strength = dice.roll(lo, hi);
    let flexibility = dice.roll(lo, hi);
    let endurance = dice.roll(lo, hi);
    let stamina = dice.roll(lo, hi);
    let mut stats = FitnessStats::new(level, strength, flexibility, endurance, stamina);
    stats.has_water = dice.chance(1, 2);
    stats.has_protein = dice.chance(1, 4);
    stats.is_injured = false;
    stats
}

/// View over the stats tree of a [`GymStore`].
pub struct StatsStore<'a> {
    store: &'a GymStore,
}

impl<'a> StatsStore<'a> {
    pub fn new(store: &'a GymStore) -> Self {
        Self { store }
    }

    pub fn fetch(&self, identity: &Identity) -> Result<Option<FitnessStats>, GymError> {
        self.store.get_stats(identity.key())
    }

    /// Load the identity's stats, rolling a baseline when required.
    ///
    /// The guest is re-rolled on every call. A member with an existing row gets
    /// it back untouched (no write); a member without one is rolled once.
    /// `ask_level` is only invoked when a roll happens; if it yields no level,
    /// nothing is written and `Ok(None)` is returned.
    pub fn initialize_or_fetch<D, F>(
        &self,
        identity: &Identity,
        dice: &mut D,
        ask_level: F,
    ) -> Result<Option<LoadedStats>, GymError>
    where
        D: Dice + ?Sized,
        F: FnOnce() -> Result<Option<FitnessLevel>, GymError>,
    {
        if let Identity::Member { .. } = identity {
            if let Some(stats) = self.store.get_stats(identity.key())? {
                debug!("stats for {} fetched", identity);
                return Ok(Some(LoadedStats {
                    stats,
                    initialized: false,
                }));
            }
        }

        let Some(level) = ask_level()? else {
            debug!("no fitness level given for {}; nothing rolled", identity);
            return Ok(None);
        };
        let stats = roll_baseline(level, dice);
        self.store.put_stats(identity.key(), stats.clone())?;
        info!(
            "stats for {} initialized at {} ({}/{}/{}/{})",
            identity,
            level.label(),
            stats.strength,
            stats.flexibility,
            stats.endurance,
            stats.stamina
        );
        Ok(Some(LoadedStats {
            stats,
            initialized: true,
        }))
    }

    /// Write one numeric field. Values outside the field's range are rejected
    /// before anything is persisted.
    pub fn apply_delta(
        &self,
        identity: &Identity,
        field: StatField,
        new_value: u8,
    ) -> Result<FitnessStats, GymError> {
        field.check(new_value)?;
        let mut stats = self
            .store
            .get_stats(identity.key())?
            .ok_or_else(|| GymError::NotFound(format!("stats: {}", identity)))?;
        stats.set(field, new_value)?;
        self.store.put_stats(identity.key(), stats.clone())?;
        debug!("{} {} -> {}", identity, field.name(), new_value);
        Ok(stats)
    }

    /// Persist a full post-injury record in one write.
    pub fn record_injury(&self, identity: &Identity, stats: &FitnessStats) -> Result<(), GymError> {
        if !stats.within_bounds() {
            return Err(GymError::InvalidField {
                field: "injury record",
                value: stats.fitness_level,
                min: 1,
                max: 3,
            });
        }
        self.store.put_stats(identity.key(), stats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gym::dice::RandomDice;
    use crate::gym::storage::GymStoreBuilder;
    use tempfile::TempDir;

    fn store() -> (GymStore, TempDir) {
        let dir = TempDir::new().expect("tempdir");
        let store = GymStoreBuilder::new(dir.path()).without_seed().open().expect("store");
        (store, dir)
    }

    #[test]
    fn baseline_rolls_respect_level_range() {
        let mut dice = RandomDice::seeded(11);
        for level in FitnessLevel::ALL {
            let (lo, hi) = level.baseline_range();
            for _ in 0..200 {
                let stats = roll_baseline(level, &mut dice);
                for v in [stats.strength, stats.flexibility, stats.endurance, stats.stamina] {
                    assert!(v >= lo && v <= hi, "{} outside {}..={}", v, lo, hi);
                }
                assert_eq!(stats.fitness_level, level.value());
                assert!(!stats.is_injured);
            }
        }
    }

    #[test]
    fn existing_member_row_is_returned_without_asking() {
        let (store, _dir) = store();
        let member = Identity::parse("cy@example.com").unwrap();
        let stats = FitnessStats::new(FitnessLevel::Advanced, 9, 9, 9, 2);
        store.put_stats(member.key(), stats).unwrap();

        let view = StatsStore::new(&store);
        let mut dice = RandomDice::seeded(3);
        let loaded = view
            .initialize_or_fetch(&member, &mut dice, || panic!("should not ask for a level"))
            .expect("fetch")
            .expect("existing row");
        assert!(!loaded.initialized);
        assert_eq!(loaded.stats.stamina, 2);
    }

    #[test]
    fn guest_is_rerolled_every_call() {
        let (store, _dir) = store();
        let view = StatsStore::new(&store);
        let mut dice = RandomDice::seeded(5);
        let first = view
            .initialize_or_fetch(&Identity::Guest, &mut dice, || Ok(Some(FitnessLevel::Beginner)))
            .unwrap()
            .expect("rolled");
        assert!(first.initialized);
        let second = view
            .initialize_or_fetch(&Identity::Guest, &mut dice, || Ok(Some(FitnessLevel::Advanced)))
            .unwrap()
            .expect("rolled");
        assert!(second.initialized);
        assert_eq!(second.stats.fitness_level, 3);
        assert!(second.stats.strength >= 8);
        let persisted = view.fetch(&Identity::Guest).unwrap().unwrap();
        assert_eq!(persisted.strength, second.stats.strength);
    }

    #[test]
    fn declined_level_writes_nothing() {
        let (store, _dir) = store();
        let view = StatsStore::new(&store);
        let mut dice = RandomDice::seeded(8);
        let member = Identity::parse("eve@example.com").unwrap();
        let loaded = view.initialize_or_fetch(&member, &mut dice, || Ok(None)).unwrap();
        assert!(loaded.is_none());
        assert!(view.fetch(&member).unwrap().is_none());
    }

    #[test]
    fn apply_delta_rejects_out_of_range() {
        let (store, _dir) = store();
        let view = StatsStore::new(&store);
        let member = Identity::parse("di@example.com").unwrap();
        assert!(matches!(
            view.apply_delta(&member, StatField::Strength, 5),
            Err(GymError::NotFound(_))
        ));
        store
            .put_stats(member.key(), FitnessStats::new(FitnessLevel::Beginner, 2, 2, 2, 3))
            .unwrap();
        assert!(matches!(
            view.apply_delta(&member, StatField::Stamina, 11),
            Err(GymError::InvalidField { .. })
        ));
        let updated = view.apply_delta(&member, StatField::Stamina, 1).unwrap();
        assert_eq!(updated.stamina, 1);
        assert_eq!(view.fetch(&member).unwrap().unwrap().stamina, 1);
    }
}
