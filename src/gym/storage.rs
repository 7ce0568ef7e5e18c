use std::path::{Path, PathBuf};

use log::debug;

use crate::gym::errors::GymError;
use crate::gym::seed::canonical_gym;
use crate::gym::types::{
    EquipmentRecord, FitnessStats, MemberRecord, RoomRecord, EQUIPMENT_SCHEMA_VERSION,
    MEMBER_SCHEMA_VERSION, ROOM_SCHEMA_VERSION, STATS_SCHEMA_VERSION,
};

const TREE_STATS: &str = "gym_stats";
const TREE_ROOMS: &str = "gym_rooms";
const TREE_EQUIPMENT: &str = "gym_equipment";
const TREE_MEMBERS: &str = "gym_members";

/// Helper builder so tests can easily create throwaway stores with custom paths.
pub struct GymStoreBuilder {
    path: PathBuf,
    ensure_seed: bool,
}

impl GymStoreBuilder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ensure_seed: true,
        }
    }

    /// Skip inserting the canonical rooms and equipment (useful for targeted tests).
    pub fn without_seed(mut self) -> Self {
        self.ensure_seed = false;
        self
    }

    pub fn open(self) -> Result<GymStore, GymError> {
        GymStore::open_with_options(self.path, self.ensure_seed)
    }
}

/// Sled-backed persistence for fitness stats, rooms, equipment and the member directory.
///
/// Cloning is cheap; clones share the same underlying database handle.
#[derive(Clone)]
pub struct GymStore {
    _db: sled::Db,
    stats: sled::Tree,
    rooms: sled::Tree,
    equipment: sled::Tree,
    members: sled::Tree,
}

impl GymStore {
    /// Open (or create) the store rooted at `path`, seeding the canonical gym
    /// layout if no rooms exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GymError> {
        Self::open_with_options(path, true)
    }

    fn open_with_options<P: AsRef<Path>>(path: P, seed: bool) -> Result<Self, GymError> {
        let path_ref = path.as_ref();
        std::fs::create_dir_all(path_ref)?;
        let db = sled::open(path_ref)?;
        let stats = db.open_tree(TREE_STATS)?;
        let rooms = db.open_tree(TREE_ROOMS)?;
        let equipment = db.open_tree(TREE_EQUIPMENT)?;
        let members = db.open_tree(TREE_MEMBERS)?;
        let store = Self {
            _db: db,
            stats,
            rooms,
            equipment,
            members,
        };

        if seed {
            store.seed_gym_if_needed()?;
        }

        Ok(store)
    }

    fn stats_key(identity_key: &str) -> Vec<u8> {
        format!("stats:{}", identity_key.to_ascii_lowercase()).into_bytes()
    }

    // Zero-padded ids keep sled's lexicographic order equal to numeric order.
    fn room_key(room_id: u32) -> Vec<u8> {
        format!("rooms:{:010}", room_id).into_bytes()
    }

    fn equipment_key(equipment_id: u32) -> Vec<u8> {
        format!("equipment:{:010}", equipment_id).into_bytes()
    }

    fn member_key(email: &str) -> Vec<u8> {
        format!("members:{}", email.to_ascii_lowercase()).into_bytes()
    }

    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, GymError> {
        Ok(bincode::serialize(value)?)
    }

    fn deserialize<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T, GymError> {
        Ok(bincode::deserialize::<T>(bytes)?)
    }

    fn check_schema(entity: &'static str, expected: u8, found: u8) -> Result<(), GymError> {
        if expected != found {
            return Err(GymError::SchemaMismatch {
                entity,
                expected,
                found,
            });
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stats
    // ------------------------------------------------------------------

    /// Fetch the stats row for an identity key. `Ok(None)` means no row exists,
    /// which is distinct from a row that holds low values.
    pub fn get_stats(&self, identity_key: &str) -> Result<Option<FitnessStats>, GymError> {
        let Some(bytes) = self.stats.get(Self::stats_key(identity_key))? else {
            return Ok(None);
        };
        let record: FitnessStats = Self::deserialize(&bytes)?;
        Self::check_schema("stats", STATS_SCHEMA_VERSION, record.schema_version)?;
        Ok(Some(record))
    }

    /// Insert or replace the stats row for an identity key.
    pub fn put_stats(&self, identity_key: &str, mut stats: FitnessStats) -> Result<(), GymError> {
        stats.schema_version = STATS_SCHEMA_VERSION;
        stats.touch();
        let bytes = Self::serialize(&stats)?;
        self.stats.insert(Self::stats_key(identity_key), bytes)?;
        self.stats.flush()?;
        Ok(())
    }

    /// Keys of every identity that has a stats row.
    pub fn list_stats_keys(&self) -> Result<Vec<String>, GymError> {
        let mut keys = Vec::new();
        for entry in self.stats.scan_prefix(b"stats:") {
            let (key, _) = entry?;
            let text = String::from_utf8_lossy(&key);
            if let Some(identity) = text.strip_prefix("stats:") {
                keys.push(identity.to_string());
            }
        }
        Ok(keys)
    }

    // ------------------------------------------------------------------
    // Rooms
    // ------------------------------------------------------------------

    pub fn put_room(&self, mut room: RoomRecord) -> Result<(), GymError> {
        room.schema_version = ROOM_SCHEMA_VERSION;
        let bytes = Self::serialize(&room)?;
        self.rooms.insert(Self::room_key(room.id), bytes)?;
        self.rooms.flush()?;
        Ok(())
    }

    pub fn get_room(&self, room_id: u32) -> Result<RoomRecord, GymError> {
        let Some(bytes) = self.rooms.get(Self::room_key(room_id))? else {
            return Err(GymError::NotFound(format!("room: {}", room_id)));
        };
        let record: RoomRecord = Self::deserialize(&bytes)?;
        Self::check_schema("room", ROOM_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    /// All rooms in ascending id order, available or not.
    pub fn list_rooms(&self) -> Result<Vec<RoomRecord>, GymError> {
        let mut rooms = Vec::new();
        for entry in self.rooms.scan_prefix(b"rooms:") {
            let (_, value) = entry?;
            let record: RoomRecord = Self::deserialize(&value)?;
            Self::check_schema("room", ROOM_SCHEMA_VERSION, record.schema_version)?;
            rooms.push(record);
        }
        Ok(rooms)
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    pub fn put_equipment(&self, mut item: EquipmentRecord) -> Result<(), GymError> {
        item.schema_version = EQUIPMENT_SCHEMA_VERSION;
        let bytes = Self::serialize(&item)?;
        self.equipment.insert(Self::equipment_key(item.id), bytes)?;
        self.equipment.flush()?;
        Ok(())
    }

    pub fn get_equipment(&self, equipment_id: u32) -> Result<EquipmentRecord, GymError> {
        let Some(bytes) = self.equipment.get(Self::equipment_key(equipment_id))? else {
            return Err(GymError::NotFound(format!("equipment: {}", equipment_id)));
        };
        let record: EquipmentRecord = Self::deserialize(&bytes)?;
        Self::check_schema("equipment", EQUIPMENT_SCHEMA_VERSION, record.schema_version)?;
        Ok(record)
    }

    /// All equipment in ascending id order, including removed (quality 0) items.
    pub fn list_equipment(&self) -> Result<Vec<EquipmentRecord>, GymError> {
        let mut items = Vec::new();
        for entry in self.equipment.scan_prefix(b"equipment:") {
            let (_, value) = entry?;
            let record: EquipmentRecord = Self::deserialize(&value)?;
            Self::check_schema("equipment", EQUIPMENT_SCHEMA_VERSION, record.schema_version)?;
            items.push(record);
        }
        Ok(items)
    }

    /// Atomically replace one equipment row with `change(current)`.
    ///
    /// Uses sled compare-and-swap; if another writer touched the row between
    /// the read and the swap, the change is recomputed from the fresh value.
    /// Returns `(before, after)`.
    pub fn update_equipment<F>(
        &self,
        equipment_id: u32,
        change: F,
    ) -> Result<(EquipmentRecord, EquipmentRecord), GymError>
    where
        F: Fn(&EquipmentRecord) -> EquipmentRecord,
    {
        let key = Self::equipment_key(equipment_id);
        loop {
            let Some(current) = self.equipment.get(&key)? else {
                return Err(GymError::NotFound(format!("equipment: {}", equipment_id)));
            };
            let before: EquipmentRecord = Self::deserialize(&current)?;
            Self::check_schema("equipment", EQUIPMENT_SCHEMA_VERSION, before.schema_version)?;
            let mut after = change(&before);
            after.id = before.id;
            after.schema_version = EQUIPMENT_SCHEMA_VERSION;
            let bytes = Self::serialize(&after)?;
            match self.equipment.compare_and_swap(&key, Some(&current), Some(bytes))? {
                Ok(()) => {
                    self.equipment.flush()?;
                    return Ok((before, after));
                }
                Err(_) => {
                    debug!("equipment {} changed underneath update; retrying", equipment_id);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // Member directory
    // ------------------------------------------------------------------

    pub fn put_member(&self, mut member: MemberRecord) -> Result<(), GymError> {
        member.schema_version = MEMBER_SCHEMA_VERSION;
        member.email = member.email.to_ascii_lowercase();
        let bytes = Self::serialize(&member)?;
        self.members.insert(Self::member_key(&member.email), bytes)?;
        self.members.flush()?;
        Ok(())
    }

    pub fn get_member(&self, email: &str) -> Result<Option<MemberRecord>, GymError> {
        let Some(bytes) = self.members.get(Self::member_key(email))? else {
            return Ok(None);
        };
        let record: MemberRecord = Self::deserialize(&bytes)?;
        Self::check_schema("member", MEMBER_SCHEMA_VERSION, record.schema_version)?;
        Ok(Some(record))
    }

    // ------------------------------------------------------------------
    // Seeding
    // ------------------------------------------------------------------

    /// Insert the canonical rooms and equipment when the store holds no rooms.
    /// Returns the number of rooms inserted (0 when already seeded).
    pub fn seed_gym_if_needed(&self) -> Result<usize, GymError> {
        if self.rooms.scan_prefix(b"rooms:").next().is_some() {
            return Ok(0);
        }
        let (rooms, equipment) = canonical_gym();
        let mut inserted = 0usize;
        for room in rooms {
            self.put_room(room)?;
            inserted += 1;
        }
        for item in equipment {
            self.put_equipment(item)?;
        }
        debug!("seeded gym with {} rooms", inserted);
        Ok(inserted)
    }
}
