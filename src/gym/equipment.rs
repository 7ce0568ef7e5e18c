//! Rooms, the equipment inside them, and the wear rule applied on every use.

use log::debug;

use crate::gym::errors::GymError;
use crate::gym::storage::GymStore;
use crate::gym::types::{EquipmentRecord, RoomRecord, QUALITY_FLOOR};

/// Quality lost per use.
pub const WEAR_PER_USE: u8 = 2;

/// Quality after one use: drops by [`WEAR_PER_USE`] but never below the floor.
/// Removed items (quality 0) stay removed.
pub fn worn_quality(quality: u8) -> u8 {
    if quality < QUALITY_FLOOR {
        return quality;
    }
    quality.saturating_sub(WEAR_PER_USE).max(QUALITY_FLOOR)
}

/// Quality change caused by one [`EquipmentRegistry::apply_wear`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wear {
    pub before: u8,
    pub after: u8,
}

/// View over the room and equipment trees of a [`GymStore`].
pub struct EquipmentRegistry<'a> {
    store: &'a GymStore,
}

impl<'a> EquipmentRegistry<'a> {
    pub fn new(store: &'a GymStore) -> Self {
        Self { store }
    }

    /// Rooms open to visitors, in ascending id order.
    pub fn list_available_rooms(&self) -> Result<Vec<RoomRecord>, GymError> {
        Ok(self
            .store
            .list_rooms()?
            .into_iter()
            .filter(|r| r.available)
            .collect())
    }

    /// Items in `room_id` with quality above 0, in ascending id order.
    pub fn list_usable_equipment(&self, room_id: u32) -> Result<Vec<EquipmentRecord>, GymError> {
        Ok(self
            .store
            .list_equipment()?
            .into_iter()
            .filter(|e| e.room_id == room_id && e.is_usable())
            .collect())
    }

    /// Apply one use worth of wear as a single compare-and-swap on the row.
    pub fn apply_wear(&self, equipment_id: u32) -> Result<Wear, GymError> {
        let (before, after) = self.store.update_equipment(equipment_id, |item| EquipmentRecord {
            quality: worn_quality(item.quality),
            ..item.clone()
        })?;
        debug!(
            "wear on {} ({}): {} -> {}",
            after.name, equipment_id, before.quality, after.quality
        );
        Ok(Wear {
            before: before.quality,
            after: after.quality,
        })
    }

    /// Open or close a room to visitors.
    pub fn set_room_availability(&self, room_id: u32, available: bool) -> Result<(), GymError> {
        let mut room = self.store.get_room(room_id)?;
        room.available = available;
        self.store.put_room(room)
    }
}
