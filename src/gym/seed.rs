//! Canonical gym layout inserted into an empty store.
//!
//! Room 5 ships closed so fresh installs exercise the availability filter, and
//! a couple of items start worn so the low-quality injury path and the
//! maintenance report have something to show.

use crate::gym::types::{EquipmentRecord, RoomRecord};

/// Room ids present in every freshly seeded store.
pub const CANONICAL_ROOM_IDS: [u32; 5] = [1, 2, 3, 4, 5];

pub fn canonical_gym() -> (Vec<RoomRecord>, Vec<EquipmentRecord>) {
    let rooms = vec![
        RoomRecord::new(1, "Cardio Deck"),
        RoomRecord::new(2, "Free Weights"),
        RoomRecord::new(3, "Stretch Studio"),
        RoomRecord::new(4, "Spin Room"),
        RoomRecord::new(5, "Boxing Ring").closed(),
    ];

    let equipment = vec![
        EquipmentRecord::new(1, 1, "Treadmill", 9),
        EquipmentRecord::new(2, 1, "Rowing Machine", 7),
        EquipmentRecord::new(3, 1, "Elliptical", 2),
        EquipmentRecord::new(4, 2, "Bench Press", 8),
        EquipmentRecord::new(5, 2, "Squat Rack", 6),
        EquipmentRecord::new(6, 2, "Dumbbell Set", 10),
        EquipmentRecord::new(7, 3, "Yoga Mats", 10),
        EquipmentRecord::new(8, 3, "Foam Rollers", 3),
        EquipmentRecord::new(9, 4, "Spin Bike", 5),
        EquipmentRecord::new(10, 4, "Spin Bike (back row)", 0),
        EquipmentRecord::new(11, 5, "Heavy Bag", 8),
    ];

    (rooms, equipment)
}
