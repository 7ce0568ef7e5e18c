mod common;

use std::thread;

use common::empty_store;
use gymkeeper::gym::{EquipmentRecord, EquipmentRegistry, GymError, RoomRecord, Wear};

#[test]
fn repeated_wear_settles_at_one() {
    let (store, _dir) = empty_store();
    store.put_room(RoomRecord::new(1, "Spin Room")).unwrap();
    store
        .put_equipment(EquipmentRecord::new(7, 1, "Spin Bike", 5))
        .unwrap();
    let registry = EquipmentRegistry::new(&store);

    let observed: Vec<Wear> = (0..3).map(|_| registry.apply_wear(7).unwrap()).collect();
    assert_eq!(
        observed,
        vec![
            Wear { before: 5, after: 3 },
            Wear { before: 3, after: 1 },
            Wear { before: 1, after: 1 },
        ]
    );
    // Still listed: worn equipment is never removed by wear alone
    assert_eq!(registry.list_usable_equipment(1).unwrap().len(), 1);
}

#[test]
fn wear_on_missing_item_is_not_found() {
    let (store, _dir) = empty_store();
    let registry = EquipmentRegistry::new(&store);
    assert!(matches!(registry.apply_wear(42), Err(GymError::NotFound(_))));
}

#[test]
fn concurrent_wear_loses_no_updates() {
    let (store, _dir) = empty_store();
    store
        .put_equipment(EquipmentRecord::new(1, 1, "Treadmill", 10))
        .unwrap();

    // Two uses each from two threads: 10 -> 8 -> 6 -> 4 -> 2 regardless of interleaving
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            thread::spawn(move || {
                let registry = EquipmentRegistry::new(&store);
                for _ in 0..2 {
                    registry.apply_wear(1).expect("wear");
                }
            })
        })
        .collect();
    for h in handles {
        h.join().expect("join");
    }
    assert_eq!(store.get_equipment(1).unwrap().quality, 2);
}
