mod common;

use common::{empty_store, seeded_store};
use gymkeeper::gym::{
    canonical_gym, condition_report, needing_attention, repair_worn, EquipmentRegistry,
    CANONICAL_ROOM_IDS, DEFAULT_ATTENTION_THRESHOLD,
};

#[test]
fn seeding_is_idempotent() {
    let (store, _dir) = empty_store();
    let (rooms, equipment) = canonical_gym();

    assert_eq!(store.seed_gym_if_needed().unwrap(), rooms.len());
    assert_eq!(store.seed_gym_if_needed().unwrap(), 0);
    assert_eq!(store.list_rooms().unwrap().len(), rooms.len());
    assert_eq!(store.list_equipment().unwrap().len(), equipment.len());
}

#[test]
fn seeded_gym_hides_its_closed_room() {
    let (store, _dir) = seeded_store();
    let registry = EquipmentRegistry::new(&store);
    let open: Vec<u32> = registry
        .list_available_rooms()
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert!(open.len() < CANONICAL_ROOM_IDS.len());
    assert!(open.iter().all(|id| CANONICAL_ROOM_IDS.contains(id)));
}

#[test]
fn repair_brings_worn_seed_items_back_to_full() {
    let (store, _dir) = seeded_store();
    let report = condition_report(&store).unwrap();
    let worn = needing_attention(&report, DEFAULT_ATTENTION_THRESHOLD);
    assert!(!worn.is_empty());
    assert!(worn.iter().all(|c| c.quality < DEFAULT_ATTENTION_THRESHOLD));

    let repaired = repair_worn(&store, DEFAULT_ATTENTION_THRESHOLD, 10).unwrap();
    assert_eq!(repaired, worn.len());
    for c in &worn {
        assert_eq!(store.get_equipment(c.equipment_id).unwrap().quality, 10);
    }

    let after = condition_report(&store).unwrap();
    assert!(needing_attention(&after, DEFAULT_ATTENTION_THRESHOLD).is_empty());
    // Best condition first
    assert!(after.windows(2).all(|w| w[0].quality >= w[1].quality));
}

#[test]
fn report_serializes_for_json_output() {
    let (store, _dir) = seeded_store();
    let report = condition_report(&store).unwrap();
    let value = serde_json::to_value(&report).expect("json");
    let first = &value[0];
    assert!(first["equipment_name"].is_string());
    assert!(first["room_name"].is_string());
    assert!(first["quality"].as_u64().unwrap() <= 10);
}
