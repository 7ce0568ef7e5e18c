//! Equipment condition report and the repair pass run from the front office.

use std::collections::HashMap;

use log::info;
use serde::Serialize;

use crate::gym::errors::GymError;
use crate::gym::storage::GymStore;
use crate::gym::types::{EquipmentRecord, STAT_MAX};

/// Items below this quality are flagged for attention by default.
pub const DEFAULT_ATTENTION_THRESHOLD: u8 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentCondition {
    pub equipment_id: u32,
    pub equipment_name: String,
    pub room_name: String,
    pub quality: u8,
}

/// Every item joined with its room name, best condition first.
pub fn condition_report(store: &GymStore) -> Result<Vec<EquipmentCondition>, GymError> {
    let room_names: HashMap<u32, String> = store
        .list_rooms()?
        .into_iter()
        .map(|r| (r.id, r.name))
        .collect();
    let mut report: Vec<EquipmentCondition> = store
        .list_equipment()?
        .into_iter()
        .map(|e| EquipmentCondition {
            equipment_id: e.id,
            room_name: room_names
                .get(&e.room_id)
                .cloned()
                .unwrap_or_else(|| format!("room #{}", e.room_id)),
            equipment_name: e.name,
            quality: e.quality,
        })
        .collect();
    report.sort_by(|a, b| {
        b.quality
            .cmp(&a.quality)
            .then(a.equipment_id.cmp(&b.equipment_id))
    });
    Ok(report)
}

pub fn needing_attention(report: &[EquipmentCondition], threshold: u8) -> Vec<EquipmentCondition> {
    report
        .iter()
        .filter(|c| c.quality < threshold)
        .cloned()
        .collect()
}

/// Restore every item below `threshold` to `restored_quality`. Returns the
/// number of items touched.
pub fn repair_worn(store: &GymStore, threshold: u8, restored_quality: u8) -> Result<usize, GymError> {
    let restored = restored_quality.min(STAT_MAX);
    let mut repaired = 0usize;
    for item in store.list_equipment()? {
        if item.quality >= threshold {
            continue;
        }
        store.update_equipment(item.id, |current| EquipmentRecord {
            quality: restored,
            ..current.clone()
        })?;
        repaired += 1;
    }
    info!("maintenance restored {} item(s) to quality {}", repaired, restored);
    Ok(repaired)
}

pub fn format_report(report: &[EquipmentCondition]) -> String {
    let mut out = format!("| {:<22} | {:<18} | {:^7} |\n", "Equipment", "Room", "Quality");
    for c in report {
        out.push_str(&format!(
            "| {:<22} | {:<18} | {:^7} |\n",
            c.equipment_name, c.room_name, c.quality
        ));
    }
    out
}
