//! Starting resource pools per class.

use crate::value_objects::{ResourceKind, ResourcePool, RestType};

const FULL_CASTERS: &[&str] = &["wizard", "cleric", "druid", "sorcerer", "bard"];

/// Pools a class starts with at `level`.
pub fn class_resource_pools(class_key: &str, level: u8, charisma_modifier: i32) -> Vec<ResourcePool> {
    let level = level.max(1);
    let mut pools = Vec::new();

    match class_key {
        "barbarian" => pools.push(ResourcePool::full(ResourceKind::Rage, 2, RestType::Long)),
        "fighter" => pools.push(ResourcePool::full(ResourceKind::SecondWind, 1, RestType::Short)),
        "bard" => {
            let uses = u32::try_from(charisma_modifier.max(1)).unwrap_or(1);
            pools.push(ResourcePool::full(
                ResourceKind::BardicInspiration,
                uses,
                RestType::Long,
            ));
        }
        "paladin" => pools.push(ResourcePool::full(
            ResourceKind::LayOnHands,
            5 * u32::from(level),
            RestType::Long,
        )),
        "warlock" => pools.push(ResourcePool::full(ResourceKind::PactSlots, 1, RestType::Short)),
        "cleric" if level >= 2 => pools.push(ResourcePool::full(
            ResourceKind::ChannelDivinity,
            1,
            RestType::Short,
        )),
        "monk" if level >= 2 => pools.push(ResourcePool::full(
            ResourceKind::Ki,
            u32::from(level),
            RestType::Short,
        )),
        _ => {}
    }

    if FULL_CASTERS.contains(&class_key) {
        pools.push(ResourcePool::full(
            ResourceKind::SpellSlotsLevel1,
            2,
            RestType::Long,
        ));
    }

    pools
}
