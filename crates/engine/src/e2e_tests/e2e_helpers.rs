//! Shared setup for end-to-end tests.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use charforge_domain::{Ability, AbilityAssignments, AbilityRoll, CharacterId, RollId};

use crate::app::App;
use crate::infrastructure::clock::{FixedClock, ScriptedRandom};
use crate::infrastructure::config::EngineConfig;
use crate::infrastructure::memory::{InMemoryCharacterRepo, InMemoryDraftRepo};
use crate::infrastructure::rules_catalog::JsonRulesCatalog;
use crate::use_cases::character_creation::{DraftUpdate, DraftView};

pub const OWNER: &str = "player-1";
pub const REALM: &str = "forgotten-realms";

/// App over in-memory storage, the bundled catalog, a frozen clock, and dice
/// that always roll 3, 4, 5, 6.
pub fn test_app() -> App {
    App::new(
        Arc::new(JsonRulesCatalog::bundled().unwrap()),
        Arc::new(InMemoryCharacterRepo::new()),
        Arc::new(InMemoryDraftRepo::new()),
        &EngineConfig::default(),
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())),
        Arc::new(ScriptedRandom::new(vec![3, 4, 5, 6])),
    )
}

pub async fn new_draft(app: &App) -> DraftView {
    app.use_cases
        .character_creation
        .get_or_create_draft
        .execute(OWNER, REALM)
        .await
        .unwrap()
}

/// Rolls `r1..r6` = 15, 14, 13, 12, 11, 10.
pub fn standard_rolls() -> Vec<AbilityRoll> {
    [15, 14, 13, 12, 11, 10]
        .into_iter()
        .enumerate()
        .map(|(i, value)| AbilityRoll::new(format!("r{}", i + 1), value))
        .collect()
}

/// STR:r3, DEX:r2, CON:r4, INT:r1, WIS:r5, CHA:r6
pub fn standard_assignments() -> AbilityAssignments {
    [
        (Ability::Strength, "r3"),
        (Ability::Dexterity, "r2"),
        (Ability::Constitution, "r4"),
        (Ability::Intelligence, "r1"),
        (Ability::Wisdom, "r5"),
        (Ability::Charisma, "r6"),
    ]
    .into_iter()
    .map(|(ability, roll)| (ability, RollId::from(roll)))
    .collect()
}

pub async fn update(app: &App, character_id: CharacterId, update: DraftUpdate) {
    app.use_cases
        .character_creation
        .update_draft
        .execute(character_id, update)
        .await
        .unwrap();
}
