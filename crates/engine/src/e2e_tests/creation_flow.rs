//! Full creation flows through the wired use cases.

use charforge_domain::rules::{calculate_armor_class, has_proficiency};
use charforge_domain::{
    Ability, CharacterId, CharacterStatus, CreationStep, EquipmentCategory, EquipmentInfo,
    EquipmentSlot, ProficiencyCategory,
};

use super::*;
use crate::app::App;
use crate::infrastructure::ports::CreationSessionPort;
use crate::use_cases::character_creation::{CharacterCreationError, DraftUpdate, EquipmentPick};

#[tokio::test]
async fn get_or_create_is_stable_until_finalized() {
    let app = test_app();

    let first = new_draft(&app).await;
    let second = new_draft(&app).await;

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.character.id(), second.character.id());
    assert_eq!(first.draft.id(), second.draft.id());
    assert!(app.sessions.get(first.character.id()).await.is_some());
}

/// High-elf fighter in chain mail with a longsword and shield, ready to finalize.
async fn armored_fighter_draft(app: &App) -> CharacterId {
    let id = new_draft(app).await.character.id();

    update(
        app,
        id,
        DraftUpdate {
            species_key: Some("high-elf".into()),
            class_key: Some("fighter".into()),
            ability_rolls: Some(standard_rolls()),
            ability_assignments: Some(standard_assignments()),
            ..Default::default()
        },
    )
    .await;
    update(
        app,
        id,
        DraftUpdate {
            proficiency_keys: Some(vec!["skill-athletics".into(), "skill-survival".into()]),
            equipment_picks: Some(vec![
                EquipmentPick::new("class-fighter-equipment-0", "chain-mail"),
                EquipmentPick::new("class-fighter-equipment-1", "martial-weapons+shield")
                    .with_selected(["longsword"]),
                EquipmentPick::new(
                    "class-fighter-equipment-2",
                    "light-crossbow+crossbow-bolt",
                ),
            ]),
            name: Some("Aelar".into()),
            ..Default::default()
        },
    )
    .await;
    id
}

#[tokio::test]
async fn high_elf_fighter_from_draft_to_active() {
    let app = test_app();
    let id = armored_fighter_draft(&app).await;

    let draft = app
        .repositories
        .draft
        .get_by_character_id(id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(draft.flow().current_step, CreationStep::Review);

    let result = app
        .use_cases
        .character_creation
        .finalize
        .execute(id)
        .await
        .unwrap();
    let c = &result.character;

    let expected = [
        (Ability::Strength, 13, 1),
        (Ability::Dexterity, 16, 3),
        (Ability::Constitution, 12, 1),
        (Ability::Intelligence, 16, 3),
        (Ability::Wisdom, 11, 0),
        (Ability::Charisma, 10, 0),
    ];
    for (ability, score, modifier) in expected {
        let attr = &c.attributes()[&ability];
        assert_eq!((attr.score, attr.modifier), (score, modifier), "{}", ability);
    }
    assert_eq!(c.status(), CharacterStatus::Active);
    assert_eq!(c.max_hit_points(), 11);
    assert_eq!(c.name().map(|n| n.as_str()), Some("Aelar"));

    // Bundle: the weapon and the shield both land in inventory
    assert!(c.has_item("longsword"));
    let armor = c.inventory_in(EquipmentCategory::Armor);
    assert!(armor.iter().any(|i| i.equipment.key() == "shield"));
    assert!(c.has_item("explorers-pack"));

    // Chain mail 16 plus shield 2
    assert_eq!(c.equipped()[&EquipmentSlot::Body].key(), "chain-mail");
    assert_eq!(c.equipped()[&EquipmentSlot::OffHand].key(), "shield");
    assert_eq!(c.armor_class(), 18);

    assert!(has_proficiency(c.proficiencies(), "all-armor"));
    assert!(has_proficiency(c.proficiencies(), "longswords"));
    assert!(c.has_feature("second-wind"));
    assert!(!c.resources().is_empty());
    assert!(!result.report.self_healed);

    // The draft wrapper and session are gone; the character stays
    assert!(app
        .repositories
        .draft
        .get_by_character_id(id)
        .await
        .unwrap()
        .is_none());
    assert!(app.sessions.get(id).await.is_none());
    let stored = app.repositories.character.get(id).await.unwrap().unwrap();
    assert_eq!(stored.status(), CharacterStatus::Active);
}

#[tokio::test]
async fn refinalizing_fails_and_changes_nothing() {
    let app = test_app();
    let id = new_draft(&app).await.character.id();
    update(
        &app,
        id,
        DraftUpdate {
            class_key: Some("wizard".into()),
            ..Default::default()
        },
    )
    .await;
    let finalize = &app.use_cases.character_creation.finalize;
    let first = finalize.execute(id).await.unwrap().character;

    let err = finalize.execute(id).await.unwrap_err();

    assert!(matches!(err, CharacterCreationError::InvalidState { .. }));
    let stored = app.repositories.character.get(id).await.unwrap().unwrap();
    assert_eq!(stored.updated_at(), first.updated_at());
    assert_eq!(stored.features(), first.features());
}

#[tokio::test]
async fn second_skill_selection_replaces_the_first() {
    let app = test_app();
    let id = new_draft(&app).await.character.id();

    update(
        &app,
        id,
        DraftUpdate {
            proficiency_keys: Some(vec![
                "smiths-tools".into(),
                "light-armor".into(),
                "skill-athletics".into(),
                "skill-history".into(),
            ]),
            ..Default::default()
        },
    )
    .await;
    update(
        &app,
        id,
        DraftUpdate {
            proficiency_keys: Some(vec!["skill-perception".into()]),
            ..Default::default()
        },
    )
    .await;

    let c = app.repositories.character.get(id).await.unwrap().unwrap();
    let skills = &c.proficiencies()[&ProficiencyCategory::Skill];
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0].key, "skill-perception");
    assert!(has_proficiency(c.proficiencies(), "smiths-tools"));
    assert!(has_proficiency(c.proficiencies(), "light-armor"));
}

#[tokio::test]
async fn updates_after_finalize_are_rejected() {
    let app = test_app();
    let id = new_draft(&app).await.character.id();
    app.use_cases
        .character_creation
        .finalize
        .execute(id)
        .await
        .unwrap();

    let err = app
        .use_cases
        .character_creation
        .update_draft
        .execute(
            id,
            DraftUpdate {
                name: Some("Too Late".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CharacterCreationError::InvalidState { .. }));
}

#[tokio::test]
async fn finalizing_opens_the_way_for_a_new_draft() {
    let app = test_app();
    let first = new_draft(&app).await.character.id();
    app.use_cases
        .character_creation
        .finalize
        .execute(first)
        .await
        .unwrap();

    let next = new_draft(&app).await;

    assert!(next.created);
    assert_ne!(next.character.id(), first);
}

#[tokio::test]
async fn starting_over_discards_the_old_draft() {
    let app = test_app();
    let old = new_draft(&app).await.character.id();

    let fresh = app
        .use_cases
        .character_creation
        .start_new_draft
        .execute(OWNER, REALM)
        .await
        .unwrap();

    assert_ne!(fresh.character.id(), old);
    assert!(app.repositories.character.get(old).await.unwrap().is_none());
    assert!(app.sessions.get(old).await.is_none());
}

#[tokio::test]
async fn cancelling_removes_everything() {
    let app = test_app();
    let id = new_draft(&app).await.character.id();

    app.use_cases
        .character_creation
        .cancel_draft
        .execute(id)
        .await
        .unwrap();

    assert!(app.repositories.character.get(id).await.unwrap().is_none());
    assert!(app
        .repositories
        .draft
        .get_by_character_id(id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn rolled_scores_feed_assignments() {
    let app = test_app();
    let id = new_draft(&app).await.character.id();

    let rolled = app
        .use_cases
        .character_creation
        .roll_ability_scores
        .execute(id)
        .await
        .unwrap();
    // Dice cycle 3, 4, 5, 6: every roll keeps 4 + 5 + 6
    assert!(rolled.ability_rolls().iter().all(|r| r.value == 15));

    update(
        &app,
        id,
        DraftUpdate {
            ability_assignments: Some(standard_assignments()),
            ..Default::default()
        },
    )
    .await;

    let c = app.repositories.character.get(id).await.unwrap().unwrap();
    assert_eq!(c.attributes().len(), 6);
    assert!(c.attributes().values().all(|a| a.score == 15));
}

#[tokio::test]
async fn fighting_style_choice_flow() {
    let app = test_app();
    let id = new_draft(&app).await.character.id();
    update(
        &app,
        id,
        DraftUpdate {
            class_key: Some("fighter".into()),
            ..Default::default()
        },
    )
    .await;
    let uc = &app.use_cases.character_creation;
    uc.finalize.execute(id).await.unwrap();

    let pending = uc.pending_feature_choices.execute(id).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].feature_key, "fighting-style");

    uc.record_feature_choice
        .execute(id, "fighting-style", "defense")
        .await
        .unwrap();

    assert!(uc.pending_feature_choices.execute(id).await.unwrap().is_empty());
}

#[tokio::test]
async fn defense_style_after_finalize_raises_stored_armor_class() {
    let app = test_app();
    let id = armored_fighter_draft(&app).await;
    let uc = &app.use_cases.character_creation;
    let finalized = uc.finalize.execute(id).await.unwrap().character;
    assert_eq!(finalized.armor_class(), 18);

    let returned = uc
        .record_feature_choice
        .execute(id, "fighting-style", "defense")
        .await
        .unwrap();

    let stored = app.repositories.character.get(id).await.unwrap().unwrap();
    assert_eq!(returned.armor_class(), 19);
    assert_eq!(stored.armor_class(), 19);
    assert_eq!(stored.armor_class(), calculate_armor_class(&stored));
}
