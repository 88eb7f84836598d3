//! Finalization re-derives attributes when assignments exist but attributes
//! are empty. No sequence of valid draft updates should ever leave a
//! character in that state.

use proptest::prelude::*;

use charforge_domain::{Ability, AbilityRoll, CharacterStatus, RollId};

use super::*;
use crate::use_cases::character_creation::DraftUpdate;

const SPECIES: &[&str] = &["elf", "high-elf", "dwarf", "human"];
const CLASSES: &[&str] = &["fighter", "barbarian", "wizard", "cleric", "monk"];
const SKILLS: &[&str] = &[
    "skill-athletics",
    "skill-history",
    "skill-perception",
    "skill-stealth",
    "smiths-tools",
    "light-armor",
];

#[derive(Debug, Clone)]
enum Step {
    Species(usize),
    Class(usize),
    Roll(Vec<i32>),
    /// Abilities in shuffled order; the first `n` get rolls `r1..rn`
    Assign(Vec<Ability>, usize),
    Proficiencies(Vec<usize>),
    Name(String),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..SPECIES.len()).prop_map(Step::Species),
        (0..CLASSES.len()).prop_map(Step::Class),
        prop::collection::vec(3..=18i32, 6).prop_map(Step::Roll),
        (Just(Ability::ALL.to_vec()).prop_shuffle(), 1..=6usize)
            .prop_map(|(abilities, n)| Step::Assign(abilities, n)),
        prop::collection::vec(0..SKILLS.len(), 0..4).prop_map(Step::Proficiencies),
        "[A-Z][a-z]{2,10}".prop_map(Step::Name),
    ]
}

fn to_update(step: &Step) -> DraftUpdate {
    match step {
        Step::Species(i) => DraftUpdate {
            species_key: Some(SPECIES[*i].to_string()),
            ..Default::default()
        },
        Step::Class(i) => DraftUpdate {
            class_key: Some(CLASSES[*i].to_string()),
            ..Default::default()
        },
        Step::Roll(values) => DraftUpdate {
            ability_rolls: Some(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| AbilityRoll::new(format!("r{}", i + 1), *v))
                    .collect(),
            ),
            ..Default::default()
        },
        Step::Assign(abilities, n) => DraftUpdate {
            ability_assignments: Some(
                abilities
                    .iter()
                    .take(*n)
                    .enumerate()
                    .map(|(i, a)| (*a, RollId::new(format!("r{}", i + 1))))
                    .collect(),
            ),
            ..Default::default()
        },
        Step::Proficiencies(indices) => DraftUpdate {
            proficiency_keys: Some(indices.iter().map(|i| SKILLS[*i].to_string()).collect()),
            ..Default::default()
        },
        Step::Name(name) => DraftUpdate {
            name: Some(name.clone()),
            ..Default::default()
        },
    }
}

#[tokio::test]
async fn assigning_before_rolling_needs_no_heal() {
    let app = test_app();
    let id = new_draft(&app).await.character.id();
    let uc = &app.use_cases.character_creation;

    let result = uc
        .update_draft
        .execute(
            id,
            DraftUpdate {
                ability_assignments: Some(standard_assignments()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(result.skipped.assignments.len(), 6);
    assert!(!result.character.needs_attribute_heal());
    let finalized = uc.finalize.execute(id).await.unwrap();
    assert!(!finalized.report.self_healed);
    assert_eq!(finalized.character.attributes().len(), 6);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn valid_updates_never_need_self_heal(steps in prop::collection::vec(step(), 1..12)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        runtime.block_on(async {
            let app = test_app();
            let id = new_draft(&app).await.character.id();
            let uc = &app.use_cases.character_creation;

            for step in &steps {
                let result = uc.update_draft.execute(id, to_update(step)).await.unwrap();
                prop_assert!(
                    !result.character.needs_attribute_heal(),
                    "needs heal after {:?}",
                    step
                );
            }

            let finalized = uc.finalize.execute(id).await.unwrap();
            prop_assert!(!finalized.report.self_healed);
            prop_assert_eq!(finalized.character.status(), CharacterStatus::Active);
            prop_assert_eq!(finalized.character.attributes().len(), 6);
            Ok(())
        })?;
    }
}
