//! Species rule definition.

use serde::{Deserialize, Serialize};

use super::catalog_choice::{ChoiceSet, ReferenceItem};
use crate::value_objects::{Ability, AbilityBonus, Feature, FeatureCategory};

/// A trait every member of the species has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTrait {
    #[serde(alias = "index")]
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    #[serde(alias = "index")]
    pub key: String,
    pub name: String,
    #[serde(default = "default_speed")]
    pub speed: u32,
    #[serde(default)]
    pub ability_bonuses: Vec<AbilityBonus>,
    /// Proficiencies every member of the species has
    #[serde(default)]
    pub starting_proficiencies: Vec<ReferenceItem>,
    #[serde(default)]
    pub starting_proficiency_options: Option<ChoiceSet>,
    #[serde(default)]
    pub traits: Vec<SpeciesTrait>,
}

fn default_speed() -> u32 {
    30
}

impl Species {
    /// Sum of racial bonuses that target `ability`.
    pub fn bonus_for(&self, ability: Ability) -> i32 {
        self.ability_bonuses
            .iter()
            .filter(|b| b.ability == ability)
            .map(|b| b.bonus)
            .sum()
    }

    /// Keys of the proficiencies the species guarantees.
    pub fn guaranteed_proficiency_keys(&self) -> impl Iterator<Item = &str> {
        self.starting_proficiencies.iter().map(|p| p.key.as_str())
    }

    /// Species traits as feature templates.
    pub fn trait_features(&self) -> Vec<Feature> {
        self.traits
            .iter()
            .map(|t| {
                Feature::new(&t.key, &t.name, FeatureCategory::Species, 1, &self.key)
                    .with_description(&t.description)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bonuses_sum_per_ability() {
        let species = Species {
            key: "half-elf".into(),
            name: "Half-Elf".into(),
            speed: 30,
            ability_bonuses: vec![
                AbilityBonus::new(Ability::Charisma, 2),
                AbilityBonus::new(Ability::Dexterity, 1),
                AbilityBonus::new(Ability::Dexterity, 1),
            ],
            starting_proficiencies: vec![],
            starting_proficiency_options: None,
            traits: vec![],
        };

        assert_eq!(species.bonus_for(Ability::Charisma), 2);
        assert_eq!(species.bonus_for(Ability::Dexterity), 2);
        assert_eq!(species.bonus_for(Ability::Strength), 0);
    }

    #[test]
    fn traits_become_species_features() {
        let species: Species = serde_json::from_str(
            r#"{"index": "elf", "name": "Elf",
                "traits": [{"index": "keen-senses", "name": "Keen Senses"}]}"#,
        )
        .unwrap();

        let features = species.trait_features();

        assert_eq!(species.speed, 30);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].key, "keen-senses");
        assert_eq!(features[0].category, FeatureCategory::Species);
        assert_eq!(features[0].source, "elf");
        assert!(features[0].metadata().is_empty());
    }
}
