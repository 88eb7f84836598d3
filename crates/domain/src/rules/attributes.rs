//! Ability score derivation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entities::Species;
use crate::ids::RollId;
use crate::value_objects::{Ability, AbilityAssignments, AbilityRoll, AbilityScore, Attributes};

/// Score an ability gets when nothing was assigned to it.
pub const BASE_ABILITY_SCORE: i32 = 10;

/// An assignment that pointed at a roll that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAssignment {
    pub ability: Ability,
    pub roll_id: RollId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeDerivation {
    pub attributes: Attributes,
    pub skipped: Vec<SkippedAssignment>,
}

/// Derive finished ability scores from rolls and the user's assignment.
///
/// Always builds a fresh map, so running it twice with the same inputs gives
/// the same result. Assignments naming an unknown roll are skipped and
/// reported, never fatal.
pub fn derive_attributes(
    rolls: &[AbilityRoll],
    assignments: &AbilityAssignments,
    species: Option<&Species>,
) -> AttributeDerivation {
    let values: HashMap<&RollId, i32> = rolls.iter().map(|r| (&r.id, r.value)).collect();

    let mut derivation = AttributeDerivation::default();
    for (ability, roll_id) in assignments {
        let Some(rolled) = values.get(roll_id) else {
            derivation.skipped.push(SkippedAssignment {
                ability: *ability,
                roll_id: roll_id.clone(),
            });
            continue;
        };

        let bonus = species.map(|s| s.bonus_for(*ability)).unwrap_or(0);
        derivation
            .attributes
            .insert(*ability, AbilityScore::new(rolled + bonus));
    }

    derivation
}

/// Score for an ability nobody assigned a roll to: the base plus racial bonus.
pub fn base_ability_score(ability: Ability, species: Option<&Species>) -> AbilityScore {
    let bonus = species.map(|s| s.bonus_for(ability)).unwrap_or(0);
    AbilityScore::new(BASE_ABILITY_SCORE + bonus)
}
