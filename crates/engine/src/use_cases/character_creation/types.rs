//! Inputs and results of the character creation use cases.

use charforge_domain::rules::SkippedAssignment;
use charforge_domain::{
    Ability, AbilityAssignments, AbilityRoll, Character, CharacterDraft, EquipmentSlot,
    FeatureChoiceKind, Proficiency, ResourceKind,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Inputs
// =============================================================================

/// One answer to an equipment choice.
///
/// `selected_keys` is only used for nested options, where it holds the
/// concrete items picked from the option's category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentPick {
    pub choice_id: String,
    pub option_key: String,
    #[serde(default)]
    pub selected_keys: Vec<String>,
}

impl EquipmentPick {
    pub fn new(choice_id: impl Into<String>, option_key: impl Into<String>) -> Self {
        Self {
            choice_id: choice_id.into(),
            option_key: option_key.into(),
            selected_keys: Vec::new(),
        }
    }

    pub fn with_selected(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.selected_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// A partial update to a draft. Absent fields are left alone; present fields
/// replace what the draft had.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub species_key: Option<String>,
    #[serde(default)]
    pub class_key: Option<String>,
    #[serde(default)]
    pub ability_rolls: Option<Vec<AbilityRoll>>,
    #[serde(default)]
    pub ability_assignments: Option<AbilityAssignments>,
    #[serde(default)]
    pub proficiency_keys: Option<Vec<String>>,
    #[serde(default)]
    pub equipment_picks: Option<Vec<EquipmentPick>>,
}

impl DraftUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

// =============================================================================
// Results
// =============================================================================

/// A draft character together with its flow wrapper.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftView {
    pub character: Character,
    pub draft: CharacterDraft,
    /// True when this call created the draft
    pub created: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkips {
    pub assignments: Vec<SkippedAssignment>,
    pub proficiency_keys: Vec<String>,
    pub equipment_keys: Vec<String>,
}

impl UpdateSkips {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
            && self.proficiency_keys.is_empty()
            && self.equipment_keys.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDraftResult {
    pub character: Character,
    pub draft: CharacterDraft,
    /// Skills dropped by a replacing skill selection
    pub replaced_skills: Vec<Proficiency>,
    /// Recoverable per-item failures
    pub skipped: UpdateSkips,
}

/// What finalization did beyond flipping the status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizationReport {
    /// Attributes were empty despite assignments and had to be re-derived
    pub self_healed: bool,
    /// Abilities that had no score and got the base score
    pub filled_abilities: Vec<Ability>,
    pub granted_features: Vec<String>,
    pub applied_effects: Vec<String>,
    pub effect_errors: Vec<String>,
    pub granted_proficiencies: Vec<String>,
    pub skipped_proficiencies: Vec<String>,
    pub granted_equipment: Vec<String>,
    pub skipped_equipment: Vec<String>,
    pub equipped: Vec<(EquipmentSlot, String)>,
    pub initialized_resources: Vec<ResourceKind>,
    /// The character was committed but its draft wrapper could not be removed
    pub draft_delete_failed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResult {
    pub character: Character,
    pub report: FinalizationReport,
}

/// A feature still waiting for the user's sub-choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingFeatureChoice {
    pub feature_key: String,
    pub feature_name: String,
    pub kind: FeatureChoiceKind,
    pub options: Vec<String>,
}
