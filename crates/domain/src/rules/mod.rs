//! Character-building rules.
//!
//! Pure functions over domain types. Anything that gets skipped along the way
//! is reported in the return value; callers decide what to log.

pub mod armor_class;
pub mod attributes;
pub mod choices;
pub mod dice;
pub mod effects;
pub mod features;
pub mod hit_points;
pub mod proficiencies;
pub mod resources;

pub use armor_class::calculate_armor_class;
pub use attributes::{
    base_ability_score, derive_attributes, AttributeDerivation, SkippedAssignment,
};
pub use choices::resolve_choices;
pub use dice::roll_ability_scores;
pub use effects::{EffectError, EffectsReport, PassiveEffect, PassiveEffectRegistry};
pub use features::synthesize_features;
pub use hit_points::max_hit_points;
pub use proficiencies::{apply_selection, grant, has_proficiency, MergeOutcome};
pub use resources::class_resource_pools;
