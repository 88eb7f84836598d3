//! Proficiency merging.
//!
//! Skills come from a single "choose N" picker the user may revisit, so a
//! selection that contains skills replaces the skill set. Every other category
//! accumulates from several sources and is only ever added to.

use std::collections::HashSet;

use crate::value_objects::{Proficiencies, Proficiency, ProficiencyCategory};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Proficiencies that were not present before
    pub added: Vec<Proficiency>,
    /// Skills dropped because the selection replaced them
    pub replaced_skills: Vec<Proficiency>,
}

/// Apply a user selection.
///
/// When `selected` contains at least one skill, the existing skills are
/// replaced by exactly the selected ones. Non-skill entries are added with
/// de-duplication by key; categories absent from the selection are untouched.
pub fn apply_selection(existing: &mut Proficiencies, selected: Vec<Proficiency>) -> MergeOutcome {
    let (skills, others): (Vec<_>, Vec<_>) = selected
        .into_iter()
        .partition(|p| p.category == ProficiencyCategory::Skill);

    let mut outcome = MergeOutcome::default();

    if !skills.is_empty() {
        let previous = existing
            .insert(ProficiencyCategory::Skill, Vec::new())
            .unwrap_or_default();
        let previous_keys: HashSet<&str> = previous.iter().map(|p| p.key.as_str()).collect();

        let mut seen = HashSet::new();
        let mut replacement = Vec::new();
        for skill in skills {
            if !seen.insert(skill.key.clone()) {
                continue;
            }
            if !previous_keys.contains(skill.key.as_str()) {
                outcome.added.push(skill.clone());
            }
            replacement.push(skill);
        }

        outcome.replaced_skills = previous
            .iter()
            .filter(|p| !seen.contains(&p.key))
            .cloned()
            .collect();
        existing.insert(ProficiencyCategory::Skill, replacement);
    }

    outcome.added.extend(grant(existing, others));
    outcome
}

/// Add proficiencies from any source, skipping keys already present.
///
/// Returns the ones actually added.
pub fn grant(
    existing: &mut Proficiencies,
    proficiencies: impl IntoIterator<Item = Proficiency>,
) -> Vec<Proficiency> {
    let mut added = Vec::new();
    for proficiency in proficiencies {
        if has_proficiency(existing, &proficiency.key) {
            continue;
        }
        existing
            .entry(proficiency.category)
            .or_default()
            .push(proficiency.clone());
        added.push(proficiency);
    }
    added
}

/// True if any category holds `key`.
pub fn has_proficiency(existing: &Proficiencies, key: &str) -> bool {
    existing.values().flatten().any(|p| p.key == key)
}
