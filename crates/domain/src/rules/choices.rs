//! Flattens rules-catalog choice trees into presentable choices.
//!
//! Choice ids are stable: `{source}-{key}-{kind}-{index}` where `index` is the
//! position in the catalog list, so an id keeps pointing at the same catalog
//! entry even when an earlier entry gets skipped.

use std::collections::HashSet;

use crate::entities::{ChoiceEntry, ChoiceSet, Class, OptionSet, ReferenceItem, Species};
use crate::value_objects::{
    BundleItem, Choice, ChoiceKind, ChoiceOption, NestedChoice, ResolvedChoices, SkippedChoice,
};

/// Resolve the proficiency and equipment choices for a species/class pair.
///
/// Never fails: malformed or unsupported entries land in `skipped` and the
/// rest still resolve.
pub fn resolve_choices(species: Option<&Species>, class: Option<&Class>) -> ResolvedChoices {
    let guaranteed: HashSet<&str> = species
        .map(|s| s.guaranteed_proficiency_keys().collect())
        .unwrap_or_default();

    let mut resolved = ResolvedChoices::default();

    if let Some(species) = species {
        if let Some(set) = &species.starting_proficiency_options {
            let id = choice_id("species", &species.key, ChoiceKind::Proficiency, 0);
            let choice = resolve_proficiency_choice(&id, set, &guaranteed, &mut resolved.skipped);
            push_or_skip(choice, id, &mut resolved.proficiency_choices, &mut resolved.skipped);
        }
    }

    if let Some(class) = class {
        for (index, set) in class.proficiency_choices.iter().enumerate() {
            let id = choice_id("class", &class.key, ChoiceKind::Proficiency, index);
            let choice = resolve_proficiency_choice(&id, set, &guaranteed, &mut resolved.skipped);
            push_or_skip(choice, id, &mut resolved.proficiency_choices, &mut resolved.skipped);
        }

        for (index, set) in class.starting_equipment_options.iter().enumerate() {
            let id = choice_id("class", &class.key, ChoiceKind::Equipment, index);
            let choice = resolve_equipment_choice(&id, set, &mut resolved.skipped);
            push_or_skip(choice, id, &mut resolved.equipment_choices, &mut resolved.skipped);
        }
    }

    resolved
}

fn choice_id(source: &str, key: &str, kind: ChoiceKind, index: usize) -> String {
    let kind = match kind {
        ChoiceKind::Proficiency => "proficiency",
        ChoiceKind::Equipment => "equipment",
    };
    format!("{}-{}-{}-{}", source, key, kind, index)
}

fn push_or_skip(
    result: Result<Choice, String>,
    id: String,
    choices: &mut Vec<Choice>,
    skipped: &mut Vec<SkippedChoice>,
) {
    match result {
        Ok(choice) => choices.push(choice),
        Err(reason) => skipped.push(SkippedChoice {
            choice_id: id,
            reason,
        }),
    }
}

fn skip_option(skipped: &mut Vec<SkippedChoice>, choice_id: &str, index: usize, reason: &str) {
    skipped.push(SkippedChoice {
        choice_id: format!("{}/option-{}", choice_id, index),
        reason: reason.to_string(),
    });
}

// =============================================================================
// Proficiency choices
// =============================================================================

fn resolve_proficiency_choice(
    id: &str,
    set: &ChoiceSet,
    guaranteed: &HashSet<&str>,
    skipped: &mut Vec<SkippedChoice>,
) -> Result<Choice, String> {
    if set.choose == 0 {
        return Err("choose count is zero".to_string());
    }

    let OptionSet::Options { options: entries } = &set.from else {
        return Err("proficiency choice is not an options list".to_string());
    };

    let mut options = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            ChoiceEntry::Reference { item } | ChoiceEntry::CountedReference { of: item, .. } => {
                options.push(ChoiceOption::leaf(&item.key, &item.name, 1));
            }
            // "choose one type of artisan's tools" style sub-lists are offered inline
            ChoiceEntry::Choice { choice } => match &choice.from {
                OptionSet::Options { options: inner } => {
                    options.extend(inner.iter().filter_map(|e| match e {
                        ChoiceEntry::Reference { item }
                        | ChoiceEntry::CountedReference { of: item, .. } => {
                            Some(ChoiceOption::leaf(&item.key, &item.name, 1))
                        }
                        _ => None,
                    }));
                }
                _ => skip_option(skipped, id, index, "unsupported nested proficiency choice"),
            },
            ChoiceEntry::Multiple { .. } => {
                skip_option(skipped, id, index, "bundled proficiency options are not supported")
            }
            ChoiceEntry::Unsupported => skip_option(skipped, id, index, "unsupported option type"),
        }
    }

    options.retain(|o| !guaranteed.contains(o.key.as_str()));
    dedupe_options(&mut options, id, skipped);

    if options.is_empty() {
        return Err("no selectable options".to_string());
    }

    Ok(Choice {
        id: id.to_string(),
        name: choice_name(set, "proficiencies"),
        kind: ChoiceKind::Proficiency,
        choose_count: set.choose.min(clamp_len(options.len())),
        options,
    })
}

// =============================================================================
// Equipment choices
// =============================================================================

fn resolve_equipment_choice(
    id: &str,
    set: &ChoiceSet,
    skipped: &mut Vec<SkippedChoice>,
) -> Result<Choice, String> {
    if set.choose == 0 {
        return Err("choose count is zero".to_string());
    }

    let (choose_count, mut options) = match &set.from {
        OptionSet::Options { options: entries } => {
            let mut options = Vec::new();
            for (index, entry) in entries.iter().enumerate() {
                match equipment_options(entry) {
                    Ok(mut resolved) => options.append(&mut resolved),
                    Err(reason) => skip_option(skipped, id, index, &reason),
                }
            }
            (set.choose, options)
        }
        // The whole choice is a category: one nested option, picked once
        OptionSet::EquipmentCategory { equipment_category } => (
            1,
            vec![nested_option(&set.desc, set.choose, equipment_category)],
        ),
        OptionSet::Unsupported => return Err("unsupported option set".to_string()),
    };

    dedupe_options(&mut options, id, skipped);

    if options.is_empty() {
        return Err("no selectable options".to_string());
    }

    Ok(Choice {
        id: id.to_string(),
        name: choice_name(set, "equipment"),
        kind: ChoiceKind::Equipment,
        choose_count: choose_count.min(clamp_len(options.len())),
        options,
    })
}

/// Options produced by a single catalog entry.
fn equipment_options(entry: &ChoiceEntry) -> Result<Vec<ChoiceOption>, String> {
    match entry {
        ChoiceEntry::Reference { item } => Ok(vec![counted_leaf(item, 1)?]),
        ChoiceEntry::CountedReference { count, of } => Ok(vec![counted_leaf(of, *count)?]),
        ChoiceEntry::Choice { choice } => match &choice.from {
            OptionSet::EquipmentCategory { equipment_category } => Ok(vec![nested_option(
                &choice.desc,
                choice.choose,
                equipment_category,
            )]),
            // "(a) a shortbow or (b) a light crossbow" nested one level down
            OptionSet::Options { options } => {
                let mut flattened = Vec::new();
                for inner in options {
                    match inner {
                        ChoiceEntry::Reference { item } => flattened.push(counted_leaf(item, 1)?),
                        ChoiceEntry::CountedReference { count, of } => {
                            flattened.push(counted_leaf(of, *count)?)
                        }
                        _ => return Err("nested choice too deep".to_string()),
                    }
                }
                Ok(flattened)
            }
            OptionSet::Unsupported => Err("unsupported nested option set".to_string()),
        },
        ChoiceEntry::Multiple { items } => Ok(vec![bundle_option(items)?]),
        ChoiceEntry::Unsupported => Err("unsupported option type".to_string()),
    }
}

fn counted_leaf(item: &ReferenceItem, count: u32) -> Result<ChoiceOption, String> {
    if count == 0 {
        return Err(format!("'{}' has a zero count", item.key));
    }
    if item.key.trim().is_empty() {
        return Err("reference without a key".to_string());
    }
    let name = if count > 1 {
        format!("{} x{}", item.name, count)
    } else {
        item.name.clone()
    };
    Ok(ChoiceOption::leaf(&item.key, name, count))
}

fn nested_option(desc: &str, choose: u8, category: &ReferenceItem) -> ChoiceOption {
    let name = if desc.trim().is_empty() {
        category.name.clone()
    } else {
        desc.to_string()
    };
    let choose = choose.max(1);
    ChoiceOption {
        key: category.key.clone(),
        name,
        description: format!("Pick {} from {}", choose, category.name),
        quantity: 1,
        bundle_items: Vec::new(),
        nested: Some(NestedChoice {
            category_key: category.key.clone(),
            category_name: category.name.clone(),
            choose,
        }),
    }
}

/// A "this and that" entry. The primary item is the nested category if there
/// is one, otherwise the first item; everything else is granted alongside.
fn bundle_option(items: &[ChoiceEntry]) -> Result<ChoiceOption, String> {
    if items.is_empty() {
        return Err("empty bundle".to_string());
    }

    let nested_positions: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, e)| matches!(e, ChoiceEntry::Choice { .. }))
        .map(|(i, _)| i)
        .collect();
    if nested_positions.len() > 1 {
        return Err("bundle with more than one nested choice".to_string());
    }
    let primary_index = nested_positions.first().copied().unwrap_or(0);

    let mut primary = match &items[primary_index] {
        ChoiceEntry::Choice { choice } => match &choice.from {
            OptionSet::EquipmentCategory { equipment_category } => {
                nested_option(&choice.desc, choice.choose, equipment_category)
            }
            _ => return Err("bundle nests a non-category choice".to_string()),
        },
        ChoiceEntry::Reference { item } => counted_leaf(item, 1)?,
        ChoiceEntry::CountedReference { count, of } => counted_leaf(of, *count)?,
        _ => return Err("unsupported bundle item".to_string()),
    };

    let mut keys = vec![primary.key.clone()];
    let mut names = vec![primary.name.clone()];
    for (index, entry) in items.iter().enumerate() {
        if index == primary_index {
            continue;
        }
        let (item, quantity) = match entry {
            ChoiceEntry::Reference { item } => (item, 1),
            ChoiceEntry::CountedReference { count, of } => (of, *count),
            _ => return Err("unsupported bundle item".to_string()),
        };
        if quantity == 0 {
            return Err(format!("'{}' has a zero count", item.key));
        }
        keys.push(item.key.clone());
        names.push(counted_leaf(item, quantity)?.name);
        primary.bundle_items.push(BundleItem {
            key: item.key.clone(),
            quantity,
        });
    }

    if !primary.bundle_items.is_empty() {
        let extras: Vec<&str> = names[1..].iter().map(String::as_str).collect();
        primary.description = if primary.description.is_empty() {
            format!("Includes {}", extras.join(", "))
        } else {
            format!("{}; includes {}", primary.description, extras.join(", "))
        };
    }
    primary.key = keys.join("+");
    primary.name = names.join(" and ");
    Ok(primary)
}

// =============================================================================
// Helpers
// =============================================================================

fn dedupe_options(options: &mut Vec<ChoiceOption>, id: &str, skipped: &mut Vec<SkippedChoice>) {
    let mut seen = HashSet::new();
    options.retain(|o| {
        if seen.insert(o.key.clone()) {
            true
        } else {
            skipped.push(SkippedChoice {
                choice_id: id.to_string(),
                reason: format!("duplicate option '{}'", o.key),
            });
            false
        }
    });
}

fn choice_name(set: &ChoiceSet, noun: &str) -> String {
    if set.desc.trim().is_empty() {
        format!("Choose {} {}", set.choose, noun)
    } else {
        set.desc.clone()
    }
}

fn clamp_len(len: usize) -> u8 {
    u8::try_from(len).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn martial_and_shield_class() -> Class {
        serde_json::from_str(
            r#"{
                "index": "fighter",
                "name": "Fighter",
                "hit_die": 10,
                "proficiency_choices": [{
                    "desc": "Choose two skills",
                    "choose": 2,
                    "from": {"option_set_type": "options_array", "options": [
                        {"option_type": "reference", "item": {"index": "skill-acrobatics", "name": "Skill: Acrobatics"}},
                        {"option_type": "reference", "item": {"index": "skill-athletics", "name": "Skill: Athletics"}},
                        {"option_type": "reference", "item": {"index": "skill-perception", "name": "Skill: Perception"}}
                    ]}
                }],
                "starting_equipment_options": [
                    {"desc": "(a) chain mail or (b) leather armor, longbow, and 20 arrows", "choose": 1,
                     "from": {"option_set_type": "options_array", "options": [
                        {"option_type": "counted_reference", "count": 1, "of": {"index": "chain-mail", "name": "Chain Mail"}},
                        {"option_type": "multiple", "items": [
                            {"option_type": "counted_reference", "count": 1, "of": {"index": "leather-armor", "name": "Leather Armor"}},
                            {"option_type": "counted_reference", "count": 1, "of": {"index": "longbow", "name": "Longbow"}},
                            {"option_type": "counted_reference", "count": 20, "of": {"index": "arrow", "name": "Arrow"}}
                        ]}
                     ]}},
                    {"desc": "(a) a martial weapon and a shield or (b) two martial weapons", "choose": 1,
                     "from": {"option_set_type": "options_array", "options": [
                        {"option_type": "multiple", "items": [
                            {"option_type": "choice", "choice": {"desc": "a martial weapon", "choose": 1,
                                "from": {"option_set_type": "equipment_category",
                                         "equipment_category": {"index": "martial-weapons", "name": "Martial Weapons"}}}},
                            {"option_type": "counted_reference", "count": 1, "of": {"index": "shield", "name": "Shield"}}
                        ]},
                        {"option_type": "choice", "choice": {"desc": "two martial weapons", "choose": 2,
                            "from": {"option_set_type": "equipment_category",
                                     "equipment_category": {"index": "martial-weapons", "name": "Martial Weapons"}}}}
                     ]}},
                    {"desc": "broken", "choose": 0,
                     "from": {"option_set_type": "options_array", "options": []}}
                ]
            }"#,
        )
        .unwrap()
    }

    fn elf() -> Species {
        serde_json::from_str(
            r#"{"index": "elf", "name": "Elf",
                "starting_proficiencies": [{"index": "skill-perception", "name": "Skill: Perception"}]}"#,
        )
        .unwrap()
    }

    #[test]
    fn bundle_records_auxiliary_items() {
        let class = martial_and_shield_class();
        let resolved = resolve_choices(None, Some(&class));

        let weapons = resolved.find("class-fighter-equipment-1").unwrap();
        let bundle = &weapons.options[0];

        assert_eq!(bundle.key, "martial-weapons+shield");
        assert_eq!(bundle.bundle_item_keys(), vec!["shield"]);
        let nested = bundle.nested.as_ref().unwrap();
        assert_eq!(nested.category_key, "martial-weapons");
        assert_eq!(nested.choose, 1);
        assert_eq!(bundle.primary_item_key(), None);
    }

    #[test]
    fn category_option_is_marked_nested() {
        let class = martial_and_shield_class();
        let resolved = resolve_choices(None, Some(&class));

        let weapons = resolved.find("class-fighter-equipment-1").unwrap();
        let two_weapons = weapons.option("martial-weapons").unwrap();

        assert!(two_weapons.is_nested());
        assert_eq!(two_weapons.nested.as_ref().unwrap().choose, 2);
        assert!(two_weapons.bundle_items.is_empty());
    }

    #[test]
    fn concrete_bundle_keeps_quantities() {
        let class = martial_and_shield_class();
        let resolved = resolve_choices(None, Some(&class));

        let armor = resolved.find("class-fighter-equipment-0").unwrap();
        assert_eq!(armor.options[0].key, "chain-mail");
        assert!(!armor.options[0].is_nested());

        let kit = &armor.options[1];
        assert_eq!(kit.key, "leather-armor+longbow+arrow");
        assert_eq!(kit.bundle_item_keys(), vec!["longbow", "arrow"]);
        assert_eq!(kit.bundle_items[1].quantity, 20);
        assert_eq!(kit.primary_item_key(), Some("leather-armor"));
    }

    #[test]
    fn species_proficiencies_are_filtered_from_options() {
        let class = martial_and_shield_class();
        let species = elf();

        let resolved = resolve_choices(Some(&species), Some(&class));

        let skills = resolved.find("class-fighter-proficiency-0").unwrap();
        let keys: Vec<&str> = skills.options.iter().map(|o| o.key.as_str()).collect();
        assert_eq!(keys, vec!["skill-acrobatics", "skill-athletics"]);
        assert_eq!(skills.choose_count, 2);
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let class = martial_and_shield_class();
        let resolved = resolve_choices(None, Some(&class));

        assert_eq!(resolved.equipment_choices.len(), 2);
        assert_eq!(resolved.skipped.len(), 1);
        assert_eq!(resolved.skipped[0].choice_id, "class-fighter-equipment-2");
    }

    #[test]
    fn unsupported_option_types_are_skipped() {
        let set: ChoiceSet = serde_json::from_str(
            r#"{"choose": 1, "from": {"option_set_type": "options_array", "options": [
                {"option_type": "string", "string": "a trinket"},
                {"option_type": "reference", "item": {"index": "dagger", "name": "Dagger"}}
            ]}}"#,
        )
        .unwrap();
        let mut skipped = Vec::new();

        let choice = resolve_equipment_choice("x", &set, &mut skipped).unwrap();

        assert_eq!(choice.options.len(), 1);
        assert_eq!(skipped[0].choice_id, "x/option-0");
    }

    #[test]
    fn empty_inputs_resolve_to_nothing() {
        let resolved = resolve_choices(None, None);
        assert_eq!(resolved, ResolvedChoices::default());
    }
}
