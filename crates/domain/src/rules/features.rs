//! Feature synthesis from species and class templates.

use std::collections::HashSet;

use crate::value_objects::Feature;

/// Append every template feature the character is missing.
///
/// Existing features are matched by key and left exactly as they are, so
/// metadata recorded on them (a chosen fighting style, a domain) survives.
/// Templates above `level` are ignored. Returns the keys that were added,
/// in order.
pub fn synthesize_features(
    existing: &mut Vec<Feature>,
    templates: impl IntoIterator<Item = Feature>,
    level: u8,
) -> Vec<String> {
    let mut present: HashSet<String> = existing.iter().map(|f| f.key.clone()).collect();

    let mut added = Vec::new();
    for template in templates {
        if template.level > level || present.contains(&template.key) {
            continue;
        }
        present.insert(template.key.clone());
        added.push(template.key.clone());
        existing.push(template);
    }
    added
}
