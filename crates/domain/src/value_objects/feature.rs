//! Feature value objects - species traits and class features a character holds.
//!
//! Features carry a small metadata bag for user sub-choices (fighting style,
//! divine domain, ...). The bag stays loosely typed for storage, but all reads
//! and writes go through [`FeatureChoiceKind`] so metadata keys live in one place.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::DomainError;

/// Where a feature comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureCategory {
    Species,
    Class,
}

/// Kinds of user sub-choices a feature can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureChoiceKind {
    FightingStyle,
    DivineDomain,
    FavoredEnemy,
    NaturalExplorer,
}

impl FeatureChoiceKind {
    /// The choice kind a feature key requires, if any.
    pub fn for_feature_key(key: &str) -> Option<Self> {
        match key {
            k if k == "fighting-style" || k.ends_with("-fighting-style") => {
                Some(Self::FightingStyle)
            }
            "divine-domain" => Some(Self::DivineDomain),
            "favored-enemy" => Some(Self::FavoredEnemy),
            "natural-explorer" => Some(Self::NaturalExplorer),
            _ => None,
        }
    }

    /// Metadata key the choice is stored under.
    pub fn metadata_key(&self) -> &'static str {
        match self {
            Self::FightingStyle => "style",
            Self::DivineDomain => "domain",
            Self::FavoredEnemy => "enemy_type",
            Self::NaturalExplorer => "terrain_type",
        }
    }

    /// Valid values for this choice.
    pub fn options(&self) -> &'static [&'static str] {
        match self {
            Self::FightingStyle => &[
                "archery",
                "defense",
                "dueling",
                "great_weapon_fighting",
                "protection",
                "two_weapon_fighting",
            ],
            Self::DivineDomain => &[
                "knowledge", "life", "light", "nature", "tempest", "trickery", "war",
            ],
            Self::FavoredEnemy => &[
                "aberrations",
                "beasts",
                "celestials",
                "constructs",
                "dragons",
                "elementals",
                "fey",
                "fiends",
                "giants",
                "humanoids",
                "monstrosities",
                "oozes",
                "plants",
                "undead",
            ],
            Self::NaturalExplorer => &[
                "arctic",
                "coast",
                "desert",
                "forest",
                "grassland",
                "mountain",
                "swamp",
                "underdark",
            ],
        }
    }
}

impl fmt::Display for FeatureChoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FightingStyle => "fighting style",
            Self::DivineDomain => "divine domain",
            Self::FavoredEnemy => "favored enemy",
            Self::NaturalExplorer => "natural explorer",
        };
        write!(f, "{}", s)
    }
}

/// Free-form per-feature metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureMetadata(BTreeMap<String, serde_json::Value>);

impl FeatureMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the value recorded for a choice kind.
    pub fn choice(&self, kind: FeatureChoiceKind) -> Option<&str> {
        self.0.get(kind.metadata_key()).and_then(|v| v.as_str())
    }

    fn set_choice(&mut self, kind: FeatureChoiceKind, value: &str) {
        self.0.insert(
            kind.metadata_key().to_string(),
            serde_json::Value::String(value.to_string()),
        );
    }

    /// Shorthand for the fighting style choice.
    pub fn fighting_style(&self) -> Option<&str> {
        self.choice(FeatureChoiceKind::FightingStyle)
    }

    /// Raw access for storage adapters and display.
    pub fn as_map(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.0
    }
}

impl From<BTreeMap<String, serde_json::Value>> for FeatureMetadata {
    fn from(value: BTreeMap<String, serde_json::Value>) -> Self {
        Self(value)
    }
}

/// A species trait or class feature held by a character.
///
/// `key` is stable and unique per character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: FeatureCategory,
    #[serde(default = "default_level")]
    pub level: u8,
    /// Key of the species or class that grants this feature
    pub source: String,
    /// Written only through `record_choice`
    #[serde(default)]
    metadata: FeatureMetadata,
}

fn default_level() -> u8 {
    1
}

impl Feature {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        category: FeatureCategory,
        level: u8,
        source: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            description: String::new(),
            category,
            level,
            source: source.into(),
            metadata: FeatureMetadata::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[inline]
    pub fn metadata(&self) -> &FeatureMetadata {
        &self.metadata
    }

    /// The sub-choice this feature requires, if any.
    pub fn choice_kind(&self) -> Option<FeatureChoiceKind> {
        FeatureChoiceKind::for_feature_key(&self.key)
    }

    /// The recorded sub-choice, if one has been made.
    pub fn recorded_choice(&self) -> Option<&str> {
        self.choice_kind().and_then(|kind| self.metadata.choice(kind))
    }

    /// True when the feature needs a sub-choice that has not been made yet.
    pub fn is_choice_pending(&self) -> bool {
        self.choice_kind().is_some() && self.recorded_choice().is_none()
    }

    /// Record the user's sub-choice.
    ///
    /// A recorded choice is never overwritten.
    pub fn record_choice(&mut self, value: &str) -> Result<FeatureChoiceKind, DomainError> {
        let kind = self.choice_kind().ok_or_else(|| {
            DomainError::validation(format!("Feature '{}' has no choice to make", self.key))
        })?;

        let value = value.trim().to_lowercase();
        if !kind.options().contains(&value.as_str()) {
            return Err(DomainError::validation(format!(
                "'{}' is not a valid {} (expected one of: {})",
                value,
                kind,
                kind.options().join(", ")
            )));
        }

        if let Some(existing) = self.metadata.choice(kind) {
            return Err(DomainError::invalid_state_transition(format!(
                "Feature '{}' already has {} '{}'",
                self.key, kind, existing
            )));
        }

        self.metadata.set_choice(kind, &value);
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fighting_style() -> Feature {
        Feature::new(
            "fighting-style",
            "Fighting Style",
            FeatureCategory::Class,
            1,
            "fighter",
        )
    }

    #[test]
    fn choice_kind_is_derived_from_key() {
        assert_eq!(
            FeatureChoiceKind::for_feature_key("paladin-fighting-style"),
            Some(FeatureChoiceKind::FightingStyle)
        );
        assert_eq!(
            FeatureChoiceKind::for_feature_key("divine-domain"),
            Some(FeatureChoiceKind::DivineDomain)
        );
        assert_eq!(FeatureChoiceKind::for_feature_key("second-wind"), None);
    }

    #[test]
    fn record_choice_writes_typed_metadata() {
        let mut feature = fighting_style();
        assert!(feature.is_choice_pending());

        let kind = feature.record_choice("Dueling").unwrap();

        assert_eq!(kind, FeatureChoiceKind::FightingStyle);
        assert_eq!(feature.metadata.fighting_style(), Some("dueling"));
        assert_eq!(
            feature.metadata.as_map().get("style"),
            Some(&serde_json::json!("dueling"))
        );
        assert!(!feature.is_choice_pending());
    }

    #[test]
    fn record_choice_rejects_unknown_option() {
        let mut feature = fighting_style();
        let err = feature.record_choice("berserking").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(feature.metadata.is_empty());
    }

    #[test]
    fn record_choice_never_overwrites() {
        let mut feature = fighting_style();
        feature.record_choice("dueling").unwrap();

        let err = feature.record_choice("archery").unwrap_err();

        assert!(matches!(err, DomainError::InvalidStateTransition(_)));
        assert_eq!(feature.recorded_choice(), Some("dueling"));
    }

    #[test]
    fn features_without_choices_reject_record() {
        let mut feature = Feature::new(
            "second-wind",
            "Second Wind",
            FeatureCategory::Class,
            1,
            "fighter",
        );
        assert!(!feature.is_choice_pending());
        assert!(feature.record_choice("anything").is_err());
    }

    #[test]
    fn metadata_is_read_through_the_accessor() {
        let mut feature = fighting_style();
        assert!(feature.metadata().is_empty());

        feature.record_choice("protection").unwrap();

        assert_eq!(
            feature.metadata().choice(FeatureChoiceKind::FightingStyle),
            Some("protection")
        );
        assert_eq!(feature.metadata().fighting_style(), Some("protection"));
    }

    #[test]
    fn metadata_survives_serde() {
        let mut feature = fighting_style();
        feature.record_choice("defense").unwrap();
        let json = serde_json::to_string(&feature).unwrap();
        let back: Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(back.metadata.fighting_style(), Some("defense"));
    }
}
