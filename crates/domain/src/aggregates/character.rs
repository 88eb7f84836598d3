//! Character aggregate - a player character from first draft to play.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: state only changes through methods
//! - **Draft guard**: creation-flow edits fail once the character is Active
//! - **Pure**: every derived value is computed by `crate::rules`; no I/O here

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::entities::{Class, Species};
use crate::error::DomainError;
use crate::ids::{CharacterId, OwnerId, RealmId};
use crate::rules::armor_class::calculate_armor_class;
use crate::rules::attributes::{base_ability_score, derive_attributes, SkippedAssignment};
use crate::rules::features::synthesize_features;
use crate::rules::proficiencies::{apply_selection, grant, MergeOutcome};
use crate::value_objects::{
    Ability, AbilityAssignments, AbilityRoll, Attributes, CharacterName, Equipment,
    EquipmentCategory, EquipmentInfo, EquipmentSlot, EquippedItems, Feature, FeatureChoiceKind,
    Inventory, InventoryItem, Proficiencies, Proficiency, ResourceKind, ResourcePool,
};

/// Lifecycle of a character. `Draft -> Active` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterStatus {
    Draft,
    Active,
}

impl fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Active => write!(f, "active"),
        }
    }
}

/// A player character.
///
/// # Invariants
///
/// - While `Draft`, any field may be partially populated.
/// - Once `Active`, `attributes` holds exactly one entry per ability.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use charforge_domain::aggregates::{Character, CharacterStatus};
/// use charforge_domain::{OwnerId, RealmId};
///
/// let owner = OwnerId::new("user-1").unwrap();
/// let realm = RealmId::new("guild-1").unwrap();
/// let character = Character::new_draft(owner, realm, Utc::now());
///
/// assert_eq!(character.status(), CharacterStatus::Draft);
/// assert!(character.attributes().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    // Identity
    id: CharacterId,
    owner_id: OwnerId,
    realm_id: RealmId,
    name: Option<CharacterName>,
    status: CharacterStatus,
    level: u8,

    // Rule selections
    species: Option<Species>,
    class: Option<Class>,

    // Abilities
    ability_rolls: Vec<AbilityRoll>,
    ability_assignments: AbilityAssignments,
    attributes: Attributes,

    proficiencies: Proficiencies,
    equipped: EquippedItems,
    inventory: Inventory,
    features: Vec<Feature>,
    resources: BTreeMap<ResourceKind, ResourcePool>,

    // Derived combat values
    max_hit_points: i32,
    current_hit_points: i32,
    armor_class: i32,

    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Character {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Start an empty level-1 draft.
    pub fn new_draft(owner_id: OwnerId, realm_id: RealmId, now: DateTime<Utc>) -> Self {
        Self {
            id: CharacterId::new(),
            owner_id,
            realm_id,
            name: None,
            status: CharacterStatus::Draft,
            level: 1,
            species: None,
            class: None,
            ability_rolls: Vec::new(),
            ability_assignments: AbilityAssignments::new(),
            attributes: Attributes::new(),
            proficiencies: Proficiencies::new(),
            equipped: EquippedItems::new(),
            inventory: Inventory::new(),
            features: Vec::new(),
            resources: BTreeMap::new(),
            max_hit_points: 0,
            current_hit_points: 0,
            armor_class: 0,
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    #[inline]
    pub fn realm_id(&self) -> &RealmId {
        &self.realm_id
    }

    #[inline]
    pub fn name(&self) -> Option<&CharacterName> {
        self.name.as_ref()
    }

    #[inline]
    pub fn status(&self) -> CharacterStatus {
        self.status
    }

    #[inline]
    pub fn is_draft(&self) -> bool {
        self.status == CharacterStatus::Draft
    }

    #[inline]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[inline]
    pub fn species(&self) -> Option<&Species> {
        self.species.as_ref()
    }

    #[inline]
    pub fn class(&self) -> Option<&Class> {
        self.class.as_ref()
    }

    #[inline]
    pub fn ability_rolls(&self) -> &[AbilityRoll] {
        &self.ability_rolls
    }

    #[inline]
    pub fn ability_assignments(&self) -> &AbilityAssignments {
        &self.ability_assignments
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Modifier for an ability, 0 when the ability has no score yet.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.attributes
            .get(&ability)
            .map(|s| s.modifier)
            .unwrap_or(0)
    }

    #[inline]
    pub fn proficiencies(&self) -> &Proficiencies {
        &self.proficiencies
    }

    #[inline]
    pub fn equipped(&self) -> &EquippedItems {
        &self.equipped
    }

    #[inline]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Inventory entries of one category.
    pub fn inventory_in(&self, category: EquipmentCategory) -> &[InventoryItem] {
        self.inventory
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_item(&self, key: &str) -> bool {
        self.inventory
            .values()
            .flatten()
            .any(|i| i.equipment.key() == key)
    }

    #[inline]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, key: &str) -> Option<&Feature> {
        self.features.iter().find(|f| f.key == key)
    }

    pub fn has_feature(&self, key: &str) -> bool {
        self.feature(key).is_some()
    }

    /// Features that still need a user sub-choice.
    pub fn pending_feature_choices(&self) -> Vec<&Feature> {
        self.features
            .iter()
            .filter(|f| f.is_choice_pending())
            .collect()
    }

    #[inline]
    pub fn resources(&self) -> &BTreeMap<ResourceKind, ResourcePool> {
        &self.resources
    }

    #[inline]
    pub fn max_hit_points(&self) -> i32 {
        self.max_hit_points
    }

    #[inline]
    pub fn current_hit_points(&self) -> i32 {
        self.current_hit_points
    }

    #[inline]
    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // =========================================================================
    // Builder Methods
    // =========================================================================

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level.max(1);
        self
    }

    // =========================================================================
    // Draft Edits
    // =========================================================================

    fn ensure_draft(&self, operation: &str) -> Result<(), DomainError> {
        if self.is_draft() {
            Ok(())
        } else {
            Err(DomainError::invalid_state_transition(format!(
                "cannot {} character {}: it is {}",
                operation, self.id, self.status
            )))
        }
    }

    pub fn set_name(&mut self, name: CharacterName, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_draft("rename")?;
        self.name = Some(name);
        self.updated_at = now;
        Ok(())
    }

    /// Select a species. Racial bonuses change, so attributes are re-derived.
    pub fn set_species(
        &mut self,
        species: Species,
        now: DateTime<Utc>,
    ) -> Result<Vec<SkippedAssignment>, DomainError> {
        self.ensure_draft("change species of")?;
        self.species = Some(species);
        self.updated_at = now;
        Ok(self.rederive_attributes())
    }

    /// Select a class.
    ///
    /// Equipment picked for a different class no longer matches its choices
    /// and is cleared.
    pub fn set_class(&mut self, class: Class, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_draft("change class of")?;
        let changed = self
            .class
            .as_ref()
            .map(|c| c.key != class.key)
            .unwrap_or(false);
        if changed {
            self.inventory.clear();
            self.equipped.clear();
        }
        self.class = Some(class);
        self.updated_at = now;
        Ok(())
    }

    /// Replace the rolled values. Old assignments point at old rolls, so they
    /// and the derived attributes are cleared.
    pub fn set_ability_rolls(
        &mut self,
        rolls: Vec<AbilityRoll>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ensure_draft("reroll abilities of")?;
        let mut seen = HashSet::new();
        if let Some(duplicate) = rolls.iter().find(|r| !seen.insert(&r.id)) {
            return Err(DomainError::validation(format!(
                "Duplicate roll id '{}'",
                duplicate.id
            )));
        }
        self.ability_rolls = rolls;
        self.ability_assignments.clear();
        self.attributes.clear();
        self.updated_at = now;
        Ok(())
    }

    /// Replace the ability assignment and re-derive attributes.
    ///
    /// A roll may back at most one ability. Assignments naming unknown rolls
    /// are kept but produce no score; they are returned so callers can log them.
    pub fn assign_abilities(
        &mut self,
        assignments: AbilityAssignments,
        now: DateTime<Utc>,
    ) -> Result<Vec<SkippedAssignment>, DomainError> {
        self.ensure_draft("assign abilities of")?;
        let mut used = HashSet::new();
        for (ability, roll_id) in &assignments {
            if !used.insert(roll_id) {
                return Err(DomainError::validation(format!(
                    "Roll '{}' is assigned to more than one ability ({} among them)",
                    roll_id, ability
                )));
            }
        }
        self.ability_assignments = assignments;
        self.updated_at = now;
        Ok(self.rederive_attributes())
    }

    /// Apply a proficiency selection (skills replace, others accumulate).
    pub fn select_proficiencies(
        &mut self,
        selected: Vec<Proficiency>,
        now: DateTime<Utc>,
    ) -> Result<MergeOutcome, DomainError> {
        self.ensure_draft("select proficiencies for")?;
        let outcome = apply_selection(&mut self.proficiencies, selected);
        self.updated_at = now;
        Ok(outcome)
    }

    /// Replace the equipment chosen during creation.
    pub fn replace_chosen_equipment(
        &mut self,
        items: Vec<InventoryItem>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ensure_draft("choose equipment for")?;
        self.inventory.clear();
        self.equipped.clear();
        for item in items {
            self.add_to_inventory(item);
        }
        self.updated_at = now;
        Ok(())
    }

    // =========================================================================
    // Derivation
    // =========================================================================

    /// Rebuild attributes from rolls, assignments, and species bonuses.
    pub fn rederive_attributes(&mut self) -> Vec<SkippedAssignment> {
        let derivation = derive_attributes(
            &self.ability_rolls,
            &self.ability_assignments,
            self.species.as_ref(),
        );
        self.attributes = derivation.attributes;
        derivation.skipped
    }

    /// An assignment resolves to a rolled value but no attributes were derived.
    ///
    /// Assignments naming unknown rolls derive nothing, so they never count.
    pub fn needs_attribute_heal(&self) -> bool {
        self.attributes.is_empty()
            && self
                .ability_assignments
                .values()
                .any(|roll_id| self.ability_rolls.iter().any(|r| &r.id == roll_id))
    }

    /// Give every ability without a score the base score plus racial bonus.
    pub fn fill_missing_attributes(&mut self) -> Vec<Ability> {
        let mut filled = Vec::new();
        for ability in Ability::ALL {
            if let Entry::Vacant(slot) = self.attributes.entry(ability) {
                slot.insert(base_ability_score(ability, self.species.as_ref()));
                filled.push(ability);
            }
        }
        filled
    }

    /// Add template features the character is missing; existing ones are untouched.
    pub fn synthesize_features(&mut self, templates: impl IntoIterator<Item = Feature>) -> Vec<String> {
        synthesize_features(&mut self.features, templates, self.level)
    }

    /// Add proficiencies from any source with de-duplication by key.
    pub fn grant_proficiencies(
        &mut self,
        proficiencies: impl IntoIterator<Item = Proficiency>,
    ) -> Vec<Proficiency> {
        grant(&mut self.proficiencies, proficiencies)
    }

    /// Add an item; a stack with the same key grows instead of duplicating.
    pub fn add_to_inventory(&mut self, item: InventoryItem) {
        let stack = self.inventory.entry(item.equipment.category()).or_default();
        match stack
            .iter_mut()
            .find(|i| i.equipment.key() == item.equipment.key())
        {
            Some(existing) => existing.quantity += item.quantity,
            None => stack.push(item),
        }
    }

    pub fn equip(&mut self, slot: EquipmentSlot, equipment: Equipment) {
        self.equipped.insert(slot, equipment);
    }

    /// Equip armor, a weapon, and a shield from the inventory into empty slots.
    ///
    /// Equipped items stay in the inventory. A two-handed weapon leaves the
    /// off hand empty.
    pub fn equip_starting_loadout(&mut self) -> Vec<(EquipmentSlot, String)> {
        let mut equipped = Vec::new();
        let armor: Vec<Equipment> = self
            .inventory_in(EquipmentCategory::Armor)
            .iter()
            .map(|i| i.equipment.clone())
            .collect();
        let weapons: Vec<Equipment> = self
            .inventory_in(EquipmentCategory::Weapon)
            .iter()
            .map(|i| i.equipment.clone())
            .collect();

        if !self.equipped.contains_key(&EquipmentSlot::Body) {
            if let Some(body) = armor
                .iter()
                .find(|e| e.as_armor().map(|a| !a.is_shield()).unwrap_or(false))
            {
                equipped.push((EquipmentSlot::Body, body.key().to_string()));
                self.equip(EquipmentSlot::Body, body.clone());
            }
        }

        let hands_free = !self.equipped.contains_key(&EquipmentSlot::MainHand)
            && !self.equipped.contains_key(&EquipmentSlot::TwoHanded);
        if hands_free {
            if let Some(weapon) = weapons.first() {
                let two_handed = weapon.as_weapon().map(|w| w.is_two_handed()).unwrap_or(false);
                let slot = if two_handed {
                    EquipmentSlot::TwoHanded
                } else {
                    EquipmentSlot::MainHand
                };
                equipped.push((slot, weapon.key().to_string()));
                self.equip(slot, weapon.clone());
            }
        }

        let off_hand_free = !self.equipped.contains_key(&EquipmentSlot::OffHand)
            && !self.equipped.contains_key(&EquipmentSlot::TwoHanded);
        if off_hand_free {
            if let Some(shield) = armor
                .iter()
                .find(|e| e.as_armor().map(|a| a.is_shield()).unwrap_or(false))
            {
                equipped.push((EquipmentSlot::OffHand, shield.key().to_string()));
                self.equip(EquipmentSlot::OffHand, shield.clone());
            }
        }

        equipped
    }

    /// Set max hit points and fill current to match.
    pub fn set_hit_points(&mut self, max: i32) {
        self.max_hit_points = max;
        self.current_hit_points = max;
    }

    /// Raise max (and current) hit points.
    pub fn raise_max_hit_points(&mut self, amount: i32) {
        self.max_hit_points += amount;
        self.current_hit_points += amount;
    }

    pub fn set_armor_class(&mut self, armor_class: i32) {
        self.armor_class = armor_class;
    }

    /// Install resource pools that are not already present.
    pub fn init_resources(&mut self, pools: impl IntoIterator<Item = ResourcePool>) -> Vec<ResourceKind> {
        let mut added = Vec::new();
        for pool in pools {
            if let Entry::Vacant(slot) = self.resources.entry(pool.kind) {
                added.push(pool.kind);
                slot.insert(pool);
            }
        }
        added
    }

    // =========================================================================
    // Feature Choices
    // =========================================================================

    /// Record a user sub-choice on a feature. Allowed on drafts and active characters.
    ///
    /// Some choices change armor class (the defense fighting style), so the
    /// stored value is recomputed.
    pub fn record_feature_choice(
        &mut self,
        feature_key: &str,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<FeatureChoiceKind, DomainError> {
        let feature = self
            .features
            .iter_mut()
            .find(|f| f.key == feature_key)
            .ok_or_else(|| DomainError::not_found("Feature", feature_key))?;
        let kind = feature.record_choice(value)?;
        self.armor_class = calculate_armor_class(self);
        self.updated_at = now;
        Ok(kind)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// `Draft -> Active`. Fails without changing anything when not a draft or
    /// when an ability has no score.
    pub fn activate(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.ensure_draft("activate")?;
        if let Some(missing) = Ability::ALL
            .iter()
            .find(|a| !self.attributes.contains_key(*a))
        {
            return Err(DomainError::constraint(format!(
                "character {} has no {} score",
                self.id, missing
            )));
        }
        self.status = CharacterStatus::Active;
        self.updated_at = now;
        Ok(())
    }
}
