//! CharacterDraft aggregate - the creation-flow wrapper around a draft character.
//!
//! The draft and its flow state are deleted together once the character is
//! finalized; only the character persists afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{CharacterId, DraftId, OwnerId, RealmId};

/// Steps of the creation flow, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreationStep {
    Species,
    Class,
    AbilityScores,
    Proficiencies,
    Equipment,
    Name,
    Review,
}

impl CreationStep {
    pub const ALL: [CreationStep; 7] = [
        Self::Species,
        Self::Class,
        Self::AbilityScores,
        Self::Proficiencies,
        Self::Equipment,
        Self::Name,
        Self::Review,
    ];
}

impl fmt::Display for CreationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Species => "species",
            Self::Class => "class",
            Self::AbilityScores => "ability_scores",
            Self::Proficiencies => "proficiencies",
            Self::Equipment => "equipment",
            Self::Name => "name",
            Self::Review => "review",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowState {
    pub current_step: CreationStep,
    pub all_steps: Vec<CreationStep>,
    pub completed_steps: Vec<CreationStep>,
    pub last_updated: DateTime<Utc>,
}

impl FlowState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            current_step: CreationStep::Species,
            all_steps: CreationStep::ALL.to_vec(),
            completed_steps: Vec::new(),
            last_updated: now,
        }
    }

    /// Mark a step done and move to the first step not yet completed.
    ///
    /// Completing a step twice is a no-op apart from the timestamp.
    pub fn complete(&mut self, step: CreationStep, now: DateTime<Utc>) {
        if !self.completed_steps.contains(&step) {
            self.completed_steps.push(step);
        }
        self.current_step = self
            .all_steps
            .iter()
            .copied()
            .find(|s| !self.completed_steps.contains(s))
            .unwrap_or(CreationStep::Review);
        self.last_updated = now;
    }

    pub fn is_completed(&self, step: CreationStep) -> bool {
        self.completed_steps.contains(&step)
    }
}

/// The creation-flow wrapper for one draft character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterDraft {
    id: DraftId,
    owner_id: OwnerId,
    realm_id: RealmId,
    character_id: CharacterId,
    flow: FlowState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CharacterDraft {
    pub fn new(
        owner_id: OwnerId,
        realm_id: RealmId,
        character_id: CharacterId,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DraftId::new(),
            owner_id,
            realm_id,
            character_id,
            flow: FlowState::new(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn id(&self) -> DraftId {
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
    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    #[inline]
    pub fn flow(&self) -> &FlowState {
        &self.flow
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Record completed steps. The flow is marked as touched even when no
    /// step completes.
    pub fn record_progress(
        &mut self,
        steps: impl IntoIterator<Item = CreationStep>,
        now: DateTime<Utc>,
    ) {
        for step in steps {
            self.flow.complete(step, now);
        }
        self.flow.last_updated = now;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CharacterDraft {
        CharacterDraft::new(
            OwnerId::new("u").unwrap(),
            RealmId::new("r").unwrap(),
            CharacterId::new(),
            Utc::now(),
        )
    }

    #[test]
    fn flow_starts_at_species() {
        let d = draft();
        assert_eq!(d.flow().current_step, CreationStep::Species);
        assert_eq!(d.flow().all_steps.len(), 7);
        assert!(d.flow().completed_steps.is_empty());
    }

    #[test]
    fn out_of_order_progress_points_at_first_gap() {
        let mut d = draft();
        d.record_progress([CreationStep::Class, CreationStep::Class], Utc::now());
        assert_eq!(d.flow().current_step, CreationStep::Species);
        assert_eq!(d.flow().completed_steps, vec![CreationStep::Class]);

        d.record_progress([CreationStep::Species], Utc::now());
        assert_eq!(d.flow().current_step, CreationStep::AbilityScores);
        assert!(d.flow().is_completed(CreationStep::Species));
    }

    #[test]
    fn progress_without_steps_still_touches_the_flow() {
        let mut d = draft();
        let later = d.flow().last_updated + chrono::Duration::minutes(5);

        d.record_progress(Vec::new(), later);

        assert_eq!(d.flow().last_updated, later);
        assert_eq!(d.updated_at(), later);
        assert_eq!(d.flow().current_step, CreationStep::Species);
    }
}
