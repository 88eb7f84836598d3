//! TTL-caching decorator for a rules provider.
//!
//! Rule definitions change rarely, so successful lookups are kept for the
//! configured TTL. Errors are never cached.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use charforge_domain::{Class, Equipment, EquipmentCategoryListing, Feature, Proficiency, Species};

use super::cache::TtlCache;
use super::ports::{RulesError, RulesProvider};

pub struct CachedRulesProvider {
    inner: Arc<dyn RulesProvider>,
    species: TtlCache<String, Species>,
    classes: TtlCache<String, Class>,
    proficiencies: TtlCache<String, Proficiency>,
    equipment: TtlCache<String, Equipment>,
    class_features: TtlCache<(String, u8), Vec<Feature>>,
    equipment_categories: TtlCache<String, EquipmentCategoryListing>,
}

impl CachedRulesProvider {
    pub fn new(inner: Arc<dyn RulesProvider>, ttl: Duration) -> Self {
        Self {
            inner,
            species: TtlCache::new(ttl),
            classes: TtlCache::new(ttl),
            proficiencies: TtlCache::new(ttl),
            equipment: TtlCache::new(ttl),
            class_features: TtlCache::new(ttl),
            equipment_categories: TtlCache::new(ttl),
        }
    }

    /// Drop every expired entry from every cache.
    pub async fn cleanup_expired(&self) -> usize {
        self.species.cleanup_expired().await
            + self.classes.cleanup_expired().await
            + self.proficiencies.cleanup_expired().await
            + self.equipment.cleanup_expired().await
            + self.class_features.cleanup_expired().await
            + self.equipment_categories.cleanup_expired().await
    }
}

async fn cached<K, V, F>(cache: &TtlCache<K, V>, key: K, load: F) -> Result<V, RulesError>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Clone + Send + Sync,
    F: Future<Output = Result<V, RulesError>>,
{
    if let Some(hit) = cache.get(&key).await {
        return Ok(hit);
    }
    let value = load.await?;
    cache.insert(key, value.clone()).await;
    Ok(value)
}

#[async_trait]
impl RulesProvider for CachedRulesProvider {
    async fn get_species(&self, key: &str) -> Result<Species, RulesError> {
        cached(&self.species, key.to_string(), self.inner.get_species(key)).await
    }

    async fn get_class(&self, key: &str) -> Result<Class, RulesError> {
        cached(&self.classes, key.to_string(), self.inner.get_class(key)).await
    }

    async fn get_proficiency(&self, key: &str) -> Result<Proficiency, RulesError> {
        cached(
            &self.proficiencies,
            key.to_string(),
            self.inner.get_proficiency(key),
        )
        .await
    }

    async fn get_equipment(&self, key: &str) -> Result<Equipment, RulesError> {
        cached(&self.equipment, key.to_string(), self.inner.get_equipment(key)).await
    }

    async fn list_class_features(
        &self,
        class_key: &str,
        level: u8,
    ) -> Result<Vec<Feature>, RulesError> {
        cached(
            &self.class_features,
            (class_key.to_string(), level),
            self.inner.list_class_features(class_key, level),
        )
        .await
    }

    async fn get_equipment_category(
        &self,
        key: &str,
    ) -> Result<EquipmentCategoryListing, RulesError> {
        cached(
            &self.equipment_categories,
            key.to_string(),
            self.inner.get_equipment_category(key),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockRulesProvider;

    fn human() -> Species {
        Species {
            key: "human".into(),
            name: "Human".into(),
            speed: 30,
            ability_bonuses: vec![],
            starting_proficiencies: vec![],
            starting_proficiency_options: None,
            traits: vec![],
        }
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let mut inner = MockRulesProvider::new();
        inner
            .expect_get_species()
            .withf(|key| key == "human")
            .times(1)
            .returning(|_| Ok(human()));

        let provider = CachedRulesProvider::new(Arc::new(inner), Duration::from_secs(60));

        assert_eq!(provider.get_species("human").await.unwrap().name, "Human");
        assert_eq!(provider.get_species("human").await.unwrap().name, "Human");
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let mut inner = MockRulesProvider::new();
        inner
            .expect_get_class()
            .times(2)
            .returning(|key| Err(RulesError::not_found("Class", key)));

        let provider = CachedRulesProvider::new(Arc::new(inner), Duration::from_secs(60));

        assert!(provider.get_class("artificer").await.unwrap_err().is_not_found());
        assert!(provider.get_class("artificer").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn class_features_are_cached_per_level() {
        let mut inner = MockRulesProvider::new();
        inner
            .expect_list_class_features()
            .times(2)
            .returning(|_, _| Ok(vec![]));

        let provider = CachedRulesProvider::new(Arc::new(inner), Duration::from_secs(60));

        provider.list_class_features("fighter", 1).await.unwrap();
        provider.list_class_features("fighter", 1).await.unwrap();
        provider.list_class_features("fighter", 2).await.unwrap();
    }
}
