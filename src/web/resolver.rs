use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::data::{IngredientRepository, RepositoryError};
use crate::model::Ingredient;

/// Maps submitted ingredient id tokens to catalog entries.
///
/// Loaded once from the repository at startup. Unknown ids resolve to
/// `None`; callers drop them and let taco validation catch an empty list.
#[derive(Debug, Clone, Default)]
pub struct IngredientById {
    by_id: Arc<HashMap<String, Ingredient>>,
}

impl IngredientById {
    pub async fn load(repo: &dyn IngredientRepository) -> Result<Self, RepositoryError> {
        let resolver = Self::from_ingredients(repo.find_all().await?);
        info!(count = resolver.by_id.len(), "Ingredient resolver ready");
        Ok(resolver)
    }

    pub fn from_ingredients(ingredients: impl IntoIterator<Item = Ingredient>) -> Self {
        let by_id = ingredients
            .into_iter()
            .map(|ingredient| (ingredient.id.clone(), ingredient))
            .collect();
        Self {
            by_id: Arc::new(by_id),
        }
    }

    pub fn resolve(&self, id: &str) -> Option<Ingredient> {
        self.by_id.get(id).cloned()
    }

    /// Resolves every id in order, skipping unknown ones.
    pub fn resolve_all<'a>(&self, ids: impl IntoIterator<Item = &'a String>) -> Vec<Ingredient> {
        ids.into_iter()
            .filter_map(|id| {
                let found = self.resolve(id);
                if found.is_none() {
                    debug!(%id, "Unknown ingredient id dropped");
                }
                found
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::seed::catalog;

    #[test]
    fn test_resolves_every_catalog_id() {
        let resolver = IngredientById::from_ingredients(catalog());
        for ingredient in catalog() {
            assert_eq!(resolver.resolve(&ingredient.id), Some(ingredient));
        }
    }

    #[test]
    fn test_unknown_ids_are_absent_and_dropped() {
        let resolver = IngredientById::from_ingredients(catalog());
        assert_eq!(resolver.resolve("XXXX"), None);
        assert_eq!(resolver.resolve("flto"), None);

        let ids = vec!["CARN".to_string(), "XXXX".to_string(), "SLSA".to_string()];
        let resolved: Vec<_> = resolver.resolve_all(&ids).into_iter().map(|i| i.id).collect();
        assert_eq!(resolved, vec!["CARN", "SLSA"]);
    }
}
