//! In-memory API for tests and offline runs.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{ApiError, RecipeStore, TagCatalog};
use crate::types::{AuthContext, NewRecipe, Recipe, Tag};

/// A fake API that stores recipes in memory.
///
/// Every call is counted, so tests can assert that nothing reached the API.
#[derive(Debug, Default)]
pub struct FakeApi {
    recipes: RwLock<Vec<Recipe>>,
    tags: Vec<Tag>,
    /// When set, every call fails with this message
    failure: Option<String>,
    calls: AtomicUsize,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve these tags from [`TagCatalog::list_tags`].
    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    /// Fail every call with a 500 carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of calls received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of stored recipes, including after a panicked writer.
    pub fn recipes(&self) -> Vec<Recipe> {
        match self.recipes.read() {
            Ok(recipes) => recipes.clone(),
            Err(poison) => poison.into_inner().clone(),
        }
    }

    fn record_call(&self) -> Result<(), ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(ApiError::Status {
                status: 500,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn poisoned() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "fake store lock poisoned".to_string(),
    }
}

fn persisted(id: String, recipe: &NewRecipe) -> Recipe {
    Recipe {
        id,
        name: recipe.name.clone(),
        description: Some(recipe.description.clone()).filter(|d| !d.is_empty()),
        prep_time: Some(recipe.prep_time),
        servings: Some(recipe.servings),
        difficulty: Some(recipe.difficulty),
        calories: recipe.calories,
        main_image_url: recipe.main_image_url.clone(),
        tags: recipe.tags.clone(),
        ingredients: recipe.ingredients.clone(),
        steps: recipe.steps.clone(),
        is_public: recipe.is_public,
        user_id: Some(recipe.user_id.to_string()),
    }
}

#[async_trait]
impl RecipeStore for FakeApi {
    async fn create_recipe(
        &self,
        recipe: &NewRecipe,
        _auth: &AuthContext,
    ) -> Result<Recipe, ApiError> {
        self.record_call()?;
        let created = persisted(uuid::Uuid::new_v4().to_string(), recipe);
        self.recipes
            .write()
            .map_err(|_| poisoned())?
            .push(created.clone());
        Ok(created)
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.record_call()?;
        Ok(self.recipes.read().map_err(|_| poisoned())?.clone())
    }

    async fn get_recipe(&self, id: &str) -> Result<Recipe, ApiError> {
        self.record_call()?;
        self.recipes
            .read()
            .map_err(|_| poisoned())?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn update_recipe(
        &self,
        id: &str,
        recipe: &NewRecipe,
        _auth: &AuthContext,
    ) -> Result<Recipe, ApiError> {
        self.record_call()?;
        let mut recipes = self.recipes.write().map_err(|_| poisoned())?;
        let slot = recipes
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ApiError::NotFound(id.to_string()))?;
        *slot = persisted(id.to_string(), recipe);
        Ok(slot.clone())
    }

    async fn delete_recipe(&self, id: &str, _auth: &AuthContext) -> Result<(), ApiError> {
        self.record_call()?;
        let mut recipes = self.recipes.write().map_err(|_| poisoned())?;
        let before = recipes.len();
        recipes.retain(|r| r.id != id);
        if recipes.len() == before {
            return Err(ApiError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl TagCatalog for FakeApi {
    async fn list_tags(&self, _language: Option<&str>) -> Result<Vec<Tag>, ApiError> {
        self.record_call()?;
        Ok(self.tags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Arc;
    use uuid::Uuid;

    fn new_recipe(name: &str) -> NewRecipe {
        NewRecipe {
            name: name.to_string(),
            description: String::new(),
            prep_time: 20,
            servings: 4,
            difficulty: 2,
            calories: None,
            main_image_url: None,
            tags: Vec::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            is_public: true,
            user_id: Uuid::nil(),
            created_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn create_get_update_delete() {
        let api = FakeApi::new();
        let auth = AuthContext::new(Uuid::nil());

        let created = api.create_recipe(&new_recipe("Soup"), &auth).await.unwrap();
        assert_eq!(created.description, None);
        assert_eq!(api.get_recipe(&created.id).await.unwrap().name, "Soup");

        let updated = api
            .update_recipe(&created.id, &new_recipe("Stew"), &auth)
            .await
            .unwrap();
        assert_eq!(updated.name, "Stew");
        assert_eq!(api.list_recipes().await.unwrap().len(), 1);

        api.delete_recipe(&created.id, &auth).await.unwrap();
        assert!(matches!(
            api.get_recipe(&created.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert_eq!(api.calls(), 6);
    }

    #[tokio::test]
    async fn failing_api_counts_calls() {
        let api = FakeApi::failing("database unavailable");
        let auth = AuthContext::new(Uuid::nil());
        let err = api.create_recipe(&new_recipe("Soup"), &auth).await.unwrap_err();
        assert!(err.to_string().contains("database unavailable"));
        assert_eq!(api.calls(), 1);
        assert!(api.recipes().is_empty());
    }

    #[tokio::test]
    async fn poisoned_store_reports_an_error_not_a_miss() {
        let api = Arc::new(FakeApi::new());
        let auth = AuthContext::new(Uuid::nil());
        let created = api.create_recipe(&new_recipe("Soup"), &auth).await.unwrap();

        let writer = Arc::clone(&api);
        let crashed = std::thread::spawn(move || {
            let _guard = writer.recipes.write().unwrap();
            panic!("writer crashed");
        })
        .join();
        assert!(crashed.is_err());

        assert!(matches!(
            api.get_recipe(&created.id).await,
            Err(ApiError::Status { status: 500, .. })
        ));
        assert!(matches!(
            api.list_recipes().await,
            Err(ApiError::Status { status: 500, .. })
        ));
        assert_eq!(api.recipes().len(), 1);
    }

    #[tokio::test]
    async fn serves_configured_tags() {
        let api = FakeApi::new().with_tags(vec![Tag {
            id: "1".to_string(),
            name: "Vegan".to_string(),
            color: Some("#4caf50".to_string()),
        }]);
        let tags = api.list_tags(Some("es")).await.unwrap();
        assert_eq!(tags.len(), 1);
    }
}
