//! Boundaries to the recipe REST API.
//!
//! The wizard only talks to [`RecipeStore`] and [`TagCatalog`]. [`HttpApi`]
//! implements both over HTTP; [`FakeApi`] keeps everything in memory for
//! tests and offline use.

mod fake;
mod http;

pub use fake::FakeApi;
pub use http::HttpApi;

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{AuthContext, NewRecipe, Recipe, Tag};

/// Error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned error: {status} - {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Recipe not found: {0}")]
    NotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Persistence of recipes.
#[async_trait]
pub trait RecipeStore: Send + Sync + fmt::Debug {
    /// Persist a new recipe for the authenticated user.
    async fn create_recipe(&self, recipe: &NewRecipe, auth: &AuthContext)
        -> Result<Recipe, ApiError>;

    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError>;

    async fn get_recipe(&self, id: &str) -> Result<Recipe, ApiError>;

    async fn update_recipe(
        &self,
        id: &str,
        recipe: &NewRecipe,
        auth: &AuthContext,
    ) -> Result<Recipe, ApiError>;

    async fn delete_recipe(&self, id: &str, auth: &AuthContext) -> Result<(), ApiError>;
}

/// Read-only tag lookup for the tag picker.
#[async_trait]
pub trait TagCatalog: Send + Sync + fmt::Debug {
    /// List tags, localized when `language` is given.
    async fn list_tags(&self, language: Option<&str>) -> Result<Vec<Tag>, ApiError>;
}

/// Response bodies come either wrapped as `{"data": ...}` or bare.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(value) => value,
        }
    }
}
