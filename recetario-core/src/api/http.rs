//! REST implementation of the API traits.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use super::{ApiError, Envelope, RecipeStore, TagCatalog};
use crate::config::ClientConfig;
use crate::types::{AuthContext, NewRecipe, Recipe, Tag};

/// HTTP client for `{base}/recipes` and `{base}/tags`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    inner: reqwest::Client,
    base_url: Url,
}

impl HttpApi {
    /// Build a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url =
            Url::parse(&config.api_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{} cannot hold endpoint paths",
                config.api_url
            )));
        }

        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("recetario/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { inner, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Base URL with `segments` appended, each one percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, auth: Option<&AuthContext>) -> RequestBuilder {
        let builder = self.inner.request(method, url);
        match auth.and_then(|a| a.access_token.as_deref()) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn create_request(
        &self,
        recipe: &NewRecipe,
        auth: &AuthContext,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(&["recipes"])?;
        Ok(self.request(Method::POST, url, Some(auth)).json(recipe))
    }

    fn list_request(&self) -> Result<RequestBuilder, ApiError> {
        Ok(self.request(Method::GET, self.endpoint(&["recipes"])?, None))
    }

    fn get_request(&self, id: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.request(Method::GET, self.endpoint(&["recipes", id])?, None))
    }

    fn update_request(
        &self,
        id: &str,
        recipe: &NewRecipe,
        auth: &AuthContext,
    ) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(&["recipes", id])?;
        Ok(self.request(Method::PUT, url, Some(auth)).json(recipe))
    }

    fn delete_request(&self, id: &str, auth: &AuthContext) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(&["recipes", id])?;
        Ok(self.request(Method::DELETE, url, Some(auth)))
    }

    fn tags_request(&self, language: Option<&str>) -> Result<RequestBuilder, ApiError> {
        let mut url = self.endpoint(&["tags"])?;
        if let Some(lang) = language {
            url.query_pairs_mut().append_pair("lang", lang);
        }
        Ok(self.request(Method::GET, url, None))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(url = %response.url(), status = %status, "api response");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        let body = response.text().await?;
        decode(&body)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| ApiError::ParseError(e.to_string()))
}

/// A 404 on a recipe URL means that recipe does not exist.
fn recipe_not_found(id: &str, err: ApiError) -> ApiError {
    match err {
        ApiError::Status { status: 404, .. } => ApiError::NotFound(id.to_string()),
        other => other,
    }
}

#[async_trait]
impl RecipeStore for HttpApi {
    async fn create_recipe(
        &self,
        recipe: &NewRecipe,
        auth: &AuthContext,
    ) -> Result<Recipe, ApiError> {
        tracing::info!(name = %recipe.name, user = %auth.user_id, "creating recipe");
        self.fetch(self.create_request(recipe, auth)?).await
    }

    async fn list_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.fetch(self.list_request()?).await
    }

    async fn get_recipe(&self, id: &str) -> Result<Recipe, ApiError> {
        self.fetch(self.get_request(id)?)
            .await
            .map_err(|e| recipe_not_found(id, e))
    }

    async fn update_recipe(
        &self,
        id: &str,
        recipe: &NewRecipe,
        auth: &AuthContext,
    ) -> Result<Recipe, ApiError> {
        tracing::info!(id, user = %auth.user_id, "updating recipe");
        self.fetch(self.update_request(id, recipe, auth)?)
            .await
            .map_err(|e| recipe_not_found(id, e))
    }

    async fn delete_recipe(&self, id: &str, auth: &AuthContext) -> Result<(), ApiError> {
        tracing::info!(id, user = %auth.user_id, "deleting recipe");
        self.send(self.delete_request(id, auth)?)
            .await
            .map_err(|e| recipe_not_found(id, e))?;
        Ok(())
    }
}

#[async_trait]
impl TagCatalog for HttpApi {
    async fn list_tags(&self, language: Option<&str>) -> Result<Vec<Tag>, ApiError> {
        self.fetch(self.tags_request(language)?).await
    }
}
