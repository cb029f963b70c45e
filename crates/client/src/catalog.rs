//! Read-only client for the public recipe catalogue.
//!
//! Results are suggestions only. They never reach the Local Store until the
//! user imports one through the repository's `create`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cookbook_core::recipe::Recipe;

use crate::error::{ClientError, Result};

/// A recipe found in the external catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecipe {
    pub external_id: String,
    pub title: String,
    pub instructions: String,
    pub thumbnail_url: Option<String>,
}

impl CatalogRecipe {
    /// Turns the result into a new, unsynced local draft owned by `owner_id`.
    pub fn into_recipe(self, owner_id: impl Into<String>) -> Recipe {
        let recipe = Recipe::new(owner_id, self.title, self.instructions);
        match self.thumbnail_url {
            Some(url) => recipe.with_image_url(url),
            None => recipe,
        }
    }
}

/// Wire shape of a catalogue meal.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Meal {
    id_meal: String,
    str_meal: String,
    #[serde(default)]
    str_instructions: Option<String>,
    #[serde(default)]
    str_meal_thumb: Option<String>,
}

/// The catalogue answers `{"meals": null}` when nothing matches.
#[derive(Debug, Deserialize)]
struct MealsResponse {
    meals: Option<Vec<Meal>>,
}

impl From<Meal> for CatalogRecipe {
    fn from(meal: Meal) -> Self {
        Self {
            external_id: meal.id_meal,
            title: meal.str_meal,
            instructions: meal.str_instructions.unwrap_or_default(),
            thumbnail_url: meal.str_meal_thumb.filter(|url| !url.is_empty()),
        }
    }
}

/// HTTP client for the recipe catalogue.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Search the catalogue by name.
    ///
    /// Blank queries are rejected without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogRecipe>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::InvalidInput(
                "search query cannot be empty".to_string(),
            ));
        }

        let meals = self.get_meals("/search.php", &[("s", query)]).await?;
        tracing::debug!(query, results = meals.len(), "Searched recipe catalogue");
        Ok(meals)
    }

    /// Look up a single catalogue entry by its external ID.
    pub async fn lookup(&self, external_id: &str) -> Result<Option<CatalogRecipe>> {
        let external_id = external_id.trim();
        if external_id.is_empty() {
            return Err(ClientError::InvalidInput(
                "external id cannot be empty".to_string(),
            ));
        }

        let meals = self.get_meals("/lookup.php", &[("i", external_id)]).await?;
        Ok(meals.into_iter().next())
    }

    async fn get_meals(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<CatalogRecipe>> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::from_status(
                status.as_u16(),
                "Catalogue",
                message,
            ));
        }

        let body = response.text().await?;
        parse_meals(&body)
    }
}

fn parse_meals(body: &str) -> Result<Vec<CatalogRecipe>> {
    let response: MealsResponse = serde_json::from_str(body)?;
    Ok(response
        .meals
        .unwrap_or_default()
        .into_iter()
        .map(CatalogRecipe::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use axum::extract::Query;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn test_parse_meals() {
        let body = r#"{"meals":[{"idMeal":"52772","strMeal":"Teriyaki Chicken Casserole",
            "strInstructions":"Preheat oven","strMealThumb":"https://img/52772.jpg",
            "strArea":"Japanese"}]}"#;

        let meals = parse_meals(body).unwrap();

        assert_eq!(
            meals,
            vec![CatalogRecipe {
                external_id: "52772".to_string(),
                title: "Teriyaki Chicken Casserole".to_string(),
                instructions: "Preheat oven".to_string(),
                thumbnail_url: Some("https://img/52772.jpg".to_string()),
            }]
        );
    }

    #[test]
    fn test_parse_null_meals_is_empty() {
        assert!(parse_meals(r#"{"meals":null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_parse_garbage_is_an_error() {
        assert!(matches!(parse_meals("<html>"), Err(ClientError::Json(_))));
    }

    #[test]
    fn test_into_recipe_builds_unsynced_draft() {
        let found = CatalogRecipe {
            external_id: "52772".to_string(),
            title: "Casserole".to_string(),
            instructions: "Bake".to_string(),
            thumbnail_url: Some("https://img/52772.jpg".to_string()),
        };

        let draft = found.into_recipe("alice");

        assert_eq!(draft.owner_id, "alice");
        assert_eq!(draft.title, "Casserole");
        assert_eq!(draft.description, "Bake");
        assert_eq!(draft.image_url.as_deref(), Some("https://img/52772.jpg"));
        assert!(!draft.is_synced());
    }

    async fn search(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        match params.get("s").map(String::as_str) {
            Some("pho") => Json(json!({
                "meals": [{ "idMeal": "1", "strMeal": "Pho", "strInstructions": "Simmer" }]
            })),
            _ => Json(json!({ "meals": null })),
        }
    }

    async fn lookup(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
        match params.get("i").map(String::as_str) {
            Some("1") => Json(json!({
                "meals": [{ "idMeal": "1", "strMeal": "Pho", "strMealThumb": "" }]
            })),
            _ => Json(json!({ "meals": null })),
        }
    }

    async fn catalog() -> CatalogClient {
        let app = Router::new()
            .route("/search.php", get(search))
            .route("/lookup.php", get(lookup));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        CatalogClient::new(format!("http://{addr}/"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_search() {
        let catalog = catalog().await;

        let found = catalog.search("pho").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].instructions, "Simmer");

        assert!(catalog.search("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_sends_nothing() {
        // Nothing listens here, so a request would fail with a transport error.
        let catalog = CatalogClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();

        let result = catalog.search("   ").await;

        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_lookup() {
        let catalog = catalog().await;

        let found = catalog.lookup("1").await.unwrap().unwrap();
        assert_eq!(found.title, "Pho");
        assert_eq!(found.thumbnail_url, None);

        assert_eq!(catalog.lookup("2").await.unwrap(), None);
    }
}
