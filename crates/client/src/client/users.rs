//! User API operations.

use reqwest::Method;

use super::CookbookClient;
use crate::error::Result;
use cookbook_core::recipe::User;

impl CookbookClient {
    /// Get user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        let response = self
            .request(Method::GET, &format!("/api/users/{}", id))
            .send()
            .await?;
        self.handle_response(response, &format!("User {}", id)).await
    }
}
