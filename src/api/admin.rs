use super::error::ApiError;
use super::http::ApiClient;
use crate::models::{AdminStats, AdminUser};

pub struct AdminApi {
    client: ApiClient,
}

impl AdminApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn stats(&self) -> Result<AdminStats, ApiError> {
        self.client.get("/admin/stats").await
    }

    /// Pages are 1-based; page 0 is treated as the first page.
    pub async fn users(&self, page: u32) -> Result<Vec<AdminUser>, ApiError> {
        let page = page.max(1).to_string();
        self.client
            .get_with_query("/admin/users", &[("page", page.as_str())])
            .await
    }
}
