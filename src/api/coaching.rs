use async_trait::async_trait;

use super::client::CoachingGateway;
use super::error::ApiError;
use super::http::ApiClient;
use crate::models::{CoachingGuidance, MindsetCheck, MindsetCheckInput};

const MINDSET_CHECK_ENDPOINT: &str = "/coaching/mindset-check";
const GUIDANCE_ENDPOINT: &str = "/coaching/guidance";

pub struct CoachingApi {
    client: ApiClient,
}

impl CoachingApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CoachingGateway for CoachingApi {
    async fn todays_mindset_check(&self) -> Result<Option<MindsetCheck>, ApiError> {
        self.client
            .get(&format!("{}/today", MINDSET_CHECK_ENDPOINT))
            .await
    }

    async fn submit_mindset_check(
        &self,
        input: &MindsetCheckInput,
    ) -> Result<MindsetCheck, ApiError> {
        input.validate().map_err(ApiError::InvalidInput)?;
        let check: MindsetCheck = self.client.post(MINDSET_CHECK_ENDPOINT, input).await?;
        log::info!("Mindset check recorded for {}: {:?}", check.date, check.state);
        Ok(check)
    }

    async fn guidance(&self) -> Result<CoachingGuidance, ApiError> {
        self.client.get(GUIDANCE_ENDPOINT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::credentials::MemoryTokenStore;
    use crate::api::test_support::{client_for, request_body, request_line, serve};
    use crate::models::MindsetState;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_todays_check_is_none() {
        let (base_url, server) = serve(1, |_| (200, r#"{"success":true,"data":null}"#.to_string())).await;
        let api = CoachingApi::new(client_for(&base_url, Arc::new(MemoryTokenStore::new())));

        assert_eq!(api.todays_mindset_check().await.unwrap(), None);

        let requests = server.await.unwrap();
        assert_eq!(
            request_line(&requests[0]),
            "GET /coaching/mindset-check/today HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_submit_posts_camel_case_body() {
        let (base_url, server) = serve(1, |_| {
            (
                200,
                r#"{"success":true,"data":{"id":"m1","date":"2026-03-02","state":"calm","energy":4,"notes":null,"createdAt":"2026-03-02T08:00:00Z"}}"#
                    .to_string(),
            )
        })
        .await;
        let api = CoachingApi::new(client_for(&base_url, Arc::new(MemoryTokenStore::new())));

        let input = MindsetCheckInput {
            state: MindsetState::Calm,
            energy: 4,
            notes: None,
        };
        let check = api.submit_mindset_check(&input).await.unwrap();
        assert_eq!(check.state, MindsetState::Calm);

        let requests = server.await.unwrap();
        let body: serde_json::Value = serde_json::from_str(request_body(&requests[0])).unwrap();
        assert_eq!(body["state"], "calm");
        assert_eq!(body["energy"], 4);
    }

    #[tokio::test]
    async fn test_submit_rejects_out_of_range_energy() {
        let api = CoachingApi::new(client_for("http://127.0.0.1:9", Arc::new(MemoryTokenStore::new())));
        let input = MindsetCheckInput {
            state: MindsetState::Tired,
            energy: 0,
            notes: None,
        };

        let err = api.submit_mindset_check(&input).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid input: Energy must be between 1 and 5");
    }
}
