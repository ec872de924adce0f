use super::error::ApiError;
use super::http::{ApiClient, path_segment};
use crate::models::{RuleSuggestion, TradingRule};

const SUGGESTIONS_ENDPOINT: &str = "/suggestions";

pub struct SuggestionsApi {
    client: ApiClient,
}

impl SuggestionsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<RuleSuggestion>, ApiError> {
        self.client.get(SUGGESTIONS_ENDPOINT).await
    }

    /// Accepting a suggestion creates the rule server-side and returns it.
    pub async fn accept(&self, id: &str) -> Result<TradingRule, ApiError> {
        self.client
            .post_empty(&format!("{}/{}/accept", SUGGESTIONS_ENDPOINT, path_segment(id)))
            .await
    }

    pub async fn dismiss(&self, id: &str) -> Result<(), ApiError> {
        self.client
            .post_empty(&format!("{}/{}/dismiss", SUGGESTIONS_ENDPOINT, path_segment(id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::credentials::MemoryTokenStore;
    use crate::api::test_support::{client_for, request_line, serve};
    use crate::models::RuleType;
    use std::sync::Arc;

    fn api(base_url: &str) -> SuggestionsApi {
        SuggestionsApi::new(client_for(base_url, Arc::new(MemoryTokenStore::with_token("t"))))
    }

    #[tokio::test]
    async fn test_list_parses_suggestions() {
        let (base_url, server) = serve(1, |_| {
            (
                200,
                r#"{"success":true,"data":[{"id":"s1","ruleType":"MAX_TRADES_PER_DAY","suggestedValue":4,"rationale":"Win rate drops after the 4th trade","confidence":0.8}]}"#
                    .to_string(),
            )
        })
        .await;

        let suggestions = api(&base_url).list().await.unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].rule_type, RuleType::MaxTradesPerDay);
        assert_eq!(suggestions[0].suggested_value, 4.0);

        let requests = server.await.unwrap();
        assert_eq!(request_line(&requests[0]), "GET /suggestions HTTP/1.1");
    }

    #[tokio::test]
    async fn test_accept_returns_created_rule() {
        let (base_url, server) = serve(1, |_| {
            (
                200,
                r#"{"success":true,"data":{"id":"r9","type":"MAX_TRADES_PER_DAY","category":"DISCIPLINE","value":4,"isActive":true,"description":null}}"#
                    .to_string(),
            )
        })
        .await;

        let rule = api(&base_url).accept("s1").await.unwrap();
        assert_eq!(rule.id, "r9");
        assert!(rule.is_active);

        let requests = server.await.unwrap();
        assert_eq!(request_line(&requests[0]), "POST /suggestions/s1/accept HTTP/1.1");
    }

    #[tokio::test]
    async fn test_dismiss_accepts_empty_data() {
        let (base_url, server) =
            serve(1, |_| (200, r#"{"success":true,"message":"Dismissed"}"#.to_string())).await;

        api(&base_url).dismiss("s 2").await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(request_line(&requests[0]), "POST /suggestions/s%202/dismiss HTTP/1.1");
    }
}
