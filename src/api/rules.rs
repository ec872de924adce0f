use async_trait::async_trait;

use super::client::RuleGateway;
use super::error::ApiError;
use super::http::{ApiClient, path_segment};
use crate::models::{CreateRuleInput, TradingRule, UpdateRuleInput};

const RULES_ENDPOINT: &str = "/rules";

pub struct RulesApi {
    client: ApiClient,
}

impl RulesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RuleGateway for RulesApi {
    async fn list_rules(&self) -> Result<Vec<TradingRule>, ApiError> {
        self.client.get(RULES_ENDPOINT).await
    }

    async fn create_rule(&self, input: &CreateRuleInput) -> Result<TradingRule, ApiError> {
        input
            .rule_type
            .validate_value(input.value)
            .map_err(ApiError::InvalidInput)?;
        self.client.post(RULES_ENDPOINT, input).await
    }

    async fn update_rule(
        &self,
        id: &str,
        input: &UpdateRuleInput,
    ) -> Result<TradingRule, ApiError> {
        self.client.put(&format!("{}/{}", RULES_ENDPOINT, path_segment(id)), input).await
    }

    async fn toggle_rule(&self, id: &str) -> Result<TradingRule, ApiError> {
        self.client
            .patch(&format!("{}/{}/toggle", RULES_ENDPOINT, path_segment(id)), &serde_json::json!({}))
            .await
    }

    async fn delete_rule(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", RULES_ENDPOINT, path_segment(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::credentials::MemoryTokenStore;
    use crate::api::test_support::{client_for, request_line, serve};
    use crate::models::RuleType;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_toggle_uses_patch() {
        let (base_url, server) = serve(1, |_| {
            (
                200,
                r#"{"success":true,"data":{"id":"r1","type":"REQUIRE_STOP_LOSS","category":"RISK","value":1,"isActive":false,"description":null}}"#
                    .to_string(),
            )
        })
        .await;
        let api = RulesApi::new(client_for(&base_url, Arc::new(MemoryTokenStore::new())));

        let rule = api.toggle_rule("r1").await.unwrap();
        assert!(!rule.is_active);

        let requests = server.await.unwrap();
        assert_eq!(request_line(&requests[0]), "PATCH /rules/r1/toggle HTTP/1.1");
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_value_without_request() {
        // Nothing listens here; a request would surface as a network error
        let api = RulesApi::new(client_for("http://127.0.0.1:9", Arc::new(MemoryTokenStore::new())));
        let input = CreateRuleInput {
            rule_type: RuleType::TradingEndHour,
            category: RuleType::TradingEndHour.category(),
            value: 25.0,
            is_active: true,
        };

        let err = api.create_rule(&input).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
