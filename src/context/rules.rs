use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiError, RuleGateway};
use crate::models::{CreateRuleInput, RuleCategory, RuleType, TradingRule, UpdateRuleInput};

/// Guardrails for the session, fetched once and kept in sync locally.
pub struct RulesStore {
    gateway: Arc<dyn RuleGateway>,
    rules: RwLock<Option<Vec<TradingRule>>>,
}

impl RulesStore {
    pub fn new(gateway: Arc<dyn RuleGateway>) -> Self {
        Self {
            gateway,
            rules: RwLock::new(None),
        }
    }

    pub async fn rules(&self) -> Result<Vec<TradingRule>, ApiError> {
        if let Some(rules) = self.rules.read().await.as_ref() {
            return Ok(rules.clone());
        }

        let mut cached = self.rules.write().await;
        if let Some(rules) = cached.as_ref() {
            return Ok(rules.clone());
        }
        let rules = self.gateway.list_rules().await?;
        log::info!("Loaded {} rules", rules.len());
        *cached = Some(rules.clone());
        Ok(rules)
    }

    pub async fn refresh(&self) -> Result<Vec<TradingRule>, ApiError> {
        let rules = self.gateway.list_rules().await?;
        *self.rules.write().await = Some(rules.clone());
        Ok(rules)
    }

    pub async fn reset(&self) {
        *self.rules.write().await = None;
    }

    pub async fn active_rules(&self) -> Result<Vec<TradingRule>, ApiError> {
        Ok(self.rules().await?.into_iter().filter(|r| r.is_active).collect())
    }

    /// Rules grouped for the editor, categories in display order.
    pub async fn by_category(&self) -> Result<BTreeMap<RuleCategory, Vec<TradingRule>>, ApiError> {
        let mut grouped: BTreeMap<RuleCategory, Vec<TradingRule>> = BTreeMap::new();
        for rule in self.rules().await? {
            grouped.entry(rule.category).or_default().push(rule);
        }
        Ok(grouped)
    }

    /// Rule kinds the trader has not configured yet.
    pub async fn available_types(&self) -> Result<Vec<RuleType>, ApiError> {
        let rules = self.rules().await?;
        Ok(RuleType::ALL
            .into_iter()
            .filter(|kind| !rules.iter().any(|r| r.rule_type == *kind))
            .collect())
    }

    pub async fn create(&self, input: &CreateRuleInput) -> Result<TradingRule, ApiError> {
        let rule = self.gateway.create_rule(input).await?;
        self.upsert_local(rule.clone()).await;
        Ok(rule)
    }

    pub async fn update(&self, id: &str, input: &UpdateRuleInput) -> Result<TradingRule, ApiError> {
        if let Some(value) = input.value {
            if let Some(rule) = self.find_local(id).await {
                rule.rule_type.validate_value(value).map_err(ApiError::InvalidInput)?;
            }
        }
        let rule = self.gateway.update_rule(id, input).await?;
        self.upsert_local(rule.clone()).await;
        Ok(rule)
    }

    pub async fn toggle(&self, id: &str) -> Result<TradingRule, ApiError> {
        let rule = self.gateway.toggle_rule(id).await?;
        log::info!(
            "Rule {:?} is now {}",
            rule.rule_type,
            if rule.is_active { "active" } else { "inactive" }
        );
        self.upsert_local(rule.clone()).await;
        Ok(rule)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.gateway.delete_rule(id).await?;
        if let Some(rules) = self.rules.write().await.as_mut() {
            rules.retain(|r| r.id != id);
        }
        Ok(())
    }

    /// Add a rule created elsewhere, e.g. by accepting a suggestion.
    pub async fn adopt(&self, rule: TradingRule) {
        self.upsert_local(rule).await;
    }

    async fn find_local(&self, id: &str) -> Option<TradingRule> {
        self.rules
            .read()
            .await
            .as_ref()
            .and_then(|rules| rules.iter().find(|r| r.id == id).cloned())
    }

    async fn upsert_local(&self, rule: TradingRule) {
        if let Some(rules) = self.rules.write().await.as_mut() {
            match rules.iter_mut().find(|r| r.id == rule.id) {
                Some(existing) => *existing = rule,
                None => rules.push(rule),
            }
        }
    }
}
