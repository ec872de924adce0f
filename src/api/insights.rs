use super::error::ApiError;
use super::http::ApiClient;
use crate::cache::{DNA_TTL, INSIGHTS_TTL, TtlCache};
use crate::models::{BehavioralSnapshot, InsightCard, InsightCardV2, InsightsRange, TradingDna};

/// Insight, snapshot and Trading DNA endpoints with per-range caching.
pub struct InsightsApi {
    client: ApiClient,
    cards: TtlCache<InsightsRange, Vec<InsightCard>>,
    cards_v2: TtlCache<InsightsRange, Vec<InsightCardV2>>,
    snapshots: TtlCache<InsightsRange, BehavioralSnapshot>,
    dna: TtlCache<(), TradingDna>,
}

impl InsightsApi {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            cards: TtlCache::new(INSIGHTS_TTL),
            cards_v2: TtlCache::new(INSIGHTS_TTL),
            snapshots: TtlCache::new(INSIGHTS_TTL),
            dna: TtlCache::new(DNA_TTL),
        }
    }

    pub async fn insights(&self, range: InsightsRange) -> Result<Vec<InsightCard>, ApiError> {
        self.cards
            .get_or_try_insert_with(range, || async move {
                self.client
                    .get_with_query("/insights", &[("range", range.as_str())])
                    .await
            })
            .await
    }

    pub async fn insight_cards(&self, range: InsightsRange) -> Result<Vec<InsightCardV2>, ApiError> {
        self.cards_v2
            .get_or_try_insert_with(range, || async move {
                self.client
                    .get_with_query("/insights/v2", &[("range", range.as_str())])
                    .await
            })
            .await
    }

    pub async fn behavioral_snapshot(&self, range: InsightsRange) -> Result<BehavioralSnapshot, ApiError> {
        self.snapshots
            .get_or_try_insert_with(range, || async move {
                self.client
                    .get_with_query("/insights/snapshot", &[("range", range.as_str())])
                    .await
            })
            .await
    }

    pub async fn trading_dna(&self) -> Result<TradingDna, ApiError> {
        self.dna
            .get_or_try_insert_with((), || self.client.get("/insights/dna"))
            .await
    }

    /// Ask the backend to recompute DNA and replace the cached profile.
    pub async fn refresh_trading_dna(&self) -> Result<TradingDna, ApiError> {
        let dna: TradingDna = self.client.post_empty("/insights/dna/refresh").await?;
        self.dna.insert((), dna.clone());
        log::info!("Trading DNA refreshed: {}", dna.archetype);
        Ok(dna)
    }

    /// Drop every cached insight so the next read refetches (after trades change).
    pub fn invalidate(&self) {
        self.cards.clear();
        self.cards_v2.clear();
        self.snapshots.clear();
        self.dna.clear();
    }
}
