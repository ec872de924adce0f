use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiError, TradeGateway};
use crate::events::{EventBus, TradeEvent};
use crate::filters::FilterState;
use crate::models::{
    CloseTradeInput, CompleteTradeInput, CreateTradeInput, Trade, UpdateTradeInput,
};

/// In-memory trade list for the session.
///
/// The full list is fetched on first use and cached until `refresh`.
/// Mutations go to the backend first and touch the cache only on success;
/// lifecycle changes are published on the event bus.
pub struct TradesStore {
    gateway: Arc<dyn TradeGateway>,
    events: EventBus,
    trades: RwLock<Option<Vec<Trade>>>,
}

impl TradesStore {
    pub fn new(gateway: Arc<dyn TradeGateway>, events: EventBus) -> Self {
        Self {
            gateway,
            events,
            trades: RwLock::new(None),
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.trades.read().await.is_some()
    }

    pub async fn trades(&self) -> Result<Vec<Trade>, ApiError> {
        if let Some(trades) = self.trades.read().await.as_ref() {
            return Ok(trades.clone());
        }

        // Holding the write lock makes concurrent first reads share one fetch
        let mut cached = self.trades.write().await;
        if let Some(trades) = cached.as_ref() {
            return Ok(trades.clone());
        }
        let trades = self.gateway.list_trades(&FilterState::default()).await?;
        log::info!("Loaded {} trades", trades.len());
        *cached = Some(trades.clone());
        Ok(trades)
    }

    pub async fn refresh(&self) -> Result<Vec<Trade>, ApiError> {
        let trades = self.gateway.list_trades(&FilterState::default()).await?;
        *self.trades.write().await = Some(trades.clone());
        Ok(trades)
    }

    /// Forget the cached list; the next read refetches.
    pub async fn reset(&self) {
        *self.trades.write().await = None;
    }

    /// History view query. Filtering happens server-side and is not cached.
    pub async fn search(&self, filters: &FilterState) -> Result<Vec<Trade>, ApiError> {
        self.gateway.list_trades(filters).await
    }

    pub async fn open_trades(&self) -> Result<Vec<Trade>, ApiError> {
        Ok(self.trades().await?.into_iter().filter(Trade::is_open).collect())
    }

    /// Broker-closed trades still waiting for the completion wizard.
    pub async fn pending_completion(&self) -> Result<Vec<Trade>, ApiError> {
        Ok(self
            .trades()
            .await?
            .into_iter()
            .filter(Trade::needs_completion)
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Trade, ApiError> {
        if let Some(trades) = self.trades.read().await.as_ref() {
            if let Some(trade) = trades.iter().find(|t| t.id == id) {
                return Ok(trade.clone());
            }
        }
        self.gateway.get_trade(id).await
    }

    pub async fn create(&self, input: &CreateTradeInput) -> Result<Trade, ApiError> {
        let trade = self.gateway.create_trade(input).await?;
        if let Some(trades) = self.trades.write().await.as_mut() {
            trades.insert(0, trade.clone());
        }
        log::info!("Created trade {} ({})", trade.id, trade.symbol);
        self.events.publish(TradeEvent::Created(trade.clone()));
        Ok(trade)
    }

    pub async fn update(&self, id: &str, input: &UpdateTradeInput) -> Result<Trade, ApiError> {
        let trade = self.gateway.update_trade(id, input).await?;
        self.replace_local(&trade).await;
        Ok(trade)
    }

    pub async fn close(&self, id: &str, input: &CloseTradeInput) -> Result<Trade, ApiError> {
        let trade = self.gateway.close_trade(id, input).await?;
        self.replace_local(&trade).await;
        log::info!("Closed trade {} at {}", trade.id, input.exit_price);
        self.events.publish(TradeEvent::Closed(trade.clone()));
        Ok(trade)
    }

    pub async fn complete(&self, id: &str, input: &CompleteTradeInput) -> Result<Trade, ApiError> {
        let trade = self.gateway.complete_trade(id, input).await?;
        self.replace_local(&trade).await;
        self.events.publish(TradeEvent::Completed(trade.clone()));
        Ok(trade)
    }

    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.gateway.delete_trade(id).await?;
        if let Some(trades) = self.trades.write().await.as_mut() {
            trades.retain(|t| t.id != id);
        }
        log::info!("Deleted trade {}", id);
        self.events.publish(TradeEvent::Deleted { id: id.to_string() });
        Ok(())
    }

    async fn replace_local(&self, trade: &Trade) {
        if let Some(trades) = self.trades.write().await.as_mut() {
            match trades.iter_mut().find(|t| t.id == trade.id) {
                Some(existing) => *existing = trade.clone(),
                None => trades.insert(0, trade.clone()),
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::FakeTradeGateway;
    use super::*;
    use crate::models::{ExitReason, InstrumentType, PlanAdherence, TradeDirection, TradeStatus};

    fn store_with(gateway: Arc<FakeTradeGateway>) -> (TradesStore, EventBus) {
        let events = EventBus::new();
        (TradesStore::new(gateway, events.clone()), events)
    }

    fn create_input() -> CreateTradeInput {
        CreateTradeInput {
            symbol: "MSFT".to_string(),
            instrument_type: InstrumentType::Stock,
            direction: TradeDirection::Buy,
            quantity: 5.0,
            entry_price: 400.0,
            planned_stop_loss: Some(390.0),
            planned_target: Some(420.0),
            confidence: Some(6),
            risk_comfort: Some(3),
            emotions: vec![],
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_trades_fetched_once_until_refresh() {
        let gateway = Arc::new(FakeTradeGateway::with_trades(vec![Trade::sample(
            "t1",
            TradeStatus::Open,
        )]));
        let (store, _) = store_with(gateway.clone());

        assert!(!store.is_loaded().await);
        assert_eq!(store.trades().await.unwrap().len(), 1);
        store.trades().await.unwrap();
        store.get("t1").await.unwrap();
        assert_eq!(gateway.list_calls(), 1);

        store.refresh().await.unwrap();
        assert_eq!(gateway.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_create_prepends_and_publishes() {
        let gateway = Arc::new(FakeTradeGateway::with_trades(vec![Trade::sample(
            "t1",
            TradeStatus::Open,
        )]));
        let (store, events) = store_with(gateway);
        let mut rx = events.subscribe();
        store.trades().await.unwrap();

        let trade = store.create(&create_input()).await.unwrap();
        let trades = store.trades().await.unwrap();
        assert_eq!(trades[0].symbol, "MSFT");
        assert_eq!(trades.len(), 2);

        assert_eq!(rx.recv().await.unwrap(), TradeEvent::Created(trade));
    }

    #[tokio::test]
    async fn test_close_updates_cache_in_place() {
        let gateway = Arc::new(FakeTradeGateway::with_trades(vec![
            Trade::sample("t1", TradeStatus::Open),
            Trade::sample("t2", TradeStatus::ExternallyClosed),
        ]));
        let (store, events) = store_with(gateway);
        let mut rx = events.subscribe();
        assert_eq!(store.open_trades().await.unwrap().len(), 1);
        assert_eq!(store.pending_completion().await.unwrap()[0].id, "t2");

        let input = CloseTradeInput {
            exit_price: 108.0,
            exit_time: None,
            exit_reason: ExitReason::ManualExit,
            plan_adherence: PlanAdherence::Followed,
            emotions: vec![],
            lessons: None,
        };
        store.close("t1", &input).await.unwrap();

        assert!(store.open_trades().await.unwrap().is_empty());
        assert!(matches!(rx.recv().await.unwrap(), TradeEvent::Closed(t) if t.id == "t1"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cache_untouched() {
        let gateway = Arc::new(FakeTradeGateway {
            fail_writes: true,
            ..FakeTradeGateway::with_trades(vec![Trade::sample("t1", TradeStatus::Open)])
        });
        let (store, events) = store_with(gateway);
        let mut rx = events.subscribe();
        store.trades().await.unwrap();

        let err = store.delete("t1").await.unwrap_err();
        assert_eq!(err.to_string(), "Database unavailable");
        assert_eq!(store.trades().await.unwrap().len(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_reset_forces_refetch() {
        let gateway = Arc::new(FakeTradeGateway::with_trades(vec![Trade::sample(
            "t1",
            TradeStatus::Open,
        )]));
        let (store, _) = store_with(gateway.clone());
        store.trades().await.unwrap();

        store.reset().await;
        assert!(!store.is_loaded().await);
        gateway.trades.lock().unwrap().clear();
        assert!(store.trades().await.unwrap().is_empty());
        assert_eq!(gateway.list_calls(), 2);
    }

    #[tokio::test]
    async fn test_search_passes_filters_through() {
        let gateway = Arc::new(FakeTradeGateway::with_trades(vec![
            Trade::sample("t1", TradeStatus::Open),
            Trade::sample("t2", TradeStatus::Closed),
        ]));
        let (store, _) = store_with(gateway);

        let filters = FilterState {
            status: Some(TradeStatus::Closed),
            ..FilterState::default()
        };
        let closed = store.search(&filters).await.unwrap();
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].id, "t2");
        assert!(!store.is_loaded().await);
    }
}
