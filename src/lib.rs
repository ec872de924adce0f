pub mod api;
pub mod cache;
pub mod calc;
pub mod coaching;
pub mod config;
pub mod context;
pub mod db;
pub mod debounce;
pub mod events;
pub mod filters;
pub mod import;
pub mod models;
pub mod recent_symbols;
pub mod wizard;

use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use api::{
    AdminApi, ApiClient, ApiError, BrokerApi, CoachingApi, InsightsApi, KeyringTokenStore,
    RulesApi, Session, SuggestionsApi, SymbolSearch, SymbolsApi, TokenStore, TradesApi,
};
use coaching::CoachingService;
use config::ClientConfig;
use context::{RulesStore, TradesStore};
use db::Database;
use events::EventBus;
use filters::{HistoryFilters, PresetStore};
use models::{Broker, BrokerSyncResult, ImportSummary, TradingRule};
use recent_symbols::RecentSymbolStore;

/// Everything a shell needs for one signed-in session, wired together.
///
/// Caches live here rather than in statics, so two contexts never share
/// state.
pub struct AppContext {
    pub config: ClientConfig,
    pub session: Session,
    pub events: EventBus,
    pub trades: Arc<TradesStore>,
    pub rules: Arc<RulesStore>,
    pub coaching: Arc<CoachingService>,
    pub insights: Arc<InsightsApi>,
    pub broker: BrokerApi,
    pub suggestions: SuggestionsApi,
    pub symbols: SymbolSearch,
    pub admin: AdminApi,
    pub presets: PresetStore,
    pub recent_symbols: RecentSymbolStore,
    trades_api: Arc<TradesApi>,
    listeners: Vec<JoinHandle<()>>,
}

impl AppContext {
    /// Keychain-backed token and on-disk local storage under `config.data_dir`.
    pub fn open(config: ClientConfig) -> Result<Self, ApiError> {
        let db = Database::open(&config.database_path())?;
        Self::new(config, Arc::new(KeyringTokenStore::new()), Arc::new(db))
    }

    pub fn new(
        config: ClientConfig,
        tokens: Arc<dyn TokenStore>,
        db: Arc<Database>,
    ) -> Result<Self, ApiError> {
        let client = ApiClient::new(&config, tokens.clone())?;
        let events = EventBus::new();
        let trades_api = Arc::new(TradesApi::new(client.clone()));

        log::info!("API base URL: {}", client.base_url());

        Ok(Self {
            session: Session::new(tokens),
            trades: Arc::new(TradesStore::new(trades_api.clone(), events.clone())),
            rules: Arc::new(RulesStore::new(Arc::new(RulesApi::new(client.clone())))),
            coaching: Arc::new(CoachingService::new(Arc::new(CoachingApi::new(client.clone())))),
            insights: Arc::new(InsightsApi::new(client.clone())),
            broker: BrokerApi::new(client.clone()),
            suggestions: SuggestionsApi::new(client.clone()),
            symbols: SymbolSearch::new(Arc::new(SymbolsApi::new(client.clone()))),
            admin: AdminApi::new(client),
            presets: PresetStore::new(db.clone()),
            recent_symbols: RecentSymbolStore::new(db),
            trades_api,
            events,
            config,
            listeners: Vec::new(),
        })
    }

    /// Subscribe the coaching and insight caches to trade events.
    /// Needs a running tokio runtime.
    pub fn start(&mut self) {
        if !self.listeners.is_empty() {
            return;
        }
        self.listeners.push(self.coaching.spawn_listener(&self.events));
        self.listeners.push(spawn_insights_invalidation(
            Arc::clone(&self.insights),
            &self.events,
        ));
        log::debug!("Started {} event listeners", self.listeners.len());
    }

    pub fn history_filters(&self, query: &str) -> HistoryFilters {
        HistoryFilters::from_query(query)
    }

    /// Accepting creates the rule server-side; the local rule list picks it up.
    pub async fn accept_suggestion(&self, id: &str) -> Result<TradingRule, ApiError> {
        let rule = self.suggestions.accept(id).await?;
        self.rules.adopt(rule.clone()).await;
        Ok(rule)
    }

    /// Check the CSV locally, upload it, then reload trades.
    pub async fn import_trades(&self, file_name: &str, contents: Vec<u8>) -> Result<ImportSummary, ApiError> {
        let preview = import::preview_csv(&contents)?;
        if !preview.missing_columns.is_empty() {
            return Err(ApiError::InvalidInput(format!(
                "Missing required columns: {}",
                preview.missing_columns.join(", ")
            )));
        }
        if preview.row_count == 0 {
            return Err(ApiError::InvalidInput("CSV file has no trades".to_string()));
        }

        let summary = self.trades_api.import_csv(file_name, contents).await?;
        self.after_bulk_change().await;
        Ok(summary)
    }

    pub async fn sync_broker(&self, broker: Broker) -> Result<BrokerSyncResult, ApiError> {
        let result = self.broker.sync(broker).await?;
        self.after_bulk_change().await;
        Ok(result)
    }

    /// Drop the token and every cached server response, so the next
    /// account signed in on this context starts from empty stores.
    pub async fn sign_out(&self) {
        self.session.sign_out();
        self.trades.reset().await;
        self.rules.reset().await;
        self.insights.invalidate();
        self.coaching.invalidate_all();
        log::info!("Signed out, session caches cleared");
    }

    async fn after_bulk_change(&self) {
        self.insights.invalidate();
        self.coaching.invalidate_guidance();
        if self.trades.is_loaded().await {
            if let Err(e) = self.trades.refresh().await {
                log::warn!("Failed to reload trades: {}", e);
            }
        }
    }
}

impl Drop for AppContext {
    fn drop(&mut self) {
        for listener in &self.listeners {
            listener.abort();
        }
    }
}

fn spawn_insights_invalidation(insights: Arc<InsightsApi>, bus: &EventBus) -> JoinHandle<()> {
    let mut events = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    log::debug!("Insights invalidated by {}", event.name());
                    insights.invalidate();
                }
                Err(RecvError::Lagged(_)) => insights.invalidate(),
                Err(RecvError::Closed) => break,
            }
        }
    })
}
