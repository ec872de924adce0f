use std::sync::Arc;

use super::error::ApiError;
use super::http::ApiClient;
use crate::debounce::{Debouncer, SYMBOL_SEARCH_DELAY};
use crate::models::SymbolMatch;

const SEARCH_ENDPOINT: &str = "/symbols/search";

pub struct SymbolsApi {
    client: ApiClient,
}

impl SymbolsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, ApiError> {
        self.client
            .get_with_query(SEARCH_ENDPOINT, &[("q", query)])
            .await
    }
}

/// Type-ahead symbol lookup, debounced so only the latest keystroke hits
/// the backend.
pub struct SymbolSearch {
    api: Arc<SymbolsApi>,
    debouncer: Debouncer,
}

impl SymbolSearch {
    pub fn new(api: Arc<SymbolsApi>) -> Self {
        Self::with_debouncer(api, Debouncer::new(SYMBOL_SEARCH_DELAY))
    }

    pub fn with_debouncer(api: Arc<SymbolsApi>, debouncer: Debouncer) -> Self {
        Self { api, debouncer }
    }

    /// `Ok(None)` means a newer query superseded this one.
    pub async fn search(&self, query: &str) -> Result<Option<Vec<SymbolMatch>>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            self.debouncer.cancel_pending();
            return Ok(Some(Vec::new()));
        }

        match self.debouncer.run(|| self.api.search(query)).await {
            Some(result) => result.map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::credentials::MemoryTokenStore;
    use crate::api::test_support::{client_for, request_line, serve};
    use std::time::Duration;

    const MATCHES: &str = r#"{"success":true,"data":[{"symbol":"AAPL","name":"Apple Inc.","exchange":"NASDAQ","instrumentType":"stock"}]}"#;

    #[tokio::test]
    async fn test_debounced_search_sends_only_latest_query() {
        let (base_url, server) = serve(1, |_| (200, MATCHES.to_string())).await;
        let api = Arc::new(SymbolsApi::new(client_for(&base_url, Arc::new(MemoryTokenStore::new()))));
        let search = SymbolSearch::with_debouncer(api, Debouncer::new(Duration::from_millis(20)));

        let (stale, latest) = tokio::join!(search.search("AA"), search.search("AAPL"));
        assert_eq!(stale.unwrap(), None);
        let matches = latest.unwrap().unwrap();
        assert_eq!(matches[0].symbol, "AAPL");

        let requests = server.await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(request_line(&requests[0]), "GET /symbols/search?q=AAPL HTTP/1.1");
    }

    #[tokio::test]
    async fn test_blank_query_skips_request() {
        let api = Arc::new(SymbolsApi::new(client_for("http://127.0.0.1:9", Arc::new(MemoryTokenStore::new()))));
        let search = SymbolSearch::new(api);

        assert_eq!(search.search("   ").await.unwrap(), Some(Vec::new()));
    }
}
