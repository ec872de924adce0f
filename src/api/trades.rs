use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::client::TradeGateway;
use super::error::ApiError;
use super::http::{ApiClient, path_segment};
use crate::filters::FilterState;
use crate::models::{
    CloseTradeInput, CompleteTradeInput, CreateTradeInput, ImportSummary, Trade,
    UpdateTradeInput,
};

const TRADES_ENDPOINT: &str = "/trades";
const IMPORT_ENDPOINT: &str = "/trades/import";

pub struct TradesApi {
    client: ApiClient,
}

impl TradesApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Upload a broker CSV export. Parsing happens server-side.
    pub async fn import_csv(&self, file_name: &str, contents: Vec<u8>) -> Result<ImportSummary, ApiError> {
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(|e| ApiError::InvalidInput(format!("Invalid file: {}", e)))?;
        let form = Form::new().part("file", part);

        let summary: ImportSummary = self.client.post_multipart(IMPORT_ENDPOINT, form).await?;
        log::info!(
            "Imported {} trades from {} ({} skipped)",
            summary.imported,
            file_name,
            summary.skipped
        );
        Ok(summary)
    }
}

#[async_trait]
impl TradeGateway for TradesApi {
    async fn list_trades(&self, filters: &FilterState) -> Result<Vec<Trade>, ApiError> {
        self.client
            .get_with_query(TRADES_ENDPOINT, &filters.to_query_pairs())
            .await
    }

    async fn get_trade(&self, id: &str) -> Result<Trade, ApiError> {
        self.client.get(&format!("{}/{}", TRADES_ENDPOINT, path_segment(id))).await
    }

    async fn create_trade(&self, input: &CreateTradeInput) -> Result<Trade, ApiError> {
        self.client.post(TRADES_ENDPOINT, input).await
    }

    async fn update_trade(&self, id: &str, input: &UpdateTradeInput) -> Result<Trade, ApiError> {
        self.client.put(&format!("{}/{}", TRADES_ENDPOINT, path_segment(id)), input).await
    }

    async fn close_trade(&self, id: &str, input: &CloseTradeInput) -> Result<Trade, ApiError> {
        self.client
            .post(&format!("{}/{}/close", TRADES_ENDPOINT, path_segment(id)), input)
            .await
    }

    async fn complete_trade(
        &self,
        id: &str,
        input: &CompleteTradeInput,
    ) -> Result<Trade, ApiError> {
        self.client
            .post(&format!("{}/{}/complete", TRADES_ENDPOINT, path_segment(id)), input)
            .await
    }

    async fn delete_trade(&self, id: &str) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", TRADES_ENDPOINT, path_segment(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::credentials::MemoryTokenStore;
    use crate::api::test_support::{client_for, request_body, request_line, serve};
    use crate::models::{ExitReason, PlanAdherence, TradeStatus};
    use std::sync::Arc;

    const TRADE_JSON: &str = r#"{
        "id": "trd_1", "symbol": "MSFT", "instrumentType": "stock", "direction": "buy",
        "quantity": 10, "entryPrice": 100.0, "exitPrice": 110.0, "status": "closed",
        "source": "manual", "entryTime": "2026-03-02T14:30:00Z", "pnl": 100.0
    }"#;

    fn api(base_url: &str) -> TradesApi {
        TradesApi::new(client_for(base_url, Arc::new(MemoryTokenStore::with_token("t"))))
    }

    #[tokio::test]
    async fn test_list_trades_sends_filters_as_query() {
        let body = format!(r#"{{"success":true,"data":[{}]}}"#, TRADE_JSON);
        let (base_url, server) = serve(1, move |_| (200, body.clone())).await;

        let filters = FilterState::from_query("status=closed&symbol=msft");
        let trades = api(&base_url).list_trades(&filters).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].status, TradeStatus::Closed);

        let requests = server.await.unwrap();
        assert_eq!(
            request_line(&requests[0]),
            "GET /trades?symbol=MSFT&status=closed HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_close_trade_posts_to_close_endpoint() {
        let body = format!(r#"{{"success":true,"data":{}}}"#, TRADE_JSON);
        let (base_url, server) = serve(1, move |_| (200, body.clone())).await;

        let input = CloseTradeInput {
            exit_price: 110.0,
            exit_time: None,
            exit_reason: ExitReason::TargetHit,
            plan_adherence: PlanAdherence::Followed,
            emotions: vec![],
            lessons: None,
        };
        let trade = api(&base_url).close_trade("trd_1", &input).await.unwrap();
        assert_eq!(trade.exit_price, Some(110.0));

        let requests = server.await.unwrap();
        assert_eq!(request_line(&requests[0]), "POST /trades/trd_1/close HTTP/1.1");
        let sent: serde_json::Value = serde_json::from_str(request_body(&requests[0])).unwrap();
        assert_eq!(sent["exitReason"], "target_hit");
        assert_eq!(sent["planAdherence"], "followed");
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_data() {
        let (base_url, server) =
            serve(1, |_| (200, r#"{"success":true,"message":"Trade deleted"}"#.to_string())).await;

        api(&base_url).delete_trade("trd_9").await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(request_line(&requests[0]), "DELETE /trades/trd_9 HTTP/1.1");
    }

    #[tokio::test]
    async fn test_trade_id_is_escaped_in_path() {
        let body = format!(r#"{{"success":true,"data":{}}}"#, TRADE_JSON);
        let (base_url, server) = serve(1, move |_| (200, body.clone())).await;

        api(&base_url).get_trade("trd_1/close?x=1").await.unwrap();

        let requests = server.await.unwrap();
        assert_eq!(
            request_line(&requests[0]),
            "GET /trades/trd_1%2Fclose%3Fx%3D1 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_import_csv_uploads_multipart_file() {
        let (base_url, server) = serve(1, |_| {
            (200, r#"{"success":true,"data":{"imported":2,"skipped":1,"errors":[]}}"#.to_string())
        })
        .await;

        let csv = b"symbol,side,quantity,price,date\nAAPL,buy,10,100,2026-01-02\n".to_vec();
        let summary = api(&base_url).import_csv("fills.csv", csv).await.unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.skipped, 1);

        let requests = server.await.unwrap();
        let request = &requests[0];
        assert_eq!(request_line(request), "POST /trades/import HTTP/1.1");
        assert!(request.to_ascii_lowercase().contains("content-type: multipart/form-data"));
        assert!(request.contains(r#"name="file"; filename="fills.csv""#));
        assert!(request.contains("AAPL,buy,10,100,2026-01-02"));
    }
}
