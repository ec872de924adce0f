use futures::future::join_all;

use super::error::ApiError;
use super::http::ApiClient;
use crate::models::{Broker, BrokerConnectResponse, BrokerPosition, BrokerStatus, BrokerSyncResult};

pub struct BrokerApi {
    client: ApiClient,
}

impl BrokerApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(broker: Broker, action: &str) -> String {
        format!("/broker/{}/{}", broker.as_str(), action)
    }

    pub async fn status(&self, broker: Broker) -> Result<BrokerStatus, ApiError> {
        self.client.get(&Self::path(broker, "status")).await
    }

    /// Status of several brokers, fetched concurrently.
    ///
    /// A broker whose status call fails is reported as disconnected; an auth
    /// failure is returned as-is since every other call would fail too.
    pub async fn statuses(&self, brokers: &[Broker]) -> Result<Vec<BrokerStatus>, ApiError> {
        let results = join_all(brokers.iter().map(|b| self.status(*b))).await;

        let mut statuses = Vec::with_capacity(brokers.len());
        for (broker, result) in brokers.iter().zip(results) {
            match result {
                Ok(status) => statuses.push(status),
                Err(ApiError::AuthenticationRequired) => {
                    return Err(ApiError::AuthenticationRequired);
                }
                Err(e) => {
                    log::warn!("Failed to load {} status: {}", broker, e);
                    statuses.push(BrokerStatus::unavailable(*broker));
                }
            }
        }
        Ok(statuses)
    }

    /// Start the OAuth hand-off. The returned URL is opened by the shell.
    pub async fn connect(&self, broker: Broker) -> Result<BrokerConnectResponse, ApiError> {
        self.client.post_empty(&Self::path(broker, "connect")).await
    }

    pub async fn disconnect(&self, broker: Broker) -> Result<(), ApiError> {
        self.client.delete(&Self::path(broker, "disconnect")).await
    }

    pub async fn sync(&self, broker: Broker) -> Result<BrokerSyncResult, ApiError> {
        let result: BrokerSyncResult = self.client.post_empty(&Self::path(broker, "sync")).await?;
        log::info!(
            "{} sync: {} imported, {} updated, {} closed externally",
            broker,
            result.imported,
            result.updated,
            result.externally_closed
        );
        Ok(result)
    }

    pub async fn positions(&self, broker: Broker) -> Result<Vec<BrokerPosition>, ApiError> {
        self.client.get(&Self::path(broker, "positions")).await
    }
}
