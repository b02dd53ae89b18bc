//! HTTP client for the community ledger service.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use super::{BonfireState, CommunityLedger};
use crate::config::LedgerConfig;
use crate::error::LedgerError;

pub struct HttpLedger {
    client: Client,
    base_url: String,
}

impl HttpLedger {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::new(config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CommunityLedger for HttpLedger {
    async fn contribute(&self, anonymous_id: &str, amount: u32) -> Result<(), LedgerError> {
        let body = json!({ "anonymousId": anonymous_id, "amount": amount });
        let resp = self
            .client
            .post(format!("{}/contribute", self.base_url))
            .json(&body)
            .send()
            .await?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            Err(LedgerError::Remote { status, message })
        }
    }

    async fn query_state(&self) -> Result<BonfireState, LedgerError> {
        let resp = self
            .client
            .get(format!("{}/state", self.base_url))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LedgerError::Remote { status, message });
        }

        Ok(resp.json::<BonfireState>().await?)
    }
}
