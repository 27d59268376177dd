//! HTTP network provider over a REST indexer API.

use bch_script::Script;
use bch_transaction::TokenData;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::StatusCode;

use crate::provider::{NetworkProvider, ProviderError};
use crate::utxo::Utxo;

/// Configuration for [`HttpNetworkProvider`].
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Base URL of the indexer API, without a trailing slash.
    pub base_url: String,
    /// Optional bearer token sent with every request.
    pub api_key: Option<String>,
}

impl HttpProviderConfig {
    /// Create a configuration for an unauthenticated endpoint.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the indexer API.
    pub fn new(base_url: &str) -> Self {
        HttpProviderConfig { base_url: base_url.trim_end_matches('/').to_string(), api_key: None }
    }
}

/// One unspent output as reported by the indexer.
#[derive(Debug, serde::Deserialize)]
struct UtxoResponse {
    txid: String,
    vout: u32,
    satoshis: u64,
    #[serde(default)]
    token: Option<TokenData>,
}

#[derive(Debug, serde::Deserialize)]
struct BalanceResponse {
    balance: u64,
}

#[derive(Debug, serde::Serialize)]
struct BroadcastRequest<'a> {
    hex: &'a str,
}

#[derive(Debug, serde::Deserialize)]
struct BroadcastResponse {
    txid: String,
}

#[derive(Debug, serde::Deserialize)]
struct RawTransactionResponse {
    hex: String,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorResponse {
    error: String,
}

/// HTTP client for a REST indexer.
#[derive(Debug, Clone)]
pub struct HttpNetworkProvider {
    /// Client configuration.
    config: HttpProviderConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl HttpNetworkProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: HttpProviderConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Build common headers from config.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(ref key) = self.config.api_key {
            if let Ok(val) = HeaderValue::from_str(&format!("Bearer {key}")) {
                headers.insert(AUTHORIZATION, val);
            }
        }
        headers
    }

    /// Read the node's rejection reason out of an error response body.
    async fn rejection_reason(resp: reqwest::Response) -> String {
        let status = resp.status();
        match resp.json::<ErrorResponse>().await {
            Ok(body) => body.error,
            Err(_) => status.to_string(),
        }
    }
}

impl NetworkProvider for HttpNetworkProvider {
    async fn get_utxos(&self, locking_script: &Script) -> Result<Vec<Utxo>, ProviderError> {
        let url = format!("{}/script/{}/utxos", self.config.base_url, locking_script.to_hex());
        let resp = self.client.get(&url).headers(self.build_headers()).send().await?;
        let utxos: Vec<UtxoResponse> = resp.error_for_status()?.json().await?;

        utxos
            .into_iter()
            .map(|u| {
                let txid_bytes = hex::decode(&u.txid)
                    .map_err(|_| ProviderError::InvalidResponse(format!("bad txid: {}", u.txid)))?;
                let txid: [u8; 32] = txid_bytes
                    .try_into()
                    .map_err(|_| ProviderError::InvalidResponse(format!("bad txid: {}", u.txid)))?;
                Ok(Utxo { txid, vout: u.vout, satoshis: u.satoshis, token: u.token })
            })
            .collect()
    }

    async fn get_balance(&self, locking_script: &Script) -> Result<u64, ProviderError> {
        let url = format!("{}/script/{}/balance", self.config.base_url, locking_script.to_hex());
        let resp = self.client.get(&url).headers(self.build_headers()).send().await?;
        let balance: BalanceResponse = resp.error_for_status()?.json().await?;
        Ok(balance.balance)
    }

    async fn send_raw_transaction(&self, transaction_hex: &str) -> Result<String, ProviderError> {
        let url = format!("{}/tx", self.config.base_url);
        let resp = self
            .client
            .post(&url)
            .headers(self.build_headers())
            .json(&BroadcastRequest { hex: transaction_hex })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(ProviderError::Rejected(Self::rejection_reason(resp).await));
        }
        let body: BroadcastResponse = resp.json().await?;
        Ok(body.txid)
    }

    async fn get_raw_transaction(&self, txid: &str) -> Result<String, ProviderError> {
        let url = format!("{}/tx/{}", self.config.base_url, txid);
        let resp = self.client.get(&url).headers(self.build_headers()).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(txid.to_string()));
        }
        let body: RawTransactionResponse = resp.error_for_status()?.json().await?;
        Ok(body.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn script() -> Script {
        Script::from_hex("76a914e2a623699e81b291c0327f408fea765d534baa2a88ac").expect("valid hex")
    }

    /// Verify UTXO responses parse, including token data.
    #[tokio::test]
    async fn test_get_utxos() {
        let server = MockServer::start().await;
        let body = serde_json::json!([
            {
                "txid": "ab".repeat(32),
                "vout": 1,
                "satoshis": 10_000,
            },
            {
                "txid": "cd".repeat(32),
                "vout": 0,
                "satoshis": 546,
                "token": {
                    "category": "11".repeat(32),
                    "amount": 5,
                }
            }
        ]);
        Mock::given(method("GET"))
            .and(path(format!("/script/{}/utxos", script().to_hex())))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = HttpNetworkProvider::new(HttpProviderConfig::new(&server.uri()));
        let utxos = provider.get_utxos(&script()).await.expect("should query");

        assert_eq!(utxos.len(), 2);
        assert_eq!(utxos[0].txid, [0xab; 32]);
        assert_eq!(utxos[0].satoshis, 10_000);
        assert!(utxos[0].token.is_none());
        assert_eq!(utxos[1].token.as_ref().map(|t| t.amount), Some(5));
    }

    /// Verify malformed txids in UTXO responses are reported.
    #[tokio::test]
    async fn test_get_utxos_bad_txid() {
        let server = MockServer::start().await;
        let body = serde_json::json!([{ "txid": "zz", "vout": 0, "satoshis": 1 }]);
        Mock::given(method("GET"))
            .and(path(format!("/script/{}/utxos", script().to_hex())))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let provider = HttpNetworkProvider::new(HttpProviderConfig::new(&server.uri()));
        let err = provider.get_utxos(&script()).await.expect_err("should fail");
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    /// Verify balance queries parse the balance field.
    #[tokio::test]
    async fn test_get_balance() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/script/{}/balance", script().to_hex())))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "balance": 123_456
            })))
            .mount(&server)
            .await;

        let provider = HttpNetworkProvider::new(HttpProviderConfig::new(&server.uri()));
        assert_eq!(provider.get_balance(&script()).await.expect("should query"), 123_456);
    }

    /// Verify a successful broadcast returns the txid.
    #[tokio::test]
    async fn test_send_raw_transaction() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tx"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "txid": "ab".repeat(32)
            })))
            .mount(&server)
            .await;

        let provider = HttpNetworkProvider::new(HttpProviderConfig::new(&server.uri()));
        let txid = provider.send_raw_transaction("0200").await.expect("should accept");
        assert_eq!(txid, "ab".repeat(32));
    }

    /// Verify a node rejection surfaces its reason.
    #[tokio::test]
    async fn test_broadcast_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tx"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "mandatory-script-verify-flag-failed"
            })))
            .mount(&server)
            .await;

        let provider = HttpNetworkProvider::new(HttpProviderConfig::new(&server.uri()));
        let err = provider.send_raw_transaction("0200").await.expect_err("should reject");
        match err {
            ProviderError::Rejected(reason) => {
                assert_eq!(reason, "mandatory-script-verify-flag-failed")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    /// Verify 404 lookups map to NotFound.
    #[tokio::test]
    async fn test_get_raw_transaction_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("/tx/{}", "ab".repeat(32))))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = HttpNetworkProvider::new(HttpProviderConfig::new(&server.uri()));
        let err =
            provider.get_raw_transaction(&"ab".repeat(32)).await.expect_err("should be missing");
        assert!(matches!(err, ProviderError::NotFound(_)));
    }
}
