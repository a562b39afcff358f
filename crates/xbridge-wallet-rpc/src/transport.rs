//! Thin blocking JSON-RPC-over-HTTP transport.
//!
//! Wallet calls are made from the session worker pool's synchronous
//! handler path, so the transport is blocking rather than async — mirroring
//! the coin daemon's own single in-flight-request-per-connection model.

use base64::Engine;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::WalletRpcError;

/// HTTP endpoint plus basic-auth credentials for one wallet daemon.
#[derive(Clone)]
pub struct Transport {
    client: Client,
    url: String,
}

impl Transport {
    /// Build a transport pointing at `http://{rpc_ip}:{rpc_port}` using the
    /// given RPC basic-auth credentials.
    pub fn new(rpc_ip: &str, rpc_port: u16, rpc_user: &str, rpc_pass: &str) -> Self {
        let mut headers = HeaderMap::new();
        let auth = base64::engine::general_purpose::STANDARD
            .encode(format!("{rpc_user}:{rpc_pass}"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {auth}"))
                .expect("basic auth header value is always valid ASCII"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .expect("reqwest client construction with static config cannot fail");

        Transport {
            client,
            url: format!("http://{rpc_ip}:{rpc_port}/"),
        }
    }

    /// Invoke `method` with `params`, deserializing the `result` field into
    /// `R`.
    pub fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: &[P],
    ) -> Result<R, WalletRpcError> {
        let body = json!({
            "jsonrpc": "1.0",
            "id": "xbridge",
            "method": method,
            "params": params,
        });

        let response: Value = self
            .client
            .post(&self.url)
            .json(&body)
            .send()?
            .json()?;

        if let Some(err) = response.get("error").filter(|e| !e.is_null()) {
            let code = err.get("code").and_then(Value::as_i64).unwrap_or(-1);
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown wallet RPC error")
                .to_string();
            return Err(WalletRpcError::Rpc { code, message });
        }

        let result = response
            .get("result")
            .ok_or_else(|| WalletRpcError::Malformed("response missing result field".into()))?;

        Ok(serde_json::from_value(result.clone())?)
    }
}
