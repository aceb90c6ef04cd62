/// Event resolution: signature -> full transaction detail via JSON-RPC `getTransaction`
use super::types::TransactionDetail;
use crate::config::RpcConfig;
use crate::errors::TrackerError;
use crate::logger::{self, LogTag};
use async_trait::async_trait;
use solana_sdk::signature::Signature;
use std::str::FromStr;
use std::time::Duration;

/// Resolves a bare signature into [`TransactionDetail`].
///
/// `EventNotFound` means the node has no result yet (retry later);
/// `TransientFault` means the endpoint could not be reached or answered with an error.
#[async_trait]
pub trait TransactionResolver: Send + Sync {
    async fn resolve(&self, signature: &str) -> Result<TransactionDetail, TrackerError>;
}

pub struct RpcResolver {
    client: reqwest::Client,
    rpc_url: String,
    commitment: String,
}

impl RpcResolver {
    pub fn new(config: &RpcConfig) -> Result<Self, TrackerError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| TrackerError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rpc_url: config.http_url.clone(),
            commitment: config.commitment.clone(),
        })
    }

    fn request_body(&self, signature: &str) -> serde_json::Value {
        serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "encoding": "jsonParsed",
                    "commitment": self.commitment,
                    "maxSupportedTransactionVersion": 0
                }
            ]
        })
    }
}

#[async_trait]
impl TransactionResolver for RpcResolver {
    async fn resolve(&self, signature: &str) -> Result<TransactionDetail, TrackerError> {
        Signature::from_str(signature)
            .map_err(|e| TrackerError::malformed(format!("invalid signature {}: {}", signature, e)))?;

        let response = self
            .client
            .post(&self.rpc_url)
            .header("Content-Type", "application/json")
            .json(&self.request_body(signature))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::transient(
                "rpc",
                format!("getTransaction HTTP {}", status),
            ));
        }

        let body: serde_json::Value = response.json().await?;
        let result = parse_rpc_response(signature, body)?;

        logger::verbose(
            LogTag::Resolver,
            &format!(
                "Resolved {} (slot {}, {} instructions)",
                signature,
                result.slot,
                result.instructions.len() + result.inner_instructions.len()
            ),
        );
        Ok(result)
    }
}

/// Interpret a JSON-RPC envelope returned for `getTransaction`
pub fn parse_rpc_response(
    signature: &str,
    body: serde_json::Value,
) -> Result<TransactionDetail, TrackerError> {
    if let Some(error) = body.get("error") {
        return Err(TrackerError::transient("rpc", format!("RPC error: {}", error)));
    }

    match body.get("result") {
        None => Err(TrackerError::malformed(format!(
            "getTransaction {}: response has neither result nor error",
            signature
        ))),
        Some(result) if result.is_null() => Err(TrackerError::EventNotFound {
            signature: signature.to_string(),
        }),
        Some(result) => TransactionDetail::from_rpc_value(signature, result.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::fixtures::token_transfer_result;
    use serde_json::json;

    #[test]
    fn test_null_result_is_not_found() {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "result": null });
        assert_eq!(
            parse_rpc_response("abc", body),
            Err(TrackerError::EventNotFound {
                signature: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_rpc_error_is_transient() {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32005, "message": "Node is behind" }
        });
        let err = parse_rpc_response("abc", body).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, TrackerError::TransientFault { .. }));
    }

    #[test]
    fn test_result_is_parsed() {
        let body = json!({ "jsonrpc": "2.0", "id": 1, "result": token_transfer_result() });
        let detail = parse_rpc_response("sig-transfer", body).unwrap();
        assert_eq!(detail.signature, "sig-transfer");
        assert_eq!(detail.fee_lamports, 5000);
    }

    #[test]
    fn test_unexpected_envelope_is_malformed() {
        let body = json!({ "jsonrpc": "2.0", "id": 1 });
        assert!(matches!(
            parse_rpc_response("abc", body),
            Err(TrackerError::MalformedEvent { .. })
        ));

        let body = json!({ "jsonrpc": "2.0", "id": 1, "result": { "slot": 5 } });
        assert!(matches!(
            parse_rpc_response("abc", body),
            Err(TrackerError::MalformedEvent { .. })
        ));
    }

    #[test]
    fn test_request_uses_json_parsed_encoding() {
        let resolver = RpcResolver::new(&RpcConfig::default()).unwrap();
        let body = resolver.request_body("abc");
        assert_eq!(body["method"], "getTransaction");
        assert_eq!(body["params"][1]["encoding"], "jsonParsed");
        assert_eq!(body["params"][1]["commitment"], "confirmed");
    }

    #[tokio::test]
    async fn test_invalid_signature_rejected_before_request() {
        let resolver = RpcResolver::new(&RpcConfig::default()).unwrap();
        let err = resolver.resolve("not-a-signature").await.unwrap_err();
        assert!(matches!(err, TrackerError::MalformedEvent { .. }));
    }
}
