// =============================================================================
// RESOLVED TRANSACTION MODEL
// =============================================================================
//
// `TransactionDetail` is the subset of a `getTransaction` (jsonParsed)
// response the classifier and the formatter need. The raw RPC shapes below
// accept both jsonParsed account keys (objects) and json account keys
// (plain strings) so the model works with either encoding.

use crate::errors::TrackerError;
use serde::{Deserialize, Serialize};

/// One instruction as seen by the classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRef {
    pub program_id: String,
    /// `parsed.type` for instructions the RPC node could decode
    pub parsed_type: Option<String>,
}

impl InstructionRef {
    pub fn new(program_id: &str, parsed_type: Option<&str>) -> Self {
        Self {
            program_id: program_id.to_string(),
            parsed_type: parsed_type.map(str::to_string),
        }
    }
}

/// Full detail of one resolved transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
    pub failed: bool,
    pub fee_lamports: u64,
    pub account_keys: Vec<String>,
    /// Top-level instructions in execution order
    pub instructions: Vec<InstructionRef>,
    /// Inner (CPI) instructions flattened in execution order
    pub inner_instructions: Vec<InstructionRef>,
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
    /// Index into `account_keys` whose balance drives send/receive
    pub primary_index: usize,
}

impl TransactionDetail {
    /// Build from the `result` object of a `getTransaction` response
    pub fn from_rpc_value(signature: &str, value: serde_json::Value) -> Result<Self, TrackerError> {
        let raw: RawTransaction = serde_json::from_value(value)
            .map_err(|e| TrackerError::malformed(format!("getTransaction {}: {}", signature, e)))?;

        let meta = raw.meta.unwrap_or_default();
        let message = raw.transaction.message;

        let account_keys = message
            .account_keys
            .into_iter()
            .map(RawAccountKey::into_pubkey)
            .collect::<Vec<_>>();

        let instructions = message
            .instructions
            .into_iter()
            .map(|ix| ix.into_instruction_ref(&account_keys))
            .collect();

        let inner_instructions = meta
            .inner_instructions
            .unwrap_or_default()
            .into_iter()
            .flat_map(|group| group.instructions)
            .map(|ix| ix.into_instruction_ref(&account_keys))
            .collect();

        Ok(Self {
            signature: signature.to_string(),
            slot: raw.slot,
            block_time: raw.block_time,
            failed: meta.err.map(|e| !e.is_null()).unwrap_or(false),
            fee_lamports: meta.fee,
            account_keys,
            instructions,
            inner_instructions,
            pre_balances: meta.pre_balances,
            post_balances: meta.post_balances,
            primary_index: 0,
        })
    }

    pub fn involves(&self, address: &str) -> bool {
        self.account_keys.iter().any(|key| key == address)
    }

    /// Make `address` the primary account when it appears in the transaction;
    /// otherwise the fee payer (index 0) stays primary.
    pub fn set_primary_account(&mut self, address: &str) {
        self.primary_index = self
            .account_keys
            .iter()
            .position(|key| key == address)
            .unwrap_or(0);
    }

    pub fn primary_account(&self) -> Option<&str> {
        self.account_keys.get(self.primary_index).map(String::as_str)
    }

    /// Lamport change of the primary account (post - pre)
    pub fn native_delta(&self) -> Option<i128> {
        let pre = *self.pre_balances.get(self.primary_index)?;
        let post = *self.post_balances.get(self.primary_index)?;
        Some(post as i128 - pre as i128)
    }

    /// Outer instructions followed by inner instructions
    pub fn all_instructions(&self) -> impl Iterator<Item = &InstructionRef> {
        self.instructions.iter().chain(self.inner_instructions.iter())
    }
}

// =============================================================================
// RAW RPC SHAPES
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    #[serde(default)]
    slot: u64,
    block_time: Option<i64>,
    meta: Option<RawMeta>,
    transaction: RawEnvelope,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMeta {
    err: Option<serde_json::Value>,
    #[serde(default)]
    fee: u64,
    #[serde(default)]
    pre_balances: Vec<u64>,
    #[serde(default)]
    post_balances: Vec<u64>,
    inner_instructions: Option<Vec<RawInnerGroup>>,
}

#[derive(Debug, Deserialize)]
struct RawInnerGroup {
    #[serde(default)]
    instructions: Vec<RawInstruction>,
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    message: RawMessage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMessage {
    account_keys: Vec<RawAccountKey>,
    #[serde(default)]
    instructions: Vec<RawInstruction>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAccountKey {
    Parsed { pubkey: String },
    Plain(String),
}

impl RawAccountKey {
    fn into_pubkey(self) -> String {
        match self {
            RawAccountKey::Parsed { pubkey } => pubkey,
            RawAccountKey::Plain(pubkey) => pubkey,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInstruction {
    program_id: Option<String>,
    /// json encoding references the program by account index
    program_id_index: Option<usize>,
    parsed: Option<serde_json::Value>,
}

impl RawInstruction {
    fn into_instruction_ref(self, account_keys: &[String]) -> InstructionRef {
        let program_id = self
            .program_id
            .or_else(|| {
                self.program_id_index
                    .and_then(|i| account_keys.get(i).cloned())
            })
            .unwrap_or_default();

        // `parsed` is an object with `type` for most programs, a bare string for memos
        let parsed_type = self
            .parsed
            .as_ref()
            .and_then(|p| p.get("type"))
            .and_then(|t| t.as_str())
            .map(str::to_string);

        InstructionRef {
            program_id,
            parsed_type,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use serde_json::json;

    pub const WALLET: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
    pub const OTHER: &str = "HN7cABqLq46Es1jh92dQQisAq662SmxELLLsHHe4YWrH";

    /// jsonParsed getTransaction result with a token transfer
    pub fn token_transfer_result() -> serde_json::Value {
        json!({
            "slot": 250_000_000u64,
            "blockTime": 1_700_000_000i64,
            "meta": {
                "err": null,
                "fee": 5000,
                "preBalances": [2_000_000_000u64, 1_000_000u64, 1],
                "postBalances": [1_999_995_000u64, 1_000_000u64, 1],
                "innerInstructions": []
            },
            "transaction": {
                "signatures": ["sig-transfer"],
                "message": {
                    "accountKeys": [
                        { "pubkey": WALLET, "signer": true, "writable": true },
                        { "pubkey": OTHER, "signer": false, "writable": true },
                        { "pubkey": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", "signer": false, "writable": false }
                    ],
                    "instructions": [
                        {
                            "program": "spl-token",
                            "programId": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                            "parsed": { "type": "transfer", "info": { "amount": "1000" } },
                            "stackHeight": null
                        }
                    ]
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_json_parsed_result() {
        let detail = TransactionDetail::from_rpc_value("sig-transfer", token_transfer_result()).unwrap();

        assert_eq!(detail.signature, "sig-transfer");
        assert_eq!(detail.slot, 250_000_000);
        assert!(!detail.failed);
        assert_eq!(detail.account_keys.len(), 3);
        assert_eq!(
            detail.instructions,
            vec![InstructionRef::new(
                "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA",
                Some("transfer")
            )]
        );
        assert_eq!(detail.native_delta(), Some(-5000));
    }

    #[test]
    fn test_json_encoding_resolves_program_index() {
        let value = json!({
            "slot": 1,
            "meta": {
                "err": { "InstructionError": [0, "Custom"] },
                "fee": 5000,
                "preBalances": [10, 0],
                "postBalances": [5, 0],
                "innerInstructions": [
                    { "index": 0, "instructions": [ { "programIdIndex": 1, "accounts": [0], "data": "3Bxs" } ] }
                ]
            },
            "transaction": {
                "message": {
                    "accountKeys": [WALLET, "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4"],
                    "instructions": [ { "programIdIndex": 1, "accounts": [0], "data": "3Bxs" } ]
                }
            }
        });

        let detail = TransactionDetail::from_rpc_value("sig", value).unwrap();
        assert!(detail.failed);
        assert_eq!(
            detail.instructions[0].program_id,
            "JUP6LkbZbjS1jKKwapdHNy74zcZ3tLUZoi5QNyVTaV4"
        );
        assert_eq!(detail.inner_instructions.len(), 1);
        assert_eq!(detail.instructions[0].parsed_type, None);
    }

    #[test]
    fn test_primary_account_selection() {
        let mut detail =
            TransactionDetail::from_rpc_value("sig-transfer", token_transfer_result()).unwrap();

        detail.set_primary_account(OTHER);
        assert_eq!(detail.primary_account(), Some(OTHER));
        assert_eq!(detail.native_delta(), Some(0));

        detail.set_primary_account("not-in-transaction");
        assert_eq!(detail.primary_account(), Some(WALLET));
    }

    #[test]
    fn test_memo_string_parsed_has_no_type() {
        let mut value = token_transfer_result();
        value["transaction"]["message"]["instructions"] = json!([
            { "program": "spl-memo", "programId": "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr", "parsed": "gm" }
        ]);
        let detail = TransactionDetail::from_rpc_value("sig", value).unwrap();
        assert_eq!(detail.instructions[0].parsed_type, None);
    }

    #[test]
    fn test_missing_message_is_malformed() {
        let err = TransactionDetail::from_rpc_value("sig", json!({ "slot": 1 })).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedEvent { .. }));
    }
}
