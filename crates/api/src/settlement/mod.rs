use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::info;

/// USDC carries six decimals, so raw token units are micro-tokens.
pub const USDC_DECIMALS: u32 = 6;

const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
const DEFAULT_USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
/// MXN cents per whole USDC when no rate is configured (18.00 MXN).
const DEFAULT_RATE_MXN_CENTS: i64 = 1_800;

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },
    #[error("transaction not found")]
    TransactionNotFound,
    #[error("transfer verification failed: {0}")]
    Verification(String),
}

#[derive(Clone, Debug)]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub usdc_mint: String,
    pub platform_wallet: String,
    pub network: String,
    pub rate_mxn_cents: i64,
}

impl SolanaConfig {
    /// `None` when no platform wallet is configured; the on-chain strategy
    /// is disabled in that case.
    pub fn from_env() -> Option<Self> {
        let platform_wallet = std::env::var("PLATFORM_USDC_WALLET").ok()?;

        Some(Self {
            rpc_url: std::env::var("SOLANA_RPC_URL")
                .unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            usdc_mint: std::env::var("USDC_MINT_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_USDC_MINT.to_string()),
            platform_wallet,
            network: std::env::var("SOLANA_NETWORK").unwrap_or_else(|_| "devnet".to_string()),
            rate_mxn_cents: std::env::var("USDC_RATE_MXN_CENTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|r| *r > 0)
                .unwrap_or(DEFAULT_RATE_MXN_CENTS),
        })
    }
}

/// JSON-RPC client for the settlement network. One transaction lookup per
/// confirmation, no retries; a missed lookup surfaces to the caller and the
/// client can simply confirm again.
#[derive(Clone)]
pub struct SolanaSettlement {
    config: SolanaConfig,
    client: reqwest::Client,
}

impl SolanaSettlement {
    pub fn new(config: SolanaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn platform_wallet(&self) -> &str {
        &self.config.platform_wallet
    }

    pub fn usdc_mint(&self) -> &str {
        &self.config.usdc_mint
    }

    pub fn network(&self) -> &str {
        &self.config.network
    }

    /// Convert an MXN-cent total into USDC micro-units at the fixed rate.
    pub fn cents_to_token_micros(&self, total_cents: i64) -> i64 {
        cents_to_token_micros(total_cents, self.config.rate_mxn_cents)
    }

    /// Fetch the transaction and check that the platform wallet actually
    /// received at least the expected amount of the configured mint.
    pub async fn verify_transfer(
        &self,
        signature: &str,
        expected_micros: i64,
    ) -> Result<(), SettlementError> {
        let meta = self
            .get_transaction(signature)
            .await?
            .ok_or(SettlementError::TransactionNotFound)?;

        if meta.err.is_some() {
            return Err(SettlementError::Verification(
                "transaction failed on-chain".to_string(),
            ));
        }

        let received = received_micros(
            &meta,
            &self.config.platform_wallet,
            &self.config.usdc_mint,
        );
        if received < expected_micros {
            return Err(SettlementError::Verification(format!(
                "expected {} token micro-units for the platform wallet, found {}",
                expected_micros, received
            )));
        }

        info!(
            "Verified on-chain transfer {} ({} micro-units)",
            signature, received
        );
        Ok(())
    }

    async fn get_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<TransactionMeta>, SettlementError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getTransaction",
            "params": [
                signature,
                {
                    "encoding": "jsonParsed",
                    "commitment": "confirmed",
                    "maxSupportedTransactionVersion": 0
                }
            ]
        });

        let response = self
            .client
            .post(&self.config.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| SettlementError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SettlementError::Network(format!(
                "RPC returned status {}",
                response.status()
            )));
        }

        let rpc: RpcResponse<TransactionEnvelope> = response
            .json()
            .await
            .map_err(|e| SettlementError::Network(format!("invalid RPC response: {}", e)))?;

        if let Some(err) = rpc.error {
            return Err(SettlementError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        Ok(rpc.result.and_then(|tx| tx.meta))
    }
}

/// `total_cents * 10^6 / rate`, rounded half up. `rate` is MXN cents per
/// whole token.
pub fn cents_to_token_micros(total_cents: i64, rate_mxn_cents: i64) -> i64 {
    (total_cents * 1_000_000 + rate_mxn_cents / 2) / rate_mxn_cents
}

/// Net micro-units the wallet gained for the given mint in this transaction
/// (post balances minus pre balances across all of its token accounts).
fn received_micros(meta: &TransactionMeta, wallet: &str, mint: &str) -> i64 {
    let sum = |balances: &[TokenBalance]| -> i64 {
        balances
            .iter()
            .filter(|b| b.mint == mint && b.owner.as_deref() == Some(wallet))
            .map(|b| b.ui_token_amount.micros())
            .sum()
    };

    sum(&meta.post_token_balances) - sum(&meta.pre_token_balances)
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TransactionEnvelope {
    meta: Option<TransactionMeta>,
}

#[derive(Debug, Deserialize)]
struct TransactionMeta {
    err: Option<serde_json::Value>,
    #[serde(default, rename = "preTokenBalances")]
    pre_token_balances: Vec<TokenBalance>,
    #[serde(default, rename = "postTokenBalances")]
    post_token_balances: Vec<TokenBalance>,
}

#[derive(Debug, Deserialize)]
struct TokenBalance {
    mint: String,
    owner: Option<String>,
    #[serde(rename = "uiTokenAmount")]
    ui_token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
struct UiTokenAmount {
    amount: String,
    decimals: u32,
}

impl UiTokenAmount {
    /// Raw amount scaled to micro-units, whatever the mint's decimals.
    fn micros(&self) -> i64 {
        let raw: i64 = self.amount.parse().unwrap_or(0);
        if self.decimals <= USDC_DECIMALS {
            raw * 10_i64.pow(USDC_DECIMALS - self.decimals)
        } else {
            raw / 10_i64.pow(self.decimals - USDC_DECIMALS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALLET: &str = "PLATFORMwallet1111111111111111111111111111";
    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn meta_json(pre: i64, post: i64) -> TransactionMeta {
        let raw = json!({
            "err": null,
            "preTokenBalances": [
                { "mint": MINT, "owner": WALLET,
                  "uiTokenAmount": { "amount": pre.to_string(), "decimals": 6 } },
                { "mint": MINT, "owner": "someone-else",
                  "uiTokenAmount": { "amount": "999000000", "decimals": 6 } }
            ],
            "postTokenBalances": [
                { "mint": MINT, "owner": WALLET,
                  "uiTokenAmount": { "amount": post.to_string(), "decimals": 6 } },
                { "mint": MINT, "owner": "someone-else",
                  "uiTokenAmount": { "amount": "974000000", "decimals": 6 } }
            ]
        });
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn conversion_at_default_rate() {
        // 500.00 MXN at 18.00 MXN per USDC = 27.777778 USDC
        assert_eq!(cents_to_token_micros(50_000, 1_800), 27_777_778);
        // 450.00 MXN is exactly 25 USDC
        assert_eq!(cents_to_token_micros(45_000, 1_800), 25_000_000);
        assert_eq!(cents_to_token_micros(0, 1_800), 0);
    }

    #[test]
    fn conversion_rounds_half_up() {
        // 9 cents at 1000 cents/token is exactly 9000 micros;
        // 1 cent at 600 is 1666.66 micros and rounds up to 1667
        assert_eq!(cents_to_token_micros(9, 1_000), 9_000);
        assert_eq!(cents_to_token_micros(1, 600), 1_667);
    }

    #[test]
    fn wallet_delta_counts_only_platform_balances() {
        let meta = meta_json(1_000_000, 26_000_000);
        assert_eq!(received_micros(&meta, WALLET, MINT), 25_000_000);
    }

    #[test]
    fn other_mints_are_ignored() {
        let raw = json!({
            "err": null,
            "preTokenBalances": [],
            "postTokenBalances": [
                { "mint": "OTHERmint111111111111111111111111111111111", "owner": WALLET,
                  "uiTokenAmount": { "amount": "50000000", "decimals": 6 } }
            ]
        });
        let meta: TransactionMeta = serde_json::from_value(raw).unwrap();
        assert_eq!(received_micros(&meta, WALLET, MINT), 0);
    }

    #[test]
    fn scales_non_standard_decimals() {
        let raw = json!({
            "err": null,
            "preTokenBalances": [],
            "postTokenBalances": [
                { "mint": MINT, "owner": WALLET,
                  "uiTokenAmount": { "amount": "25", "decimals": 0 } }
            ]
        });
        let meta: TransactionMeta = serde_json::from_value(raw).unwrap();
        assert_eq!(received_micros(&meta, WALLET, MINT), 25_000_000);
    }

    #[test]
    fn parses_rpc_envelope_with_missing_transaction() {
        let raw = json!({ "jsonrpc": "2.0", "id": 1, "result": null });
        let rpc: RpcResponse<TransactionEnvelope> = serde_json::from_value(raw).unwrap();
        assert!(rpc.result.is_none());
        assert!(rpc.error.is_none());
    }

    #[test]
    fn parses_rpc_error() {
        let raw = json!({
            "jsonrpc": "2.0", "id": 1,
            "error": { "code": -32602, "message": "invalid signature" }
        });
        let rpc: RpcResponse<TransactionEnvelope> = serde_json::from_value(raw).unwrap();
        let err = rpc.error.unwrap();
        assert_eq!(err.code, -32602);
    }
}
