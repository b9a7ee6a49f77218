//! # Known Chains
//!
//! Chain metadata used for the `wallet_addEthereumChain` fallback and for
//! resolving human-readable network names. Sepolia is the fixed target
//! network of the application.

use oath_types::ChainId;
use serde::Serialize;
use serde_json::{json, Value};

/// Metadata the wallet needs to add a chain it does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainMetadata {
    /// Chain identifier.
    pub chain_id: ChainId,
    /// Display name.
    pub name: &'static str,
    /// Public RPC endpoint.
    pub rpc_url: &'static str,
    /// Native currency name.
    pub currency_name: &'static str,
    /// Native currency ticker symbol.
    pub currency_symbol: &'static str,
    /// Native currency decimals.
    pub currency_decimals: u8,
}

impl ChainMetadata {
    /// Renders the `wallet_addEthereumChain` params object.
    #[must_use]
    pub fn to_add_chain_params(&self) -> Value {
        json!([{
            "chainId": self.chain_id.to_hex(),
            "chainName": self.name,
            "rpcUrls": [self.rpc_url],
            "nativeCurrency": {
                "name": self.currency_name,
                "symbol": self.currency_symbol,
                "decimals": self.currency_decimals,
            },
        }])
    }
}

/// Sepolia testnet metadata.
pub const SEPOLIA: ChainMetadata = ChainMetadata {
    chain_id: ChainId::SEPOLIA,
    name: "Sepolia",
    rpc_url: "https://sepolia.infura.io/v3/",
    currency_name: "ETH",
    currency_symbol: "ETH",
    currency_decimals: 18,
};

/// Looks up add-chain metadata for a chain. Only chains the application
/// targets are known; switching to anything else relies on the wallet
/// already knowing it.
#[must_use]
pub fn metadata(chain: ChainId) -> Option<&'static ChainMetadata> {
    match chain {
        ChainId::SEPOLIA => Some(&SEPOLIA),
        _ => None,
    }
}

/// Human-readable name for a chain id.
#[must_use]
pub fn network_name(chain: ChainId) -> &'static str {
    match chain {
        ChainId::MAINNET => "Mainnet",
        ChainId::SEPOLIA => "Sepolia",
        _ => "unknown",
    }
}
