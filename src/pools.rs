//! # Pool Resolution
//!
//! Reads the full state of a single V2-style pair contract and resolves the
//! metadata of both member tokens. A pool whose pair-level reads fail is
//! reported as absent rather than as an error; a pool whose token metadata
//! cannot be resolved still surfaces, with placeholder token records, so
//! that reserve data is never lost to a broken token contract.

use crate::chain_client::ChainReader;
use crate::errors::ResolutionError;
use crate::tokens::{TokenInfo, TokenResolver, FALLBACK_DECIMALS, FALLBACK_SYMBOL};
use ethers::types::{Address, U256};
use log::debug;
use serde::Serialize;
use std::sync::Arc;

/// Uniswap V2 pools charge a fixed 0.30% swap fee.
pub const V2_POOL_FEE_BPS: u32 = 30;

/// Large integer fields serialize as decimal strings; 2^256 does not fit in
/// any JSON number, and hex would be ambiguous to downstream consumers.
pub(crate) mod u256_decimal {
    use ethers::types::U256;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        let raw = String::deserialize(deserializer)?;
        U256::from_dec_str(&raw).map_err(serde::de::Error::custom)
    }
}

/// A fully resolved constant-product pool snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityPool {
    pub address: Address,
    pub token0: TokenInfo,
    pub token1: TokenInfo,
    #[serde(with = "u256_decimal")]
    pub reserve0: U256,
    #[serde(with = "u256_decimal")]
    pub reserve1: U256,
    #[serde(with = "u256_decimal")]
    pub total_supply: U256,
    /// Swap fee in basis points.
    pub fee: u32,
    pub protocol: String,
}

pub struct PoolResolver<C> {
    chain: Arc<C>,
    tokens: TokenResolver<C>,
}

impl<C: ChainReader> PoolResolver<C> {
    pub fn new(chain: Arc<C>) -> Self {
        let tokens = TokenResolver::new(Arc::clone(&chain));
        Self { chain, tokens }
    }

    pub fn with_token_resolver(chain: Arc<C>, tokens: TokenResolver<C>) -> Self {
        Self { chain, tokens }
    }

    /// Reads reserves, token addresses, and LP supply from the pair, then
    /// resolves both tokens. Returns `None` when the pair-level reads fail,
    /// which covers both "not deployed" and "not a V2 pair".
    pub async fn get_pool_data(&self, pair: Address, protocol: &str) -> Option<LiquidityPool> {
        let (reserves, token0, token1, total_supply) = tokio::join!(
            self.chain.pair_reserves(pair),
            self.chain.pair_token0(pair),
            self.chain.pair_token1(pair),
            self.chain.pair_total_supply(pair),
        );

        let collapsed = (|| {
            Ok::<_, ResolutionError>((reserves?, token0?, token1?, total_supply?))
        })();
        let ((reserve0, reserve1), token0, token1, total_supply) = match collapsed {
            Ok(state) => state,
            Err(e) => {
                debug!("{pair:?}: skipping pool, pair read failed: {e}");
                return None;
            }
        };

        let (token0, token1) = tokio::join!(
            self.resolve_or_placeholder(token0),
            self.resolve_or_placeholder(token1),
        );

        Some(LiquidityPool {
            address: pair,
            token0,
            token1,
            reserve0,
            reserve1,
            total_supply,
            fee: V2_POOL_FEE_BPS,
            protocol: protocol.to_string(),
        })
    }

    async fn resolve_or_placeholder(&self, token: Address) -> TokenInfo {
        match self.tokens.resolve(token).await {
            Ok(info) => info,
            Err(e) => {
                debug!("{token:?}: token resolution failed ({e}), using placeholder");
                placeholder_token(token)
            }
        }
    }
}

fn placeholder_token(address: Address) -> TokenInfo {
    TokenInfo {
        address,
        symbol: FALLBACK_SYMBOL.to_string(),
        decimals: FALLBACK_DECIMALS,
        name: Some("Unknown Token".to_string()),
    }
}
