//! # Chain Reader
//!
//! Typed read-only access to the three contract kinds the SDK consults:
//! ERC-20 tokens, AMM pair contracts, and AMM factory contracts.
//!
//! The [`ChainReader`] trait is the seam between discovery logic and the
//! network. Each method maps to exactly one `eth_call`, and each returns an
//! explicit [`ResolutionError`] with the failing address and call name, so
//! callers never have to shape-check a dynamic decode result. Production
//! code uses [`EvmChainClient`] over an ethers provider; tests substitute a
//! hand-written mock.

use crate::contracts::{Erc20, IUniswapV2Factory, IUniswapV2Pair};
use crate::errors::ResolutionError;
use anyhow::Context;
use async_trait::async_trait;
use ethers::contract::ContractError;
use ethers::prelude::*;
use std::sync::Arc;

/// Read-only contract access, one typed method per contract read.
///
/// All implementations must be `Send + Sync`: token and pool resolutions are
/// issued concurrently and share the reader behind an `Arc`.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn token_symbol(&self, token: Address) -> Result<String, ResolutionError>;
    async fn token_decimals(&self, token: Address) -> Result<u8, ResolutionError>;
    async fn token_name(&self, token: Address) -> Result<String, ResolutionError>;

    /// Current reserves of the pair, in the contract's own token order.
    async fn pair_reserves(&self, pair: Address) -> Result<(U256, U256), ResolutionError>;
    async fn pair_token0(&self, pair: Address) -> Result<Address, ResolutionError>;
    async fn pair_token1(&self, pair: Address) -> Result<Address, ResolutionError>;
    async fn pair_total_supply(&self, pair: Address) -> Result<U256, ResolutionError>;

    /// The pair address a factory indexes for the given token pair; the zero
    /// address when no such pool exists.
    async fn factory_pair_for(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, ResolutionError>;
    async fn factory_pair_count(&self, factory: Address) -> Result<U256, ResolutionError>;
    async fn factory_pair_at(
        &self,
        factory: Address,
        index: U256,
    ) -> Result<Address, ResolutionError>;
}

/// Read-only connection to a specific EVM-compatible network.
///
/// Parameterized by RPC endpoint and chain id. The chain id is held for
/// diagnostics and for [`EvmChainClient::verify_chain_id`]; no call is made
/// at construction time.
#[derive(Clone)]
pub struct EvmChainClient<M> {
    client: Arc<M>,
    chain_id: u64,
}

impl EvmChainClient<Provider<Http>> {
    /// Connects to an HTTP JSON-RPC endpoint.
    pub fn new(rpc_url: &str, chain_id: u64) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("invalid RPC url `{rpc_url}`"))?;
        Ok(Self {
            client: Arc::new(provider),
            chain_id,
        })
    }

    pub fn from_settings(rpc: &crate::settings::Rpc) -> anyhow::Result<Self> {
        Self::new(&rpc.http_url, rpc.chain_id)
    }
}

impl<M: Middleware + 'static> EvmChainClient<M> {
    /// Wraps an existing middleware stack (e.g. one with custom retry or
    /// signing layers added by the host application).
    pub fn from_middleware(client: Arc<M>, chain_id: u64) -> Self {
        Self { client, chain_id }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Checks that the endpoint actually serves the configured chain.
    pub async fn verify_chain_id(&self) -> anyhow::Result<()> {
        let onchain = self
            .client
            .get_chainid()
            .await
            .map_err(|e| anyhow::anyhow!("eth_chainId failed: {e}"))?;
        anyhow::ensure!(
            onchain == U256::from(self.chain_id),
            "endpoint serves chain {} but the client is configured for chain {}",
            onchain,
            self.chain_id
        );
        Ok(())
    }
}

fn read_error<M: Middleware>(
    address: Address,
    call: &'static str,
    err: ContractError<M>,
) -> ResolutionError {
    let detail = err.to_string();
    // Providers differ in how they surface reverts; fall back to string
    // matching when the typed variant is absent.
    let reverted =
        matches!(err, ContractError::Revert(_)) || detail.to_lowercase().contains("revert");
    ResolutionError::ContractRead {
        address,
        call,
        reverted,
        detail,
    }
}

#[async_trait]
impl<M: Middleware + 'static> ChainReader for EvmChainClient<M> {
    async fn token_symbol(&self, token: Address) -> Result<String, ResolutionError> {
        Erc20::new(token, Arc::clone(&self.client))
            .symbol()
            .call()
            .await
            .map_err(|e| read_error(token, "symbol", e))
    }

    async fn token_decimals(&self, token: Address) -> Result<u8, ResolutionError> {
        Erc20::new(token, Arc::clone(&self.client))
            .decimals()
            .call()
            .await
            .map_err(|e| read_error(token, "decimals", e))
    }

    async fn token_name(&self, token: Address) -> Result<String, ResolutionError> {
        Erc20::new(token, Arc::clone(&self.client))
            .name()
            .call()
            .await
            .map_err(|e| read_error(token, "name", e))
    }

    async fn pair_reserves(&self, pair: Address) -> Result<(U256, U256), ResolutionError> {
        let (reserve0, reserve1, _block_timestamp_last) =
            IUniswapV2Pair::new(pair, Arc::clone(&self.client))
                .get_reserves()
                .call()
                .await
                .map_err(|e| read_error(pair, "getReserves", e))?;
        Ok((U256::from(reserve0), U256::from(reserve1)))
    }

    async fn pair_token0(&self, pair: Address) -> Result<Address, ResolutionError> {
        IUniswapV2Pair::new(pair, Arc::clone(&self.client))
            .token_0()
            .call()
            .await
            .map_err(|e| read_error(pair, "token0", e))
    }

    async fn pair_token1(&self, pair: Address) -> Result<Address, ResolutionError> {
        IUniswapV2Pair::new(pair, Arc::clone(&self.client))
            .token_1()
            .call()
            .await
            .map_err(|e| read_error(pair, "token1", e))
    }

    async fn pair_total_supply(&self, pair: Address) -> Result<U256, ResolutionError> {
        IUniswapV2Pair::new(pair, Arc::clone(&self.client))
            .total_supply()
            .call()
            .await
            .map_err(|e| read_error(pair, "totalSupply", e))
    }

    async fn factory_pair_for(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, ResolutionError> {
        IUniswapV2Factory::new(factory, Arc::clone(&self.client))
            .get_pair(token_a, token_b)
            .call()
            .await
            .map_err(|e| read_error(factory, "getPair", e))
    }

    async fn factory_pair_count(&self, factory: Address) -> Result<U256, ResolutionError> {
        IUniswapV2Factory::new(factory, Arc::clone(&self.client))
            .all_pairs_length()
            .call()
            .await
            .map_err(|e| read_error(factory, "allPairsLength", e))
    }

    async fn factory_pair_at(
        &self,
        factory: Address,
        index: U256,
    ) -> Result<Address, ResolutionError> {
        IUniswapV2Factory::new(factory, Arc::clone(&self.client))
            .all_pairs(index)
            .call()
            .await
            .map_err(|e| read_error(factory, "allPairs", e))
    }
}
