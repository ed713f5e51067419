//! # Pool Discovery
//!
//! Cross-protocol pool lookups. Two entry points: a targeted search for the
//! pool of a specific token pair on every registered protocol, and a full
//! factory enumeration that pages through `allPairs` in concurrent batches.
//!
//! Failure policy: a protocol that cannot be reached is logged and skipped,
//! never aborting the sweep, so one dead factory still yields the pools of
//! every healthy protocol.

use crate::chain_client::ChainReader;
use crate::errors::ResolutionError;
use crate::pools::{LiquidityPool, PoolResolver};
use crate::registry::ProtocolRegistry;
use crate::settings::Settings;
use crate::tokens::{parse_token_address, TokenResolver};
use crate::utils::batch_ranges;
use ethers::types::{Address, U256};
use futures::future;
use log::{debug, info, warn};
use std::sync::Arc;

pub const DEFAULT_PAIR_BATCH_SIZE: u64 = 10;

/// Discovers pools across every protocol in an injected registry.
pub struct PoolDiscovery<C> {
    chain: Arc<C>,
    registry: ProtocolRegistry,
    pools: PoolResolver<C>,
    pair_batch_size: u64,
}

impl<C: ChainReader> PoolDiscovery<C> {
    pub fn new(chain: Arc<C>, registry: ProtocolRegistry) -> Self {
        let pools = PoolResolver::new(Arc::clone(&chain));
        Self {
            chain,
            registry,
            pools,
            pair_batch_size: DEFAULT_PAIR_BATCH_SIZE,
        }
    }

    pub fn from_settings(chain: Arc<C>, settings: &Settings) -> Self {
        let tokens = TokenResolver::new(Arc::clone(&chain))
            .with_name_fetching(settings.discovery.fetch_token_names);
        let pools = PoolResolver::with_token_resolver(Arc::clone(&chain), tokens);
        Self {
            chain,
            registry: ProtocolRegistry::from_settings(&settings.protocols),
            pools,
            pair_batch_size: settings.discovery.pair_batch_size.max(1),
        }
    }

    /// Sets how many pairs are fetched concurrently per enumeration batch.
    pub fn with_pair_batch_size(mut self, batch_size: u64) -> Self {
        self.pair_batch_size = batch_size.max(1);
        self
    }

    pub fn registry(&self) -> &ProtocolRegistry {
        &self.registry
    }

    /// Finds the pool holding the given token pair on every enumerable
    /// protocol. Both addresses are validated before any network call; a
    /// factory that has no pool for the pair (the zero address) or that
    /// fails outright contributes nothing.
    pub async fn find_liquidity_pools(
        &self,
        token_a: &str,
        token_b: &str,
    ) -> Result<Vec<LiquidityPool>, ResolutionError> {
        let token_a = parse_token_address(token_a)?;
        let token_b = parse_token_address(token_b)?;

        let mut found = Vec::new();
        for protocol in self.registry.enumerable() {
            // enumerable() guarantees the factory is present.
            let factory = protocol.factory_address.unwrap_or_default();
            let pair = match self.chain.factory_pair_for(factory, token_a, token_b).await {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("{}: getPair failed, skipping protocol: {e}", protocol.name);
                    continue;
                }
            };
            if pair == Address::zero() {
                debug!("{}: no pool for {token_a:?}/{token_b:?}", protocol.name);
                continue;
            }
            if let Some(pool) = self.pools.get_pool_data(pair, &protocol.name).await {
                found.push(pool);
            }
        }
        info!(
            "found {} pool(s) for {token_a:?}/{token_b:?}",
            found.len()
        );
        Ok(found)
    }

    /// Enumerates every pool of every enumerable protocol, or of a single
    /// named protocol when `protocol_name` is given. Protocol failures are
    /// logged and skipped; the result is whatever the healthy protocols
    /// yielded.
    pub async fn get_all_pools(&self, protocol_name: Option<&str>) -> Vec<LiquidityPool> {
        let mut all = Vec::new();
        for protocol in self.registry.select(protocol_name) {
            let factory = protocol.factory_address.unwrap_or_default();
            match self.scan_factory(factory, &protocol.name).await {
                Ok(mut pools) => {
                    info!("{}: enumerated {} pool(s)", protocol.name, pools.len());
                    all.append(&mut pools);
                }
                Err(e) => {
                    let e = ResolutionError::ProtocolUnreachable {
                        protocol: protocol.name.clone(),
                        detail: e.to_string(),
                    };
                    warn!("skipping protocol: {e}");
                }
            }
        }
        all
    }

    /// Pages through a factory's `allPairs` index. Only the initial length
    /// read is fatal; an unreadable index slot or pair is dropped from the
    /// batch it belonged to.
    async fn scan_factory(
        &self,
        factory: Address,
        protocol: &str,
    ) -> Result<Vec<LiquidityPool>, ResolutionError> {
        let total = self.chain.factory_pair_count(factory).await?;
        let total = total.min(U256::from(u64::MAX)).as_u64();
        debug!("{protocol}: factory reports {total} pair(s)");

        let mut pools = Vec::new();
        for (start, end) in batch_ranges(total, self.pair_batch_size) {
            let addresses = future::join_all(
                (start..end).map(|i| self.chain.factory_pair_at(factory, U256::from(i))),
            )
            .await;
            let readable = addresses.into_iter().filter_map(|result| match result {
                Ok(pair) => Some(pair),
                Err(e) => {
                    debug!("{protocol}: allPairs read failed: {e}");
                    None
                }
            });

            let batch = future::join_all(
                readable.map(|pair| self.pools.get_pool_data(pair, protocol)),
            )
            .await;
            pools.extend(batch.into_iter().flatten());
        }
        Ok(pools)
    }
}
