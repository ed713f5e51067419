//! # Aggregation
//!
//! Summary statistics over a set of discovered pools.

use crate::pools::LiquidityPool;
use serde::Serialize;

/// How many pools the summary keeps, largest first.
pub const TOP_POOL_COUNT: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSummary {
    /// USD value locked across all pools. No price oracle is wired in, so
    /// this is reported as zero.
    pub total_tvl: f64,
    /// The largest pools by raw combined reserves, at most
    /// [`TOP_POOL_COUNT`] of them.
    pub top_pools: Vec<LiquidityPool>,
    pub total_pools: usize,
}

/// Ranks pools by the sum of their raw reserves. Comparing raw base units
/// across tokens with different decimals is a crude ordering, but it needs
/// no external price data and is stable for same-pair comparisons.
pub fn summarize(pools: &[LiquidityPool]) -> PoolSummary {
    let mut ranked = pools.to_vec();
    ranked.sort_by(|a, b| {
        let size_a = a.reserve0.saturating_add(a.reserve1);
        let size_b = b.reserve0.saturating_add(b.reserve1);
        size_b.cmp(&size_a)
    });
    ranked.truncate(TOP_POOL_COUNT);

    PoolSummary {
        total_tvl: 0.0,
        top_pools: ranked,
        total_pools: pools.len(),
    }
}
