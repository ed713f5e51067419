//! # DEX Liquidity SDK
//!
//! A Rust library for discovering liquidity pools across multiple Uniswap
//! V2-style DEX protocols on an EVM chain, and for analysing swap price
//! impact against the discovered reserves. The SDK is the on-chain read
//! layer of a portfolio management product: it performs only `eth_call`
//! reads and produces fresh in-memory snapshots that the surrounding
//! application renders or caches.
//!
//! ## Overview
//!
//! The SDK is organized into several layers:
//!
//! ### Resolution Layer
//! Defensive decoding of arbitrary on-chain contracts: the [`tokens`] module
//! fetches and validates ERC-20 metadata (with documented fallbacks for
//! contracts that do not implement optional fields), and the [`pools`] module
//! composes pair reserves with token metadata into [`pools::LiquidityPool`]
//! snapshots.
//!
//! ### Discovery Layer
//! The [`discovery`] module iterates an immutable registry of DEX protocols
//! and either looks up a specific token pair on each factory or paginates
//! through a factory's full pair list in bounded concurrent batches.
//!
//! ### Pricing & Aggregation Layer
//! The [`price_impact`] module computes constant-product slippage in
//! arbitrary-precision integer arithmetic, and [`aggregation`] derives
//! display statistics (top pools by liquidity, pool counts) from a result
//! set.
//!
//! ## Failure policy
//!
//! Pool discovery is best-effort across many independent external contracts:
//! failures are recovered as close to their source as possible, and a partial
//! result set is always preferred over a total failure. Only validation
//! errors on directly-supplied input reach the caller as errors.

// Core Types
/// Liquidity pool snapshot and pool resolution
pub mod pools;
/// ERC-20 token metadata resolution and address validation
pub mod tokens;
/// Static DEX protocol registry
pub mod registry;

// Discovery Layer
/// Protocol enumeration: targeted pair lookup and full factory scans
pub mod discovery;

// Pricing & Aggregation
/// Constant-product price impact math
pub mod price_impact;
/// Result-set summary statistics
pub mod aggregation;

// Infrastructure
/// Typed read-only chain access (trait + ethers implementation)
pub mod chain_client;
/// Resolution failure taxonomy
pub mod errors;
/// General utilities
pub mod utils;

// Contracts (Public ABIs Only)
/// Smart contract ABIs (read-only, no execution contracts)
pub mod contracts;

// Settings & Configuration
/// Configuration management
pub mod settings;

// Re-exports for convenience
pub use aggregation::{summarize, PoolSummary};
pub use chain_client::{ChainReader, EvmChainClient};
pub use discovery::PoolDiscovery;
pub use errors::ResolutionError;
pub use pools::{LiquidityPool, PoolResolver};
pub use price_impact::{amount_out, calculate_price_impact};
pub use registry::{DexProtocol, ProtocolRegistry};
pub use settings::Settings;
pub use tokens::{is_valid_token_address, sanitize_token_address, TokenInfo, TokenResolver};
