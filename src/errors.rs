use ethers::types::Address;
use thiserror::Error;

/// Failure taxonomy for token and pool resolution.
///
/// Every variant carries enough provenance (which address, which call) for a
/// caller to log or surface a structured failure instead of a bare string.
/// See the module-level failure policy in `lib.rs`: only the validation
/// variants are expected to reach top-level callers; everything else is
/// recovered near its source.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// Input string is not a `0x`-prefixed 40-character hex address.
    #[error("invalid token address `{address}`: expected 0x-prefixed 40-character hex")]
    MalformedAddress { address: String },

    /// The literal zero address was supplied where a token was expected.
    #[error("invalid token address: the zero address is not a token")]
    ZeroAddress,

    /// A single contract read failed. `reverted` distinguishes a
    /// deterministic revert from a transport-level failure.
    #[error("{call}() call to {address:?} failed: {detail}")]
    ContractRead {
        address: Address,
        call: &'static str,
        reverted: bool,
        detail: String,
    },

    /// Every metadata read on a purported ERC-20 contract failed.
    #[error("{address:?} is not a readable ERC-20 contract: {detail}")]
    NotAToken { address: Address, detail: String },

    /// A factory-level call failed, taking the whole protocol out of the
    /// current scan.
    #[error("protocol {protocol} unreachable: {detail}")]
    ProtocolUnreachable { protocol: String, detail: String },
}

impl ResolutionError {
    /// True when the underlying failure was a deterministic contract revert
    /// rather than a transport problem. Revert-class failures must not be
    /// retried.
    pub fn is_revert(&self) -> bool {
        matches!(self, ResolutionError::ContractRead { reverted: true, .. })
    }
}
