//! # Token Resolution
//!
//! Turns raw token addresses into [`TokenInfo`] records by reading the
//! ERC-20 metadata calls on-chain. Individual metadata reads are allowed to
//! fail: `symbol()` falls back to a placeholder, `decimals()` to the ERC-20
//! conventional 18, and `name()` is simply omitted. Only when every read
//! fails is the address reported as not being a token at all.

use crate::chain_client::ChainReader;
use crate::errors::ResolutionError;
use ethers::types::Address;
use futures::future;
use log::debug;
use serde::Serialize;
use std::sync::Arc;

pub const FALLBACK_SYMBOL: &str = "UNKNOWN";
pub const FALLBACK_DECIMALS: u8 = 18;

/// Resolved ERC-20 metadata for a token contract.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Returns true when the input is a well-formed, non-zero EVM address:
/// `0x` followed by exactly 40 hex digits. Surrounding whitespace is
/// tolerated; checksum casing is not required.
pub fn is_valid_token_address(address: &str) -> bool {
    let address = address.trim();
    if address.len() != 42 || !address.starts_with("0x") {
        return false;
    }
    let hex = &address[2..];
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return false;
    }
    !hex.bytes().all(|b| b == b'0')
}

/// Normalizes an address string for comparisons and map keys: trimmed and
/// lowercased. Does not validate.
pub fn sanitize_token_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Parses and validates an address string, classifying the failure.
pub(crate) fn parse_token_address(address: &str) -> Result<Address, ResolutionError> {
    let trimmed = address.trim();
    let parsed = trimmed
        .parse::<Address>()
        .map_err(|_| ResolutionError::MalformedAddress {
            address: address.to_string(),
        })?;
    if parsed == Address::zero() {
        return Err(ResolutionError::ZeroAddress);
    }
    Ok(parsed)
}

/// Resolves ERC-20 metadata through a [`ChainReader`].
pub struct TokenResolver<C> {
    chain: Arc<C>,
    fetch_names: bool,
}

impl<C: ChainReader> TokenResolver<C> {
    pub fn new(chain: Arc<C>) -> Self {
        Self {
            chain,
            fetch_names: true,
        }
    }

    /// Disables (or re-enables) the optional `name()` read. Skipping it
    /// saves one call per token when names are not needed.
    pub fn with_name_fetching(mut self, fetch_names: bool) -> Self {
        self.fetch_names = fetch_names;
        self
    }

    /// Resolves a single token from its textual address.
    ///
    /// Validation errors (`MalformedAddress`, `ZeroAddress`) are returned
    /// before any network call is made.
    pub async fn get_token_data(&self, address: &str) -> Result<TokenInfo, ResolutionError> {
        let token = parse_token_address(address)?;
        self.resolve(token).await
    }

    /// Resolves a single token from an already-parsed address.
    pub async fn resolve(&self, token: Address) -> Result<TokenInfo, ResolutionError> {
        let (symbol, decimals, name) = if self.fetch_names {
            let (s, d, n) = tokio::join!(
                self.chain.token_symbol(token),
                self.chain.token_decimals(token),
                self.chain.token_name(token),
            );
            (s, d, Some(n))
        } else {
            let (s, d) = tokio::join!(
                self.chain.token_symbol(token),
                self.chain.token_decimals(token),
            );
            (s, d, None)
        };

        // Every attempted read failing means the address is not exposing an
        // ERC-20 surface at all; per-field failures are survivable.
        let all_failed = symbol.is_err()
            && decimals.is_err()
            && name.as_ref().map(|n| n.is_err()).unwrap_or(true);
        if all_failed {
            return Err(classify_unreadable(token, &symbol, &decimals, name.as_ref()));
        }

        let symbol = symbol.unwrap_or_else(|e| {
            debug!("{token:?}: symbol() failed ({e}), using {FALLBACK_SYMBOL}");
            FALLBACK_SYMBOL.to_string()
        });
        let decimals = decimals.unwrap_or_else(|e| {
            debug!("{token:?}: decimals() failed ({e}), assuming {FALLBACK_DECIMALS}");
            FALLBACK_DECIMALS
        });
        let name = name.and_then(|n| match n {
            Ok(name) => Some(name),
            Err(e) => {
                debug!("{token:?}: name() failed ({e}), omitting");
                None
            }
        });

        Ok(TokenInfo {
            address: token,
            symbol,
            decimals,
            name,
        })
    }

    /// Resolves many tokens concurrently. The output is positional: entry
    /// `i` corresponds to `addresses[i]`, with `None` for addresses that
    /// failed validation or resolution. One bad address never aborts the
    /// batch.
    pub async fn get_batch_token_data(&self, addresses: &[String]) -> Vec<Option<TokenInfo>> {
        let lookups = addresses.iter().map(|address| async move {
            match self.get_token_data(address).await {
                Ok(info) => Some(info),
                Err(e) => {
                    debug!("batch lookup of `{address}` failed: {e}");
                    None
                }
            }
        });
        future::join_all(lookups).await
    }
}

fn classify_unreadable(
    token: Address,
    symbol: &Result<String, ResolutionError>,
    decimals: &Result<u8, ResolutionError>,
    name: Option<&Result<String, ResolutionError>>,
) -> ResolutionError {
    let name_err = name.and_then(|n| n.as_ref().err());
    let reverted = symbol.as_ref().err().map_or(false, ResolutionError::is_revert)
        || decimals.as_ref().err().map_or(false, ResolutionError::is_revert)
        || name_err.map_or(false, ResolutionError::is_revert);
    let detail = if reverted {
        "not a valid ERC-20 token (calls reverted)".to_string()
    } else {
        let cause = symbol
            .as_ref()
            .err()
            .or_else(|| decimals.as_ref().err())
            .or(name_err)
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        format!("address not accessible ({cause})")
    };
    ResolutionError::NotAToken {
        address: token,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_well_formed_addresses() {
        assert!(is_valid_token_address(
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"
        ));
        assert!(is_valid_token_address(
            "  0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f  "
        ));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_token_address(""));
        assert!(!is_valid_token_address("0x123"));
        assert!(!is_valid_token_address(
            "5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f00"
        ));
        assert!(!is_valid_token_address(
            "0xZZ69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"
        ));
        // One character short.
        assert!(!is_valid_token_address(
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6"
        ));
    }

    #[test]
    fn rejects_zero_address() {
        assert!(!is_valid_token_address(
            "0x0000000000000000000000000000000000000000"
        ));
    }

    #[test]
    fn sanitize_trims_and_lowercases() {
        assert_eq!(
            sanitize_token_address(" 0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f "),
            "0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f"
        );
    }

    #[test]
    fn parse_classifies_failures() {
        assert!(matches!(
            parse_token_address("nonsense"),
            Err(ResolutionError::MalformedAddress { .. })
        ));
        assert!(matches!(
            parse_token_address("0x0000000000000000000000000000000000000000"),
            Err(ResolutionError::ZeroAddress)
        ));
        assert!(parse_token_address("0x5c69bee701ef814a2b6a3edd4b1652cb9cc5aa6f").is_ok());
    }

    #[test]
    fn name_revert_alone_marks_the_address_as_not_a_token() {
        let token = Address::from_low_u64_be(7);
        let transport = |call| ResolutionError::ContractRead {
            address: token,
            call,
            reverted: false,
            detail: "connection refused".to_string(),
        };
        let symbol: Result<String, _> = Err(transport("symbol"));
        let decimals: Result<u8, _> = Err(transport("decimals"));
        let name: Result<String, _> = Err(ResolutionError::ContractRead {
            address: token,
            call: "name",
            reverted: true,
            detail: "execution reverted".to_string(),
        });

        let err = classify_unreadable(token, &symbol, &decimals, Some(&name));
        assert!(err.to_string().contains("calls reverted"));

        // Without the name revert the same failures classify as transport.
        let err = classify_unreadable(token, &symbol, &decimals, None);
        assert!(err.to_string().contains("address not accessible"));
    }

    #[test]
    fn token_info_serializes_camel_case_and_omits_missing_name() {
        let info = TokenInfo {
            address: Address::zero(),
            symbol: "WETH".to_string(),
            decimals: 18,
            name: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.get("name").is_none());
        assert_eq!(json["symbol"], "WETH");
        assert_eq!(json["decimals"], 18);
    }
}
