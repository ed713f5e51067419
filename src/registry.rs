//! # Protocol Registry
//!
//! Immutable, injected list of the DEX protocols the SDK queries. The
//! registry is built once, from configuration or directly by the caller,
//! and every discovery call reads the same snapshot. There is no mutable
//! global and no runtime mutation.

use crate::settings::ProtocolSettings;
use ethers::types::Address;
use log::warn;
use serde::Serialize;

/// A Uniswap V2-style DEX deployment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DexProtocol {
    pub name: String,
    pub website: String,
    /// Unset while the deployment has not published a factory; the protocol
    /// is then skipped by every lookup.
    pub factory_address: Option<Address>,
    pub router_address: Option<Address>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ProtocolRegistry {
    protocols: Vec<DexProtocol>,
}

impl ProtocolRegistry {
    pub fn new(protocols: Vec<DexProtocol>) -> Self {
        Self { protocols }
    }

    /// Builds the registry from configuration entries, parsing the textual
    /// addresses. An unparseable address is logged and treated as unset
    /// rather than failing the whole registry.
    pub fn from_settings(entries: &[ProtocolSettings]) -> Self {
        let protocols = entries
            .iter()
            .map(|entry| DexProtocol {
                name: entry.name.clone(),
                website: entry.website.clone(),
                factory_address: parse_configured_address(
                    &entry.name,
                    "factory",
                    entry.factory_address.as_deref(),
                ),
                router_address: parse_configured_address(
                    &entry.name,
                    "router",
                    entry.router_address.as_deref(),
                ),
                is_active: entry.is_active,
            })
            .collect();
        Self { protocols }
    }

    pub fn all(&self) -> &[DexProtocol] {
        &self.protocols
    }

    /// Protocols that can be queried: active and with a known factory.
    pub fn enumerable(&self) -> impl Iterator<Item = &DexProtocol> {
        self.protocols
            .iter()
            .filter(|p| p.is_active && p.factory_address.is_some())
    }

    /// Restricts to a single protocol by name when one is given; names are
    /// matched case-insensitively.
    pub fn select<'a>(&'a self, name: Option<&'a str>) -> impl Iterator<Item = &'a DexProtocol> {
        self.enumerable().filter(move |p| match name {
            Some(wanted) => p.name.eq_ignore_ascii_case(wanted),
            None => true,
        })
    }
}

fn parse_configured_address(
    protocol: &str,
    role: &str,
    raw: Option<&str>,
) -> Option<Address> {
    let raw = raw?;
    match raw.parse::<Address>() {
        Ok(address) => Some(address),
        Err(_) => {
            warn!("{protocol}: ignoring unparseable {role} address `{raw}`");
            None
        }
    }
}
