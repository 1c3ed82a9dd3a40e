//! Proxy record definitions
//!
//! Contains the core data structures produced by the decoder and consumed by
//! the filter, matcher, deduplicator and aggregator.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Represents the protocol family of a proxy link.
/// This is the canonical enum used for protocol identification across the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum ProxyType {
    Hysteria2,
    ShadowSocks,
    ShadowSocksR,
    Trojan,
    Tuic,
    Vless,
    Vmess,
    WireGuard,
}

impl ProxyType {
    /// Every protocol, in the order used for reports and output files.
    pub const ALL: [ProxyType; 8] = [
        ProxyType::Hysteria2,
        ProxyType::ShadowSocks,
        ProxyType::ShadowSocksR,
        ProxyType::Trojan,
        ProxyType::Tuic,
        ProxyType::Vless,
        ProxyType::Vmess,
        ProxyType::WireGuard,
    ];

    /// Human-readable name, also used as the artifact file stem.
    pub fn as_str(self) -> &'static str {
        match self {
            ProxyType::Hysteria2 => "Hysteria2",
            ProxyType::ShadowSocks => "ShadowSocks",
            ProxyType::ShadowSocksR => "ShadowSocksR",
            ProxyType::Trojan => "Trojan",
            ProxyType::Tuic => "Tuic",
            ProxyType::Vless => "Vless",
            ProxyType::Vmess => "Vmess",
            ProxyType::WireGuard => "WireGuard",
        }
    }

    /// Canonical lower-case URI scheme, used as the dedup key prefix so that
    /// scheme aliases (`hy2`, `wg`) collapse onto one identity.
    pub fn scheme(self) -> &'static str {
        match self {
            ProxyType::Hysteria2 => "hysteria2",
            ProxyType::ShadowSocks => "ss",
            ProxyType::ShadowSocksR => "ssr",
            ProxyType::Trojan => "trojan",
            ProxyType::Tuic => "tuic",
            ProxyType::Vless => "vless",
            ProxyType::Vmess => "vmess",
            ProxyType::WireGuard => "wireguard",
        }
    }

    /// Maps a lower-cased URI scheme onto a protocol.
    pub fn from_scheme(scheme: &str) -> Option<ProxyType> {
        match scheme {
            "hysteria2" | "hy2" => Some(ProxyType::Hysteria2),
            "ss" => Some(ProxyType::ShadowSocks),
            "ssr" => Some(ProxyType::ShadowSocksR),
            "trojan" => Some(ProxyType::Trojan),
            "tuic" => Some(ProxyType::Tuic),
            "vless" => Some(ProxyType::Vless),
            "vmess" => Some(ProxyType::Vmess),
            "wg" | "wireguard" => Some(ProxyType::WireGuard),
            _ => None,
        }
    }

    /// Whether a protocol name such as `"Vmess"` belongs to the enumeration.
    /// Used to skip protocol categories in legacy keyword tables.
    pub fn is_protocol_name(name: &str) -> bool {
        ProxyType::ALL
            .iter()
            .any(|p| p.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One decoded connection link.
///
/// `raw_link` is the input line exactly as received and is what gets written
/// to every artifact; nothing in the pipeline re-encodes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyRecord {
    pub protocol: ProxyType,
    pub raw_link: Arc<str>,
    pub remark: Option<String>,
    /// Codes of matched countries, unique, in country table order.
    pub matched_countries: Vec<String>,
    pub dedup_key: String,
}

impl ProxyRecord {
    pub fn new(
        protocol: ProxyType,
        raw_link: impl Into<Arc<str>>,
        remark: Option<String>,
        dedup_key: String,
    ) -> Self {
        ProxyRecord {
            protocol,
            raw_link: raw_link.into(),
            remark,
            matched_countries: Vec::new(),
            dedup_key,
        }
    }
}
