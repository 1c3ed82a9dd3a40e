//! Per-protocol link decoders
//!
//! Every decoder turns the text of one link into a [`Decoded`] value or a
//! [`DecodeError`]. [`explode`] detects the protocol and dispatches.

mod common;
pub mod hysteria2;
pub mod ss;
pub mod ssr;
pub mod trojan;
pub mod tuic;
pub mod vless;
pub mod vmess;
pub mod wireguard;

pub use common::explode;

use thiserror::Error;
use url::Url;

use crate::models::ProxyType;
use crate::utils::url::{decoded_fragment, split_fragment};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty line")]
    Empty,

    #[error("unknown scheme: {0}")]
    UnknownScheme(String),

    #[error("invalid base64 payload")]
    InvalidBase64,

    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("malformed URI: {0}")]
    MalformedUri(String),

    #[error("missing required component: {0}")]
    MissingComponent(&'static str),

    #[error("malformed WireGuard config: {0}")]
    MalformedIni(String),
}

impl DecodeError {
    /// Stable label used to count failures by kind.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::Empty => "empty",
            DecodeError::UnknownScheme(_) => "unknown_scheme",
            DecodeError::InvalidBase64 => "invalid_base64",
            DecodeError::MalformedJson(_) => "malformed_json",
            DecodeError::MalformedUri(_) => "malformed_uri",
            DecodeError::MissingComponent(_) => "missing_component",
            DecodeError::MalformedIni(_) => "malformed_ini",
        }
    }
}

/// What the decoder recovers from one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub protocol: ProxyType,
    /// Percent-decoded `#fragment`, if non-blank.
    pub fragment_name: Option<String>,
    /// Name stored inside an opaque payload (VMess `ps`, SSR `remarks`).
    pub internal_name: Option<String>,
    pub dedup_key: String,
}

/// A URI-shaped link after validation by the `url` crate.
pub(crate) struct UriLink {
    pub url: Url,
    pub fragment_name: Option<String>,
    pub dedup_key: String,
}

impl UriLink {
    pub fn host(&self) -> Result<&str, DecodeError> {
        match self.url.host_str() {
            Some(host) if !host.is_empty() => Ok(host),
            _ => Err(DecodeError::MissingComponent("host")),
        }
    }

    /// Port from the URI, falling back to `default` when absent. Port 0 is
    /// never valid.
    pub fn port(&self, default: Option<u16>) -> Result<u16, DecodeError> {
        match self.url.port().or(default) {
            Some(0) | None => Err(DecodeError::MissingComponent("port")),
            Some(port) => Ok(port),
        }
    }

    pub fn username(&self) -> Result<&str, DecodeError> {
        match self.url.username() {
            "" => Err(DecodeError::MissingComponent("user")),
            user => Ok(user),
        }
    }

    pub fn into_decoded(self, protocol: ProxyType) -> Decoded {
        Decoded {
            protocol,
            fragment_name: self.fragment_name,
            internal_name: None,
            dedup_key: self.dedup_key,
        }
    }
}

/// Parses `rest` (the link after `scheme://`) as a URI of the given protocol.
pub(crate) fn parse_uri(protocol: ProxyType, rest: &str) -> Result<UriLink, DecodeError> {
    let (body, _) = split_fragment(rest);
    let url = Url::parse(&format!("{}://{}", protocol.scheme(), body))
        .map_err(|e| DecodeError::MalformedUri(e.to_string()))?;

    Ok(UriLink {
        url,
        fragment_name: decoded_fragment(rest),
        dedup_key: uri_dedup_key(protocol.scheme(), body),
    })
}

/// Builds the identity key of a URI link body (fragment already removed).
///
/// The scheme is canonical and the host is lower-cased; credentials, path and
/// query are kept verbatim. A bare `/` between authority and query is dropped.
pub(crate) fn uri_dedup_key(scheme: &str, body: &str) -> String {
    // Userinfo may hold '/' (standard base64), so the host starts after the
    // last '@' that precedes the query.
    let query_start = body.find('?').unwrap_or(body.len());
    let host_start = body[..query_start].rfind('@').map_or(0, |pos| pos + 1);
    let authority_end = body[host_start..]
        .find(['/', '?'])
        .map_or(body.len(), |pos| host_start + pos);
    let (authority, tail) = body.split_at(authority_end);
    let (userinfo, host_port) = authority.split_at(host_start);

    let tail = if tail == "/" {
        ""
    } else if tail.starts_with("/?") {
        &tail[1..]
    } else {
        tail
    };

    format!(
        "{}://{}{}{}",
        scheme,
        userinfo,
        host_port.to_ascii_lowercase(),
        tail
    )
}

/// Splits `host:port`, accepting a bracketed IPv6 host.
pub(crate) fn split_host_port(input: &str) -> Result<(String, u16), DecodeError> {
    let (host, port) = input
        .rsplit_once(':')
        .ok_or(DecodeError::MissingComponent("port"))?;
    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(DecodeError::MissingComponent("host"));
    }
    match port.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(DecodeError::MissingComponent("port")),
        Ok(port) => Ok((host.to_string(), port)),
    }
}
