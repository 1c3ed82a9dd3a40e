use super::{parse_uri, DecodeError, Decoded};
use crate::models::ProxyType;

/// Parse a Trojan link: `trojan://password@host[:port][?params][#name]`
///
/// The port defaults to 443 when omitted.
pub fn explode_trojan(rest: &str) -> Result<Decoded, DecodeError> {
    let link = parse_uri(ProxyType::Trojan, rest)?;

    // Password travels in the userinfo
    if link.url.username().is_empty() {
        return Err(DecodeError::MissingComponent("password"));
    }
    link.host()?;
    link.port(Some(443))?;

    Ok(link.into_decoded(ProxyType::Trojan))
}
