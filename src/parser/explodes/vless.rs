use super::{parse_uri, DecodeError, Decoded};
use crate::models::ProxyType;

/// Parse a VLESS link: `vless://uuid@host:port[?params][#name]`
pub fn explode_vless(rest: &str) -> Result<Decoded, DecodeError> {
    let link = parse_uri(ProxyType::Vless, rest)?;

    link.username()?;
    link.host()?;
    link.port(None)?;

    Ok(link.into_decoded(ProxyType::Vless))
}
