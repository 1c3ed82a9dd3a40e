use super::{parse_uri, uri_dedup_key, DecodeError, Decoded};
use crate::models::ProxyType;
use crate::utils::url::{decoded_fragment, split_fragment};

/// Parse a Hysteria2 link: `hysteria2://[auth@]host[:port][/?params][#name]`
///
/// `hy2://` links are routed here as well. The port defaults to 443. The
/// port may also be a port-hopping list such as `443,5000-6000`.
pub fn explode_hysteria2(rest: &str) -> Result<Decoded, DecodeError> {
    let (body, _) = split_fragment(rest);
    if let Some((host, ports)) = hopping_authority(body) {
        if host.trim_start_matches('[').trim_end_matches(']').is_empty() {
            return Err(DecodeError::MissingComponent("host"));
        }
        check_port_list(ports)?;
        return Ok(Decoded {
            protocol: ProxyType::Hysteria2,
            fragment_name: decoded_fragment(rest),
            internal_name: None,
            dedup_key: uri_dedup_key(ProxyType::Hysteria2.scheme(), body),
        });
    }

    let link = parse_uri(ProxyType::Hysteria2, rest)?;

    link.host()?;
    link.port(Some(443))?;

    Ok(link.into_decoded(ProxyType::Hysteria2))
}

/// Returns host and port list when the authority carries a multi-port list.
fn hopping_authority(body: &str) -> Option<(&str, &str)> {
    let query_start = body.find('?').unwrap_or(body.len());
    let host_start = body[..query_start].rfind('@').map_or(0, |pos| pos + 1);
    let authority = &body[host_start..];
    let authority = &authority[..authority.find(['/', '?']).unwrap_or(authority.len())];

    let (host, ports) = authority.rsplit_once(':')?;
    // A bare IPv6 host without brackets has no port at all
    if host.contains(':') && !host.ends_with(']') {
        return None;
    }
    if ports.contains(',') || ports.contains('-') {
        Some((host, ports))
    } else {
        None
    }
}

/// Every entry must be a port or an ascending `low-high` range.
fn check_port_list(ports: &str) -> Result<(), DecodeError> {
    let parse = |port: &str| match port.trim().parse::<u16>() {
        Ok(0) | Err(_) => Err(DecodeError::MissingComponent("port")),
        Ok(port) => Ok(port),
    };

    for entry in ports.split(',') {
        match entry.split_once('-') {
            Some((low, high)) => {
                if parse(low)? > parse(high)? {
                    return Err(DecodeError::MissingComponent("port"));
                }
            }
            None => {
                parse(entry)?;
            }
        }
    }
    Ok(())
}
