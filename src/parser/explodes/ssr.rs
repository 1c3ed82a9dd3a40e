use super::{split_fragment, DecodeError, Decoded};
use crate::models::ProxyType;
use crate::utils::base64::base64_decode;
use crate::utils::url::decoded_fragment;

/// Parse a ShadowsocksR link.
///
/// The payload is base64 of
/// `host:port:protocol:method:obfs:base64(password)/?obfsparam=..&remarks=..&group=..`
/// where every parameter value is base64 as well.
pub fn explode_ssr(rest: &str) -> Result<Decoded, DecodeError> {
    let (payload, _) = split_fragment(rest);
    let decoded = base64_decode(payload).ok_or(DecodeError::InvalidBase64)?;
    let decoded = decoded.trim();

    let (main, params) = match decoded.find("/?") {
        Some(pos) => (&decoded[..pos], &decoded[pos + 2..]),
        None => (decoded.trim_end_matches('/'), ""),
    };

    // Split from the right so an IPv6 host keeps its colons
    let parts: Vec<&str> = main.rsplitn(6, ':').collect();
    if parts.len() < 6 {
        return Err(DecodeError::MissingComponent("ssr fields"));
    }
    let (password_encoded, host) = (parts[0], parts[5]);
    let port_str = parts[4];

    let host = host.trim_start_matches('[').trim_end_matches(']');
    if host.is_empty() {
        return Err(DecodeError::MissingComponent("host"));
    }
    match port_str.parse::<u16>() {
        Ok(0) | Err(_) => return Err(DecodeError::MissingComponent("port")),
        Ok(_) => {}
    }
    base64_decode(password_encoded).ok_or(DecodeError::InvalidBase64)?;

    // Parameters are kept raw in the key, minus the cosmetic ones
    let mut internal_name = None;
    let mut kept_params = Vec::new();
    for param in params.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = param.split_once('=').unwrap_or((param, ""));
        match key {
            "remarks" => {
                internal_name = base64_decode(value)
                    .map(|name| name.trim().to_string())
                    .filter(|name| !name.is_empty());
            }
            "group" => {}
            _ => kept_params.push(param),
        }
    }

    let (host_part, tail) = main.split_at(host_end(main));
    Ok(Decoded {
        protocol: ProxyType::ShadowSocksR,
        fragment_name: decoded_fragment(rest),
        internal_name,
        dedup_key: format!(
            "ssr://{}{}/?{}",
            host_part.to_ascii_lowercase(),
            tail,
            kept_params.join("&")
        ),
    })
}

/// Byte offset of the colon that ends the host in the SSR main section.
fn host_end(main: &str) -> usize {
    let mut end = main.len();
    for _ in 0..5 {
        end = main[..end].rfind(':').unwrap_or(0);
    }
    end
}
