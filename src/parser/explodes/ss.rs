use super::{split_host_port, uri_dedup_key, DecodeError, Decoded};
use crate::models::ProxyType;
use crate::utils::base64::base64_decode;
use crate::utils::url::{decoded_fragment, split_fragment, url_decode};

/// Parse a Shadowsocks link.
///
/// Handles SIP002 (`ss://base64(method:password)@host:port/?plugin=..#name`),
/// plain userinfo (`ss://method:password@host:port#name`, used by 2022 ciphers)
/// and the legacy form (`ss://base64(method:password@host:port)#name`).
pub fn explode_ss(rest: &str) -> Result<Decoded, DecodeError> {
    let (body, _) = split_fragment(rest);

    // Extract plugin and other query parameters
    let main = match body.find('?') {
        Some(pos) => &body[..pos],
        None => body,
    };
    let main = main.trim_end_matches('/');

    let dedup_key = if let Some((userinfo, server)) = main.rsplit_once('@') {
        // SIP002 format (method:password@server:port)
        let secret = url_decode(userinfo);
        let method_pass = if secret.contains(':') {
            secret
        } else {
            base64_decode(&secret).ok_or(DecodeError::InvalidBase64)?
        };
        check_method_password(&method_pass)?;
        split_host_port(server)?;
        uri_dedup_key(ProxyType::ShadowSocks.scheme(), body)
    } else {
        // Legacy format, everything up to the query is base64
        let decoded = base64_decode(main).ok_or(DecodeError::InvalidBase64)?;
        let (method_pass, server) = decoded
            .rsplit_once('@')
            .ok_or(DecodeError::MissingComponent("host"))?;
        check_method_password(method_pass)?;
        split_host_port(server)?;
        format!("{}://{}", ProxyType::ShadowSocks.scheme(), body)
    };

    Ok(Decoded {
        protocol: ProxyType::ShadowSocks,
        fragment_name: decoded_fragment(rest),
        internal_name: None,
        dedup_key,
    })
}

fn check_method_password(method_pass: &str) -> Result<(), DecodeError> {
    match method_pass.split_once(':') {
        Some((method, _)) if !method.trim().is_empty() => Ok(()),
        _ => Err(DecodeError::MissingComponent("method")),
    }
}
