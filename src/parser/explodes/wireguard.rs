use super::{parse_uri, split_host_port, DecodeError, Decoded};
use crate::models::ProxyType;

/// Whether the text looks like a WireGuard INI config rather than a URI.
pub fn is_wireguard_ini(text: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim();
        line.eq_ignore_ascii_case("[Interface]") || line.eq_ignore_ascii_case("[Peer]")
    })
}

/// Parse a WireGuard link: `wg://` or `wireguard://[privatekey@]host[:port][?params][#name]`
///
/// The port defaults to 51820.
pub fn explode_wireguard(rest: &str) -> Result<Decoded, DecodeError> {
    let link = parse_uri(ProxyType::WireGuard, rest)?;

    link.host()?;
    link.port(Some(51820))?;

    Ok(link.into_decoded(ProxyType::WireGuard))
}

/// Parse a WireGuard INI block with `[Interface]` and `[Peer]` sections.
///
/// INI configs carry no display name. The identity key is the config with
/// comments and blank lines removed.
pub fn explode_wireguard_ini(config: &str) -> Result<Decoded, DecodeError> {
    let mut section = String::new();
    let mut private_key = false;
    let mut public_key = false;
    let mut endpoint = false;
    let mut normalized = Vec::new();

    for line in config.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        // Check section headers
        if line.starts_with('[') && line.ends_with(']') {
            section = line.to_ascii_lowercase();
            normalized.push(line.to_string());
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| DecodeError::MalformedIni(format!("not a key/value line: {}", line)))?;
        let key = key.trim();
        let value = value.trim();
        normalized.push(format!("{} = {}", key, value));

        match (section.as_str(), key) {
            ("[interface]", "PrivateKey") => private_key = !value.is_empty(),
            ("[peer]", "PublicKey") => public_key = !value.is_empty(),
            ("[peer]", "Endpoint") => {
                split_host_port(value)?;
                endpoint = true;
            }
            ("", _) => {
                return Err(DecodeError::MalformedIni(
                    "key outside of a section".to_string(),
                ))
            }
            _ => {}
        }
    }

    // Validate required fields
    if !private_key {
        return Err(DecodeError::MissingComponent("PrivateKey"));
    }
    if !public_key {
        return Err(DecodeError::MissingComponent("PublicKey"));
    }
    if !endpoint {
        return Err(DecodeError::MissingComponent("Endpoint"));
    }

    Ok(Decoded {
        protocol: ProxyType::WireGuard,
        fragment_name: None,
        internal_name: None,
        dedup_key: format!("wireguard-ini://{}", normalized.join("\n")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = "[Interface]\n\
        PrivateKey = yAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk=\n\
        Address = 10.0.0.2/32\n\
        DNS = 1.1.1.1\n\
        \n\
        # peer section\n\
        [Peer]\n\
        PublicKey = xTIBA5rboUvnH4htodjb6e697QjLERt1NAB4mZqp8Dg=\n\
        AllowedIPs = 0.0.0.0/0\n\
        Endpoint = 162.159.192.1:2408\n";

    #[test]
    fn test_is_wireguard_ini() {
        assert!(is_wireguard_ini(CONFIG));
        assert!(!is_wireguard_ini("wg://host:51820"));
    }

    #[test]
    fn test_explode_wireguard_ini() {
        let decoded = explode_wireguard_ini(CONFIG).unwrap();
        assert_eq!(decoded.protocol, ProxyType::WireGuard);
        assert_eq!(decoded.fragment_name, None);
        assert!(!decoded.dedup_key.contains("peer section"));
    }

    #[test]
    fn test_explode_wireguard_ini_whitespace_insensitive_key() {
        let squeezed = CONFIG.replace(" = ", "=");
        assert_eq!(
            explode_wireguard_ini(&squeezed).unwrap().dedup_key,
            explode_wireguard_ini(CONFIG).unwrap().dedup_key
        );
    }

    #[test]
    fn test_explode_wireguard_ini_missing_fields() {
        let no_endpoint = CONFIG.replace("Endpoint = 162.159.192.1:2408\n", "");
        assert_eq!(
            explode_wireguard_ini(&no_endpoint),
            Err(DecodeError::MissingComponent("Endpoint"))
        );
        assert!(matches!(
            explode_wireguard_ini("[Interface]\ngarbage line"),
            Err(DecodeError::MalformedIni(_))
        ));
    }

    #[test]
    fn test_explode_wireguard_uri() {
        let decoded =
            explode_wireguard("cHJpdmF0ZQ@Engage.Cloudflareclient.com:2408?publickey=abc#WARP%20DE")
                .unwrap();
        assert_eq!(decoded.fragment_name.as_deref(), Some("WARP DE"));
        assert_eq!(
            decoded.dedup_key,
            "wireguard://cHJpdmF0ZQ@engage.cloudflareclient.com:2408?publickey=abc"
        );
    }
}
