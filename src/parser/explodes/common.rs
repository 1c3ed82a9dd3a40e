use super::wireguard::{explode_wireguard_ini, is_wireguard_ini};
use super::{DecodeError, Decoded};
use crate::models::ProxyType;
use crate::utils::url::split_scheme;

/// Explode a proxy link into its protocol, names and identity key
///
/// This function detects the type of proxy link and calls the appropriate
/// parser. Scheme detection is case-insensitive; WireGuard INI blocks are
/// detected by their section headers.
pub fn explode(link: &str) -> Result<Decoded, DecodeError> {
    // Trim the link
    let link = link.trim();

    // Check for empty link
    if link.is_empty() {
        return Err(DecodeError::Empty);
    }

    if is_wireguard_ini(link) {
        return explode_wireguard_ini(link);
    }

    // Detect link type and call appropriate parser
    let (scheme, rest) = split_scheme(link).ok_or_else(|| {
        DecodeError::UnknownScheme(link.chars().take(12).collect())
    })?;
    let protocol =
        ProxyType::from_scheme(&scheme).ok_or(DecodeError::UnknownScheme(scheme))?;

    match protocol {
        ProxyType::Hysteria2 => super::hysteria2::explode_hysteria2(rest),
        ProxyType::ShadowSocks => super::ss::explode_ss(rest),
        ProxyType::ShadowSocksR => super::ssr::explode_ssr(rest),
        ProxyType::Trojan => super::trojan::explode_trojan(rest),
        ProxyType::Tuic => super::tuic::explode_tuic(rest),
        ProxyType::Vless => super::vless::explode_vless(rest),
        ProxyType::Vmess => super::vmess::explode_vmess(rest),
        ProxyType::WireGuard => super::wireguard::explode_wireguard(rest),
    }
}
