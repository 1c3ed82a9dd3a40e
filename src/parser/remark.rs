use super::explodes::Decoded;

/// Pick the display name used for classification.
///
/// The link fragment wins over any name stored inside the payload. Both
/// have already been decoded and trimmed, and blanks were turned into
/// `None` by the decoders. When neither exists the record stays nameless and
/// is only bucketed by protocol.
pub fn resolve_remark(decoded: &Decoded) -> Option<String> {
    decoded
        .fragment_name
        .clone()
        .or_else(|| decoded.internal_name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProxyType;

    fn decoded(fragment: Option<&str>, internal: Option<&str>) -> Decoded {
        Decoded {
            protocol: ProxyType::Vmess,
            fragment_name: fragment.map(str::to_string),
            internal_name: internal.map(str::to_string),
            dedup_key: String::new(),
        }
    }

    #[test]
    fn test_fragment_takes_precedence() {
        assert_eq!(
            resolve_remark(&decoded(Some("frag"), Some("inner"))).as_deref(),
            Some("frag")
        );
    }

    #[test]
    fn test_falls_back_to_internal_name() {
        assert_eq!(
            resolve_remark(&decoded(None, Some("inner"))).as_deref(),
            Some("inner")
        );
    }

    #[test]
    fn test_absent_when_nothing_resolves() {
        assert_eq!(resolve_remark(&decoded(None, None)), None);
    }
}
