//! URL encoding/decoding utilities

/// Decodes a URL-encoded string
///
/// Invalid UTF-8 sequences produced by the decoding are replaced with
/// U+FFFD rather than failing, since remarks are only used for display.
///
/// # Examples
/// ```
/// use subcategorize::utils::url::url_decode;
///
/// let decoded = url_decode("Hello%20World%21");
/// assert_eq!(decoded, "Hello World!");
/// ```
pub fn url_decode(input: &str) -> String {
    let bytes = urlencoding::decode_binary(input.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Encodes a string using URL encoding
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Splits a link at the first `#` into the part before it and the raw
/// (still encoded) fragment.
pub fn split_fragment(link: &str) -> (&str, Option<&str>) {
    match link.find('#') {
        Some(pos) => (&link[..pos], Some(&link[pos + 1..])),
        None => (link, None),
    }
}

/// Returns the decoded, trimmed fragment of a link, or `None` if the link has
/// no fragment or the fragment is blank once decoded.
pub fn decoded_fragment(link: &str) -> Option<String> {
    let (_, fragment) = split_fragment(link);
    let name = url_decode(fragment?);
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Splits a `scheme://rest` link, returning the scheme in lower case and the
/// remainder untouched.
pub fn split_scheme(link: &str) -> Option<(String, &str)> {
    let pos = link.find("://")?;
    let scheme = &link[..pos];
    if scheme.is_empty()
        || !scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
    {
        return None;
    }
    Some((scheme.to_ascii_lowercase(), &link[pos + 3..]))
}
