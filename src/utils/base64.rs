use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Standard alphabet, padding optional, trailing bits tolerated. Input is
/// mapped onto the standard alphabet before it reaches this engine.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Reverses a URL-safe Base64 string to standard Base64 format.
pub fn url_safe_base64_reverse(input: &str) -> String {
    input.replace('-', "+").replace('_', "/")
}

/// Decodes a Base64 string to raw bytes.
///
/// Accepts the standard and URL-safe alphabets, with or without padding.
/// Embedded whitespace (line-wrapped payloads) is ignored.
pub fn base64_decode_bytes(input: &str) -> Option<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let cleaned = url_safe_base64_reverse(cleaned.trim_end_matches('='));
    if cleaned.is_empty() {
        return None;
    }
    LENIENT.decode(cleaned.as_bytes()).ok()
}

/// Decodes a Base64 string to UTF-8 text.
///
/// # Returns
/// `None` if the input is not valid Base64 or the payload is not valid UTF-8.
pub fn base64_decode(input: &str) -> Option<String> {
    base64_decode_bytes(input).and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Encodes a string to standard, padded Base64.
pub fn base64_encode(input: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(input)
}

/// Encodes a string to URL-safe Base64 without padding.
pub fn url_safe_base64_encode(input: &str) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(input)
}
