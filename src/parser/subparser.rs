use lazy_static::lazy_static;
use regex::Regex;

use super::explodes::wireguard::is_wireguard_ini;
use crate::utils::base64::base64_decode;

lazy_static! {
    static ref LINK_REGEX: Regex = Regex::new(
        r#"(?i)\b(?:vmess|vless|trojan|ssr|ss|tuic|hysteria2|hy2|wireguard|wg)://[^\s<>"'`]+"#
    )
    .unwrap();
}

/// Split an input blob into raw records.
///
/// Lines are split on `\n` with a trailing `\r` removed; nothing else about a
/// line is altered. Empty lines are skipped. A WireGuard INI block, from an
/// `[Interface]` header up to the first line that is not a section header,
/// `key = value` pair, comment or blank, becomes a single record with its
/// lines joined by `\n`.
///
/// If the whole blob is one base64 token that decodes to links, the decoded
/// text is split instead.
pub fn split_records(content: &str) -> Vec<String> {
    if let Some(decoded) = decode_subscription(content) {
        return split_lines(&decoded);
    }
    split_lines(content)
}

fn split_lines(content: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut ini_block: Vec<&str> = Vec::new();

    for line in content.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let trimmed = line.trim();
        let starts_block = trimmed.eq_ignore_ascii_case("[Interface]");

        if !ini_block.is_empty() {
            if !starts_block && is_ini_continuation(trimmed) {
                ini_block.push(line);
                continue;
            }
            records.push(finish_ini_block(&mut ini_block));
        }

        if starts_block {
            ini_block.push(line);
            continue;
        }

        if !line.is_empty() {
            records.push(line.to_string());
        }
    }

    if !ini_block.is_empty() {
        records.push(finish_ini_block(&mut ini_block));
    }

    records
}

fn is_ini_continuation(trimmed: &str) -> bool {
    trimmed.is_empty()
        || (trimmed.starts_with('[') && trimmed.ends_with(']'))
        || trimmed.starts_with('#')
        || (trimmed.contains('=') && !trimmed.contains("://"))
}

/// Joins the collected block, leaving trailing blank lines out.
fn finish_ini_block(block: &mut Vec<&str>) -> String {
    while block.last().is_some_and(|line| line.trim().is_empty()) {
        block.pop();
    }
    let record = block.join("\n");
    block.clear();
    record
}

/// Decode a base64 subscription body, returning `None` when the blob is not
/// a single base64 token or does not decode to anything link-shaped.
fn decode_subscription(content: &str) -> Option<String> {
    let token = content.trim();
    if token.is_empty() || token.contains("://") || is_wireguard_ini(token) {
        return None;
    }
    let decoded = base64_decode(token)?;
    if LINK_REGEX.is_match(&decoded) || is_wireguard_ini(&decoded) {
        Some(decoded)
    } else {
        None
    }
}

/// Find proxy links embedded in free text such as a scraped web page.
///
/// Links are returned in order of appearance, exactly as they occur in the
/// text up to the first whitespace, quote or angle bracket.
pub fn extract_links(text: &str) -> Vec<String> {
    LINK_REGEX
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}
