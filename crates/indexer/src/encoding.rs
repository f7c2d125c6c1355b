//! Declared-charset detection and best-effort transcoding.
//!
//! Legacy help pages declare varied legacy encodings (Shift-JIS, Windows
//! code pages). Detection improves title fidelity but must never block
//! indexing of an otherwise-valid page: every failure path degrades to
//! treating the bytes as UTF-8, silently.

use std::sync::LazyLock;

use encoding_rs::Encoding;
use regex::bytes::Regex;

/// Only this much of the document is scanned for a charset declaration.
const CHARSET_SCAN_LIMIT: usize = 4096;

/// `<meta ... charset=NAME ...>`, NAME quoted or unquoted. Runs on raw
/// bytes, so Unicode mode is off and `[^>]` matches arbitrary bytes.
static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta\s+[^>]*charset\s*=\s*["']?([a-zA-Z0-9_-]+)"#)
        .expect("charset pattern")
});

/// Decode a document's leading bytes to canonical text.
///
/// Never fails: no declaration, an unresolvable name, or a malformed byte
/// sequence all fall back to interpreting the buffer as UTF-8.
pub fn decode_header(buf: &[u8]) -> String {
    let scan = &buf[..buf.len().min(CHARSET_SCAN_LIMIT)];
    let Some(caps) = META_CHARSET_RE.captures(scan) else {
        return as_utf8(buf);
    };

    let label = String::from_utf8_lossy(&caps[1]).to_ascii_lowercase();
    if label == "utf-8" || label == "utf8" {
        return as_utf8(buf);
    }

    let Some(encoding) = resolve_encoding(&label) else {
        return as_utf8(buf);
    };

    match encoding.decode_without_bom_handling_and_without_replacement(buf) {
        Some(text) => text.into_owned(),
        None => as_utf8(buf),
    }
}

/// Resolve a case-folded charset label to an encoding.
///
/// Two-stage lookup: the WHATWG label table first (covers the
/// MIME-registered names), then IANA code-page aliases the table omits.
pub fn resolve_encoding(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label_no_replacement(label.as_bytes())
        .or_else(|| Encoding::for_label_no_replacement(code_page_alias(label)?.as_bytes()))
}

/// IANA code-page names absent from the WHATWG label table.
fn code_page_alias(label: &str) -> Option<&'static str> {
    Some(match label {
        "cp932" => "shift_jis",
        "cp936" => "gbk",
        "cp949" => "euc-kr",
        "cp950" => "big5",
        "cp874" => "windows-874",
        "cp1250" => "windows-1250",
        "cp1251" => "windows-1251",
        "cp1252" => "windows-1252",
        "cp1253" => "windows-1253",
        "cp1254" => "windows-1254",
        "cp1255" => "windows-1255",
        "cp1256" => "windows-1256",
        "cp1257" => "windows-1257",
        "cp1258" => "windows-1258",
        _ => return None,
    })
}

fn as_utf8(buf: &[u8]) -> String {
    String::from_utf8_lossy(buf).into_owned()
}
