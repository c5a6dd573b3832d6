//! Pattern matchers for the two pieces of identity a document carries: the
//! 13-digit identifier in its filename and the printed Thai name in its text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Maximal runs of ASCII digits. Runs are filtered by length afterwards so that
/// a 14-digit run never yields a 13-digit identifier.
static DIGIT_RUN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+").expect("digit run regex should be valid"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex should be valid"));

// Alternation order matters: นางสาว must be tried before its prefix นาง.
static THAI_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<title>นาย|นางสาว|นาง)\s*(?P<first>[ก-๙]{2,})\s*(?P<last>[ก-๙]{2,})")
        .expect("Thai name regex should be valid")
});

/// Number of digits in a Thai national identifier.
pub const IDENTIFIER_LEN: usize = 13;

// ── Title ────────────────────────────────────────────────────────────────────

/// Thai courtesy title printed in front of a person's name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Title {
    /// นาย (Mr.)
    Nai,
    /// นางสาว (Miss)
    NangSao,
    /// นาง (Mrs.)
    Nang,
}

impl Title {
    pub const ALL: [Title; 3] = [Title::Nai, Title::NangSao, Title::Nang];

    pub fn as_str(&self) -> &'static str {
        match self {
            Title::Nai => "นาย",
            Title::NangSao => "นางสาว",
            Title::Nang => "นาง",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Identity ─────────────────────────────────────────────────────────────────

/// A person's name as printed on the document.
///
/// Both name fields hold at least two Thai-script characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub title: Title,
    pub first_name: String,
    pub last_name: String,
}

impl Identity {
    /// Returns the `(title, first, last)` triple as plain strings.
    pub fn as_parts(&self) -> (&str, &str, &str) {
        (self.title.as_str(), &self.first_name, &self.last_name)
    }
}

// ── Matchers ─────────────────────────────────────────────────────────────────

/// Collapse every whitespace run (newlines included) to one space and trim.
///
/// ```
/// # use idcard_rename::normalize;
/// assert_eq!(normalize("  นาย\n\nสมชาย \t ใจดี "), "นาย สมชาย ใจดี");
/// ```
pub fn normalize(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").trim().to_string()
}

/// Return the last run of exactly 13 digits in `filename`.
///
/// ```
/// # use idcard_rename::extract_identifier;
/// assert_eq!(
///     extract_identifier("เอกสาร_20240101_1234567890123.pdf").as_deref(),
///     Some("1234567890123")
/// );
/// assert_eq!(extract_identifier("เอกสาร_123.pdf"), None);
/// ```
pub fn extract_identifier(filename: &str) -> Option<String> {
    DIGIT_RUN_REGEX
        .find_iter(filename)
        .filter(|m| m.as_str().len() == IDENTIFIER_LEN)
        .last()
        .map(|m| m.as_str().to_string())
}

/// Find the first `title first last` sequence in `text`.
///
/// The text is normalized first, so line breaks from OCR between the title and
/// the names do not prevent a match.
pub fn extract_identity(text: &str) -> Option<Identity> {
    let normalized = normalize(text);
    let caps = THAI_NAME_REGEX.captures(&normalized)?;

    let title = Title::parse(caps.name("title")?.as_str())?;
    let first_name = caps.name("first")?.as_str().to_string();
    let last_name = caps.name("last")?.as_str().to_string();

    Some(Identity {
        title,
        first_name,
        last_name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize("\n ชื่อ   นาย\r\nสมชาย\tใจดี \n");
        assert_eq!(once, "ชื่อ นาย สมชาย ใจดี");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_empty_text() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn identifier_absent_without_thirteen_digit_run() {
        assert_eq!(extract_identifier("เอกสาร_scan.pdf"), None);
        assert_eq!(extract_identifier("เอกสาร_123456789012.pdf"), None);
        // A 14-digit run is not a 13-digit identifier.
        assert_eq!(extract_identifier("เอกสาร_12345678901234.pdf"), None);
    }

    #[test]
    fn identifier_rightmost_run_wins() {
        assert_eq!(
            extract_identifier("1111111111111_เอกสาร_2222222222222.jpg").as_deref(),
            Some("2222222222222")
        );
        assert_eq!(
            extract_identifier("เอกสาร_2024_3333333333333_7.png").as_deref(),
            Some("3333333333333")
        );
    }

    #[test]
    fn identifier_ignores_thai_digits() {
        assert_eq!(extract_identifier("เอกสาร_๑๒๓๔๕๖๗๘๙๐๑๒๓.pdf"), None);
    }

    #[test]
    fn identity_from_spaced_text() {
        let identity = extract_identity("นาย  สมชาย   ใจดี").unwrap();
        assert_eq!(identity.as_parts(), ("นาย", "สมชาย", "ใจดี"));
    }

    #[test]
    fn identity_prefers_nangsao_over_nang() {
        let identity = extract_identity("ชื่อ นางสาว สมหญิง รักไทย").unwrap();
        assert_eq!(identity.title, Title::NangSao);
        assert_eq!(identity.first_name, "สมหญิง");
        assert_eq!(identity.last_name, "รักไทย");
    }

    #[test]
    fn identity_nang_title() {
        let identity = extract_identity("นาง สมศรี มีสุข").unwrap();
        assert_eq!(identity.title, Title::Nang);
    }

    #[test]
    fn identity_across_ocr_lines() {
        let text = "บัตรประจำตัวประชาชน\nThai National ID Card\nนาย\nสมชาย\nใจดี\nName Mr. Somchai";
        let identity = extract_identity(text).unwrap();
        assert_eq!(identity.as_parts(), ("นาย", "สมชาย", "ใจดี"));
    }

    #[test]
    fn identity_leftmost_match_wins() {
        let identity = extract_identity("นาย สมชาย ใจดี และ นาง สมศรี มีสุข").unwrap();
        assert_eq!(identity.first_name, "สมชาย");
    }

    #[test]
    fn identity_absent_without_title() {
        assert_eq!(extract_identity("สมชาย ใจดี"), None);
        assert_eq!(extract_identity("Mr. Somchai Jaidee"), None);
        assert_eq!(extract_identity(""), None);
    }

    #[test]
    fn identity_requires_two_character_names() {
        assert_eq!(extract_identity("นาย ก ข"), None);
    }

    #[test]
    fn title_round_trips_through_str() {
        for title in Title::ALL {
            assert_eq!(Title::parse(title.as_str()), Some(title));
        }
        assert_eq!(Title::parse("Mr."), None);
    }
}
