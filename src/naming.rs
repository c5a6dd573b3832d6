//! The `{title}_{first}_{last}_{id}[_{n}].{ext}` naming convention.
//!
//! Files named this way are what the upload relay accepts, so [`CanonicalName`]
//! doubles as a pre-flight check for a renamed folder.

use crate::patterns::{Identity, Title};
use once_cell::sync::Lazy;
use regex::Regex;

static CANONICAL_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<title>นาย|นางสาว|นาง)_(?P<first>[ก-๙]{2,})_(?P<last>[ก-๙]{2,})_(?P<id>[0-9]{13})(?:_(?P<suffix>[1-9][0-9]*))?(?:\.(?P<ext>[A-Za-z0-9]+))?$",
    )
    .expect("canonical name regex should be valid")
});

/// Replace characters that would break a path with `-`.
pub fn sanitize_segment(value: &str) -> String {
    value.replace('/', "-")
}

/// Build the canonical stem for a person, before collision resolution.
///
/// ```
/// # use idcard_rename::{canonical_base, Identity, Title};
/// let identity = Identity {
///     title: Title::Nai,
///     first_name: "สมชาย".into(),
///     last_name: "ใจดี".into(),
/// };
/// assert_eq!(canonical_base(&identity, "1234567890123"), "นาย_สมชาย_ใจดี_1234567890123");
/// ```
pub fn canonical_base(identity: &Identity, identifier: &str) -> String {
    let (title, first, last) = identity.as_parts();
    [title, first, last, identifier]
        .iter()
        .map(|part| sanitize_segment(part))
        .collect::<Vec<_>>()
        .join("_")
}

/// Assemble a file name from a stem, an optional collision counter and an
/// extension. An empty extension produces no trailing dot.
pub(crate) fn compose_file_name(base: &str, suffix: Option<u32>, extension: &str) -> String {
    let mut name = match suffix {
        Some(n) => format!("{base}_{n}"),
        None => base.to_string(),
    };
    if !extension.is_empty() {
        name.push('.');
        name.push_str(extension);
    }
    name
}

// ── CanonicalName ────────────────────────────────────────────────────────────

/// A file name that follows the naming convention, split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalName {
    pub identity: Identity,
    pub identifier: String,
    /// Collision counter, `None` for the unsuffixed name.
    pub suffix: Option<u32>,
    /// Extension as written, `None` when the name has none.
    pub extension: Option<String>,
}

impl CanonicalName {
    /// Parse `file_name`, returning `None` if it does not follow the
    /// convention.
    ///
    /// ```
    /// # use idcard_rename::CanonicalName;
    /// let name = CanonicalName::parse("นาย_สมชาย_ใจดี_1234567890123_2.pdf").unwrap();
    /// assert_eq!(name.suffix, Some(2));
    /// assert!(CanonicalName::parse("เอกสาร_1234567890123.pdf").is_none());
    /// ```
    pub fn parse(file_name: &str) -> Option<Self> {
        let caps = CANONICAL_NAME_REGEX.captures(file_name)?;

        let identity = Identity {
            title: Title::parse(caps.name("title")?.as_str())?,
            first_name: caps.name("first")?.as_str().to_string(),
            last_name: caps.name("last")?.as_str().to_string(),
        };
        let suffix = match caps.name("suffix") {
            Some(m) => Some(m.as_str().parse().ok()?),
            None => None,
        };

        Some(Self {
            identity,
            identifier: caps.name("id")?.as_str().to_string(),
            suffix,
            extension: caps.name("ext").map(|m| m.as_str().to_string()),
        })
    }

    /// The stem without collision counter or extension.
    pub fn base(&self) -> String {
        canonical_base(&self.identity, &self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn somchai() -> Identity {
        Identity {
            title: Title::Nai,
            first_name: "สมชาย".into(),
            last_name: "ใจดี".into(),
        }
    }

    #[test]
    fn base_replaces_slashes() {
        let identity = Identity {
            title: Title::Nang,
            first_name: "สม/ศรี".into(),
            last_name: "มีสุข".into(),
        };
        assert_eq!(canonical_base(&identity, "1234567890123"), "นาง_สม-ศรี_มีสุข_1234567890123");
    }

    #[test]
    fn compose_with_and_without_suffix() {
        assert_eq!(compose_file_name("a_b", None, "pdf"), "a_b.pdf");
        assert_eq!(compose_file_name("a_b", Some(3), "jpg"), "a_b_3.jpg");
        assert_eq!(compose_file_name("a_b", Some(1), ""), "a_b_1");
    }

    #[test]
    fn parse_unsuffixed_name() {
        let name = CanonicalName::parse("นาย_สมชาย_ใจดี_1234567890123.pdf").unwrap();
        assert_eq!(name.identity, somchai());
        assert_eq!(name.identifier, "1234567890123");
        assert_eq!(name.suffix, None);
        assert_eq!(name.extension.as_deref(), Some("pdf"));
        assert_eq!(name.base(), "นาย_สมชาย_ใจดี_1234567890123");
    }

    #[test]
    fn parse_nangsao_with_suffix_and_no_extension() {
        let name = CanonicalName::parse("นางสาว_สมหญิง_รักไทย_9876543210987_12").unwrap();
        assert_eq!(name.identity.title, Title::NangSao);
        assert_eq!(name.suffix, Some(12));
        assert_eq!(name.extension, None);
    }

    #[test]
    fn parse_rejects_non_conforming_names() {
        for bad in [
            "เอกสาร_1234567890123.pdf",
            "นาย_สมชาย_ใจดี_123456789012.pdf",
            "นาย_สมชาย_ใจดี_12345678901234.pdf",
            "Mr_Somchai_Jaidee_1234567890123.pdf",
            "นาย_สมชาย_1234567890123.pdf",
            "นาย_สมชาย_ใจดี_1234567890123_0.pdf",
        ] {
            assert!(CanonicalName::parse(bad).is_none(), "accepted {bad}");
        }
    }

    #[test]
    fn composed_names_parse_back() {
        let base = canonical_base(&somchai(), "1234567890123");
        let name = compose_file_name(&base, Some(4), "png");
        let parsed = CanonicalName::parse(&name).unwrap();
        assert_eq!(parsed.base(), base);
        assert_eq!(parsed.suffix, Some(4));
    }
}
