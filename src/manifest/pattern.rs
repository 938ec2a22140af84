//! Manifest file names: `YYYY-MM-DD_HH-MM-SS-mmmZ.lst`, UTC, millisecond precision.
//!
//! Lexical order of these names is chronological order, which downstream
//! consumers rely on.

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

static MANIFEST_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4})-([0-9]{2})-([0-9]{2})_([0-9]{2})-([0-9]{2})-([0-9]{2})-([0-9]{3})Z\.lst$",
    )
    .expect("manifest name pattern is valid")
});

const MANIFEST_NAME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S-%3fZ.lst";

/// Helpers for the timestamped manifest file name.
pub struct ManifestName;

impl ManifestName {
    /// True if `name` is exactly a manifest file name, with no surrounding text.
    pub fn matches(name: &str) -> bool {
        MANIFEST_NAME.is_match(name)
    }

    /// Timestamp encoded in `name`, or `None` if it is not a manifest name or
    /// names an impossible date or time.
    pub fn parse(name: &str) -> Option<DateTime<Utc>> {
        let caps = MANIFEST_NAME.captures(name)?;
        let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        let year = i32::try_from(num(1)?).ok()?;
        NaiveDate::from_ymd_opt(year, num(2)?, num(3)?)?
            .and_hms_milli_opt(num(4)?, num(5)?, num(6)?, num(7)?)
            .map(|naive| naive.and_utc())
    }

    /// Canonical manifest name for `timestamp`, truncated to milliseconds.
    pub fn format(timestamp: DateTime<Utc>) -> String {
        timestamp.format(MANIFEST_NAME_FORMAT).to_string()
    }
}

/// Part of `key` to match against the manifest pattern: the key with the
/// listing prefix, and one `/` directly after it, removed.
pub fn file_name<'a>(key: &'a str, prefix: &str) -> &'a str {
    let rest = key.strip_prefix(prefix).unwrap_or(key);
    if prefix.is_empty() || prefix.ends_with('/') {
        rest
    } else {
        rest.strip_prefix('/').unwrap_or(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_canonical_name() {
        assert!(ManifestName::matches("2024-01-02_03-04-05-006Z.lst"));
    }

    #[test]
    fn rejects_near_misses() {
        for name in [
            "2024-1-2_03-04-05-006Z.lst",
            "2024-01-02_03-04-05-006Z.txt",
            "foo2024-01-02_03-04-05-006Z.lst",
            "2024-01-02_03-04-05-006Z.lst.bak",
            "2024-01-02_03-04-05-06Z.lst",
            "2024-01-02_03-04-05-006.lst",
            "2024-01-02T03-04-05-006Z.lst",
            "",
        ] {
            assert!(!ManifestName::matches(name), "{name} should not match");
        }
    }

    #[test]
    fn rejects_non_ascii_digits() {
        assert!(!ManifestName::matches("２024-01-02_03-04-05-006Z.lst"));
    }

    #[test]
    fn parses_timestamp() {
        let ts = ManifestName::parse("2024-01-02_03-04-05-006Z.lst").unwrap();
        let expected = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
            + chrono::Duration::milliseconds(6);
        assert_eq!(ts, expected);
    }

    #[test]
    fn impossible_dates_do_not_parse() {
        assert!(ManifestName::matches("2024-13-40_25-61-61-000Z.lst"));
        assert!(ManifestName::parse("2024-13-40_25-61-61-000Z.lst").is_none());
    }

    #[test]
    fn formatted_names_sort_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap()
            + chrono::Duration::milliseconds(999);
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let a = ManifestName::format(earlier);
        let b = ManifestName::format(later);
        assert_eq!(a, "2023-12-31_23-59-59-999Z.lst");
        assert_eq!(b, "2024-01-01_00-00-00-000Z.lst");
        assert!(a < b);
        assert_eq!(ManifestName::parse(&a), Some(earlier));
    }

    #[test]
    fn file_name_strips_prefix() {
        assert_eq!(file_name("lists/2024.lst", "lists/"), "2024.lst");
        assert_eq!(file_name("lists/2024.lst", "lists"), "2024.lst");
        assert_eq!(file_name("2024.lst", ""), "2024.lst");
        assert_eq!(file_name("lists/sub/2024.lst", "lists/"), "sub/2024.lst");
    }
}
