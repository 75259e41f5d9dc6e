//! Sample value validators for type inference.

use std::{
    net::IpAddr,
    sync::LazyLock
};

use regex::Regex;

static DECIMAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("valid regex"));

static FLOAT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:[+-]?(?:\d+\.?\d*|\.\d+)(?:e[+-]?\d+)?|[+-]?inf(?:inity)?|nan)$")
        .expect("valid regex")
});

static MONEY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[$€£¥]\s?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{1,2})?|(?:\d{1,3}(?:,\d{3})+|\d+)\.\d{2})$")
        .expect("valid regex")
});

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid regex"));

static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)(?::([0-5]\d)(?:\.\d{1,9})?)?$").expect("valid regex")
});

static DATETIME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[ T](\d{2}:\d{2}(?::\d{2}(?:\.\d{1,9})?)?)(Z|[+-]\d{2}(?::?\d{2})?)?$")
        .expect("valid regex")
});

static INTERVAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:P(?:\d+Y)?(?:\d+M)?(?:\d+W)?(?:\d+D)?(?:T(?:\d+H)?(?:\d+M)?(?:\d+(?:\.\d+)?S)?)?|(?:[+-]?\d+\s*(?:years?|mons?|months?|weeks?|days?|hours?|minutes?|mins?|seconds?|secs?)\s*)+)$"
    )
    .expect("valid regex")
});

static HEX_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:0x|\\x)[0-9a-fA-F]+$").expect("valid regex"));

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{?[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\}?$")
        .expect("valid regex")
});

static MAC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{2}(?:[:-][0-9a-fA-F]{2}){5}(?:(?:[:-][0-9a-fA-F]{2}){2})?$")
        .expect("valid regex")
});

static WKT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:SRID=\d+;)?(?:POINT|LINESTRING|POLYGON|MULTIPOINT|MULTILINESTRING|MULTIPOLYGON|GEOMETRYCOLLECTION)\s*(?:Z|M|ZM)?\s*\(.*\)$"
    )
    .expect("valid regex")
});

static POINT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:\(\s*[+-]?\d+(?:\.\d+)?\s*,\s*[+-]?\d+(?:\.\d+)?\s*\)|POINT\s*\(\s*[+-]?\d+(?:\.\d+)?\s+[+-]?\d+(?:\.\d+)?\s*\))$")
        .expect("valid regex")
});

/// How a sample value must look to count as evidence for a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Whole number within the inclusive range
    Integer { min: i128, max: i128 },
    Decimal,
    Float,
    /// Currency symbol or exactly two decimal places
    Money,
    Boolean,
    Date,
    Time,
    DateTime,
    /// Date-time carrying an explicit offset or `Z`
    DateTimeTz,
    Interval,
    /// Any text up to `max_len` characters
    Text { max_len: Option<usize> },
    Hex,
    Json,
    Xml,
    Uuid,
    IpAddress,
    Cidr,
    MacAddress,
    Wkt,
    Point,
    /// PostgreSQL array literal `{a,b}`
    PgArray
}

impl SampleFormat {
    /// Whether `value` (already trimmed) fits this format.
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Integer {
                min,
                max
            } => {
                let digits = value.strip_prefix('+').unwrap_or(value);
                digits
                    .parse::<i128>()
                    .is_ok_and(|n| (min..=max).contains(&n))
            }
            Self::Decimal => DECIMAL_REGEX.is_match(value),
            Self::Float => FLOAT_REGEX.is_match(value),
            Self::Money => MONEY_REGEX.is_match(value),
            Self::Boolean => matches!(
                value.to_ascii_lowercase().as_str(),
                "true" | "false" | "t" | "f" | "yes" | "no" | "y" | "n" | "0" | "1"
            ),
            Self::Date => is_valid_date(value),
            Self::Time => TIME_REGEX.is_match(value),
            Self::DateTime => DATETIME_REGEX
                .captures(value)
                .is_some_and(|c| c.get(1).is_some_and(|d| is_valid_date(d.as_str()))),
            Self::DateTimeTz => DATETIME_REGEX.captures(value).is_some_and(|c| {
                c.get(3).is_some() && c.get(1).is_some_and(|d| is_valid_date(d.as_str()))
            }),
            Self::Interval => INTERVAL_REGEX.is_match(value) && value.len() > 1,
            Self::Text {
                max_len
            } => max_len.is_none_or(|max| value.chars().count() <= max),
            Self::Hex => HEX_REGEX.is_match(value),
            Self::Json => {
                (value.starts_with('{') || value.starts_with('['))
                    && serde_json::from_str::<serde_json::Value>(value).is_ok()
            }
            Self::Xml => {
                value.starts_with('<')
                    && value.ends_with('>')
                    && (value.contains("</") || value.ends_with("/>"))
            }
            Self::Uuid => UUID_REGEX.is_match(value),
            Self::IpAddress => value.parse::<IpAddr>().is_ok(),
            Self::Cidr => value.split_once('/').is_some_and(|(addr, prefix)| {
                let Ok(ip) = addr.parse::<IpAddr>() else {
                    return false;
                };
                let max_prefix = if ip.is_ipv4() { 32 } else { 128 };
                prefix.parse::<u8>().is_ok_and(|p| p <= max_prefix)
            }),
            Self::MacAddress => MAC_REGEX.is_match(value),
            Self::Wkt => WKT_REGEX.is_match(value),
            Self::Point => POINT_REGEX.is_match(value),
            Self::PgArray => value.starts_with('{') && value.ends_with('}') && !Self::Json.accepts(value)
        }
    }
}

fn is_valid_date(value: &str) -> bool {
    let Some(caps) = DATE_REGEX.captures(value) else {
        return false;
    };
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
    match (part(1), part(2), part(3)) {
        (Some(year), Some(month), Some(day)) => {
            let max_day = match month {
                1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
                4 | 6 | 9 | 11 => 30,
                2 if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) => 29,
                2 => 28,
                _ => return false
            };
            (1..=max_day).contains(&day)
        }
        _ => false
    }
}
