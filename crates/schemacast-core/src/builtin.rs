//! # Built-in Formats
//!
//! The formats every [`FormatRegistry`](crate::FormatRegistry) starts with:
//!
//! | symbol | decodes to | accepts |
//! |---|---|---|
//! | `uuid` | [`Value::Uuid`] | hyphenated, simple, braced or URN form |
//! | `date-time` | [`Value::DateTime`] / [`Value::LocalDateTime`] | RFC 3339, ISO 8601 with or without offset, bare date |
//! | `time` | [`Value::Time`] | `HH:MM[:SS[.f]]` with optional `Z`/`±HH:MM` |
//! | `date` | [`Value::Date`] | `YYYY-MM-DD` |
//! | `duration` | [`Value::Duration`] | ISO 8601 duration |
//! | `email` | [`Value::String`] | anything containing `@` |
//! | `ipv4` | [`Value::Ipv4`] | dotted quad |
//! | `ipv6` | [`Value::Ipv6`] | RFC 4291 text form |
//! | `hostname` | [`Value::String`] | fully-qualified domain name |
//! | `binary` | [`Value::Bytes`] | standard base64 |

use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone};
use uuid::Uuid;

use crate::duration::IsoDuration;
use crate::error::FormatError;
use crate::format::Format;
use crate::value::{TimeOfDay, Value};

/// All built-in formats, in table order.
pub fn all() -> Vec<Arc<dyn Format>> {
    vec![
        Arc::new(UuidFormat),
        Arc::new(DateTimeFormat),
        Arc::new(TimeFormat),
        Arc::new(DateFormat),
        Arc::new(DurationFormat),
        Arc::new(EmailFormat),
        Arc::new(Ipv4Format),
        Arc::new(Ipv6Format),
        Arc::new(HostnameFormat),
        Arc::new(BinaryFormat),
    ]
}

fn wrong_variant(format: &str, value: &Value) -> FormatError {
    FormatError::new(format, format!("cannot encode a {} value", value.type_name()))
}

// ---------------------------------------------------------------------------
// uuid
// ---------------------------------------------------------------------------

/// `uuid` — RFC 4122 identifiers, encoded in lower-case hyphenated form.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidFormat;

impl Format for UuidFormat {
    fn symbol(&self) -> &str {
        "uuid"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        Uuid::parse_str(raw)
            .map(Value::Uuid)
            .map_err(|e| FormatError::new("uuid", e.to_string()))
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Uuid(id) => Ok(id.hyphenated().to_string()),
            other => Err(wrong_variant("uuid", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// date-time
// ---------------------------------------------------------------------------

/// `date-time` — timestamps with an offset decode to [`Value::DateTime`];
/// timestamps without one decode to [`Value::LocalDateTime`]. A bare date is
/// midnight local time. Offsets may be `Z`, `±HH:MM` or `±HHMM`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeFormat;

impl Format for DateTimeFormat {
    fn symbol(&self) -> &str {
        "date-time"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Value::DateTime(dt));
        }
        let invalid =
            || FormatError::new("date-time", format!("invalid ISO 8601 timestamp {raw:?}"));

        let date = raw
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or_else(invalid)?;
        let rest = &raw[10..];
        if rest.is_empty() {
            return date
                .and_hms_opt(0, 0, 0)
                .map(Value::LocalDateTime)
                .ok_or_else(invalid);
        }
        let time = rest.strip_prefix(['T', 't', ' ']).ok_or_else(invalid)?;
        let (base, offset) = split_offset(time).map_err(|e| FormatError::new("date-time", e))?;
        let local = date.and_time(parse_time(base).ok_or_else(invalid)?);
        match offset {
            Some(offset) => offset
                .from_local_datetime(&local)
                .single()
                .map(Value::DateTime)
                .ok_or_else(invalid),
            None => Ok(Value::LocalDateTime(local)),
        }
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::DateTime(dt) => Ok(dt.to_rfc3339()),
            Value::LocalDateTime(dt) => Ok(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            other => Err(wrong_variant("date-time", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// time
// ---------------------------------------------------------------------------

/// Split a trailing `Z` or `±HH:MM` / `±HHMM` offset off a time string.
fn split_offset(raw: &str) -> Result<(&str, Option<FixedOffset>), String> {
    if let Some(base) = raw.strip_suffix('Z').or_else(|| raw.strip_suffix('z')) {
        return Ok((base, FixedOffset::east_opt(0)));
    }
    let Some(pos) = raw.rfind(|c: char| c == '+' || c == '-') else {
        return Ok((raw, None));
    };
    let (base, offset) = raw.split_at(pos);
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    let digits: String = offset[1..].chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(format!("invalid UTC offset {offset:?}"));
    }
    let hours: i32 = digits[..2].parse().map_err(|_| format!("invalid UTC offset {offset:?}"))?;
    let minutes: i32 = digits[2..].parse().map_err(|_| format!("invalid UTC offset {offset:?}"))?;
    let offset = FixedOffset::east_opt(sign * (hours * 3_600 + minutes * 60))
        .ok_or_else(|| format!("UTC offset {offset:?} out of range"))?;
    Ok((base, Some(offset)))
}

/// `HH:MM:SS[.f]` or `HH:MM`.
fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// `time` — time of day with an optional offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeFormat;

impl Format for TimeFormat {
    fn symbol(&self) -> &str {
        "time"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        let (base, offset) = split_offset(raw).map_err(|e| FormatError::new("time", e))?;
        let time = parse_time(base)
            .ok_or_else(|| FormatError::new("time", format!("invalid time {raw:?}")))?;
        Ok(Value::Time(TimeOfDay { time, offset }))
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Time(t) => Ok(t.to_string()),
            other => Err(wrong_variant("time", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// date
// ---------------------------------------------------------------------------

/// `date` — calendar date, `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormat;

impl Format for DateFormat {
    fn symbol(&self) -> &str {
        "date"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|e| FormatError::new("date", format!("invalid date {raw:?}: {e}")))
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Date(d) => Ok(d.format("%Y-%m-%d").to_string()),
            other => Err(wrong_variant("date", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// duration
// ---------------------------------------------------------------------------

/// `duration` — ISO 8601 duration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DurationFormat;

impl Format for DurationFormat {
    fn symbol(&self) -> &str {
        "duration"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        IsoDuration::parse(raw)
            .map(Value::Duration)
            .map_err(|e| FormatError::new("duration", e.to_string()))
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Duration(d) => Ok(d.to_iso8601()),
            other => Err(wrong_variant("duration", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// email
// ---------------------------------------------------------------------------

fn check_email<'a>(s: &'a str) -> Result<&'a str, FormatError> {
    if s.contains('@') {
        Ok(s)
    } else {
        Err(FormatError::new("email", "email not valid"))
    }
}

/// `email` — minimal check: the address must contain `@`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailFormat;

impl Format for EmailFormat {
    fn symbol(&self) -> &str {
        "email"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        check_email(raw).map(Value::from)
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::String(s) => check_email(s).map(str::to_string),
            other => Err(wrong_variant("email", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// ipv4 / ipv6
// ---------------------------------------------------------------------------

/// `ipv4` — dotted-quad address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv4Format;

impl Format for Ipv4Format {
    fn symbol(&self) -> &str {
        "ipv4"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        raw.parse::<Ipv4Addr>()
            .map(Value::Ipv4)
            .map_err(|e| FormatError::new("ipv4", format!("{raw:?}: {e}")))
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Ipv4(addr) => Ok(addr.to_string()),
            other => Err(wrong_variant("ipv4", other)),
        }
    }
}

/// `ipv6` — RFC 4291 address.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ipv6Format;

impl Format for Ipv6Format {
    fn symbol(&self) -> &str {
        "ipv6"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        raw.parse::<Ipv6Addr>()
            .map(Value::Ipv6)
            .map_err(|e| FormatError::new("ipv6", format!("{raw:?}: {e}")))
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Ipv6(addr) => Ok(addr.to_string()),
            other => Err(wrong_variant("ipv6", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// hostname
// ---------------------------------------------------------------------------

/// Fully-qualified domain name syntax: at most 253 characters, at least two
/// dot-separated labels of 1–63 alphanumerics or hyphens not starting or
/// ending with a hyphen, and an alphabetic (or `xn--`) top-level label.
/// A single trailing dot is allowed.
pub fn is_fqdn(s: &str) -> bool {
    let name = s.strip_suffix('.').unwrap_or(s);
    if name.is_empty() || name.len() > 253 {
        return false;
    }
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld = labels[labels.len() - 1];
    let tld_ok = tld.to_ascii_lowercase().starts_with("xn--")
        || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels_ok && tld_ok
}

/// `hostname` — validated, returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostnameFormat;

impl Format for HostnameFormat {
    fn symbol(&self) -> &str {
        "hostname"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        if is_fqdn(raw) {
            Ok(Value::from(raw))
        } else {
            Err(FormatError::new("hostname", format!("{raw:?} is not a valid hostname")))
        }
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(wrong_variant("hostname", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// binary
// ---------------------------------------------------------------------------

/// `binary` — standard-alphabet base64 with padding.
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryFormat;

impl Format for BinaryFormat {
    fn symbol(&self) -> &str {
        "binary"
    }

    fn decode(&self, raw: &str) -> Result<Value, FormatError> {
        STANDARD
            .decode(raw)
            .map(Value::Bytes)
            .map_err(|e| FormatError::new("binary", e.to_string()))
    }

    fn encode(&self, value: &Value) -> Result<String, FormatError> {
        match value {
            Value::Bytes(bytes) => Ok(STANDARD.encode(bytes)),
            other => Err(wrong_variant("binary", other)),
        }
    }
}
