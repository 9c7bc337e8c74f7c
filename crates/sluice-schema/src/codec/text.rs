//! Canonical text rendering of scalar values
//!
//! Every value is encoded as its UTF-8 text form, e.g. `42`, `true`,
//! `0x0aff`, `123.45`, `1mo2d3ns`. Handy in tests and when eyeballing raw
//! partition key bytes, not meant for production traffic.

use super::{check_encodable, unsupported, Codec};
use crate::error::{Result, SchemaError};
use crate::types::ColumnType;
use crate::value::{CqlDecimal, CqlDuration, CqlValue};
use bytes::Bytes;
use num_bigint::{BigInt, Sign};
use std::str::FromStr;

/// Decimals with a larger scale than this are written in exponent form
const MAX_PLAIN_SCALE: i32 = 64;

/// Codec rendering values as text
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn name(&self) -> &'static str {
        "text"
    }

    fn supports(&self, column_type: ColumnType) -> bool {
        !column_type.is_parameterized()
    }

    fn encode(&self, column_type: ColumnType, value: &CqlValue) -> Result<Bytes> {
        check_encodable(self, column_type, value)?;

        let text = match value {
            CqlValue::Ascii(s) | CqlValue::Text(s) => s.clone(),
            CqlValue::Bigint(v)
            | CqlValue::Counter(v)
            | CqlValue::Time(v)
            | CqlValue::Timestamp(v) => v.to_string(),
            CqlValue::Blob(b) => format!("0x{}", hex::encode(b)),
            CqlValue::Boolean(b) => b.to_string(),
            CqlValue::Date(d) => d.to_string(),
            CqlValue::Decimal(d) => format_decimal(d),
            CqlValue::Double(v) => v.to_string(),
            CqlValue::Duration(d) => format!("{}mo{}d{}ns", d.months, d.days, d.nanos),
            CqlValue::Float(v) => v.to_string(),
            CqlValue::Inet(addr) => addr.to_string(),
            CqlValue::Int(v) => v.to_string(),
            CqlValue::Smallint(v) => v.to_string(),
            CqlValue::Tinyint(v) => v.to_string(),
            CqlValue::Timeuuid(u) | CqlValue::Uuid(u) => u.hyphenated().to_string(),
            CqlValue::Varint(v) => v.to_string(),
        };

        Ok(Bytes::from(text))
    }

    fn decode(&self, column_type: ColumnType, bytes: &[u8]) -> Result<CqlValue> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| SchemaError::invalid_encoding(column_type, e.to_string()))?;

        let value = match column_type {
            ColumnType::Ascii => {
                if !text.is_ascii() {
                    return Err(SchemaError::invalid_encoding(column_type, "non-ASCII text"));
                }
                CqlValue::Ascii(text.to_string())
            }
            ColumnType::Text | ColumnType::Varchar => CqlValue::Text(text.to_string()),
            ColumnType::Bigint => CqlValue::Bigint(parse(column_type, text)?),
            ColumnType::Counter => CqlValue::Counter(parse(column_type, text)?),
            ColumnType::Time => CqlValue::Time(parse(column_type, text)?),
            ColumnType::Timestamp => CqlValue::Timestamp(parse(column_type, text)?),
            ColumnType::Blob => {
                let digits = text.strip_prefix("0x").ok_or_else(|| {
                    SchemaError::invalid_encoding(column_type, "missing 0x prefix")
                })?;
                let raw = hex::decode(digits)
                    .map_err(|e| SchemaError::invalid_encoding(column_type, e.to_string()))?;
                CqlValue::Blob(Bytes::from(raw))
            }
            ColumnType::Boolean => CqlValue::Boolean(parse(column_type, text)?),
            ColumnType::Date => CqlValue::Date(parse(column_type, text)?),
            ColumnType::Decimal => CqlValue::Decimal(parse_decimal(text).ok_or_else(|| {
                SchemaError::invalid_encoding(column_type, format!("'{}' is not a decimal", text))
            })?),
            ColumnType::Double => CqlValue::Double(parse(column_type, text)?),
            ColumnType::Duration => CqlValue::Duration(parse_duration(text).ok_or_else(|| {
                SchemaError::invalid_encoding(column_type, format!("'{}' is not a duration", text))
            })?),
            ColumnType::Float => CqlValue::Float(parse(column_type, text)?),
            ColumnType::Inet => CqlValue::Inet(parse(column_type, text)?),
            ColumnType::Int => CqlValue::Int(parse(column_type, text)?),
            ColumnType::Smallint => CqlValue::Smallint(parse(column_type, text)?),
            ColumnType::Tinyint => CqlValue::Tinyint(parse(column_type, text)?),
            ColumnType::Timeuuid => CqlValue::Timeuuid(parse(column_type, text)?),
            ColumnType::Uuid => CqlValue::Uuid(parse(column_type, text)?),
            ColumnType::Varint => CqlValue::Varint(parse(column_type, text)?),
            ColumnType::Custom
            | ColumnType::List
            | ColumnType::Map
            | ColumnType::Set
            | ColumnType::Udt
            | ColumnType::Tuple => return Err(unsupported(self, column_type)),
        };

        Ok(value)
    }
}

fn parse<T>(column_type: ColumnType, text: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text.parse().map_err(|e: T::Err| {
        SchemaError::invalid_encoding(column_type, format!("'{}': {}", text, e))
    })
}

fn format_decimal(d: &CqlDecimal) -> String {
    if d.scale == 0 {
        return d.unscaled.to_string();
    }
    if d.scale < 0 || d.scale > MAX_PLAIN_SCALE {
        return format!("{}E{}", d.unscaled, -i64::from(d.scale));
    }

    let scale = d.scale as usize;
    let digits = d.unscaled.magnitude().to_string();
    let padded = if digits.len() <= scale {
        format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
    } else {
        digits
    };
    let (int, frac) = padded.split_at(padded.len() - scale);
    let sign = if d.unscaled.sign() == Sign::Minus { "-" } else { "" };
    format!("{}{}.{}", sign, int, frac)
}

fn parse_decimal(text: &str) -> Option<CqlDecimal> {
    if let Some((mantissa, exponent)) = text.split_once('E') {
        let unscaled = mantissa.parse::<BigInt>().ok()?;
        let exponent = exponent.parse::<i64>().ok()?;
        let scale = i32::try_from(-exponent).ok()?;
        return Some(CqlDecimal { unscaled, scale });
    }

    match text.split_once('.') {
        Some((int, frac)) => {
            if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let unscaled = format!("{}{}", int, frac).parse::<BigInt>().ok()?;
            let scale = i32::try_from(frac.len()).ok()?;
            Some(CqlDecimal { unscaled, scale })
        }
        None => Some(CqlDecimal {
            unscaled: text.parse().ok()?,
            scale: 0,
        }),
    }
}

fn parse_duration(text: &str) -> Option<CqlDuration> {
    let rest = text.strip_suffix("ns")?;
    let (months, rest) = rest.split_once("mo")?;
    let (days, nanos) = rest.split_once('d')?;
    Some(CqlDuration {
        months: months.parse().ok()?,
        days: days.parse().ok()?,
        nanos: nanos.parse().ok()?,
    })
}
