//! CQL native protocol (v4+) value encodings

use super::{check_encodable, unsupported, Codec};
use crate::error::{Result, SchemaError};
use crate::types::ColumnType;
use crate::value::{CqlDecimal, CqlDuration, CqlValue};
use bytes::{BufMut, Bytes, BytesMut};
use num_bigint::BigInt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// Codec producing the same bytes a CQL driver puts on the wire
#[derive(Debug, Clone, Copy, Default)]
pub struct CqlCodec;

impl Codec for CqlCodec {
    fn name(&self) -> &'static str {
        "cql"
    }

    fn supports(&self, column_type: ColumnType) -> bool {
        !column_type.is_parameterized()
    }

    fn encode(&self, column_type: ColumnType, value: &CqlValue) -> Result<Bytes> {
        check_encodable(self, column_type, value)?;

        let bytes = match value {
            CqlValue::Ascii(s) => {
                if !s.is_ascii() {
                    return Err(SchemaError::invalid_encoding(
                        column_type,
                        "non-ASCII characters",
                    ));
                }
                Bytes::copy_from_slice(s.as_bytes())
            }
            CqlValue::Text(s) => Bytes::copy_from_slice(s.as_bytes()),
            CqlValue::Bigint(v)
            | CqlValue::Counter(v)
            | CqlValue::Time(v)
            | CqlValue::Timestamp(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
            CqlValue::Blob(b) => b.clone(),
            CqlValue::Boolean(b) => Bytes::from_static(if *b { &[1] } else { &[0] }),
            CqlValue::Date(d) => Bytes::copy_from_slice(&d.to_be_bytes()),
            CqlValue::Decimal(d) => {
                let unscaled = d.unscaled.to_signed_bytes_be();
                let mut buf = BytesMut::with_capacity(4 + unscaled.len());
                buf.put_i32(d.scale);
                buf.put_slice(&unscaled);
                buf.freeze()
            }
            CqlValue::Double(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
            CqlValue::Duration(d) => {
                let mut buf = BytesMut::with_capacity(27);
                put_vint(&mut buf, i64::from(d.months));
                put_vint(&mut buf, i64::from(d.days));
                put_vint(&mut buf, d.nanos);
                buf.freeze()
            }
            CqlValue::Float(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
            CqlValue::Inet(IpAddr::V4(addr)) => Bytes::copy_from_slice(&addr.octets()),
            CqlValue::Inet(IpAddr::V6(addr)) => Bytes::copy_from_slice(&addr.octets()),
            CqlValue::Int(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
            CqlValue::Smallint(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
            CqlValue::Tinyint(v) => Bytes::copy_from_slice(&v.to_be_bytes()),
            CqlValue::Timeuuid(u) => {
                if u.get_version_num() != 1 {
                    return Err(SchemaError::invalid_encoding(
                        column_type,
                        format!("expected a version 1 uuid, got version {}", u.get_version_num()),
                    ));
                }
                Bytes::copy_from_slice(u.as_bytes())
            }
            CqlValue::Uuid(u) => Bytes::copy_from_slice(u.as_bytes()),
            CqlValue::Varint(v) => Bytes::from(v.to_signed_bytes_be()),
        };

        Ok(bytes)
    }

    fn decode(&self, column_type: ColumnType, bytes: &[u8]) -> Result<CqlValue> {
        let value = match column_type {
            ColumnType::Ascii => {
                if !bytes.is_ascii() {
                    return Err(SchemaError::invalid_encoding(
                        column_type,
                        "non-ASCII bytes",
                    ));
                }
                CqlValue::Ascii(utf8(column_type, bytes)?)
            }
            ColumnType::Text | ColumnType::Varchar => CqlValue::Text(utf8(column_type, bytes)?),
            ColumnType::Bigint => CqlValue::Bigint(i64::from_be_bytes(fixed(column_type, bytes)?)),
            ColumnType::Counter => {
                CqlValue::Counter(i64::from_be_bytes(fixed(column_type, bytes)?))
            }
            ColumnType::Time => CqlValue::Time(i64::from_be_bytes(fixed(column_type, bytes)?)),
            ColumnType::Timestamp => {
                CqlValue::Timestamp(i64::from_be_bytes(fixed(column_type, bytes)?))
            }
            ColumnType::Blob => CqlValue::Blob(Bytes::copy_from_slice(bytes)),
            ColumnType::Boolean => {
                let [b] = fixed::<1>(column_type, bytes)?;
                CqlValue::Boolean(b != 0)
            }
            ColumnType::Date => CqlValue::Date(u32::from_be_bytes(fixed(column_type, bytes)?)),
            ColumnType::Decimal => {
                if bytes.len() < 5 {
                    return Err(SchemaError::invalid_encoding(
                        column_type,
                        format!("expected at least 5 bytes, got {}", bytes.len()),
                    ));
                }
                let (scale, unscaled) = bytes.split_at(4);
                CqlValue::Decimal(CqlDecimal {
                    unscaled: BigInt::from_signed_bytes_be(unscaled),
                    scale: i32::from_be_bytes(fixed(column_type, scale)?),
                })
            }
            ColumnType::Double => CqlValue::Double(f64::from_be_bytes(fixed(column_type, bytes)?)),
            ColumnType::Duration => {
                let mut cursor = bytes;
                let months = get_vint(column_type, &mut cursor)?;
                let days = get_vint(column_type, &mut cursor)?;
                let nanos = get_vint(column_type, &mut cursor)?;
                if !cursor.is_empty() {
                    return Err(SchemaError::invalid_encoding(
                        column_type,
                        format!("{} trailing bytes", cursor.len()),
                    ));
                }
                CqlValue::Duration(CqlDuration {
                    months: narrow(column_type, "months", months)?,
                    days: narrow(column_type, "days", days)?,
                    nanos,
                })
            }
            ColumnType::Float => CqlValue::Float(f32::from_be_bytes(fixed(column_type, bytes)?)),
            ColumnType::Inet => match bytes.len() {
                4 => CqlValue::Inet(IpAddr::V4(Ipv4Addr::from(fixed::<4>(column_type, bytes)?))),
                16 => CqlValue::Inet(IpAddr::V6(Ipv6Addr::from(fixed::<16>(column_type, bytes)?))),
                n => {
                    return Err(SchemaError::invalid_encoding(
                        column_type,
                        format!("expected 4 or 16 bytes, got {}", n),
                    ))
                }
            },
            ColumnType::Int => CqlValue::Int(i32::from_be_bytes(fixed(column_type, bytes)?)),
            ColumnType::Smallint => {
                CqlValue::Smallint(i16::from_be_bytes(fixed(column_type, bytes)?))
            }
            ColumnType::Tinyint => CqlValue::Tinyint(i8::from_be_bytes(fixed(column_type, bytes)?)),
            ColumnType::Timeuuid => {
                CqlValue::Timeuuid(Uuid::from_bytes(fixed(column_type, bytes)?))
            }
            ColumnType::Uuid => CqlValue::Uuid(Uuid::from_bytes(fixed(column_type, bytes)?)),
            ColumnType::Varint => {
                if bytes.is_empty() {
                    return Err(SchemaError::invalid_encoding(column_type, "empty varint"));
                }
                CqlValue::Varint(BigInt::from_signed_bytes_be(bytes))
            }
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

fn fixed<const N: usize>(column_type: ColumnType, bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| {
        SchemaError::invalid_encoding(
            column_type,
            format!("expected {} bytes, got {}", N, bytes.len()),
        )
    })
}

fn utf8(column_type: ColumnType, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| SchemaError::invalid_encoding(column_type, e.to_string()))
}

fn narrow(column_type: ColumnType, field: &str, value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| {
        SchemaError::invalid_encoding(column_type, format!("{} out of range: {}", field, value))
    })
}

/// Number of bytes the unsigned vint encoding of `value` takes (1..=9)
fn unsigned_vint_size(value: u64) -> usize {
    let magnitude = (value | 1).leading_zeros() as usize;
    (639 - magnitude * 9) >> 6
}

/// Zigzag + unsigned vint, the variable length integer used by durations.
///
/// The count of leading one bits in the first byte is the number of extra
/// bytes that follow; the remaining bits are the big-endian value.
fn put_vint(buf: &mut BytesMut, value: i64) {
    let zigzag = ((value << 1) ^ (value >> 63)) as u64;
    let size = unsigned_vint_size(zigzag);
    if size == 1 {
        buf.put_u8(zigzag as u8);
        return;
    }

    let be = zigzag.to_be_bytes();
    let mut encoded = [0u8; 9];
    if size == 9 {
        encoded[0] = 0xff;
        encoded[1..].copy_from_slice(&be);
    } else {
        encoded[..size].copy_from_slice(&be[8 - size..]);
        encoded[0] |= !(0xffu8 >> (size - 1));
    }
    buf.put_slice(&encoded[..size]);
}

fn get_vint(column_type: ColumnType, cursor: &mut &[u8]) -> Result<i64> {
    let (&first, rest) = cursor
        .split_first()
        .ok_or_else(|| SchemaError::invalid_encoding(column_type, "truncated vint"))?;
    let extra = first.leading_ones() as usize;
    if rest.len() < extra {
        return Err(SchemaError::invalid_encoding(column_type, "truncated vint"));
    }

    let mut zigzag = if extra == 8 {
        0
    } else {
        u64::from(first & (0xffu8 >> extra))
    };
    for &b in &rest[..extra] {
        zigzag = (zigzag << 8) | u64::from(b);
    }
    *cursor = &rest[extra..];

    Ok(((zigzag >> 1) as i64) ^ -((zigzag & 1) as i64))
}
