//! Length pre-scan of an encoded event
//!
//! The Avro reader sizes buffers from the block counts and lengths it
//! reads, before it reads the items themselves. A few bytes claiming a
//! billion columns would make it allocate gigabytes. Every item of the
//! wire schema takes at least one byte, so this scan walks the event
//! layout and rejects any count or length larger than the bytes left.

use crate::common::{CdcError, Result};

/// Check all declared lengths of a bare datum against its size
pub(crate) fn check_lengths(bytes: &[u8]) -> Result<()> {
    let mut scanner = Scanner { rest: bytes };
    scanner.event()
}

struct Scanner<'a> {
    rest: &'a [u8],
}

impl Scanner<'_> {
    fn event(&mut self) -> Result<()> {
        // table
        self.string("keyspace")?;
        self.string("table name")?;
        self.array("columns", Self::column)?;

        self.nullable("ttl", Self::number)?;
        self.nullable("timestamp", Self::number)?;
        self.string("type")?;
        self.array("partition keys", Self::cell)
    }

    fn column(&mut self) -> Result<()> {
        self.string("column name")?;
        self.nullable("order", |s| s.string("order"))?;
        self.nullable("kind", |s| s.string("kind"))?;
        self.nullable("type id", Self::number)
    }

    fn cell(&mut self) -> Result<()> {
        self.column()?;
        self.string("cell value")
    }

    fn number(&mut self) -> Result<()> {
        self.long("number").map(|_| ())
    }

    /// Strings and bytes: a length, then that many bytes
    fn string(&mut self, what: &str) -> Result<()> {
        let len = self.length(what)?;
        self.rest = &self.rest[len..];
        Ok(())
    }

    fn nullable(
        &mut self,
        what: &str,
        value: impl FnOnce(&mut Self) -> Result<()>,
    ) -> Result<()> {
        match self.long(what)? {
            0 => Ok(()),
            1 => value(self),
            branch => Err(CdcError::malformed(format!(
                "{}: invalid union branch {}",
                what, branch
            ))),
        }
    }

    fn array(
        &mut self,
        what: &str,
        mut item: impl FnMut(&mut Self) -> Result<()>,
    ) -> Result<()> {
        loop {
            let count = self.long(what)?;
            if count == 0 {
                return Ok(());
            }
            if count < 0 {
                // a negative count is followed by the block size in bytes
                self.length(what)?;
            }
            let count = count.unsigned_abs();
            if count > self.rest.len() as u64 {
                return Err(self.overrun(what, count));
            }
            for _ in 0..count {
                item(self)?;
            }
        }
    }

    fn length(&mut self, what: &str) -> Result<usize> {
        let len = self.long(what)?;
        if len < 0 {
            return Err(CdcError::malformed(format!(
                "{}: negative length {}",
                what, len
            )));
        }
        if len as u64 > self.rest.len() as u64 {
            return Err(self.overrun(what, len as u64));
        }
        Ok(len as usize)
    }

    /// Zigzag varint
    fn long(&mut self, what: &str) -> Result<i64> {
        let rest = self.rest;
        let mut value: u64 = 0;
        for (i, &byte) in rest.iter().enumerate().take(10) {
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                self.rest = &rest[i + 1..];
                return Ok((value >> 1) as i64 ^ -((value & 1) as i64));
            }
        }
        Err(CdcError::malformed(format!(
            "{}: truncated or overlong varint",
            what
        )))
    }

    fn overrun(&self, what: &str, declared: u64) -> CdcError {
        CdcError::malformed(format!(
            "{}: declares {} items or bytes, only {} bytes left",
            what,
            declared,
            self.rest.len()
        ))
    }
}
