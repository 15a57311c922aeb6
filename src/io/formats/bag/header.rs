// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Record header decoding.
//!
//! A header is a declared-length block of `<field_len: u32><name>=<value>`
//! entries. The decoder knows nothing about which names matter; the typed
//! `require_*` accessors let each record kind validate the fields it needs.

use std::collections::HashMap;
use std::io::Read;

use crate::io::ByteCursor;
use crate::{BagError, Result, RosTime};

use super::constants::{fields, OpCode};

/// Field name/value separator.
const FIELD_SEPARATOR: u8 = b'=';

/// Decoded header fields of one record, as `name -> raw value`.
///
/// Duplicate names keep the last value seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordHeader {
    fields: HashMap<String, Vec<u8>>,
}

impl RecordHeader {
    /// Decode a header of exactly `length` bytes from the cursor.
    ///
    /// Fails with a format violation if a field block would run past the
    /// declared length, or if a field is shorter than the name it contains.
    pub fn read<R: Read>(cursor: &mut ByteCursor<R>, length: u32) -> Result<Self> {
        let mut header = RecordHeader::default();
        let mut remaining = length as i64;

        while remaining > 0 {
            let field_len = cursor.read_u32()?;
            remaining -= 4 + field_len as i64;
            if remaining < 0 {
                return Err(BagError::format(
                    "record header",
                    format!(
                        "field of {field_len} bytes overruns the declared header length of {length} bytes"
                    ),
                ));
            }

            let mut name = Vec::new();
            loop {
                if name.len() as u64 >= field_len as u64 {
                    return Err(BagError::format(
                        "record header",
                        format!(
                            "field length {field_len} is less than the length of its name '{}'",
                            String::from_utf8_lossy(&name)
                        ),
                    ));
                }
                let byte = cursor.read_u8()?;
                if byte == FIELD_SEPARATOR {
                    break;
                }
                name.push(byte);
            }

            let value_len = field_len as u64 - name.len() as u64 - 1;
            let value = cursor.read_bytes(value_len)?;
            header
                .fields
                .insert(String::from_utf8_lossy(&name).into_owned(), value);
        }

        Ok(header)
    }

    /// Raw value of a field.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// Whether a field is present.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the header has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate over `(name, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_slice()))
    }

    /// Insert a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.fields.insert(name.into(), value.into());
    }

    /// The record's opcode from the required one-byte `op` field.
    pub fn op(&self) -> Result<OpCode> {
        let value = self.require(fields::OP, "record")?;
        match value {
            [op] => Ok(OpCode::from(*op)),
            _ => Err(BagError::invalid_field(
                fields::OP,
                "1 byte",
                format!("{} bytes", value.len()),
            )),
        }
    }

    /// Raw value of a required field.
    pub fn require(&self, name: &str, record: &str) -> Result<&[u8]> {
        self.get(name)
            .ok_or_else(|| BagError::missing_field(name, record))
    }

    /// A required 4-byte little-endian field.
    pub fn require_u32(&self, name: &str, record: &str) -> Result<u32> {
        let value = self.require(name, record)?;
        Ok(u32::from_le_bytes(fixed_width(name, value)?))
    }

    /// A required text field, decoded as UTF-8 with lossy replacement.
    pub fn require_string(&self, name: &str, record: &str) -> Result<String> {
        let value = self.require(name, record)?;
        Ok(String::from_utf8_lossy(value).into_owned())
    }

    /// A required 8-byte time field.
    pub fn require_time(&self, name: &str, record: &str) -> Result<RosTime> {
        let value = self.require(name, record)?;
        Ok(RosTime::from_le_bytes(fixed_width(name, value)?))
    }

    /// An optional 4-byte little-endian field.
    pub fn get_u32(&self, name: &str) -> Result<Option<u32>> {
        self.get(name)
            .map(|value| fixed_width(name, value).map(u32::from_le_bytes))
            .transpose()
    }

    /// An optional 8-byte little-endian field.
    pub fn get_u64(&self, name: &str) -> Result<Option<u64>> {
        self.get(name)
            .map(|value| fixed_width(name, value).map(u64::from_le_bytes))
            .transpose()
    }
}

impl<N: Into<String>, V: Into<Vec<u8>>> FromIterator<(N, V)> for RecordHeader {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut header = RecordHeader::default();
        for (name, value) in iter {
            header.insert(name, value);
        }
        header
    }
}

/// Check a value has exactly `N` bytes.
fn fixed_width<const N: usize>(name: &str, value: &[u8]) -> Result<[u8; N]> {
    value.try_into().map_err(|_| {
        BagError::invalid_field(name, format!("{N} bytes"), format!("{} bytes", value.len()))
    })
}
