//! Wire encoding of a record
//!
//! A message is `key=value` pairs joined by commas, in record field order:
//!
//! ```text
//! timestamp=2024-05-01 10:00:00,dht_temp=21.5,dht_hum=60,soil=300,ds18_1=19.2
//! ```
//!
//! Keys and values are written as-is; nothing is escaped.

use crate::types::Record;
use std::fmt;

/// Separator between two `key=value` pairs
pub const PAIR_SEPARATOR: char = ',';

/// Separator between a key and its value
pub const KEY_VALUE_SEPARATOR: char = '=';

/// Encoded text form of one record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Message(String);

impl Message {
    /// Encode a record
    pub fn encode(record: &Record) -> Self {
        use std::fmt::Write as FmtWrite;

        let mut text = String::with_capacity(record.len() * 16);
        for (i, field) in record.fields.iter().enumerate() {
            if i > 0 {
                text.push(PAIR_SEPARATOR);
            }
            let _ = write!(text, "{}{}{}", field.name, KEY_VALUE_SEPARATOR, field.value);
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in the order they appear
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .split(PAIR_SEPARATOR)
            .filter_map(|pair| pair.split_once(KEY_VALUE_SEPARATOR).map(|(k, _)| k))
    }
}

impl From<&Record> for Message {
    fn from(record: &Record) -> Self {
        Self::encode(record)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
