use std::fmt;
use std::io::{self, BufRead, BufReader, Read};

use crate::errors::StorageError;

/// One line of a manifest: an opaque record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestRecord(String);

impl ManifestRecord {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for ManifestRecord {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for ManifestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a manifest body into records, one per line.
///
/// Lines end at `\n`, and one `\r` before it (or at the very end of the
/// body) is dropped. A final line without a trailing newline is still a
/// record; an empty body has no records. The reader is consumed and dropped
/// whether or not decoding succeeds.
///
/// # Errors
///
/// Returns [`StorageError::Decode`] on read failure or invalid UTF-8.
pub fn decode<R: Read>(key: &str, reader: R) -> Result<Vec<ManifestRecord>, StorageError> {
    let decode_error = |source: io::Error| StorageError::Decode {
        key: key.to_string(),
        source,
    };

    let mut reader = BufReader::new(reader);
    let mut records = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(decode_error)? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        let text = String::from_utf8(std::mem::take(&mut line))
            .map_err(|e| decode_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        records.push(ManifestRecord::from(text));
    }
    Ok(records)
}
