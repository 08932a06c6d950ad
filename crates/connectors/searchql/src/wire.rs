//! The wire envelope of the SQL action.
//!
//! Requests carry `(format, sql)` and responses carry `(result)`, each
//! encoded as length-prefixed UTF-8 strings in fixed order. The length prefix
//! is a 4-byte little-endian integer. Decoding requires every field to be
//! present and consumes the buffer exactly.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

/// The name under which the endpoint is registered.
pub const ACTION_NAME: &str = "cluster:admin/searchql/sql";

/// The request half of the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQueryRequest {
    pub format: String,
    pub sql: String,
}

/// The response half of the wire envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQueryResponse {
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("message truncated while reading '{0}'")]
    Truncated(&'static str),
    #[error("field '{0}' is not valid UTF-8")]
    InvalidUtf8(&'static str),
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

impl SqlQueryRequest {
    pub fn new(format: &str, sql: &str) -> SqlQueryRequest {
        SqlQueryRequest {
            format: format.to_string(),
            sql: sql.to_string(),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buffer = BytesMut::new();
        put_string(&mut buffer, &self.format);
        put_string(&mut buffer, &self.sql);
        buffer.freeze()
    }

    pub fn decode(mut buffer: &[u8]) -> Result<SqlQueryRequest, WireError> {
        let format = take_string(&mut buffer, "format")?;
        let sql = take_string(&mut buffer, "sql")?;
        if !buffer.is_empty() {
            return Err(WireError::TrailingBytes(buffer.len()));
        }
        Ok(SqlQueryRequest { format, sql })
    }
}

impl SqlQueryResponse {
    pub fn new(result: &str) -> SqlQueryResponse {
        SqlQueryResponse {
            result: result.to_string(),
        }
    }

    pub fn encode(&self) -> Bytes {
        let mut buffer = BytesMut::new();
        put_string(&mut buffer, &self.result);
        buffer.freeze()
    }

    pub fn decode(mut buffer: &[u8]) -> Result<SqlQueryResponse, WireError> {
        let result = take_string(&mut buffer, "result")?;
        if !buffer.is_empty() {
            return Err(WireError::TrailingBytes(buffer.len()));
        }
        Ok(SqlQueryResponse { result })
    }
}

fn put_string(buffer: &mut BytesMut, text: &str) {
    let length = u32::try_from(text.len()).expect("wire string exceeds u32 length");
    buffer.put_u32_le(length);
    buffer.put_slice(text.as_bytes());
}

fn take_string(buffer: &mut &[u8], field: &'static str) -> Result<String, WireError> {
    if buffer.remaining() < 4 {
        return Err(WireError::Truncated(field));
    }
    let length = buffer.get_u32_le() as usize;
    if buffer.remaining() < length {
        return Err(WireError::Truncated(field));
    }
    let raw = buffer.copy_to_bytes(length);
    String::from_utf8(raw.to_vec()).map_err(|_| WireError::InvalidUtf8(field))
}
