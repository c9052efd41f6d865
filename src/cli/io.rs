//! JSON I/O handling for CLI
//!
//! - Input: one JSON document from a file or one line of stdin
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::schema::FieldError;

use super::errors::{CliError, CliResult};

/// Read a JSON request from a file, or from one line of stdin
pub fn read_request(path: Option<&Path>) -> CliResult<Value> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|e| CliError::io_error(format!("Failed to read {}: {}", path.display(), e)))?,
        None => {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    if content.trim().is_empty() {
        return Err(CliError::io_error("Empty input"));
    }

    Ok(serde_json::from_str(&content)?)
}

/// Write a success response line
pub fn write_response_to<W: Write>(writer: &mut W, data: Value) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(writer, &response)
}

/// Write a field error response line
pub fn write_error_to<W: Write>(writer: &mut W, err: &FieldError) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": err.code().code(),
        "field": err.field_path(),
        "message": err.message(),
        "data": err.data()
    });
    write_line(writer, &response)
}

fn write_line<W: Write>(writer: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_request_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"pageNo": "3"}}"#).unwrap();
        let value = read_request(Some(file.path())).unwrap();
        assert_eq!(value, json!({"pageNo": "3"}));
    }

    #[test]
    fn test_read_request_empty_file() {
        let file = NamedTempFile::new().unwrap();
        let err = read_request(Some(file.path())).unwrap_err();
        assert!(err.message().contains("Empty input"));
    }

    #[test]
    fn test_write_response_shape() {
        let mut buffer = Vec::new();
        write_response_to(&mut buffer, json!({"page_no": 3})).unwrap();
        let output = String::from_utf8(buffer).unwrap();
        assert!(output.ends_with('\n'));
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"]["page_no"], 3);
    }

    #[test]
    fn test_write_error_shape() {
        let mut buffer = Vec::new();
        let err = FieldError::min_range("pageNo", &1.into());
        write_error_to(&mut buffer, &err).unwrap();
        let parsed: Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed["status"], "error");
        assert_eq!(parsed["code"], "FIELD_MIN_RANGE_VIOLATED");
        assert_eq!(parsed["field"], "pageNo");
        assert_eq!(parsed["data"], json!({"minValue": 1}));
    }
}
