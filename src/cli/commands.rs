//! CLI command implementations
//!
//! Each command loads a definition file, builds a preprocessor and writes
//! exactly one JSON response line to stdout.

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::observability::{Event, Logger, Severity};
use crate::schema::{ArgPreprocessor, DefinitionLoader, FieldValue, ParserOptions};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error_to, write_response_to};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    if cli.verbose {
        Logger::set_min_severity(Severity::Trace);
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Check {
            schema,
            input,
            lenient,
            auto_cast,
        } => {
            Logger::info(Event::CommandStart.as_str(), &[("command", "check")]);
            let options = ParserOptions {
                is_strict: !lenient,
                auto_type_cast: auto_cast,
            };
            let raw = read_request(input.as_deref())?;
            check(&mut io::stdout(), &schema, &raw, options)
        }
        Command::Lint { schema } => {
            Logger::info(Event::CommandStart.as_str(), &[("command", "lint")]);
            lint(&mut io::stdout(), &schema)
        }
    }
}

/// Validate `raw` against the definition at `schema_path`
///
/// On rejection the field error is written as the response line and
/// `CliErrorCode::Rejected` is returned so the process exits non-zero.
pub fn check<W: Write>(
    writer: &mut W,
    schema_path: &Path,
    raw: &Value,
    options: ParserOptions,
) -> CliResult<()> {
    let definition = DefinitionLoader::new().load_file(schema_path)?;
    let preprocessor = ArgPreprocessor::new(definition, options)?;

    match preprocessor.parse_json(raw) {
        Ok(args) => write_response_to(writer, FieldValue::Map(args).to_json()),
        Err(err) => {
            write_error_to(writer, &err)?;
            Err(CliError::rejected(&err))
        }
    }
}

/// Load and structurally validate a definition file
pub fn lint<W: Write>(writer: &mut W, schema_path: &Path) -> CliResult<()> {
    let definition = DefinitionLoader::new().load_file(schema_path)?;
    let fields: Vec<&str> = definition.keys().collect();
    write_response_to(writer, json!({ "fields": fields }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    const SCHEMA: &str = r#"{
        "request_id": {"validator": "uuid4", "required": true},
        "pageNo": {
            "data_type": "int", "min_val": 1, "max_val": 10, "alias": "page_no", "default": 1
        }
    }"#;

    fn schema_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SCHEMA.as_bytes()).unwrap();
        file
    }

    fn output(buffer: Vec<u8>) -> Value {
        serde_json::from_slice(&buffer).unwrap()
    }

    #[test]
    fn test_check_accepts_and_normalizes() {
        let file = schema_file();
        let mut buffer = Vec::new();
        let raw = json!({
            "request_id": "0d6b3f3e-5a4c-4f0e-9d1a-2b7c8e9f0a1b",
            "pageNo": "4"
        });
        check(
            &mut buffer,
            file.path(),
            &raw,
            ParserOptions::strict().with_auto_type_cast(true),
        )
        .unwrap();

        let response = output(buffer);
        assert_eq!(response["status"], "ok");
        assert_eq!(response["data"]["page_no"], 4);
    }

    #[test]
    fn test_check_writes_field_error() {
        let file = schema_file();
        let mut buffer = Vec::new();
        let err = check(&mut buffer, file.path(), &json!({}), ParserOptions::strict()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::Rejected);

        let response = output(buffer);
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "MISSING_MANDATORY_FIELD");
        assert_eq!(response["field"], "request_id");
        assert_eq!(response["message"], "request_id is a mandatory field");
    }

    #[test]
    fn test_check_lenient_ignores_unknown_keys() {
        let file = schema_file();
        let mut buffer = Vec::new();
        let raw = json!({
            "request_id": "0d6b3f3e-5a4c-4f0e-9d1a-2b7c8e9f0a1b",
            "extra": true
        });
        check(&mut buffer, file.path(), &raw, ParserOptions::lenient()).unwrap();
        assert_eq!(output(buffer)["data"]["page_no"], 1);
    }

    #[test]
    fn test_lint_lists_fields() {
        let file = schema_file();
        let mut buffer = Vec::new();
        lint(&mut buffer, file.path()).unwrap();
        assert_eq!(output(buffer)["data"]["fields"], json!(["request_id", "pageNo"]));
    }

    #[test]
    fn test_lint_rejects_bad_definition() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"a": {"data_type": "decimal"}}"#).unwrap();
        let mut buffer = Vec::new();
        let err = lint(&mut buffer, file.path()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(buffer.is_empty());
    }
}
