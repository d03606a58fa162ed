//! JSON output for every mode.
//!
//! Stdout carries exactly one pretty-printed JSON document per invocation;
//! logs go to stderr so callers can pipe the result straight into a parser.

use serde::Serialize;
use std::error::Error;
use std::io::{self, Write};
use tracing::{debug, instrument};

/// Serialize `value` as pretty JSON onto `out`, followed by a newline.
pub fn write_json<T, W>(value: &T, mut out: W) -> Result<(), Box<dyn Error>>
where
    T: Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(&mut out, value)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// Write the invocation's result document to stdout.
#[instrument(level = "debug", skip_all)]
pub fn emit<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    let stdout = io::stdout();
    write_json(value, stdout.lock())?;
    debug!("Wrote JSON document to stdout");
    Ok(())
}

/// `{"error": "<message>"}`, the shape of every top-level failure.
pub fn error_object(message: impl Into<String>) -> serde_json::Value {
    serde_json::json!({ "error": message.into() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedEntry, ResultItem};

    #[test]
    fn test_write_json_is_pretty_with_trailing_newline() {
        let items = vec![ResultItem::new("T", None, "B")];
        let mut buf = Vec::new();
        write_json(&items, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.ends_with("]\n"));
        assert!(text.contains("\"href\": null"));
    }

    #[test]
    fn test_empty_list_serializes_as_brackets() {
        let mut buf = Vec::new();
        write_json(&Vec::<FeedEntry>::new(), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "[]\n");
    }

    #[test]
    fn test_error_object() {
        assert_eq!(
            error_object("No image path provided").to_string(),
            r#"{"error":"No image path provided"}"#
        );
    }
}
