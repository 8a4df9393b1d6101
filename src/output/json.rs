//! JSON-lines report emitter
//!
//! One record per checked link regardless of status, `working` included.
//! Record order is completion order and not stable across runs; consumers
//! must index by `uri` or `(filename, lineno)`, never by position.

use crate::checker::{CheckResult, CheckStatus};
use crate::{RefcheckError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Wire shape of one report record; field order is part of the contract
#[derive(Serialize)]
struct JsonRecord<'a> {
    filename: &'a str,
    lineno: u64,
    status: &'a str,
    code: u16,
    uri: &'a str,
    info: &'a str,
}

/// Writes the JSON-lines report to a file
pub fn write_json_report(results: &[CheckResult], output_path: &Path) -> Result<()> {
    let report = format_json_report(results)?;

    let io = File::create(output_path).and_then(|mut f| f.write_all(report.as_bytes()));
    io.map_err(|source| RefcheckError::Report {
        path: output_path.display().to_string(),
        source,
    })
}

/// Formats the JSON-lines report
///
/// Redirected rows expose `code: 0`; the hop status kept in memory is a
/// text-report concern only.
pub fn format_json_report(results: &[CheckResult]) -> Result<String> {
    let mut report = String::new();

    for result in results {
        let code = match result.status {
            CheckStatus::Redirected => 0,
            _ => result.code,
        };

        let record = JsonRecord {
            filename: &result.filename,
            lineno: result.lineno,
            status: result.status.label(),
            code,
            uri: &result.uri,
            info: &result.info,
        };

        report.push_str(&serde_json::to_string(&record)?);
        report.push('\n');
    }

    Ok(report)
}
