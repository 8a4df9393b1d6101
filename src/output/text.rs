//! Plain-text report emitter
//!
//! One line per problem result; `working` and `ignored` results are
//! omitted entirely, so a clean run writes an empty file.

use crate::checker::{CheckResult, CheckStatus};
use crate::{RefcheckError, Result};
use reqwest::StatusCode;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the plain-text report to a file
pub fn write_text_report(results: &[CheckResult], output_path: &Path) -> Result<()> {
    let report = format_text_report(results);

    let io = File::create(output_path).and_then(|mut f| f.write_all(report.as_bytes()));
    io.map_err(|source| RefcheckError::Report {
        path: output_path.display().to_string(),
        source,
    })
}

/// Formats the plain-text report
///
/// Lines render as `<filename>:<lineno>: [<status>] <uri>: <info>` with
/// the `: <info>` suffix omitted when info is empty. Redirected results
/// render `[redirected with <reason>] <uri> to <target>` where the reason
/// phrase comes from the first hop's HTTP status.
pub fn format_text_report(results: &[CheckResult]) -> String {
    let mut report = String::new();

    for result in results {
        if let Some(line) = format_text_line(result) {
            report.push_str(&line);
            report.push('\n');
        }
    }

    report
}

fn format_text_line(result: &CheckResult) -> Option<String> {
    match result.status {
        CheckStatus::Working | CheckStatus::Ignored => None,
        CheckStatus::Redirected => Some(format!(
            "{}:{}: [{}] {} to {}",
            result.filename,
            result.lineno,
            redirect_label(result.code),
            result.uri,
            result.info
        )),
        _ => {
            let mut line = format!(
                "{}:{}: [{}] {}",
                result.filename,
                result.lineno,
                result.status.label(),
                result.uri
            );
            if !result.info.is_empty() {
                line.push_str(": ");
                line.push_str(&result.info);
            }
            Some(line)
        }
    }
}

/// `redirected with Found`, `redirected with Moved Permanently`, ...
fn redirect_label(code: u16) -> String {
    match StatusCode::from_u16(code).ok().and_then(|s| s.canonical_reason()) {
        Some(reason) => format!("redirected with {}", reason),
        None => "redirected".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(status: CheckStatus, code: u16, info: &str) -> CheckResult {
        CheckResult {
            filename: "index.rst".to_string(),
            lineno: 1,
            uri: "http://localhost:7777/".to_string(),
            status,
            code,
            info: info.to_string(),
        }
    }

    #[test]
    fn test_working_and_ignored_are_omitted() {
        let results = vec![
            result(CheckStatus::Working, 0, ""),
            result(CheckStatus::Ignored, 0, ""),
        ];
        assert_eq!(format_text_report(&results), "");
    }

    #[test]
    fn test_broken_line_with_info() {
        let results = vec![result(
            CheckStatus::Broken,
            500,
            "500 Server Error: Internal Server Error for url: http://localhost:7777/",
        )];
        assert_eq!(
            format_text_report(&results),
            "index.rst:1: [broken] http://localhost:7777/: \
             500 Server Error: Internal Server Error for url: http://localhost:7777/\n"
        );
    }

    #[test]
    fn test_broken_line_without_info() {
        let results = vec![result(CheckStatus::Broken, 0, "")];
        assert_eq!(
            format_text_report(&results),
            "index.rst:1: [broken] http://localhost:7777/\n"
        );
    }

    #[test]
    fn test_redirected_line_renders_reason_phrase() {
        let results = vec![result(
            CheckStatus::Redirected,
            302,
            "http://localhost:7777/?redirected=1",
        )];
        assert_eq!(
            format_text_report(&results),
            "index.rst:1: [redirected with Found] \
             http://localhost:7777/ to http://localhost:7777/?redirected=1\n"
        );
    }

    #[test]
    fn test_redirected_line_without_known_reason() {
        let results = vec![result(CheckStatus::Redirected, 0, "http://example.com/")];
        assert_eq!(
            format_text_report(&results),
            "index.rst:1: [redirected] http://localhost:7777/ to http://example.com/\n"
        );
    }

    #[test]
    fn test_timeout_and_unknown_lines_appear() {
        let results = vec![
            result(CheckStatus::Timeout, 0, "operation timed out"),
            result(CheckStatus::Unknown, 0, "relative URL without a base"),
        ];
        let report = format_text_report(&results);
        assert!(report.contains("[timeout] http://localhost:7777/: operation timed out"));
        assert!(report.contains("[unknown] http://localhost:7777/: relative URL without a base"));
        assert_eq!(report.lines().count(), 2);
    }
}
