//! Report emitters for check results
//!
//! Two independent serializations over the same result collection:
//! - Plain text: problems only, one line each
//! - JSON lines: every result, one record each

mod json;
mod text;

pub use json::{format_json_report, write_json_report};
pub use text::{format_text_report, write_text_report};

use crate::checker::CheckResult;
use crate::config::OutputConfig;
use crate::Result;
use std::path::Path;

/// Writes both report encodings to their configured paths
pub fn write_reports(results: &[CheckResult], output: &OutputConfig) -> Result<()> {
    write_text_report(results, Path::new(&output.text_path))?;
    write_json_report(results, Path::new(&output.json_path))?;
    Ok(())
}
