use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};

/// An empty output path means stdout, anything else creates or truncates
/// that file.
pub fn write_output(out_file: &str, payload: &[u8]) -> Result<()> {
    if out_file.is_empty() {
        io::stdout()
            .write_all(payload)
            .context("failed to write output")?;
    } else {
        fs::write(out_file, payload)
            .with_context(|| format!("failed to write to the output file {out_file}"))?;
    }
    Ok(())
}
