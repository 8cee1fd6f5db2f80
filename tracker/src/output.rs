use crate::errors::Result;
use crate::types::ResolvedIds;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Where resolved ids are published for later CI steps.
#[derive(Clone, Debug, PartialEq)]
pub enum OutputSink {
    /// A `key=value` file the CI runner reads after the step, like `$GITHUB_OUTPUT`.
    File(PathBuf),
    Stdout,
}

impl OutputSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => OutputSink::File(path),
            None => OutputSink::Stdout,
        }
    }

    pub fn publish(&self, ids: &ResolvedIds) -> Result<()> {
        match self {
            OutputSink::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                write_ids(&mut file, ids)?;
                tracing::info!(path = %path.display(), "Wrote step outputs");
            }
            OutputSink::Stdout => {
                tracing::info!("No CI output file configured, printing results");
                write_ids(&mut std::io::stdout().lock(), ids)?;
            }
        }
        Ok(())
    }
}

fn write_ids(out: &mut impl Write, ids: &ResolvedIds) -> std::io::Result<()> {
    writeln!(out, "product_id={}", ids.product_id)?;
    writeln!(out, "engagement_id={}", ids.engagement_id)?;
    out.flush()
}
