use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// One piece of artwork destined for one billboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchJob {
    /// Image file with the new artwork
    pub content: PathBuf,

    /// Billboard name from the configured table
    pub billboard: String,

    /// Borrow the frame of another, same-sized billboard instead of the
    /// target's own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_from: Option<String>,
}

impl PatchJob {
    pub fn new<P: Into<PathBuf>, S: Into<String>>(content: P, billboard: S) -> Self {
        Self {
            content: content.into(),
            billboard: billboard.into(),
            frame_from: None,
        }
    }

    pub fn with_frame_from<S: Into<String>>(mut self, billboard: S) -> Self {
        self.frame_from = Some(billboard.into());
        self
    }

    /// Name of the billboard whose frame is kept
    pub fn frame_source(&self) -> &str {
        self.frame_from.as_deref().unwrap_or(&self.billboard)
    }

    /// Parse `CONTENT BILLBOARD [CONTENT BILLBOARD]...` command-line pairs
    pub fn parse_pairs(args: &[String]) -> Result<Vec<PatchJob>> {
        if args.len() % 2 != 0 {
            return Err(ConfigError::InvalidValue {
                key: "jobs".to_string(),
                value: format!("expected CONTENT BILLBOARD pairs, got {} arguments", args.len()),
            }.into());
        }

        Ok(args
            .chunks(2)
            .map(|pair| PatchJob::new(&pair[0], pair[1].clone()))
            .collect())
    }
}

/// A job that could not be applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailure {
    pub job: PatchJob,
    /// Atlas being patched when it failed, if it got that far
    pub atlas: Option<PathBuf>,
    pub reason: String,
}

/// Summary of a patch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub atlases_written: Vec<PathBuf>,
    pub atlases_skipped: Vec<PathBuf>,
    /// Billboards composited into an atlas, counted per atlas
    pub applied: usize,
    pub failures: Vec<JobFailure>,
}

impl PatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.atlases_skipped.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_pairs() {
        let jobs = PatchJob::parse_pairs(&args(&[
            "invopay.png", "BILLBOARD06",
            "faucet.png", "BILLBOARD07",
        ]))
        .unwrap();

        assert_eq!(jobs, vec![
            PatchJob::new("invopay.png", "BILLBOARD06"),
            PatchJob::new("faucet.png", "BILLBOARD07"),
        ]);
    }

    #[test]
    fn test_parse_odd_arguments() {
        assert!(PatchJob::parse_pairs(&args(&["arc.png"])).is_err());
    }

    #[test]
    fn test_frame_source() {
        let own = PatchJob::new("a.png", "BILLBOARD06");
        assert_eq!(own.frame_source(), "BILLBOARD06");

        let borrowed = own.with_frame_from("BILLBOARD05");
        assert_eq!(borrowed.frame_source(), "BILLBOARD05");
    }
}
