use std::path::PathBuf;

use crate::config::ScannerConfig;

/// One scanner run: the interpreter, the script and the full argument list.
/// Built per request and never shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub python_bin: PathBuf,
    pub smuggler_path: PathBuf,
    pub target_url: String,
    pub extra_args: Vec<String>,
}

impl Invocation {
    pub fn new(config: &ScannerConfig, target_url: impl Into<String>, extra_args: Vec<String>) -> Self {
        Self {
            python_bin: config.python_bin.clone(),
            smuggler_path: config.smuggler_path.clone(),
            target_url: target_url.into(),
            extra_args,
        }
    }

    /// Arguments passed to the interpreter: `<script> -u <url> [extra...]`.
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(3 + self.extra_args.len());
        args.push(self.smuggler_path.display().to_string());
        args.push("-u".to_string());
        args.push(self.target_url.clone());
        args.extend(self.extra_args.iter().cloned());
        args
    }

    /// Space-joined command line, reported back for reproducing the run.
    pub fn command_line(&self) -> String {
        let mut parts = vec![self.python_bin.display().to_string()];
        parts.extend(self.args());
        parts.join(" ")
    }
}
