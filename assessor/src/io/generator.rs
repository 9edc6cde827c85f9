//! Generation-service boundary.
//!
//! The [`TextGenerator`] trait decouples the agents from the actual model
//! backend. Production runs use [`ProcessGenerator`], which pipes the prompt
//! into a configured command and reads the completion from its stdout; tests
//! use scripted generators that return predetermined responses without
//! spawning processes.

use std::process::Command;
use std::time::Duration;

use anyhow::{Result, anyhow};
use tracing::{debug, instrument, warn};

use crate::io::config::GenerationConfig;
use crate::io::process::run_command_with_timeout;

/// One opaque prompt headed for the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Which agent is asking; used for tracing and transcripts only.
    pub agent: &'static str,
    pub prompt: String,
}

/// Abstraction over text generation backends.
pub trait TextGenerator {
    /// Produce one completion for the request's prompt.
    fn generate(&self, request: &GenerateRequest) -> Result<String>;
}

/// Generator that spawns a configured command per call, writing the prompt
/// to its stdin and taking its stdout as the response.
pub struct ProcessGenerator {
    command: Vec<String>,
    timeout: Duration,
    output_limit_bytes: usize,
}

impl ProcessGenerator {
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        if config.command.is_empty() || config.command[0].trim().is_empty() {
            return Err(anyhow!("generation command must be a non-empty array"));
        }
        Ok(Self {
            command: config.command.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            output_limit_bytes: config.output_limit_bytes,
        })
    }
}

impl TextGenerator for ProcessGenerator {
    #[instrument(skip_all, fields(agent = request.agent, prompt_bytes = request.prompt.len()))]
    fn generate(&self, request: &GenerateRequest) -> Result<String> {
        let mut cmd = Command::new(&self.command[0]);
        cmd.args(&self.command[1..]);

        let output = run_command_with_timeout(
            cmd,
            Some(request.prompt.as_bytes()),
            self.timeout,
            self.output_limit_bytes,
        )?;

        if output.timed_out {
            warn!(timeout_secs = self.timeout.as_secs(), "generation timed out");
            return Err(anyhow!("generation timed out after {:?}", self.timeout));
        }
        if !output.status.success() {
            warn!(exit_code = ?output.status.code(), "generation command failed");
            return Err(anyhow!(
                "generation command failed with status {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        debug!(response_bytes = output.stdout.len(), "generation completed");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
