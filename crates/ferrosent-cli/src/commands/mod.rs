mod analyze;
mod sources;

use ferrosent_core::{Envelope, EnvelopeError, EnvelopeMeta, SourceId};
use serde_json::Value;
use uuid::Uuid;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<SourceId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<SourceId>) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_error(mut self, error: EnvelopeError) -> Self {
        self.errors.push(error);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let command_result = match &cli.command {
        Command::Analyze(args) => analyze::run(args, cli.timeout_ms, cli.mock).await?,
        Command::Sources(args) => sources::run(args, cli.mock)?,
    };

    let CommandResult {
        data,
        warnings,
        errors,
        latency_ms,
        source_chain,
    } = command_result;

    let mut meta = EnvelopeMeta::new(Uuid::new_v4().to_string(), source_chain, latency_ms)?;
    for warning in warnings {
        meta.push_warning(warning);
    }

    Envelope::with_errors(meta, data, errors).map_err(CliError::from)
}
