use serde::Serialize;

use ferrosent_core::{Credentials, SourceId};

use crate::cli::SourcesArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct SourceStatus {
    id: SourceId,
    provider: &'static str,
    requires_credential: bool,
    configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<[&'static str; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'static str>,
}

#[derive(Debug, Serialize)]
struct SourcesResponseData {
    sources: Vec<SourceStatus>,
}

pub fn run(args: &SourcesArgs, mock: bool) -> Result<CommandResult, CliError> {
    let credentials = if mock {
        Credentials::default()
    } else {
        Credentials::from_env()
    };

    let sources = SourceId::ALL
        .into_iter()
        .map(|id| SourceStatus {
            id,
            provider: id.provider(),
            requires_credential: id.requires_credential(),
            configured: mock || credentials.is_ready(id),
            env: args.verbose.then(|| env_names(id)).flatten(),
            note: scope_note(id),
        })
        .collect::<Vec<_>>();

    let warnings = sources
        .iter()
        .filter(|status| !status.configured)
        .map(|status| format!("{} source has no credential and will be skipped", status.id))
        .collect();

    let data = serde_json::to_value(SourcesResponseData { sources })?;
    Ok(CommandResult::ok(data, SourceId::ALL.to_vec()).with_warnings(warnings))
}

fn env_names(id: SourceId) -> Option<[&'static str; 2]> {
    match id {
        SourceId::Social => Some(["FERROSENT_TWITTER_BEARER", "TWITTER_BEARER"]),
        SourceId::News => Some(["FERROSENT_NEWSAPI_KEY", "NEWSAPI_KEY"]),
        SourceId::FinancialNews => Some(["FERROSENT_FINNHUB_API_KEY", "FINNHUB_API_KEY"]),
        SourceId::AssetStatus => None,
    }
}

fn scope_note(id: SourceId) -> Option<&'static str> {
    match id {
        SourceId::FinancialNews => {
            Some("general market feed; the asset is not used to filter headlines")
        }
        SourceId::AssetStatus => Some("crypto assets only; looked up by lowercase name slug"),
        SourceId::Social | SourceId::News => None,
    }
}
