use ferrosent_core::{
    ClassifierKind, Credentials, EnvelopeError, PipelineError, SentimentPipelineBuilder, SourceId,
};
use serde_json::json;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;

use super::CommandResult;

pub const NO_DATA_WARNING: &str = "no data found for analysis";

pub async fn run(args: &AnalyzeArgs, timeout_ms: u64, mock: bool) -> Result<CommandResult, CliError> {
    let classifier: ClassifierKind = args.classifier.into();
    let builder = if mock {
        SentimentPipelineBuilder::new().with_mock_mode()
    } else {
        SentimentPipelineBuilder::new().with_real_clients()
    };
    let warnings = if mock {
        vec![String::from("mock mode: upstream payloads are canned fixtures")]
    } else {
        credential_warnings(builder.credentials(), classifier)
    };

    let pipeline = builder
        .with_sample_size(args.sample_size)
        .with_social_max_results(args.max_results)
        .with_timeout_ms(timeout_ms)
        .with_classifier_kind(classifier)
        .build()?;
    let source_chain = pipeline.source_chain();

    match pipeline.analyze(&args.asset).await {
        Ok(report) => {
            let no_data = report.signal.is_no_data();
            let latency_ms = report.latency_ms;
            let mut result = CommandResult::ok(serde_json::to_value(&report)?, source_chain)
                .with_latency(latency_ms)
                .with_warnings(warnings);
            if no_data {
                result = result.with_warning(NO_DATA_WARNING);
            }
            Ok(result)
        }
        Err(PipelineError::InvalidAsset(error)) => Err(error.into()),
        Err(PipelineError::Classifier(error)) => {
            tracing::error!("classification failed: {error}");
            let envelope_error = EnvelopeError::new(
                "pipeline.classifier_failure",
                format!("sentiment classification failed: {error}"),
            )?
            .with_retryable(error.retryable());

            Ok(CommandResult::ok(
                json!({ "asset": args.asset.trim(), "signal": null }),
                source_chain,
            )
            .with_warnings(warnings)
            .with_error(envelope_error))
        }
    }
}

fn credential_warnings(credentials: &Credentials, classifier: ClassifierKind) -> Vec<String> {
    let mut warnings: Vec<String> = SourceId::ALL
        .into_iter()
        .filter(|source| !credentials.is_ready(*source))
        .map(|source| format!("{source} source skipped: no {} credential configured", source.provider()))
        .collect();
    if classifier == ClassifierKind::Hosted && credentials.classifier_token.is_none() {
        warnings.push(String::from(
            "hosted classifier token not configured; use --classifier lexicon to score offline",
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ClassifierSelector;

    fn args(asset: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            asset: String::from(asset),
            sample_size: 20,
            max_results: 10,
            classifier: ClassifierSelector::Lexicon,
        }
    }

    #[tokio::test]
    async fn mock_analysis_reports_a_score() {
        let result = run(&args("AAPL"), 3_000, true).await.expect("command succeeds");

        assert!(result.errors.is_empty());
        assert_eq!(result.source_chain, SourceId::ALL.to_vec());
        assert_eq!(result.data["asset"], "AAPL");
        assert!(result.data["signal"]["score"].is_number());
        assert!(!result.warnings.iter().any(|w| w == NO_DATA_WARNING));
    }

    #[tokio::test]
    async fn blank_asset_is_a_validation_error() {
        let error = run(&args("  "), 3_000, true).await.err().expect("must fail");
        assert_eq!(error.exit_code(), 2);
    }

    #[tokio::test]
    async fn zero_sample_size_is_a_validation_error() {
        let mut zero = args("AAPL");
        zero.sample_size = 0;
        let error = run(&zero, 3_000, true).await.err().expect("must fail");
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn missing_credentials_become_warnings() {
        let warnings = credential_warnings(&Credentials::default(), ClassifierKind::Hosted);
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].starts_with("social source skipped"));
        assert!(warnings[3].starts_with("hosted classifier token"));
    }

    #[test]
    fn lexicon_run_does_not_warn_about_classifier_token() {
        let credentials = Credentials {
            social_bearer_token: Some(String::from("tw")),
            news_api_key: Some(String::from("na")),
            financial_news_api_key: Some(String::from("fh")),
            classifier_token: None,
        };

        assert!(credential_warnings(&credentials, ClassifierKind::Lexicon).is_empty());
        assert_eq!(credential_warnings(&credentials, ClassifierKind::Hosted).len(), 1);
    }
}
