//! Headless prediction from a JSON file of raw measurements.
//!
//! Runs the same validation and prediction client as the terminal UI and
//! prints the result summary to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin predict_file -- --input features.json [--endpoint <url>]
//! ```
//!
//! Exit codes: `1` invalid input, `2` usage error, `3` prediction failed.

use std::collections::BTreeMap;
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use oncolens::adapters::http::UreqTransport;
use oncolens::adapters::sanitize::SanitizingMakeWriter;
use oncolens::application::PredictionClient;
use oncolens::domain::{FeatureSchema, FieldMarks, FormState, PredictionResponse, Validator};
use oncolens::tui::importance_bars;
use oncolens::{AppConfig, OncolensError};

const EXIT_INVALID: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_PREDICTION: u8 = 3;

const BAR_WIDTH: usize = 30;

struct Args {
    input: PathBuf,
    endpoint: Option<String>,
}

fn usage() -> String {
    "Usage: predict_file --input <features.json> [--endpoint <url>]".to_string()
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<Args, String> {
    let mut input: Option<PathBuf> = None;
    let mut endpoint: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--input" | "-i" => {
                let v = args.next().ok_or_else(usage)?;
                input = Some(PathBuf::from(v));
            }
            "--endpoint" => {
                let v = args.next().ok_or_else(usage)?;
                if !(v.starts_with("http://") || v.starts_with("https://")) {
                    return Err("--endpoint must be an http(s) URL".to_string());
                }
                endpoint = Some(v);
            }
            "-h" | "--help" => return Err(usage()),
            _ => return Err(usage()),
        }
    }

    let input = input.ok_or_else(usage)?;
    Ok(Args { input, endpoint })
}

/// Raw values keyed by feature name; numbers keep their textual form.
fn raw_values(json: &str) -> Result<BTreeMap<String, String>, String> {
    let value: Value = serde_json::from_str(json).map_err(|e| format!("Input is not JSON: {e}"))?;
    let Value::Object(map) = value else {
        return Err("Input must be a JSON object of feature name to value".to_string());
    };

    Ok(map
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) => Some((name, s)),
            Value::Number(n) => Some((name, n.to_string())),
            _ => None,
        })
        .collect())
}

fn render_summary(response: &PredictionResponse, schema: &FeatureSchema) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Diagnosis:  {}", response.prediction);
    let _ = writeln!(out, "{}", response.confidence_label());
    let _ = writeln!(out, "Risk:       {}", response.risk_tier());
    let _ = writeln!(out, "{}", response.prediction.advisory());

    let ranked = response.top_importances(schema);
    if ranked.is_empty() {
        let _ = writeln!(out, "Detailed analysis data not available");
        return out;
    }

    let _ = writeln!(out, "\nTop features:");
    for bar in importance_bars(&ranked, BAR_WIDTH) {
        let _ = writeln!(
            out,
            "  {:<24} {:<BAR_WIDTH$} {:>6}",
            bar.label,
            "█".repeat(bar.length),
            bar.value_label()
        );
    }
    out
}

/// Exit code for a failure outside field validation.
fn exit_code(err: &OncolensError) -> u8 {
    match err {
        OncolensError::Prediction(_) => EXIT_PREDICTION,
        OncolensError::Config(_) | OncolensError::Io(_) | OncolensError::Storage(_) => EXIT_USAGE,
    }
}

fn failure(err: OncolensError) -> (u8, String) {
    (exit_code(&err), err.to_string())
}

fn run(args: Args, mut config: AppConfig) -> Result<String, (u8, String)> {
    if let Some(endpoint) = args.endpoint {
        config.endpoint = endpoint;
    }

    let json = fs::read_to_string(&args.input).map_err(|e| {
        tracing::warn!(path = ?args.input, "Failed to read input file");
        failure(e.into())
    })?;
    let raw = raw_values(&json).map_err(|e| (EXIT_INVALID, e))?;

    let schema = FeatureSchema::new(config.schema);
    let mut form = FormState::new(&schema);
    let restored = form.restore(&raw);
    tracing::info!(restored, provided = raw.len(), "Loaded input values");

    let validator = Validator::new(&schema);
    let mut marks = FieldMarks::default();
    if !validator.validate_form(&form, &mut marks) {
        let details: Vec<String> = schema
            .names()
            .filter_map(|name| marks.message(name).map(|m| format!("  {name}: {m}")))
            .collect();
        return Err((
            EXIT_INVALID,
            format!("{} invalid field(s):\n{}", marks.count(), details.join("\n")),
        ));
    }

    let values = validator
        .collect(&form)
        .map_err(|(name, e)| (EXIT_INVALID, format!("  {name}: {e}")))?;

    let client = PredictionClient::new(UreqTransport::new(config.endpoint, config.timeout));
    let response = client.submit(&values).map_err(|e| failure(e.into()))?;

    Ok(render_summary(&response, &schema))
}

fn main() -> ExitCode {
    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let (code, message) = failure(e);
            eprintln!("{message}");
            return ExitCode::from(code);
        }
    };

    // stdout carries the result; logs go to stderr
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(SanitizingMakeWriter::new(writer).with_max_bytes(config.sanitize_max_bytes)),
        )
        .init();

    match run(args, config) {
        Ok(summary) => {
            print!("{summary}");
            ExitCode::SUCCESS
        }
        Err((code, message)) => {
            eprintln!("{message}");
            ExitCode::from(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oncolens::DiagnosisLabel;

    fn args(list: &[&str]) -> Result<Args, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["--input", "case.json", "--endpoint", "http://localhost:5000/api/predict"])
            .expect("Should parse");
        assert_eq!(parsed.input, PathBuf::from("case.json"));
        assert_eq!(parsed.endpoint.as_deref(), Some("http://localhost:5000/api/predict"));

        assert!(args(&[]).is_err());
        assert!(args(&["--input"]).is_err());
        assert!(args(&["--input", "a.json", "extra"]).is_err());
        assert!(args(&["--input", "a.json", "--endpoint", "ftp://x"]).is_err());
    }

    #[test]
    fn test_raw_values_keeps_strings_and_numbers() {
        let raw = raw_values(r#"{"mean_radius": 14.13, "mean_texture": "19.29", "note": true}"#)
            .expect("Should parse");
        assert_eq!(raw.get("mean_radius").map(String::as_str), Some("14.13"));
        assert_eq!(raw.get("mean_texture").map(String::as_str), Some("19.29"));
        assert!(!raw.contains_key("note"));

        assert!(raw_values("[1, 2]").is_err());
        assert!(raw_values("nope").is_err());
    }

    #[test]
    fn test_summary_lists_ranked_features() {
        let response = PredictionResponse {
            prediction: DiagnosisLabel::Malignant,
            probability: 0.75,
            feature_importances: Some(vec![
                ("mean_radius".to_string(), 0.1),
                ("worst_area".to_string(), 0.4),
            ]),
        };
        let summary = render_summary(&response, &FeatureSchema::default());

        assert!(summary.contains("Diagnosis:  Malignant"));
        assert!(summary.contains("Confidence: 75.0%"));
        assert!(summary.contains("Risk:       High Risk"));
        let worst = summary.find("Worst Area").expect("Should list worst_area");
        let mean = summary.find("Mean Radius").expect("Should list mean_radius");
        assert!(worst < mean);
    }

    #[test]
    fn test_summary_without_importances() {
        let response = PredictionResponse {
            prediction: DiagnosisLabel::Benign,
            probability: 0.1,
            feature_importances: None,
        };
        let summary = render_summary(&response, &FeatureSchema::default());
        assert!(summary.contains("Detailed analysis data not available"));
    }

    fn offline_endpoint() -> String {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Should bind");
            listener.local_addr().expect("Should have addr").port()
        };
        format!("http://127.0.0.1:{port}/api/predict")
    }

    #[test]
    fn test_exit_codes_by_failure() {
        let missing = Args {
            input: PathBuf::from("/nonexistent/oncolens/case.json"),
            endpoint: None,
        };
        let (code, _) = run(missing, AppConfig::default()).unwrap_err();
        assert_eq!(code, EXIT_USAGE);

        let dir = tempfile::tempdir().expect("Should create temp dir");
        let input = dir.path().join("case.json");

        fs::write(&input, r#"{"mean_radius": "abc"}"#).expect("Should write input");
        let (code, message) = run(
            Args {
                input: input.clone(),
                endpoint: None,
            },
            AppConfig::default(),
        )
        .unwrap_err();
        assert_eq!(code, EXIT_INVALID);
        assert!(message.contains("mean_radius: Please enter a valid number"));

        let sample: serde_json::Map<String, Value> = oncolens::domain::SAMPLE_CASE
            .iter()
            .map(|(name, value)| ((*name).to_string(), Value::String((*value).to_string())))
            .collect();
        fs::write(&input, Value::Object(sample).to_string()).expect("Should write input");
        let (code, message) = run(
            Args {
                input,
                endpoint: Some(offline_endpoint()),
            },
            AppConfig::default(),
        )
        .unwrap_err();
        assert_eq!(code, EXIT_PREDICTION);
        assert!(message.starts_with("Prediction failed:"));
    }

    #[test]
    fn test_config_errors_are_usage_errors() {
        let err = OncolensError::Config("ONCOLENS_SCHEMA must be \"full\" or \"compact\"".to_string());
        assert_eq!(exit_code(&err), EXIT_USAGE);
    }
}
