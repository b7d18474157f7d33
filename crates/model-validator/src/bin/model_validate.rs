//! `model-validate <data.json> <model.json>`
//!
//! Validates a JSON document against a declarative model and prints the
//! result as JSON. Exits 0 when nothing reached `error`, 1 when something
//! did, 2 on usage or load failures. Set `RUST_LOG=debug` for engine logs.

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use model_validator::{validate, ModelSpec, ValidationResult, ValidatorRegistry, ViolationLevel};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn run(args: &[String]) -> Result<ValidationResult> {
    let [data_path, model_path] = args else {
        bail!("usage: model-validate <data.json> <model.json>");
    };

    let data = read_json(Path::new(data_path))?;
    let spec = ModelSpec::from_value(read_json(Path::new(model_path))?)
        .with_context(|| format!("loading model {model_path}"))?;
    let model = spec.build(&ValidatorRegistry::builtin())?;
    tracing::info!(rules = model.len(), "model loaded");

    Ok(validate(&data, &model))
}

fn exit_status(outcome: &Result<ValidationResult>) -> u8 {
    match outcome {
        Ok(result) if result.level >= ViolationLevel::Error => 1,
        Ok(_) => 0,
        Err(_) => 2,
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = run(&args);
    match &outcome {
        Ok(result) => match serde_json::to_string_pretty(result) {
            Ok(text) => println!("{text}"),
            Err(err) => {
                eprintln!("model-validate: {err}");
                return ExitCode::from(2);
            }
        },
        Err(err) => eprintln!("model-validate: {err:#}"),
    }
    ExitCode::from(exit_status(&outcome))
}
