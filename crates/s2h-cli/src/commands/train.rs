//! `s2h train`: fit a classifier on a CSV file and save its bundle.

use std::path::Path;

use stress2health::classification::ModelKind;
use stress2health::config::TrainingConfig;
use stress2health::dataset::load_csv;
use stress2health::stress::StressClassifier;

use super::require_exists;
use crate::error::Result;
use crate::output;

/// Options for `s2h train`.
pub(crate) struct TrainArgs<'a> {
    pub data: &'a Path,
    pub output: &'a Path,
    pub model: Option<ModelKind>,
    pub config: Option<&'a Path>,
    pub seed: Option<u64>,
}

/// Resolves the effective configuration: file or defaults, then
/// environment, then flags.
pub(crate) fn resolve_config(args: &TrainArgs<'_>) -> Result<TrainingConfig> {
    let mut config = match args.config {
        Some(path) => {
            require_exists(path)?;
            TrainingConfig::from_file(path)?
        }
        None => TrainingConfig::default(),
    }
    .with_env_overrides();
    if let Some(kind) = args.model {
        config.model = kind;
    }
    if let Some(seed) = args.seed {
        config.random_state = seed;
    }
    config.validate()?;
    Ok(config)
}

pub(crate) fn run(args: &TrainArgs<'_>, json: bool) -> Result<()> {
    require_exists(args.data)?;
    let config = resolve_config(args)?;

    let samples = load_csv(args.data)?;
    tracing::info!(path = %args.data.display(), rows = samples.len(), "loaded training data");

    let mut classifier = StressClassifier::new(config);
    let metrics = classifier.train(&samples)?;
    let fingerprint = classifier.save(args.output)?;

    if json {
        return output::json(&serde_json::json!({
            "metrics": metrics,
            "bundle": args.output,
            "fingerprint": fingerprint.to_hex(),
        }));
    }

    output::section("Training");
    print!("{metrics}");
    output::section("Bundle");
    output::kv("Directory", args.output.display());
    output::kv("Fingerprint", fingerprint.short());
    output::success("model bundle saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_defaults() {
        let data = PathBuf::from("data.csv");
        let out = PathBuf::from("out");
        let args = TrainArgs {
            data: &data,
            output: &out,
            model: Some(ModelKind::RandomForest),
            config: None,
            seed: Some(9),
        };
        let config = resolve_config(&args).expect("resolve");
        assert_eq!(config.model, ModelKind::RandomForest);
        assert_eq!(config.random_state, 9);
    }

    #[test]
    fn test_missing_config_file() {
        let data = PathBuf::from("data.csv");
        let out = PathBuf::from("out");
        let cfg = PathBuf::from("/no/such/train.toml");
        let args = TrainArgs {
            data: &data,
            output: &out,
            model: None,
            config: Some(&cfg),
            seed: None,
        };
        assert!(matches!(
            resolve_config(&args),
            Err(crate::error::CliError::FileNotFound(_))
        ));
    }
}
