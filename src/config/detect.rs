use crate::DetectorParams;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Destination of the JSON report; printed to stdout when unset.
    pub json_out: Option<PathBuf>,
    /// Print the per-image text summary.
    pub text: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RuntimeConfig {
    pub input_paths: Vec<PathBuf>,
    pub model_path: PathBuf,
    #[serde(default)]
    pub enroll_all: bool,
    #[serde(default)]
    pub detector: DetectorParams,
    #[serde(default)]
    pub output: OutputConfig,
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: RuntimeConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    if config.input_paths.is_empty() {
        return Err(format!("Config {} lists no input images", path.display()));
    }
    Ok(config)
}

/// Load the configuration named by the single command-line argument.
pub fn parse_cli(program: &str) -> Result<RuntimeConfig, String> {
    let mut args = env::args().skip(1);
    let path = match (args.next(), args.next()) {
        (Some(path), None) => PathBuf::from(path),
        _ => return Err(format!("Usage: {program} <config.json>")),
    };
    load_config(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let file = write_config(r#"{ "input_paths": ["a.png"], "model_path": "m.json" }"#);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.input_paths, vec![PathBuf::from("a.png")]);
        assert!(!config.enroll_all);
        assert_eq!(config.detector, DetectorParams::default());
        assert!(config.output.json_out.is_none());
        assert!(!config.output.text);
    }

    #[test]
    fn nested_detector_section_is_parsed() {
        let file = write_config(
            r#"{
                "input_paths": ["a.png", "b.png"],
                "model_path": "m.json",
                "enroll_all": true,
                "detector": { "scan": { "min_size": 32 }, "cluster": { "eps": 0.3 } },
                "output": { "json_out": "out/report.json", "text": true }
            }"#,
        );
        let config = load_config(file.path()).unwrap();
        assert!(config.enroll_all);
        assert_eq!(config.detector.scan.min_size, 32);
        assert!((config.detector.cluster.eps - 0.3).abs() < 1e-6);
        assert_eq!(config.output.json_out, Some(PathBuf::from("out/report.json")));
        assert!(config.output.text);
    }

    #[test]
    fn missing_inputs_and_bad_json_are_reported() {
        let empty = write_config(r#"{ "input_paths": [], "model_path": "m.json" }"#);
        assert!(load_config(empty.path()).unwrap_err().contains("no input images"));

        let broken = write_config("{ not json");
        assert!(load_config(broken.path()).unwrap_err().starts_with("Failed to parse"));

        let missing = Path::new("/nonexistent/config.json");
        assert!(load_config(missing).unwrap_err().starts_with("Failed to read"));
    }
}
