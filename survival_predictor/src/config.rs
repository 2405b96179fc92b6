use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, net::SocketAddr, path::PathBuf};

use crate::model::{Backend, ModelSource};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8501";
pub const DEFAULT_MODEL_FILE: &str = "titanic_v0.json";

/// Optional JSON file named by `CONFIG_PATH`. Env vars win over it.
#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    model_path: Option<PathBuf>,
    meta_path: Option<PathBuf>,
    backend: Option<Backend>,
    bind_addr: Option<SocketAddr>,
    log_predictions: Option<bool>,
}

impl FileConfig {
    fn load(path: &str) -> Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("config file not found: {path}"))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config JSON in {path}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub model: ModelSource,
    pub bind_addr: SocketAddr,
    /// `LOG_PRED=1`: log every feature vector sent to the model.
    pub log_predictions: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = match get("CONFIG_PATH") {
            Some(path) => FileConfig::load(&path)?,
            None => FileConfig::default(),
        };

        let backend = match get("MODEL_BACKEND") {
            Some(s) => s.parse::<Backend>().map_err(anyhow::Error::msg)?,
            None => file.backend.unwrap_or_default(),
        };

        let model_path = get("MODEL_PATH")
            .map(PathBuf::from)
            .or(file.model_path)
            .unwrap_or_else(resolve_model_path);

        let meta_path = get("META_PATH").map(PathBuf::from).or(file.meta_path);

        let bind_addr = match get("BIND_ADDR") {
            Some(s) => s
                .parse::<SocketAddr>()
                .with_context(|| format!("BIND_ADDR is not a socket address: {s}"))?,
            None => match file.bind_addr {
                Some(addr) => addr,
                None => DEFAULT_BIND_ADDR.parse::<SocketAddr>()?,
            },
        };

        let log_predictions = match get("LOG_PRED") {
            Some(v) => v == "1",
            None => file.log_predictions.unwrap_or(false),
        };

        Ok(Self {
            model: ModelSource {
                backend,
                model_path,
                meta_path,
            },
            bind_addr,
            log_predictions,
        })
    }
}

/// Find the bundled artifact when `MODEL_PATH` is unset: prefer
/// workspace-relative, then crate-relative, then next to the executable.
pub fn resolve_model_path() -> PathBuf {
    let candidates = [
        PathBuf::from("models").join(DEFAULT_MODEL_FILE),
        PathBuf::from("survival_predictor/models").join(DEFAULT_MODEL_FILE),
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("models")
            .join(DEFAULT_MODEL_FILE),
        {
            let mut p = std::env::current_exe().unwrap_or_else(|_| PathBuf::from("."));
            p.pop(); // exe dir
            p.push("models");
            p.push(DEFAULT_MODEL_FILE);
            p
        },
    ];

    for c in candidates {
        if c.exists() {
            return c;
        }
    }

    // Fallback to default relative path; the loader reports the read error
    PathBuf::from("models").join(DEFAULT_MODEL_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults_bind_loopback_and_find_bundled_model() {
        let cfg = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.bind_addr, DEFAULT_BIND_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.model.backend, Backend::Json);
        assert!(cfg.model.model_path.ends_with(DEFAULT_MODEL_FILE));
        assert!(!cfg.log_predictions);
    }

    #[test]
    fn env_values_are_used() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("MODEL_PATH", "/srv/m.json"),
            ("BIND_ADDR", "0.0.0.0:9000"),
            ("LOG_PRED", "1"),
        ]))
        .unwrap();
        assert_eq!(cfg.model.model_path, PathBuf::from("/srv/m.json"));
        assert_eq!(cfg.bind_addr.port(), 9000);
        assert!(cfg.log_predictions);
    }

    #[test]
    fn env_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(
            &path,
            r#"{"model_path":"/from/file.json","bind_addr":"127.0.0.1:7000","log_predictions":true}"#,
        )
        .unwrap();
        let cfg = AppConfig::from_lookup(lookup(&[
            ("CONFIG_PATH", path.to_str().unwrap()),
            ("BIND_ADDR", "127.0.0.1:7100"),
        ]))
        .unwrap();
        assert_eq!(cfg.model.model_path, PathBuf::from("/from/file.json"));
        assert_eq!(cfg.bind_addr.port(), 7100);
        assert!(cfg.log_predictions);
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(AppConfig::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("MODEL_BACKEND", "onnx")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("CONFIG_PATH", "/no/such/file.json")])).is_err());
    }
}
