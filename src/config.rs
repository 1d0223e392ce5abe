use std::{env, path::PathBuf};

pub const DEFAULT_MODEL_DIR: &str = "t5_experiment_three";
pub const DEFAULT_NLP_DIR: &str = "ro_core_news_lg";
pub const DEFAULT_BIND: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevicePreference {
    Auto,
    Cpu,
    Cuda(usize),
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub model_dir: PathBuf,
    pub nlp_dir: PathBuf,
    pub device: DevicePreference,
    pub bind: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            nlp_dir: PathBuf::from(DEFAULT_NLP_DIR),
            device: DevicePreference::Auto,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by `FAKENEWS_*` variables (after `.env` is loaded).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            model_dir: env_var("FAKENEWS_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.model_dir),
            nlp_dir: env_var("FAKENEWS_NLP_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.nlp_dir),
            device: env_var("FAKENEWS_DEVICE")
                .map(|v| parse_device_preference(&v))
                .unwrap_or(defaults.device),
            bind: env_var("FAKENEWS_BIND").unwrap_or(defaults.bind),
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.trim().is_empty())
}

pub fn parse_device_preference(value: &str) -> DevicePreference {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();
    if lower == "cpu" {
        DevicePreference::Cpu
    } else if lower.starts_with("cuda") || lower.starts_with("gpu") {
        let ordinal = trimmed
            .split(':')
            .nth(1)
            .and_then(|part| part.parse::<usize>().ok())
            .unwrap_or(0);
        DevicePreference::Cuda(ordinal)
    } else {
        if lower != "auto" {
            tracing::warn!(
                "unrecognized FAKENEWS_DEVICE value '{}', defaulting to auto",
                trimmed
            );
        }
        DevicePreference::Auto
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_deployed_layout() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.model_dir, PathBuf::from("t5_experiment_three"));
        assert_eq!(cfg.nlp_dir, PathBuf::from("ro_core_news_lg"));
        assert_eq!(cfg.device, DevicePreference::Auto);
        assert_eq!(cfg.bind, "0.0.0.0:8000");
    }

    #[test]
    fn parses_device_strings() {
        assert_eq!(parse_device_preference("cpu"), DevicePreference::Cpu);
        assert_eq!(parse_device_preference(" CPU "), DevicePreference::Cpu);
        assert_eq!(parse_device_preference("cuda"), DevicePreference::Cuda(0));
        assert_eq!(parse_device_preference("cuda:1"), DevicePreference::Cuda(1));
        assert_eq!(parse_device_preference("gpu:2"), DevicePreference::Cuda(2));
        assert_eq!(parse_device_preference("auto"), DevicePreference::Auto);
        assert_eq!(parse_device_preference("tpu"), DevicePreference::Auto);
    }
}
