use std::path::PathBuf;

use gdl_engine::{EngineConfig, YtDlpSettings};

use super::logging::LogDestination;

const ENV_YTDLP: &str = "GDL_YTDLP";
const ENV_WORKERS: &str = "GDL_WORKERS";
const ENV_LOG: &str = "GDL_LOG";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ytdlp: YtDlpSettings,
    pub engine: EngineConfig,
    pub log_destination: LogDestination,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let ytdlp = lookup(ENV_YTDLP)
            .filter(|value| !value.trim().is_empty())
            .map(|binary| YtDlpSettings {
                binary: PathBuf::from(binary.trim()),
            })
            .unwrap_or_default();

        let mut engine = EngineConfig::default();
        if let Some(workers) = lookup(ENV_WORKERS).and_then(|v| v.trim().parse::<usize>().ok()) {
            engine.worker_threads = workers.max(1);
        }

        let log_destination = match lookup(ENV_LOG).as_deref().map(str::trim) {
            Some("terminal") => LogDestination::Terminal,
            Some("both") => LogDestination::Both,
            _ => LogDestination::File,
        };

        Self {
            ytdlp,
            engine,
            log_destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = config(&[]);
        assert_eq!(config.ytdlp.binary, YtDlpSettings::default().binary);
        assert_eq!(config.engine.worker_threads, EngineConfig::default().worker_threads);
        assert_eq!(config.log_destination, LogDestination::File);
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            (ENV_YTDLP, "/opt/yt-dlp/bin/yt-dlp"),
            (ENV_WORKERS, "8"),
            (ENV_LOG, "both"),
        ]);
        assert_eq!(config.ytdlp.binary, PathBuf::from("/opt/yt-dlp/bin/yt-dlp"));
        assert_eq!(config.engine.worker_threads, 8);
        assert_eq!(config.log_destination, LogDestination::Both);
    }

    #[test]
    fn invalid_worker_count_keeps_default() {
        let config = config(&[(ENV_WORKERS, "many"), (ENV_YTDLP, "  ")]);
        assert_eq!(config.engine.worker_threads, EngineConfig::default().worker_threads);
        assert_eq!(config.ytdlp.binary, YtDlpSettings::default().binary);
        assert_eq!(self::config(&[(ENV_WORKERS, "0")]).engine.worker_threads, 1);
    }
}
