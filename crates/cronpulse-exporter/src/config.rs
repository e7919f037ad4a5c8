//! Exporter configuration.
//!
//! Resolved once at construction and immutable afterwards; nothing here
//! is a process-wide setter.

use std::path::PathBuf;

/// Environment variable overriding the exporter directory.
pub const ENV_EXPORTER_DIR: &str = "COLLECTOR_TEXTFILE_PATH";

/// Default directory scanned by the node_exporter textfile collector.
pub const DEFAULT_EXPORTER_DIR: &str = "/var/lib/prometheus/node-exporter";

/// Default exposition file name.
pub const DEFAULT_FILENAME: &str = "crons.prom";

/// Default metric name prefix.
pub const DEFAULT_PREFIX: &str = "crontab";

/// Immutable exporter configuration.
#[derive(Debug, Clone)]
pub struct Config {
    dir: PathBuf,
    filename: String,
    prefix: String,
    disabled: bool,
}

impl Config {
    /// Resolve from builder inputs plus the process environment.
    pub(crate) fn resolve(
        dir: Option<PathBuf>,
        filename: Option<String>,
        prefix: Option<String>,
        disabled: bool,
    ) -> Self {
        let env_dir = std::env::var(ENV_EXPORTER_DIR).ok();
        Self::resolve_with_env(dir, env_dir.as_deref(), filename, prefix, disabled)
    }

    /// Directory precedence: explicit option, then a non-empty environment
    /// override, then the built-in default.
    fn resolve_with_env(
        dir: Option<PathBuf>,
        env_dir: Option<&str>,
        filename: Option<String>,
        prefix: Option<String>,
        disabled: bool,
    ) -> Self {
        let dir = match dir {
            Some(dir) => dir,
            None => match env_dir {
                Some(value) if !value.is_empty() => PathBuf::from(value),
                _ => PathBuf::from(DEFAULT_EXPORTER_DIR),
            },
        };
        Self {
            dir,
            filename: filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            prefix: prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            disabled,
        }
    }

    /// Full path of the exposition file.
    pub fn exporter_path(&self) -> PathBuf {
        self.dir.join(&self.filename)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Prefix `name` with `<prefix>_`, unless it already is.
    pub fn prefixed(&self, name: &str) -> String {
        let wanted = format!("{}_", self.prefix);
        if name.starts_with(&wanted) {
            name.to_string()
        } else {
            format!("{wanted}{name}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn resolve(dir: Option<&str>, env: Option<&str>) -> Config {
        Config::resolve_with_env(dir.map(PathBuf::from), env, None, None, false)
    }

    // ── Directory precedence ───────────────────────────────────────

    #[test]
    fn explicit_dir_beats_env_and_default() {
        let config = resolve(Some("/custom/dir"), Some("/env/path"));
        assert_eq!(config.exporter_path(), Path::new("/custom/dir/crons.prom"));
    }

    #[test]
    fn env_dir_beats_default() {
        let config = resolve(None, Some("/env/path"));
        assert_eq!(config.exporter_path(), Path::new("/env/path/crons.prom"));
    }

    #[test]
    fn empty_env_dir_is_ignored() {
        let config = resolve(None, Some(""));
        assert_eq!(
            config.exporter_path(),
            Path::new("/var/lib/prometheus/node-exporter/crons.prom")
        );
    }

    #[test]
    fn default_dir_when_nothing_is_set() {
        let config = resolve(None, None);
        assert_eq!(
            config.exporter_path(),
            Path::new("/var/lib/prometheus/node-exporter/crons.prom")
        );
    }

    #[test]
    fn custom_filename_joins_resolved_dir() {
        let config = Config::resolve_with_env(
            None,
            Some("/env/path"),
            Some("my-metrics.prom".to_string()),
            None,
            false,
        );
        assert_eq!(config.exporter_path(), Path::new("/env/path/my-metrics.prom"));
    }

    // ── Prefixing ──────────────────────────────────────────────────

    #[test]
    fn prefixed_adds_prefix_once() {
        let config = resolve(None, None);
        assert_eq!(config.prefixed("running"), "crontab_running");
        assert_eq!(config.prefixed("crontab_running"), "crontab_running");
    }

    #[test]
    fn prefixed_respects_custom_prefix() {
        let config =
            Config::resolve_with_env(None, None, None, Some("batch".to_string()), false);
        assert_eq!(config.prefixed("running"), "batch_running");
        assert_eq!(config.prefixed("batch_running"), "batch_running");
        // A different tool's prefix still gets ours.
        assert_eq!(config.prefixed("crontab_running"), "batch_crontab_running");
    }
}
