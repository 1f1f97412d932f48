use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_SCORES_INTERVAL: Duration = Duration::from_secs(30);
const DEFAULT_ODDS_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    pub scores_interval: Duration,
    pub odds_interval: Duration,
    pub odds_cache: PathBuf,
    /// Replaces the ESPN base URL, e.g. for a local mirror.
    pub feed_url: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            scores_interval: DEFAULT_SCORES_INTERVAL,
            odds_interval: DEFAULT_ODDS_INTERVAL,
            odds_cache: PathBuf::from("odds.json"),
            feed_url: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an environment lookup. Unparsable values keep the
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let seconds = |key: &str| {
            var(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
        };

        let defaults = Self::default();
        Self {
            full_screen: false,
            log_level: var("GRIDTUI_LOG").and_then(|v| v.trim().parse::<LevelFilter>().ok()),
            scores_interval: seconds("GRIDTUI_SCORES_INTERVAL").unwrap_or(defaults.scores_interval),
            odds_interval: seconds("GRIDTUI_ODDS_INTERVAL").unwrap_or(defaults.odds_interval),
            odds_cache: var("GRIDTUI_ODDS_CACHE")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_odds_path(&var)),
            feed_url: var("GRIDTUI_FEED_URL"),
        }
    }
}

fn default_odds_path(var: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(config_dir) = var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_dir).join("gridtui").join("odds.json");
    }
    if let Some(home) = var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join("gridtui")
            .join("odds.json");
    }
    PathBuf::from("odds.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let s = settings(&[]);
        assert_eq!(s.scores_interval, Duration::from_secs(30));
        assert_eq!(s.odds_interval, Duration::from_secs(3600));
        assert_eq!(s.odds_cache, PathBuf::from("odds.json"));
        assert_eq!(s.log_level, None);
        assert_eq!(s.feed_url, None);
    }

    #[test]
    fn intervals_and_level_are_read_from_env() {
        let s = settings(&[
            ("GRIDTUI_SCORES_INTERVAL", "15"),
            ("GRIDTUI_ODDS_INTERVAL", "600"),
            ("GRIDTUI_LOG", "debug"),
        ]);
        assert_eq!(s.scores_interval, Duration::from_secs(15));
        assert_eq!(s.odds_interval, Duration::from_secs(600));
        assert_eq!(s.log_level, Some(LevelFilter::Debug));
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let s = settings(&[
            ("GRIDTUI_SCORES_INTERVAL", "soon"),
            ("GRIDTUI_ODDS_INTERVAL", "0"),
            ("GRIDTUI_LOG", "loud"),
        ]);
        assert_eq!(s.scores_interval, Duration::from_secs(30));
        assert_eq!(s.odds_interval, Duration::from_secs(3600));
        assert_eq!(s.log_level, None);
    }

    #[test]
    fn odds_cache_prefers_explicit_path_then_xdg_then_home() {
        let explicit = settings(&[("GRIDTUI_ODDS_CACHE", "/tmp/o.json"), ("HOME", "/home/fan")]);
        assert_eq!(explicit.odds_cache, PathBuf::from("/tmp/o.json"));

        let xdg = settings(&[("XDG_CONFIG_HOME", "/cfg"), ("HOME", "/home/fan")]);
        assert_eq!(xdg.odds_cache, PathBuf::from("/cfg/gridtui/odds.json"));

        let home = settings(&[("HOME", "/home/fan")]);
        assert_eq!(home.odds_cache, PathBuf::from("/home/fan/.config/gridtui/odds.json"));
    }
}
