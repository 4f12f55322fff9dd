//! Dashboard configuration.
//! Fixed data source and the default selections shown at startup.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the Ember "Yearly electricity data Europe" long-format release.
pub const DATA_FILE_NAME: &str = "europe_yearly_full_release_long_format.csv";

/// Static settings for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_file: PathBuf,
    pub default_mix_countries: Vec<String>,
    pub default_trend_countries: Vec<String>,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
    /// Time each year stays on screen while the mix chart is playing.
    pub frame_interval: Duration,
    /// Rows shown in the dataset preview table.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE_NAME),
            default_mix_countries: vec!["Germany".to_string(), "Spain".to_string()],
            default_trend_countries: vec![
                "Germany".to_string(),
                "Croatia".to_string(),
                "Denmark".to_string(),
            ],
            window_size: [1280.0, 900.0],
            min_window_size: [960.0, 640.0],
            frame_interval: Duration::from_millis(800),
            preview_rows: 200,
        }
    }
}

impl DashboardConfig {
    /// Locate the data file: working directory first, then next to the executable.
    pub fn resolve_data_file(&self) -> PathBuf {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        resolve_against(&self.data_file, exe_dir.as_deref())
    }
}

fn resolve_against(data_file: &Path, exe_dir: Option<&Path>) -> PathBuf {
    if data_file.is_absolute() || data_file.exists() {
        return data_file.to_path_buf();
    }
    match exe_dir {
        Some(dir) if dir.join(data_file).exists() => dir.join(data_file),
        _ => data_file.to_path_buf(),
    }
}

/// Keep only the defaults that exist among the available options.
pub fn defaults_present(defaults: &[String], options: &[String]) -> Vec<String> {
    defaults
        .iter()
        .filter(|d| options.contains(d))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn default_selections_match_dashboard_views() {
        let config = DashboardConfig::default();
        assert_eq!(config.default_mix_countries, ["Germany", "Spain"]);
        assert_eq!(
            config.default_trend_countries,
            ["Germany", "Croatia", "Denmark"]
        );
        assert_eq!(config.data_file, PathBuf::from(DATA_FILE_NAME));
    }

    #[test]
    fn falls_back_to_executable_directory() {
        let dir = tempdir().unwrap();
        let name = Path::new("europower_missing_in_cwd.csv");
        File::create(dir.path().join(name)).unwrap();

        let resolved = resolve_against(name, Some(dir.path()));
        assert_eq!(resolved, dir.path().join(name));
    }

    #[test]
    fn unresolvable_path_is_returned_unchanged() {
        let dir = tempdir().unwrap();
        let name = Path::new("europower_nowhere.csv");
        assert_eq!(resolve_against(name, Some(dir.path())), name);
        assert_eq!(resolve_against(name, None), name);
    }

    #[test]
    fn defaults_missing_from_options_are_dropped() {
        let options = vec!["Germany".to_string(), "Denmark".to_string()];
        let defaults = DashboardConfig::default().default_trend_countries;
        assert_eq!(defaults_present(&defaults, &options), ["Germany", "Denmark"]);
    }
}
