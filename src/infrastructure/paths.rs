//! Per-user file locations

use std::path::{Path, PathBuf};

const APP_DIR: &str = "clip-history";

/// `<config_dir>/clip-history/<name>`
pub fn config_file(name: &str) -> PathBuf {
    app_dir(dirs::config_dir(), ".config").join(name)
}

/// `<data_dir>/clip-history/<name>`
pub fn data_file(name: &str) -> PathBuf {
    app_dir(dirs::data_dir(), ".local/share").join(name)
}

/// Without a platform dir, fall back to the XDG default under `$HOME`
fn app_dir(platform: Option<PathBuf>, home_relative: &str) -> PathBuf {
    platform
        .or_else(|| dirs::home_dir().map(|home| home.join(home_relative)))
        .unwrap_or_else(|| PathBuf::from(home_relative))
        .join(APP_DIR)
}

/// Scratch file next to `path`, renamed over it once fully written
pub fn temp_sibling(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_app_dir() {
        assert!(config_file("config.toml").ends_with("clip-history/config.toml"));
        assert!(data_file("store.json").ends_with("clip-history/store.json"));
    }

    #[test]
    fn missing_platform_dir_uses_home() {
        let dir = app_dir(None, ".config");
        assert!(dir.ends_with(".config/clip-history"));
    }

    #[test]
    fn temp_sibling_appends_suffix() {
        assert_eq!(
            temp_sibling(Path::new("/data/store.json")),
            PathBuf::from("/data/store.json.tmp")
        );
    }
}
