//! Session configuration loading.

use crate::replay::ReplayError;
use crayonbox_core::session::SessionConfig;
use std::fs;
use std::path::Path;

/// Load a session config from a JSON file, or the defaults when no path is given.
///
/// Missing keys take their default values.
pub fn load_config(path: Option<&Path>) -> Result<SessionConfig, ReplayError> {
    let Some(path) = path else {
        return Ok(SessionConfig::default());
    };
    let json = fs::read_to_string(path).map_err(|source| ReplayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: SessionConfig =
        serde_json::from_str(&json).map_err(|source| ReplayError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    log::debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_path() {
        assert_eq!(load_config(None).unwrap(), SessionConfig::default());
    }

    #[test]
    fn test_partial_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r##"{ "canvas_width": 320, "background": "#000000" }"##).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.canvas_width, 320);
        assert_eq!(config.canvas_height, 600);
        assert_eq!(config.background, "#000000");
    }

    #[test]
    fn test_malformed_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ canvas_width: ").unwrap();
        assert!(matches!(
            load_config(Some(&path)),
            Err(ReplayError::Parse { .. })
        ));
    }
}
