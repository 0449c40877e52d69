//! Handlers for actions that do not convert an image.

use std::path::Path;

use stitch_chart::config::DEFAULT_CONFIG;

/// Write the default config file to `path`.
///
/// Refuses to overwrite an existing file.
pub fn init_config(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Err(format!(
            "Config file already exists: {}",
            path.display()
        ));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Error creating config directory: {}", e))?;
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .map_err(|e| format!("Error writing config file: {}", e))?;

    println!("Created config file: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitch_chart::config::Config;
    use tempfile::tempdir;

    #[test]
    fn test_init_config_creates_parseable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        init_config(&path).unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert!(config.output.grid);
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "# mine\n").unwrap();
        assert!(init_config(&path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");
    }
}
