use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories_next::ProjectDirs;

pub const ENV_CONFIG_DIR: &str = "DXTVIEW_CONFIG_DIR";

const QUALIFIER: &str = "org";
const ORGANISATION: &str = "dxtview";
const APPLICATION: &str = "dxtview";

/// Per-user directories the viewer reads from.
#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> Result<Self> {
        let config_dir = if let Some(value) = env_override(ENV_CONFIG_DIR) {
            value
        } else {
            let project_dirs = ProjectDirs::from(QUALIFIER, ORGANISATION, APPLICATION)
                .ok_or_else(|| anyhow!("failed to determine user directories"))?;
            project_dirs.config_dir().to_path_buf()
        };

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }
}

#[cfg(test)]
impl AppPaths {
    pub fn from_raw(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }
}

fn env_override(env_var: &str) -> Option<PathBuf> {
    match env::var_os(env_var) {
        Some(value) if !value.is_empty() => Some(PathBuf::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_file_lives_under_config_dir() {
        let paths = AppPaths::from_raw(PathBuf::from("/tmp/dxtview-config"));
        assert_eq!(
            paths.settings_file(),
            PathBuf::from("/tmp/dxtview-config/settings.toml")
        );
    }

    #[test]
    fn env_override_wins() {
        env::set_var(ENV_CONFIG_DIR, "/tmp/dxtview-env-test");
        let paths = AppPaths::discover().unwrap();
        assert_eq!(paths.config_dir(), Path::new("/tmp/dxtview-env-test"));
        env::remove_var(ENV_CONFIG_DIR);
    }
}
