//! Config loader: assembles sources in precedence order and deserializes.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::IdeagenConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

/// Loads [`IdeagenConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, workspace files, environment (lowest to highest).
    pub fn load(workspace_root: &Path) -> Result<IdeagenConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Defaults, then one explicit file, then environment.
    pub fn load_from_file(path: &Path) -> Result<IdeagenConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Location of the user-level config file, when a home can be resolved.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
