use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::BmadError;
use crate::BmadResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["bmad.toml", ".bmad.toml", ".config/bmad.toml"];

/// Plugin sources copied by the installer, relative to the project root.
pub const DEFAULT_SOURCE_DIR: &str = "claude-code-plugin/src";
/// Assistant directory, relative to the home directory.
pub const DEFAULT_CLAUDE_DIR_NAME: &str = ".claude";
/// Project configuration directory, relative to the project root.
pub const DEFAULT_CONFIG_DIR: &str = ".bmad";
/// Default folder for generated artifacts, relative to the project root.
pub const DEFAULT_OUTPUT_FOLDER: &str = "bmad-output";

/// Configuration loaded from a `bmad.toml` file.
///
/// ```toml
/// [install]
/// source_dir = "claude-code-plugin/src"
/// claude_dir = "~/.claude"
/// config_dir = ".bmad"
/// output_folder = "docs/bmad"
/// user_name = "Ada"
/// ```
///
/// Every key is optional. Command line flags take precedence over the file,
/// and the file over the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct BmadConfig {
	#[serde(default)]
	pub install: InstallSettings,
}

/// The `[install]` section.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct InstallSettings {
	/// Directory holding `commands/`, `skills/` and `subagents/`. Relative
	/// paths resolve against the project root.
	#[serde(default)]
	pub source_dir: Option<PathBuf>,
	/// Assistant directory receiving the installed files. A leading `~/`
	/// resolves against the home directory.
	#[serde(default)]
	pub claude_dir: Option<PathBuf>,
	/// Where `config.yaml` and backups are written, relative to the project
	/// root.
	#[serde(default)]
	pub config_dir: Option<PathBuf>,
	/// Default answer for the output folder prompt.
	#[serde(default)]
	pub output_folder: Option<String>,
	/// Default answer for the user name prompt.
	#[serde(default)]
	pub user_name: Option<String>,
}

impl InstallSettings {
	/// Fill every unset field of `self` from `fallback`.
	#[must_use]
	pub fn or(self, fallback: Self) -> Self {
		Self {
			source_dir: self.source_dir.or(fallback.source_dir),
			claude_dir: self.claude_dir.or(fallback.claude_dir),
			config_dir: self.config_dir.or(fallback.config_dir),
			output_folder: self.output_folder.or(fallback.output_folder),
			user_name: self.user_name.or(fallback.user_name),
		}
	}
}

impl BmadConfig {
	/// Return the first config file candidate that exists under `root`.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> BmadResult<Option<BmadConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: BmadConfig =
			toml::from_str(&content).map_err(|e| BmadError::ConfigParse(e.to_string()))?;

		tracing::debug!(path = %config_path.display(), "loaded config");
		Ok(Some(config))
	}
}

/// Resolve `path` against `root`, expanding a leading `~` to `home`.
pub fn resolve_against(path: &Path, root: &Path, home: Option<&Path>) -> BmadResult<PathBuf> {
	if let Ok(rest) = path.strip_prefix("~") {
		let home = home.ok_or(BmadError::HomeDirUnavailable)?;
		return Ok(home.join(rest));
	}

	if path.is_absolute() {
		Ok(path.to_path_buf())
	} else {
		Ok(root.join(path))
	}
}
