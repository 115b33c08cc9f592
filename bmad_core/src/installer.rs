//! Install converted commands, skills and subagents into the assistant
//! directory and write the project configuration.
//!
//! Every location comes from [`InstallPaths`], which the caller builds from
//! configuration. Questions go through a [`Prompter`] so the flow can run
//! interactively, unattended, or from scripted answers in tests.

use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::BmadError;
use crate::BmadResult;
use crate::config::DEFAULT_CLAUDE_DIR_NAME;
use crate::config::DEFAULT_CONFIG_DIR;
use crate::config::DEFAULT_OUTPUT_FOLDER;
use crate::config::DEFAULT_SOURCE_DIR;
use crate::config::InstallSettings;
use crate::config::resolve_against;

/// Plugin version recorded in the project configuration.
pub const BMAD_VERSION: &str = "2.0.0";
/// File name of the project configuration inside the config directory.
pub const PROJECT_CONFIG_FILE: &str = "config.yaml";
/// Marker file identifying a skill directory.
pub const SKILL_MARKER_FILE: &str = "SKILL.md";
/// Namespace directory created under `commands/`, `skills/` and
/// `subagents/`.
pub const INSTALL_NAMESPACE: &str = "bmad";

/// Answers interactive questions for the installer.
pub trait Prompter {
	/// Ask a yes/no question.
	fn confirm(&mut self, message: &str, default: bool) -> BmadResult<bool>;
	/// Ask for a line of text.
	fn input(&mut self, message: &str, default: &str) -> BmadResult<String>;
}

/// Answers every question with its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDefaults;

impl Prompter for AcceptDefaults {
	fn confirm(&mut self, message: &str, default: bool) -> BmadResult<bool> {
		tracing::debug!(question = message, default, "accepting default answer");
		Ok(default)
	}

	fn input(&mut self, message: &str, default: &str) -> BmadResult<String> {
		tracing::debug!(question = message, default, "accepting default answer");
		Ok(default.to_string())
	}
}

/// Every filesystem location the installer reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
	pub claude_dir: PathBuf,
	pub commands_dir: PathBuf,
	pub skills_dir: PathBuf,
	pub subagents_dir: PathBuf,
	/// Directory holding the plugin's `commands/`, `skills/` and `subagents/`.
	pub source_dir: PathBuf,
	pub project_root: PathBuf,
	/// Project configuration directory, `.bmad` by default.
	pub config_dir: PathBuf,
}

impl InstallPaths {
	/// Derive the install destinations from the assistant directory.
	pub fn new(
		claude_dir: PathBuf,
		source_dir: PathBuf,
		project_root: PathBuf,
		config_dir: PathBuf,
	) -> Self {
		Self {
			commands_dir: claude_dir.join("commands").join(INSTALL_NAMESPACE),
			skills_dir: claude_dir.join("skills").join(INSTALL_NAMESPACE),
			subagents_dir: claude_dir.join("subagents").join(INSTALL_NAMESPACE),
			claude_dir,
			source_dir,
			project_root,
			config_dir,
		}
	}

	/// Resolve paths from settings. Unset values fall back to the defaults;
	/// the assistant directory then needs a home directory.
	pub fn resolve(
		project_root: &Path,
		home: Option<&Path>,
		settings: &InstallSettings,
	) -> BmadResult<Self> {
		let claude_dir = match &settings.claude_dir {
			Some(dir) => resolve_against(dir, project_root, home)?,
			None => {
				home.ok_or(BmadError::HomeDirUnavailable)?
					.join(DEFAULT_CLAUDE_DIR_NAME)
			}
		};
		let source_dir = resolve_against(
			settings
				.source_dir
				.as_deref()
				.unwrap_or(Path::new(DEFAULT_SOURCE_DIR)),
			project_root,
			home,
		)?;
		let config_dir = resolve_against(
			settings
				.config_dir
				.as_deref()
				.unwrap_or(Path::new(DEFAULT_CONFIG_DIR)),
			project_root,
			home,
		)?;

		Ok(Self::new(
			claude_dir,
			source_dir,
			project_root.to_path_buf(),
			config_dir,
		))
	}

	pub fn config_file(&self) -> PathBuf {
		self.config_dir.join(PROJECT_CONFIG_FILE)
	}
}

/// Answers to the configuration questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOptions {
	pub output_folder: String,
	pub user_name: String,
	pub install_commands: bool,
	pub install_skills: bool,
	pub install_subagents: bool,
}

impl InstallOptions {
	/// Defaults offered by the configuration questions.
	pub fn defaults(settings: &InstallSettings, login_name: &str) -> Self {
		Self {
			output_folder: settings
				.output_folder
				.clone()
				.unwrap_or_else(|| DEFAULT_OUTPUT_FOLDER.to_string()),
			user_name: settings
				.user_name
				.clone()
				.unwrap_or_else(|| login_name.to_string()),
			install_commands: true,
			install_skills: true,
			install_subagents: false,
		}
	}
}

/// The persisted project configuration, `.bmad/config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
	pub output_folder: String,
	pub user_name: String,
	pub bmad_version: String,
	pub installed_date: String,
	pub project_root: String,
}

/// What the prerequisite check found and did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prerequisites {
	pub created_claude_dir: bool,
	pub existing_install: bool,
	/// Backup directory created for the previous installation.
	pub backup_dir: Option<PathBuf>,
}

/// Result of installing one component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ComponentStatus {
	/// Disabled by the user.
	#[default]
	Skipped,
	/// The plugin has no sources for this component.
	MissingSource,
	/// Installed names, in sorted order.
	Installed(Vec<String>),
}

impl ComponentStatus {
	pub fn count(&self) -> usize {
		match self {
			Self::Installed(names) => names.len(),
			Self::Skipped | Self::MissingSource => 0,
		}
	}

	pub fn names(&self) -> &[String] {
		match self {
			Self::Installed(names) => names,
			Self::Skipped | Self::MissingSource => &[],
		}
	}
}

/// Everything an installation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallStats {
	pub commands: ComponentStatus,
	pub skills: ComponentStatus,
	pub subagents: ComponentStatus,
	pub config_file: PathBuf,
	pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
	Installed(InstallStats),
	/// The user declined the final confirmation.
	Cancelled,
}

/// Drives an installation one step at a time.
pub struct Installer<'p, P: Prompter> {
	paths: InstallPaths,
	defaults: InstallOptions,
	force: bool,
	now: DateTime<Utc>,
	prompter: &'p mut P,
}

impl<'p, P: Prompter> Installer<'p, P> {
	pub fn new(paths: InstallPaths, defaults: InstallOptions, prompter: &'p mut P) -> Self {
		Self {
			paths,
			defaults,
			force: false,
			now: Utc::now(),
			prompter,
		}
	}

	/// Overwrite an existing installation without asking.
	#[must_use]
	pub fn force(mut self, force: bool) -> Self {
		self.force = force;
		self
	}

	/// Fix the clock used for `installed_date` and backup names.
	#[must_use]
	pub fn at(mut self, now: DateTime<Utc>) -> Self {
		self.now = now;
		self
	}

	pub fn paths(&self) -> &InstallPaths {
		&self.paths
	}

	/// Run every step with no extra output between them.
	pub fn run(&mut self) -> BmadResult<InstallOutcome> {
		self.check_prerequisites()?;
		let options = self.gather_options()?;
		if !self.confirm()? {
			return Ok(InstallOutcome::Cancelled);
		}

		self.install(&options).map(InstallOutcome::Installed)
	}

	/// Make sure the assistant directory and the plugin sources exist, and
	/// back up the project configuration of an earlier installation.
	pub fn check_prerequisites(&mut self) -> BmadResult<Prerequisites> {
		let mut report = Prerequisites::default();

		if !self.paths.claude_dir.is_dir() {
			let message = format!(
				"Assistant directory not found at {}. Would you like to create it?",
				self.paths.claude_dir.display()
			);
			if !self.prompter.confirm(&message, true)? {
				return Err(BmadError::InstallCancelled(
					"the assistant directory is required for installation".to_string(),
				));
			}

			std::fs::create_dir_all(&self.paths.claude_dir)?;
			report.created_claude_dir = true;
			tracing::info!(path = %self.paths.claude_dir.display(), "created assistant directory");
		}

		if !self.paths.source_dir.is_dir() {
			return Err(BmadError::not_found(&self.paths.source_dir));
		}

		report.existing_install = self.paths.commands_dir.exists()
			|| self.paths.skills_dir.exists()
			|| self.paths.config_file().exists();

		if report.existing_install {
			let overwrite = self.force
				|| self.prompter.confirm(
					"This will overwrite existing BMAD files. Continue?",
					false,
				)?;
			if !overwrite {
				return Err(BmadError::InstallCancelled(
					"existing files were preserved".to_string(),
				));
			}

			report.backup_dir = Some(self.backup_existing()?);
		}

		Ok(report)
	}

	fn backup_existing(&self) -> BmadResult<PathBuf> {
		let backup_dir = self
			.paths
			.config_dir
			.join(format!("backup-{}", backup_timestamp(self.now)));
		std::fs::create_dir_all(&backup_dir)?;

		let config_file = self.paths.config_file();
		if config_file.is_file() {
			std::fs::copy(&config_file, backup_dir.join(PROJECT_CONFIG_FILE))?;
		}

		tracing::info!(path = %backup_dir.display(), "created backup");
		Ok(backup_dir)
	}

	/// Ask the configuration questions.
	pub fn gather_options(&mut self) -> BmadResult<InstallOptions> {
		let defaults = self.defaults.clone();
		let output_folder = self.required_input(
			"Output folder for artifacts (relative to project root)",
			&defaults.output_folder,
			"output folder",
		)?;
		let user_name = self.required_input(
			"Your name (for authorship in documents)",
			&defaults.user_name,
			"user name",
		)?;
		let install_commands = self
			.prompter
			.confirm("Install all workflow commands?", defaults.install_commands)?;
		let install_skills = self
			.prompter
			.confirm("Install all skills?", defaults.install_skills)?;
		let install_subagents = self.prompter.confirm(
			"Install subagents (experimental - may not be supported yet)?",
			defaults.install_subagents,
		)?;

		Ok(InstallOptions {
			output_folder,
			user_name,
			install_commands,
			install_skills,
			install_subagents,
		})
	}

	fn required_input(&mut self, message: &str, default: &str, label: &str) -> BmadResult<String> {
		let answer = self.prompter.input(message, default)?;
		let answer = answer.trim();
		let value = if answer.is_empty() {
			default.trim()
		} else {
			answer
		};

		if value.is_empty() {
			return Err(BmadError::Prompt(format!("{label} is required")));
		}

		Ok(value.to_string())
	}

	pub fn confirm(&mut self) -> BmadResult<bool> {
		self.prompter.confirm("Proceed with installation?", true)
	}

	/// Copy the selected components and write the project configuration.
	pub fn install(&self, options: &InstallOptions) -> BmadResult<InstallStats> {
		let commands = if options.install_commands {
			self.install_markdown_component("commands", &self.paths.commands_dir)?
		} else {
			ComponentStatus::Skipped
		};
		let skills = if options.install_skills {
			self.install_skills()?
		} else {
			ComponentStatus::Skipped
		};
		let subagents = if options.install_subagents {
			self.install_markdown_component("subagents", &self.paths.subagents_dir)?
		} else {
			ComponentStatus::Skipped
		};

		let config_file = self.write_project_config(options)?;
		let output_dir = self.paths.project_root.join(&options.output_folder);
		std::fs::create_dir_all(&output_dir)?;

		Ok(InstallStats {
			commands,
			skills,
			subagents,
			config_file,
			output_dir,
		})
	}

	/// Copy the markdown files of one component and list everything
	/// installed at the destination.
	fn install_markdown_component(
		&self,
		component: &str,
		target: &Path,
	) -> BmadResult<ComponentStatus> {
		let source = self.paths.source_dir.join(component);
		if !source.is_dir() {
			tracing::warn!(component, path = %source.display(), "no sources found to install");
			return Ok(ComponentStatus::MissingSource);
		}

		std::fs::create_dir_all(target)?;
		copy_tree(&source, target, &is_markdown)?;

		let names = markdown_files(target)?
			.iter()
			.map(|file| markdown_name(file, target))
			.collect::<Vec<_>>();
		tracing::info!(component, count = names.len(), "installed component");

		Ok(ComponentStatus::Installed(names))
	}

	fn install_skills(&self) -> BmadResult<ComponentStatus> {
		let source = self.paths.source_dir.join("skills");
		if !source.is_dir() {
			tracing::warn!(path = %source.display(), "no skills found to install");
			return Ok(ComponentStatus::MissingSource);
		}

		std::fs::create_dir_all(&self.paths.skills_dir)?;
		copy_tree(&source, &self.paths.skills_dir, &|_| true)?;

		let names = skill_directories(&self.paths.skills_dir)?
			.iter()
			.filter_map(|dir| dir.file_name())
			.map(|name| name.to_string_lossy().into_owned())
			.collect::<Vec<_>>();
		tracing::info!(count = names.len(), "installed skills");

		Ok(ComponentStatus::Installed(names))
	}

	fn write_project_config(&self, options: &InstallOptions) -> BmadResult<PathBuf> {
		std::fs::create_dir_all(&self.paths.config_dir)?;

		let installed_date = self.now.to_rfc3339_opts(SecondsFormat::Millis, true);
		let config = InstallConfig {
			output_folder: options.output_folder.clone(),
			user_name: options.user_name.clone(),
			bmad_version: BMAD_VERSION.to_string(),
			installed_date: installed_date.clone(),
			project_root: self.paths.project_root.display().to_string(),
		};
		let yaml = serde_yaml_ng::to_string(&config).map_err(|e| {
			BmadError::Parse {
				path: self.paths.config_file().display().to_string(),
				reason: e.to_string(),
			}
		})?;
		let content = format!(
			"# BMAD Method Configuration\n# This file is used by BMAD workflows and agents\n# \
			 Auto-generated on {installed_date}\n\n{yaml}"
		);

		let config_file = self.paths.config_file();
		crate::write_document(&config_file, &content)?;
		Ok(config_file)
	}
}

/// Backup directory suffix: an RFC 3339 timestamp with `:` and `.` replaced
/// so it is a valid file name everywhere.
pub fn backup_timestamp(now: DateTime<Utc>) -> String {
	now.to_rfc3339_opts(SecondsFormat::Millis, true)
		.replace([':', '.'], "-")
}

fn is_markdown(path: &Path) -> bool {
	path.extension().is_some_and(|ext| ext == "md")
}

/// Recursively copy `source` into `target`, overwriting existing files.
/// Files rejected by `filter` are skipped; directories are always entered.
pub fn copy_tree(source: &Path, target: &Path, filter: &dyn Fn(&Path) -> bool) -> BmadResult<()> {
	std::fs::create_dir_all(target)?;

	for path in sorted_entries(source)? {
		let Some(name) = path.file_name() else {
			continue;
		};
		let destination = target.join(name);

		if path.is_dir() {
			copy_tree(&path, &destination, filter)?;
		} else if filter(&path) {
			std::fs::copy(&path, &destination)?;
		}
	}

	Ok(())
}

/// All markdown files below `dir`, sorted.
pub fn markdown_files(dir: &Path) -> BmadResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	collect_markdown(dir, &mut files)?;
	files.sort();
	Ok(files)
}

fn collect_markdown(dir: &Path, files: &mut Vec<PathBuf>) -> BmadResult<()> {
	for path in sorted_entries(dir)? {
		if path.is_dir() {
			collect_markdown(&path, files)?;
		} else if is_markdown(&path) {
			files.push(path);
		}
	}

	Ok(())
}

/// Direct subdirectories of `dir` that contain a `SKILL.md`.
pub fn skill_directories(dir: &Path) -> BmadResult<Vec<PathBuf>> {
	Ok(sorted_entries(dir)?
		.into_iter()
		.filter(|path| path.is_dir() && path.join(SKILL_MARKER_FILE).is_file())
		.collect())
}

fn sorted_entries(dir: &Path) -> BmadResult<Vec<PathBuf>> {
	let mut entries = std::fs::read_dir(dir)?
		.map(|entry| entry.map(|entry| entry.path()))
		.collect::<Result<Vec<_>, _>>()?;
	entries.sort();
	Ok(entries)
}

/// `commands/phase-1/prd.md` relative to `root` becomes `phase-1/prd`.
fn markdown_name(file: &Path, root: &Path) -> String {
	let relative = file.strip_prefix(root).unwrap_or(file);
	let name = relative.with_extension("");
	name.to_string_lossy().replace('\\', "/")
}
