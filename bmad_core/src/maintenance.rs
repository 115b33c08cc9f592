//! Bulk rewrites for markdown that was already generated and installed.

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::Utc;
use regex::Captures;
use regex::Regex;

use crate::BmadError;
use crate::BmadResult;
use crate::installer::backup_timestamp;
use crate::installer::copy_tree;
use crate::installer::markdown_files;

static AUTO_INVOKED: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"Auto-invoked (?:when working with|for) ([^.\n]+)\.")
		.expect("description pattern is valid")
});

static COMMAND_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?m)(^|[^\w./-])/bmad/([\w-]+)").expect("command pattern is valid")
});

/// Rewrites applied to a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFix {
	pub path: PathBuf,
	pub original: String,
	pub updated: String,
	/// Human readable `old → new` entries, one per distinct replacement.
	pub changes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
	/// Number of markdown files inspected.
	pub scanned: usize,
	pub fixed: Vec<FileFix>,
	/// Copy of the directory taken before any file was written. `None` for
	/// dry runs.
	pub backup_dir: Option<PathBuf>,
	pub dry_run: bool,
}

impl FixReport {
	pub fn total_changes(&self) -> usize {
		self.fixed.iter().map(|fix| fix.changes.len()).sum()
	}
}

/// Replace the legacy `Auto-invoked ...` sentence in agent descriptions with
/// `Use this agent for ...`.
pub fn fix_agent_descriptions(dir: &Path, dry_run: bool) -> BmadResult<FixReport> {
	apply_fixes(dir, "agent", dry_run, |content| {
		let mut changes = Vec::new();
		let updated = AUTO_INVOKED.replace_all(content, |caps: &Captures<'_>| {
			let replacement = format!("Use this agent for {}.", &caps[1]);
			changes.push(format!("{} → {replacement}", &caps[0]));
			replacement
		});
		(updated.into_owned(), changes)
	})
}

/// Rewrite `/bmad/<name>` references to the namespaced `/bmad:<group>:<name>`
/// form, where `<group>` is the directory of `<name>.md` inside `dir`.
///
/// Only names that exist as command files are rewritten.
pub fn fix_command_paths(dir: &Path, dry_run: bool) -> BmadResult<FixReport> {
	let routes = command_routes(dir)?;

	apply_fixes(dir, "command-path", dry_run, |content| {
		let mut changes = Vec::new();
		let updated = COMMAND_REFERENCE.replace_all(content, |caps: &Captures<'_>| {
			let name = &caps[2];
			match routes.get(name) {
				Some(route) => {
					let change = format!("/bmad/{name} → {route}");
					if !changes.contains(&change) {
						changes.push(change);
					}
					format!("{}{route}", &caps[1])
				}
				None => caps[0].to_string(),
			}
		});
		(updated.into_owned(), changes)
	})
}

/// Map every command name under `dir` to its namespaced slash command.
///
/// `phase-2/prd.md` maps `prd` to `/bmad:phase-2:prd`; a top level
/// `workflow-status.md` maps to `/bmad:workflow-status`. When two groups
/// define the same name the first in path order wins.
pub fn command_routes(dir: &Path) -> BmadResult<BTreeMap<String, String>> {
	ensure_dir(dir)?;
	let mut routes = BTreeMap::new();

	for file in markdown_files(dir)? {
		let Some(name) = file.file_stem().map(|stem| stem.to_string_lossy().into_owned()) else {
			continue;
		};
		let relative = file.strip_prefix(dir).unwrap_or(&file).with_extension("");
		let segments = relative
			.components()
			.map(|component| component.as_os_str().to_string_lossy().into_owned())
			.collect::<Vec<_>>();
		let route = format!("/bmad:{}", segments.join(":"));

		if let Some(existing) = routes.get(&name) {
			tracing::warn!(name = %name, kept = %existing, ignored = %route, "duplicate command name");
			continue;
		}

		routes.insert(name, route);
	}

	Ok(routes)
}

fn apply_fixes<F>(dir: &Path, kind: &str, dry_run: bool, mut fix: F) -> BmadResult<FixReport>
where
	F: FnMut(&str) -> (String, Vec<String>),
{
	ensure_dir(dir)?;
	let files = markdown_files(dir)?;
	let mut report = FixReport {
		scanned: files.len(),
		dry_run,
		..FixReport::default()
	};

	for path in files {
		let original = std::fs::read_to_string(&path)?;
		let (updated, changes) = fix(&original);
		if updated == original {
			continue;
		}

		report.fixed.push(FileFix {
			path,
			original,
			updated,
			changes,
		});
	}

	if dry_run || report.fixed.is_empty() {
		return Ok(report);
	}

	report.backup_dir = Some(backup_dir(dir, kind)?);
	for fix in &report.fixed {
		crate::write_document(&fix.path, &fix.updated)?;
		tracing::info!(path = %fix.path.display(), changes = fix.changes.len(), "fixed file");
	}

	Ok(report)
}

fn ensure_dir(dir: &Path) -> BmadResult<()> {
	if dir.is_dir() {
		Ok(())
	} else {
		Err(BmadError::not_found(dir))
	}
}

/// Copy `dir` into `.<kind>-backups-<timestamp>/<dir name>` next to it.
///
/// An existing backup is never reused; a numeric suffix is added instead.
fn backup_dir(dir: &Path, kind: &str) -> BmadResult<PathBuf> {
	let timestamp = backup_timestamp(Utc::now());
	let parent = dir.parent().unwrap_or(Path::new("."));
	let dir_name = dir.file_name().unwrap_or(dir.as_os_str());
	let stem = format!(".{kind}-backups-{timestamp}");
	let mut backup_root = parent.join(&stem);
	let mut attempt = 1;
	while backup_root.exists() {
		backup_root = parent.join(format!("{stem}-{attempt}"));
		attempt += 1;
	}

	copy_tree(dir, &backup_root.join(dir_name), &|_| true)?;
	tracing::info!(path = %backup_root.display(), "created backup");

	Ok(backup_root)
}
