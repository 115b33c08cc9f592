mod common;

use std::path::Path;

use bmad_core::AnyEmptyResult;
use predicates::str::contains;

fn plugin_source(root: &Path) -> std::io::Result<()> {
	common::write_file(root, "plugin/commands/phase-1/prd.md", "# PRD\n")?;
	common::write_file(root, "plugin/commands/workflow-status.md", "# Status\n")?;
	common::write_file(root, "plugin/skills/bmad-pm/SKILL.md", "# PM skill\n")?;
	common::write_file(root, "plugin/subagents/bmad-pm.md", "# PM\n")?;
	Ok(())
}

fn install_cmd(root: &Path) -> assert_cmd::Command {
	let mut cmd = common::bmad_cmd();
	cmd.arg("--path")
		.arg(root.join("project"))
		.arg("install")
		.arg("--source")
		.arg(root.join("plugin"))
		.arg("--claude-dir")
		.arg(root.join("claude"));
	cmd
}

#[test]
fn install_with_defaults_writes_project_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	plugin_source(tmp.path())?;

	install_cmd(tmp.path())
		.arg("--yes")
		.arg("--user-name")
		.arg("Ada")
		.assert()
		.success()
		.stdout(contains("Installation Complete!"))
		.stdout(contains("Installed 2 commands"))
		.stdout(contains("/bmad/phase-1/prd"))
		.stdout(contains("Installed 1 skills"))
		.stdout(contains("Skipping subagents installation"));

	let claude = tmp.path().join("claude");
	assert!(claude.join("commands/bmad/phase-1/prd.md").is_file());
	assert!(claude.join("skills/bmad/bmad-pm/SKILL.md").is_file());
	assert!(!claude.join("subagents/bmad").exists());

	let project = tmp.path().join("project");
	let config = std::fs::read_to_string(project.join(".bmad/config.yaml"))?;
	assert!(config.starts_with("# BMAD Method Configuration\n"));
	for key in [
		"output_folder: bmad-output",
		"user_name: Ada",
		"bmad_version:",
		"installed_date:",
		"project_root:",
	] {
		assert!(config.contains(key), "missing `{key}` in:\n{config}");
	}
	assert!(project.join("bmad-output").is_dir());

	Ok(())
}

#[test]
fn install_defaults_user_name_to_account_without_env() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	plugin_source(tmp.path())?;

	install_cmd(tmp.path())
		.env_remove("USER")
		.env_remove("USERNAME")
		.arg("--yes")
		.assert()
		.success()
		.stdout(contains("Installation Complete!"));

	let config = std::fs::read_to_string(tmp.path().join("project/.bmad/config.yaml"))?;
	let user_name = config
		.lines()
		.find_map(|line| line.strip_prefix("user_name:"))
		.map(str::trim)
		.unwrap_or_default();
	assert!(
		!user_name.is_empty() && user_name != "''",
		"empty user name in:\n{config}"
	);

	Ok(())
}

#[test]
fn install_reads_defaults_from_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	plugin_source(tmp.path())?;
	common::write_file(
		tmp.path(),
		"project/bmad.toml",
		"[install]\noutput_folder = \"docs/bmad\"\nuser_name = \"Grace\"\n",
	)?;

	install_cmd(tmp.path())
		.arg("--yes")
		.arg("--subagents")
		.assert()
		.success()
		.stdout(contains("Installed 1 subagents"));

	let project = tmp.path().join("project");
	let config = std::fs::read_to_string(project.join(".bmad/config.yaml"))?;
	assert!(config.contains("output_folder: docs/bmad"));
	assert!(config.contains("user_name: Grace"));
	assert!(project.join("docs/bmad").is_dir());
	assert!(tmp.path().join("claude/subagents/bmad/bmad-pm.md").is_file());

	Ok(())
}

#[test]
fn reinstall_backs_up_previous_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	plugin_source(tmp.path())?;
	common::write_file(tmp.path(), "project/.bmad/config.yaml", "user_name: Old\n")?;

	install_cmd(tmp.path())
		.arg("--yes")
		.arg("--user-name")
		.arg("Ada")
		.assert()
		.success()
		.stdout(contains("Backup created at"));

	let backups = std::fs::read_dir(tmp.path().join("project/.bmad"))?
		.filter_map(Result::ok)
		.map(|entry| entry.path())
		.filter(|path| {
			path.file_name()
				.is_some_and(|name| name.to_string_lossy().starts_with("backup-"))
		})
		.collect::<Vec<_>>();
	assert_eq!(backups.len(), 1);
	assert_eq!(
		std::fs::read_to_string(backups[0].join("config.yaml"))?,
		"user_name: Old\n"
	);

	Ok(())
}

#[test]
fn install_without_sources_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	install_cmd(tmp.path())
		.arg("--yes")
		.arg("--user-name")
		.arg("Ada")
		.assert()
		.failure()
		.code(1)
		.stderr(contains("bmad::not_found"));

	assert!(!tmp.path().join("project/.bmad/config.yaml").exists());

	Ok(())
}

#[test]
fn interactive_install_needs_a_terminal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	plugin_source(tmp.path())?;
	std::fs::create_dir_all(tmp.path().join("claude"))?;

	install_cmd(tmp.path())
		.assert()
		.failure()
		.code(1)
		.stderr(contains("bmad::prompt"));

	assert!(!tmp.path().join("project/.bmad/config.yaml").exists());

	Ok(())
}
