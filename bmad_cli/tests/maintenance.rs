mod common;

use bmad_core::AnyEmptyResult;
use predicates::str::contains;
use rstest::rstest;
use similar_asserts::assert_eq;

const LEGACY_AGENT: &str = "---
description: Product Manager agent. Auto-invoked when working with product planning or PRD workflows.
subagent_type: bmad-pm
---
";

const FIXED_AGENT: &str = "---
description: Product Manager agent. Use this agent for product planning or PRD workflows.
subagent_type: bmad-pm
---
";

#[test]
fn fix_descriptions_dry_run_shows_diff() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let agent = common::write_file(tmp.path(), "agents/bmad-pm.md", LEGACY_AGENT)?;

	common::bmad_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("fix-descriptions")
		.arg("--dry-run")
		.assert()
		.success()
		.stdout(contains("Would update agents/bmad-pm.md"))
		.stdout(contains("Dry run: 1 description change(s) in 1 of 1 file(s)"))
		.stderr(contains(
			"+description: Product Manager agent. Use this agent for product planning",
		));

	assert_eq!(std::fs::read_to_string(&agent)?, LEGACY_AGENT);

	Ok(())
}

#[test]
fn fix_descriptions_rewrites_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let agent = common::write_file(tmp.path(), "agents/bmad-pm.md", LEGACY_AGENT)?;
	common::write_file(tmp.path(), "agents/bmad-dev.md", FIXED_AGENT)?;

	common::bmad_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("fix-descriptions")
		.assert()
		.success()
		.stdout(contains("Updated agents/bmad-pm.md"))
		.stdout(contains("Fixed 1 description change(s) in 1 of 2 file(s)."))
		.stdout(contains("Backup:"));

	assert_eq!(std::fs::read_to_string(&agent)?, FIXED_AGENT);

	Ok(())
}

#[test]
fn fix_descriptions_reports_nothing_to_do() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "agents/bmad-dev.md", FIXED_AGENT)?;

	common::bmad_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("fix-descriptions")
		.assert()
		.success()
		.stdout(contains("Scanned 1 file(s), no descriptions to fix."));

	Ok(())
}

#[test]
fn fix_command_paths_rewrites_known_commands() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "commands/phase-2/prd.md", "# PRD\n")?;
	let status = common::write_file(
		tmp.path(),
		"commands/workflow-status.md",
		"Next: /bmad/prd\nLater: /bmad/retired\n",
	)?;

	common::bmad_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("fix-command-paths")
		.assert()
		.success()
		.stdout(contains("/bmad/prd → /bmad:phase-2:prd"));

	assert_eq!(
		std::fs::read_to_string(&status)?,
		"Next: /bmad:phase-2:prd\nLater: /bmad/retired\n"
	);

	Ok(())
}

#[rstest]
#[case::descriptions("fix-descriptions")]
#[case::command_paths("fix-command-paths")]
fn fixers_fail_on_missing_directory(#[case] subcommand: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::bmad_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg(subcommand)
		.assert()
		.failure()
		.code(1)
		.stderr(contains("bmad::not_found"));

	Ok(())
}
