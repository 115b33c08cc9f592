mod common;

use bmad_core::AnyEmptyResult;
use predicates::str::contains;

const AGENT: &str = "agent:
  metadata:
    name: Test Agent
    title: Test Agent
  persona:
    role: Quality gatekeeper
  menu:
    - trigger: t
      description: Do the thing
      action: Run every check
";

#[test]
fn convert_agent_writes_subagent_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = common::write_file(tmp.path(), "test.agent.yaml", AGENT)?;
	let target = tmp.path().join("subagents/bmad-test.md");

	common::bmad_cmd()
		.arg("convert-agent")
		.arg(&source)
		.arg(&target)
		.assert()
		.success()
		.stdout(contains("Loaded agent: Test Agent"))
		.stdout(contains("Conversion complete!"))
		.stdout(contains("Add detailed \"When invoked for...\" sections"));

	let content = std::fs::read_to_string(&target)?;
	assert!(content.starts_with("---\ndescription: Test Agent agent."));
	assert!(content.contains("subagent_type: bmad-test-agent"));
	assert!(content.contains("# Test Agent"));
	assert!(content.contains("**Role:** Quality gatekeeper"));
	assert!(content.contains("### When do the thing\n\n**Action:** Run every check\n"));

	Ok(())
}

#[test]
fn convert_agent_resolves_relative_paths_against_root() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "agents/test.agent.yaml", AGENT)?;

	common::bmad_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("convert-agent")
		.arg("agents/test.agent.yaml")
		.arg("out/bmad-test.md")
		.assert()
		.success();

	assert!(tmp.path().join("out/bmad-test.md").is_file());

	Ok(())
}

#[test]
fn convert_agent_missing_source_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let target = tmp.path().join("out.md");

	common::bmad_cmd()
		.arg("convert-agent")
		.arg(tmp.path().join("missing.agent.yaml"))
		.arg(&target)
		.assert()
		.failure()
		.code(1)
		.stderr(contains("bmad::not_found"));

	assert!(!target.exists());

	Ok(())
}

#[test]
fn convert_agent_without_title_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = common::write_file(
		tmp.path(),
		"bad.agent.yaml",
		"agent:\n  metadata:\n    name: Nameless\n",
	)?;
	let target = tmp.path().join("out.md");

	common::bmad_cmd()
		.arg("convert-agent")
		.arg(&source)
		.arg(&target)
		.assert()
		.failure()
		.code(1)
		.stderr(contains("bmad::schema"))
		.stderr(contains("agent.metadata.title"));

	assert!(!target.exists());

	Ok(())
}

#[test]
fn missing_subcommand_prints_hint() {
	common::bmad_cmd()
		.assert()
		.failure()
		.code(1)
		.stderr(contains("No subcommand specified"));
}
