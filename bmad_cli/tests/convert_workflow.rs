mod common;

use bmad_core::AnyEmptyResult;
use predicates::str::contains;

const WORKFLOW: &str = "name: product-brief
description: Create a product brief
template: ./template.md
default_output_file: \"{output_folder}/brief.md\"
";

const INSTRUCTIONS: &str = "<workflow>
<step n=\"1\" goal=\"Gather context\">
<ask>What is the project name?</ask>
<template-output>project_name</template-output>
</step>
</workflow>
";

#[test]
fn convert_workflow_writes_command_document() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "product-brief/workflow.yaml", WORKFLOW)?;
	common::write_file(tmp.path(), "product-brief/instructions.md", INSTRUCTIONS)?;
	let target = tmp.path().join("commands/phase-1/product-brief.md");

	common::bmad_cmd()
		.arg("convert-workflow")
		.arg(tmp.path().join("product-brief"))
		.arg(&target)
		.assert()
		.success()
		.stdout(contains("Loaded workflow: product-brief"))
		.stdout(contains("Description: Create a product brief"))
		.stdout(contains("Review XML→markdown conversion"));

	let content = std::fs::read_to_string(&target)?;
	assert!(content.starts_with("---\ndescription: Create a product brief\n---\n"));
	assert!(content.contains("# Product Brief\n"));
	assert!(content.contains("### Step 1: Gather context\n"));
	assert!(content.contains("Use AskUserQuestion tool:"));
	assert!(content.contains("Store: `project_name`"));
	assert!(content.contains("- This workflow uses a template file\n"));
	assert!(content.contains("- <dynamic>/brief.md\n"));
	assert!(!content.contains("<step"));

	Ok(())
}

#[test]
fn convert_workflow_without_instructions_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "product-brief/workflow.yaml", WORKFLOW)?;
	let target = tmp.path().join("commands/product-brief.md");

	common::bmad_cmd()
		.arg("convert-workflow")
		.arg(tmp.path().join("product-brief"))
		.arg(&target)
		.assert()
		.failure()
		.code(1)
		.stderr(contains("bmad::not_found"))
		.stderr(contains("instructions.md"));

	assert!(!target.exists());
	assert!(!tmp.path().join("commands").exists());

	Ok(())
}

#[test]
fn convert_workflow_without_description_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "wf/workflow.yaml", "name: nameless\n")?;
	common::write_file(tmp.path(), "wf/instructions.md", INSTRUCTIONS)?;

	common::bmad_cmd()
		.arg("convert-workflow")
		.arg(tmp.path().join("wf"))
		.arg(tmp.path().join("out.md"))
		.assert()
		.failure()
		.code(1)
		.stderr(contains("bmad::schema"));

	Ok(())
}
