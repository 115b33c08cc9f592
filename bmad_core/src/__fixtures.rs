use std::collections::VecDeque;
use std::path::Path;
use std::path::PathBuf;

use chrono::DateTime;
use chrono::Utc;

use crate::BmadResult;
use crate::installer::Prompter;

pub const MINIMAL_AGENT: &str = r"agent:
  metadata:
    name: Test Agent
    title: Test Agent
  menu:
    - trigger: t
      description: Do the thing
";

pub const FULL_AGENT: &str = r#"agent:
  metadata:
    id: bmad/bmm/agents/pm.md
    name: John
    title: Product Manager
    icon: "📋"
  persona:
    role: Investigative Product Strategist
    identity: Product manager with 8+ years of experience.
    communication_style: Direct and analytical.
    principles:
      - Understand the why
      - Ship small
  menu:
    - trigger: prd
      workflow: "{project-root}/bmad/bmm/workflows/prd/workflow.yaml"
      description: Create Product Requirements Document
    - trigger: validate
      action: Validate the PRD against the checklist
      exec: "{project-root}/bmad/core/tasks/ignored.xml"
    - trigger: party-mode
      exec: "{project-root}/bmad/core/tasks/party.xml"
"#;

pub const PRODUCT_BRIEF_WORKFLOW: &str = r#"name: product-brief
description: Create a product brief
author: BMad
template: ./template.md
validation: false
web_bundle: true
default_output_file: "{output_folder}/brief-{project_name}.md"
"#;

pub const PRODUCT_BRIEF_INSTRUCTIONS: &str = r#"<critical>Always load config</critical>
<workflow>
<step n="1" goal="Gather context">
<action>Read {output_folder}/brief.md</action>
<ask>What is the project name?</ask>
</step>
<step n="2" goal="Write the brief">
<check if="brief exists">
<action if="user approves">Overwrite the brief</action>
</check>
<output>Brief saved</output>
<template-output>product_brief</template-output>
</step>
</workflow>
"#;

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(&path, content).unwrap_or_else(|e| panic!("write: {e}"));
	path
}

pub fn read_file(path: &Path) -> String {
	std::fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

/// Create a workflow source directory named `name` under `root`.
pub fn workflow_dir(root: &Path, name: &str, workflow: &str, instructions: &str) -> PathBuf {
	write_file(root, &format!("{name}/workflow.yaml"), workflow);
	write_file(root, &format!("{name}/instructions.md"), instructions);
	root.join(name)
}

/// A plugin source tree with two commands, one skill and one subagent.
pub fn plugin_source(root: &Path) -> PathBuf {
	let source = root.join("plugin");
	write_file(&source, "commands/phase-1/prd.md", "# PRD\n");
	write_file(&source, "commands/workflow-status.md", "# Status\n");
	write_file(&source, "commands/notes.txt", "not a command\n");
	write_file(&source, "skills/research/SKILL.md", "# Research\n");
	write_file(&source, "skills/research/reference.md", "sources\n");
	write_file(&source, "skills/loose.md", "not a skill directory\n");
	write_file(&source, "subagents/bmad-pm.md", "# PM\n");
	source
}

pub fn fixed_now() -> DateTime<Utc> {
	DateTime::parse_from_rfc3339("2024-01-02T03:04:05.678Z")
		.unwrap_or_else(|e| panic!("timestamp: {e}"))
		.with_timezone(&Utc)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
	Confirm(bool),
	Input(&'static str),
}

/// Replays a fixed list of answers and records every question asked.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
	answers: VecDeque<Answer>,
	pub questions: Vec<String>,
}

impl ScriptedPrompter {
	pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
		Self {
			answers: answers.into_iter().collect(),
			questions: Vec::new(),
		}
	}

	pub fn remaining(&self) -> usize {
		self.answers.len()
	}
}

impl Prompter for ScriptedPrompter {
	fn confirm(&mut self, message: &str, _default: bool) -> BmadResult<bool> {
		self.questions.push(message.to_string());
		match self.answers.pop_front() {
			Some(Answer::Confirm(answer)) => Ok(answer),
			other => panic!("expected a confirm answer for `{message}`, got {other:?}"),
		}
	}

	fn input(&mut self, message: &str, _default: &str) -> BmadResult<String> {
		self.questions.push(message.to_string());
		match self.answers.pop_front() {
			Some(Answer::Input(answer)) => Ok(answer.to_string()),
			other => panic!("expected an input answer for `{message}`, got {other:?}"),
		}
	}
}
