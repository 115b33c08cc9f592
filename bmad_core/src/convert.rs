use std::path::Path;
use std::path::PathBuf;

use crate::BmadResult;
use crate::generate_agent_document;
use crate::generate_workflow_document;
use crate::load_agent;
use crate::load_workflow;
use crate::write_document;

/// What kind of definition a conversion produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
	/// An agent converted to a subagent document.
	Agent,
	/// A workflow converted to a slash command document.
	Workflow,
}

/// Outcome of a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
	pub kind: ConversionKind,
	/// Agent title or workflow name.
	pub name: String,
	/// Workflow description. Agents have none.
	pub description: Option<String>,
	pub target: PathBuf,
	/// Size of the written document in bytes.
	pub bytes: usize,
}

impl ConversionReport {
	/// Follow-up work the generated document still needs from a human.
	pub fn follow_ups(&self) -> &'static [&'static str] {
		match self.kind {
			ConversionKind::Agent => {
				&[
					"Add detailed \"When invoked for...\" sections",
					"Create usage examples",
					"Add quality standards",
					"Test via Task tool invocation",
				]
			}
			ConversionKind::Workflow => {
				&[
					"Review XML→markdown conversion",
					"Update variable references",
					"Test the slash command",
					"Add examples if needed",
				]
			}
		}
	}
}

/// Convert an agent YAML file into a subagent markdown document at `target`.
///
/// Nothing is written unless the source loads successfully.
pub fn convert_agent(source: &Path, target: &Path) -> BmadResult<ConversionReport> {
	let agent = load_agent(source)?;
	let text = generate_agent_document(&agent).render();
	write_document(target, &text)?;

	Ok(ConversionReport {
		kind: ConversionKind::Agent,
		name: agent.metadata.title,
		description: None,
		target: target.to_path_buf(),
		bytes: text.len(),
	})
}

/// Convert a workflow directory (`workflow.yaml` + `instructions.md`) into a
/// slash command markdown document at `target`.
pub fn convert_workflow(source_dir: &Path, target: &Path) -> BmadResult<ConversionReport> {
	let source = load_workflow(source_dir)?;
	let text = generate_workflow_document(&source).render();
	write_document(target, &text)?;

	Ok(ConversionReport {
		kind: ConversionKind::Workflow,
		name: source.definition.name,
		description: Some(source.definition.description),
		target: target.to_path_buf(),
		bytes: text.len(),
	})
}
