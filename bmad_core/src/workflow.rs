//! Render a workflow and its instructions as a slash command document.

use std::sync::LazyLock;

use regex::Regex;

use crate::GeneratedDocument;
use crate::WorkflowDefinition;
use crate::WorkflowSource;
use crate::frontmatter;
use crate::rewrite_markup;

const PREREQUISITES: &str =
	"You must have installed the BMAD plugin and run workflow-init for your project.";

static PLACEHOLDER: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\{.*?\}").expect("placeholder pattern is valid"));

/// Generate the slash command document for a workflow.
pub fn generate_workflow_document(source: &WorkflowSource) -> GeneratedDocument {
	let workflow = &source.definition;

	GeneratedDocument::new()
		.with_section(
			"frontmatter",
			frontmatter(&[("description", &workflow.description)]),
		)
		.with_section("header", format!("# {}\n", title_case(&workflow.name)))
		.with_section("what_this_does", what_this_does_section(workflow))
		.with_section(
			"instructions",
			format!("## Instructions\n\n{}", rewrite_markup(&source.instructions)),
		)
		.with_section("notes", notes_section(workflow))
}

/// Turn a kebab-case name into words with an upper-cased first letter.
///
/// `product-brief` becomes `Product Brief`. Only the first character of each
/// word changes, the rest is kept as written.
pub fn title_case(name: &str) -> String {
	name.split('-')
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

fn what_this_does_section(workflow: &WorkflowDefinition) -> String {
	format!(
		"## What This Does\n\n{}\n\n## Prerequisites\n\n{PREREQUISITES}\n",
		workflow.description
	)
}

fn notes_section(workflow: &WorkflowDefinition) -> String {
	let mut notes = String::from("\n## Notes\n\n");

	let flags = [
		(workflow.template, "This workflow uses a template file"),
		(
			workflow.validation,
			"This workflow includes validation/checklist",
		),
		(
			workflow.web_bundle,
			"This workflow can be used as a standalone web bundle",
		),
	];
	for (_, note) in flags.iter().filter(|(enabled, _)| *enabled) {
		notes.push_str(&format!("- {note}\n"));
	}

	notes.push_str("\n## Output Files\n\n");
	if let Some(file) = &workflow.default_output_file {
		notes.push_str(&format!(
			"- {}\n",
			PLACEHOLDER.replace_all(file, "<dynamic>")
		));
	}

	notes
}
