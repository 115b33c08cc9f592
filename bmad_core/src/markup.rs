//! Rewrite the procedural markup used in workflow instructions into markdown.
//!
//! The rewriter is a fixed, ordered list of regex passes over the whole text.
//! Later rules rely on earlier ones having already removed the surrounding
//! tags, so the order of [`MARKUP_RULES`] is part of the output format.
//! Nothing is parsed structurally: nested or unclosed tags are passed through
//! or mangled as the expressions dictate.

use std::sync::LazyLock;

use regex::Captures;
use regex::Regex;

/// A single rewrite pass.
#[derive(Clone, Copy)]
pub struct MarkupRule {
	pub name: &'static str,
	pub apply: fn(&str) -> String,
}

impl std::fmt::Debug for MarkupRule {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MarkupRule")
			.field("name", &self.name)
			.finish_non_exhaustive()
	}
}

/// Every rewrite pass, in the order it runs.
pub const MARKUP_RULES: &[MarkupRule] = &[
	MarkupRule {
		name: "critical",
		apply: strip_critical,
	},
	MarkupRule {
		name: "workflow",
		apply: strip_workflow_wrapper,
	},
	MarkupRule {
		name: "step",
		apply: rewrite_steps,
	},
	MarkupRule {
		name: "action",
		apply: rewrite_actions,
	},
	MarkupRule {
		name: "ask",
		apply: rewrite_asks,
	},
	MarkupRule {
		name: "check",
		apply: rewrite_checks,
	},
	MarkupRule {
		name: "output",
		apply: rewrite_outputs,
	},
	MarkupRule {
		name: "template-output",
		apply: rewrite_template_outputs,
	},
	MarkupRule {
		name: "variables",
		apply: prepend_variable_notes,
	},
];

/// Placeholder tokens that get a configuration note, in insertion order.
pub const VARIABLE_NOTES: &[(&str, &str)] = &[
	(
		"{output_folder}",
		"Read `output_folder` from `.bmad/config.yaml`",
	),
	("{user_name}", "Read `user_name` from `.bmad/config.yaml`"),
	(
		"{project_name}",
		"Read `project_name` from `.bmad/config.yaml`",
	),
	("{project-root}", "Current working directory"),
	("{bmad_folder}", "`.bmad`"),
];

static CRITICAL: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<critical>.*?</critical>"));
static WORKFLOW_TAG: LazyLock<Regex> = LazyLock::new(|| compile(r"</?workflow>"));
static STEP_OPEN: LazyLock<Regex> =
	LazyLock::new(|| compile(r#"<step n="(\d+)" goal="(.*?)">"#));
static STEP_CLOSE: LazyLock<Regex> = LazyLock::new(|| compile(r"</step>"));
static ACTION: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<action>(.*?)</action>"));
static ACTION_IF: LazyLock<Regex> =
	LazyLock::new(|| compile(r#"(?s)<action if="(.*?)">(.*?)</action>"#));
static ASK: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<ask>(.*?)</ask>"));
static ASK_IF: LazyLock<Regex> = LazyLock::new(|| compile(r#"(?s)<ask if="(.*?)">(.*?)</ask>"#));
static CHECK_OPEN: LazyLock<Regex> = LazyLock::new(|| compile(r#"<check if="(.*?)">"#));
static CHECK_CLOSE: LazyLock<Regex> = LazyLock::new(|| compile(r"</check>"));
static OUTPUT: LazyLock<Regex> = LazyLock::new(|| compile(r"(?s)<output>(.*?)</output>"));
static TEMPLATE_OUTPUT: LazyLock<Regex> =
	LazyLock::new(|| compile(r"<template-output>(.*?)</template-output>"));

fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).expect("markup patterns are valid regular expressions")
}

/// Run every rule in [`MARKUP_RULES`] over `raw`.
pub fn rewrite_markup(raw: &str) -> String {
	MARKUP_RULES.iter().fold(raw.to_string(), |text, rule| {
		let rewritten = (rule.apply)(&text);
		if rewritten != text {
			tracing::debug!(rule = rule.name, "applied markup rule");
		}
		rewritten
	})
}

/// Remove `<critical>` blocks, tags included.
pub fn strip_critical(text: &str) -> String {
	CRITICAL.replace_all(text, "").into_owned()
}

/// Remove the `<workflow>` wrapper tags and keep what they enclose.
pub fn strip_workflow_wrapper(text: &str) -> String {
	WORKFLOW_TAG.replace_all(text, "").into_owned()
}

pub fn rewrite_steps(text: &str) -> String {
	let text = STEP_OPEN.replace_all(text, |caps: &Captures<'_>| {
		format!("### Step {}: {}\n", &caps[1], &caps[2])
	});
	STEP_CLOSE.replace_all(&text, "\n").into_owned()
}

/// Unconditional `<action>` first, then `<action if="...">`. The bare pattern
/// never matches a tag with attributes, so the two passes are independent.
pub fn rewrite_actions(text: &str) -> String {
	let text = ACTION.replace_all(text, |caps: &Captures<'_>| {
		format!("**Action:**\n{}\n", caps[1].trim())
	});
	ACTION_IF
		.replace_all(&text, |caps: &Captures<'_>| {
			format!("**If {}:**\n{}\n", &caps[1], caps[2].trim())
		})
		.into_owned()
}

pub fn rewrite_asks(text: &str) -> String {
	let text = ASK.replace_all(text, |caps: &Captures<'_>| {
		format!(
			"\nUse AskUserQuestion tool:\n```\n{}\n```\n",
			caps[1].trim()
		)
	});
	ASK_IF
		.replace_all(&text, |caps: &Captures<'_>| {
			format!(
				"\n**If {}, use AskUserQuestion:**\n```\n{}\n```\n",
				&caps[1],
				caps[2].trim()
			)
		})
		.into_owned()
}

pub fn rewrite_checks(text: &str) -> String {
	let text = CHECK_OPEN.replace_all(text, |caps: &Captures<'_>| {
		format!("\n**If {}:**\n", &caps[1])
	});
	CHECK_CLOSE.replace_all(&text, "\n").into_owned()
}

pub fn rewrite_outputs(text: &str) -> String {
	OUTPUT
		.replace_all(text, |caps: &Captures<'_>| {
			format!("\n**Display:**\n```\n{}\n```\n", caps[1].trim())
		})
		.into_owned()
}

pub fn rewrite_template_outputs(text: &str) -> String {
	TEMPLATE_OUTPUT
		.replace_all(text, |caps: &Captures<'_>| format!("Store: `{}`", &caps[1]))
		.into_owned()
}

/// The note prepended for a variable whose instruction is `instruction`.
pub fn variable_note(instruction: &str) -> String {
	format!("\n**Configuration:** {instruction}\n")
}

/// Prepend one configuration note per known variable token found in `text`.
///
/// A note is skipped when the exact note string already occurs in the text as
/// rewritten so far, not when the variable was already handled. Two variables
/// sharing a note, or a body that already quotes a note verbatim, therefore
/// produce fewer notes than variables.
pub fn prepend_variable_notes(text: &str) -> String {
	let mut converted = text.to_string();

	for (token, instruction) in VARIABLE_NOTES {
		if !converted.contains(token) {
			continue;
		}

		let note = variable_note(instruction);
		if !converted.contains(&note) {
			converted = format!("{note}{converted}");
		}
	}

	converted
}
