//! Render an [`AgentDefinition`] as a subagent markdown document.

use crate::AgentDefinition;
use crate::GeneratedDocument;
use crate::MenuBody;
use crate::MenuItem;
use crate::frontmatter;

/// Prefix of every generated `subagent_type`.
pub const SUBAGENT_PREFIX: &str = "bmad-";

/// Title keywords mapped to the use cases mentioned in the frontmatter
/// description. Checked in order, the first match wins.
const USE_CASES: &[(&[&str], &str)] = &[
	(&["product"], "product planning or PRD workflows"),
	(
		&["architect"],
		"architecture design or technical specifications",
	),
	(&["dev"], "story implementation or code development"),
	(&["test"], "test strategy or test architecture"),
	(&["analyst"], "requirements analysis or research"),
	(&["scrum", "sm"], "sprint planning or project coordination"),
	(&["ux"], "UX design or user experience workflows"),
	(&["writer"], "documentation or technical writing"),
];

const DEFAULT_USE_CASE: &str = "specialized workflows";

const TOOLS_AVAILABLE: &str = "## Tools Available\n\nAll tools (Read, Write, Edit, Grep, Glob, \
                               WebFetch, WebSearch, AskUserQuestion, Task)\n\n";

const APPROACH: &str = "## Approach

### 1. Understand Context First
- Read existing docs, PRDs, architecture
- Understand project level and complexity
- Identify what's been done and what's missing

### 2. Ask Clarifying Questions
- Use AskUserQuestion to understand requirements
- Never assume - always verify
- Focus on the \"why\" behind requests

### 3. Research When Needed
- Use WebSearch for information gaps
- Use bmad-verified-research skill for accuracy
- Always cite sources

### 4. Execute Systematically
- Follow established patterns and templates
- Reference relevant skills for best practices
- Validate outputs before returning

";

const EXAMPLES: &str = "## Examples

### Example 1: [TODO: Add example title]

**Input:**
```
[TODO: Add example input]
```

**Process:**
1. [TODO: Add process steps]

**Output:**
```
[TODO: Add example output]
```

";

const CONFIGURATION: &str = "## Configuration

Reads configuration from `.bmad/config.yaml`:
```yaml
output_folder: \"bmad-output\"    # Where to save artifacts
user_name: \"Your Name\"          # Author name
```

";

/// Generate the complete subagent document for an agent.
pub fn generate_agent_document(agent: &AgentDefinition) -> GeneratedDocument {
	GeneratedDocument::new()
		.with_section("frontmatter", agent_frontmatter(agent))
		.with_section("header", format!("# {}\n", agent.metadata.title))
		.with_section("description", description_section(agent))
		.with_section("tools", TOOLS_AVAILABLE)
		.with_section("persona", persona_section(agent))
		.with_section("approach", APPROACH)
		.with_section("instructions", instructions_section(&agent.menu))
		.with_section("examples", EXAMPLES)
		.with_section("configuration", CONFIGURATION)
}

/// Lower-case `name` and replace each run of whitespace with a single hyphen.
pub fn slugify(name: &str) -> String {
	name.split_whitespace()
		.map(str::to_lowercase)
		.collect::<Vec<_>>()
		.join("-")
}

/// Guess what the agent is used for from its title.
pub fn infer_use_cases(title: &str) -> &'static str {
	let title = title.to_lowercase();
	USE_CASES
		.iter()
		.find(|(keywords, _)| keywords.iter().any(|keyword| title.contains(keyword)))
		.map_or(DEFAULT_USE_CASE, |(_, use_case)| use_case)
}

fn agent_frontmatter(agent: &AgentDefinition) -> String {
	let description = format!(
		"{} agent. Auto-invoked when working with {}.",
		agent.metadata.title,
		infer_use_cases(&agent.metadata.title)
	);
	let subagent_type = format!("{SUBAGENT_PREFIX}{}", slugify(&agent.metadata.name));

	frontmatter(&[
		("description", &description),
		("subagent_type", &subagent_type),
	])
}

fn description_section(agent: &AgentDefinition) -> String {
	let mut section = String::from("## Description\n\n");

	if let Some(role) = agent.persona.as_ref().and_then(|p| p.role.as_ref()) {
		section.push_str(&format!("{role}\n\n"));
	}

	section.push_str("Use this agent when you need to:\n");
	for item in &agent.menu {
		section.push_str(&format!("- {}\n", item.title()));
	}

	section.push('\n');
	section
}

fn persona_section(agent: &AgentDefinition) -> String {
	let Some(persona) = &agent.persona else {
		return String::new();
	};

	let mut section = String::from("## Persona\n\n");

	if let Some(role) = &persona.role {
		section.push_str(&format!("**Role:** {role}\n\n"));
	}

	if let Some(identity) = &persona.identity {
		section.push_str(&format!("**Background:** {identity}\n\n"));
	}

	if let Some(style) = &persona.communication_style {
		section.push_str(&format!("**Communication Style:** {style}\n\n"));
	}

	if let Some(principles) = &persona.principles {
		section.push_str(&format!(
			"**Core Principles:**\n{}\n\n",
			principles.to_markdown()
		));
	}

	section
}

fn instructions_section(menu: &[MenuItem]) -> String {
	let mut section = String::from("## Instructions\n\n");

	if menu.is_empty() {
		section.push_str("### When Invoked\n\n[TODO: Add detailed instructions]\n\n");
		return section;
	}

	for item in menu {
		section.push_str(&format!("### When {}\n\n", item.title().to_lowercase()));

		match item.body() {
			Some(MenuBody::Workflow(_)) => {
				section.push_str(&format!(
					"This invokes the {} workflow.\n\n**Process:**\n1. [TODO: Add workflow \
					 steps]\n2. [TODO: Add implementation details]\n3. [TODO: Add validation \
					 steps]\n\n",
					item.trigger
				));
			}
			Some(MenuBody::Action(action)) => {
				section.push_str(&format!("**Action:** {action}\n\n"));
			}
			Some(MenuBody::Exec(exec)) => {
				section.push_str(&format!("This executes a task: {exec}\n\n"));
			}
			None => {}
		}

		section.push_str("**Output Format:**\n[TODO: Specify output format]\n\n");
	}

	section
}
