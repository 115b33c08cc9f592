use std::path::Path;

use serde::Deserialize;
use serde_yaml_ng::Value;

use crate::BmadError;
use crate::BmadResult;

/// File name of the workflow definition inside a workflow source directory.
pub const WORKFLOW_FILE_NAME: &str = "workflow.yaml";
/// File name of the markup-bearing instructions inside a workflow source
/// directory.
pub const INSTRUCTIONS_FILE_NAME: &str = "instructions.md";

/// An agent parsed from a `*.agent.yaml` file.
///
/// ```yaml
/// agent:
///   metadata:
///     name: John
///     title: Product Manager
///   persona:
///     role: Investigative Product Strategist
///   menu:
///     - trigger: prd
///       workflow: "{project-root}/bmad/bmm/workflows/prd/workflow.yaml"
///       description: Create Product Requirements Document
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefinition {
	pub metadata: AgentMetadata,
	pub persona: Option<Persona>,
	pub menu: Vec<MenuItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentMetadata {
	/// Human readable name, used to derive the `subagent_type` slug.
	pub name: String,
	pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Persona {
	#[serde(default)]
	pub role: Option<String>,
	#[serde(default)]
	pub identity: Option<String>,
	#[serde(default)]
	pub communication_style: Option<String>,
	#[serde(default)]
	pub principles: Option<Principles>,
}

/// Persona principles are written either as a prose block or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Principles {
	Text(String),
	List(Vec<String>),
}

impl Principles {
	/// Render the principles as markdown. Lists become one bullet per line.
	pub fn to_markdown(&self) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::List(items) => {
				items
					.iter()
					.map(|item| format!("- {item}"))
					.collect::<Vec<_>>()
					.join("\n")
			}
		}
	}

	fn is_empty(&self) -> bool {
		match self {
			Self::Text(text) => text.is_empty(),
			Self::List(items) => items.is_empty(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuItem {
	/// Falls back to the description when the source omits it.
	pub trigger: String,
	pub description: Option<String>,
	pub workflow: Option<String>,
	pub action: Option<String>,
	pub exec: Option<String>,
}

/// The single behavior a menu item contributes to the generated instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuBody<'a> {
	Workflow(&'a str),
	Action(&'a str),
	Exec(&'a str),
}

impl MenuItem {
	/// Heading text for the item: the description, or the trigger when no
	/// description was given.
	pub fn title(&self) -> &str {
		self.description.as_deref().unwrap_or(&self.trigger)
	}

	/// Select the item body. `workflow` wins over `action`, which wins over
	/// `exec`, no matter how many are present.
	pub fn body(&self) -> Option<MenuBody<'_>> {
		self.workflow
			.as_deref()
			.map(MenuBody::Workflow)
			.or_else(|| self.action.as_deref().map(MenuBody::Action))
			.or_else(|| self.exec.as_deref().map(MenuBody::Exec))
	}
}

/// A workflow parsed from `workflow.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowDefinition {
	/// Kebab-case workflow name, e.g. `product-brief`.
	pub name: String,
	pub description: String,
	pub template: bool,
	pub validation: bool,
	pub web_bundle: bool,
	pub default_output_file: Option<String>,
}

/// Everything read from a workflow source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSource {
	pub definition: WorkflowDefinition,
	/// Raw contents of `instructions.md`, markup included.
	pub instructions: String,
}

#[derive(Debug, Deserialize)]
struct RawAgentFile {
	#[serde(default)]
	agent: Option<RawAgent>,
}

#[derive(Debug, Deserialize)]
struct RawAgent {
	#[serde(default)]
	metadata: Option<RawMetadata>,
	#[serde(default)]
	persona: Option<Persona>,
	#[serde(default)]
	menu: Option<Vec<RawMenuItem>>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMenuItem {
	#[serde(default)]
	trigger: Option<String>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	workflow: Option<String>,
	#[serde(default)]
	action: Option<String>,
	#[serde(default)]
	exec: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawWorkflow {
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	description: Option<String>,
	#[serde(default)]
	template: Option<Value>,
	#[serde(default)]
	validation: Option<Value>,
	#[serde(default)]
	web_bundle: Option<Value>,
	#[serde(default)]
	default_output_file: Option<String>,
}

/// Load an agent definition from a YAML file.
pub fn load_agent(path: &Path) -> BmadResult<AgentDefinition> {
	let content = read_source(path)?;
	let raw: RawAgentFile = parse_yaml(path, &content)?;
	let agent = raw.agent.ok_or_else(|| BmadError::schema(path, "agent"))?;
	let metadata = agent
		.metadata
		.ok_or_else(|| BmadError::schema(path, "agent.metadata"))?;
	let name =
		non_empty(metadata.name).ok_or_else(|| BmadError::schema(path, "agent.metadata.name"))?;
	let title =
		non_empty(metadata.title).ok_or_else(|| BmadError::schema(path, "agent.metadata.title"))?;

	let mut menu = Vec::new();
	for (index, item) in agent.menu.unwrap_or_default().into_iter().enumerate() {
		let description = non_empty(item.description);
		let Some(trigger) = non_empty(item.trigger).or_else(|| description.clone()) else {
			tracing::warn!(
				index,
				path = %path.display(),
				"skipping menu item without trigger or description"
			);
			continue;
		};
		menu.push(MenuItem {
			trigger,
			description,
			workflow: non_empty(item.workflow),
			action: non_empty(item.action),
			exec: non_empty(item.exec),
		});
	}

	let persona = agent.persona.map(|persona| {
		Persona {
			role: non_empty(persona.role),
			identity: non_empty(persona.identity),
			communication_style: non_empty(persona.communication_style),
			principles: persona.principles.filter(|principles| !principles.is_empty()),
		}
	});

	tracing::info!(title = %title, path = %path.display(), "loaded agent");

	Ok(AgentDefinition {
		metadata: AgentMetadata { name, title },
		persona,
		menu,
	})
}

/// Load `workflow.yaml` and `instructions.md` from a workflow directory.
///
/// Both files are checked for existence before either is read, so a missing
/// companion file never results in a partially loaded workflow.
pub fn load_workflow(dir: &Path) -> BmadResult<WorkflowSource> {
	let workflow_path = dir.join(WORKFLOW_FILE_NAME);
	let instructions_path = dir.join(INSTRUCTIONS_FILE_NAME);

	for required in [&workflow_path, &instructions_path] {
		if !required.is_file() {
			return Err(BmadError::not_found(required));
		}
	}

	let content = read_source(&workflow_path)?;
	let raw: RawWorkflow = parse_yaml(&workflow_path, &content)?;
	let name = non_empty(raw.name).ok_or_else(|| BmadError::schema(&workflow_path, "name"))?;
	let description = non_empty(raw.description)
		.ok_or_else(|| BmadError::schema(&workflow_path, "description"))?;
	let instructions = read_source(&instructions_path)?;

	tracing::info!(name = %name, description = %description, "loaded workflow");

	Ok(WorkflowSource {
		definition: WorkflowDefinition {
			name,
			description,
			template: is_truthy(raw.template.as_ref()),
			validation: is_truthy(raw.validation.as_ref()),
			web_bundle: is_truthy(raw.web_bundle.as_ref()),
			default_output_file: non_empty(raw.default_output_file),
		},
		instructions,
	})
}

fn read_source(path: &Path) -> BmadResult<String> {
	if !path.is_file() {
		return Err(BmadError::not_found(path));
	}

	Ok(std::fs::read_to_string(path)?)
}

fn parse_yaml<T: serde::de::DeserializeOwned>(path: &Path, content: &str) -> BmadResult<T> {
	serde_yaml_ng::from_str(content).map_err(|e| {
		BmadError::Parse {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})
}

fn non_empty(value: Option<String>) -> Option<String> {
	value.filter(|value| !value.is_empty())
}

/// Flags in `workflow.yaml` are either booleans or paths (`template:
/// "./template.md"`). Anything other than `false`, `0`, an empty string or
/// null counts as set.
fn is_truthy(value: Option<&Value>) -> bool {
	match value {
		None | Some(Value::Null) => false,
		Some(Value::Bool(flag)) => *flag,
		Some(Value::String(text)) => !text.is_empty(),
		Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n.abs() > f64::EPSILON),
		Some(_) => true,
	}
}
