use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum BmadError {
	#[error(transparent)]
	#[diagnostic(code(bmad::io_error))]
	Io(#[from] std::io::Error),

	#[error("not found: `{path}`")]
	#[diagnostic(
		code(bmad::not_found),
		help("check the path; workflow sources need both `workflow.yaml` and `instructions.md`")
	)]
	NotFound { path: String },

	#[error("failed to parse `{path}`: {reason}")]
	#[diagnostic(code(bmad::parse))]
	Parse { path: String, reason: String },

	#[error("missing required field `{field}` in `{path}`")]
	#[diagnostic(
		code(bmad::schema),
		help("agent files need `agent.metadata.name` and `agent.metadata.title`; workflow files need `name` and `description`")
	)]
	Schema { path: String, field: String },

	#[error("failed to write `{path}`")]
	#[diagnostic(code(bmad::write))]
	Write {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(bmad::config_parse),
		help("check that bmad.toml is valid TOML with an optional [install] section")
	)]
	ConfigParse(String),

	#[error("prompt failed: {0}")]
	#[diagnostic(code(bmad::prompt))]
	Prompt(String),

	#[error("installation cancelled: {0}")]
	#[diagnostic(code(bmad::install_cancelled))]
	InstallCancelled(String),

	#[error("could not determine the home directory")]
	#[diagnostic(
		code(bmad::home_dir),
		help("pass `--claude-dir` or set `install.claude_dir` in bmad.toml")
	)]
	HomeDirUnavailable,
}

impl BmadError {
	pub(crate) fn not_found(path: &std::path::Path) -> Self {
		Self::NotFound {
			path: path.display().to_string(),
		}
	}

	pub(crate) fn schema(path: &std::path::Path, field: &str) -> Self {
		Self::Schema {
			path: path.display().to_string(),
			field: field.to_string(),
		}
	}
}

pub type BmadResult<T> = Result<T, BmadError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
