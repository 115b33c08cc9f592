use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Convert BMAD agents and workflows into assistant subagents and slash commands.",
	long_about = "bmad converts BMAD method definitions into the markdown documents an AI \
	              coding assistant loads as subagents and slash commands, and installs them \
	              into the assistant directory.\n\nQuick start:\n  bmad convert-agent      \
	              Agent YAML to a subagent document\n  bmad convert-workflow   Workflow \
	              directory to a slash command document\n  bmad install            Install \
	              commands, skills and subagents\n  bmad fix-descriptions   Refresh generated \
	              agent descriptions\n  bmad fix-command-paths  Namespace `/bmad/<name>` \
	              references"
)]
pub struct BmadCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Convert an agent YAML file into a subagent markdown document.
	///
	/// Reads `agent.metadata`, `agent.persona` and `agent.menu` and writes a
	/// document with frontmatter, description, persona and one instruction
	/// section per menu item. Missing parent directories of the target are
	/// created and an existing target is overwritten.
	ConvertAgent {
		/// Agent definition, e.g. `src/modules/bmm/agents/pm.agent.yaml`.
		source: PathBuf,

		/// Markdown file to write, e.g. `subagents/bmad-pm.md`.
		target: PathBuf,
	},
	/// Convert a workflow directory into a slash command markdown document.
	///
	/// The directory must contain both `workflow.yaml` and `instructions.md`.
	/// The instruction markup is rewritten to plain markdown and configuration
	/// notes are added for every known `{variable}` it references.
	ConvertWorkflow {
		/// Directory holding `workflow.yaml` and `instructions.md`.
		source_dir: PathBuf,

		/// Markdown file to write, e.g. `commands/phase-1/product-brief.md`.
		target: PathBuf,
	},
	/// Install commands, skills and subagents into the assistant directory.
	///
	/// Asks for the artifact folder and author name, copies the selected
	/// components under `<claude-dir>/{commands,skills,subagents}/bmad` and
	/// writes `.bmad/config.yaml` in the project root. An earlier project
	/// configuration is backed up first.
	Install {
		/// Accept every default answer without prompting. Implies `--force`.
		#[arg(long, short, default_value_t = false)]
		yes: bool,

		/// Overwrite an existing installation without asking.
		#[arg(long, default_value_t = false)]
		force: bool,

		/// Plugin source directory holding `commands/`, `skills/` and
		/// `subagents/`. Defaults to `claude-code-plugin/src`.
		#[arg(long)]
		source: Option<PathBuf>,

		/// Assistant directory to install into. Defaults to `~/.claude`.
		#[arg(long)]
		claude_dir: Option<PathBuf>,

		/// Default answer for the artifact output folder.
		#[arg(long)]
		output_folder: Option<String>,

		/// Default answer for the author name.
		#[arg(long)]
		user_name: Option<String>,

		/// Install subagents by default.
		#[arg(long, default_value_t = false)]
		subagents: bool,
	},
	/// Replace `Auto-invoked ...` sentences in generated agent descriptions.
	///
	/// Every markdown file under the directory is scanned. Changed files are
	/// backed up next to the directory before they are rewritten.
	FixDescriptions {
		/// Directory of generated subagent documents.
		#[arg(default_value = "agents")]
		dir: PathBuf,

		/// Show the changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Rewrite `/bmad/<name>` references to `/bmad:<group>:<name>`.
	///
	/// Groups are taken from the directory layout of the command documents,
	/// so `phase-2/prd.md` turns `/bmad/prd` into `/bmad:phase-2:prd`.
	/// References to unknown commands are left untouched.
	FixCommandPaths {
		/// Directory of generated command documents.
		#[arg(default_value = "commands")]
		dir: PathBuf,

		/// Show the changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
}
