use std::path::Path;
use std::path::PathBuf;
use std::process;

use bmad_cli::BmadCli;
use bmad_cli::Commands;
use bmad_core::AnyEmptyResult;
use bmad_core::BmadError;
use bmad_core::BmadResult;
use bmad_core::ConversionReport;
use bmad_core::config::BmadConfig;
use bmad_core::config::InstallSettings;
use bmad_core::installer::AcceptDefaults;
use bmad_core::installer::ComponentStatus;
use bmad_core::installer::InstallOptions;
use bmad_core::installer::InstallPaths;
use bmad_core::installer::InstallStats;
use bmad_core::installer::Installer;
use bmad_core::installer::Prompter;
use bmad_core::maintenance::FixReport;
use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "BMAD_LOG";

/// Installed names listed per component before the rest are summarized.
const LISTED_NAMES: usize = 5;

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = BmadCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::ConvertAgent { source, target }) => run_convert_agent(&args, source, target),
		Some(Commands::ConvertWorkflow { source_dir, target }) => {
			run_convert_workflow(&args, source_dir, target)
		}
		Some(Commands::Install {
			yes,
			force,
			source,
			claude_dir,
			output_folder,
			user_name,
			subagents,
		}) => {
			let overrides = InstallSettings {
				source_dir: source.clone(),
				claude_dir: claude_dir.clone(),
				config_dir: None,
				output_folder: output_folder.clone(),
				user_name: user_name.clone(),
			};
			run_install(&args, overrides, *yes, *force || *yes, *subagents)
		}
		Some(Commands::FixDescriptions { dir, dry_run }) => {
			run_fix_descriptions(&args, dir, *dry_run)
		}
		Some(Commands::FixCommandPaths { dir, dry_run }) => {
			run_fix_command_paths(&args, dir, *dry_run)
		}
		None => {
			eprintln!("No subcommand specified. Run `bmad --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<BmadError>() {
			Ok(bmad_err) => {
				let report: miette::Report = (*bmad_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(1);
	}
}

/// Log to stderr. `BMAD_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose)
		.with_ansi(use_color)
		.without_time()
		.init();
}

fn resolve_root(args: &BmadCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn print_section(title: &str) {
	println!();
	println!("{}", colored!(title, bold));
}

fn print_field(label: &str, value: impl std::fmt::Display) {
	println!("  {label:<16} {value}");
}

fn print_done(message: impl std::fmt::Display) {
	println!("{} {message}", colored!("✓", green));
}

fn print_follow_ups(heading: &str, report: &ConversionReport) {
	println!();
	println!("Conversion complete!");
	println!();
	println!("{}", colored!(heading, yellow));
	for item in report.follow_ups() {
		println!("   - {item}");
	}
}

fn run_convert_agent(
	args: &BmadCli,
	source: &Path,
	target: &Path,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let source = root.join(source);
	let target = root.join(target);

	println!("Converting agent from: {}", source.display());
	println!("Target file: {}", target.display());
	println!();

	let report = bmad_core::convert_agent(&source, &target)?;
	print_done(format!("Loaded agent: {}", report.name));
	print_done(format!(
		"Created: {} ({} bytes)",
		report.target.display(),
		report.bytes
	));
	print_follow_ups("IMPORTANT: Manual enhancement required!", &report);

	Ok(())
}

fn run_convert_workflow(
	args: &BmadCli,
	source_dir: &Path,
	target: &Path,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let source_dir = root.join(source_dir);
	let target = root.join(target);

	println!("Converting workflow from: {}", source_dir.display());
	println!("Target file: {}", target.display());
	println!();

	let report = bmad_core::convert_workflow(&source_dir, &target)?;
	print_done(format!("Loaded workflow: {}", report.name));
	if let Some(description) = &report.description {
		print_done(format!("Description: {description}"));
	}
	print_done(format!(
		"Created: {} ({} bytes)",
		report.target.display(),
		report.bytes
	));
	print_follow_ups("IMPORTANT: Manual review required!", &report);

	Ok(())
}

/// Prompts on the terminal.
struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
	fn confirm(&mut self, message: &str, default: bool) -> BmadResult<bool> {
		dialoguer::Confirm::new()
			.with_prompt(message)
			.default(default)
			.interact()
			.map_err(|e| BmadError::Prompt(e.to_string()))
	}

	fn input(&mut self, message: &str, default: &str) -> BmadResult<String> {
		dialoguer::Input::<String>::new()
			.with_prompt(message)
			.default(default.to_string())
			.allow_empty(true)
			.interact_text()
			.map_err(|e| BmadError::Prompt(e.to_string()))
	}
}

/// Account name from the OS user database, then `USER` or `USERNAME`.
fn login_name() -> String {
	whoami::fallible::username()
		.ok()
		.into_iter()
		.chain(std::env::var("USER"))
		.chain(std::env::var("USERNAME"))
		.map(|name| name.trim().to_string())
		.find(|name| !name.is_empty())
		.unwrap_or_default()
}

fn home_dir() -> Option<PathBuf> {
	directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

fn run_install(
	args: &BmadCli,
	overrides: InstallSettings,
	yes: bool,
	force: bool,
	subagents: bool,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let file_settings = BmadConfig::load(&root)?
		.map(|config| config.install)
		.unwrap_or_default();
	let settings = overrides.or(file_settings);
	let paths = InstallPaths::resolve(&root, home_dir().as_deref(), &settings)?;
	tracing::debug!(?paths, "resolved install paths");
	let defaults = InstallOptions {
		install_subagents: subagents,
		..InstallOptions::defaults(&settings, &login_name())
	};

	println!("{}", colored!("BMAD Method Plugin Installer", bold));

	if yes {
		let mut prompter = AcceptDefaults;
		drive_install(Installer::new(paths, defaults, &mut prompter).force(force))
	} else {
		let mut prompter = DialoguerPrompter;
		drive_install(Installer::new(paths, defaults, &mut prompter).force(force))
	}
}

fn drive_install<P: Prompter>(
	mut installer: Installer<'_, P>,
) -> AnyEmptyResult {
	print_section("Checking prerequisites...");
	let prerequisites = installer.check_prerequisites()?;
	let paths = installer.paths().clone();
	if prerequisites.created_claude_dir {
		print_done(format!(
			"Created assistant directory at {}",
			paths.claude_dir.display()
		));
	} else {
		print_done(format!(
			"Assistant directory found at {}",
			paths.claude_dir.display()
		));
	}
	print_done(format!("Source files found at {}", paths.source_dir.display()));
	if let Some(backup) = &prerequisites.backup_dir {
		println!(
			"{}",
			colored!("Existing BMAD installation detected", yellow)
		);
		print_done(format!("Backup created at {}", backup.display()));
	}

	print_section("Configuration");
	let options = installer.gather_options()?;

	print_section("Installation Summary");
	print_field("Project Root:", paths.project_root.display());
	print_field("Output Folder:", &options.output_folder);
	print_field("User Name:", &options.user_name);
	print_field("Commands:", yes_no(options.install_commands));
	print_field("Skills:", yes_no(options.install_skills));
	print_field("Subagents:", yes_no(options.install_subagents));
	println!();

	if !installer.confirm()? {
		println!("{}", colored!("Installation cancelled by user.", yellow));
		return Ok(());
	}

	let stats = installer.install(&options)?;
	print_install_stats(&paths, &options, &stats);

	Ok(())
}

fn yes_no(flag: bool) -> &'static str {
	if flag { "Yes" } else { "No" }
}

fn print_component(label: &str, status: &ComponentStatus, target: &Path, prefix: &str) {
	match status {
		ComponentStatus::Skipped => {
			println!("{}", colored!(format!("Skipping {label} installation"), yellow));
		}
		ComponentStatus::MissingSource => {
			println!("{}", colored!(format!("No {label} found to install"), yellow));
		}
		ComponentStatus::Installed(names) => {
			print_done(format!(
				"Installed {} {label} to {}",
				names.len(),
				target.display()
			));
			for name in names.iter().take(LISTED_NAMES) {
				println!("  - {prefix}{name}");
			}
			if names.len() > LISTED_NAMES {
				println!("  ... and {} more", names.len() - LISTED_NAMES);
			}
		}
	}
}

fn print_install_stats(paths: &InstallPaths, options: &InstallOptions, stats: &InstallStats) {
	print_section("Installing...");
	print_component("commands", &stats.commands, &paths.commands_dir, "/bmad/");
	print_component("skills", &stats.skills, &paths.skills_dir, "");
	print_component("subagents", &stats.subagents, &paths.subagents_dir, "");
	print_done(format!("Created config at {}", stats.config_file.display()));
	print_done(format!(
		"Created output folder at {}",
		stats.output_dir.display()
	));

	print_section("Installation Complete!");
	print_field("Commands:", stats.commands.count());
	print_field("Skills:", stats.skills.count());
	print_field("Subagents:", stats.subagents.count());

	print_section("Getting Started:");
	println!("  1. Restart the assistant if it is currently running");
	println!("  2. Type \"/\" to see the available commands");
	println!("  3. Start with: /bmad/workflow-init");

	print_section("Files Created:");
	println!("  - {}", stats.config_file.display());
	println!("  - {}/", stats.output_dir.display());

	print_section("Tips:");
	println!(
		"  - Edit {} to customize settings",
		make_relative(&stats.config_file, &paths.project_root)
	);
	println!(
		"  - All artifacts will be saved to {}/",
		options.output_folder
	);
	println!("  - Use /bmad/workflow-status anytime to check progress");
}

fn run_fix_descriptions(
	args: &BmadCli,
	dir: &Path,
	dry_run: bool,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let report = bmad_core::maintenance::fix_agent_descriptions(&root.join(dir), dry_run)?;
	print_fix_report(&report, &root, "description");

	Ok(())
}

fn run_fix_command_paths(
	args: &BmadCli,
	dir: &Path,
	dry_run: bool,
) -> AnyEmptyResult {
	let root = resolve_root(args);
	let report = bmad_core::maintenance::fix_command_paths(&root.join(dir), dry_run)?;
	print_fix_report(&report, &root, "command reference");

	Ok(())
}

fn print_fix_report(report: &FixReport, root: &Path, noun: &str) {
	if report.fixed.is_empty() {
		println!(
			"Scanned {} file(s), no {noun}s to fix.",
			report.scanned
		);
		return;
	}

	for fix in &report.fixed {
		let relative = make_relative(&fix.path, root);
		if report.dry_run {
			println!("Would update {relative}");
		} else {
			print_done(format!("Updated {relative}"));
		}
		for change in &fix.changes {
			println!("    {change}");
		}
		if report.dry_run {
			print_diff(&fix.original, &fix.updated);
		}
	}

	println!();
	let summary = format!(
		"{} {noun} change(s) in {} of {} file(s)",
		report.total_changes(),
		report.fixed.len(),
		report.scanned
	);
	if report.dry_run {
		println!("Dry run: {summary}, nothing written.");
	} else {
		println!("Fixed {summary}.");
	}
	if let Some(backup) = &report.backup_dir {
		println!("Backup: {}", backup.display());
	}
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
