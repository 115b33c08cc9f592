//! `bmad_core` converts BMAD agent and workflow definitions into the markdown
//! documents used by the assistant as subagents and slash commands, and
//! installs those documents.
//!
//! ## Processing Pipeline
//!
//! ```text
//! agent.yaml / workflow.yaml + instructions.md
//!   → Loader (typed definitions, presence checks)
//!   → Generator (ordered section builders)
//!       → Markup rewriter (workflow instructions only)
//!   → Writer (creates parent directories, overwrites the target)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Optional `bmad.toml` settings for the installer.
//! - [`installer`]: Prompted copy of commands, skills and subagents, plus
//!   the persisted `.bmad/config.yaml`.
//! - [`maintenance`]: Bulk fixes for already generated markdown.
//! - [`markup`]: The ordered rewrite rules for instruction markup.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use bmad_core::convert_agent;
//!
//! let report = convert_agent(
//! 	Path::new("src/modules/bmm/agents/architect.agent.yaml"),
//! 	Path::new("claude-code-plugin/src/subagents/bmad-architect.md"),
//! )
//! .unwrap();
//! println!("converted {}", report.name);
//! ```

pub use agent::*;
pub use convert::*;
pub use definition::*;
pub use document::*;
pub use error::*;
pub use markup::rewrite_markup;
pub use workflow::*;

mod agent;
pub mod config;
mod convert;
mod definition;
mod document;
#[allow(unused_assignments)]
mod error;
pub mod installer;
pub mod maintenance;
pub mod markup;
mod workflow;

#[cfg(test)]
mod __fixtures;
