use std::fmt;
use std::path::Path;

use crate::BmadError;
use crate::BmadResult;

/// Marker line opening and closing a frontmatter block.
pub const FRONTMATTER_DELIMITER: &str = "---";

/// Named fragment of a generated document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
	pub name: &'static str,
	pub text: String,
}

/// A document assembled from ordered sections.
///
/// Sections are joined with a single newline when rendered, including empty
/// ones, so an omitted section still leaves its separator behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedDocument {
	sections: Vec<Section>,
}

impl GeneratedDocument {
	pub fn new() -> Self {
		Self::default()
	}

	/// Append a section. Builders return an empty string when the data they
	/// render is absent.
	#[must_use]
	pub fn with_section(mut self, name: &'static str, text: impl Into<String>) -> Self {
		let text = text.into();
		tracing::debug!(section = name, bytes = text.len(), "built section");
		self.sections.push(Section { name, text });
		self
	}

	pub fn sections(&self) -> &[Section] {
		&self.sections
	}

	/// Look up a section by name.
	pub fn section(&self, name: &str) -> Option<&str> {
		self.sections
			.iter()
			.find(|section| section.name == name)
			.map(|section| section.text.as_str())
	}

	pub fn render(&self) -> String {
		self.sections
			.iter()
			.map(|section| section.text.as_str())
			.collect::<Vec<_>>()
			.join("\n")
	}
}

impl fmt::Display for GeneratedDocument {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.render())
	}
}

/// Build a frontmatter block from ordered key/value pairs.
pub fn frontmatter(fields: &[(&str, &str)]) -> String {
	let mut block = format!("{FRONTMATTER_DELIMITER}\n");
	for (key, value) in fields {
		block.push_str(&format!("{key}: {value}\n"));
	}
	block.push_str(FRONTMATTER_DELIMITER);
	block.push('\n');
	block
}

/// Write `text` to `path`, creating missing parent directories and replacing
/// any existing file.
pub fn write_document(path: &Path, text: &str) -> BmadResult<()> {
	if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
		std::fs::create_dir_all(parent).map_err(|source| {
			BmadError::Write {
				path: parent.display().to_string(),
				source,
			}
		})?;
	}

	std::fs::write(path, text).map_err(|source| {
		BmadError::Write {
			path: path.display().to_string(),
			source,
		}
	})?;

	tracing::info!(path = %path.display(), bytes = text.len(), "wrote document");
	Ok(())
}
