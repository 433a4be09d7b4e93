//! Layered construction of [`PaginationSettings`].

use crate::{PaginationSettings, SettingsError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment prefix used by [`SettingsBuilder::with_env`].
pub const DEFAULT_ENV_PREFIX: &str = "DRFEXTS_";

/// Subset of the settings present in one source.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PartialSettings {
	page_size: Option<usize>,
	max_page_size: Option<usize>,
	page_number_max_page_size: Option<usize>,
	offset_cutoff: Option<usize>,
	lot_size: Option<usize>,
	ordering: Option<String>,
	tie_breaker: Option<String>,
	cursor_query_param: Option<String>,
	page_query_param: Option<String>,
	page_size_query_param: Option<String>,
}

impl PartialSettings {
	fn apply(self, settings: &mut PaginationSettings) {
		if let Some(v) = self.page_size {
			settings.page_size = v;
		}
		if let Some(v) = self.max_page_size {
			settings.max_page_size = v;
		}
		if let Some(v) = self.page_number_max_page_size {
			settings.page_number_max_page_size = v;
		}
		if let Some(v) = self.offset_cutoff {
			settings.offset_cutoff = v;
		}
		if let Some(v) = self.lot_size {
			settings.lot_size = v;
		}
		if let Some(v) = self.ordering {
			settings.ordering = v;
		}
		if let Some(v) = self.tie_breaker {
			settings.tie_breaker = Some(v);
		}
		if let Some(v) = self.cursor_query_param {
			settings.cursor_query_param = v;
		}
		if let Some(v) = self.page_query_param {
			settings.page_query_param = v;
		}
		if let Some(v) = self.page_size_query_param {
			settings.page_size_query_param = v;
		}
	}
}

/// Builder assembling settings from defaults, TOML files, the environment
/// and explicit overrides, in that order of increasing priority.
///
/// TOML files may hold the keys at the top level or inside a
/// `[pagination]` table.
///
/// # Examples
///
/// ```
/// use drfexts_conf::SettingsBuilder;
///
/// let settings = SettingsBuilder::new()
///     .page_size(20)
///     .ordering("-published_at,id")
///     .build()
///     .unwrap();
/// assert_eq!(settings.page_size, 20);
/// assert_eq!(settings.ordering, "-published_at,id");
/// ```
#[derive(Debug, Default)]
pub struct SettingsBuilder {
	toml_files: Vec<PathBuf>,
	env_prefix: Option<String>,
	overrides: PartialSettings,
}

impl SettingsBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	/// Add a TOML file. Files added later override earlier ones.
	pub fn toml_file(mut self, path: impl AsRef<Path>) -> Self {
		self.toml_files.push(path.as_ref().to_path_buf());
		self
	}

	/// Read overrides from `DRFEXTS_*` environment variables.
	pub fn with_env(self) -> Self {
		self.env_prefix(DEFAULT_ENV_PREFIX)
	}

	/// Read overrides from environment variables with a custom prefix.
	pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = Some(prefix.into());
		self
	}

	pub fn page_size(mut self, size: usize) -> Self {
		self.overrides.page_size = Some(size);
		self
	}

	pub fn max_page_size(mut self, size: usize) -> Self {
		self.overrides.max_page_size = Some(size);
		self
	}

	pub fn offset_cutoff(mut self, cutoff: usize) -> Self {
		self.overrides.offset_cutoff = Some(cutoff);
		self
	}

	pub fn lot_size(mut self, size: usize) -> Self {
		self.overrides.lot_size = Some(size);
		self
	}

	pub fn ordering(mut self, ordering: impl Into<String>) -> Self {
		self.overrides.ordering = Some(ordering.into());
		self
	}

	pub fn tie_breaker(mut self, field: impl Into<String>) -> Self {
		self.overrides.tie_breaker = Some(field.into());
		self
	}

	/// Assemble and validate the settings.
	pub fn build(self) -> Result<PaginationSettings, SettingsError> {
		let mut settings = PaginationSettings::default();

		for path in &self.toml_files {
			load_toml(path)?.apply(&mut settings);
			tracing::debug!(path = %path.display(), "loaded pagination settings file");
		}

		if let Some(prefix) = &self.env_prefix {
			load_env(prefix)?.apply(&mut settings);
		}

		self.overrides.apply(&mut settings);
		settings.validate()?;
		Ok(settings)
	}
}

fn load_toml(path: &Path) -> Result<PartialSettings, SettingsError> {
	let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let parse_err = |source| SettingsError::Parse {
		path: path.to_path_buf(),
		source,
	};

	let mut table: toml::Table = toml::from_str(&content).map_err(parse_err)?;
	let value = match table.remove("pagination") {
		Some(section @ toml::Value::Table(_)) => section,
		Some(other) => {
			table.insert("pagination".to_string(), other);
			toml::Value::Table(table)
		}
		None => toml::Value::Table(table),
	};
	value.try_into::<PartialSettings>().map_err(parse_err)
}

fn load_env(prefix: &str) -> Result<PartialSettings, SettingsError> {
	let var = |name: &str| std::env::var(format!("{}{}", prefix, name)).ok();
	let number = |name: &str| -> Result<Option<usize>, SettingsError> {
		match var(name) {
			Some(raw) => raw
				.trim()
				.parse::<usize>()
				.map(Some)
				.map_err(|_| SettingsError::InvalidValue {
					key: format!("{}{}", prefix, name),
					value: raw,
				}),
			None => Ok(None),
		}
	};

	let partial = PartialSettings {
		page_size: number("PAGE_SIZE")?,
		max_page_size: number("MAX_PAGE_SIZE")?,
		page_number_max_page_size: number("PAGE_NUMBER_MAX_PAGE_SIZE")?,
		offset_cutoff: number("OFFSET_CUTOFF")?,
		lot_size: number("LOT_SIZE")?,
		ordering: var("ORDERING"),
		tie_breaker: var("TIE_BREAKER"),
		cursor_query_param: var("CURSOR_QUERY_PARAM"),
		page_query_param: var("PAGE_QUERY_PARAM"),
		page_size_query_param: var("PAGE_SIZE_QUERY_PARAM"),
	};
	Ok(partial)
}
