//! # drfexts settings
//!
//! Pagination settings for drfexts, in the spirit of a REST framework
//! settings module: one plain struct with defaults, assembled from layered
//! sources by [`SettingsBuilder`].
//!
//! Priority (lowest to highest): built-in defaults, TOML files in the order
//! they were added, environment variables.
//!
//! ```
//! use drfexts_conf::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new().page_size(25).build().unwrap();
//! assert_eq!(settings.page_size, 25);
//! assert_eq!(settings.cursor_query_param, "cursor");
//! ```

pub mod builder;
pub mod error;

pub use builder::SettingsBuilder;
pub use error::SettingsError;

use serde::{Deserialize, Serialize};

/// Settings shared by every paginator in the workspace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationSettings {
	/// Default number of items (or lots) per page
	pub page_size: usize,
	/// Upper bound for a client supplied page size on cursor paginators
	pub max_page_size: usize,
	/// Upper bound for page-number paginators, also used for `page=all`
	pub page_number_max_page_size: usize,
	/// Maximum offset a cursor may carry
	pub offset_cutoff: usize,
	/// Expected rows per lot for grouped pagination
	pub lot_size: usize,
	/// Default ordering, comma separated, `-` prefix for descending
	pub ordering: String,
	/// Unique field appended to orderings to break ties
	pub tie_breaker: Option<String>,
	pub cursor_query_param: String,
	pub page_query_param: String,
	pub page_size_query_param: String,
}

impl Default for PaginationSettings {
	fn default() -> Self {
		Self {
			page_size: 10,
			max_page_size: 500,
			page_number_max_page_size: 100_000,
			offset_cutoff: 1000,
			lot_size: 25,
			ordering: "-created_at".to_string(),
			tie_breaker: None,
			cursor_query_param: "cursor".to_string(),
			page_query_param: "page".to_string(),
			page_size_query_param: "page_size".to_string(),
		}
	}
}

impl PaginationSettings {
	/// Check the settings for internal consistency.
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.page_size == 0 {
			return Err(SettingsError::Validation(
				"page_size must be greater than zero".to_string(),
			));
		}
		if self.max_page_size < self.page_size {
			return Err(SettingsError::Validation(format!(
				"max_page_size ({}) is smaller than page_size ({})",
				self.max_page_size, self.page_size
			)));
		}
		if self.page_number_max_page_size < self.page_size {
			return Err(SettingsError::Validation(format!(
				"page_number_max_page_size ({}) is smaller than page_size ({})",
				self.page_number_max_page_size, self.page_size
			)));
		}
		if self.lot_size == 0 {
			return Err(SettingsError::Validation(
				"lot_size must be greater than zero".to_string(),
			));
		}
		if self.ordering.trim().is_empty() {
			return Err(SettingsError::Validation(
				"ordering must name at least one field".to_string(),
			));
		}
		if self.tie_breaker.as_deref().is_some_and(|f| f.trim().is_empty()) {
			return Err(SettingsError::Validation(
				"tie_breaker must not be blank".to_string(),
			));
		}
		for (name, value) in [
			("cursor_query_param", &self.cursor_query_param),
			("page_query_param", &self.page_query_param),
			("page_size_query_param", &self.page_size_query_param),
		] {
			if value.trim().is_empty() {
				return Err(SettingsError::Validation(format!("{} must not be blank", name)));
			}
		}
		if self.page_size_query_param == self.cursor_query_param
			|| self.page_size_query_param == self.page_query_param
		{
			return Err(SettingsError::Validation(format!(
				"page_size_query_param '{}' collides with another query parameter",
				self.page_size_query_param
			)));
		}
		Ok(())
	}
}
