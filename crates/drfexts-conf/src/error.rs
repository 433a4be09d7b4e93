//! Settings error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while assembling [`PaginationSettings`](crate::PaginationSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
	/// A settings file could not be read.
	#[error("failed to read settings file {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A settings file is not valid TOML or has the wrong shape.
	#[error("failed to parse settings file {path}: {source}")]
	Parse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	/// An environment variable holds a value of the wrong type.
	#[error("invalid value '{value}' for {key}")]
	InvalidValue { key: String, value: String },

	/// The assembled settings are inconsistent.
	#[error("invalid settings: {0}")]
	Validation(String),
}

impl From<SettingsError> for drfexts_exception::Error {
	fn from(err: SettingsError) -> Self {
		drfexts_exception::Error::Configuration(err.to_string())
	}
}
