//! Error types shared by the drfexts crates.
//!
//! Every fallible operation in the workspace returns [`Result`], whose error
//! side is the [`Error`] enum below. Variants carry the human readable
//! message that ends up in the response body; [`Error::status_code`] gives
//! the HTTP status a host application should answer with.

use thiserror::Error;

/// Result type alias for drfexts operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while paginating a collection.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// The requested page number is not a positive integer.
	#[error("Invalid page: {0}")]
	InvalidPage(String),

	/// The requested page lies beyond the end of the collection.
	#[error("Empty page: {0}")]
	EmptyPage(String),

	/// A cursor token could not be decoded.
	///
	/// The paginators never surface this variant; they fall back to the
	/// first page instead. It is returned by the strict codec API only.
	#[error("Invalid cursor: {0}")]
	InvalidCursor(String),

	/// An ordering specification could not be parsed.
	#[error("Invalid ordering: {0}")]
	InvalidOrdering(String),

	/// The request URL could not be parsed.
	#[error("Invalid URL: {0}")]
	InvalidUrl(String),

	/// The underlying data source failed to produce rows.
	#[error("Data source error: {0}")]
	Source(String),

	/// Settings were missing or inconsistent.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// JSON serialization failed.
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl Error {
	/// HTTP status code a host should respond with for this error.
	///
	/// # Examples
	///
	/// ```
	/// use drfexts_exception::Error;
	///
	/// assert_eq!(Error::InvalidPage("Invalid page number".into()).status_code(), 404);
	/// assert_eq!(Error::InvalidOrdering("--id".into()).status_code(), 400);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::InvalidPage(_) | Error::EmptyPage(_) => 404,
			Error::InvalidCursor(_) | Error::InvalidOrdering(_) | Error::InvalidUrl(_) => 400,
			Error::Source(_) | Error::Configuration(_) | Error::Serialization(_) => 500,
		}
	}

	/// Whether the error was caused by the client's request.
	pub fn is_client_error(&self) -> bool {
		(400..500).contains(&self.status_code())
	}
}
