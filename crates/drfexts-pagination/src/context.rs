//! Explicit per-request input for the paginators.

use chrono::{DateTime, Utc};
use drfexts_exception::{Error, Result};
use url::Url;

/// The parts of an inbound request a paginator needs.
///
/// Passed to every `paginate` call so that nothing request-scoped lives in
/// ambient or per-thread state. The request timestamp is only recorded on
/// the trace events the paginators emit; it never affects which rows are
/// returned.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::RequestContext;
///
/// let ctx = RequestContext::parse("/api/articles/?page_size=5&cursor=abc").unwrap();
/// assert_eq!(ctx.query_param("page_size").as_deref(), Some("5"));
/// assert_eq!(ctx.full_path(), "/api/articles/?page_size=5&cursor=abc");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
	url: Url,
	requested_at: DateTime<Utc>,
}

impl RequestContext {
	/// Build a context for `url`, stamped with the current time.
	pub fn new(url: Url) -> Self {
		Self {
			url,
			requested_at: Utc::now(),
		}
	}

	/// Parse an absolute URL or a path with optional query string.
	///
	/// Paths are resolved against `http://localhost`.
	pub fn parse(raw: &str) -> Result<Self> {
		let url = match Url::parse(raw) {
			Ok(url) => url,
			Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse("http://localhost")
				.and_then(|base| base.join(raw))
				.map_err(|e| Error::InvalidUrl(format!("{}: {}", raw, e)))?,
			Err(e) => return Err(Error::InvalidUrl(format!("{}: {}", raw, e))),
		};
		Ok(Self::new(url))
	}

	/// Replace the request timestamp.
	pub fn requested_at(mut self, at: DateTime<Utc>) -> Self {
		self.requested_at = at;
		self
	}

	pub fn timestamp(&self) -> DateTime<Utc> {
		self.requested_at
	}

	pub fn url(&self) -> &Url {
		&self.url
	}

	/// First value of the query parameter `key`.
	pub fn query_param(&self, key: &str) -> Option<String> {
		self.url
			.query_pairs()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.into_owned())
	}

	/// Path plus query string, without scheme and host.
	pub fn full_path(&self) -> String {
		match self.url.query() {
			Some(query) => format!("{}?{}", self.url.path(), query),
			None => self.url.path().to_string(),
		}
	}
}
