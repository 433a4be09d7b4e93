//! Page number pagination that never counts the collection.
//!
//! One extra row is read past the page to learn whether a next page exists,
//! which is all the links need. The reported `count` is always `0`.

use crate::context::RequestContext;
use crate::links::{remove_query_param, render_link, replace_query_param};
use crate::params::{ErrorMessages, requested_page_size, validate_page_number};
use crate::response::{PaginationSchema, SchemaParameter, WithoutCountResponse, link_schema};
use crate::source::SliceSource;
use drfexts_conf::PaginationSettings;
use drfexts_exception::{Error, Result};
use serde_json::{Value, json};

/// Splits a sliceable collection into pages without counting it.
#[derive(Debug)]
pub struct WithoutCountPaginator<'a, S: ?Sized> {
	source: &'a S,
	per_page: usize,
	messages: ErrorMessages,
}

impl<'a, S> WithoutCountPaginator<'a, S>
where
	S: SliceSource + ?Sized,
{
	pub fn new(source: &'a S, per_page: usize) -> Self {
		Self {
			source,
			per_page,
			messages: ErrorMessages::default(),
		}
	}

	pub fn error_messages(mut self, messages: ErrorMessages) -> Self {
		self.messages = messages;
		self
	}

	pub fn per_page(&self) -> usize {
		self.per_page
	}

	/// Always `0`.
	pub fn count(&self) -> usize {
		0
	}

	/// Validate the given 1-based page number.
	pub fn validate_number(&self, raw: &str) -> Result<usize> {
		validate_page_number(raw, &self.messages)
	}

	/// Fetch page `number`.
	///
	/// Fails with [`Error::EmptyPage`] when nothing lies at the page's offset.
	pub fn page(&self, number: usize) -> Result<WithoutCountPage<S::Item>> {
		if number < 1 {
			return Err(Error::InvalidPage(self.messages.min_page.clone()));
		}
		let bottom = (number - 1).saturating_mul(self.per_page);
		let mut items = self
			.source
			.fetch_slice(bottom, self.per_page.saturating_add(1))?;
		if items.is_empty() {
			return Err(Error::EmptyPage(self.messages.no_results.clone()));
		}
		let has_next = items.len() > self.per_page;
		items.truncate(self.per_page);

		Ok(WithoutCountPage {
			items,
			number,
			has_next,
		})
	}
}

/// One page read by [`WithoutCountPaginator`].
#[derive(Debug, Clone, PartialEq)]
pub struct WithoutCountPage<T> {
	items: Vec<T>,
	number: usize,
	has_next: bool,
}

impl<T> WithoutCountPage<T> {
	pub fn items(&self) -> &[T] {
		&self.items
	}

	pub fn into_items(self) -> Vec<T> {
		self.items
	}

	pub fn number(&self) -> usize {
		self.number
	}

	pub fn has_next(&self) -> bool {
		self.has_next
	}

	pub fn has_previous(&self) -> bool {
		self.number > 1
	}

	pub fn next_page_number(&self) -> Option<usize> {
		self.has_next.then(|| self.number + 1)
	}

	pub fn previous_page_number(&self) -> Option<usize> {
		self.has_previous().then(|| self.number - 1)
	}
}

/// Request level wrapper around [`WithoutCountPaginator`].
///
/// `page=all` returns up to `max_page_size` items in a single page.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::{RequestContext, WithoutCountPagination};
///
/// let items: Vec<u32> = (1..=25).collect();
/// let paginator = WithoutCountPagination::new();
///
/// let ctx = RequestContext::parse("/api/users/?page=2&page_size=10").unwrap();
/// let response = paginator.paginate(&items, &ctx).unwrap();
///
/// assert_eq!(response.count, 0);
/// assert_eq!(response.results, (11..=20).collect::<Vec<_>>());
/// assert_eq!(response.previous.as_deref(), Some("/api/users/?page_size=10"));
/// assert_eq!(response.next.as_deref(), Some("/api/users/?page=3&page_size=10"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithoutCountPagination {
	/// Default page size
	pub page_size: usize,
	/// Maximum allowed page size, also used for `page=all`
	pub max_page_size: usize,
	/// Query parameter name for page number
	pub page_query_param: String,
	/// Query parameter name for page size (optional)
	pub page_size_query_param: Option<String>,
	/// Strings that represent the last page
	pub last_page_strings: Vec<String>,
	/// Custom error messages
	pub error_messages: ErrorMessages,
}

impl Default for WithoutCountPagination {
	fn default() -> Self {
		Self {
			page_size: 10,
			max_page_size: 100_000,
			page_query_param: "page".to_string(),
			page_size_query_param: Some("page_size".to_string()),
			last_page_strings: vec!["last".to_string()],
			error_messages: ErrorMessages::default(),
		}
	}
}

impl WithoutCountPagination {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a paginator from loaded settings.
	pub fn from_settings(settings: &PaginationSettings) -> Self {
		Self {
			page_size: settings.page_size,
			max_page_size: settings.page_number_max_page_size,
			page_query_param: settings.page_query_param.clone(),
			page_size_query_param: Some(settings.page_size_query_param.clone()),
			..Self::default()
		}
	}

	pub fn page_size(mut self, size: usize) -> Self {
		self.page_size = size;
		self
	}

	pub fn max_page_size(mut self, size: usize) -> Self {
		self.max_page_size = size;
		self
	}

	pub fn page_query_param(mut self, param: impl Into<String>) -> Self {
		self.page_query_param = param.into();
		self
	}

	pub fn page_size_query_param(mut self, param: impl Into<String>) -> Self {
		self.page_size_query_param = Some(param.into());
		self
	}

	pub fn error_messages(mut self, messages: ErrorMessages) -> Self {
		self.error_messages = messages;
		self
	}

	fn wants_all(&self, ctx: &RequestContext) -> bool {
		ctx.query_param(&self.page_query_param).as_deref() == Some("all")
	}

	/// Page size for this request.
	pub fn get_page_size(&self, ctx: &RequestContext) -> usize {
		if self.wants_all(ctx) {
			return self.max_page_size;
		}
		requested_page_size(
			ctx,
			self.page_size_query_param.as_deref(),
			self.page_size,
			Some(self.max_page_size),
		)
	}

	/// Page number for this request.
	///
	/// The total is unknown, so last-page strings resolve to page 1.
	pub fn get_page_number(&self, ctx: &RequestContext) -> Result<usize> {
		match ctx.query_param(&self.page_query_param) {
			None => Ok(1),
			Some(raw) if raw == "all" || self.last_page_strings.contains(&raw) => Ok(1),
			Some(raw) => validate_page_number(&raw, &self.error_messages),
		}
	}

	/// Read the page for this request.
	///
	/// `Ok(None)` means the page lies past the end of the collection.
	pub fn paginate_page<S>(
		&self,
		source: &S,
		ctx: &RequestContext,
	) -> Result<Option<WithoutCountPage<S::Item>>>
	where
		S: SliceSource + ?Sized,
	{
		let number = self.get_page_number(ctx)?;
		let paginator = WithoutCountPaginator::new(source, self.get_page_size(ctx))
			.error_messages(self.error_messages.clone());
		match paginator.page(number) {
			Ok(page) => Ok(Some(page)),
			Err(Error::EmptyPage(message)) => {
				tracing::debug!(page = number, %message, "page past end of collection");
				Ok(None)
			}
			Err(err) => Err(err),
		}
	}

	/// Read the page for this request and wrap it into the response payload.
	pub fn paginate<S>(&self, source: &S, ctx: &RequestContext) -> Result<WithoutCountResponse<S::Item>>
	where
		S: SliceSource + ?Sized,
	{
		let Some(page) = self.paginate_page(source, ctx)? else {
			return Ok(WithoutCountResponse {
				count: 0,
				previous: None,
				next: None,
				results: Vec::new(),
			});
		};
		Ok(WithoutCountResponse {
			count: 0,
			previous: self.get_previous_link(&page, ctx),
			next: self.get_next_link(&page, ctx),
			results: page.into_items(),
		})
	}

	pub fn get_next_link<T>(&self, page: &WithoutCountPage<T>, ctx: &RequestContext) -> Option<String> {
		let number = page.next_page_number()?;
		Some(self.page_link(ctx, number))
	}

	pub fn get_previous_link<T>(&self, page: &WithoutCountPage<T>, ctx: &RequestContext) -> Option<String> {
		let number = page.previous_page_number()?;
		Some(self.page_link(ctx, number))
	}

	/// Link to page `number`; `page=all` links pin the page size it used.
	fn page_link(&self, ctx: &RequestContext, number: usize) -> String {
		let mut url = if number == 1 {
			remove_query_param(ctx.url(), &self.page_query_param)
		} else {
			replace_query_param(ctx.url(), &self.page_query_param, &number.to_string())
		};
		if let Some(param) = self.page_size_query_param.as_deref().filter(|_| self.wants_all(ctx)) {
			url = replace_query_param(&url, param, &self.max_page_size.to_string());
		}
		render_link(&url, false)
	}
}

impl PaginationSchema for WithoutCountPagination {
	fn get_schema_parameters(&self) -> Vec<SchemaParameter> {
		let mut params = vec![SchemaParameter::query(
			&self.page_query_param,
			"A page number within the paginated result set, or \"all\".",
			"integer",
		)];
		if let Some(ref param) = self.page_size_query_param {
			params.push(SchemaParameter::query(
				param,
				"Number of results to return per page.",
				"integer",
			));
		}
		params
	}

	fn get_paginated_response_schema(&self, schema: Value) -> Value {
		json!({
			"type": "object",
			"properties": {
				"count": {"type": "integer", "example": 0},
				"previous": link_schema("/api/users/?page_size=10&page=1"),
				"next": link_schema("/api/users/?page_size=10&page=3"),
				"results": schema,
			},
		})
	}
}
