//! Page number pagination with a total count.

use crate::context::RequestContext;
use crate::links::{remove_query_param, render_link, replace_query_param};
use crate::params::{ErrorMessages, requested_page_size, validate_page_number};
use crate::response::{PageNumberResponse, PaginationSchema, SchemaParameter};
use crate::source::CountedSource;
use drfexts_conf::PaginationSettings;
use drfexts_exception::{Error, Result};
use serde_json::{Value, json};

/// Represents a single page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
	/// Items in this page
	pub object_list: Vec<T>,
	/// Current page number (1-indexed)
	pub number: usize,
	/// Total number of pages
	pub num_pages: usize,
	/// Total number of items across all pages
	pub count: usize,
	/// Items per page
	pub page_size: usize,
}

impl<T> Page<T> {
	pub fn has_next(&self) -> bool {
		self.number < self.num_pages
	}

	pub fn has_previous(&self) -> bool {
		self.number > 1
	}

	/// 1-based index of the first item on this page, `0` when empty.
	pub fn start_index(&self) -> usize {
		if self.count == 0 {
			return 0;
		}
		(self.number - 1) * self.page_size + 1
	}

	/// 1-based index of the last item on this page.
	pub fn end_index(&self) -> usize {
		if self.count == 0 {
			return 0;
		}
		self.start_index() + self.object_list.len() - 1
	}
}

/// Page number based pagination
///
/// Example URLs:
/// - `http://api.example.org/accounts/?page=4`
/// - `http://api.example.org/accounts/?page=4&page_size=100`
/// - `http://api.example.org/accounts/?page=all`
///
/// # Examples
///
/// ```
/// use drfexts_pagination::{PageNumberPagination, RequestContext};
///
/// let items: Vec<u32> = (1..=42).collect();
/// let ctx = RequestContext::parse("/accounts/?page=last").unwrap();
///
/// let response = PageNumberPagination::new().paginate(&items, &ctx).unwrap();
/// assert_eq!(response.total, 42);
/// assert_eq!(response.current_page, 5);
/// assert_eq!(response.results, vec![41, 42]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageNumberPagination {
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
	/// Whether to allow an empty first page
	pub allow_empty_first_page: bool,
	/// Custom error messages
	pub error_messages: ErrorMessages,
}

impl Default for PageNumberPagination {
	fn default() -> Self {
		Self {
			page_size: 10,
			max_page_size: 100_000,
			page_query_param: "page".to_string(),
			page_size_query_param: Some("page_size".to_string()),
			last_page_strings: vec!["last".to_string()],
			allow_empty_first_page: true,
			error_messages: ErrorMessages::default(),
		}
	}
}

impl PageNumberPagination {
	pub fn new() -> Self {
		Self::default()
	}

	/// Preset for bulk exports: 5000 items per page.
	pub fn big_page() -> Self {
		Self::default().page_size(5000)
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

	pub fn allow_empty_first_page(mut self, allow: bool) -> Self {
		self.allow_empty_first_page = allow;
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

	fn num_pages(&self, count: usize, page_size: usize) -> usize {
		if count == 0 {
			return usize::from(self.allow_empty_first_page);
		}
		count.div_ceil(page_size.max(1))
	}

	/// Read the page for this request.
	pub fn paginate_page<S>(&self, source: &S, ctx: &RequestContext) -> Result<Page<S::Item>>
	where
		S: CountedSource + ?Sized,
	{
		let page_size = self.get_page_size(ctx);
		let count = source.count()?;
		let num_pages = self.num_pages(count, page_size);

		let number = match ctx.query_param(&self.page_query_param) {
			None => 1,
			Some(raw) if raw == "all" => 1,
			Some(raw) if self.last_page_strings.contains(&raw) => num_pages.max(1),
			Some(raw) => validate_page_number(&raw, &self.error_messages)?,
		};
		if number > num_pages {
			return Err(Error::EmptyPage(self.error_messages.no_results.clone()));
		}

		let object_list = source.fetch_slice((number - 1) * page_size, page_size)?;
		tracing::trace!(
			requested_at = %ctx.timestamp(),
			number,
			num_pages,
			count,
			"resolved numbered page"
		);

		Ok(Page {
			object_list,
			number,
			num_pages,
			count,
			page_size,
		})
	}

	/// Read the page for this request and wrap it into the response payload.
	pub fn paginate<S>(&self, source: &S, ctx: &RequestContext) -> Result<PageNumberResponse<S::Item>>
	where
		S: CountedSource + ?Sized,
	{
		let page = self.paginate_page(source, ctx)?;
		Ok(PageNumberResponse {
			total: page.count,
			page_size: page.page_size,
			current_page: page.number,
			results: page.object_list,
		})
	}

	pub fn get_next_link<T>(&self, page: &Page<T>, ctx: &RequestContext) -> Option<String> {
		if !page.has_next() {
			return None;
		}
		Some(self.page_link(ctx, page.number + 1))
	}

	pub fn get_previous_link<T>(&self, page: &Page<T>, ctx: &RequestContext) -> Option<String> {
		if !page.has_previous() {
			return None;
		}
		Some(self.page_link(ctx, page.number - 1))
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
		render_link(&url, true)
	}
}

impl PaginationSchema for PageNumberPagination {
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
				"total": {"type": "integer", "example": 123},
				"page_size": {"type": "integer", "example": 15},
				"current_page": {"type": "integer", "example": 1},
				"results": schema,
			},
		})
	}
}
