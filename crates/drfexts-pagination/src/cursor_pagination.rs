//! Request level cursor pagination.

use crate::context::RequestContext;
use crate::cursor::{Cursor, CursorCodec, QueryStringCursorCodec};
use crate::links::{remove_query_param, render_link, replace_query_param};
use crate::ordering::{Ordering, OrderingField};
use crate::params::requested_page_size;
use crate::resolver::{FixedWindow, PageWindow, ResolvedPage, resolve_page};
use crate::response::{CursorPaginatedResponse, PaginationSchema, SchemaParameter, link_schema};
use crate::source::OrderedSource;
use drfexts_conf::PaginationSettings;
use drfexts_exception::Result;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;

/// Cursor based pagination
///
/// Provides stable pagination over large or frequently changing collections.
/// Clients only ever see opaque `next`/`previous` links; no total count is
/// computed.
///
/// Example URLs:
/// - `http://api.example.org/articles/`
/// - `http://api.example.org/articles/?cursor=cD0yMDI0LTAxLTE2`
///
/// # Examples
///
/// ```
/// use drfexts_pagination::{CursorPagination, MemorySource, RequestContext};
/// use serde_json::json;
///
/// let source = MemorySource::new((1..=25).map(|id| json!({"id": id})).collect::<Vec<_>>());
/// let paginator = CursorPagination::new().ordering_spec("id").unwrap();
///
/// let ctx = RequestContext::parse("/articles/").unwrap();
/// let response = paginator.paginate(&source, &ctx).unwrap();
///
/// assert_eq!(response.list.len(), 10);
/// assert!(response.previous.is_none());
/// assert!(response.next.unwrap().starts_with("/articles/?cursor="));
/// ```
#[derive(Clone)]
pub struct CursorPagination {
	/// Default page size
	pub page_size: usize,
	/// Maximum allowed page size
	pub max_page_size: Option<usize>,
	/// Query parameter name for page size (optional)
	pub page_size_query_param: Option<String>,
	/// Query parameter name for the cursor
	pub cursor_query_param: String,
	/// Ordering used when the request does not choose one
	pub ordering: Ordering,
	/// Query parameter through which clients may choose an ordering
	pub ordering_query_param: Option<String>,
	/// Fields clients may order by
	pub ordering_fields: Vec<String>,
	/// Unique field appended to every ordering
	pub tie_breaker: Option<String>,
	/// Maximum offset a cursor may carry
	pub offset_cutoff: usize,
	/// Render links with scheme and host
	pub absolute_links: bool,
	codec: Arc<dyn CursorCodec>,
}

impl fmt::Debug for CursorPagination {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CursorPagination")
			.field("page_size", &self.page_size)
			.field("max_page_size", &self.max_page_size)
			.field("page_size_query_param", &self.page_size_query_param)
			.field("cursor_query_param", &self.cursor_query_param)
			.field("ordering", &self.ordering)
			.field("ordering_query_param", &self.ordering_query_param)
			.field("ordering_fields", &self.ordering_fields)
			.field("tie_breaker", &self.tie_breaker)
			.field("offset_cutoff", &self.offset_cutoff)
			.field("absolute_links", &self.absolute_links)
			.finish_non_exhaustive()
	}
}

impl Default for CursorPagination {
	fn default() -> Self {
		Self {
			page_size: 10,
			max_page_size: Some(500),
			page_size_query_param: Some("page_size".to_string()),
			cursor_query_param: "cursor".to_string(),
			ordering: Ordering::from(OrderingField::desc("created_at")),
			ordering_query_param: None,
			ordering_fields: Vec::new(),
			tie_breaker: None,
			offset_cutoff: 1000,
			absolute_links: false,
			codec: Arc::new(QueryStringCursorCodec::new()),
		}
	}
}

impl CursorPagination {
	/// Creates a new CursorPagination with default settings
	///
	/// # Examples
	///
	/// ```
	/// use drfexts_pagination::CursorPagination;
	///
	/// let paginator = CursorPagination::new();
	/// assert_eq!(paginator.page_size, 10);
	/// assert_eq!(paginator.max_page_size, Some(500));
	/// assert_eq!(paginator.ordering.to_string(), "-created_at");
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a paginator from loaded settings.
	pub fn from_settings(settings: &PaginationSettings) -> Result<Self> {
		Ok(Self {
			page_size: settings.page_size,
			max_page_size: Some(settings.max_page_size),
			page_size_query_param: Some(settings.page_size_query_param.clone()),
			cursor_query_param: settings.cursor_query_param.clone(),
			ordering: Ordering::parse(&settings.ordering)?,
			tie_breaker: settings.tie_breaker.clone(),
			offset_cutoff: settings.offset_cutoff,
			..Self::default()
		})
	}

	pub fn page_size(mut self, size: usize) -> Self {
		self.page_size = size;
		self
	}

	pub fn max_page_size(mut self, size: usize) -> Self {
		self.max_page_size = Some(size);
		self
	}

	pub fn page_size_query_param(mut self, param: impl Into<String>) -> Self {
		self.page_size_query_param = Some(param.into());
		self
	}

	/// Ignore any page size requested by the client.
	pub fn without_page_size_query_param(mut self) -> Self {
		self.page_size_query_param = None;
		self
	}

	pub fn cursor_query_param(mut self, param: impl Into<String>) -> Self {
		self.cursor_query_param = param.into();
		self
	}

	pub fn ordering(mut self, ordering: Ordering) -> Self {
		self.ordering = ordering;
		self
	}

	/// Set the default ordering from a specification such as `-created_at,id`.
	pub fn ordering_spec(self, spec: &str) -> Result<Self> {
		Ok(self.ordering(Ordering::parse(spec)?))
	}

	/// Let clients choose the ordering through `param`, restricted to `fields`.
	///
	/// # Examples
	///
	/// ```
	/// use drfexts_pagination::{CursorPagination, RequestContext};
	///
	/// let paginator = CursorPagination::new()
	///     .ordering_query_param("ordering", ["price", "name"])
	///     .tie_breaker("id");
	///
	/// let ctx = RequestContext::parse("/items/?ordering=-price,secret").unwrap();
	/// assert_eq!(paginator.get_ordering(&ctx).to_string(), "-price,-id");
	/// ```
	pub fn ordering_query_param<I, S>(mut self, param: impl Into<String>, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.ordering_query_param = Some(param.into());
		self.ordering_fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn tie_breaker(mut self, field: impl Into<String>) -> Self {
		self.tie_breaker = Some(field.into());
		self
	}

	pub fn offset_cutoff(mut self, cutoff: usize) -> Self {
		self.offset_cutoff = cutoff;
		self
	}

	pub fn absolute_links(mut self, absolute: bool) -> Self {
		self.absolute_links = absolute;
		self
	}

	/// Replace the token codec, e.g. with a signing one.
	pub fn with_codec(mut self, codec: impl CursorCodec + 'static) -> Self {
		self.codec = Arc::new(codec);
		self
	}

	pub fn codec(&self) -> &dyn CursorCodec {
		self.codec.as_ref()
	}

	/// Page size for this request.
	pub fn get_page_size(&self, ctx: &RequestContext) -> usize {
		requested_page_size(
			ctx,
			self.page_size_query_param.as_deref(),
			self.page_size,
			self.max_page_size,
		)
	}

	/// Ordering for this request, tie-breaker included.
	///
	/// Requested terms naming fields outside the allow-list are dropped; when
	/// none survive the default ordering applies.
	pub fn get_ordering(&self, ctx: &RequestContext) -> Ordering {
		let requested = self
			.ordering_query_param
			.as_deref()
			.and_then(|param| ctx.query_param(param))
			.and_then(|raw| self.requested_ordering(&raw));
		let ordering = requested.unwrap_or_else(|| self.ordering.clone());
		match &self.tie_breaker {
			Some(field) => ordering.with_tie_breaker(field),
			None => ordering,
		}
	}

	fn requested_ordering(&self, raw: &str) -> Option<Ordering> {
		let mut fields: Vec<OrderingField> = Vec::new();
		for term in raw.split(',').filter(|t| !t.trim().is_empty()) {
			let field = match term.parse::<OrderingField>() {
				Ok(field) => field,
				Err(err) => {
					tracing::debug!(error = %err, "ignoring ordering term");
					continue;
				}
			};
			let allowed = self.ordering_fields.iter().any(|f| *f == field.field);
			if allowed && !fields.iter().any(|f| f.field == field.field) {
				fields.push(field);
			}
		}
		Ordering::new(fields).ok()
	}

	/// Cursor carried by this request, or the start cursor.
	pub fn decode_cursor(&self, ctx: &RequestContext) -> Cursor {
		let token = ctx.query_param(&self.cursor_query_param);
		self.codec.decode_or_start(token.as_deref())
	}

	/// Link to the request URL with its cursor replaced by `cursor`.
	pub fn encode_link(&self, ctx: &RequestContext, cursor: &Cursor) -> Result<String> {
		let token = self.codec.encode(cursor)?;
		let url = if token.is_empty() {
			remove_query_param(ctx.url(), &self.cursor_query_param)
		} else {
			replace_query_param(ctx.url(), &self.cursor_query_param, &token)
		};
		Ok(render_link(&url, self.absolute_links))
	}

	/// Resolve the page for this request.
	pub fn paginate_page<S>(&self, source: &S, ctx: &RequestContext) -> Result<CursorPage<S::Item>>
	where
		S: OrderedSource + ?Sized,
	{
		self.paginate_with_window(source, ctx, self.get_page_size(ctx), &FixedWindow)
	}

	/// Resolve the page for this request and wrap it into the response payload.
	pub fn paginate<S>(
		&self,
		source: &S,
		ctx: &RequestContext,
	) -> Result<CursorPaginatedResponse<S::Item>>
	where
		S: OrderedSource + ?Sized,
	{
		Ok(self.paginate_page(source, ctx)?.into_response())
	}

	pub(crate) fn paginate_with_window<S, W>(
		&self,
		source: &S,
		ctx: &RequestContext,
		page_size: usize,
		window: &W,
	) -> Result<CursorPage<S::Item>>
	where
		S: OrderedSource + ?Sized,
		W: PageWindow,
	{
		let cursor = self.decode_cursor(ctx);
		let ordering = self.get_ordering(ctx);
		let page = resolve_page(source, &cursor, &ordering, page_size, self.offset_cutoff, window)?;
		tracing::trace!(
			requested_at = %ctx.timestamp(),
			path = %ctx.full_path(),
			rows = page.items().len(),
			"resolved cursor page"
		);

		let next = page
			.next_cursor()
			.map(|cursor| self.encode_link(ctx, &cursor))
			.transpose()?;
		let previous = page
			.previous_cursor()
			.map(|cursor| self.encode_link(ctx, &cursor))
			.transpose()?;

		Ok(CursorPage {
			page,
			ordering,
			page_size,
			next,
			previous,
		})
	}
}

impl PaginationSchema for CursorPagination {
	fn get_schema_parameters(&self) -> Vec<SchemaParameter> {
		let mut params = vec![SchemaParameter::query(
			&self.cursor_query_param,
			"The pagination cursor value.",
			"string",
		)];
		if let Some(ref param) = self.page_size_query_param {
			params.push(SchemaParameter::query(
				param,
				"Number of results to return per page.",
				"integer",
			));
		}
		if let Some(ref param) = self.ordering_query_param {
			params.push(SchemaParameter::query(
				param,
				"Which field to use when ordering the results.",
				"string",
			));
		}
		params
	}

	fn get_paginated_response_schema(&self, schema: Value) -> Value {
		let example = format!(
			"http://api.example.org/accounts/?{}=cD00ODY",
			self.cursor_query_param
		);
		json!({
			"type": "object",
			"required": ["list"],
			"properties": {
				"next": link_schema(&example),
				"previous": link_schema(&example),
				"list": schema,
			},
		})
	}
}

/// A resolved cursor page together with its rendered links.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorPage<T> {
	page: ResolvedPage<T>,
	ordering: Ordering,
	page_size: usize,
	next: Option<String>,
	previous: Option<String>,
}

impl<T> CursorPage<T> {
	pub fn items(&self) -> &[T] {
		self.page.items()
	}

	pub fn resolved(&self) -> &ResolvedPage<T> {
		&self.page
	}

	/// Ordering the page was resolved under.
	pub fn ordering(&self) -> &Ordering {
		&self.ordering
	}

	pub fn page_size(&self) -> usize {
		self.page_size
	}

	pub fn next_link(&self) -> Option<&str> {
		self.next.as_deref()
	}

	pub fn previous_link(&self) -> Option<&str> {
		self.previous.as_deref()
	}

	pub fn into_response(self) -> CursorPaginatedResponse<T> {
		CursorPaginatedResponse {
			previous: self.previous,
			next: self.next,
			list: self.page.into_items(),
		}
	}
}
