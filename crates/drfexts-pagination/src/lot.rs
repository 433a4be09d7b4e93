//! Grouped cursor pagination.
//!
//! Rows sharing a value of the primary ordering field form a lot, and a page
//! holds `page_size` whole lots instead of `page_size` rows. The store is
//! asked for `page_size * lot_size` rows up front, so a lot larger than
//! `lot_size` can still be split across pages.

use crate::context::RequestContext;
use crate::cursor_pagination::{CursorPage, CursorPagination};
use crate::ordering::{Ordering, OrderingField};
use crate::resolver::PageWindow;
use crate::response::{CursorPaginatedResponse, PaginationSchema, SchemaParameter};
use crate::source::OrderedSource;
use crate::value::Positioned;
use drfexts_conf::PaginationSettings;
use drfexts_exception::Result;
use serde_json::Value;

/// Page window holding whole groups of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LotWindow {
	/// Expected rows per group
	pub lot_size: usize,
}

impl LotWindow {
	pub fn new(lot_size: usize) -> Self {
		Self { lot_size }
	}
}

impl PageWindow for LotWindow {
	fn fetch_limit(&self, page_size: usize) -> usize {
		page_size.saturating_mul(self.lot_size.max(1)).saturating_add(1)
	}

	fn page_len<T: Positioned>(
		&self,
		rows: &[T],
		ordering: &Ordering,
		page_size: usize,
		exhausted: bool,
	) -> usize {
		let key = &ordering.primary().field;
		let mut kept = 0;
		let mut groups = 0;
		let mut start = 0;

		while start < rows.len() && groups < page_size {
			let value = rows[start].sort_value(key);
			let mut end = start + 1;
			while end < rows.len() && rows[end].sort_value(key) == value {
				end += 1;
			}

			// A run touching the end of a full fetch may continue past it.
			if end == rows.len() && !exhausted {
				if groups == 0 {
					// Oversized first lot: hand it out in pieces, keeping the
					// last fetched row as look-ahead.
					kept = end - 1;
				}
				break;
			}

			kept = end;
			groups += 1;
			start = end;
		}
		kept
	}
}

/// Cursor pagination over lots of rows.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::{LotPagination, MemorySource, RequestContext};
/// use serde_json::json;
///
/// let rows: Vec<_> = (0..12).map(|i| json!({"lot_no": i / 3, "id": i})).collect();
/// let paginator = LotPagination::new().page_size(2).lot_size(3);
///
/// let ctx = RequestContext::parse("/lots/").unwrap();
/// let response = paginator.paginate(&MemorySource::new(rows), &ctx).unwrap();
///
/// assert_eq!(response.list.len(), 6);
/// assert!(response.next.unwrap().starts_with("http://localhost/lots/?cursor="));
/// ```
#[derive(Debug, Clone)]
pub struct LotPagination {
	/// Expected rows per lot
	pub lot_size: usize,
	/// Cursor configuration; `page_size` counts lots
	pub pagination: CursorPagination,
}

impl Default for LotPagination {
	fn default() -> Self {
		Self {
			lot_size: 25,
			pagination: CursorPagination::new()
				.ordering(Ordering::from(OrderingField::asc("lot_no")))
				.absolute_links(true),
		}
	}
}

impl LotPagination {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a paginator from loaded settings.
	///
	/// The default `lot_no` ordering is kept; the settings ordering applies to
	/// row level pagination.
	pub fn from_settings(settings: &PaginationSettings) -> Result<Self> {
		let pagination = CursorPagination::from_settings(settings)?
			.ordering(Ordering::from(OrderingField::asc("lot_no")))
			.absolute_links(true);
		Ok(Self {
			lot_size: settings.lot_size,
			pagination,
		})
	}

	pub fn lot_size(mut self, size: usize) -> Self {
		self.lot_size = size;
		self
	}

	/// Number of lots per page.
	pub fn page_size(mut self, size: usize) -> Self {
		self.pagination.page_size = size;
		self
	}

	pub fn ordering(mut self, ordering: Ordering) -> Self {
		self.pagination.ordering = ordering;
		self
	}

	pub fn with_pagination(mut self, pagination: CursorPagination) -> Self {
		self.pagination = pagination;
		self
	}

	pub fn paginate_page<S>(&self, source: &S, ctx: &RequestContext) -> Result<CursorPage<S::Item>>
	where
		S: OrderedSource + ?Sized,
	{
		let window = LotWindow::new(self.lot_size);
		let page_size = self.pagination.get_page_size(ctx);
		self.pagination
			.paginate_with_window(source, ctx, page_size, &window)
	}

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
}

impl PaginationSchema for LotPagination {
	fn get_schema_parameters(&self) -> Vec<SchemaParameter> {
		self.pagination.get_schema_parameters()
	}

	fn get_paginated_response_schema(&self, schema: Value) -> Value {
		self.pagination.get_paginated_response_schema(schema)
	}
}
