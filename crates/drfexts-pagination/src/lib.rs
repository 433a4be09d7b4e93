//! # drfexts pagination
//!
//! Pagination for REST list endpoints, in the style of Django REST
//! Framework's paginators.
//!
//! ## Pagination Styles
//!
//! - **CursorPagination**: opaque position tokens over an ordered collection,
//!   stable under inserts and never counting rows
//! - **LotPagination**: cursor pagination where a page holds whole groups of
//!   rows sharing the primary ordering value
//! - **WithoutCountPagination**: page numbers without a count query
//! - **PageNumberPagination**: classic counted page numbers
//!
//! Paginators read from the host's data store through [`OrderedSource`]
//! (cursor styles) or [`SliceSource`]/[`CountedSource`] (page number styles)
//! and take the request as an explicit [`RequestContext`].
//!
//! ## Example
//!
//! ```
//! use drfexts_pagination::{CursorPagination, MemorySource, RequestContext};
//! use serde_json::json;
//!
//! let articles = MemorySource::new(
//!     (1..=25)
//!         .map(|n| json!({"id": n, "created_at": format!("2024-01-{:02}", n)}))
//!         .collect::<Vec<_>>(),
//! );
//! let paginator = CursorPagination::new().tie_breaker("id");
//!
//! let first = paginator
//!     .paginate(&articles, &RequestContext::parse("/articles/").unwrap())
//!     .unwrap();
//! assert_eq!(first.list[0]["id"], 25);
//!
//! let next = RequestContext::parse(first.next.as_deref().unwrap()).unwrap();
//! let second = paginator.paginate(&articles, &next).unwrap();
//! assert_eq!(second.list[0]["id"], 15);
//! assert!(second.previous.is_some());
//! ```

mod context;
mod cursor;
mod cursor_pagination;
pub mod links;
mod lot;
mod ordering;
mod page_number;
mod params;
mod resolver;
mod response;
mod source;
mod value;
mod without_count;

pub use context::RequestContext;
pub use cursor::{Cursor, CursorCodec, QueryStringCursorCodec};
pub use cursor_pagination::{CursorPage, CursorPagination};
pub use lot::{LotPagination, LotWindow};
pub use ordering::{Direction, Ordering, OrderingField};
pub use page_number::{Page, PageNumberPagination};
pub use params::ErrorMessages;
pub use resolver::{FixedWindow, PageWindow, ResolvedPage, resolve_page};
pub use response::{
	CursorPaginatedResponse, PageNumberResponse, PaginationSchema, SchemaParameter,
	WithoutCountResponse,
};
pub use source::{CountedSource, CursorQuery, MemorySource, OrderedSource, SliceSource};
pub use value::{Position, Positioned, SortValue};
pub use without_count::{WithoutCountPage, WithoutCountPagination, WithoutCountPaginator};

pub use drfexts_exception::{Error, Result};
