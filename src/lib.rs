//! # drfexts
//!
//! Pagination extensions for REST APIs, inspired by the Django REST Framework
//! extension toolkits.
//!
//! drfexts pages through large or frequently changing collections without
//! counting them. Clients receive opaque cursor links that stay stable when
//! rows are inserted; page number styles are available where a UI needs them.
//!
//! ## Feature Flags
//!
//! - `full` (default) - everything below
//! - `pagination` - paginators, cursor codec, ordering and data source traits
//! - `conf` - `PaginationSettings` and the layered `SettingsBuilder`
//!
//! ## Quick Example
//!
//! ```
//! # #[cfg(feature = "pagination")]
//! # {
//! use drfexts::{CursorPagination, MemorySource, RequestContext};
//! use serde_json::json;
//!
//! let rows = MemorySource::new(
//!     (1..=3)
//!         .map(|id| json!({"id": id, "created_at": format!("2024-05-0{}", id)}))
//!         .collect::<Vec<_>>(),
//! );
//! let paginator = CursorPagination::new().page_size(2).tie_breaker("id");
//!
//! let ctx = RequestContext::parse("/api/events/").unwrap();
//! let page = paginator.paginate(&rows, &ctx).unwrap();
//! assert_eq!(page.list.len(), 2);
//! assert!(page.next.is_some());
//! # }
//! ```

pub mod conf;
pub mod exception;
pub mod pagination;

pub use drfexts_exception::{Error, Result};

#[cfg(feature = "conf")]
pub use drfexts_conf::{PaginationSettings, SettingsBuilder, SettingsError};

#[cfg(feature = "pagination")]
pub use drfexts_pagination::{
	CountedSource, Cursor, CursorCodec, CursorPaginatedResponse, CursorPagination, LotPagination,
	MemorySource, OrderedSource, Ordering, PageNumberPagination, PageNumberResponse,
	PaginationSchema, Position, Positioned, QueryStringCursorCodec, RequestContext, SliceSource,
	SortValue, WithoutCountPagination, WithoutCountResponse,
};

/// Paginators configured from one set of settings.
#[cfg(feature = "pagination")]
#[derive(Debug, Clone)]
pub struct Paginators {
	pub cursor: CursorPagination,
	pub lot: LotPagination,
	pub without_count: WithoutCountPagination,
	pub page_number: PageNumberPagination,
}

#[cfg(feature = "pagination")]
impl Paginators {
	/// Build every paginator from `settings`.
	///
	/// # Examples
	///
	/// ```
	/// use drfexts::{Paginators, SettingsBuilder};
	///
	/// let settings = SettingsBuilder::new().page_size(20).build().unwrap();
	/// let paginators = Paginators::from_settings(&settings).unwrap();
	/// assert_eq!(paginators.cursor.page_size, 20);
	/// assert_eq!(paginators.page_number.page_size, 20);
	/// ```
	pub fn from_settings(settings: &PaginationSettings) -> Result<Self> {
		Ok(Self {
			cursor: CursorPagination::from_settings(settings)?,
			lot: LotPagination::from_settings(settings)?,
			without_count: WithoutCountPagination::from_settings(settings),
			page_number: PageNumberPagination::from_settings(settings),
		})
	}

	/// Load settings through `builder` and build every paginator from them.
	pub fn from_builder(builder: SettingsBuilder) -> Result<Self> {
		let settings = builder.build()?;
		Self::from_settings(&settings)
	}
}

#[cfg(all(test, feature = "pagination"))]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_from_builder_applies_overrides() {
		// Arrange
		let builder = SettingsBuilder::new()
			.page_size(7)
			.lot_size(3)
			.ordering("-published_at")
			.tie_breaker("uuid");

		// Act
		let paginators = Paginators::from_builder(builder).unwrap();

		// Assert
		assert_eq!(paginators.cursor.page_size, 7);
		assert_eq!(paginators.cursor.ordering.to_string(), "-published_at");
		assert_eq!(paginators.cursor.tie_breaker.as_deref(), Some("uuid"));
		assert_eq!(paginators.lot.lot_size, 3);
		assert_eq!(paginators.without_count.page_size, 7);
		assert_eq!(paginators.page_number.max_page_size, 100_000);
	}

	#[rstest]
	fn test_invalid_settings_become_configuration_errors() {
		// Arrange
		let builder = SettingsBuilder::new().page_size(0);

		// Act
		let result = Paginators::from_builder(builder);

		// Assert
		assert!(matches!(result, Err(Error::Configuration(_))));
	}
}
