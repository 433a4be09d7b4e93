//! Data source abstractions the paginators read from.
//!
//! The host application owns the data store; paginators only need the two
//! narrow capabilities below. [`MemorySource`] implements all of them for
//! in-memory collections.

use crate::ordering::Ordering;
use crate::value::{Position, Positioned};
use drfexts_exception::Result;

/// One bounded read against an ordered collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorQuery {
	/// Order to apply (already reversed for backward scans)
	pub ordering: Ordering,
	/// Only items strictly after this position under `ordering`
	pub after: Option<Position>,
	/// Items to skip after filtering
	pub offset: usize,
	/// Maximum number of items to return
	pub limit: usize,
}

/// A collection that can be read in a given order starting after a position.
///
/// Implementations translate a [`CursorQuery`] into their own query
/// language, e.g. `ORDER BY a, b` plus `WHERE (a > $1) OR (a = $1 AND b > $2)`
/// with `OFFSET`/`LIMIT`.
pub trait OrderedSource {
	type Item: Positioned;

	fn fetch(&self, query: &CursorQuery) -> Result<Vec<Self::Item>>;
}

/// A collection that can be sliced by offset in its natural order.
pub trait SliceSource {
	type Item;

	fn fetch_slice(&self, offset: usize, limit: usize) -> Result<Vec<Self::Item>>;
}

/// A sliceable collection that can also report its size.
pub trait CountedSource: SliceSource {
	fn count(&self) -> Result<usize>;
}

impl<T: Clone> SliceSource for [T] {
	type Item = T;

	fn fetch_slice(&self, offset: usize, limit: usize) -> Result<Vec<T>> {
		Ok(self.iter().skip(offset).take(limit).cloned().collect())
	}
}

impl<T: Clone> CountedSource for [T] {
	fn count(&self) -> Result<usize> {
		Ok(self.len())
	}
}

impl<T: Clone> SliceSource for Vec<T> {
	type Item = T;

	fn fetch_slice(&self, offset: usize, limit: usize) -> Result<Vec<T>> {
		self.as_slice().fetch_slice(offset, limit)
	}
}

impl<T: Clone> CountedSource for Vec<T> {
	fn count(&self) -> Result<usize> {
		Ok(self.len())
	}
}

/// In-memory collection implementing every source trait.
///
/// Sorting is stable, so items with identical positions keep their
/// insertion order.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::{CursorQuery, MemorySource, OrderedSource, Ordering};
/// use serde_json::json;
///
/// let source = MemorySource::new(vec![json!({"id": 2}), json!({"id": 1}), json!({"id": 3})]);
/// let rows = source
///     .fetch(&CursorQuery {
///         ordering: Ordering::parse("-id").unwrap(),
///         after: None,
///         offset: 1,
///         limit: 5,
///     })
///     .unwrap();
/// assert_eq!(rows, vec![json!({"id": 2}), json!({"id": 1})]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySource<T> {
	items: Vec<T>,
}

impl<T> MemorySource<T> {
	pub fn new(items: Vec<T>) -> Self {
		Self { items }
	}

	pub fn items(&self) -> &[T] {
		&self.items
	}

	pub fn into_inner(self) -> Vec<T> {
		self.items
	}
}

impl<T> From<Vec<T>> for MemorySource<T> {
	fn from(items: Vec<T>) -> Self {
		Self::new(items)
	}
}

impl<T: Positioned + Clone> OrderedSource for MemorySource<T> {
	type Item = T;

	fn fetch(&self, query: &CursorQuery) -> Result<Vec<T>> {
		let mut rows: Vec<&T> = self
			.items
			.iter()
			.filter(|item| match &query.after {
				Some(position) => query.ordering.is_after(*item, position),
				None => true,
			})
			.collect();
		rows.sort_by(|a, b| query.ordering.compare(*a, *b));
		Ok(rows
			.into_iter()
			.skip(query.offset)
			.take(query.limit)
			.cloned()
			.collect())
	}
}

impl<T: Clone> SliceSource for MemorySource<T> {
	type Item = T;

	fn fetch_slice(&self, offset: usize, limit: usize) -> Result<Vec<T>> {
		self.items.fetch_slice(offset, limit)
	}
}

impl<T: Clone> CountedSource for MemorySource<T> {
	fn count(&self) -> Result<usize> {
		Ok(self.items.len())
	}
}
