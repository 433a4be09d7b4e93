//! Cursor page resolution.
//!
//! For an overview of the position/offset style used here, see
//! <https://cra.mr/2011/03/08/building-cursors-for-the-disqus-api>.
//!
//! A cursor names an anchor position, an offset past that anchor and a scan
//! direction. Resolving it reads one extra row beyond the page to learn
//! whether a following page exists, so no count query is ever needed. The
//! offset only matters when several items share a position, which cannot
//! happen once the ordering ends in a unique tie-breaker.

use crate::cursor::Cursor;
use crate::ordering::Ordering;
use crate::source::{CursorQuery, OrderedSource};
use crate::value::{Position, Positioned};
use drfexts_exception::Result;

/// Decides how many fetched rows form the page.
pub trait PageWindow {
	/// Rows to request from the source, including look-ahead.
	fn fetch_limit(&self, page_size: usize) -> usize;

	/// Number of leading `rows` that belong to the page.
	///
	/// `exhausted` is true when the source returned fewer rows than
	/// requested, i.e. `rows` reaches the end of the collection.
	fn page_len<T: Positioned>(
		&self,
		rows: &[T],
		ordering: &Ordering,
		page_size: usize,
		exhausted: bool,
	) -> usize;
}

/// One page is `page_size` rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWindow;

impl PageWindow for FixedWindow {
	fn fetch_limit(&self, page_size: usize) -> usize {
		page_size.saturating_add(1)
	}

	fn page_len<T: Positioned>(
		&self,
		rows: &[T],
		_ordering: &Ordering,
		page_size: usize,
		_exhausted: bool,
	) -> usize {
		rows.len().min(page_size)
	}
}

/// Result of resolving a cursor against a source.
///
/// Items are in natural ordering order regardless of scan direction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPage<T> {
	items: Vec<T>,
	positions: Vec<Position>,
	cursor: Cursor,
	has_next: bool,
	has_previous: bool,
	next_position: Option<Position>,
	previous_position: Option<Position>,
}

impl<T> ResolvedPage<T> {
	pub fn items(&self) -> &[T] {
		&self.items
	}

	pub fn into_items(self) -> Vec<T> {
		self.items
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	pub fn has_next(&self) -> bool {
		self.has_next
	}

	pub fn has_previous(&self) -> bool {
		self.has_previous
	}

	/// The cursor this page was resolved from, with its offset clamped.
	pub fn cursor(&self) -> &Cursor {
		&self.cursor
	}

	/// Positions of the page items, parallel to [`ResolvedPage::items`].
	pub fn positions(&self) -> &[Position] {
		&self.positions
	}

	/// Cursor addressing the page after this one.
	pub fn next_cursor(&self) -> Option<Cursor> {
		if !self.has_next {
			return None;
		}
		if self.positions.is_empty() {
			return Some(Cursor::new(0, false, self.next_position.clone()));
		}

		// After a reversed offset cursor the following item is not a usable
		// marker, start comparing from the last page item instead.
		let mut compare = if self.cursor.reverse() && self.cursor.offset() != 0 {
			self.positions.last().cloned()
		} else {
			self.next_position.clone()
		};
		let mut offset = 0;
		for position in self.positions.iter().rev() {
			if compare.as_ref() != Some(position) {
				return Some(Cursor::new(offset, false, Some(position.clone())));
			}
			compare = Some(position.clone());
			offset += 1;
		}

		// Every item shares the following item's position.
		let page_len = self.positions.len();
		let cursor = if !self.has_previous {
			Cursor::new(page_len, false, None)
		} else if self.cursor.reverse() {
			Cursor::new(0, false, self.previous_position.clone())
		} else {
			Cursor::new(
				self.cursor.offset() + page_len,
				false,
				self.previous_position.clone(),
			)
		};
		Some(cursor)
	}

	/// Cursor addressing the page before this one.
	pub fn previous_cursor(&self) -> Option<Cursor> {
		if !self.has_previous {
			return None;
		}
		if self.positions.is_empty() {
			return Some(Cursor::new(0, true, self.previous_position.clone()));
		}

		let mut compare = if !self.cursor.reverse() && self.cursor.offset() != 0 {
			self.positions.first().cloned()
		} else {
			self.previous_position.clone()
		};
		let mut offset = 0;
		for position in &self.positions {
			if compare.as_ref() != Some(position) {
				return Some(Cursor::new(offset, true, Some(position.clone())));
			}
			compare = Some(position.clone());
			offset += 1;
		}

		let page_len = self.positions.len();
		let cursor = if !self.has_next {
			Cursor::new(page_len, true, None)
		} else if self.cursor.reverse() {
			Cursor::new(
				self.cursor.offset() + page_len,
				true,
				self.next_position.clone(),
			)
		} else {
			Cursor::new(0, true, self.next_position.clone())
		};
		Some(cursor)
	}
}

/// Resolve `cursor` against `source` under `ordering`.
///
/// An anchor position past the end of the collection is not an error: it
/// yields an empty page without a next page.
pub fn resolve_page<S, W>(
	source: &S,
	cursor: &Cursor,
	ordering: &Ordering,
	page_size: usize,
	offset_cutoff: usize,
	window: &W,
) -> Result<ResolvedPage<S::Item>>
where
	S: OrderedSource + ?Sized,
	W: PageWindow,
{
	let cursor = cursor.clamped(offset_cutoff);
	let effective = if cursor.reverse() {
		ordering.reversed()
	} else {
		ordering.clone()
	};

	let limit = window.fetch_limit(page_size);
	let query = CursorQuery {
		ordering: effective,
		after: cursor.position().cloned(),
		offset: cursor.offset(),
		limit,
	};
	let mut rows = source.fetch(&query)?;
	rows.truncate(limit);

	let exhausted = rows.len() < limit;
	let page_len = window
		.page_len(&rows, &query.ordering, page_size, exhausted)
		.min(rows.len());
	let following_position = rows.get(page_len).map(|row| ordering.position_of(row));
	let has_following = following_position.is_some();
	rows.truncate(page_len);

	if cursor.reverse() {
		rows.reverse();
	}
	let positions = rows.iter().map(|row| ordering.position_of(row)).collect();

	let anchored = cursor.position().is_some() || cursor.offset() > 0;
	let current_position = if anchored {
		cursor.position().cloned()
	} else {
		None
	};
	let (has_next, has_previous, next_position, previous_position) = if cursor.reverse() {
		(anchored, has_following, current_position, following_position)
	} else {
		(has_following, anchored, following_position, current_position)
	};

	tracing::trace!(
		ordering = %ordering,
		offset = cursor.offset(),
		reverse = cursor.reverse(),
		rows = rows.len(),
		has_next,
		has_previous,
		"resolved cursor page"
	);

	Ok(ResolvedPage {
		items: rows,
		positions,
		cursor,
		has_next,
		has_previous,
		next_position,
		previous_position,
	})
}
