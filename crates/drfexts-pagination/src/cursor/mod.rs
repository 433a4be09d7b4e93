//! Pagination cursors and their token encoding.

mod codec;

pub use codec::{CursorCodec, QueryStringCursorCodec};

use crate::value::Position;

/// A pagination position: an optional anchor item position, an offset past
/// that anchor and the scan direction.
///
/// Cursors are immutable; pagination derives new cursors for the next and
/// previous links instead of modifying the current one.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::Cursor;
///
/// let start = Cursor::start();
/// assert_eq!(start.offset(), 0);
/// assert!(!start.reverse());
/// assert!(start.position().is_none());
/// assert!(start.is_start());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cursor {
	offset: usize,
	reverse: bool,
	position: Option<Position>,
}

impl Cursor {
	pub fn new(offset: usize, reverse: bool, position: Option<Position>) -> Self {
		Self {
			offset,
			reverse,
			position,
		}
	}

	/// The canonical first-page cursor.
	pub fn start() -> Self {
		Self::default()
	}

	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn reverse(&self) -> bool {
		self.reverse
	}

	pub fn position(&self) -> Option<&Position> {
		self.position.as_ref()
	}

	pub fn is_start(&self) -> bool {
		*self == Self::start()
	}

	/// A copy of this cursor with the offset limited to `cutoff`.
	pub fn clamped(&self, cutoff: usize) -> Self {
		if self.offset <= cutoff {
			return self.clone();
		}
		tracing::debug!(
			offset = self.offset,
			cutoff,
			"cursor offset exceeds cutoff, clamping"
		);
		Self {
			offset: cutoff,
			reverse: self.reverse,
			position: self.position.clone(),
		}
	}
}
