//! Cursor, lot and page number paginators.
//!
//! See [`drfexts_pagination`] for the pagination styles and their request
//! level API.

#[cfg(feature = "pagination")]
pub use drfexts_pagination::*;
