//! Error types shared by every drfexts crate.
//!
//! # Examples
//!
//! ```
//! use drfexts::exception::Error;
//!
//! assert_eq!(Error::InvalidPage("x".to_string()).status_code(), 404);
//! ```

pub use drfexts_exception::*;
