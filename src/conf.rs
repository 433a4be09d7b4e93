//! Pagination settings and their layered builder.
//!
//! # Examples
//!
//! ```rust,no_run
//! # #[cfg(feature = "conf")]
//! # fn main() -> Result<(), drfexts::conf::SettingsError> {
//! use drfexts::conf::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new()
//!     .toml_file("drfexts.toml")
//!     .with_env()
//!     .build()?;
//! # let _ = settings;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "conf"))]
//! # fn main() {}
//! ```

#[cfg(feature = "conf")]
pub use drfexts_conf::*;
