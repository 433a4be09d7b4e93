//! Integration tests for SettingsBuilder source layering.
//!
//! These tests validate the priority order defaults < TOML files <
//! environment < explicit overrides, and the error reporting of each source.

use drfexts_conf::{PaginationSettings, SettingsBuilder, SettingsError};
use rstest::*;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

/// Fixture providing temporary directory for settings files
#[fixture]
fn temp_dir() -> TempDir {
	TempDir::new().expect("Failed to create temporary directory")
}

/// Removes every variable the tests below may set.
fn clear_env(prefix: &str) {
	for key in [
		"PAGE_SIZE",
		"MAX_PAGE_SIZE",
		"OFFSET_CUTOFF",
		"LOT_SIZE",
		"ORDERING",
		"TIE_BREAKER",
	] {
		// SAFETY: tests touching the environment run under #[serial]
		unsafe { env::remove_var(format!("{}{}", prefix, key)) };
	}
}

#[rstest]
fn test_defaults_without_sources() {
	// Act
	let settings = SettingsBuilder::new().build().unwrap();

	// Assert
	assert_eq!(settings, PaginationSettings::default());
}

#[rstest]
fn test_toml_top_level_keys(temp_dir: TempDir) {
	// Arrange
	let path = temp_dir.path().join("pagination.toml");
	fs::write(
		&path,
		r#"
page_size = 50
max_page_size = 200
ordering = "-published_at"
tie_breaker = "id"
"#,
	)
	.unwrap();

	// Act
	let settings = SettingsBuilder::new().toml_file(&path).build().unwrap();

	// Assert
	assert_eq!(settings.page_size, 50);
	assert_eq!(settings.max_page_size, 200);
	assert_eq!(settings.ordering, "-published_at");
	assert_eq!(settings.tie_breaker.as_deref(), Some("id"));
	assert_eq!(settings.offset_cutoff, 1000);
}

#[rstest]
fn test_toml_pagination_section_and_file_priority(temp_dir: TempDir) {
	// Arrange
	let base = temp_dir.path().join("base.toml");
	fs::write(
		&base,
		r#"
[pagination]
page_size = 20
lot_size = 10
"#,
	)
	.unwrap();
	let local = temp_dir.path().join("local.toml");
	fs::write(&local, "page_size = 30\n").unwrap();

	// Act
	let settings = SettingsBuilder::new()
		.toml_file(&base)
		.toml_file(&local)
		.build()
		.unwrap();

	// Assert
	assert_eq!(settings.page_size, 30);
	assert_eq!(settings.lot_size, 10);
}

#[rstest]
fn test_missing_toml_file_is_io_error(temp_dir: TempDir) {
	// Arrange
	let path = temp_dir.path().join("absent.toml");

	// Act
	let result = SettingsBuilder::new().toml_file(&path).build();

	// Assert
	assert!(matches!(result, Err(SettingsError::Io { .. })));
}

#[rstest]
fn test_unknown_toml_key_is_parse_error(temp_dir: TempDir) {
	// Arrange
	let path = temp_dir.path().join("typo.toml");
	fs::write(&path, "page_sise = 5\n").unwrap();

	// Act
	let result = SettingsBuilder::new().toml_file(&path).build();

	// Assert
	assert!(matches!(result, Err(SettingsError::Parse { .. })));
}

#[rstest]
#[serial(settings_env)]
fn test_env_overrides_toml(temp_dir: TempDir) {
	// Arrange
	let prefix = "DRFEXTS_TEST_A_";
	clear_env(prefix);
	let path = temp_dir.path().join("pagination.toml");
	fs::write(&path, "page_size = 20\nordering = \"name\"\n").unwrap();
	// SAFETY: serialized with the other environment tests
	unsafe {
		env::set_var("DRFEXTS_TEST_A_PAGE_SIZE", "40");
		env::set_var("DRFEXTS_TEST_A_OFFSET_CUTOFF", "250");
	}

	// Act
	let settings = SettingsBuilder::new()
		.toml_file(&path)
		.env_prefix(prefix)
		.build();
	clear_env(prefix);

	// Assert
	let settings = settings.unwrap();
	assert_eq!(settings.page_size, 40);
	assert_eq!(settings.offset_cutoff, 250);
	assert_eq!(settings.ordering, "name");
}

#[rstest]
#[serial(settings_env)]
fn test_explicit_override_beats_env() {
	// Arrange
	let prefix = "DRFEXTS_TEST_B_";
	clear_env(prefix);
	// SAFETY: serialized with the other environment tests
	unsafe { env::set_var("DRFEXTS_TEST_B_LOT_SIZE", "5") };

	// Act
	let settings = SettingsBuilder::new().env_prefix(prefix).lot_size(8).build();
	clear_env(prefix);

	// Assert
	assert_eq!(settings.unwrap().lot_size, 8);
}

#[rstest]
#[serial(settings_env)]
fn test_non_numeric_env_value_is_rejected() {
	// Arrange
	let prefix = "DRFEXTS_TEST_C_";
	clear_env(prefix);
	// SAFETY: serialized with the other environment tests
	unsafe { env::set_var("DRFEXTS_TEST_C_PAGE_SIZE", "ten") };

	// Act
	let result = SettingsBuilder::new().env_prefix(prefix).build();
	clear_env(prefix);

	// Assert
	match result {
		Err(SettingsError::InvalidValue { key, value }) => {
			assert_eq!(key, "DRFEXTS_TEST_C_PAGE_SIZE");
			assert_eq!(value, "ten");
		}
		other => panic!("Expected InvalidValue error, got {:?}", other),
	}
}

#[rstest]
fn test_validation_runs_after_all_sources() {
	// Act
	let result = SettingsBuilder::new().page_size(600).build();

	// Assert
	assert!(matches!(result, Err(SettingsError::Validation(_))));
}

#[rstest]
fn test_settings_error_converts_to_configuration_error() {
	// Arrange
	let err = SettingsBuilder::new().lot_size(0).build().unwrap_err();

	// Act
	let converted: drfexts_exception::Error = err.into();

	// Assert
	assert!(matches!(
		converted,
		drfexts_exception::Error::Configuration(_)
	));
}
