//! Response payloads and schema descriptions.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Payload of the cursor paginators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CursorPaginatedResponse<T> {
	pub previous: Option<String>,
	pub next: Option<String>,
	pub list: Vec<T>,
}

/// Payload of [`WithoutCountPagination`](crate::WithoutCountPagination).
///
/// `count` is always `0`; the total is never computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithoutCountResponse<T> {
	pub count: usize,
	pub previous: Option<String>,
	pub next: Option<String>,
	pub results: Vec<T>,
}

/// Payload of [`PageNumberPagination`](crate::PageNumberPagination).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageNumberResponse<T> {
	pub total: usize,
	pub page_size: usize,
	pub current_page: usize,
	pub results: Vec<T>,
}

/// Schema parameter for OpenAPI/documentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaParameter {
	pub name: String,
	pub required: bool,
	pub location: String,
	pub description: String,
	pub schema_type: String,
}

impl SchemaParameter {
	pub(crate) fn query(name: &str, description: &str, schema_type: &str) -> Self {
		Self {
			name: name.to_string(),
			required: false,
			location: "query".to_string(),
			description: description.to_string(),
			schema_type: schema_type.to_string(),
		}
	}
}

/// Documentation hooks every paginator provides.
pub trait PaginationSchema {
	/// Query parameters the paginator reads.
	fn get_schema_parameters(&self) -> Vec<SchemaParameter>;

	/// JSON schema of the paginated payload wrapping items described by `schema`.
	fn get_paginated_response_schema(&self, schema: Value) -> Value;
}

pub(crate) fn link_schema(example: &str) -> Value {
	json!({
		"type": "string",
		"nullable": true,
		"format": "uri",
		"example": example,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_cursor_payload_shape() {
		// Arrange
		let response = CursorPaginatedResponse {
			previous: None,
			next: Some("/items/?cursor=bz0y".to_string()),
			list: vec![1, 2],
		};

		// Act
		let value = serde_json::to_value(&response).unwrap();

		// Assert
		assert_eq!(
			value,
			json!({"previous": null, "next": "/items/?cursor=bz0y", "list": [1, 2]})
		);
	}

	#[rstest]
	fn test_without_count_payload_shape() {
		// Arrange
		let response = WithoutCountResponse {
			count: 0,
			previous: None,
			next: None,
			results: vec!["a"],
		};

		// Act
		let value = serde_json::to_value(&response).unwrap();

		// Assert
		assert_eq!(
			value,
			json!({"count": 0, "previous": null, "next": null, "results": ["a"]})
		);
	}

	#[rstest]
	fn test_page_number_payload_shape() {
		// Arrange
		let response = PageNumberResponse {
			total: 42,
			page_size: 10,
			current_page: 3,
			results: Vec::<u8>::new(),
		};

		// Act
		let value = serde_json::to_value(&response).unwrap();

		// Assert
		assert_eq!(
			value,
			json!({"total": 42, "page_size": 10, "current_page": 3, "results": []})
		);
	}
}
