//! Cursor token encoding strategies

use super::Cursor;
use crate::value::Position;
use base64::{Engine as _, engine::general_purpose};
use drfexts_exception::{Error, Result};
use url::form_urlencoded;

/// Trait for encoding and decoding pagination cursors
///
/// Custom implementations can provide different encoding strategies,
/// such as signed or encrypted tokens.
pub trait CursorCodec: Send + Sync {
	/// Encode a cursor into a URL-safe token
	fn encode(&self, cursor: &Cursor) -> Result<String>;

	/// Decode a token back into a cursor
	fn decode(&self, token: &str) -> Result<Cursor>;

	/// Decode a client supplied token, falling back to the start cursor when
	/// the token is missing, blank or malformed.
	fn decode_or_start(&self, token: Option<&str>) -> Cursor {
		match token.map(str::trim) {
			None | Some("") => Cursor::start(),
			Some(token) => self.decode(token).unwrap_or_else(|err| {
				tracing::debug!(error = %err, "discarding malformed cursor token");
				Cursor::start()
			}),
		}
	}
}

/// Encodes cursors as `base64url(o=<offset>&r=1&p=<position json>)`.
///
/// Zero offsets, forward direction and missing positions are omitted, so
/// the start cursor encodes to the empty string.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::{Cursor, CursorCodec, QueryStringCursorCodec, Position, SortValue};
///
/// let codec = QueryStringCursorCodec::new();
/// let cursor = Cursor::new(2, true, Some(Position::new(vec![SortValue::Int(42)])));
///
/// let token = codec.encode(&cursor).unwrap();
/// assert_eq!(codec.decode(&token).unwrap(), cursor);
/// assert_eq!(codec.encode(&Cursor::start()).unwrap(), "");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStringCursorCodec;

impl QueryStringCursorCodec {
	pub fn new() -> Self {
		Self
	}
}

impl CursorCodec for QueryStringCursorCodec {
	fn encode(&self, cursor: &Cursor) -> Result<String> {
		let mut query = form_urlencoded::Serializer::new(String::new());
		if cursor.offset() != 0 {
			query.append_pair("o", &cursor.offset().to_string());
		}
		if cursor.reverse() {
			query.append_pair("r", "1");
		}
		if let Some(position) = cursor.position() {
			query.append_pair("p", &serde_json::to_string(position)?);
		}
		Ok(general_purpose::URL_SAFE_NO_PAD.encode(query.finish()))
	}

	fn decode(&self, token: &str) -> Result<Cursor> {
		let decoded = general_purpose::URL_SAFE_NO_PAD
			.decode(token.trim().trim_end_matches('='))
			.map_err(|_| Error::InvalidCursor("Invalid cursor".to_string()))?;
		let querystring = String::from_utf8(decoded)
			.map_err(|_| Error::InvalidCursor("Invalid cursor encoding".to_string()))?;

		let mut offset = None;
		let mut reverse = None;
		let mut position = None;
		for (key, value) in form_urlencoded::parse(querystring.as_bytes()) {
			// First occurrence wins
			match key.as_ref() {
				"o" if offset.is_none() => offset = Some(value.into_owned()),
				"r" if reverse.is_none() => reverse = Some(value.into_owned()),
				"p" if position.is_none() => position = Some(value.into_owned()),
				_ => {}
			}
		}

		let offset = match offset {
			Some(raw) => raw
				.parse::<usize>()
				.map_err(|_| Error::InvalidCursor("Invalid cursor offset".to_string()))?,
			None => 0,
		};
		let reverse = match reverse {
			Some(raw) => {
				raw.parse::<i64>()
					.map_err(|_| Error::InvalidCursor("Invalid cursor direction".to_string()))?
					!= 0
			}
			None => false,
		};
		let position = match position.filter(|raw| !raw.is_empty()) {
			Some(raw) => Some(
				serde_json::from_str::<Position>(&raw)
					.map_err(|_| Error::InvalidCursor("Invalid cursor position".to_string()))?,
			),
			None => None,
		};

		Ok(Cursor::new(offset, reverse, position))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::value::SortValue;
	use proptest::prelude::*;
	use rstest::rstest;

	fn raw_token(querystring: &str) -> String {
		general_purpose::URL_SAFE_NO_PAD.encode(querystring)
	}

	#[rstest]
	fn test_empty_token_decodes_to_start() {
		// Arrange
		let codec = QueryStringCursorCodec::new();

		// Act
		let cursor = codec.decode("").unwrap();

		// Assert
		assert_eq!(cursor, Cursor::start());
	}

	#[rstest]
	#[case(Cursor::start())]
	#[case(Cursor::new(7, false, None))]
	#[case(Cursor::new(0, true, None))]
	#[case(Cursor::new(0, false, Some(Position::new(vec![SortValue::Text("2024-01-05T00:00:00.000000Z".into())]))))]
	#[case(Cursor::new(3, true, Some(Position::new(vec![SortValue::Text("a&b=c?d".into()), SortValue::Int(-4)]))))]
	#[case(Cursor::new(1, false, Some(Position::new(vec![SortValue::Null, SortValue::Bool(true), SortValue::Float(0.25)]))))]
	#[case(Cursor::new(0, false, Some(Position::new(vec![SortValue::Float(f64::INFINITY), SortValue::Int(4)]))))]
	#[case(Cursor::new(2, true, Some(Position::new(vec![SortValue::Float(f64::NEG_INFINITY), SortValue::Float(f64::NAN)]))))]
	#[case(Cursor::new(0, false, Some(Position::new(vec![SortValue::Float(99812590784.84523)]))))]
	fn test_round_trip(#[case] cursor: Cursor) {
		// Arrange
		let codec = QueryStringCursorCodec::new();

		// Act
		let token = codec.encode(&cursor).unwrap();
		let decoded = codec.decode(&token).unwrap();

		// Assert
		assert_eq!(decoded, cursor);
		assert!(
			token
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
		);
	}

	#[rstest]
	fn test_encoding_is_deterministic() {
		// Arrange
		let codec = QueryStringCursorCodec::new();
		let cursor = Cursor::new(4, true, Some(Position::new(vec![SortValue::Int(9)])));

		// Act & Assert
		assert_eq!(codec.encode(&cursor).unwrap(), codec.encode(&cursor).unwrap());
		assert_eq!(
			codec.encode(&cursor).unwrap(),
			raw_token("o=4&r=1&p=%5B9%5D")
		);
	}

	#[rstest]
	#[case::not_base64("not-valid-base64!!!".to_string())]
	#[case::negative_offset(raw_token("o=-1"))]
	#[case::text_offset(raw_token("o=ten"))]
	#[case::bad_direction(raw_token("r=yes"))]
	#[case::bad_position(raw_token("p=%5B1"))]
	fn test_malformed_tokens_are_rejected(#[case] token: String) {
		// Arrange
		let codec = QueryStringCursorCodec::new();

		// Act
		let strict = codec.decode(&token);
		let lenient = codec.decode_or_start(Some(&token));

		// Assert
		assert!(matches!(strict, Err(Error::InvalidCursor(_))));
		assert_eq!(lenient, Cursor::start());
	}

	#[rstest]
	fn test_invalid_utf8_is_rejected() {
		// Arrange
		let codec = QueryStringCursorCodec::new();
		let token = general_purpose::URL_SAFE_NO_PAD.encode([0xff, 0xfe, 0xfd]);

		// Act
		let result = codec.decode(&token);

		// Assert
		assert!(matches!(result, Err(Error::InvalidCursor(msg)) if msg == "Invalid cursor encoding"));
	}

	#[rstest]
	fn test_decode_is_lenient_about_shape() {
		// Arrange
		let codec = QueryStringCursorCodec::new();
		let padded = general_purpose::URL_SAFE.encode("o=2&x=ignored&o=9&r=5&p=");

		// Act
		let cursor = codec.decode(&padded).unwrap();

		// Assert
		assert_eq!(cursor, Cursor::new(2, true, None));
	}

	#[rstest]
	fn test_non_finite_position_does_not_decode_as_null() {
		// Arrange
		let codec = QueryStringCursorCodec::new();
		let cursor = Cursor::new(0, false, Some(Position::new(vec![SortValue::Float(f64::INFINITY), SortValue::Int(4)])));

		// Act
		let decoded = codec.decode(&codec.encode(&cursor).unwrap()).unwrap();

		// Assert
		let values = decoded.position().unwrap().values();
		assert!(matches!(values[0], SortValue::Float(f) if f == f64::INFINITY));
		assert!(!values[0].is_null());
	}

	#[rstest]
	fn test_finite_floats_keep_every_bit() {
		// Arrange
		let codec = QueryStringCursorCodec::new();
		let float = 99812590784.84523_f64;
		let cursor = Cursor::new(0, false, Some(Position::new(vec![SortValue::Float(float)])));

		// Act
		let decoded = codec.decode(&codec.encode(&cursor).unwrap()).unwrap();

		// Assert
		match decoded.position().unwrap().values() {
			[SortValue::Float(back)] => assert_eq!(back.to_bits(), float.to_bits()),
			other => panic!("unexpected values {:?}", other),
		}
	}

	#[rstest]
	fn test_decode_or_start_without_token() {
		// Arrange
		let codec = QueryStringCursorCodec::new();

		// Act & Assert
		assert_eq!(codec.decode_or_start(None), Cursor::start());
		assert_eq!(codec.decode_or_start(Some("   ")), Cursor::start());
	}

	fn sort_value_strategy() -> impl Strategy<Value = SortValue> {
		prop_oneof![
			Just(SortValue::Null),
			any::<bool>().prop_map(SortValue::Bool),
			any::<i64>().prop_map(SortValue::Int),
			any::<f64>().prop_map(SortValue::Float),
			".*".prop_map(SortValue::Text),
		]
	}

	proptest! {
		#[test]
		fn prop_decode_inverts_encode(
			offset in 0usize..100_000,
			reverse in any::<bool>(),
			position in proptest::option::of(proptest::collection::vec(sort_value_strategy(), 1..4)),
		) {
			let codec = QueryStringCursorCodec::new();
			let cursor = Cursor::new(offset, reverse, position.map(Position::new));

			let token = codec.encode(&cursor).unwrap();

			prop_assert_eq!(codec.decode(&token).unwrap(), cursor);
		}
	}
}
