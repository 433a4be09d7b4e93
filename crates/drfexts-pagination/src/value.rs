//! Comparable sort-key values and item positions.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering as CmpOrdering;
use std::fmt;

/// A single sort-key value.
///
/// Values form a total order: `Null < Bool < numbers < Text`. Integers and
/// floats compare numerically with each other. Timestamps are stored as
/// fixed-width RFC 3339 text in UTC so that text order is chronological.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::SortValue;
///
/// assert!(SortValue::Null < SortValue::from(false));
/// assert!(SortValue::from(2) < SortValue::from(2.5));
/// assert_eq!(SortValue::from(3), SortValue::from(3.0));
/// assert!(SortValue::from(1_000_000) < SortValue::from("a"));
/// ```
///
/// In JSON, non-finite floats are written as `{"f": "inf"}`, `{"f": "-inf"}`,
/// `{"f": "nan"}` or `{"f": "-nan"}` so that every value survives a round trip.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "WireValue")]
pub enum SortValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
}

impl SortValue {
	fn rank(&self) -> u8 {
		match self {
			SortValue::Null => 0,
			SortValue::Bool(_) => 1,
			SortValue::Int(_) | SortValue::Float(_) => 2,
			SortValue::Text(_) => 3,
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, SortValue::Null)
	}
}

impl Ord for SortValue {
	fn cmp(&self, other: &Self) -> CmpOrdering {
		use SortValue::*;
		match (self, other) {
			(Bool(a), Bool(b)) => a.cmp(b),
			(Int(a), Int(b)) => a.cmp(b),
			(Float(a), Float(b)) => cmp_floats(*a, *b),
			(Int(a), Float(b)) => cmp_int_float(*a, *b),
			(Float(a), Int(b)) => cmp_int_float(*b, *a).reverse(),
			(Text(a), Text(b)) => a.cmp(b),
			_ => self.rank().cmp(&other.rank()),
		}
	}
}

/// Negative NaN sorts below every number, positive NaN above; `-0.0 == 0.0`.
fn cmp_floats(a: f64, b: f64) -> CmpOrdering {
	match (a.is_nan(), b.is_nan()) {
		(true, true) => b.is_sign_negative().cmp(&a.is_sign_negative()),
		(true, false) => nan_side(a),
		(false, true) => nan_side(b).reverse(),
		(false, false) => {
			if a < b {
				CmpOrdering::Less
			} else if a > b {
				CmpOrdering::Greater
			} else {
				CmpOrdering::Equal
			}
		}
	}
}

fn nan_side(nan: f64) -> CmpOrdering {
	if nan.is_sign_negative() {
		CmpOrdering::Less
	} else {
		CmpOrdering::Greater
	}
}

/// Exact comparison of an integer with a float, without rounding the integer.
fn cmp_int_float(int: i64, float: f64) -> CmpOrdering {
	// i64 covers [-2^63, 2^63), both bounds exact in f64
	const BOUND: f64 = 9_223_372_036_854_775_808.0;
	if float.is_nan() {
		return nan_side(float).reverse();
	}
	if float >= BOUND {
		return CmpOrdering::Less;
	}
	if float < -BOUND {
		return CmpOrdering::Greater;
	}
	let whole = float.trunc();
	match int.cmp(&(whole as i64)) {
		CmpOrdering::Equal if float > whole => CmpOrdering::Less,
		CmpOrdering::Equal if float < whole => CmpOrdering::Greater,
		ordering => ordering,
	}
}

impl PartialOrd for SortValue {
	fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for SortValue {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == CmpOrdering::Equal
	}
}

impl Eq for SortValue {}

impl Serialize for SortValue {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		match self {
			SortValue::Null => serializer.serialize_unit(),
			SortValue::Bool(v) => serializer.serialize_bool(*v),
			SortValue::Int(v) => serializer.serialize_i64(*v),
			SortValue::Float(v) if v.is_finite() => serializer.serialize_f64(*v),
			SortValue::Float(v) => {
				let tag = match (v.is_nan(), v.is_sign_negative()) {
					(true, false) => "nan",
					(true, true) => "-nan",
					(false, false) => "inf",
					(false, true) => "-inf",
				};
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry("f", tag)?;
				map.end()
			}
			SortValue::Text(v) => serializer.serialize_str(v),
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Text(String),
	NonFinite { f: String },
}

impl TryFrom<WireValue> for SortValue {
	type Error = String;

	fn try_from(wire: WireValue) -> Result<Self, String> {
		Ok(match wire {
			WireValue::Null => SortValue::Null,
			WireValue::Bool(v) => SortValue::Bool(v),
			WireValue::Int(v) => SortValue::Int(v),
			WireValue::Float(v) => SortValue::Float(v),
			WireValue::Text(v) => SortValue::Text(v),
			WireValue::NonFinite { f } => SortValue::Float(match f.as_str() {
				"inf" => f64::INFINITY,
				"-inf" => f64::NEG_INFINITY,
				"nan" => f64::NAN,
				"-nan" => -f64::NAN,
				other => return Err(format!("unknown float marker '{}'", other)),
			}),
		})
	}
}

impl fmt::Display for SortValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SortValue::Null => f.write_str("null"),
			SortValue::Bool(v) => write!(f, "{}", v),
			SortValue::Int(v) => write!(f, "{}", v),
			SortValue::Float(v) => write!(f, "{}", v),
			SortValue::Text(v) => f.write_str(v),
		}
	}
}

macro_rules! impl_from_int {
	($($ty:ty),*) => {
		$(
			impl From<$ty> for SortValue {
				fn from(value: $ty) -> Self {
					SortValue::Int(i64::from(value))
				}
			}
		)*
	};
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for SortValue {
	fn from(value: u64) -> Self {
		i64::try_from(value)
			.map(SortValue::Int)
			.unwrap_or(SortValue::Float(value as f64))
	}
}

impl From<usize> for SortValue {
	fn from(value: usize) -> Self {
		SortValue::from(value as u64)
	}
}

impl From<f32> for SortValue {
	fn from(value: f32) -> Self {
		SortValue::Float(f64::from(value))
	}
}

impl From<f64> for SortValue {
	fn from(value: f64) -> Self {
		SortValue::Float(value)
	}
}

impl From<bool> for SortValue {
	fn from(value: bool) -> Self {
		SortValue::Bool(value)
	}
}

impl From<&str> for SortValue {
	fn from(value: &str) -> Self {
		SortValue::Text(value.to_string())
	}
}

impl From<String> for SortValue {
	fn from(value: String) -> Self {
		SortValue::Text(value)
	}
}

impl From<&String> for SortValue {
	fn from(value: &String) -> Self {
		SortValue::Text(value.clone())
	}
}

impl<Tz: TimeZone> From<DateTime<Tz>> for SortValue {
	fn from(value: DateTime<Tz>) -> Self {
		SortValue::Text(
			value
				.with_timezone(&Utc)
				.to_rfc3339_opts(SecondsFormat::Micros, true),
		)
	}
}

impl From<NaiveDateTime> for SortValue {
	fn from(value: NaiveDateTime) -> Self {
		SortValue::from(value.and_utc())
	}
}

impl From<NaiveDate> for SortValue {
	fn from(value: NaiveDate) -> Self {
		SortValue::Text(value.format("%Y-%m-%d").to_string())
	}
}

impl<T: Into<SortValue>> From<Option<T>> for SortValue {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(SortValue::Null)
	}
}

impl From<&serde_json::Value> for SortValue {
	fn from(value: &serde_json::Value) -> Self {
		use serde_json::Value;
		match value {
			Value::Null => SortValue::Null,
			Value::Bool(b) => SortValue::Bool(*b),
			Value::Number(n) => match n.as_i64() {
				Some(i) => SortValue::Int(i),
				None => SortValue::Float(n.as_f64().unwrap_or(f64::NAN)),
			},
			Value::String(s) => SortValue::Text(s.clone()),
			other => SortValue::Text(other.to_string()),
		}
	}
}

/// The values an item has for each key of an ordering, in ordering order.
///
/// Serialized as a JSON array inside cursor tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(Vec<SortValue>);

impl Position {
	pub fn new(values: Vec<SortValue>) -> Self {
		Self(values)
	}

	pub fn values(&self) -> &[SortValue] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Vec<SortValue>> for Position {
	fn from(values: Vec<SortValue>) -> Self {
		Self(values)
	}
}

impl FromIterator<SortValue> for Position {
	fn from_iter<I: IntoIterator<Item = SortValue>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

/// Items that can report their value for a named sort field.
///
/// Unknown fields should report [`SortValue::Null`].
///
/// # Examples
///
/// ```
/// use drfexts_pagination::{Positioned, SortValue};
///
/// struct Article {
///     id: i64,
///     title: String,
/// }
///
/// impl Positioned for Article {
///     fn sort_value(&self, field: &str) -> SortValue {
///         match field {
///             "id" => self.id.into(),
///             "title" => self.title.as_str().into(),
///             _ => SortValue::Null,
///         }
///     }
/// }
///
/// let article = Article { id: 7, title: "Rust".into() };
/// assert_eq!(article.sort_value("id"), SortValue::Int(7));
/// ```
pub trait Positioned {
	fn sort_value(&self, field: &str) -> SortValue;
}

impl<T: Positioned + ?Sized> Positioned for &T {
	fn sort_value(&self, field: &str) -> SortValue {
		(**self).sort_value(field)
	}
}

impl Positioned for serde_json::Map<String, serde_json::Value> {
	fn sort_value(&self, field: &str) -> SortValue {
		self.get(field).map(SortValue::from).unwrap_or(SortValue::Null)
	}
}

impl Positioned for serde_json::Value {
	fn sort_value(&self, field: &str) -> SortValue {
		self.get(field).map(SortValue::from).unwrap_or(SortValue::Null)
	}
}
