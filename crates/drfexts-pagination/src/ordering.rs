//! Ordering specifications (`-created_at,id`) and position comparisons.

use crate::value::{Position, Positioned, SortValue};
use drfexts_exception::{Error, Result};
use std::cmp::Ordering as CmpOrdering;
use std::fmt;
use std::str::FromStr;

/// Sort direction of one ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	Ascending,
	Descending,
}

impl Direction {
	pub fn reversed(self) -> Self {
		match self {
			Direction::Ascending => Direction::Descending,
			Direction::Descending => Direction::Ascending,
		}
	}

	fn apply(self, ordering: CmpOrdering) -> CmpOrdering {
		match self {
			Direction::Ascending => ordering,
			Direction::Descending => ordering.reverse(),
		}
	}
}

/// One key of an [`Ordering`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderingField {
	pub field: String,
	pub direction: Direction,
}

impl OrderingField {
	pub fn asc(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			direction: Direction::Ascending,
		}
	}

	pub fn desc(field: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			direction: Direction::Descending,
		}
	}

	pub fn is_descending(&self) -> bool {
		self.direction == Direction::Descending
	}

	pub fn reversed(&self) -> Self {
		Self {
			field: self.field.clone(),
			direction: self.direction.reversed(),
		}
	}
}

impl FromStr for OrderingField {
	type Err = Error;

	fn from_str(term: &str) -> Result<Self> {
		let term = term.trim();
		let (direction, name) = match term.strip_prefix('-') {
			Some(rest) => (Direction::Descending, rest),
			None => (Direction::Ascending, term.strip_prefix('+').unwrap_or(term)),
		};
		let valid = !name.is_empty()
			&& name
				.chars()
				.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
		if !valid {
			return Err(Error::InvalidOrdering(format!(
				"'{}' is not a valid ordering field",
				term
			)));
		}
		Ok(Self {
			field: name.to_string(),
			direction,
		})
	}
}

impl fmt::Display for OrderingField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_descending() {
			write!(f, "-{}", self.field)
		} else {
			f.write_str(&self.field)
		}
	}
}

/// An ordered sequence of sort keys.
///
/// The first key is the primary key; later keys break ties. For
/// deterministic pagination the keys together must identify an item
/// uniquely, which [`Ordering::with_tie_breaker`] can guarantee.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::Ordering;
///
/// let ordering: Ordering = "-created_at, id".parse().unwrap();
/// assert_eq!(ordering.to_string(), "-created_at,id");
/// assert_eq!(ordering.reversed().to_string(), "created_at,-id");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ordering {
	fields: Vec<OrderingField>,
}

impl Ordering {
	/// Build an ordering from already parsed keys.
	///
	/// Fails when `fields` is empty or names a field twice.
	pub fn new(fields: Vec<OrderingField>) -> Result<Self> {
		if fields.is_empty() {
			return Err(Error::InvalidOrdering(
				"ordering must contain at least one field".to_string(),
			));
		}
		for (i, field) in fields.iter().enumerate() {
			if fields[..i].iter().any(|f| f.field == field.field) {
				return Err(Error::InvalidOrdering(format!(
					"field '{}' appears more than once",
					field.field
				)));
			}
		}
		Ok(Self { fields })
	}

	/// Parse a comma-delimited specification such as `-created_at,id`.
	pub fn parse(spec: &str) -> Result<Self> {
		let fields = spec
			.split(',')
			.filter(|term| !term.trim().is_empty())
			.map(str::parse)
			.collect::<Result<Vec<OrderingField>>>()?;
		Self::new(fields)
	}

	pub fn fields(&self) -> &[OrderingField] {
		&self.fields
	}

	/// The primary ordering key.
	pub fn primary(&self) -> &OrderingField {
		&self.fields[0]
	}

	pub fn contains(&self, field: &str) -> bool {
		self.fields.iter().any(|f| f.field == field)
	}

	/// Append `field` as a final key, sharing the primary key's direction,
	/// unless the ordering already contains it.
	pub fn with_tie_breaker(mut self, field: &str) -> Self {
		if !self.contains(field) {
			self.fields.push(OrderingField {
				field: field.to_string(),
				direction: self.primary().direction,
			});
		}
		self
	}

	/// The same keys with every direction flipped.
	pub fn reversed(&self) -> Self {
		Self {
			fields: self.fields.iter().map(OrderingField::reversed).collect(),
		}
	}

	/// The position of `item` under this ordering.
	pub fn position_of<T: Positioned + ?Sized>(&self, item: &T) -> Position {
		self.fields
			.iter()
			.map(|f| item.sort_value(&f.field))
			.collect()
	}

	/// Compare two positions key by key, honoring each key's direction.
	///
	/// Missing trailing values compare as [`SortValue::Null`].
	pub fn compare_positions(&self, a: &Position, b: &Position) -> CmpOrdering {
		let null = SortValue::Null;
		for (i, field) in self.fields.iter().enumerate() {
			let left = a.values().get(i).unwrap_or(&null);
			let right = b.values().get(i).unwrap_or(&null);
			let ordering = field.direction.apply(left.cmp(right));
			if ordering != CmpOrdering::Equal {
				return ordering;
			}
		}
		CmpOrdering::Equal
	}

	/// Compare two items under this ordering.
	pub fn compare<T: Positioned + ?Sized>(&self, a: &T, b: &T) -> CmpOrdering {
		for field in &self.fields {
			let ordering = field
				.direction
				.apply(a.sort_value(&field.field).cmp(&b.sort_value(&field.field)));
			if ordering != CmpOrdering::Equal {
				return ordering;
			}
		}
		CmpOrdering::Equal
	}

	/// Whether `item` sorts strictly after `position`.
	///
	/// Equivalent to `a > a0 OR (a = a0 AND b > b0) ...` with `>` flipped
	/// for descending keys.
	pub fn is_after<T: Positioned + ?Sized>(&self, item: &T, position: &Position) -> bool {
		self.compare_positions(&self.position_of(item), position) == CmpOrdering::Greater
	}
}

impl From<OrderingField> for Ordering {
	fn from(field: OrderingField) -> Self {
		Self {
			fields: vec![field],
		}
	}
}

impl FromStr for Ordering {
	type Err = Error;

	fn from_str(spec: &str) -> Result<Self> {
		Self::parse(spec)
	}
}

impl fmt::Display for Ordering {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, field) in self.fields.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}
			write!(f, "{}", field)?;
		}
		Ok(())
	}
}
