//! Query parameter parsing shared by the paginators.

use crate::context::RequestContext;
use drfexts_exception::{Error, Result};

/// Messages carried by page number errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessages {
	/// Page number is not an integer
	pub invalid_page: String,
	/// Page number is below 1
	pub min_page: String,
	/// Page lies past the end of the collection
	pub no_results: String,
}

impl Default for ErrorMessages {
	fn default() -> Self {
		Self {
			invalid_page: "That page number is not an integer".to_string(),
			min_page: "That page number is less than 1".to_string(),
			no_results: "That page contains no results".to_string(),
		}
	}
}

/// Parse a non-negative integer, rejecting zero when `strict`, capped at `cutoff`.
pub(crate) fn positive_int(raw: &str, strict: bool, cutoff: Option<usize>) -> Option<usize> {
	let value = raw.trim().parse::<usize>().ok()?;
	if strict && value == 0 {
		return None;
	}
	Some(match cutoff {
		Some(cutoff) => value.min(cutoff),
		None => value,
	})
}

/// Page size requested through `param`, or `default`.
///
/// Anything that is not a strictly positive integer falls back to the
/// default; larger values are clamped to `max`.
pub(crate) fn requested_page_size(
	ctx: &RequestContext,
	param: Option<&str>,
	default: usize,
	max: Option<usize>,
) -> usize {
	param
		.and_then(|param| ctx.query_param(param))
		.and_then(|raw| positive_int(&raw, true, max))
		.unwrap_or(default)
}

/// Validate a 1-based page number.
///
/// Integral floats such as `2.0` are accepted.
pub(crate) fn validate_page_number(raw: &str, messages: &ErrorMessages) -> Result<usize> {
	let raw = raw.trim();
	let number = match raw.parse::<i64>() {
		Ok(number) => number,
		Err(_) => match raw.parse::<f64>() {
			Ok(float) if float.is_finite() && float.fract() == 0.0 => float as i64,
			_ => return Err(Error::InvalidPage(messages.invalid_page.clone())),
		},
	};
	if number < 1 {
		return Err(Error::InvalidPage(messages.min_page.clone()));
	}
	usize::try_from(number).map_err(|_| Error::InvalidPage(messages.invalid_page.clone()))
}
