//! Query-string helpers for building pagination links.

use std::collections::BTreeMap;
use url::Url;
use url::form_urlencoded;

fn rebuild_query(url: &Url, edit: impl FnOnce(&mut BTreeMap<String, Vec<String>>)) -> Url {
	let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
	for (key, value) in url.query_pairs() {
		params
			.entry(key.into_owned())
			.or_default()
			.push(value.into_owned());
	}
	edit(&mut params);

	let mut rebuilt = url.clone();
	if params.is_empty() {
		rebuilt.set_query(None);
	} else {
		let mut query = form_urlencoded::Serializer::new(String::new());
		for (key, values) in &params {
			for value in values {
				query.append_pair(key, value);
			}
		}
		rebuilt.set_query(Some(&query.finish()));
	}
	rebuilt
}

/// Set or replace `key` in the query string of `url`.
///
/// Query keys come out sorted so that equal requests produce equal links.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::links::replace_query_param;
/// use url::Url;
///
/// let url = Url::parse("http://api.example.org/items/?page=2&ordering=-id").unwrap();
/// let next = replace_query_param(&url, "page", "3");
/// assert_eq!(next.as_str(), "http://api.example.org/items/?ordering=-id&page=3");
/// ```
pub fn replace_query_param(url: &Url, key: &str, value: &str) -> Url {
	rebuild_query(url, |params| {
		params.insert(key.to_string(), vec![value.to_string()]);
	})
}

/// Remove `key` from the query string of `url`.
///
/// # Examples
///
/// ```
/// use drfexts_pagination::links::remove_query_param;
/// use url::Url;
///
/// let url = Url::parse("http://api.example.org/items/?page=2").unwrap();
/// assert_eq!(remove_query_param(&url, "page").as_str(), "http://api.example.org/items/");
/// ```
pub fn remove_query_param(url: &Url, key: &str) -> Url {
	rebuild_query(url, |params| {
		params.remove(key);
	})
}

/// Render `url` either absolute or as `path?query`.
pub fn render_link(url: &Url, absolute: bool) -> String {
	if absolute {
		return url.to_string();
	}
	let mut link = url.path().to_string();
	if let Some(query) = url.query() {
		link.push('?');
		link.push_str(query);
	}
	if let Some(fragment) = url.fragment() {
		link.push('#');
		link.push_str(fragment);
	}
	link
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_replace_keeps_other_params_sorted() {
		// Arrange
		let url = Url::parse("http://localhost/items/?z=1&cursor=old&a=2&a=3").unwrap();

		// Act
		let replaced = replace_query_param(&url, "cursor", "new");

		// Assert
		assert_eq!(replaced.query(), Some("a=2&a=3&cursor=new&z=1"));
	}

	#[rstest]
	fn test_replace_adds_missing_param() {
		// Arrange
		let url = Url::parse("http://localhost/items/").unwrap();

		// Act
		let replaced = replace_query_param(&url, "page", "2");

		// Assert
		assert_eq!(render_link(&replaced, false), "/items/?page=2");
	}

	#[rstest]
	fn test_remove_keeps_fragment_and_path() {
		// Arrange
		let url = Url::parse("http://localhost/items/?page=2&page_size=5#top").unwrap();

		// Act
		let removed = remove_query_param(&url, "page");

		// Assert
		assert_eq!(removed.as_str(), "http://localhost/items/?page_size=5#top");
		assert_eq!(render_link(&removed, false), "/items/?page_size=5#top");
	}

	#[rstest]
	#[case(true, "http://localhost/items/?page=1")]
	#[case(false, "/items/?page=1")]
	fn test_render_link(#[case] absolute: bool, #[case] expected: &str) {
		// Arrange
		let url = Url::parse("http://localhost/items/?page=1").unwrap();

		// Act & Assert
		assert_eq!(render_link(&url, absolute), expected);
	}
}
