//! Cursor Pagination Navigation Tests
//!
//! These tests walk typed collections page by page through the rendered
//! `next`/`previous` links, the way a client would.

use drfexts_pagination::{
	Cursor, CursorCodec, CursorPagination, CursorPaginatedResponse, MemorySource, Position,
	Positioned, QueryStringCursorCodec, RequestContext, SortValue,
};
use proptest::prelude::*;
use rstest::*;
use serde::Serialize;

// ============================================================================
// Test Models
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Article {
	id: i64,
	title: String,
	created_at: String,
}

impl Positioned for Article {
	fn sort_value(&self, field: &str) -> SortValue {
		match field {
			"id" => SortValue::from(self.id),
			"title" => SortValue::from(&self.title),
			"created_at" => SortValue::from(&self.created_at),
			_ => SortValue::Null,
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
struct Reading {
	id: i64,
	score: f64,
}

impl Positioned for Reading {
	fn sort_value(&self, field: &str) -> SortValue {
		match field {
			"id" => SortValue::from(self.id),
			"score" => SortValue::from(self.score),
			_ => SortValue::Null,
		}
	}
}

fn article(id: i64, created_at: String) -> Article {
	Article {
		id,
		title: format!("Article {}", id),
		created_at,
	}
}

fn ids(items: &[Article]) -> Vec<i64> {
	items.iter().map(|a| a.id).collect()
}

fn follow(
	paginator: &CursorPagination,
	source: &MemorySource<Article>,
	link: &str,
) -> CursorPaginatedResponse<Article> {
	let ctx = RequestContext::parse(link).unwrap();
	paginator.paginate(source, &ctx).unwrap()
}

// ============================================================================
// rstest Fixtures
// ============================================================================

/// 25 articles created on consecutive days, article 1 being the newest.
#[fixture]
fn articles() -> MemorySource<Article> {
	MemorySource::new(
		(1..=25)
			.map(|i| article(i, format!("2024-01-{:02}T00:00:00.000000Z", 26 - i)))
			.collect(),
	)
}

#[fixture]
fn paginator() -> CursorPagination {
	CursorPagination::new()
}

// ============================================================================
// Scenarios
// ============================================================================

#[rstest]
fn test_newest_first_walk(articles: MemorySource<Article>, paginator: CursorPagination) {
	// Act
	let first = follow(&paginator, &articles, "/api/articles/");
	let second = follow(&paginator, &articles, first.next.as_deref().unwrap());
	let third = follow(&paginator, &articles, second.next.as_deref().unwrap());

	// Assert
	assert_eq!(ids(&first.list), (1..=10).collect::<Vec<_>>());
	assert!(first.next.is_some());
	assert!(first.previous.is_none());

	assert_eq!(ids(&second.list), (11..=20).collect::<Vec<_>>());
	assert!(second.previous.is_some());
	assert!(second.next.is_some());

	assert_eq!(ids(&third.list), (21..=25).collect::<Vec<_>>());
	assert!(third.next.is_none());
	assert!(third.previous.is_some());
}

#[rstest]
fn test_walk_back_from_last_page(articles: MemorySource<Article>, paginator: CursorPagination) {
	// Arrange
	let first = follow(&paginator, &articles, "/api/articles/");
	let second = follow(&paginator, &articles, first.next.as_deref().unwrap());
	let third = follow(&paginator, &articles, second.next.as_deref().unwrap());

	// Act
	let back_to_second = follow(&paginator, &articles, third.previous.as_deref().unwrap());
	let back_to_first = follow(
		&paginator,
		&articles,
		back_to_second.previous.as_deref().unwrap(),
	);

	// Assert
	assert_eq!(back_to_second.list, second.list);
	assert_eq!(back_to_first.list, first.list);
	assert!(back_to_first.previous.is_none());
	let forward_again = follow(&paginator, &articles, back_to_first.next.as_deref().unwrap());
	assert_eq!(forward_again.list, second.list);
}

#[rstest]
fn test_inserts_do_not_shift_pages(articles: MemorySource<Article>, paginator: CursorPagination) {
	// Arrange
	let first = follow(&paginator, &articles, "/api/articles/");
	let next = first.next.unwrap();
	let mut grown = articles.into_inner();
	grown.push(article(100, "2024-02-01T00:00:00.000000Z".to_string()));
	let grown = MemorySource::new(grown);

	// Act
	let second = follow(&paginator, &grown, &next);

	// Assert
	assert_eq!(ids(&second.list), (11..=20).collect::<Vec<_>>());
}

#[rstest]
fn test_repeated_request_returns_same_page(
	articles: MemorySource<Article>,
	paginator: CursorPagination,
) {
	// Arrange
	let first = follow(&paginator, &articles, "/api/articles/");
	let link = first.next.unwrap();

	// Act
	let once = follow(&paginator, &articles, &link);
	let twice = follow(&paginator, &articles, &link);

	// Assert
	assert_eq!(once, twice);
}

#[rstest]
fn test_position_past_last_item(articles: MemorySource<Article>, paginator: CursorPagination) {
	// Arrange
	let codec = QueryStringCursorCodec::new();
	let cursor = Cursor::new(
		0,
		false,
		Some(Position::new(vec![SortValue::from("1999-01-01")])),
	);
	let link = format!("/api/articles/?cursor={}", codec.encode(&cursor).unwrap());

	// Act
	let page = follow(&paginator, &articles, &link);

	// Assert
	assert!(page.list.is_empty());
	assert!(page.next.is_none());
	assert!(page.previous.is_some());
}

#[rstest]
#[case("")]
#[case("%%%")]
#[case("bm90IGEgY3Vyc29y")]
fn test_unusable_cursor_falls_back_to_first_page(
	articles: MemorySource<Article>,
	paginator: CursorPagination,
	#[case] token: &str,
) {
	// Act
	let page = follow(&paginator, &articles, &format!("/api/articles/?cursor={}", token));

	// Assert
	assert_eq!(ids(&page.list), (1..=10).collect::<Vec<_>>());
	assert!(page.previous.is_none());
}

#[rstest]
fn test_duplicate_sort_values_are_each_visited_once() {
	// Arrange: many articles share a creation day
	let source = MemorySource::new(
		(1..=23)
			.map(|i| article(i, format!("2024-03-{:02}", (i + 2) / 3)))
			.collect::<Vec<_>>(),
	);
	let paginator = CursorPagination::new().ordering_spec("created_at").unwrap().page_size(4);

	// Act
	let mut seen = Vec::new();
	let mut link = Some("/api/articles/".to_string());
	while let Some(current) = link {
		let page = follow(&paginator, &source, &current);
		assert!(page.list.len() <= 4);
		seen.extend(ids(&page.list));
		link = page.next;
	}

	// Assert
	assert_eq!(seen, (1..=23).collect::<Vec<_>>());
}

#[rstest]
#[case::infinite(vec![1.0, 2.0, f64::INFINITY, f64::INFINITY, f64::INFINITY])]
#[case::negative_infinite(vec![f64::NEG_INFINITY, f64::NEG_INFINITY, 0.5, 0.5, 7.25])]
#[case::fractional(vec![0.1, 0.2, 0.30000000000000004, 99812590784.84523, 99812590784.84525])]
fn test_float_scores_are_each_visited_once(#[case] scores: Vec<f64>) {
	// Arrange
	let source = MemorySource::new(
		scores
			.iter()
			.enumerate()
			.map(|(i, score)| Reading {
				id: i as i64 + 1,
				score: *score,
			})
			.collect::<Vec<_>>(),
	);
	let paginator = CursorPagination::new()
		.ordering_spec("score")
		.unwrap()
		.tie_breaker("id")
		.page_size(2);

	// Act
	let mut seen = Vec::new();
	let mut link = Some("/api/readings/".to_string());
	while let Some(current) = link.take() {
		let ctx = RequestContext::parse(&current).unwrap();
		let page = paginator.paginate(&source, &ctx).unwrap();
		seen.extend(page.list.iter().map(|r| r.id));
		assert!(seen.len() <= scores.len(), "revisited rows: {:?}", seen);
		link = page.next;
	}

	// Assert
	assert_eq!(seen, (1..=scores.len() as i64).collect::<Vec<_>>());
}

#[rstest]
fn test_requested_ordering_with_tie_breaker(articles: MemorySource<Article>) {
	// Arrange
	let paginator = CursorPagination::new()
		.ordering_query_param("ordering", ["title", "created_at"])
		.tie_breaker("id")
		.page_size(5);

	// Act
	let first = follow(&paginator, &articles, "/api/articles/?ordering=title");
	let second = follow(&paginator, &articles, first.next.as_deref().unwrap());

	// Assert
	let titles: Vec<_> = first.list.iter().chain(&second.list).map(|a| a.title.clone()).collect();
	let mut sorted = titles.clone();
	sorted.sort();
	assert_eq!(titles, sorted);
	assert!(second.next.as_deref().unwrap().contains("ordering=title"));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
	#[test]
	fn prop_previous_of_next_page_is_the_page(
		created in proptest::collection::vec(0i64..20, 1..60),
		page_size in 1usize..8,
		hops in 0usize..6,
	) {
		let source = MemorySource::new(
			created
				.iter()
				.enumerate()
				.map(|(i, day)| article(i as i64, format!("day-{:02}", day)))
				.collect::<Vec<_>>(),
		);
		let paginator = CursorPagination::new()
			.ordering_spec("-created_at")
			.unwrap()
			.tie_breaker("id")
			.page_size(page_size);

		let mut page = follow(&paginator, &source, "/items/");
		for _ in 0..hops {
			let Some(next) = page.next.clone() else { break };
			let following = follow(&paginator, &source, &next);
			prop_assert!(following.list.len() <= page_size);

			let back = follow(&paginator, &source, following.previous.as_deref().unwrap());
			prop_assert_eq!(&back.list, &page.list);
			page = following;
		}
	}
}
