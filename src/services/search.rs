use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub count: usize,
    pub data: Vec<SearchHit>,
}

/// Case-insensitive substring match. Every name contains the empty term.
///
/// Matching happens here rather than in SQL because SQLite's `LIKE` only
/// folds ASCII and treats `%`/`_` in the term as wildcards.
pub fn name_matches(term: &str, name: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

/// Keep the `(id, name)` rows matching `term`, preserving their order.
pub fn filter_by_name<I>(term: &str, rows: I) -> SearchResults
where
    I: IntoIterator<Item = (i64, String)>,
{
    let data: Vec<SearchHit> = rows
        .into_iter()
        .filter(|(_, name)| name_matches(term, name))
        .map(|(id, name)| SearchHit { id, name })
        .collect();

    SearchResults {
        count: data.len(),
        data,
    }
}
