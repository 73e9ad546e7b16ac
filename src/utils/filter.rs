use crate::models::Searchable;

/// Case-insensitive substring search across a record's searchable
/// fields. Preserves the original relative order; an empty query
/// returns the full collection, not an empty result.
pub fn search<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    if query.is_empty() {
        return items.iter().collect();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Lists render most-recently-created-first. The backend returns
/// creation order ascending, so reverse for display. Applied after
/// filtering, not before.
pub fn display_order<T: Clone>(items: &[T]) -> Vec<T> {
    let mut ordered = items.to_vec();
    ordered.reverse();
    ordered
}
