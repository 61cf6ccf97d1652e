use core_types::{Ebook, SortOption};

use crate::filter::FilterState;

/// Derives the visible, ordered subset of `catalog` for the given query state.
///
/// Membership is the conjunction of the search match and every active filter
/// dimension; order comes from a single comparator chosen by `sort`. The
/// catalog itself is never touched, so this is safe to re-run on every state
/// change.
pub fn visible_items<'a>(
    catalog: &'a [Ebook],
    filters: &FilterState,
    search: &str,
    sort: SortOption,
) -> Vec<&'a Ebook> {
    let mut result: Vec<&Ebook> = catalog
        .iter()
        .filter(|item| matches_search(item, search) && matches_filters(item, filters))
        .collect();

    // Stable sort with a single comparator and no secondary key: ties keep
    // their catalog order.
    match sort {
        SortOption::Popular => result.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
        SortOption::Newest => result.sort_by(|a, b| b.published.cmp(&a.published)),
        SortOption::PriceAsc => result.sort_by(|a, b| a.price.cmp(&b.price)),
        SortOption::PriceDesc => result.sort_by(|a, b| b.price.cmp(&a.price)),
        SortOption::Rating => result.sort_by(|a, b| b.rating.cmp(&a.rating)),
    }

    tracing::debug!(
        total = catalog.len(),
        visible = result.len(),
        "catalog query evaluated"
    );

    result
}

/// An empty search matches everything; otherwise a case-insensitive substring
/// match against title, author, description or any topic (OR across fields).
fn matches_search(item: &Ebook, search: &str) -> bool {
    if search.is_empty() {
        return true;
    }
    let needle = search.to_lowercase();
    item.title.to_lowercase().contains(&needle)
        || item.author.to_lowercase().contains(&needle)
        || item.description.to_lowercase().contains(&needle)
        || item
            .topics
            .iter()
            .any(|topic| topic.to_lowercase().contains(&needle))
}

/// AND across dimensions; unconstrained dimensions always pass.
fn matches_filters(item: &Ebook, filters: &FilterState) -> bool {
    let category_ok = filters.category.is_none_or(|c| item.category == c);
    let level_ok = filters.level.is_none_or(|l| item.level == l);
    let price_ok = filters
        .price_range
        .is_none_or(|(min, max)| item.price >= min && item.price <= max);
    let rating_ok = item.rating >= filters.min_rating;
    let format_ok = filters
        .format
        .as_deref()
        .is_none_or(|f| item.format.iter().any(|available| available == f));
    let language_ok = filters.language.as_deref().is_none_or(|l| item.language == l);
    let featured_ok = !filters.featured_only || item.featured;
    let bestseller_ok = !filters.bestseller_only || item.bestseller;
    let on_sale_ok = !filters.on_sale_only || item.is_on_sale();

    category_ok
        && level_ok
        && price_ok
        && rating_ok
        && format_ok
        && language_ok
        && featured_ok
        && bestseller_ok
        && on_sale_ok
}
