use crate::catalog::CatalogItem;

/// Items whose name or category contains `normalized_query`, in catalog order.
///
/// Containment is binary, so no score is attached and nothing is reordered.
/// An empty query matches nothing.
pub fn exact_matches<'a>(items: &'a [CatalogItem], normalized_query: &str) -> Vec<&'a CatalogItem> {
    if normalized_query.is_empty() {
        return Vec::new();
    }

    items
        .iter()
        .filter(|item| {
            item.match_fields().is_some_and(|(name, category)| {
                name.to_lowercase().contains(normalized_query)
                    || category.to_lowercase().contains(normalized_query)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("Verbal Reasoning", "Cognitive"),
            CatalogItem::new("Cognitive Ability Test", "Ability"),
            CatalogItem::new("OPQ32", "Personality"),
        ]
    }

    #[test]
    fn matches_name_or_category_case_insensitively() {
        let items = items();
        let found = exact_matches(&items, "cognitive");
        let names: Vec<_> = found.iter().filter_map(|i| i.name.as_deref()).collect();
        assert_eq!(names, vec!["Verbal Reasoning", "Cognitive Ability Test"]);
    }

    #[test]
    fn whole_query_is_one_substring() {
        let items = items();
        assert!(exact_matches(&items, "ability test").len() == 1);
        assert!(exact_matches(&items, "test ability").is_empty());
    }

    #[test]
    fn empty_query_matches_nothing() {
        assert!(exact_matches(&items(), "").is_empty());
    }
}
