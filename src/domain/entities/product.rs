//! Storefront product catalog.

/// A catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Product {
    pub id: u32,
    pub title: &'static str,
    pub price_label: &'static str,
    pub category: &'static str,
    pub description: &'static str,
}

const DEFAULT_DESCRIPTION: &str = "Freshly made every morning.";

static CATALOG: [Product; 6] = [
    Product {
        id: 1,
        title: "Bombones de chocolate",
        price_label: "1.500 (1kg)",
        category: "Dulces",
        description: DEFAULT_DESCRIPTION,
    },
    Product {
        id: 2,
        title: "Pastel de chocolate",
        price_label: "20.000",
        category: "Pasteles",
        description: DEFAULT_DESCRIPTION,
    },
    Product {
        id: 3,
        title: "Pie de limón",
        price_label: "18.000",
        category: "Pasteles",
        description: DEFAULT_DESCRIPTION,
    },
    Product {
        id: 4,
        title: "Bombones de chocolate 2",
        price_label: "3.500 (1kg)",
        category: "Dulces",
        description: DEFAULT_DESCRIPTION,
    },
    Product {
        id: 5,
        title: "Pastel de chocolate 2",
        price_label: "25.000",
        category: "Pasteles",
        description: DEFAULT_DESCRIPTION,
    },
    Product {
        id: 6,
        title: "Pie de limón 2",
        price_label: "20.000",
        category: "Pasteles",
        description: DEFAULT_DESCRIPTION,
    },
];

/// Returns the full demo catalog.
#[must_use]
pub fn catalog() -> &'static [Product] {
    &CATALOG
}

/// Returns products in a category, in catalog order.
pub fn by_category(category: &str) -> impl Iterator<Item = &'static Product> + '_ {
    CATALOG.iter().filter(move |p| p.category == category)
}

/// Looks up a product by id.
#[must_use]
pub fn find(id: u32) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Returns distinct categories in first-seen order.
#[must_use]
pub fn categories() -> Vec<&'static str> {
    let mut seen: Vec<&'static str> = Vec::new();
    for product in &CATALOG {
        if !seen.contains(&product.category) {
            seen.push(product.category);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let mut ids: Vec<u32> = catalog().iter().map(|p| p.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog().len());
    }

    #[test]
    fn test_by_category() {
        let sweets: Vec<_> = by_category("Dulces").map(|p| p.id).collect();
        assert_eq!(sweets, vec![1, 4]);
        assert_eq!(by_category("Pasteles").count(), 4);
        assert_eq!(by_category("Panes").count(), 0);
    }

    #[test]
    fn test_categories_order() {
        assert_eq!(categories(), vec!["Dulces", "Pasteles"]);
    }

    #[test]
    fn test_find() {
        assert_eq!(find(3).map(|p| p.title), Some("Pie de limón"));
        assert!(find(99).is_none());
    }
}
