use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The fixed set of categories that expenses are aggregated into.
///
/// A record's `category` is an open string. It contributes to a category's total only when it
/// matches that category's label exactly.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default,
)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Shopping,
    #[default]
    Other,
}

serde_plain::derive_display_from_serialize!(Category);
serde_plain::derive_fromstr_from_deserialize!(Category);

impl Category {
    /// All categories, in chart order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Shopping,
        Category::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Food => FOOD_STR,
            Category::Transport => TRANSPORT_STR,
            Category::Entertainment => ENTERTAINMENT_STR,
            Category::Shopping => SHOPPING_STR,
            Category::Other => OTHER_STR,
        }
    }

    /// Returns the category whose label is exactly `label`, if any.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }

    /// True when a record's free-form `category` string belongs to this category.
    pub fn matches(&self, category: &str) -> bool {
        self.label() == category
    }
}

const FOOD_STR: &str = "Food";
const TRANSPORT_STR: &str = "Transport";
const ENTERTAINMENT_STR: &str = "Entertainment";
const SHOPPING_STR: &str = "Shopping";
const OTHER_STR: &str = "Other";
const ALL_STR: &str = "All";

/// The category filter control: either everything, or records whose category string is exactly
/// the given name.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == ALL_STR {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(name)
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(value: Category) -> Self {
        CategoryFilter::Named(value.label().to_string())
    }
}

impl FromStr for CategoryFilter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(CategoryFilter::named(s))
    }
}

impl Display for CategoryFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryFilter::All => write!(f, "{ALL_STR}"),
            CategoryFilter::Named(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), Some(category));
            assert_eq!(category.to_string(), category.label());
            assert_eq!(Category::from_str(category.label()).unwrap(), category);
        }
    }

    #[test]
    fn test_from_label_is_exact() {
        assert_eq!(Category::from_label("food"), None);
        assert_eq!(Category::from_label("Groceries"), None);
    }

    #[test]
    fn test_chart_order() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["Food", "Transport", "Entertainment", "Shopping", "Other"]
        );
    }

    #[test]
    fn test_category_filter_parse() {
        assert_eq!(CategoryFilter::from_str("All").unwrap(), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_str("Food").unwrap(),
            CategoryFilter::Named("Food".to_string())
        );
        assert_eq!(CategoryFilter::from(Category::Shopping).to_string(), "Shopping");
    }
}
