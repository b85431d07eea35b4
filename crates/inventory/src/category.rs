//! Product categories.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, ValueObject};

/// Fixed set of product categories.
///
/// Persisted and displayed by their Portuguese labels, which is what the
/// workbook has always stored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Eletrônicos")]
    Electronics,
    #[serde(rename = "Roupas")]
    Clothing,
    #[serde(rename = "Alimentação")]
    Food,
    #[serde(rename = "Livros")]
    Books,
    #[serde(rename = "Casa")]
    Home,
    #[serde(rename = "Outros")]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Electronics,
        Category::Clothing,
        Category::Food,
        Category::Books,
        Category::Home,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Electronics => "Eletrônicos",
            Category::Clothing => "Roupas",
            Category::Food => "Alimentação",
            Category::Books => "Livros",
            Category::Home => "Casa",
            Category::Other => "Outros",
        }
    }

    fn english_name(self) -> &'static str {
        match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Food => "food",
            Category::Books => "books",
            Category::Home => "home",
            Category::Other => "other",
        }
    }
}

impl ValueObject for Category {}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercase and strip the accents used by the category labels.
fn fold(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

impl FromStr for Category {
    type Err = DomainError;

    /// Accepts the label (with or without accents, any case) or the English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = fold(s);
        Category::ALL
            .into_iter()
            .find(|c| fold(c.label()) == wanted || c.english_name() == wanted)
            .ok_or_else(|| DomainError::validation(format!("unknown category: {}", s.trim())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_loosely() {
        assert_eq!("Casa".parse::<Category>().unwrap(), Category::Home);
        assert_eq!("eletronicos".parse::<Category>().unwrap(), Category::Electronics);
        assert_eq!("ALIMENTAÇÃO".parse::<Category>().unwrap(), Category::Food);
        assert_eq!("books".parse::<Category>().unwrap(), Category::Books);
    }

    #[test]
    fn rejects_unknown_category() {
        let err = "Ferramentas".parse::<Category>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn label_round_trips_through_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.label()));
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, category);
        }
    }
}
