//! Shelf layout: which shelves exist and which aisle each belongs to.

use core::str::FromStr;
use std::collections::HashSet;

use stockroom_core::{DomainError, DomainResult};

use crate::ids::{AisleId, ShelfId};

/// One aisle and its shelves, in display order.
///
/// Persisted as a single configuration row: `A:A1,A2,A3,A4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AisleShelves {
    pub aisle: AisleId,
    pub shelves: Vec<ShelfId>,
}

impl FromStr for AisleShelves {
    type Err = DomainError;

    fn from_str(row: &str) -> Result<Self, Self::Err> {
        let (aisle, shelves) = row
            .split_once(':')
            .ok_or_else(|| DomainError::validation(format!("layout row missing ':' separator: {row}")))?;

        let aisle = AisleId::new(aisle)?;
        let shelves = shelves
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(ShelfId::new)
            .collect::<DomainResult<Vec<_>>>()?;

        if shelves.is_empty() {
            return Err(DomainError::validation(format!("aisle {aisle} has no shelves")));
        }

        Ok(Self { aisle, shelves })
    }
}

impl core::fmt::Display for AisleShelves {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:", self.aisle)?;
        for (i, shelf) in self.shelves.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{shelf}")?;
        }
        Ok(())
    }
}

/// Ordered mapping from aisle to its shelves.
///
/// Reference data: loaded once and never mutated by stock movements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfLayout {
    aisles: Vec<AisleShelves>,
}

impl ShelfLayout {
    /// Build a layout, rejecting duplicate aisles or shelves.
    pub fn new(aisles: Vec<AisleShelves>) -> DomainResult<Self> {
        let mut seen_aisles = HashSet::new();
        let mut seen_shelves = HashSet::new();
        for entry in &aisles {
            if !seen_aisles.insert(&entry.aisle) {
                return Err(DomainError::conflict(format!("duplicate aisle {}", entry.aisle)));
            }
            for shelf in &entry.shelves {
                if !seen_shelves.insert(shelf) {
                    return Err(DomainError::conflict(format!("shelf {shelf} listed twice")));
                }
            }
        }
        Ok(Self { aisles })
    }

    /// Parse configuration rows (`A:A1,A2,...`), one per aisle.
    pub fn from_rows<I, S>(rows: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let aisles = rows
            .into_iter()
            .filter(|row| !row.as_ref().trim().is_empty())
            .map(|row| row.as_ref().parse::<AisleShelves>())
            .collect::<DomainResult<Vec<_>>>()?;
        Self::new(aisles)
    }

    pub fn to_rows(&self) -> Vec<String> {
        self.aisles.iter().map(ToString::to_string).collect()
    }

    pub fn aisles(&self) -> &[AisleShelves] {
        &self.aisles
    }

    pub fn shelves(&self, aisle: &AisleId) -> Option<&[ShelfId]> {
        self.aisles
            .iter()
            .find(|a| &a.aisle == aisle)
            .map(|a| a.shelves.as_slice())
    }

    pub fn contains_shelf(&self, shelf: &ShelfId) -> bool {
        self.aisles.iter().any(|a| a.shelves.contains(shelf))
    }
}

impl Default for ShelfLayout {
    /// Three aisles `A`..`C` with four shelves each.
    fn default() -> Self {
        let aisles = ["A", "B", "C"]
            .into_iter()
            .map(|aisle| AisleShelves {
                aisle: AisleId(aisle.to_string()),
                shelves: (1..=4).map(|n| ShelfId(format!("{aisle}{n}"))).collect(),
            })
            .collect();
        Self { aisles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_persisted_rows() {
        let layout = ShelfLayout::default();
        assert_eq!(layout.to_rows(), vec!["A:A1,A2,A3,A4", "B:B1,B2,B3,B4", "C:C1,C2,C3,C4"]);
        assert_eq!(ShelfLayout::from_rows(layout.to_rows()).unwrap(), layout);
    }

    #[test]
    fn parses_rows_with_whitespace() {
        let layout = ShelfLayout::from_rows(["D: D1, D2 ,D3", ""]).unwrap();
        let aisle = AisleId::new("D").unwrap();
        let shelves = layout.shelves(&aisle).unwrap();
        assert_eq!(shelves.len(), 3);
        assert!(layout.contains_shelf(&ShelfId::new("D2").unwrap()));
        assert!(!layout.contains_shelf(&ShelfId::new("A1").unwrap()));
    }

    #[test]
    fn rejects_malformed_rows() {
        assert!(matches!(
            ShelfLayout::from_rows(["A A1,A2"]),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(ShelfLayout::from_rows(["A:"]), Err(DomainError::Validation(_))));
    }

    #[test]
    fn rejects_duplicate_shelves_across_aisles() {
        let err = ShelfLayout::from_rows(["A:A1,A2", "B:A2,B1"]).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }
}
