use super::domain::{Attribute, LevelKey, ValidationError};
use serde::Serialize;
use std::collections::HashSet;

/// Ordered set of attributes under study.
///
/// Declaration order fixes both the profile column order and the order of the
/// dummy variables in the design matrix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeCatalog {
    attributes: Vec<Attribute>,
    #[serde(skip)]
    profile_count: usize,
}

impl AttributeCatalog {
    pub fn new(attributes: Vec<Attribute>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(attributes.len());
        for attribute in &attributes {
            if !seen.insert(attribute.name()) {
                return Err(ValidationError::DuplicateAttribute {
                    attribute: attribute.name().to_string(),
                });
            }
        }

        let profile_count = if attributes.is_empty() {
            0
        } else {
            attributes
                .iter()
                .try_fold(1_usize, |count, attribute| {
                    count.checked_mul(attribute.level_count())
                })
                .ok_or_else(|| ValidationError::TooManyProfiles {
                    attributes: attributes.len(),
                })?
        };

        Ok(Self {
            attributes,
            profile_count,
        })
    }

    /// Parses tabular rows shaped `name, level1, level2, ...`.
    ///
    /// Rows may be ragged: blank cells after the last level are padding. A
    /// blank cell followed by a filled one is a missing level. Row numbers in
    /// errors are 1-based and count data rows only.
    pub fn from_rows<R, S>(rows: impl IntoIterator<Item = R>) -> Result<Self, ValidationError>
    where
        R: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut attributes = Vec::new();

        for (index, row) in rows.into_iter().enumerate() {
            let mut cells = row.into_iter();
            let name = cells
                .next()
                .map(|cell| cell.as_ref().trim().to_string())
                .unwrap_or_default();
            if name.is_empty() {
                return Err(ValidationError::MissingAttributeName {
                    row: Some(index + 1),
                });
            }

            let mut levels: Vec<String> = cells
                .map(|cell| cell.as_ref().trim().to_string())
                .collect();
            while levels.last().is_some_and(|level| level.is_empty()) {
                levels.pop();
            }
            if let Some(gap) = levels.iter().position(|level| level.is_empty()) {
                return Err(ValidationError::MissingLevel {
                    attribute: name,
                    position: gap + 1,
                });
            }

            attributes.push(Attribute::new(name, levels)?);
        }

        Self::new(attributes)
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|attribute| attribute.name() == name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(Attribute::name)
    }

    /// Size of the full factorial: the product of the level counts, or zero
    /// for an empty catalog. Checked against overflow at construction.
    pub fn profile_count(&self) -> usize {
        self.profile_count
    }

    /// Total number of levels across all attributes.
    pub fn level_total(&self) -> usize {
        self.attributes.iter().map(Attribute::level_count).sum()
    }

    /// Every `attribute=level` pair in dummy-column order.
    pub fn level_keys(&self) -> Vec<LevelKey> {
        self.attributes
            .iter()
            .flat_map(|attribute| {
                attribute
                    .levels()
                    .iter()
                    .map(move |level| LevelKey::new(attribute.name(), level.as_str()))
            })
            .collect()
    }

    /// Offset of each attribute's first dummy column.
    pub(crate) fn column_offsets(&self) -> Vec<usize> {
        self.attributes
            .iter()
            .scan(0, |offset, attribute| {
                let start = *offset;
                *offset += attribute.level_count();
                Some(start)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn ragged_rows_drop_trailing_padding() {
        let catalog = AttributeCatalog::from_rows(rows(&[
            &["Color", "Red", "Blue", "Green"],
            &["Size", "S", "L", ""],
        ]))
        .expect("catalog parses");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("Size").expect("size").levels(), ["S", "L"]);
        assert_eq!(catalog.profile_count(), 6);
        assert_eq!(catalog.level_total(), 5);
        assert_eq!(catalog.column_offsets(), vec![0, 3]);
    }

    #[test]
    fn interior_gap_is_a_missing_level() {
        let err = AttributeCatalog::from_rows(rows(&[&["Color", "Red", "", "Green"]]))
            .expect_err("gap rejected");
        assert_eq!(
            err,
            ValidationError::MissingLevel {
                attribute: "Color".into(),
                position: 2
            }
        );
    }

    #[test]
    fn blank_name_reports_row() {
        let err = AttributeCatalog::from_rows(rows(&[&["Color", "Red"], &[" ", "S"]]))
            .expect_err("blank name rejected");
        assert_eq!(err, ValidationError::MissingAttributeName { row: Some(2) });
    }

    #[test]
    fn row_without_levels_is_rejected() {
        let err = AttributeCatalog::from_rows(rows(&[&["Color", "", ""]]))
            .expect_err("no levels rejected");
        assert!(matches!(err, ValidationError::EmptyAttribute { .. }));
    }

    #[test]
    fn duplicate_attribute_is_rejected() {
        let err = AttributeCatalog::from_rows(rows(&[&["Color", "Red"], &["Color", "Blue"]]))
            .expect_err("duplicate rejected");
        assert!(matches!(err, ValidationError::DuplicateAttribute { .. }));
    }

    #[test]
    fn unenumerable_factorial_is_rejected() {
        let data: Vec<Vec<String>> = (0..usize::BITS)
            .map(|index| vec![format!("Feature {index}"), "Off".into(), "On".into()])
            .collect();
        let err = AttributeCatalog::from_rows(data).expect_err("overflow rejected");
        assert_eq!(
            err,
            ValidationError::TooManyProfiles {
                attributes: usize::BITS as usize
            }
        );

        let data: Vec<Vec<String>> = (0..usize::BITS - 1)
            .map(|index| vec![format!("Feature {index}"), "Off".into(), "On".into()])
            .collect();
        let catalog = AttributeCatalog::from_rows(data).expect("largest power of two fits");
        assert_eq!(catalog.profile_count(), 1_usize << (usize::BITS - 1));
    }

    #[test]
    fn empty_catalog_has_no_profiles() {
        let catalog = AttributeCatalog::from_rows(Vec::<Vec<String>>::new()).expect("empty ok");
        assert!(catalog.is_empty());
        assert_eq!(catalog.profile_count(), 0);
        assert!(catalog.level_keys().is_empty());
    }
}
