use super::catalog::AttributeCatalog;
use super::estimator::PartWorthUtilities;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeImportance {
    pub attribute: String,
    /// Spread `max - min` of the attribute's part-worths.
    pub range: f64,
    /// Share of the summed spread, in percent.
    pub importance: f64,
}

/// Importance per attribute in catalog order. Sums to 100, or is all zero
/// when no attribute's levels differ in utility.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeImportances {
    entries: Vec<AttributeImportance>,
}

impl AttributeImportances {
    pub fn iter(&self) -> impl Iterator<Item = &AttributeImportance> {
        self.entries.iter()
    }

    pub fn get(&self, attribute: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|entry| entry.attribute == attribute)
            .map(|entry| entry.importance)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.importance).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most important attribute; the earliest declared wins ties.
    pub fn leading(&self) -> Option<&AttributeImportance> {
        self.entries.iter().fold(None, |best, entry| match best {
            Some(current) if current.importance >= entry.importance => Some(current),
            _ => Some(entry),
        })
    }
}

pub struct ImportanceScorer;

impl ImportanceScorer {
    pub fn score(
        part_worths: &PartWorthUtilities,
        catalog: &AttributeCatalog,
    ) -> AttributeImportances {
        let ranges: Vec<f64> = (0..catalog.len())
            .map(|index| spread(part_worths.for_attribute(index).unwrap_or(&[])))
            .collect();

        // Round-off on constant ratings must not be normalised into shares.
        let total: f64 = ranges.iter().sum();
        let degenerate = total <= part_worths.noise_floor();

        let entries = catalog
            .attributes()
            .iter()
            .zip(ranges)
            .map(|(attribute, range)| AttributeImportance {
                attribute: attribute.name().to_string(),
                range,
                importance: if degenerate {
                    0.0
                } else {
                    100.0 * range / total
                },
            })
            .collect();

        AttributeImportances { entries }
    }
}

fn spread(values: &[f64]) -> f64 {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    if values.is_empty() {
        0.0
    } else {
        max - min
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::conjoint::design::DesignMatrixBuilder;
    use crate::workflows::conjoint::estimator::UtilityEstimator;
    use crate::workflows::conjoint::profiles::ProfileSet;
    use crate::workflows::conjoint::ratings::RatingMatrix;

    fn score(ratings: Vec<Vec<f64>>) -> AttributeImportances {
        let catalog = AttributeCatalog::from_rows(vec![
            vec!["Color", "Red", "Blue"],
            vec!["Size", "S", "L"],
        ])
        .expect("catalog");
        let profiles = ProfileSet::generate(&catalog);
        let respondents = (1..=ratings.len()).map(|n| format!("r{n}")).collect();
        let ratings = RatingMatrix::new(respondents, ratings, 4).expect("ratings");
        let (design, target) = DesignMatrixBuilder::build(&profiles, &ratings).expect("design");
        let estimate = UtilityEstimator::default()
            .fit(&design, &target)
            .expect("fit");
        ImportanceScorer::score(&estimate.part_worths, &catalog)
    }

    #[test]
    fn importance_is_share_of_total_spread() {
        // Color spread 2, Size spread 6
        let importances = score(vec![vec![0.0, 6.0, 2.0, 8.0]]);
        assert!((importances.get("Color").expect("color") - 25.0).abs() < 1e-9);
        assert!((importances.get("Size").expect("size") - 75.0).abs() < 1e-9);
        assert!((importances.total() - 100.0).abs() < 1e-9);
        assert_eq!(importances.leading().expect("leader").attribute, "Size");
    }

    #[test]
    fn constant_ratings_score_zero_everywhere() {
        let importances = score(vec![vec![5.0; 4], vec![5.0; 4], vec![5.0; 4]]);
        assert_eq!(importances.len(), 2);
        assert!(importances.iter().all(|entry| entry.importance == 0.0));
        assert_eq!(importances.total(), 0.0);
    }

    #[test]
    fn small_spreads_on_a_large_offset_still_count() {
        let base = 1.0e6;
        let importances = score(vec![vec![base, base + 1e-4, base + 2e-4, base + 3e-4]]);
        let color = importances.get("Color").expect("color");
        let size = importances.get("Size").expect("size");
        assert!((color - 200.0 / 3.0).abs() < 1e-2, "color = {color}");
        assert!((size - 100.0 / 3.0).abs() < 1e-2, "size = {size}");
        assert!((importances.total() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn order_follows_catalog_declaration() {
        let importances = score(vec![vec![1.0, 9.0, 2.0, 3.0]]);
        let names: Vec<&str> = importances
            .iter()
            .map(|entry| entry.attribute.as_str())
            .collect();
        assert_eq!(names, ["Color", "Size"]);
    }

    #[test]
    fn ties_lead_with_the_first_declared_attribute() {
        let importances = score(vec![vec![0.0, 2.0, 2.0, 4.0]]);
        assert!((importances.get("Color").expect("color") - 50.0).abs() < 1e-9);

        let entry = |attribute: &str| AttributeImportance {
            attribute: attribute.to_string(),
            range: 1.0,
            importance: 50.0,
        };
        let tied = AttributeImportances {
            entries: vec![entry("Color"), entry("Size")],
        };
        assert_eq!(tied.leading().expect("leader").attribute, "Color");
        assert!(AttributeImportances::default().leading().is_none());
    }

    #[test]
    fn spread_of_empty_slice_is_zero() {
        assert_eq!(spread(&[]), 0.0);
        assert_eq!(spread(&[3.0, -1.0, 2.0]), 4.0);
    }
}
