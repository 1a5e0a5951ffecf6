use super::catalog::AttributeCatalog;
use serde::Serialize;
use tracing::debug;

/// One full-factorial combination: exactly one level per attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    number: usize,
    level_indices: Vec<usize>,
}

impl Profile {
    /// 1-based position in generation order.
    pub fn number(&self) -> usize {
        self.number
    }

    /// Index of the chosen level for each attribute, in catalog order.
    pub fn level_indices(&self) -> &[usize] {
        &self.level_indices
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileLevelView {
    pub attribute: String,
    pub level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub profile_number: usize,
    pub levels: Vec<ProfileLevelView>,
}

/// Every combination of attribute levels, each exactly once.
///
/// Enumeration is nested iteration in catalog order with the last attribute
/// varying fastest. Respondents rate profiles in this order, so it must never
/// change between generating the profiles table and reading the ratings back.
#[derive(Debug, Clone)]
pub struct ProfileSet {
    catalog: AttributeCatalog,
    profiles: Vec<Profile>,
}

impl ProfileSet {
    pub fn generate(catalog: &AttributeCatalog) -> Self {
        let radices: Vec<usize> = catalog
            .attributes()
            .iter()
            .map(|attribute| attribute.level_count())
            .collect();
        let total = catalog.profile_count();

        let mut profiles = Vec::with_capacity(total);
        let mut odometer = vec![0usize; radices.len()];

        for number in 1..=total {
            profiles.push(Profile {
                number,
                level_indices: odometer.clone(),
            });
            advance(&mut odometer, &radices);
        }

        debug!(
            attributes = catalog.len(),
            profiles = profiles.len(),
            "generated full-factorial profile set"
        );

        Self {
            catalog: catalog.clone(),
            profiles,
        }
    }

    /// Attribute-to-levels mapping the profiles were generated from.
    pub fn catalog(&self) -> &AttributeCatalog {
        &self.catalog
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn get(&self, number: usize) -> Option<&Profile> {
        number
            .checked_sub(1)
            .and_then(|index| self.profiles.get(index))
    }

    /// `(attribute, level)` pairs of a profile in catalog order.
    pub fn describe<'a>(
        &'a self,
        profile: &'a Profile,
    ) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.catalog
            .attributes()
            .iter()
            .zip(profile.level_indices.iter())
            .map(|(attribute, &index)| (attribute.name(), attribute.levels()[index].as_str()))
    }

    pub fn views(&self) -> Vec<ProfileView> {
        self.profiles
            .iter()
            .map(|profile| ProfileView {
                profile_number: profile.number,
                levels: self
                    .describe(profile)
                    .map(|(attribute, level)| ProfileLevelView {
                        attribute: attribute.to_string(),
                        level: level.to_string(),
                    })
                    .collect(),
            })
            .collect()
    }
}

fn advance(odometer: &mut [usize], radices: &[usize]) {
    for position in (0..odometer.len()).rev() {
        odometer[position] += 1;
        if odometer[position] < radices[position] {
            return;
        }
        odometer[position] = 0;
    }
}
