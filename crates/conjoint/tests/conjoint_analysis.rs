use conjoint::config::AnalysisConfig;
use conjoint::workflows::conjoint::import::{
    AttributeTableImporter, ImportError, RatingTableImporter,
};
use conjoint::workflows::conjoint::{
    AttributeCatalog, ConjointAnalysis, ConjointError, DesignMatrixBuilder, ProfileSet,
    RatingMatrix, ValidationError,
};

const COLOR_SIZE: &str = "Attribute Name,Level 1,Level 2\n\
Color,Red,Blue\n\
Size,S,L\n";

fn color_size_profiles() -> ProfileSet {
    let catalog =
        AttributeTableImporter::from_reader(COLOR_SIZE.as_bytes()).expect("attribute table");
    ProfileSet::generate(&catalog)
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn two_by_two_catalog_enumerates_last_attribute_fastest() {
    let profiles = color_size_profiles();

    let combos: Vec<Vec<&str>> = profiles
        .profiles()
        .iter()
        .map(|profile| profiles.describe(profile).map(|(_, level)| level).collect())
        .collect();
    assert_eq!(
        combos,
        [
            vec!["Red", "S"],
            vec!["Red", "L"],
            vec!["Blue", "S"],
            vec!["Blue", "L"],
        ]
    );
    let numbers: Vec<usize> = profiles.profiles().iter().map(|p| p.number()).collect();
    assert_eq!(numbers, [1, 2, 3, 4]);
}

#[test]
fn identical_ratings_give_equal_part_worths_and_zero_importance() {
    let profiles = color_size_profiles();
    let ratings = "Respondent ID,Profile 1,Profile 2,Profile 3,Profile 4\n\
R1,5,5,5,5\n\
R2,5,5,5,5\n\
R3,5,5,5,5\n";
    let ratings =
        RatingTableImporter::from_reader(ratings.as_bytes(), &profiles).expect("rating table");

    let report = ConjointAnalysis::default()
        .run(&profiles, &ratings)
        .expect("analysis");

    // Minimum-norm split of 5 across two dummies per row.
    for (_, value) in report.part_worths.iter() {
        assert_close(value, 2.5);
    }
    assert_eq!(report.importances.get("Color"), Some(0.0));
    assert_eq!(report.importances.get("Size"), Some(0.0));
    assert_eq!(report.fit.observations, 12);
    assert_eq!(report.fit.rank, 3);
}

#[test]
fn extra_rating_column_is_a_shape_mismatch() {
    let profiles = color_size_profiles();
    let ratings = "Respondent ID,P1,P2,P3,P4,P5\nR1,1,2,3,4,5\n";

    let err = RatingTableImporter::from_reader(ratings.as_bytes(), &profiles)
        .expect_err("five columns for four profiles");
    match err {
        ImportError::Conjoint(ConjointError::ShapeMismatch { expected, found }) => {
            assert_eq!(expected, 4);
            assert_eq!(found, 5);
        }
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn matrix_built_for_other_profiles_is_rejected_before_estimation() {
    let profiles = color_size_profiles();
    let ratings = RatingMatrix::new(vec!["R1".into()], vec![vec![1.0, 2.0, 3.0]], 3)
        .expect("three-profile ratings");

    let err = DesignMatrixBuilder::build(&profiles, &ratings).expect_err("mismatch");
    assert_eq!(
        err,
        ConjointError::ShapeMismatch {
            expected: 4,
            found: 3
        }
    );
    let err = ConjointAnalysis::default()
        .run(&profiles, &ratings)
        .expect_err("mismatch");
    assert!(matches!(err, ConjointError::ShapeMismatch { .. }));
}

#[test]
fn missing_level_cell_fails_before_profiles_exist() {
    let table = "Attribute Name,Level 1,Level 2,Level 3\n\
Color,Red,,Blue\n\
Size,S,L,\n";

    let err = AttributeTableImporter::from_reader(table.as_bytes()).expect_err("gap");
    match err {
        ImportError::Conjoint(ConjointError::Validation(ValidationError::MissingLevel {
            attribute,
            position,
        })) => {
            assert_eq!(attribute, "Color");
            assert_eq!(position, 2);
        }
        other => panic!("expected missing level, got {other:?}"),
    }
}

#[test]
fn additive_preferences_are_recovered_up_to_level_offsets() {
    let catalog = AttributeCatalog::from_rows([
        ["Brand", "Acme", "Globex", ""],
        ["Price", "Low", "Mid", "High"],
    ])
    .expect("catalog");
    let profiles = ProfileSet::generate(&catalog);
    assert_eq!(profiles.len(), 6);

    let brand = [1.0, 0.0];
    let price = [4.0, 2.0, 0.0];
    let rows: Vec<Vec<f64>> = (0..3)
        .map(|_| {
            profiles
                .profiles()
                .iter()
                .map(|profile| {
                    let levels = profile.level_indices();
                    brand[levels[0]] + price[levels[1]]
                })
                .collect()
        })
        .collect();
    let ratings = RatingMatrix::new(vec!["a".into(), "b".into(), "c".into()], rows, 6)
        .expect("ratings");

    let report = ConjointAnalysis::new(&AnalysisConfig::default())
        .run(&profiles, &ratings)
        .expect("analysis");

    let pw = &report.part_worths;
    let worth = |attribute: &str, level: &str| pw.get(attribute, level).expect("estimated");
    let brand_gap = worth("Brand", "Acme") - worth("Brand", "Globex");
    assert_close(brand_gap, 1.0);
    let price_gap = worth("Price", "Low") - worth("Price", "High");
    assert_close(price_gap, 4.0);
    assert!(report.fit.residual_sum_of_squares < 1e-12);

    assert_close(report.importances.get("Brand").expect("brand"), 20.0);
    assert_close(report.importances.get("Price").expect("price"), 80.0);
    assert_close(report.importances.total(), 100.0);

    let insights = report.insights();
    assert_eq!(insights.leading_attribute.as_deref(), Some("Price"));
    let preferred: Vec<&str> = insights
        .preferred_profile
        .iter()
        .map(|level| level.level.as_str())
        .collect();
    assert_eq!(preferred, ["Acme", "Low"]);
}

#[test]
fn reruns_produce_identical_results() {
    let profiles = color_size_profiles();
    let ratings = RatingMatrix::new(
        vec!["R1".into(), "R2".into()],
        vec![vec![3.0, 9.0, 1.0, 6.0], vec![2.0, 8.0, 4.0, 5.0]],
        4,
    )
    .expect("ratings");

    let analysis = ConjointAnalysis::default();
    let first = analysis.run(&profiles, &ratings).expect("first");
    let second = analysis.run(&profiles, &ratings).expect("second");
    assert_eq!(first.part_worths, second.part_worths);
    assert_eq!(first.importances, second.importances);
}
