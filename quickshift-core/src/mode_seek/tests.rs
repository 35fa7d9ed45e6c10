use super::{ExactClusterer, ModeSeeker, ParentForest};
use crate::{
    ClusteringResult, Dataset, DensityEstimator, DensityModel, KnnDensity, QuickShiftError,
    error::DatasetError,
    test_utils::{grid_blobs, small_dataset, suite_proptest_config},
};
use proptest::prelude::*;
use rstest::rstest;

fn line(values: &[f32]) -> Dataset {
    Dataset::from_rows("line", values.iter().map(|&v| vec![v]).collect()).expect("rows are valid")
}

fn knn_densities(dataset: &Dataset, neighbourhood: usize) -> Vec<f32> {
    let model = KnnDensity::new().fit(dataset).expect("fit must succeed");
    dataset
        .rows()
        .map(|row| model.density(row, neighbourhood).expect("query must succeed"))
        .collect()
}

#[test]
fn separates_two_grids() {
    let dataset = grid_blobs(&[(0.0, 0.0), (100.0, 100.0)]);
    let labels = ModeSeeker::new()
        .assign(&dataset, 4)
        .expect("assignment must succeed");
    let mut expected = vec![0; 9];
    expected.extend(vec![1; 9]);
    assert_eq!(labels, expected);
}

#[test]
fn single_peak_collapses_to_one_cluster() {
    let dataset = line(&[0.0, 1.0, 2.0, 3.0, 4.0]);
    let densities = [1.0, 2.0, 5.0, 2.0, 1.0];
    let labels = ModeSeeker::new()
        .assign_with_densities(&dataset, 4, &densities)
        .expect("assignment must succeed");
    assert_eq!(labels, vec![0; 5]);
}

#[test]
fn equal_densities_never_link_each_other() {
    // Points 1 and 2 tie on density, so both stay roots.
    let dataset = line(&[0.0, 1.0, -2.0]);
    let densities = [1.0, 5.0, 5.0];
    let seeker = ModeSeeker::new();
    let forest = seeker
        .parent_forest(&dataset, 2, &densities)
        .expect("forest must build");
    assert_eq!(forest.parents(), &[1, 1, 2]);

    let labels = seeker
        .assign_with_densities(&dataset, 2, &densities)
        .expect("assignment must succeed");
    assert_eq!(labels, vec![0, 0, 1]);
}

#[test]
fn equal_density_candidates_prefer_the_closer_neighbour() {
    // Point 0 sees points 2 and 1 (in that distance order) with equal
    // densities and links to point 2.
    let dataset = line(&[0.0, -2.0, 1.0, 10.0]);
    let densities = [1.0, 5.0, 5.0, 0.5];
    let forest = ModeSeeker::new()
        .parent_forest(&dataset, 3, &densities)
        .expect("forest must build");
    assert_eq!(forest.parents(), &[2, 1, 2, 2]);
}

#[test]
fn labels_follow_first_reached_root() {
    // Point 0 drains into the mode at point 3, which therefore receives
    // label 0 even though point 1 is also a root.
    let mut forest = ParentForest::from_parents(vec![3, 1, 1, 3]).expect("parents are valid");
    assert_eq!(
        forest.resolve_labels().expect("forest must resolve"),
        vec![0, 1, 1, 0]
    );
}

#[test]
fn duplicate_points_resolve_without_cycles() {
    let dataset = Dataset::from_rows(
        "dupes",
        vec![
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![1.0, 1.0],
            vec![5.0, 5.0],
        ],
    )
    .expect("rows are valid");
    let labels = ModeSeeker::new()
        .assign(&dataset, 2)
        .expect("assignment must succeed");
    assert_eq!(labels.len(), 4);
    ClusteringResult::from_labels(labels).expect("labels must be contiguous");
}

#[test]
fn resolution_compresses_paths_onto_roots() {
    let mut forest = ParentForest::from_parents(vec![1, 2, 3, 3]).expect("parents are valid");
    forest.resolve_labels().expect("forest must resolve");
    assert_eq!(forest.parents(), &[3, 3, 3, 3]);
}

#[test]
fn compression_keeps_separate_trees_apart() {
    let mut forest =
        ParentForest::from_parents(vec![1, 2, 3, 3, 5, 6, 6]).expect("parents are valid");
    assert_eq!(forest.resolve_labels().expect("forest must resolve"), [0, 0, 0, 0, 1, 1, 1]);
    assert_eq!(forest.parents(), &[3, 3, 3, 3, 6, 6, 6]);
    assert_eq!(forest.root_of(4).expect("point is in range"), 6);
}

#[test]
fn empty_forest_resolves_trivially() {
    let mut forest = ParentForest::from_parents(Vec::new()).expect("empty is valid");
    assert!(forest.is_empty());
    assert!(forest.resolve_labels().expect("empty resolves").is_empty());
}

#[rstest]
#[case(vec![1, 0], QuickShiftError::ParentCycle { point: 0, limit: 2 })]
#[case(vec![1, 2, 0], QuickShiftError::ParentCycle { point: 0, limit: 3 })]
fn cycles_are_reported(#[case] parents: Vec<usize>, #[case] expected: QuickShiftError) {
    let mut forest = ParentForest::from_parents(parents).expect("pointers are in range");
    assert_eq!(forest.resolve_labels(), Err(expected));
}

#[test]
fn out_of_range_parents_are_rejected() {
    let err = ParentForest::from_parents(vec![0, 5]).expect_err("pointer is out of range");
    assert_eq!(err, QuickShiftError::ParentOutOfBounds { point: 1, parent: 5 });
}

#[rstest]
#[case(0, QuickShiftError::ZeroNeighbourhood)]
#[case(3, QuickShiftError::NeighbourhoodTooLarge { neighbours: 3, items: 3 })]
#[case(7, QuickShiftError::NeighbourhoodTooLarge { neighbours: 7, items: 3 })]
fn rejects_invalid_neighbourhoods(#[case] neighbours: usize, #[case] expected: QuickShiftError) {
    let dataset = line(&[0.0, 1.0, 2.0]);
    let err = ModeSeeker::new()
        .assign(&dataset, neighbours)
        .expect_err("neighbourhood must be rejected");
    assert_eq!(err, expected);
}

#[rstest]
#[case(vec![1.0, 2.0], QuickShiftError::DensityLengthMismatch { expected: 3, actual: 2 })]
#[case(vec![1.0, -0.5, 2.0], QuickShiftError::InvalidDensity { point: 1, value: -0.5 })]
#[case(
    vec![1.0, 2.0, f32::INFINITY],
    QuickShiftError::InvalidDensity { point: 2, value: f32::INFINITY }
)]
fn rejects_invalid_densities(#[case] densities: Vec<f32>, #[case] expected: QuickShiftError) {
    let dataset = line(&[0.0, 1.0, 2.0]);
    let err = ModeSeeker::new()
        .assign_with_densities(&dataset, 1, &densities)
        .expect_err("densities must be rejected");
    assert_eq!(err, expected);
}

#[test]
fn nan_density_is_rejected() {
    let dataset = line(&[0.0, 1.0, 2.0]);
    let err = ModeSeeker::new()
        .assign_with_densities(&dataset, 1, &[0.0, f32::NAN, 1.0])
        .expect_err("NaN must be rejected");
    assert!(matches!(err, QuickShiftError::InvalidDensity { point: 1, .. }));
}

#[test]
fn empty_dataset_is_invalid_input() {
    let err = super::validate_neighbourhood(0, 1).expect_err("empty input must fail");
    assert_eq!(err, QuickShiftError::InvalidDataset(DatasetError::Empty));
}

#[test]
fn closures_act_as_exact_clusterers() {
    let constant = |dataset: &Dataset, _neighbours: usize| -> crate::Result<Vec<usize>> {
        Ok(vec![0; dataset.len()])
    };
    let dataset = line(&[0.0, 1.0]);
    assert_eq!(
        constant.cluster_exact(&dataset, 1).expect("closure succeeds"),
        vec![0, 0]
    );
    assert_eq!(
        ModeSeeker::new()
            .cluster_exact(&dataset, 1)
            .expect("exact clustering succeeds"),
        vec![0, 1]
    );
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn labels_form_a_contiguous_partition(
        (dataset, neighbours) in small_dataset(40).prop_flat_map(|dataset| {
            let items = dataset.len();
            (Just(dataset), 1..items)
        })
    ) {
        let labels = ModeSeeker::new().assign(&dataset, neighbours)?;
        prop_assert_eq!(labels.len(), dataset.len());
        // First appearance order means the first point always opens cluster 0
        // and each new label is exactly one above the previous maximum.
        let mut next = 0;
        for &label in &labels {
            prop_assert!(label <= next);
            if label == next {
                next += 1;
            }
        }
    }

    #[test]
    fn assignment_is_deterministic(
        (dataset, neighbours) in small_dataset(30).prop_flat_map(|dataset| {
            let items = dataset.len();
            (Just(dataset), 1..items)
        })
    ) {
        let seeker = ModeSeeker::new();
        let first = seeker.assign(&dataset, neighbours)?;
        let second = seeker.assign(&dataset, neighbours)?;
        prop_assert_eq!(first, second);
    }

    #[test]
    fn every_chain_climbs_to_a_mode(
        (dataset, neighbours) in small_dataset(30).prop_flat_map(|dataset| {
            let items = dataset.len();
            (Just(dataset), 1..items)
        })
    ) {
        let densities = knn_densities(&dataset, neighbours * 2);
        let forest = ModeSeeker::new().parent_forest(&dataset, neighbours, &densities)?;
        for point in 0..dataset.len() {
            let parent = forest.parent(point).expect("point is in range");
            prop_assert!(parent == point || densities[parent] > densities[point]);
            let root = forest.root_of(point)?;
            prop_assert!(densities[root] >= densities[point]);
            prop_assert_eq!(forest.parent(root), Some(root));
        }
    }
}
