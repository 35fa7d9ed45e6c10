use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use proptest::prelude::*;
use rand::{SeedableRng, rngs::SmallRng};
use rstest::rstest;

use super::{
    ExtensionFallback, FixedProbability, SampleOrigin, SampledAccelerator, SamplingConfig,
    SamplingPolicy, SqrtSampling, recursive_neighbourhood, renumber_labels, sampling::Sample,
};
use crate::{
    ClusteringResult, Dataset, DensityError, DensityEstimator, DensityModel, FlatIndexBuilder,
    ModeSeeker, QuickShiftError, Result, cluster_scaled,
    test_utils::{gaussian_blobs, suite_proptest_config},
};

/// Density read straight off the first coordinate: points left of 500 all
/// score 1.0, points right of it score `x - 900`.
#[derive(Clone, Copy, Debug, Default)]
struct CoordinateDensity;

impl DensityEstimator for CoordinateDensity {
    type Model = Self;

    fn fit(&self, _reference: &Dataset) -> std::result::Result<Self::Model, DensityError> {
        Ok(Self)
    }
}

impl DensityModel for CoordinateDensity {
    fn density(&self, point: &[f32], _neighbourhood: usize) -> std::result::Result<f32, DensityError> {
        let x = point.first().copied().unwrap_or_default();
        Ok(if x >= 500.0 { x - 900.0 } else { 1.0 })
    }
}

/// A flat plateau of 88 points next to a distant, strictly denser ridge of
/// 12 points.
fn plateau_and_ridge() -> Dataset {
    let plateau = (0..88_u16).map(|x| vec![f32::from(x), 0.0]);
    let ridge = (0..12_u16).map(|x| vec![1000.0 + f32::from(x), 0.0]);
    Dataset::from_rows("plateau", plateau.chain(ridge).collect()).expect("rows are valid")
}

fn accelerator_with(config: SamplingConfig) -> SampledAccelerator<ModeSeeker> {
    SampledAccelerator::new(ModeSeeker::new()).with_config(config)
}

#[rstest]
#[case(1, 0)]
#[case(2, 1)]
#[case(3, 2)]
#[case(4, 3)]
#[case(100, 46)]
fn recursive_neighbourhood_is_rounded_sqrt_log(#[case] size: usize, #[case] expected: usize) {
    assert_eq!(recursive_neighbourhood(size), expected);
}

#[test]
fn full_sampling_matches_exact_clustering() {
    let dataset = gaussian_blobs(&[(-30.0, -30.0), (30.0, 30.0)], 100, 3);
    let outcome = accelerator_with(SamplingConfig::default().with_policy(FixedProbability(1.0)))
        .assign_large(&dataset, 10)
        .expect("scaled clustering must succeed");

    assert_eq!(outcome.sample.len(), 200);
    assert_eq!(outcome.sample.count_origin(SampleOrigin::DensityAugmented), 0);
    assert_eq!(outcome.recursive_neighbours, 75);

    let exact = ModeSeeker::new()
        .assign(&dataset, outcome.recursive_neighbours)
        .expect("exact clustering must succeed");
    let scaled = ClusteringResult::from_labels(outcome.labels).expect("labels are contiguous");
    let reference = ClusteringResult::from_labels(exact).expect("labels are contiguous");
    assert!(scaled.same_partition(&reference));
}

#[test]
fn densest_points_are_always_sampled() {
    let dataset = gaussian_blobs(&[(0.0, 0.0), (40.0, 0.0)], 200, 5);
    let config = SamplingConfig::default()
        .with_seed(9)
        .with_extension_fallback(ExtensionFallback::NearestSample);
    let outcome = accelerator_with(config)
        .assign_large(&dataset, 8)
        .expect("scaled clustering must succeed");
    let mut ranking: Vec<usize> = (0..dataset.len()).collect();
    ranking.sort_by(|&a, &b| {
        outcome.densities[b]
            .total_cmp(&outcome.densities[a])
            .then(a.cmp(&b))
    });
    // ⌈√400⌉ = 20
    for &point in ranking.iter().take(20) {
        assert!(outcome.sample.contains(point), "point {point} missing");
    }
    assert_eq!(outcome.labels.len(), dataset.len());
}

#[test]
fn extension_inherits_from_denser_sample_points() {
    let dataset = gaussian_blobs(&[(0.0, 0.0), (50.0, 50.0)], 200, 21);
    let outcome = accelerator_with(SamplingConfig::default().with_policy(FixedProbability(0.03)))
        .assign_large(&dataset, 8)
        .expect("scaled clustering must succeed");

    let members = outcome.sample.indices();
    for point in (0..dataset.len()).filter(|&p| !outcome.sample.contains(p)) {
        let label = outcome.labels[point];
        let own = outcome.densities[point];
        assert!(
            members
                .iter()
                .any(|&m| outcome.labels[m] == label && outcome.densities[m] > own),
            "point {point} inherited from a sparser sample point"
        );
    }
    ClusteringResult::from_labels(outcome.labels).expect("labels are contiguous");
}

#[test]
fn plateau_points_without_denser_neighbours_are_unresolved() {
    let dataset = plateau_and_ridge();
    let accelerator =
        SampledAccelerator::with_collaborators(ModeSeeker::new(), FlatIndexBuilder, CoordinateDensity)
            .with_config(SamplingConfig::default().with_policy(FixedProbability(0.5)));
    let err = accelerator
        .assign_large(&dataset, 4)
        .expect_err("plateau points cannot be extended");
    assert!(
        matches!(err, QuickShiftError::UnresolvedExtension { point, .. } if point < 88),
        "{err:?}"
    );
}

#[test]
fn nearest_sample_fallback_labels_plateau_points() {
    let dataset = plateau_and_ridge();
    let config = SamplingConfig::default()
        .with_policy(FixedProbability(0.5))
        .with_extension_fallback(ExtensionFallback::NearestSample);
    let outcome =
        SampledAccelerator::with_collaborators(ModeSeeker::new(), FlatIndexBuilder, CoordinateDensity)
            .with_config(config)
            .assign_large(&dataset, 4)
            .expect("fallback must resolve every point");
    assert_eq!(outcome.labels.len(), dataset.len());
    ClusteringResult::from_labels(outcome.labels).expect("labels are contiguous");
}

#[test]
fn empty_random_sample_is_degenerate() {
    let dataset = gaussian_blobs(&[(0.0, 0.0)], 50, 1);
    let err = accelerator_with(SamplingConfig::default().with_policy(FixedProbability(0.0)))
        .assign_large(&dataset, 5)
        .expect_err("nothing was sampled");
    assert_eq!(
        err,
        QuickShiftError::DegenerateSample {
            sample_size: 0,
            neighbours: 0
        }
    );
}

#[rstest]
#[case(1.5)]
#[case(-0.1)]
#[case(f64::NAN)]
fn out_of_range_probabilities_are_rejected(#[case] probability: f64) {
    let dataset = gaussian_blobs(&[(0.0, 0.0)], 20, 1);
    let err = accelerator_with(SamplingConfig::default().with_policy(move |_: usize| probability))
        .assign_large(&dataset, 3)
        .expect_err("probability must be rejected");
    assert!(
        matches!(err, QuickShiftError::InvalidSamplingProbability { items: 20, .. }),
        "{err:?}"
    );
}

#[test]
fn recursive_step_uses_sample_neighbourhood() {
    let seen = Arc::new(AtomicUsize::new(0));
    let recorder = {
        let seen = Arc::clone(&seen);
        move |sample: &Dataset, neighbours: usize| -> Result<Vec<usize>> {
            seen.store(neighbours, Ordering::Relaxed);
            Ok(vec![0; sample.len()])
        }
    };
    let dataset = gaussian_blobs(&[(0.0, 0.0)], 100, 4);
    let outcome = SampledAccelerator::new(recorder)
        .with_config(SamplingConfig::default().with_extension_fallback(ExtensionFallback::NearestSample))
        .assign_large(&dataset, 5)
        .expect("scaled clustering must succeed");
    assert_eq!(
        seen.load(Ordering::Relaxed),
        recursive_neighbourhood(outcome.sample.len())
    );
    assert_eq!(outcome.recursive_neighbours, seen.load(Ordering::Relaxed));
    assert!(outcome.labels.iter().all(|&label| label == 0));
}

#[test]
fn short_label_vectors_are_rejected() {
    let truncating = |sample: &Dataset, _: usize| -> Result<Vec<usize>> {
        Ok(vec![0; sample.len() - 1])
    };
    let dataset = gaussian_blobs(&[(0.0, 0.0)], 100, 4);
    let err = SampledAccelerator::new(truncating)
        .assign_large(&dataset, 5)
        .expect_err("label count must match the sample");
    assert!(matches!(err, QuickShiftError::SampleLabelMismatch { .. }), "{err:?}");
}

#[rstest]
#[case(vec![], vec![])]
#[case(vec![7, 7, 3, 9, 3], vec![0, 0, 1, 2, 1])]
#[case(vec![1, 0, 1], vec![0, 1, 0])]
fn labels_are_renumbered_by_first_appearance(
    #[case] labels: Vec<usize>,
    #[case] expected: Vec<usize>,
) {
    assert_eq!(renumber_labels(labels), expected);
}

#[test]
fn sparse_recursive_labels_come_back_contiguous() {
    let sparse = |sample: &Dataset, _: usize| -> Result<Vec<usize>> {
        Ok((0..sample.len()).map(|member| 10 + 5 * (member % 2)).collect())
    };
    let dataset = gaussian_blobs(&[(0.0, 0.0)], 100, 4);
    let outcome = SampledAccelerator::new(sparse)
        .with_config(SamplingConfig::default().with_extension_fallback(ExtensionFallback::NearestSample))
        .assign_large(&dataset, 5)
        .expect("scaled clustering must succeed");
    assert_eq!(outcome.labels.len(), dataset.len());
    assert!(outcome.labels.iter().all(|&label| label < 2), "{:?}", outcome.labels);
    let result = ClusteringResult::from_labels(outcome.labels).expect("labels are contiguous");
    assert_eq!(result.cluster_count(), 2);
}

#[test]
fn default_scaled_clustering_extends_from_denser_points() {
    let dataset = gaussian_blobs(&[(0.0, 0.0)], 400, 17);
    // Scores densities against the whole random sample.
    let neighbours = dataset.len() - 1;
    let result = cluster_scaled(&dataset, neighbours).expect("scaled clustering must succeed");
    assert_eq!(result.assignments().len(), dataset.len());

    let outcome = SampledAccelerator::new(ModeSeeker::new())
        .assign_large(&dataset, neighbours)
        .expect("scaled clustering must succeed");
    let members = outcome.sample.indices();
    for point in (0..dataset.len()).filter(|&p| !outcome.sample.contains(p)) {
        let label = outcome.labels[point];
        let own = outcome.densities[point];
        assert!(
            members
                .iter()
                .any(|&m| outcome.labels[m] == label && outcome.densities[m] > own),
            "point {point} inherited from a sparser sample point"
        );
    }
    let repeated = ClusteringResult::from_labels(outcome.labels).expect("labels are contiguous");
    assert_eq!(repeated, result);
}

#[test]
fn random_sample_size_averages_square_root() {
    let items = 10_000;
    let probability = SqrtSampling.inclusion_probability(items);
    let trials = 40_u32;
    let total: usize = (0..trials)
        .map(|seed| {
            let mut rng = SmallRng::seed_from_u64(u64::from(seed));
            Sample::draw(items, probability, &mut rng).len()
        })
        .sum();
    let mean = total as f64 / f64::from(trials);
    assert!((mean - 100.0).abs() < 10.0, "mean sample size {mean}");
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn random_sample_stays_near_square_root(seed in any::<u64>(), items in 400_usize..4_000) {
        let probability = SqrtSampling.inclusion_probability(items);
        let mut rng = SmallRng::seed_from_u64(seed);
        let drawn = Sample::draw(items, probability, &mut rng).len() as f64;
        let expected = (items as f64).sqrt();
        // Binomial sd is below sqrt(expected); allow six of them.
        prop_assert!((drawn - expected).abs() <= 6.0 * expected.sqrt() + 1.0,
            "drew {} for expected {}", drawn, expected);
    }
}
