//! Shared test utilities for `quickshift-core`.

use proptest::{prelude::*, test_runner::Config as ProptestConfig};
use quickshift_test_support::ci::property_test_profile::ProptestRunProfile;

use crate::Dataset;

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `QUICKSHIFT_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Lays out a 3x3 unit grid around each centre.
///
/// Within a grid the centre point is strictly the densest, edge points come
/// next and corners last, so each grid holds exactly one density mode when
/// linking within four neighbours. Grids are emitted in centre order.
pub(crate) fn grid_blobs(centres: &[(f32, f32)]) -> Dataset {
    let mut rows = Vec::with_capacity(centres.len() * 9);
    for &(cx, cy) in centres {
        for dy in [-1.0, 0.0, 1.0] {
            for dx in [-1.0, 0.0, 1.0] {
                rows.push(vec![cx + dx, cy + dy]);
            }
        }
    }
    Dataset::from_rows("grid-blobs", rows).expect("grid rows are valid")
}

/// Generates small 2-D datasets with integer-valued coordinates.
///
/// Coarse coordinates make duplicates and equal distances common, which is
/// where tie handling matters most.
pub(crate) fn small_dataset(max_points: usize) -> impl Strategy<Value = Dataset> {
    prop::collection::vec((-20_i16..20, -20_i16..20), 2..=max_points).prop_map(|points| {
        let rows = points
            .into_iter()
            .map(|(x, y)| vec![f32::from(x), f32::from(y)])
            .collect();
        Dataset::from_rows("proptest", rows).expect("generated rows are valid")
    })
}

/// Draws `per_blob` points from an isotropic Gaussian around each centre.
///
/// Coordinates are continuous, so densities are free of exact ties.
#[expect(clippy::float_arithmetic, reason = "Box-Muller transform")]
#[expect(
    clippy::cast_possible_truncation,
    reason = "test coordinates fit comfortably in f32"
)]
pub(crate) fn gaussian_blobs(centres: &[(f32, f32)], per_blob: usize, seed: u64) -> Dataset {
    use rand::{Rng, SeedableRng, rngs::SmallRng};

    let mut rng = SmallRng::seed_from_u64(seed);
    let mut normal = move || {
        let radius = (-2.0 * rng.gen_range(f64::EPSILON..1.0).ln()).sqrt();
        let angle = std::f64::consts::TAU * rng.gen_range(0.0..1.0);
        (radius * angle.cos(), radius * angle.sin())
    };
    let mut rows = Vec::with_capacity(centres.len() * per_blob);
    for &(cx, cy) in centres {
        for _ in 0..per_blob {
            let (dx, dy) = normal();
            rows.push(vec![cx + dx as f32 * 2.0, cy + dy as f32 * 2.0]);
        }
    }
    Dataset::from_rows("gaussian-blobs", rows).expect("blob rows are valid")
}
