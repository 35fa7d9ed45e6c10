use quickshift_core::Dataset;

/// Lays out a 3x3 unit grid around each centre; the centre of every grid is
/// its unique density mode when linking within four neighbours.
#[must_use]
pub fn grid_blobs(centres: &[(f32, f32)]) -> Dataset {
    let rows = centres
        .iter()
        .flat_map(|&(cx, cy)| {
            [-1.0, 0.0, 1.0]
                .into_iter()
                .flat_map(move |dy| [-1.0, 0.0, 1.0].map(|dx| vec![cx + dx, cy + dy]))
        })
        .collect();
    Dataset::from_rows("grid", rows).expect("grid rows are valid")
}
