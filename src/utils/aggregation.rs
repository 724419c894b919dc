use chrono::NaiveDate;

/// Merge consecutive points of a dated count series so that at most
/// `target_points` remain. Each merged point carries the first date of its
/// window and the sum of its counts.
pub fn aggregate_data(
    data: &[(NaiveDate, usize)],
    target_points: usize,
) -> Vec<(NaiveDate, usize)> {
    if target_points == 0 || data.len() <= target_points {
        return data.to_vec();
    }

    let window_size = data.len().div_ceil(target_points);
    data.chunks(window_size)
        .map(|chunk| {
            let date = chunk[0].0; // Use first date in chunk
            let total: usize = chunk.iter().map(|(_, count)| *count).sum();
            (date, total)
        })
        .collect()
}
