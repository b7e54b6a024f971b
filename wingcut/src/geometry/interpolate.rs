use glam::IVec2;

/// Turns sparse pointer samples into one point per integer column.
///
/// Samples are ordered by x; when several share a column the last one wins.
/// Each column in `[min_x, max_x]` gets a y linearly interpolated between the
/// neighbouring samples, truncated towards zero.
pub fn interpolate_track(points: &[IVec2]) -> Vec<IVec2> {
    let mut samples = points.to_vec();
    samples.sort_by_key(|p| p.x);
    samples.dedup_by(|later, kept| {
        if later.x == kept.x {
            *kept = *later;
            true
        } else {
            false
        }
    });

    let (Some(first), Some(last)) = (samples.first().copied(), samples.last().copied()) else {
        return Vec::new();
    };

    let span = i64::from(last.x) - i64::from(first.x) + 1;
    let mut dense = Vec::with_capacity(usize::try_from(span).unwrap_or(0));
    let mut segment = 0;
    for x in first.x..=last.x {
        while segment + 1 < samples.len() - 1 && samples[segment + 1].x <= x {
            segment += 1;
        }

        let y = match samples.get(segment + 1) {
            Some(&next) => {
                let start = samples[segment];
                let t = (x as f64 - start.x as f64) / (next.x as f64 - start.x as f64);
                start.y as f64 + (next.y as f64 - start.y as f64) * t
            }
            None => samples[segment].y as f64,
        };
        dense.push(IVec2::new(x, y as i32));
    }

    dense
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(i32, i32)]) -> Vec<IVec2> {
        raw.iter().map(|&(x, y)| IVec2::new(x, y)).collect()
    }

    #[test]
    fn one_point_per_column_without_gaps() {
        let dense = interpolate_track(&pts(&[(40, 10), (10, 0), (25, 30)]));
        assert_eq!(dense.len(), 31);
        for (i, p) in dense.iter().enumerate() {
            assert_eq!(p.x, 10 + i as i32);
        }
        assert_eq!(dense[0].y, 0);
        assert_eq!(dense[15].y, 30);
        assert_eq!(dense[30].y, 10);
    }

    #[test]
    fn interpolated_values_truncate() {
        let dense = interpolate_track(&pts(&[(0, 0), (3, 2)]));
        // 0, 0.667, 1.333, 2
        assert_eq!(dense, pts(&[(0, 0), (1, 0), (2, 1), (3, 2)]));
    }

    #[test]
    fn duplicate_columns_keep_last_sample() {
        let dense = interpolate_track(&pts(&[(200, 50), (200, 100), (200, 150)]));
        assert_eq!(dense, pts(&[(200, 150)]));

        let dense = interpolate_track(&pts(&[(0, 0), (4, 8), (4, 4)]));
        assert_eq!(dense.last().copied(), Some(IVec2::new(4, 4)));
        assert_eq!(dense[2].y, 2);
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let dense = interpolate_track(&pts(&[(i32::MAX - 2, i32::MIN), (i32::MAX, i32::MAX)]));
        assert_eq!(dense.len(), 3);
        assert_eq!(dense[0], IVec2::new(i32::MAX - 2, i32::MIN));
        assert_eq!(dense[2], IVec2::new(i32::MAX, i32::MAX));
    }

    #[test]
    fn empty_track_is_empty() {
        assert!(interpolate_track(&[]).is_empty());
    }

    #[test]
    fn reversed_input_matches_sorted_input() {
        let forward = pts(&[(0, 5), (5, 10), (10, 0)]);
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(interpolate_track(&forward), interpolate_track(&backward));
    }
}
