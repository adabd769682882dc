//! Title rating aggregation.
//!
//! A title's rating is never stored: it is the mean of its review scores,
//! recomputed on every read.

/// Decimal places kept in a presented rating.
pub const RATING_PRECISION: i32 = 2;

/// Mean of `scores`, rounded to [`RATING_PRECISION`] decimal places.
///
/// Returns `None` for a title with no reviews.
pub fn average_score<I>(scores: I) -> Option<f64>
where
    I: IntoIterator<Item = i16>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0_i64, 0_u32), |(sum, count), s| (sum + i64::from(s), count + 1));

    if count == 0 {
        return None;
    }

    let mean = sum as f64 / f64::from(count);
    let factor = 10_f64.powi(RATING_PRECISION);
    Some((mean * factor).round() / factor)
}
