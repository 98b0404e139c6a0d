//! Placeholder values for when the model path is unavailable

use rand::Rng;
use sheetfill_domain::{NormalizedRecord, Scalar};

/// Replace every null cell with a random value in `[min, max]`
///
/// Values are rounded to two decimals. Cells that already hold a value are
/// left as they are, and no row or column is added or removed.
pub fn placeholder_fill_with<R: Rng>(
    record: &NormalizedRecord,
    min: f64,
    max: f64,
    rng: &mut R,
) -> NormalizedRecord {
    let mut filled = record.clone();
    for (_, row) in filled.iter_mut() {
        for value in row.values_mut() {
            if value.is_none() {
                let sample = if min < max { rng.random_range(min..=max) } else { min };
                *value = Some(Scalar::Number(round_cents(sample)));
            }
        }
    }
    filled
}

/// [`placeholder_fill_with`] using the thread-local RNG
pub fn placeholder_fill(record: &NormalizedRecord, min: f64, max: f64) -> NormalizedRecord {
    placeholder_fill_with(record, min, max, &mut rand::rng())
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
