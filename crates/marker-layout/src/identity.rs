//! Deterministic marker identity.
//!
//! A marker is identified by the set of features it shows, not by where it is
//! or in which order its features were discovered. The id is the 32-bit
//! string hash (`hash * 31 + code_unit`, wrapping) of the feature ids rendered
//! as text, sorted, and joined with `_`. Text is processed as UTF-16 code
//! units so that ids match the ones computed by browser map SDK plugins for
//! the same features.

use marker_layout_core::feature::{FeatureId, LngLat};

/// Identifier of a marker, stable across updates for the same feature set.
pub type MarkerId = i32;

const SEPARATOR: u16 = b'_' as u16;

/// Computes the id of a marker from the ids of its features.
///
/// The result does not depend on the order of `ids`.
///
/// # Examples
///
/// ```
/// # use marker_layout::identity::compute_group_id;
/// # use marker_layout_core::feature::FeatureId;
/// let forward = [FeatureId::Number(1), FeatureId::Number(2)];
/// let backward = [FeatureId::Number(2), FeatureId::Number(1)];
///
/// assert_eq!(compute_group_id(&forward), compute_group_id(&backward));
/// // "1_2" hashed code unit by code unit
/// assert_eq!(compute_group_id(&forward), 50084);
/// ```
pub fn compute_group_id<'a, I>(ids: I) -> MarkerId
where
    I: IntoIterator<Item = &'a FeatureId>,
{
    let mut texts: Vec<Vec<u16>> = ids
        .into_iter()
        .map(|id| id.to_string().encode_utf16().collect())
        .collect();
    texts.sort_unstable();

    string_hash(&texts.join(&SEPARATOR))
}

/// Rolling 32-bit string hash over UTF-16 code units.
fn string_hash(code_units: &[u16]) -> MarkerId {
    code_units.iter().fold(0i32, |hash, &unit| {
        hash.wrapping_mul(31).wrapping_add(i32::from(unit))
    })
}

/// Identity of a coordinate pair, used to merge features drawn at the same spot.
///
/// Uses the exact bit patterns of both coordinates so that distinct nearby
/// points never alias. Positive and negative zero are the same coordinate.
pub fn coordinate_key(coordinates: LngLat) -> (u64, u64) {
    (
        canonical_bits(coordinates.lng()),
        canonical_bits(coordinates.lat()),
    )
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 { 0 } else { value.to_bits() }
}
