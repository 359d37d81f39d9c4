use crate::marker::Marker;

/// Distance, in image-space units, within which a secondary click picks a marker.
pub const PICK_RADIUS: f64 = 10.0;

/// Index of the first marker within `radius` of `(x, y)`.
///
/// Markers are scanned in insertion order, so when several overlap the
/// earliest-created one wins.
pub fn find_hit(markers: &[Marker], x: f64, y: f64, radius: f64) -> Option<usize> {
    markers
        .iter()
        .position(|marker| marker.distance_to(x, y) <= radius)
}
