//! Mapping between device pixels on the zoomed view and image-space marker
//! coordinates.
//!
//! Image-space is what gets stored; device-space is only ever used for
//! drawing and for reading pointer positions.

/// Converts a pointer position on the zoomed view to image-space.
///
/// The result is truncated towards zero so markers land on whole image pixels.
pub fn to_image_space(device_x: f64, device_y: f64, zoom_factor: f64) -> (f64, f64) {
    (
        (device_x / zoom_factor).trunc(),
        (device_y / zoom_factor).trunc(),
    )
}

/// Converts an image-space position to the device pixel it is drawn at.
pub fn to_device_space(x: f64, y: f64, zoom_factor: f64) -> (f64, f64) {
    ((x * zoom_factor).round(), (y * zoom_factor).round())
}
