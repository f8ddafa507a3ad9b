use ndarray::{Array2, ArrayView2};

/// Spatial moments of a single-channel image up to the first order.
///
/// Pixel values act as weights, so for a binary mask `m00` is
/// `max_value * count` of foreground pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// Mass center `(m10 / m00, m01 / m00)`, or `None` for an empty image
    pub fn centroid(&self) -> Option<(f64, f64)> {
        if self.m00 > 0.0 {
            Some((self.m10 / self.m00, self.m01 / self.m00))
        } else {
            None
        }
    }
}

/// Maps every pixel to `max_value` when `pixel >= threshold` and to 0 otherwise
pub fn binarize(frame: &ArrayView2<u8>, threshold: u8, max_value: u8) -> Array2<u8> {
    frame.mapv(|v| if v >= threshold { max_value } else { 0 })
}

/// Zeroth and first order moments. Rows are `y`, columns are `x`.
pub fn moments(image: &ArrayView2<u8>) -> Moments {
    let mut m = Moments::default();
    for ((y, x), &v) in image.indexed_iter() {
        if v == 0 {
            continue;
        }
        let v = v as f64;
        m.m00 += v;
        m.m10 += x as f64 * v;
        m.m01 += y as f64 * v;
    }
    m
}
