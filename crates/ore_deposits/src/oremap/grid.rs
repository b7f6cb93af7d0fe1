//! Square density grid cached per region and deposit code.
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A square grid of densities in `0..=255`.
///
/// The last `bottom_right_padding` rows and columns duplicate the next region's first cells
/// so that bilinear sampling at the far edge of the unpadded area never reads out of range.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OreMap {
    size: usize,
    bottom_right_padding: usize,
    data: Vec<u8>,
}

impl OreMap {
    /// Creates a grid from row-major data (`z * size + x`).
    ///
    /// Returns `None` if `data.len() != size * size` or the padding leaves no inner cells.
    pub fn new(size: usize, bottom_right_padding: usize, data: Vec<u8>) -> Option<Self> {
        if data.len() != size * size || bottom_right_padding >= size {
            return None;
        }
        Some(Self {
            size,
            bottom_right_padding,
            data,
        })
    }

    /// Creates a grid where every cell holds `value`.
    pub fn uniform(size: usize, bottom_right_padding: usize, value: u8) -> Option<Self> {
        Self::new(size, bottom_right_padding, vec![value; size * size])
    }

    /// Edge length including padding.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Edge length excluding padding.
    #[inline]
    pub fn inner_size(&self) -> usize {
        self.size - self.bottom_right_padding
    }

    #[inline]
    pub fn bottom_right_padding(&self) -> usize {
        self.bottom_right_padding
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Cell value, or `0` outside the grid.
    #[inline]
    pub fn get(&self, x: usize, z: usize) -> u8 {
        if x >= self.size || z >= self.size {
            return 0;
        }
        self.data[z * self.size + x]
    }

    /// Bilinearly interpolated density at fractional cell coordinates of the unpadded area.
    ///
    /// Coordinates are clamped into `[0, inner_size - 1]`; the right and bottom neighbours
    /// come from the padding when sampling the last inner cell.
    pub fn sample_lerped(&self, x: f32, z: f32) -> f32 {
        let max = (self.inner_size() - 1) as f32;
        let x = x.clamp(0.0, max);
        let z = z.clamp(0.0, max);

        let x0 = x.floor() as usize;
        let z0 = z.floor() as usize;
        let x1 = (x0 + 1).min(self.size - 1);
        let z1 = (z0 + 1).min(self.size - 1);

        let fx = x - x0 as f32;
        let fz = z - z0 as f32;

        let v00 = f32::from(self.get(x0, z0));
        let v10 = f32::from(self.get(x1, z0));
        let v01 = f32::from(self.get(x0, z1));
        let v11 = f32::from(self.get(x1, z1));

        let top = v00 * (1.0 - fx) + v10 * fx;
        let bottom = v01 * (1.0 - fx) + v11 * fx;
        top * (1.0 - fz) + bottom * fz
    }
}
