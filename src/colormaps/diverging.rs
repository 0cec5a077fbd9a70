//! Diverging colormaps (two-hue progression with center).
//!
//! These colormaps are suitable for anomalies and velocities that diverge
//! from a central value.

use super::colormap::Lut;

/// Coolwarm: blue to red through light gray.
pub fn coolwarm() -> Lut {
    Lut::from_table("coolwarm", &COOLWARM)
}

/// Seismic: dark blue through white to dark red.
pub fn seismic() -> Lut {
    Lut::from_table("seismic", &SEISMIC)
}

/// RdBu: red through white to blue.
pub fn rdbu() -> Lut {
    Lut::from_gradient("rdbu", &colorgrad::rd_bu())
}

pub fn spectral() -> Lut {
    Lut::from_gradient("spectral", &colorgrad::spectral())
}

const COOLWARM: [[u8; 3]; 17] = [
    [59, 76, 192],
    [77, 104, 215],
    [98, 130, 234],
    [119, 154, 247],
    [141, 176, 254],
    [163, 194, 255],
    [184, 208, 249],
    [204, 217, 238],
    [221, 221, 221],
    [236, 211, 197],
    [245, 196, 173],
    [247, 177, 148],
    [244, 154, 123],
    [236, 127, 99],
    [222, 96, 77],
    [203, 62, 56],
    [180, 4, 38],
];

const SEISMIC: [[u8; 3]; 5] = [
    [0, 0, 77],
    [0, 0, 255],
    [255, 255, 255],
    [255, 0, 0],
    [128, 0, 0],
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::Colormap;

    #[test]
    fn test_colormap_names() {
        assert_eq!(coolwarm().name(), "coolwarm");
        assert_eq!(rdbu().name(), "rdbu");
        assert_eq!(seismic().name(), "seismic");
    }

    #[test]
    fn test_coolwarm_bounds() {
        let colormap = coolwarm();

        let blue = colormap.map_normalized(0.0);
        let red = colormap.map_normalized(1.0);
        assert!(blue[2] > blue[0]);
        assert!(red[0] > red[2]);

        // Middle should be close to light gray
        let middle = colormap.map_normalized(0.5);
        assert!(middle.iter().take(3).all(|&c| c > 200));
    }

    #[test]
    fn test_seismic_middle() {
        let middle = seismic().map_normalized(0.5);
        assert!(middle.iter().take(3).all(|&c| c >= 250));
    }
}
