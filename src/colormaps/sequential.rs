//! Sequential colormaps (single progression from low to high).

use colorgrad::{Color, CustomGradient};

use super::colormap::Lut;

/// Jet: dark blue through cyan, yellow and red to dark red.
pub fn jet() -> Lut {
    anchored(
        "jet",
        &[
            (0.0, [0, 0, 128]),
            (0.11, [0, 0, 255]),
            (0.125, [0, 0, 255]),
            (0.34, [0, 219, 255]),
            (0.35, [0, 229, 246]),
            (0.375, [20, 255, 226]),
            (0.64, [238, 255, 8]),
            (0.65, [246, 246, 0]),
            (0.66, [255, 236, 0]),
            (0.89, [255, 18, 0]),
            (0.91, [228, 0, 0]),
            (1.0, [128, 0, 0]),
        ],
    )
}

/// Gray: black to white.
pub fn gray() -> Lut {
    Lut::from_table("gray", &[[0, 0, 0], [255, 255, 255]])
}

pub fn viridis() -> Lut {
    Lut::from_gradient("viridis", &colorgrad::viridis())
}

pub fn plasma() -> Lut {
    Lut::from_gradient("plasma", &colorgrad::plasma())
}

pub fn inferno() -> Lut {
    Lut::from_gradient("inferno", &colorgrad::inferno())
}

pub fn magma() -> Lut {
    Lut::from_gradient("magma", &colorgrad::magma())
}

pub fn cividis() -> Lut {
    Lut::from_gradient("cividis", &colorgrad::cividis())
}

pub fn turbo() -> Lut {
    Lut::from_gradient("turbo", &colorgrad::turbo())
}

pub fn rainbow() -> Lut {
    Lut::from_gradient("rainbow", &colorgrad::rainbow())
}

/// Palette from colors pinned at explicit positions.
fn anchored(name: &str, stops: &[(f64, [u8; 3])]) -> Lut {
    let colors: Vec<Color> = stops
        .iter()
        .map(|(_, c)| Color::from_rgba8(c[0], c[1], c[2], 255))
        .collect();
    let domain: Vec<f64> = stops.iter().map(|(p, _)| *p).collect();

    match CustomGradient::new().colors(&colors).domain(&domain).build() {
        Ok(gradient) => Lut::from_gradient(name, &gradient),
        // Stops are compile-time constants; fall back to evenly spaced anchors
        Err(_) => {
            let table: Vec<[u8; 3]> = stops.iter().map(|(_, c)| *c).collect();
            Lut::from_table(name, &table)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps::Colormap;

    #[test]
    fn test_colormap_names() {
        assert_eq!(jet().name(), "jet");
        assert_eq!(gray().name(), "gray");
        assert_eq!(viridis().name(), "viridis");
        assert_eq!(plasma().name(), "plasma");
        assert_eq!(inferno().name(), "inferno");
        assert_eq!(magma().name(), "magma");
        assert_eq!(cividis().name(), "cividis");
    }

    #[test]
    fn test_jet_ends() {
        let jet = jet();
        let low = jet.map_normalized(0.0);
        let high = jet.map_normalized(1.0);
        // Dark blue at the bottom, dark red at the top
        assert!(low[2] > 100 && low[0] == 0);
        assert!(high[0] > 100 && high[2] == 0);
        // Greenish-yellow in the middle
        let mid = jet.map_normalized(0.5);
        assert!(mid[1] > 200);
    }

    #[test]
    fn test_gray_is_monotonic() {
        let gray = gray();
        let mut previous = 0u8;
        for c in gray.colors() {
            assert_eq!(c[0], c[1]);
            assert!(c[0] >= previous);
            previous = c[0];
        }
    }

    #[test]
    fn test_viridis_is_not_grayscale() {
        let c = viridis().map_normalized(0.0);
        assert_ne!(c[0], c[2]);
    }
}
