//! Colour ramps for choropleth fills.
//!
//! A ramp of CSS color stops is sampled in Oklab, then split into
//! equal-width value classes.

use crate::{HouselensError, Result};
use palette::{FromColor, IntoColor, LinSrgb, Mix, Oklab, Srgb};
use serde::Serialize;

/// ColorBrewer YlOrRd, light to dark.
pub const YL_OR_RD: &[&str] = &[
    "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c", "#bd0026",
    "#800026",
];

/// Number of classes the price choropleth is split into.
pub const CHOROPLETH_CLASSES: usize = 6;

// =============================================================================
// Color Interpolation
// =============================================================================

/// Evenly spaced colors along a ramp, mixed in Oklab. The first and last
/// outputs are the first and last stops.
///
/// # Example
/// ```
/// use houselens::present::colour::{interpolate_colors, YL_OR_RD};
///
/// let ramp = interpolate_colors(YL_OR_RD, 6).unwrap();
/// assert_eq!(ramp.len(), 6);
/// assert_eq!(ramp[0], "#ffffcc");
/// ```
pub fn interpolate_colors(colors: &[&str], count: usize) -> Result<Vec<String>> {
    let ramp = Ramp::parse(colors)?;
    let last = count.saturating_sub(1).max(1) as f32;
    Ok((0..count).map(|i| hex(ramp.at(i as f32 / last))).collect())
}

/// Color stops in Oklab.
struct Ramp {
    stops: Vec<Oklab<f32>>,
}

impl Ramp {
    fn parse(colors: &[&str]) -> Result<Self> {
        if colors.is_empty() {
            return Err(HouselensError::ValidationError(
                "A color ramp needs at least one stop".to_string(),
            ));
        }
        let stops = colors
            .iter()
            .map(|&c| {
                let parsed = csscolorparser::parse(c).map_err(|e| {
                    HouselensError::ValidationError(format!("Invalid color '{}': {}", c, e))
                })?;
                let srgb = Srgb::new(parsed.r as f32, parsed.g as f32, parsed.b as f32);
                Ok(Oklab::from_color(LinSrgb::from(srgb)))
            })
            .collect::<Result<_>>()?;
        Ok(Self { stops })
    }

    /// Color at `t` in `[0, 1]`.
    fn at(&self, t: f32) -> Oklab<f32> {
        let gaps = self.stops.len() - 1;
        if gaps == 0 {
            return self.stops[0];
        }
        let pos = t.clamp(0.0, 1.0) * gaps as f32;
        let lower = (pos as usize).min(gaps - 1);
        self.stops[lower].mix(self.stops[lower + 1], pos - lower as f32)
    }
}

fn hex(color: Oklab<f32>) -> String {
    let lin: LinSrgb<f32> = color.into_color();
    let rgb: Srgb<u8> = Srgb::<f32>::from(lin).into_format();
    format!("#{:x}", rgb)
}

// =============================================================================
// Value Classes
// =============================================================================

/// A value interval and its fill color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorClass {
    pub lower: f64,
    pub upper: f64,
    pub color: String,
}

/// Equal-width classes over a value range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorScale {
    classes: Vec<ColorClass>,
}

impl ColorScale {
    /// Split the range of `values` into `count` equal-width classes colored
    /// along `ramp`. A single distinct value gets one class with the darkest
    /// color; no values gives no classes.
    pub fn equal_width(values: &[f64], count: usize, ramp: &[&str]) -> Result<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let Some(lo) = finite.iter().copied().reduce(f64::min) else {
            return Ok(Self { classes: vec![] });
        };
        let hi = finite.iter().copied().fold(lo, f64::max);

        if lo == hi || count <= 1 {
            let color = interpolate_colors(ramp, ramp.len())?
                .pop()
                .unwrap_or_default();
            return Ok(Self {
                classes: vec![ColorClass {
                    lower: lo,
                    upper: hi,
                    color,
                }],
            });
        }

        let colors = interpolate_colors(ramp, count)?;
        let width = (hi - lo) / count as f64;
        let classes = colors
            .into_iter()
            .enumerate()
            .map(|(i, color)| ColorClass {
                lower: lo + width * i as f64,
                upper: if i + 1 == count { hi } else { lo + width * (i + 1) as f64 },
                color,
            })
            .collect();
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[ColorClass] {
        &self.classes
    }

    /// Color of the class containing `value`; values outside the range clamp
    /// to the nearest class.
    pub fn color_for(&self, value: f64) -> Option<&str> {
        let first = self.classes.first()?;
        let idx = self
            .classes
            .iter()
            .position(|c| value < c.upper)
            .unwrap_or(self.classes.len() - 1);
        let class = if value < first.lower { first } else { &self.classes[idx] };
        Some(class.color.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_endpoints() {
        let colors = interpolate_colors(&["#ffffcc", "#800026"], 3).unwrap();
        assert_eq!(colors.len(), 3);
        assert_eq!(colors[0], "#ffffcc");
        assert_eq!(colors[2], "#800026");
    }

    #[test]
    fn test_interpolate_edge_counts() {
        assert!(interpolate_colors(YL_OR_RD, 0).unwrap().is_empty());
        assert_eq!(interpolate_colors(&["red"], 3).unwrap(), vec!["#ff0000"; 3]);
        assert!(interpolate_colors(&[], 3).is_err());
        assert!(interpolate_colors(&["notacolor"], 3).is_err());
    }

    #[test]
    fn test_equal_width_classes() {
        let scale = ColorScale::equal_width(&[0.0, 60.0, 30.0], 6, YL_OR_RD).unwrap();
        assert_eq!(scale.classes().len(), 6);
        assert_eq!(scale.classes()[0].lower, 0.0);
        assert_eq!(scale.classes()[5].upper, 60.0);
        assert_eq!(scale.color_for(0.0), Some("#ffffcc"));
        assert_eq!(scale.color_for(60.0), Some("#800026"));
        assert_eq!(scale.color_for(-5.0), Some("#ffffcc"));
        assert_eq!(scale.color_for(1e9), Some("#800026"));
    }

    #[test]
    fn test_single_value_and_empty() {
        let scale = ColorScale::equal_width(&[5.0, 5.0], 6, YL_OR_RD).unwrap();
        assert_eq!(scale.classes().len(), 1);
        assert_eq!(scale.color_for(5.0), Some("#800026"));

        let empty = ColorScale::equal_width(&[], 6, YL_OR_RD).unwrap();
        assert!(empty.classes().is_empty());
        assert_eq!(empty.color_for(1.0), None);
    }
}
