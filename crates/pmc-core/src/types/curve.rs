//! Sampled PDF / CDF curves.

use serde::{Deserialize, Serialize};

/// One `(x, y)` sample of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

/// An ordered sequence of points representing a PDF or a CDF.
///
/// For a CDF produced by the engine: `x` strictly increasing, `y`
/// non-decreasing within `[0, 1]`, and the last `y` exactly `1.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistributionCurve {
    points: Vec<CurvePoint>,
}

impl DistributionCurve {
    pub fn new(points: Vec<CurvePoint>) -> Self {
        Self { points }
    }

    /// Zip two equal-length slices into a curve. Extra entries are dropped.
    pub fn from_xy(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            points: xs
                .iter()
                .zip(ys)
                .map(|(&x, &y)| CurvePoint { x, y })
                .collect(),
        }
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn into_points(self) -> Vec<CurvePoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.y).collect()
    }

    pub fn first(&self) -> Option<&CurvePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&CurvePoint> {
        self.points.last()
    }

    /// Distance between the first and last `x`. Zero for fewer than two points.
    pub fn span(&self) -> f64 {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) if self.points.len() > 1 => b.x - a.x,
            _ => 0.0,
        }
    }

    /// Average `x` spacing, or `None` when it cannot be inferred.
    pub fn native_spacing(&self) -> Option<f64> {
        if self.points.len() < 2 {
            return None;
        }
        let step = self.span() / (self.points.len() - 1) as f64;
        (step.is_finite() && step > 0.0).then_some(step)
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.x.is_finite() && p.y.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_xy_and_spacing() {
        let c = DistributionCurve::from_xy(&[0.0, 1.0, 2.0, 3.0], &[0.0, 0.2, 0.7, 1.0]);
        assert_eq!(c.len(), 4);
        assert_eq!(c.span(), 3.0);
        assert_eq!(c.native_spacing(), Some(1.0));
    }

    #[test]
    fn test_spacing_undefined_for_single_point() {
        let c = DistributionCurve::from_xy(&[1.0], &[1.0]);
        assert_eq!(c.native_spacing(), None);
        assert_eq!(c.span(), 0.0);
    }

    #[test]
    fn test_serializes_as_point_array() {
        let c = DistributionCurve::from_xy(&[0.0, 1.0], &[0.0, 1.0]);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"[{"x":0.0,"y":0.0},{"x":1.0,"y":1.0}]"#);
    }
}
