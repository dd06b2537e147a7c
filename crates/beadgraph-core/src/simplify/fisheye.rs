//! Radial ("fisheye") distortion of node positions.
//!
//! For a node at distance `d` from the focal point, with `t = min(d / r, 1)`:
//!
//! ```text
//! factor = strength * t * (1 - t²) + t    when t < 1
//!        = 1                              otherwise
//! position = focal + (origin - focal) * factor
//! ```
//!
//! Nodes at the focal point, or at `r` and beyond, keep their origin. Inside
//! the radius, nodes past roughly `r / 4` are pushed outward (at `r / 2` the
//! factor is 1.625) and nodes closer in are drawn toward the focal point.
//!
//! The transform reads `origin` and writes `position`; it never reads its
//! own output, so applying it twice with the same focal point is the same as
//! applying it once.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::GraphError;

/// A 2-D coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Lens parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FisheyeLens {
    /// Full-strength radius in layout units.
    pub radius: f64,
    /// Magnification strength.
    pub strength: f64,
}

impl Default for FisheyeLens {
    fn default() -> Self {
        Self {
            radius: 200.0,
            strength: 3.0,
        }
    }
}

impl FisheyeLens {
    /// Reject lenses that cannot produce a finite transform.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidFisheye`] when `radius` is not a finite positive
    /// number or `strength` is not finite.
    pub fn validate(self) -> Result<Self, GraphError> {
        if self.radius.is_finite() && self.radius > 0.0 && self.strength.is_finite() {
            Ok(self)
        } else {
            Err(GraphError::InvalidFisheye {
                radius: self.radius,
                strength: self.strength,
            })
        }
    }

    /// Displaced position of `origin` for a lens centred on `focal`.
    ///
    /// Assumes a validated lens and finite inputs.
    #[must_use]
    pub fn displace(self, origin: Point, focal: Point) -> Point {
        let d = origin.distance(focal);
        // The factor is exactly 1 from `r` outward, including past `2r`.
        if d == 0.0 || d >= self.radius {
            return origin;
        }

        let t = d / self.radius;
        let factor = self.strength.mul_add(t * t.mul_add(-t, 1.0), t);

        Point {
            x: (origin.x - focal.x).mul_add(factor, focal.x),
            y: (origin.y - focal.y).mul_add(factor, focal.y),
        }
    }
}

/// Something with an undistorted origin and a displayed position.
pub trait Placed {
    fn id(&self) -> &str;
    fn origin(&self) -> Point;
    fn set_position(&mut self, position: Point);
}

/// Distort every node around `focal`, returning new nodes.
///
/// # Errors
///
/// - [`GraphError::InvalidFisheye`] for a non-positive or non-finite radius.
/// - [`GraphError::NonFiniteCoordinate`] when `focal` or any node origin
///   holds NaN or an infinity. The id `"<focal>"` names the focal point.
#[instrument(skip(nodes), fields(nodes = nodes.len()))]
pub fn apply_fisheye<N>(nodes: &[N], focal: Point, lens: FisheyeLens) -> Result<Vec<N>, GraphError>
where
    N: Placed + Clone,
{
    let lens = lens.validate()?;
    if !focal.is_finite() {
        return Err(GraphError::NonFiniteCoordinate {
            id: "<focal>".to_string(),
            x: focal.x,
            y: focal.y,
        });
    }

    nodes
        .iter()
        .map(|node| {
            let origin = node.origin();
            if !origin.is_finite() {
                return Err(GraphError::NonFiniteCoordinate {
                    id: node.id().to_string(),
                    x: origin.x,
                    y: origin.y,
                });
            }
            let mut out = node.clone();
            out.set_position(lens.displace(origin, focal));
            Ok(out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Dot {
        id: &'static str,
        origin: Point,
        position: Point,
    }

    impl Dot {
        fn at(id: &'static str, x: f64, y: f64) -> Self {
            let p = Point::new(x, y);
            Self {
                id,
                origin: p,
                position: p,
            }
        }
    }

    impl Placed for Dot {
        fn id(&self) -> &str {
            self.id
        }
        fn origin(&self) -> Point {
            self.origin
        }
        fn set_position(&mut self, position: Point) {
            self.position = position;
        }
    }

    const FOCAL: Point = Point::new(100.0, 100.0);

    fn one(dot: Dot) -> Dot {
        apply_fisheye(&[dot], FOCAL, FisheyeLens::default())
            .expect("valid lens")
            .remove(0)
    }

    #[test]
    fn node_at_focal_point_is_unchanged() {
        let out = one(Dot::at("a", 100.0, 100.0));
        assert_eq!(out.position, FOCAL);
    }

    #[test]
    fn node_beyond_twice_radius_is_unchanged() {
        let out = one(Dot::at("far", 100.0 + 401.0, 100.0));
        assert_eq!(out.position, out.origin);
    }

    #[test]
    fn node_at_half_radius_moves_outward() {
        let dot = Dot::at("near", 200.0, 100.0);
        let before = dot.origin.distance(FOCAL);
        let out = one(dot);
        let after = out.position.distance(FOCAL);
        assert!(after > before, "{after} should exceed {before}");
        // t = 0.5: factor = 3 * 0.5 * 0.75 + 0.5 = 1.625
        assert!((out.position.x - (100.0 + 100.0 * 1.625)).abs() < 1e-9);
        assert!((out.position.y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn between_radius_and_twice_radius_factor_is_identity() {
        let out = one(Dot::at("mid", 100.0 + 300.0, 100.0));
        assert_eq!(out.position, out.origin);
    }

    #[test]
    fn direction_is_preserved() {
        let out = one(Dot::at("diag", 150.0, 50.0));
        let dx = out.position.x - FOCAL.x;
        let dy = out.position.y - FOCAL.y;
        assert!(dx > 0.0 && dy < 0.0);
        assert!((dx + dy).abs() < 1e-9);
    }

    #[test]
    fn reapplying_is_idempotent() {
        let dots = vec![
            Dot::at("a", 120.0, 90.0),
            Dot::at("b", 300.0, 300.0),
            Dot::at("c", 100.0, 100.0),
        ];
        let lens = FisheyeLens::default();
        let once = apply_fisheye(&dots, FOCAL, lens).expect("once");
        let twice = apply_fisheye(&once, FOCAL, lens).expect("twice");
        assert_eq!(once, twice);
    }

    #[test]
    fn non_finite_origin_is_rejected() {
        let err = apply_fisheye(&[Dot::at("bad", f64::NAN, 0.0)], FOCAL, FisheyeLens::default())
            .expect_err("NaN must fail");
        assert!(matches!(err, GraphError::NonFiniteCoordinate { ref id, .. } if id == "bad"));
    }

    #[test]
    fn non_finite_focal_is_rejected() {
        let err = apply_fisheye(
            &[Dot::at("a", 0.0, 0.0)],
            Point::new(f64::INFINITY, 0.0),
            FisheyeLens::default(),
        )
        .expect_err("infinite focal must fail");
        assert_eq!(err.code(), "G1001");
    }

    #[test]
    fn zero_radius_is_rejected() {
        let lens = FisheyeLens {
            radius: 0.0,
            strength: 3.0,
        };
        let err = apply_fisheye(&[Dot::at("a", 0.0, 0.0)], FOCAL, lens).expect_err("zero radius");
        assert_eq!(err.code(), "G1002");
    }

    #[test]
    fn empty_input_is_fine() {
        let out: Vec<Dot> = apply_fisheye(&[], FOCAL, FisheyeLens::default()).expect("empty");
        assert!(out.is_empty());
    }
}
