//! Collision queries against the terrain polygon
//!
//! The terrain boundary is a simple closed polygon. We answer the three
//! questions the rest of the simulation asks of it:
//! - what is directly below this point (ground snapping)
//! - is this point inside the terrain (projectile impact)
//! - where does this segment first enter the terrain (fast projectiles)

use glam::Vec2;

/// Result of a ray or segment query that hit the terrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Contact point on the boundary
    pub point: Vec2,
    /// Outward surface normal at the contact (unit length)
    pub normal: Vec2,
    /// Distance travelled from the query origin
    pub distance: f32,
}

/// Ground query used by the surface aligner
pub trait GroundQuery {
    /// Cast a ray straight down from `origin`.
    ///
    /// Returns `None` when there is no ground beneath the point. An origin
    /// already inside the ground reports a hit at the origin with an
    /// upward normal.
    fn cast_ray_down(&self, origin: Vec2) -> Option<RayHit>;
}

/// Signed polygon area (positive for counter-clockwise winding)
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum();
    twice / 2.0
}

/// Static collider built from the terrain boundary
#[derive(Debug, Clone)]
pub struct TerrainCollider {
    points: Vec<Vec2>,
    /// Outward normal of edge i (points[i] -> points[i + 1])
    normals: Vec<Vec2>,
}

impl TerrainCollider {
    pub fn new(points: Vec<Vec2>) -> Self {
        let clockwise = signed_area(&points) < 0.0;
        let n = points.len();
        let normals = (0..n)
            .map(|i| {
                let d = points[(i + 1) % n] - points[i];
                // Interior lies right of a clockwise edge, left of a counter-clockwise one
                let outward = if clockwise {
                    Vec2::new(-d.y, d.x)
                } else {
                    Vec2::new(d.y, -d.x)
                };
                outward.normalize_or_zero()
            })
            .collect();
        Self { points, normals }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2, Vec2)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n], self.normals[i]))
    }

    /// Even-odd point containment
    pub fn contains_point(&self, p: Vec2) -> bool {
        let mut inside = false;
        for (a, b, _) in self.edges() {
            if (a.y > p.y) != (b.y > p.y) {
                let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// First boundary crossing along the segment `from -> to`
    pub fn segment_hit(&self, from: Vec2, to: Vec2) -> Option<RayHit> {
        let dir = to - from;
        let len = dir.length();
        if len < 1e-6 {
            return None;
        }

        let mut best: Option<(f32, Vec2, Vec2)> = None;
        for (a, b, normal) in self.edges() {
            let edge = b - a;
            let denom = dir.perp_dot(edge);
            if denom.abs() < 1e-9 {
                continue; // Parallel
            }
            let diff = a - from;
            let t = diff.perp_dot(edge) / denom;
            let u = diff.perp_dot(dir) / denom;
            let closer = best.map(|(bt, _, _)| t < bt).unwrap_or(true);
            if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) && closer {
                best = Some((t, from + dir * t, normal));
            }
        }

        best.map(|(t, point, normal)| RayHit {
            point,
            normal,
            distance: t * len,
        })
    }
}

impl GroundQuery for TerrainCollider {
    fn cast_ray_down(&self, origin: Vec2) -> Option<RayHit> {
        if self.contains_point(origin) {
            return Some(RayHit {
                point: origin,
                normal: Vec2::Y,
                distance: 0.0,
            });
        }

        let mut best: Option<RayHit> = None;
        for (a, b, normal) in self.edges() {
            let dx = b.x - a.x;
            if dx.abs() < 1e-9 {
                continue; // Vertical edge runs along the ray
            }
            let (lo, hi) = if a.x < b.x { (a.x, b.x) } else { (b.x, a.x) };
            if origin.x < lo || origin.x > hi {
                continue;
            }
            let t = (origin.x - a.x) / dx;
            let y = a.y + (b.y - a.y) * t;
            if y > origin.y {
                continue;
            }
            let distance = origin.y - y;
            if best.map(|h| distance < h.distance).unwrap_or(true) {
                best = Some(RayHit {
                    point: Vec2::new(origin.x, y),
                    normal,
                    distance,
                });
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clockwise wedge: floor from (4,-1) to (0,-1), slope up to (2,2), down to (4,0)
    fn wedge() -> TerrainCollider {
        TerrainCollider::new(vec![
            Vec2::new(4.0, -1.0),
            Vec2::new(0.0, -1.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 2.0),
            Vec2::new(4.0, 0.0),
        ])
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert!((signed_area(&ccw) - 1.0).abs() < 1e-6);
        let cw: Vec<Vec2> = ccw.iter().rev().copied().collect();
        assert!((signed_area(&cw) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_contains_point() {
        let c = wedge();
        assert!(c.contains_point(Vec2::new(2.0, 1.0)));
        assert!(c.contains_point(Vec2::new(1.0, -0.5)));
        assert!(!c.contains_point(Vec2::new(2.0, 3.0)));
        assert!(!c.contains_point(Vec2::new(0.5, 1.0)));
        assert!(!c.contains_point(Vec2::new(5.0, 0.0)));
    }

    #[test]
    fn test_cast_ray_down_on_slope() {
        let c = wedge();
        let hit = c.cast_ray_down(Vec2::new(1.0, 5.0)).unwrap();
        assert!((hit.point - Vec2::new(1.0, 1.0)).length() < 1e-5);
        assert!((hit.distance - 4.0).abs() < 1e-5);
        // Left slope rises to the right: outward normal leans left and up
        assert!(hit.normal.x < 0.0 && hit.normal.y > 0.0);
        assert!((hit.normal.length() - 1.0).abs() < 1e-5);

        let hit = c.cast_ray_down(Vec2::new(3.0, 5.0)).unwrap();
        assert!((hit.point.y - 1.0).abs() < 1e-5);
        assert!(hit.normal.x > 0.0 && hit.normal.y > 0.0);
    }

    #[test]
    fn test_cast_ray_down_miss() {
        let c = wedge();
        assert!(c.cast_ray_down(Vec2::new(-1.0, 5.0)).is_none());
        assert!(c.cast_ray_down(Vec2::new(5.0, 5.0)).is_none());
        // Below everything
        assert!(c.cast_ray_down(Vec2::new(2.0, -3.0)).is_none());
    }

    #[test]
    fn test_cast_ray_down_from_inside() {
        let c = wedge();
        let origin = Vec2::new(2.0, 0.5);
        let hit = c.cast_ray_down(origin).unwrap();
        assert_eq!(hit.point, origin);
        assert_eq!(hit.normal, Vec2::Y);
        assert_eq!(hit.distance, 0.0);
    }

    #[test]
    fn test_segment_hit() {
        let c = wedge();
        let hit = c
            .segment_hit(Vec2::new(2.0, 5.0), Vec2::new(2.0, -5.0))
            .unwrap();
        assert!((hit.point - Vec2::new(2.0, 2.0)).length() < 1e-5);
        assert!((hit.distance - 3.0).abs() < 1e-5);

        assert!(c
            .segment_hit(Vec2::new(-2.0, 5.0), Vec2::new(6.0, 5.0))
            .is_none());
    }
}
