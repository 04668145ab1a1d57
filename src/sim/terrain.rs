//! Procedural terrain profile
//!
//! The terrain is a single Gaussian hill across the playable span:
//! `y = height · exp(-(x - width/2)² / (width/6)²)`.
//!
//! From the sampled top profile we build:
//! - a render mesh (top profile, a bottom rail at y = 0, and two corners at
//!   the floor of the viewport so the fill reaches below the visible area)
//! - a closed collision boundary (viewport corners, then the top profile)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::TerrainCollider;
use crate::error::ConfigError;

/// Raw terrain generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    /// Playable horizontal span
    pub width: f32,
    /// Peak elevation of the hill
    pub height: f32,
    /// Number of sample intervals across `width`
    pub resolution: i32,
    /// Half height of the orthographic view (corner placement)
    pub viewport_half_height: f32,
}

impl TerrainParams {
    /// Reject parameters that cannot produce a terrain
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.width.is_finite() {
            return Err(ConfigError::NonFinite { field: "width" });
        }
        if !self.height.is_finite() {
            return Err(ConfigError::NonFinite { field: "height" });
        }
        if !self.viewport_half_height.is_finite() {
            return Err(ConfigError::NonFinite {
                field: "viewport_half_height",
            });
        }
        if self.width <= 0.0 {
            return Err(ConfigError::NonPositiveWidth { width: self.width });
        }
        if self.height < 0.0 {
            return Err(ConfigError::NegativeHeight {
                height: self.height,
            });
        }
        if self.resolution < 0 {
            return Err(ConfigError::NegativeResolution {
                resolution: self.resolution,
            });
        }
        if self.viewport_half_height <= 0.0 {
            return Err(ConfigError::NonPositiveViewport {
                half_height: self.viewport_half_height,
            });
        }
        Ok(())
    }
}

/// Orthographic camera framing for a terrain of a given width
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Half of the visible world height
    pub half_height: f32,
    /// Camera center in world space
    pub center: Vec2,
}

impl Viewport {
    /// Fit the view to exactly `width` world units horizontally.
    ///
    /// The camera is raised so that `height_ratio` of the view height sits
    /// above y = 0. `aspect` is screen width over screen height and must be
    /// positive.
    pub fn fit(width: f32, aspect: f32, height_ratio: f32) -> Self {
        let target_height = width / aspect;
        Self {
            half_height: target_height / 2.0,
            center: Vec2::new(width / 2.0, target_height * height_ratio / 2.0),
        }
    }
}

/// Triangle mesh handed to the renderer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainMesh {
    pub vertices: Vec<Vec2>,
    /// Triangle list, three indices per triangle, counter-clockwise
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate over triangles as vertex triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec2; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }
}

/// Height of the Gaussian hill at `x`
#[inline]
pub fn gaussian_height(width: f32, height: f32, x: f32) -> f32 {
    let spread = width / 6.0;
    let dx = x - width / 2.0;
    height * (-(dx * dx) / (spread * spread)).exp()
}

/// Generated terrain; immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainProfile {
    width: f32,
    height: f32,
    /// Sample intervals actually used (at least one)
    intervals: usize,
    viewport_half_height: f32,
    /// Top profile, strictly increasing in x
    samples: Vec<Vec2>,
    mesh: TerrainMesh,
    /// Closed polygon; the closing edge back to the first point is implicit
    boundary: Vec<Vec2>,
}

impl TerrainProfile {
    /// Build the profile, mesh and collision boundary.
    ///
    /// A resolution of zero still produces a two-point profile (both
    /// terrain edges), so the boundary always closes into a polygon.
    pub fn generate(
        width: f32,
        height: f32,
        resolution: i32,
        viewport_half_height: f32,
    ) -> Result<Self, ConfigError> {
        Self::from_params(&TerrainParams {
            width,
            height,
            resolution,
            viewport_half_height,
        })
    }

    pub fn from_params(params: &TerrainParams) -> Result<Self, ConfigError> {
        params.validate()?;

        let width = params.width;
        let height = params.height;
        let floor = -params.viewport_half_height;
        let intervals = params.resolution.max(1) as usize;

        let samples: Vec<Vec2> = (0..=intervals)
            .map(|i| {
                let x = i as f32 / intervals as f32 * width;
                Vec2::new(x, gaussian_height(width, height, x))
            })
            .collect();

        let corner_left = Vec2::new(0.0, floor);
        let corner_right = Vec2::new(width, floor);

        // Vertex layout: [corner_left, corner_right, top.., bottom..]
        let mut vertices = Vec::with_capacity(2 * (intervals + 1) + 2);
        vertices.push(corner_left);
        vertices.push(corner_right);
        vertices.extend(samples.iter().copied());
        vertices.extend(samples.iter().map(|p| Vec2::new(p.x, 0.0)));

        let top = |i: usize| (2 + i) as u32;
        let bottom = |i: usize| (2 + intervals + 1 + i) as u32;

        let mut indices = Vec::with_capacity(6 * (intervals + 1));
        for i in 0..intervals {
            indices.extend_from_slice(&[top(i), bottom(i), top(i + 1)]);
            indices.extend_from_slice(&[top(i + 1), bottom(i), bottom(i + 1)]);
        }
        // Fill between the bottom rail and the floor of the viewport
        indices.extend_from_slice(&[0, 1, bottom(intervals)]);
        indices.extend_from_slice(&[bottom(intervals), bottom(0), 0]);

        let mut boundary = Vec::with_capacity(samples.len() + 2);
        boundary.push(corner_right);
        boundary.push(corner_left);
        boundary.extend(samples.iter().copied());

        log::info!(
            "Terrain generated: width={} height={} intervals={} vertices={} triangles={}",
            width,
            height,
            intervals,
            vertices.len(),
            indices.len() / 3
        );

        Ok(Self {
            width,
            height,
            intervals,
            viewport_half_height: params.viewport_half_height,
            samples,
            mesh: TerrainMesh { vertices, indices },
            boundary,
        })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn intervals(&self) -> usize {
        self.intervals
    }

    pub fn viewport_half_height(&self) -> f32 {
        self.viewport_half_height
    }

    /// Top profile samples, left to right
    pub fn samples(&self) -> &[Vec2] {
        &self.samples
    }

    /// Bottom rail at y = 0, left to right
    pub fn bottom_rail(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.samples.iter().map(|p| Vec2::new(p.x, 0.0))
    }

    pub fn mesh(&self) -> &TerrainMesh {
        &self.mesh
    }

    /// Collision polygon: right viewport corner, left viewport corner, then
    /// the top profile left to right. Closes back to the first point.
    pub fn boundary(&self) -> &[Vec2] {
        &self.boundary
    }

    /// Analytic surface height at `x`
    pub fn height_at(&self, x: f32) -> f32 {
        gaussian_height(self.width, self.height, x)
    }

    /// Build the collider for ground queries and projectile hits
    pub fn collider(&self) -> TerrainCollider {
        TerrainCollider::new(self.boundary.clone())
    }
}
