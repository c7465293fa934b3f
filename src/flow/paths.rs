//! Interior centerlines for particle flow.

use glam::Vec3;
use rand::Rng;

use super::segment::Pipe;
use crate::geometry::{Aabb, Axis, SmoothCurve};
use crate::options::ParticleOptions;
use crate::scene::Components;

/// Smooth curve through a pipe's interior, fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticlePath {
    /// Host pipe.
    pub pipe: Pipe,
    /// Main flow axis the samples advance along.
    pub axis: Axis,
    curve: SmoothCurve,
}

impl ParticlePath {
    /// Point at path parameter `t ∈ [0, 1]`.
    #[must_use]
    pub fn point(&self, t: f32) -> Vec3 {
        self.curve.point(t)
    }

    /// Jittered sample points the curve interpolates.
    #[must_use]
    pub fn samples(&self) -> &[Vec3] {
        self.curve.control_points()
    }
}

/// Main flow axis of a pipe, from its role and extents.
#[must_use]
pub fn flow_axis(pipe: Pipe, size: Vec3) -> Axis {
    match pipe {
        Pipe::BelowMid => {
            if size.x > size.z {
                Axis::X
            } else {
                Axis::Z
            }
        }
        Pipe::Left | Pipe::Right | Pipe::Mid => Axis::Y,
        Pipe::Supply => {
            if size.y > size.x {
                Axis::Y
            } else if size.x > size.z {
                Axis::X
            } else {
                Axis::Z
            }
        }
        Pipe::Spool | Pipe::LeftOutput | Pipe::RightOutput => longest_axis(size),
    }
}

fn longest_axis(size: Vec3) -> Axis {
    if size.y > size.x && size.y > size.z {
        Axis::Y
    } else if size.z > size.x && size.z > size.y {
        Axis::Z
    } else {
        Axis::X
    }
}

/// Sample a jittered interior centerline through `bounds`.
///
/// The pipe wall is assumed `wall_thickness` thick but never more than 20 %
/// of an extent on each side.
pub fn internal_path(
    pipe: Pipe,
    bounds: &Aabb,
    options: &ParticleOptions,
    rng: &mut impl Rng,
) -> ParticlePath {
    let size = bounds.size();
    let center = bounds.center();
    let wall = options.wall_thickness;
    let internal = (size - Vec3::splat(wall * 2.0)).max(size * 0.6);
    let axis = flow_axis(pipe, size);
    let segments = options.path_segments.max(1);

    let points = (0..=segments)
        .map(|i| {
            let t = i as f32 / segments as f32;
            let mut point = center;
            axis.set(&mut point, axis.get(bounds.min) + wall + axis.get(internal) * t);
            for other in axis.others() {
                let jitter = (rng.random::<f32>() - 0.5) * other.get(internal) * options.jitter;
                let shifted = other.get(point) + jitter;
                other.set(&mut point, shifted);
            }
            point
        })
        .collect();

    ParticlePath {
        pipe,
        axis,
        curve: SmoothCurve::new(points),
    }
}

/// Paths for every present pipe in `pipes`, in the given order.
pub fn extract_paths(
    components: &Components,
    pipes: &[Pipe],
    options: &ParticleOptions,
    rng: &mut impl Rng,
) -> Vec<ParticlePath> {
    pipes
        .iter()
        .filter_map(|&pipe| {
            let Some(node) = components.get(pipe.component_name()) else {
                log::warn!("Pipe {} not found, no particle path", pipe.component_name());
                return None;
            };
            Some(internal_path(pipe, &node.bounding_box(), options, rng))
        })
        .collect()
}
