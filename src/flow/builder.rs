//! Liquid mesh synthesis from pipe bounds.
//!
//! Each pipe's world-space bounding box decides its orientation and the
//! radius and length of the liquid column inside it. Straight pipes get a
//! single cylinder; bent pipes are decomposed into swept-tube runs. Meshes
//! are added to the scene hidden and empty, and the sequencer decides when
//! they fill.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::segment::{Part, Pipe, SegmentId, SegmentMap};
use crate::error::FlowError;
use crate::geometry::spline::catmull_rom;
use crate::geometry::{sweep_tube, Aabb, Axis, MeshData};
use crate::options::GeometryOptions;
use crate::scene::{ClipPlane, LiquidMesh, Material, MeshHandle, Scene};

/// Dominant direction of a pipe's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Height strictly dominates both other extents.
    Vertical,
    /// Width strictly dominates both other extents.
    Horizontal,
    /// No strict winner; treated like a vertical pipe.
    Neutral,
}

impl Orientation {
    /// Classify by strict dominance of one extent.
    #[must_use]
    pub fn classify(size: Vec3) -> Self {
        if size.y > size.x && size.y > size.z {
            Self::Vertical
        } else if size.x > size.y && size.x > size.z {
            Self::Horizontal
        } else {
            Self::Neutral
        }
    }
}

/// Liquid column dimensions derived from a pipe's bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeMeasure {
    /// Classified orientation.
    pub orientation: Orientation,
    /// World-space bounds centre.
    pub center: Vec3,
    /// World-space bounds extents.
    pub size: Vec3,
    /// Liquid radius.
    pub radius: f32,
    /// Liquid length along the dominant axis.
    pub length: f32,
}

impl PipeMeasure {
    /// Measure `bounds` with the given radius and length factors.
    #[must_use]
    pub fn new(bounds: &Aabb, radius_factor: f32, length_factor: f32) -> Self {
        let size = bounds.size();
        let orientation = Orientation::classify(size);
        let (minor, dominant) = match orientation {
            Orientation::Horizontal => (size.y.min(size.z), size.x),
            Orientation::Vertical | Orientation::Neutral => (size.x.min(size.z), size.y),
        };
        Self {
            orientation,
            center: bounds.center(),
            size,
            radius: minor * radius_factor,
            length: dominant * length_factor,
        }
    }
}

/// Shape family of a pipe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PipeKind {
    /// One straight run.
    Straight,
    /// Riser then a 90° turn running toward `outward` (±1 on X).
    SingleBend {
        /// Direction of the horizontal run.
        outward: f32,
    },
    /// Riser, horizontal run toward `outward`, then a drop.
    DoubleBend {
        /// Direction of the horizontal run.
        outward: f32,
    },
}

impl PipeKind {
    /// Shape of a given pipe in the FADEC unit.
    #[must_use]
    pub const fn of(pipe: Pipe) -> Self {
        match pipe {
            Pipe::Supply => Self::SingleBend { outward: 1.0 },
            Pipe::Left => Self::DoubleBend { outward: -1.0 },
            Pipe::Right => Self::DoubleBend { outward: 1.0 },
            Pipe::BelowMid
            | Pipe::Mid
            | Pipe::Spool
            | Pipe::LeftOutput
            | Pipe::RightOutput => Self::Straight,
        }
    }
}

/// Progressive reveal along a world axis via a clipping plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSpan {
    /// World axis the run lies along.
    pub axis: Axis,
    /// World coordinate where the reveal starts.
    pub origin: f32,
    /// Distance covered at progress 1.
    pub length: f32,
    /// +1 to reveal toward the positive axis, -1 toward the negative.
    pub sign: f32,
}

impl RevealSpan {
    /// Plane keeping everything between `origin` and the reveal front.
    #[must_use]
    pub fn clip_plane(&self, progress: f32) -> ClipPlane {
        ClipPlane {
            normal: self.axis.unit() * -self.sign,
            constant: self.sign * self.origin + progress * self.length,
        }
    }
}

/// How phase progress maps onto a liquid mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillRule {
    /// Fill-axis scale follows progress from the mesh's anchor.
    Grow,
    /// Full-size mesh revealed by a moving clipping plane.
    Reveal(RevealSpan),
}

/// A liquid mesh added to the scene for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltSegment {
    /// Segment the mesh fills.
    pub id: SegmentId,
    /// Scene handle.
    pub mesh: MeshHandle,
    /// Fill rule the sequencer applies.
    pub rule: FillRule,
}

struct Run {
    part: Part,
    geometry: MeshData,
    anchor: Vec3,
    rule: FillRule,
}

/// Synthesizes liquid meshes inside named pipes.
#[derive(Debug, Clone)]
pub struct PipeGeometryBuilder {
    options: GeometryOptions,
    material: Material,
}

impl PipeGeometryBuilder {
    /// Builder using the given synthesis options.
    #[must_use]
    pub fn new(options: &GeometryOptions) -> Self {
        Self {
            options: options.clone(),
            material: Material::liquid(options.liquid_color),
        }
    }

    /// Build the liquid meshes for `pipe` and add them to `scene`.
    ///
    /// Fails with [`FlowError::MissingObject`] (nothing built) when the pipe
    /// component is absent.
    pub fn build(
        &self,
        scene: &mut Scene,
        pipe: Pipe,
    ) -> Result<Vec<BuiltSegment>, FlowError> {
        let name = pipe.component_name();
        let Some(node) = scene.component(name) else {
            log::warn!("Pipe {name} not found, skipping liquid mesh");
            return Err(FlowError::MissingObject(name.to_owned()));
        };

        let measure = PipeMeasure::new(
            &node.bounding_box(),
            self.options.radius_factor,
            self.options.length_factor,
        );
        let pipe_scale = node.scale;
        let base_scale = Vec3::new(pipe_scale.x, 1.0, pipe_scale.z);

        let runs = match PipeKind::of(pipe) {
            PipeKind::Straight => vec![self.straight_run(&measure)],
            PipeKind::SingleBend { outward } => self.bent_runs(&measure, outward, false),
            PipeKind::DoubleBend { outward } => self.bent_runs(&measure, outward, true),
        };

        let offset = Vec3::from(self.options.liquid_offset);
        let to_local = Vec3::ONE / base_scale;
        let built = runs
            .into_iter()
            .map(|mut run| {
                let id = SegmentId::new(pipe, run.part);
                run.geometry.scale_axes(to_local);
                let position = run.anchor + offset;
                let rule = match run.rule {
                    FillRule::Reveal(span) => FillRule::Reveal(RevealSpan {
                        origin: span.origin + span.axis.get(offset),
                        ..span
                    }),
                    FillRule::Grow => FillRule::Grow,
                };
                let mesh = scene.add_mesh(LiquidMesh::new(
                    id.to_string(),
                    run.geometry,
                    self.material,
                    position,
                    base_scale,
                ));
                log::debug!(
                    "Created liquid mesh {id}: {:?}, radius {:.3}, at {position}",
                    measure.orientation,
                    measure.radius,
                );
                BuiltSegment { id, mesh, rule }
            })
            .collect();
        Ok(built)
    }

    /// Build every pipe in `pipes`, logging and skipping absent ones.
    pub fn build_all(&self, scene: &mut Scene, pipes: &[Pipe]) -> SegmentMap<BuiltSegment> {
        let mut map = SegmentMap::new();
        for &pipe in pipes {
            match self.build(scene, pipe) {
                Ok(segments) => {
                    for segment in segments {
                        let _ = map.insert(segment.id, segment);
                    }
                }
                Err(e) => log::warn!("Liquid for {pipe:?} not built: {e}"),
            }
        }
        log::info!("Built {} liquid meshes", map.len());
        map
    }

    fn straight_run(&self, m: &PipeMeasure) -> Run {
        let mut geometry =
            MeshData::cylinder(m.radius, m.length, self.options.radial_segments);
        match m.orientation {
            Orientation::Horizontal => {
                geometry.rotate_z(FRAC_PI_2);
                Run {
                    part: Part::Horizontal,
                    geometry,
                    anchor: m.center,
                    rule: FillRule::Reveal(RevealSpan {
                        axis: Axis::X,
                        origin: m.center.x - m.length * 0.5,
                        length: m.length,
                        sign: 1.0,
                    }),
                }
            }
            Orientation::Vertical | Orientation::Neutral => {
                // Anchored at the bottom so scaling grows upward.
                geometry.translate(Vec3::Y * (m.length * 0.5));
                Run {
                    part: Part::Vertical,
                    geometry,
                    anchor: m.center - Vec3::Y * (m.length * 0.5),
                    rule: FillRule::Grow,
                }
            }
        }
    }

    fn bent_runs(&self, m: &PipeMeasure, outward: f32, double: bool) -> Vec<Run> {
        let factor = self.options.length_factor;
        let span = m.size.x * factor;
        let rise = m.size.y * factor;
        let inner_x = m.center.x - outward * span * 0.5;
        let outer_x = m.center.x + outward * span * 0.5;
        let bottom = m.center.y - rise * 0.5;
        let top = m.center.y + rise * 0.5;
        let bend = m.radius * 2.0;

        let mut runs = vec![
            Run {
                part: Part::Vertical,
                geometry: self.tube(&[Vec3::ZERO, Vec3::Y * rise], m.radius),
                anchor: Vec3::new(inner_x, bottom, m.center.z),
                rule: FillRule::Grow,
            },
            Run {
                part: Part::Horizontal,
                geometry: self.tube(
                    &[
                        Vec3::new(0.0, -bend, 0.0),
                        Vec3::new(outward * bend, 0.0, 0.0),
                        Vec3::new(outward * span, 0.0, 0.0),
                    ],
                    m.radius,
                ),
                anchor: Vec3::new(inner_x, top, m.center.z),
                rule: FillRule::Reveal(RevealSpan {
                    axis: Axis::X,
                    origin: inner_x,
                    length: span,
                    sign: outward,
                }),
            },
        ];

        if double {
            // Anchored at the top so scaling grows downward.
            let drop = rise * 0.5;
            runs.push(Run {
                part: Part::SecondVertical,
                geometry: self.tube(&[Vec3::ZERO, Vec3::NEG_Y * drop], m.radius),
                anchor: Vec3::new(outer_x, top, m.center.z),
                rule: FillRule::Grow,
            });
        }
        runs
    }

    fn tube(&self, control: &[Vec3], radius: f32) -> MeshData {
        let path = catmull_rom(control, self.options.tubular_segments as usize);
        sweep_tube(&path, radius, self.options.radial_segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Components, SceneNode, EMPTY_FILL};

    fn scene_with(name: &str, center: Vec3, size: Vec3) -> Scene {
        let node = SceneNode::mesh(
            name,
            Aabb::from_center_size(center, size),
            Material::solid([0.7, 0.45, 0.2]),
        );
        Scene::new([node].into_iter().collect::<Components>())
    }

    fn builder() -> PipeGeometryBuilder {
        PipeGeometryBuilder::new(&GeometryOptions::default())
    }

    fn reveal(rule: FillRule) -> RevealSpan {
        match rule {
            FillRule::Reveal(span) => span,
            FillRule::Grow => unreachable!("expected a reveal rule"),
        }
    }

    #[test]
    fn classify_strict_dominance() {
        assert_eq!(Orientation::classify(Vec3::new(0.1, 1.0, 0.1)), Orientation::Vertical);
        assert_eq!(Orientation::classify(Vec3::new(2.0, 0.1, 0.1)), Orientation::Horizontal);
        assert_eq!(Orientation::classify(Vec3::new(1.0, 1.0, 0.1)), Orientation::Neutral);
        assert_eq!(Orientation::classify(Vec3::new(0.1, 0.1, 2.0)), Orientation::Neutral);
    }

    #[test]
    fn vertical_length_is_95_percent_of_height() {
        for sy in [0.3_f32, 0.8, 2.5] {
            let mut scene =
                scene_with("Mid_Pipe", Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.12, sy, 0.1));
            let built = builder().build(&mut scene, Pipe::Mid).unwrap();
            assert_eq!(built.len(), 1);
            assert_eq!(built[0].id, SegmentId::new(Pipe::Mid, Part::Vertical));
            assert_eq!(built[0].rule, FillRule::Grow);

            let mesh = scene.mesh(built[0].mesh).unwrap();
            let size = mesh.geometry.bounds().unwrap().size();
            assert!((size.y - 0.95 * sy).abs() < 1e-4, "sy={sy}: {}", size.y);
            // radius = 0.35 * min(sx, sz)
            assert!((size.x - 2.0 * 0.35 * 0.1).abs() < 1e-3);
        }
    }

    #[test]
    fn new_meshes_are_hidden_and_empty() {
        let mut scene = scene_with(
            "Left_pipe",
            Vec3::new(1.1, 2.3, -0.25),
            Vec3::new(0.8, 0.9, 0.12),
        );
        let built = builder().build(&mut scene, Pipe::Left).unwrap();
        let parts: Vec<Part> = built.iter().map(|b| b.id.part).collect();
        assert_eq!(parts, vec![Part::Vertical, Part::Horizontal, Part::SecondVertical]);
        for b in &built {
            let mesh = scene.mesh(b.mesh).unwrap();
            assert!(!mesh.visible);
            assert_eq!(mesh.fill_level(), EMPTY_FILL);
            assert!(!mesh.geometry.is_empty());
        }
    }

    #[test]
    fn supply_pipe_has_two_runs() {
        let mut scene = scene_with(
            "Fuel_supply_pipe",
            Vec3::new(-1.0, 1.4, 0.0),
            Vec3::new(1.0, 1.2, 0.12),
        );
        let built = builder().build(&mut scene, Pipe::Supply).unwrap();
        assert_eq!(built.len(), 2);
        let riser = scene.mesh(built[0].mesh).unwrap();
        let height = riser.geometry.bounds().unwrap().size().y;
        assert!((height - 0.95 * 1.2).abs() < 1e-4);
    }

    #[test]
    fn horizontal_straight_pipe_reveals_along_x() {
        let mut scene = scene_with(
            "Spool_Pipe",
            Vec3::new(1.5, 3.66, 0.0),
            Vec3::new(1.6, 0.12, 0.12),
        );
        let built = builder().build(&mut scene, Pipe::Spool).unwrap();
        assert_eq!(built[0].id.part, Part::Horizontal);
        let span = reveal(built[0].rule);
        assert_eq!(span.axis, Axis::X);
        assert!((span.length - 0.95 * 1.6).abs() < 1e-5);
        assert!((span.origin - (1.5 - 0.76)).abs() < 1e-5);
        let len = scene.mesh(built[0].mesh).unwrap().geometry.bounds().unwrap().size().x;
        assert!((len - 0.95 * 1.6).abs() < 1e-4);
    }

    #[test]
    fn left_and_right_reveal_mirror() {
        let mut scene = Scene::new(
            [
                SceneNode::mesh(
                    "Left_pipe",
                    Aabb::from_center_size(Vec3::new(1.1, 2.34, -0.25), Vec3::new(0.8, 0.92, 0.12)),
                    Material::solid([0.7; 3]),
                ),
                SceneNode::mesh(
                    "Right_pipe",
                    Aabb::from_center_size(Vec3::new(1.9, 2.34, 0.25), Vec3::new(0.8, 0.92, 0.12)),
                    Material::solid([0.7; 3]),
                ),
            ]
            .into_iter()
            .collect(),
        );
        let b = builder();
        let left = b.build(&mut scene, Pipe::Left).unwrap();
        let right = b.build(&mut scene, Pipe::Right).unwrap();
        let (l, r) = (reveal(left[1].rule), reveal(right[1].rule));
        // Both grow outward from the shared junction at x = 1.5.
        assert!((l.origin - 1.5).abs() < 0.03);
        assert!((r.origin - 1.5).abs() < 0.03);

        let (lp, rp) = (l.clip_plane(0.5), r.clip_plane(0.5));
        assert_eq!(lp.normal, -rp.normal);
        assert_eq!(lp.normal, Vec3::X);
        assert!(lp.keeps(Vec3::new(1.3, 0.0, 0.0)));
        assert!(!lp.keeps(Vec3::new(0.8, 0.0, 0.0)));
        assert!(rp.keeps(Vec3::new(1.7, 0.0, 0.0)));
        assert!(!rp.keeps(Vec3::new(2.2, 0.0, 0.0)));
    }

    #[test]
    fn geometry_compensates_pipe_scale() {
        let mut scene = scene_with("Mid_Pipe", Vec3::ZERO, Vec3::new(0.2, 1.0, 0.2));
        scene.component_mut("Mid_Pipe").unwrap().scale = Vec3::new(2.0, 3.0, 2.0);
        let built = builder().build(&mut scene, Pipe::Mid).unwrap();
        let mesh = scene.mesh(built[0].mesh).unwrap();
        assert_eq!(mesh.base_scale, Vec3::new(2.0, 1.0, 2.0));
        let local_width = mesh.geometry.bounds().unwrap().size().x;
        assert!((local_width * 2.0 - 2.0 * 0.35 * 0.2).abs() < 1e-3);
    }

    #[test]
    fn missing_pipe_is_error() {
        let mut scene = Scene::default();
        let err = builder().build(&mut scene, Pipe::Spool).unwrap_err();
        assert!(matches!(err, FlowError::MissingObject(ref n) if n == "Spool_Pipe"));
        assert!(scene.meshes().is_empty());

        let map = builder().build_all(&mut scene, &Pipe::ALL);
        assert!(map.is_empty());
    }
}
