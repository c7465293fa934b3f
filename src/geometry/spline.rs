//! Spline math and frame computation for swept pipe geometry.
//!
//! Pure Vec3 → Vec3 transforms with no scene or GPU dependencies.

use glam::Vec3;

/// A point along a spline with position, tangent, and frame vectors.
#[derive(Debug, Clone, Copy)]
pub struct SplinePoint {
    /// Position on the curve.
    pub pos: Vec3,
    /// Unit tangent.
    pub tangent: Vec3,
    /// Frame normal.
    pub normal: Vec3,
    /// Frame binormal.
    pub binormal: Vec3,
}

/// Uniform Catmull-Rom basis for one span `p1 → p2`.
fn catmull_rom_span(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Control points for span `i`, mirroring the ends.
fn span_controls(points: &[Vec3], i: usize) -> [Vec3; 4] {
    let n = points.len();
    let p0 = if i == 0 {
        points[0] * 2.0 - points[1]
    } else {
        points[i - 1]
    };
    let p3 = if i + 2 >= n {
        points[n - 1] * 2.0 - points[n - 2]
    } else {
        points[i + 2]
    };
    [p0, points[i], points[i + 1], p3]
}

/// Catmull-Rom spline interpolation (passes through all control points).
#[must_use]
pub fn catmull_rom(points: &[Vec3], segments_per_span: usize) -> Vec<Vec3> {
    let n = points.len();
    if n < 2 {
        return points.to_vec();
    }
    if n < 3 {
        return linear_interpolate(points, segments_per_span);
    }

    let mut result = Vec::with_capacity((n - 1) * segments_per_span + 1);
    for i in 0..n - 1 {
        let [p0, p1, p2, p3] = span_controls(points, i);
        for j in 0..segments_per_span {
            let t = j as f32 / segments_per_span as f32;
            result.push(catmull_rom_span(p0, p1, p2, p3, t));
        }
    }
    result.push(points[n - 1]);
    result
}

/// Linear interpolation fallback for short point sequences.
#[must_use]
pub fn linear_interpolate(points: &[Vec3], segments_per_span: usize) -> Vec<Vec3> {
    let mut result = Vec::new();
    for pair in points.windows(2) {
        for j in 0..segments_per_span {
            let t = j as f32 / segments_per_span as f32;
            result.push(pair[0].lerp(pair[1], t));
        }
    }
    if let Some(&last) = points.last() {
        result.push(last);
    }
    result
}

/// Smooth interpolating curve through a fixed control polygon, evaluated by
/// a global parameter `t ∈ [0, 1]` spread evenly over the spans.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothCurve {
    points: Vec<Vec3>,
}

impl SmoothCurve {
    /// Curve through `points`. Fewer than two points yields a degenerate
    /// curve that always evaluates to the single point (or the origin).
    #[must_use]
    pub fn new(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Control points the curve passes through.
    #[must_use]
    pub fn control_points(&self) -> &[Vec3] {
        &self.points
    }

    /// Point at global parameter `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn point(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        match n {
            0 => return Vec3::ZERO,
            1 => return self.points[0],
            2 => return self.points[0].lerp(self.points[1], t.clamp(0.0, 1.0)),
            _ => {}
        }

        let scaled = (n - 1) as f32 * t.clamp(0.0, 1.0);
        let mut span = scaled.floor() as usize;
        let mut weight = scaled - span as f32;
        if span >= n - 1 {
            span = n - 2;
            weight = 1.0;
        }

        let [p0, p1, p2, p3] = span_controls(&self.points, span);
        catmull_rom_span(p0, p1, p2, p3, weight)
    }

    /// `count + 1` evenly spaced samples from `t = 0` to `t = 1`.
    #[must_use]
    pub fn sample(&self, count: usize) -> Vec<Vec3> {
        let count = count.max(1);
        (0..=count)
            .map(|i| self.point(i as f32 / count as f32))
            .collect()
    }
}

/// Build spline points with finite-difference tangents and
/// rotation-minimizing frames.
#[must_use]
pub fn frame_path(path: &[Vec3]) -> Vec<SplinePoint> {
    let n = path.len();
    let mut points: Vec<SplinePoint> = (0..n)
        .map(|i| {
            let prev = path[i.saturating_sub(1)];
            let next = path[(i + 1).min(n - 1)];
            SplinePoint {
                pos: path[i],
                tangent: (next - prev).normalize_or(Vec3::Y),
                normal: Vec3::ZERO,
                binormal: Vec3::ZERO,
            }
        })
        .collect();
    compute_rmf(&mut points);
    points
}

/// Reflect `v` in the plane through the origin with normal `n`, where
/// `n_sq = n·n`.
fn reflect(v: Vec3, n: Vec3, n_sq: f32) -> Vec3 {
    v - (2.0 / n_sq) * n.dot(v) * n
}

/// Carry the normal of `from` onto `to` with the double reflection method
/// (Wang et al. 2008). Returns `(normal, binormal)` for `to`.
fn transport_frame(from: &SplinePoint, to: &SplinePoint) -> (Vec3, Vec3) {
    let chord = to.pos - from.pos;
    let chord_sq = chord.length_squared();
    if chord_sq < 1e-10 {
        return (from.normal, from.binormal);
    }

    let normal = reflect(from.normal, chord, chord_sq);
    let tangent = reflect(from.tangent, chord, chord_sq);

    let fix = to.tangent - tangent;
    let fix_sq = fix.length_squared();
    let normal = if fix_sq < 1e-10 {
        normal
    } else {
        reflect(normal, fix, fix_sq)
    };

    // Re-orthogonalise against the destination tangent.
    let normal = (normal - to.tangent * to.tangent.dot(normal)).normalize();
    (normal, to.tangent.cross(normal).normalize())
}

/// Fill in rotation-minimizing normals and binormals along `points`.
///
/// The first frame is seeded from whichever world axis is least parallel
/// to the starting tangent; later frames are transported pairwise.
pub fn compute_rmf(points: &mut [SplinePoint]) {
    let Some(first) = points.first_mut() else {
        return;
    };
    let seed = if first.tangent.x.abs() < 0.9 {
        Vec3::X
    } else {
        Vec3::Y
    };
    first.normal = first.tangent.cross(seed).normalize();
    first.binormal = first.tangent.cross(first.normal).normalize();

    for i in 1..points.len() {
        let (normal, binormal) = transport_frame(&points[i - 1], &points[i]);
        points[i].normal = normal;
        points[i].binormal = binormal;
    }
}
