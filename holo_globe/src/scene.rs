//! The globe model: a point-sphere with a decorative ring, projected into
//! screen space from the smoothed transform, plus the yaw → region label.

use gesture_control::{ControlConfig, SmoothedTransform};

// ════════════════════════════════════════════════════════════════════════════
// Region label
// ════════════════════════════════════════════════════════════════════════════

/// Which part of the world currently faces the camera, by yaw alone.
/// Band edges are in degrees of normalized yaw.
pub fn region_for_yaw(yaw: f32) -> &'static str {
    let tau = std::f32::consts::TAU;
    let mut normalized = yaw % tau;
    if normalized < 0.0 {
        normalized += tau;
    }
    let deg = normalized.to_degrees();

    if !(60.0..330.0).contains(&deg) {
        "AFRICA / EUROPE"
    } else if deg < 160.0 {
        "ASIA / OCEANIA"
    } else if deg < 250.0 {
        "PACIFIC"
    } else if deg < 330.0 {
        "AMERICAS"
    } else {
        "OPEN OCEAN"
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Globe geometry
// ════════════════════════════════════════════════════════════════════════════

/// A point projected onto the screen: pixel position plus a 0–1 shade
/// derived from depth (front of the sphere brighter).
#[derive(Clone, Copy, Debug)]
pub struct ProjectedPoint {
    pub x: i32,
    pub y: i32,
    pub shade: f32,
}

/// Unit-sphere sample points plus an equatorial ring, generated once.
pub struct Globe {
    sphere: Vec<[f32; 3]>,
    ring: Vec<[f32; 3]>,
}

impl Globe {
    const LAT_STEP_DEG: i32 = 10;
    const LON_STEP_DEG: i32 = 10;
    const RING_RADIUS: f32 = 4.0 / 3.0;
    const RING_SEGMENTS: usize = 120;

    pub fn new() -> Self {
        let mut sphere = Vec::new();
        let mut lat = -80;
        while lat <= 80 {
            let phi = (lat as f32).to_radians();
            let mut lon = 0;
            while lon < 360 {
                let theta = (lon as f32).to_radians();
                sphere.push([
                    phi.cos() * theta.sin(),
                    phi.sin(),
                    phi.cos() * theta.cos(),
                ]);
                lon += Self::LON_STEP_DEG;
            }
            lat += Self::LAT_STEP_DEG;
        }

        let ring = (0..Self::RING_SEGMENTS)
            .map(|i| {
                let a = i as f32 / Self::RING_SEGMENTS as f32 * std::f32::consts::TAU;
                [Self::RING_RADIUS * a.cos(), 0.0, Self::RING_RADIUS * a.sin()]
            })
            .collect();

        Globe { sphere, ring }
    }

    pub fn sphere_points(&self) -> &[[f32; 3]] {
        &self.sphere
    }

    /// Project every sphere and ring point through the current transform
    /// into pixel space. Points behind the camera are dropped.
    pub fn project(
        &self,
        t: &SmoothedTransform,
        cfg: &ControlConfig,
        width: usize,
        height: usize,
    ) -> Vec<ProjectedPoint> {
        let mut out = Vec::with_capacity(self.sphere.len() + self.ring.len());
        for p in self.sphere.iter().chain(self.ring.iter()) {
            if let Some(sp) = project_point(*p, t, cfg, width, height) {
                out.push(sp);
            }
        }
        out
    }
}

impl Default for Globe {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotate (yaw about Y, then pitch about X), scale, translate and
/// perspective-project one model point.
pub(crate) fn project_point(
    p: [f32; 3],
    t: &SmoothedTransform,
    cfg: &ControlConfig,
    width: usize,
    height: usize,
) -> Option<ProjectedPoint> {
    let (sy, cy) = t.yaw.sin_cos();
    let (sp, cp) = t.pitch.sin_cos();

    // Yaw about the vertical axis.
    let x1 = p[0] * cy + p[2] * sy;
    let y1 = p[1];
    let z1 = -p[0] * sy + p[2] * cy;

    // Pitch about the horizontal axis.
    let x2 = x1;
    let y2 = y1 * cp - z1 * sp;
    let z2 = y1 * sp + z1 * cp;

    let wx = x2 * t.scale + t.x;
    let wy = y2 * t.scale + t.y;
    let wz = z2 * t.scale + t.z;

    let dist = cfg.camera_z - wz;
    if dist <= 0.1 {
        return None;
    }

    let half_fov_tan = (cfg.fov_y_deg.to_radians() * 0.5).tan();
    let ndc_x = wx / (dist * half_fov_tan * cfg.aspect);
    let ndc_y = wy / (dist * half_fov_tan);

    let px = (width as f32 * 0.5 * (1.0 + ndc_x)) as i32;
    let py = (height as f32 * 0.5 * (1.0 - ndc_y)) as i32;

    // Front of the object (larger rotated z) renders brighter.
    let shade = (z2 * 0.5 + 0.5).clamp(0.05, 1.0);
    Some(ProjectedPoint { x: px, y: py, shade })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
