//! Per-tick forces and edge bundling for the simulation side of the
//! engine. An external driver owns the node array and calls these once
//! per animation tick; they read positions and write velocities or return
//! new path data, never touching node identity or topology.

mod bounded;
mod bundling;

pub use self::bounded::BoundedForce;
pub use self::bundling::{BundleEdge, ForceEdgeBundling};

/// Simulation node as the force routines see it. Consumer-owned; the
/// bounded force mutates velocity only.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ForceNode {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub vx: f32,
    pub vy: f32,
    pub vz: f32,
    /// Target distance from the attractor. Nodes without one are left
    /// unconfined by the bounded force.
    pub radial_distance: Option<f32>,
}

impl ForceNode {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            ..Self::default()
        }
    }
}

/// Z values for the interior points of a bundled path, linearly
/// interpolated between the endpoint z values. `path_len` counts the full
/// path including both endpoints; bundled segments pick these up so they
/// do not fight z-ordering during rendering.
pub fn interpolate_z(z_start: f32, z_end: f32, path_len: usize) -> Vec<f32> {
    if path_len < 3 {
        return Vec::new();
    }
    let dz = (z_end - z_start) / path_len as f32;
    (1..path_len - 1)
        .map(|i| z_start + dz * i as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_z_steps_linearly() {
        let zs = interpolate_z(0.0, 4.0, 4);
        assert_eq!(zs, vec![1.0, 2.0]);
    }

    #[test]
    fn interpolate_z_empty_for_endpoint_only_paths() {
        assert!(interpolate_z(0.0, 4.0, 2).is_empty());
        assert!(interpolate_z(0.0, 4.0, 0).is_empty());
    }
}
