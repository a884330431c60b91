//! Build-once mesh cache.
//!
//! Each shape kind is built exactly once per cache: the first request
//! builds and stores the geometry, and every later request returns that
//! first build regardless of the parameters passed. This mirrors the
//! historical demos, which latched shape geometry behind a file-scope
//! handle on first draw and never looked at the parameters again. Callers
//! that need differently tessellated shapes need separate caches.

use crate::geometry::{self, MeshData, SphereParams, TorusParams};

/// Owns one lazily built mesh per shape kind.
///
/// Single-threaded by design: all access goes through `&mut self` and the
/// cache is expected to live alongside the renderer that draws from it.
#[derive(Debug, Default)]
pub struct MeshCache {
    sphere: Option<MeshData>,
    torus: Option<MeshData>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sphere mesh; built from `params` on the first call only.
    pub fn sphere(&mut self, params: &SphereParams) -> &MeshData {
        if self.sphere.is_none() {
            log::debug!(
                "building sphere mesh {}x{} ({:?})",
                params.segments_x,
                params.segments_y,
                params.winding
            );
            self.sphere = Some(geometry::generate_sphere(params));
        }
        self.sphere.as_ref().unwrap()
    }

    /// Torus mesh; built from `params` on the first call only.
    pub fn torus(&mut self, params: &TorusParams) -> &MeshData {
        if self.torus.is_none() {
            log::debug!(
                "building torus mesh r={} c={} {}x{}",
                params.inner_radius,
                params.center_radius,
                params.segments_ring,
                params.segments_tube
            );
            self.torus = Some(geometry::generate_torus(params));
        }
        self.torus.as_ref().unwrap()
    }

    /// Whether the sphere has been built yet.
    pub fn has_sphere(&self) -> bool {
        self.sphere.is_some()
    }

    /// Whether the torus has been built yet.
    pub fn has_torus(&self) -> bool {
        self.torus.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StripWinding;

    #[test]
    fn test_cache_builds_lazily() {
        let mut cache = MeshCache::new();
        assert!(!cache.has_sphere());

        let params = SphereParams {
            segments_x: 4,
            segments_y: 4,
            winding: StripWinding::Alternating,
        };
        assert_eq!(cache.sphere(&params).vertex_count(), 25);
        assert!(cache.has_sphere());
        assert!(!cache.has_torus());
    }

    #[test]
    fn test_first_call_wins() {
        let mut cache = MeshCache::new();

        let first = SphereParams {
            segments_x: 4,
            segments_y: 4,
            winding: StripWinding::Alternating,
        };
        let second = SphereParams {
            segments_x: 8,
            segments_y: 8,
            winding: StripWinding::Uniform,
        };

        cache.sphere(&first);
        // Later parameters are ignored: still the 4x4 mesh
        let mesh = cache.sphere(&second);
        assert_eq!(mesh.vertex_count(), 25);
    }

    #[test]
    fn test_torus_first_call_wins() {
        let mut cache = MeshCache::new();

        let first = TorusParams {
            inner_radius: 0.1,
            center_radius: 0.25,
            segments_ring: 4,
            segments_tube: 4,
        };
        let mut second = first;
        second.segments_ring = 16;

        assert_eq!(cache.torus(&first).vertex_count(), 50);
        assert_eq!(cache.torus(&second).vertex_count(), 50);
    }
}
