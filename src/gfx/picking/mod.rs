//! # Figure Picking
//!
//! Click selection by ray casting against world-space bounding boxes.
//!
//! ## How it works
//!
//! 1. **Pointer to ray**: unproject the cursor through the inverse view-projection
//! 2. **Candidate bounds**: union the transformed mesh bounds of every visible
//!    drawable under each candidate root
//! 3. **Selection**: return the candidate hit closest to the camera
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut picker = ObjectPicker::new();
//! if let Some(hit) = picker.pick(cursor, window_size, &camera, &graph, &roots) {
//!     log::info!("picked candidate {}", hit.index);
//! }
//! ```

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4, Zero};

use crate::{
    gfx::camera::orbit_camera::OrbitCamera,
    scene::graph::{NodeId, SceneGraph},
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Vector3<f32>,
    /// Always normalized
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray, normalizing `direction`
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Create a new AABB
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Create an AABB from `GeometryData::bounds` output
    pub fn from_bounds((min, max): ([f32; 3], [f32; 3])) -> Self {
        Self::new(min.into(), max.into())
    }

    /// Create AABB from a set of vertices; empty input gives a point at the origin
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::zero(), Vector3::zero());
        };

        let mut min = Vector3::from(*first);
        let mut max = min;
        for v in vertices.iter().skip(1) {
            min.x = min.x.min(v[0]);
            min.y = min.y.min(v[1]);
            min.z = min.z.min(v[2]);
            max.x = max.x.max(v[0]);
            max.y = max.y.max(v[1]);
            max.z = max.z.max(v[2]);
        }
        Self::new(min, max)
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Slab test. Returns the entry distance, or the exit distance when the
    /// origin is inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t1 = Vector3::new(
            t_min.x.min(t_max.x),
            t_min.y.min(t_max.y),
            t_min.z.min(t_max.z),
        );
        let t2 = Vector3::new(
            t_min.x.max(t_max.x),
            t_min.y.max(t_max.y),
            t_min.z.max(t_max.z),
        );

        let t_near = t1.x.max(t1.y.max(t1.z));
        let t_far = t2.x.min(t2.y.min(t2.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of the eight transformed corners
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners = [
            Vector3::new(self.min.x, self.min.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.min.z),
            Vector3::new(self.min.x, self.max.y, self.min.z),
            Vector3::new(self.min.x, self.min.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.min.z),
            Vector3::new(self.max.x, self.min.y, self.max.z),
            Vector3::new(self.min.x, self.max.y, self.max.z),
            Vector3::new(self.max.x, self.max.y, self.max.z),
        ];

        let transformed: Vec<[f32; 3]> = corners
            .iter()
            .map(|c| {
                let p = matrix * Vector4::new(c.x, c.y, c.z, 1.0);
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();

        Self::from_vertices(&transformed)
    }
}

/// Result of a figure picking operation
#[derive(Debug, Clone, Copy)]
pub struct PickResult {
    /// Position of the hit candidate in the slice passed to `pick`
    pub index: usize,
    /// Distance from the ray origin to the intersection point
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Ray picker with a per-mesh bounds cache
#[derive(Debug, Default)]
pub struct ObjectPicker {
    cached_aabbs: Vec<Option<Aabb>>,
}

impl ObjectPicker {
    /// Create a new picker with an empty bounds cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a cursor position in physical pixels to a world-space ray
    ///
    /// # Arguments
    /// * `screen_pos` - Cursor position, origin at the top left
    /// * `screen_size` - Surface size in pixels
    /// * `camera` - Camera whose view and projection are unprojected
    pub fn screen_to_ray(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (width, height) = screen_size;

        let ndc_x = (2.0 * mouse_x) / width.max(1.0) - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / height.max(1.0);

        let view_proj = camera.projection_matrix() * camera.view_matrix();
        let inv_view_proj = view_proj.invert().unwrap_or(Matrix4::identity());

        let world_near = inv_view_proj * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near = world_near.truncate() / world_near.w;
        let far = world_far.truncate() / world_far.w;

        Ray::new(near, far - near)
    }

    /// World bounds of every visible drawable under `root`
    pub fn subtree_bounds(&mut self, graph: &SceneGraph, root: NodeId) -> Option<Aabb> {
        let world = graph.world_nodes();
        self.subtree_bounds_with(graph, &world, root)
    }

    fn subtree_bounds_with(
        &mut self,
        graph: &SceneGraph,
        world: &[crate::scene::graph::WorldNode],
        root: NodeId,
    ) -> Option<Aabb> {
        if self.cached_aabbs.len() < graph.meshes().len() {
            self.cached_aabbs.resize(graph.meshes().len(), None);
        }

        let mut bounds: Option<Aabb> = None;
        for id in graph.subtree(root) {
            let state = world[id.index()];
            let Some(drawable) = graph.node(id).drawable else {
                continue;
            };
            if !state.visible {
                continue;
            }

            let mesh = drawable.mesh.index();
            let local = *self.cached_aabbs[mesh]
                .get_or_insert_with(|| Aabb::from_bounds(graph.mesh(drawable.mesh).bounds()));
            let world_box = local.transform(&state.matrix);
            bounds = Some(match bounds {
                Some(b) => b.union(&world_box),
                None => world_box,
            });
        }
        bounds
    }

    /// Returns the nearest candidate whose bounds the cursor ray hits
    ///
    /// # Arguments
    /// * `screen_pos` - Cursor position in physical pixels
    /// * `screen_size` - Surface size in pixels
    /// * `camera` - Camera the cursor ray is cast from
    /// * `graph` - Scene graph holding the candidates
    /// * `candidates` - Subtree roots; hidden parts of a subtree are ignored
    ///
    /// # Returns
    /// The hit with the smallest distance, with `index` into `candidates`
    pub fn pick(
        &mut self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
        graph: &SceneGraph,
        candidates: &[NodeId],
    ) -> Option<PickResult> {
        let ray = self.screen_to_ray(screen_pos, screen_size, camera);
        self.pick_ray(&ray, graph, candidates)
    }

    /// Same as [`ObjectPicker::pick`] for an already computed ray
    pub fn pick_ray(
        &mut self,
        ray: &Ray,
        graph: &SceneGraph,
        candidates: &[NodeId],
    ) -> Option<PickResult> {
        let world = graph.world_nodes();
        let mut closest: Option<PickResult> = None;

        for (index, root) in candidates.iter().enumerate() {
            let Some(bounds) = self.subtree_bounds_with(graph, &world, *root) else {
                continue;
            };
            if let Some(distance) = bounds.intersect_ray(ray) {
                if closest.map_or(true, |c| distance < c.distance) {
                    closest = Some(PickResult {
                        index,
                        distance,
                        intersection_point: ray.point_at(distance),
                    });
                }
            }
        }

        closest
    }

    /// Drops cached mesh bounds; call when the scene is rebuilt
    pub fn invalidate_cache(&mut self) {
        self.cached_aabbs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gfx::geometry::Shape,
        scene::graph::{Material, Transform},
    };
    use cgmath::Deg;

    #[test]
    fn aabb_from_vertices() {
        let aabb = Aabb::from_vertices(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [-1.0, -1.0, -1.0]]);
        assert_eq!(aabb.min, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(aabb.max, Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn ray_hits_and_misses_box() {
        let aabb = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let hit = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(aabb.intersect_ray(&hit), Some(4.0));
        let miss = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(aabb.intersect_ray(&miss).is_none());
    }

    #[test]
    fn center_of_screen_ray_points_at_target() {
        let camera = OrbitCamera::looking_at(
            Vector3::new(0.0, 0.0, 10.0),
            Vector3::zero(),
            Deg(50.0),
            1.0,
        );
        let picker = ObjectPicker::new();
        let ray = picker.screen_to_ray((400.0, 400.0), (800.0, 800.0), &camera);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-3);
    }

    #[test]
    fn picks_nearest_candidate_and_skips_hidden() {
        let mut graph = SceneGraph::new();
        let far = graph.add_group(None, Transform::at(0.0, 0.0, -5.0));
        graph.add_shape(Some(far), Shape::sphere(1.0), Material::lit(0xffffff), Transform::IDENTITY);
        let near = graph.add_group(None, Transform::at(0.0, 0.0, 0.0));
        graph.add_shape(Some(near), Shape::sphere(1.0), Material::lit(0xffffff), Transform::IDENTITY);

        let ray = Ray::new(Vector3::new(0.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        let mut picker = ObjectPicker::new();
        let hit = picker.pick_ray(&ray, &graph, &[far, near]).map(|h| h.index);
        assert_eq!(hit, Some(1));

        graph.set_visible(near, false);
        let hit = picker.pick_ray(&ray, &graph, &[far, near]).map(|h| h.index);
        assert_eq!(hit, Some(0));

        let miss = Ray::new(Vector3::new(10.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(picker.pick_ray(&miss, &graph, &[far, near]).is_none());
    }
}
