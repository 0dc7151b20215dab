use glam::{Vec2, Vec3};
use shared::{CuboidDescriptor, Point3};

use super::camera::ArcBallCamera;
use super::point_cloud::PointCloud;
use super::scene::{NodeId, Renderable, SceneGraph, SceneNode, Viewport};

/// A ray in world space
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Parameter of the point on the ray closest to `point` (may be negative)
    pub fn closest_t(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.direction)
    }
}

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Bounds of a point set; None when empty
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let first = *points.first()?;
        let mut aabb = Self { min: first, max: first };
        for p in &points[1..] {
            aabb.min = aabb.min.min(*p);
            aabb.max = aabb.max.max(*p);
        }
        Some(aabb)
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }
}

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min.x - ray.origin.x) * inv_dir.x;
    let t2 = (aabb.max.x - ray.origin.x) * inv_dir.x;
    let t3 = (aabb.min.y - ray.origin.y) * inv_dir.y;
    let t4 = (aabb.max.y - ray.origin.y) * inv_dir.y;
    let t5 = (aabb.min.z - ray.origin.z) * inv_dir.z;
    let t6 = (aabb.max.z - ray.origin.z) * inv_dir.z;

    let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
    let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Ray against an oriented cuboid: the ray is moved into the box frame
/// and tested against the local AABB.
pub fn ray_cuboid(ray: &Ray, cuboid: &CuboidDescriptor) -> Option<f32> {
    let local = Ray {
        origin: cuboid.to_local(ray.origin),
        direction: cuboid.orientation.transpose() * ray.direction,
    };
    let h = cuboid.half_extents();
    ray_aabb(&local, &Aabb { min: -h, max: h })
}

/// Nearest cloud point within `threshold` of the ray, in front of the origin.
/// Returns (distance along the ray, the cloud point).
pub fn ray_point_cloud(ray: &Ray, cloud: &PointCloud, threshold: f32) -> Option<(f32, Vec3)> {
    ray_aabb(ray, &cloud.bounds().expanded(threshold))?;

    let threshold_sq = threshold * threshold;
    let mut best: Option<(f32, Vec3)> = None;

    for &p in cloud.points() {
        let t = ray.closest_t(p);
        if t < 0.0 {
            continue;
        }
        if ray.at(t).distance_squared(p) > threshold_sq {
            continue;
        }
        if best.is_none_or(|(d, _)| t < d) {
            best = Some((t, p));
        }
    }

    best
}

/// Tuning for ray casts
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickParams {
    /// Max distance (world units) between the ray and a cloud point to count as a hit
    pub point_threshold: f32,
}

impl Default for PickParams {
    fn default() -> Self {
        Self {
            point_threshold: 0.1,
        }
    }
}

/// One ray hit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Distance from the ray origin along the ray
    pub distance: f32,
    /// Hit point in world space
    pub point: Point3,
    /// Scene node that was hit
    pub node: NodeId,
}

fn intersect_node(ray: &Ray, node: &SceneNode, params: &PickParams, out: &mut Vec<Intersection>) {
    if !node.visible {
        return;
    }

    if let Renderable::Group(children) = &node.renderable {
        for child in children {
            intersect_node(ray, child, params, out);
        }
        return;
    }

    if !node.pickable {
        return;
    }

    let hit = match &node.renderable {
        Renderable::PointCloud(cloud) => ray_point_cloud(ray, cloud, params.point_threshold),
        Renderable::Cuboid(cuboid) => ray_cuboid(ray, cuboid).map(|t| (t, ray.at(t))),
        Renderable::Marker { .. } | Renderable::Group(_) => None,
    };

    if let Some((distance, point)) = hit {
        out.push(Intersection {
            distance,
            point,
            node: node.id,
        });
    }
}

/// All intersections of the ray with pickable scene content, nearest first.
pub fn cast_ray(ray: &Ray, scene: &SceneGraph, params: &PickParams) -> Vec<Intersection> {
    let mut hits = Vec::new();
    for node in scene.nodes() {
        intersect_node(ray, node, params, &mut hits);
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Ray through a pixel of the viewport; None for an empty viewport.
pub fn screen_ray(screen: Vec2, viewport: &Viewport, camera: &ArcBallCamera) -> Option<Ray> {
    let ndc = viewport.to_ndc(screen)?;
    Some(camera.ndc_ray(ndc, viewport.aspect()))
}

/// Resolve a pointer position to the nearest world point under it.
/// `None` means the ray hit nothing, which is a normal outcome.
pub fn pick(
    screen_x: f32,
    screen_y: f32,
    viewport: &Viewport,
    camera: &ArcBallCamera,
    scene: &SceneGraph,
    params: &PickParams,
) -> Option<Point3> {
    let ray = screen_ray(Vec2::new(screen_x, screen_y), viewport, camera)?;
    cast_ray(&ray, scene, params).first().map(|hit| hit.point)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;
    use shared::Rgb;

    fn down_z() -> Ray {
        Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        }
    }

    fn cloud(points: &[Vec3]) -> PointCloud {
        PointCloud::from_points(points.to_vec()).unwrap()
    }

    fn cuboid_at(center: Vec3, size: Vec3) -> CuboidDescriptor {
        CuboidDescriptor {
            center,
            size,
            orientation: Mat3::IDENTITY,
            color: Rgb::new(0, 255, 0),
        }
    }

    #[test]
    fn test_ray_aabb_hit_and_miss() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let t = ray_aabb(&down_z(), &aabb).unwrap();
        assert!((t - 9.0).abs() < 1e-5);

        let off = Ray {
            origin: Vec3::new(5.0, 0.0, 10.0),
            direction: Vec3::NEG_Z,
        };
        assert!(ray_aabb(&off, &aabb).is_none());
    }

    #[test]
    fn test_ray_cuboid_rotated() {
        let mut c = cuboid_at(Vec3::ZERO, Vec3::new(4.0, 0.2, 2.0));
        // 0.2 thick along local y; rotate so local y points along world z
        c.orientation = Mat3::from_rotation_x(std::f32::consts::FRAC_PI_2);
        let t = ray_cuboid(&down_z(), &c).unwrap();
        assert!((t - 9.9).abs() < 1e-4);
    }

    #[test]
    fn test_point_cloud_nearest_along_ray() {
        let c = cloud(&[Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.05, 0.0, 3.0), Vec3::new(2.0, 0.0, 5.0)]);
        let (t, p) = ray_point_cloud(&down_z(), &c, 0.1).unwrap();
        assert_eq!(p, Vec3::new(0.05, 0.0, 3.0));
        assert!((t - 7.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_cloud_ignores_points_behind_origin() {
        let c = cloud(&[Vec3::new(0.0, 0.0, 12.0)]);
        assert!(ray_point_cloud(&down_z(), &c, 0.1).is_none());
    }

    #[test]
    fn test_point_cloud_threshold() {
        let c = cloud(&[Vec3::new(0.5, 0.0, 0.0)]);
        assert!(ray_point_cloud(&down_z(), &c, 0.1).is_none());
        assert!(ray_point_cloud(&down_z(), &c, 0.6).is_some());
    }

    #[test]
    fn test_cast_ray_sorted_and_skips_markers() {
        let mut scene = SceneGraph::default();
        scene.add("cloud", Renderable::PointCloud(cloud(&[Vec3::ZERO])));
        scene.add(
            "marker",
            Renderable::Marker {
                position: Vec3::new(0.0, 0.0, 8.0),
                color: Rgb::new(255, 255, 0),
            },
        );
        let box_id = scene.add(
            "box",
            Renderable::Cuboid(cuboid_at(Vec3::new(0.0, 0.0, 4.0), Vec3::ONE)),
        );

        let hits = cast_ray(&down_z(), &scene, &PickParams::default());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, box_id);
        assert!(hits[0].point.abs_diff_eq(Vec3::new(0.0, 0.0, 4.5), 1e-5));
        assert_eq!(hits[1].point, Vec3::ZERO);
    }

    #[test]
    fn test_cast_ray_recurses_into_groups() {
        let mut scene = SceneGraph::default();
        let group = scene.add("group", Renderable::Group(Vec::new()));
        scene
            .add_to_group(group, "cloud", Renderable::PointCloud(cloud(&[Vec3::new(0.0, 0.0, 1.0)])))
            .unwrap();

        let hits = cast_ray(&down_z(), &scene, &PickParams::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].point, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_hidden_nodes_are_not_hit() {
        let mut scene = SceneGraph::default();
        let id = scene.add("cloud", Renderable::PointCloud(cloud(&[Vec3::ZERO])));
        scene.set_visible(id, false);
        assert!(cast_ray(&down_z(), &scene, &PickParams::default()).is_empty());
    }

    #[test]
    fn test_pick_center_of_viewport() {
        let mut scene = SceneGraph::default();
        scene.add("cloud", Renderable::PointCloud(cloud(&[Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0)])));
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let camera = ArcBallCamera::new();

        let p = pick(400.0, 300.0, &viewport, &camera, &scene, &PickParams::default());
        assert_eq!(p, Some(Vec3::ZERO));
    }

    #[test]
    fn test_pick_empty_space_is_none() {
        let mut scene = SceneGraph::default();
        scene.add("cloud", Renderable::PointCloud(cloud(&[Vec3::ZERO])));
        let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
        let camera = ArcBallCamera::new();

        assert!(pick(10.0, 10.0, &viewport, &camera, &scene, &PickParams::default()).is_none());
    }

    #[test]
    fn test_pick_respects_viewport_offset() {
        let mut scene = SceneGraph::default();
        scene.add("cloud", Renderable::PointCloud(cloud(&[Vec3::ZERO])));
        let viewport = Viewport::new(300.0, 50.0, 800.0, 600.0);
        let camera = ArcBallCamera::new();

        let p = pick(700.0, 350.0, &viewport, &camera, &scene, &PickParams::default());
        assert_eq!(p, Some(Vec3::ZERO));
    }
}
