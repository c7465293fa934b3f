//! Scene state shared with the host renderer.
//!
//! [`Scene`] holds the named model components plus two arenas of generated
//! render objects: liquid meshes and particle clouds. Generated objects are
//! addressed by stable handles and never removed, only hidden and reset.

pub mod layout;
pub mod liquid;
pub mod node;

pub use layout::{ComponentDef, ComponentLayout};
pub use liquid::{ClipPlane, LiquidMesh, PointCloud, EMPTY_FILL};
pub use node::{Components, Material, SceneNode};

/// Handle to a [`LiquidMesh`] in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(usize);

/// Handle to a [`PointCloud`] in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointsHandle(usize);

/// Model components plus everything generated on top of them.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Named model components.
    pub components: Components,
    meshes: Vec<LiquidMesh>,
    point_clouds: Vec<PointCloud>,
}

impl Scene {
    /// Scene over an existing component table.
    #[must_use]
    pub fn new(components: Components) -> Self {
        Self {
            components,
            meshes: Vec::new(),
            point_clouds: Vec::new(),
        }
    }

    /// Add a liquid mesh and return its handle.
    pub fn add_mesh(&mut self, mesh: LiquidMesh) -> MeshHandle {
        self.meshes.push(mesh);
        MeshHandle(self.meshes.len() - 1)
    }

    /// Liquid mesh by handle.
    #[must_use]
    pub fn mesh(&self, handle: MeshHandle) -> Option<&LiquidMesh> {
        self.meshes.get(handle.0)
    }

    /// Mutable liquid mesh by handle.
    pub fn mesh_mut(&mut self, handle: MeshHandle) -> Option<&mut LiquidMesh> {
        self.meshes.get_mut(handle.0)
    }

    /// Every liquid mesh, in insertion order.
    #[must_use]
    pub fn meshes(&self) -> &[LiquidMesh] {
        &self.meshes
    }

    /// First liquid mesh called `name`.
    #[must_use]
    pub fn mesh_named(&self, name: &str) -> Option<&LiquidMesh> {
        self.meshes.iter().find(|m| m.name == name)
    }

    /// Add a point cloud and return its handle.
    pub fn add_points(&mut self, cloud: PointCloud) -> PointsHandle {
        self.point_clouds.push(cloud);
        PointsHandle(self.point_clouds.len() - 1)
    }

    /// Point cloud by handle.
    #[must_use]
    pub fn points(&self, handle: PointsHandle) -> Option<&PointCloud> {
        self.point_clouds.get(handle.0)
    }

    /// Mutable point cloud by handle.
    pub fn points_mut(&mut self, handle: PointsHandle) -> Option<&mut PointCloud> {
        self.point_clouds.get_mut(handle.0)
    }

    /// Every point cloud, in insertion order.
    #[must_use]
    pub fn point_clouds(&self) -> &[PointCloud] {
        &self.point_clouds
    }

    /// Named component.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<&SceneNode> {
        self.components.get(name)
    }

    /// Mutable named component.
    pub fn component_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.components.get_mut(name)
    }
}
