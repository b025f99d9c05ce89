//! Scene graph for the loaded room
//!
//! A flat arena of nodes with parent links. Each node carries a local TRS
//! transform and, optionally, a model-space collision mesh. Only room
//! geometry lives here: published and draft decals are kept elsewhere so a
//! sticker can never occlude the next placement.

use crate::foundation::math::{Mat4, Transform};
use crate::physics::collision::{Aabb, CollisionMeshTemplate, Ray, RayHit};

/// Stable handle to a node in a [`SceneGraph`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Human-readable name (from the model file)
    pub name: String,
    /// Transform relative to the parent
    pub local: Transform,
    /// Geometry, if this node is a mesh
    pub mesh: Option<CollisionMeshTemplate>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Errors raised while building a scene graph
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Parent handle does not belong to this graph
    #[error("Unknown parent node {0:?}")]
    UnknownParent(NodeId),
}

/// Traversable room geometry
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node
    pub fn add_root(
        &mut self,
        name: impl Into<String>,
        local: Transform,
        mesh: Option<CollisionMeshTemplate>,
    ) -> NodeId {
        let id = self.push(name.into(), local, mesh, None);
        self.roots.push(id);
        id
    }

    /// Add a child below `parent`
    pub fn add_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        local: Transform,
        mesh: Option<CollisionMeshTemplate>,
    ) -> Result<NodeId, SceneError> {
        if parent.0 >= self.nodes.len() {
            return Err(SceneError::UnknownParent(parent));
        }
        let id = self.push(name.into(), local, mesh, Some(parent));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    fn push(
        &mut self,
        name: String,
        local: Transform,
        mesh: Option<CollisionMeshTemplate>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name,
            local,
            mesh,
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Look up a node
    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// First node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root nodes in insertion order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// World matrix of a node (parent chain composed root-first)
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.node(id)?;
        let mut matrix = node.local.to_matrix();
        while let Some(parent) = node.parent {
            node = self.node(parent)?;
            matrix = node.local.to_matrix() * matrix;
        }
        Some(matrix)
    }

    /// Depth-first walk over mesh nodes, yielding `(id, world matrix, mesh)`
    pub fn mesh_nodes(&self) -> Vec<(NodeId, Mat4, &CollisionMeshTemplate)> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodeId, Mat4)> = self
            .roots
            .iter()
            .rev()
            .map(|&id| (id, Mat4::identity()))
            .collect();

        while let Some((id, parent_matrix)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent_matrix * node.local.to_matrix();
            if let Some(mesh) = &node.mesh {
                out.push((id, world, mesh));
            }
            for &child in node.children.iter().rev() {
                stack.push((child, world));
            }
        }

        out
    }

    /// World-space bounds of all geometry
    pub fn bounds(&self) -> Aabb {
        self.mesh_nodes()
            .into_iter()
            .map(|(_, world, mesh)| mesh.to_world_space(&world).bounds)
            .fold(Aabb::empty(), |acc, b| acc.union(&b))
    }

    /// World-space bounds of a single node's mesh (empty if it has none)
    pub fn node_bounds(&self, id: NodeId) -> Aabb {
        match (self.node(id).and_then(|n| n.mesh.as_ref()), self.world_matrix(id)) {
            (Some(mesh), Some(world)) => mesh.to_world_space(&world).bounds,
            _ => Aabb::empty(),
        }
    }

    /// Nearest intersection of `ray` with any mesh in the graph
    pub fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;

        for (id, world, mesh) in self.mesh_nodes() {
            let world_mesh = mesh.to_world_space(&world);
            if let Some((distance, point, normal)) = world_mesh.intersect_ray(ray) {
                if closest.map_or(true, |hit| distance < hit.distance) {
                    closest = Some(RayHit { node: id, distance, point, normal });
                }
            }
        }

        if let Some(hit) = &closest {
            log::trace!("Raycast hit {:?} at distance {:.3}", hit.node, hit.distance);
        }
        closest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::loader::plane_mesh;
    use approx::assert_relative_eq;

    #[test]
    fn test_world_matrix_composes_parent_chain() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root("root", Transform::from_position(Vec3::new(1.0, 0.0, 0.0)), None);
        let child = graph
            .add_child(root, "child", Transform::from_position(Vec3::new(0.0, 2.0, 0.0)), None)
            .unwrap();

        assert_eq!(graph.roots(), &[root]);
        assert_eq!(graph.len(), 2);

        let world = graph.world_matrix(child).unwrap();
        let origin = world.transform_point(&crate::foundation::math::Point3::origin());
        assert_relative_eq!(origin.coords, Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let mut graph = SceneGraph::new();
        let result = graph.add_child(NodeId(7), "orphan", Transform::identity(), None);
        assert_eq!(result, Err(SceneError::UnknownParent(NodeId(7))));
    }

    #[test]
    fn test_raycast_returns_nearest_node() {
        let mut graph = SceneGraph::new();
        // Two parallel walls facing +Z at z = -2 and z = -5
        let near = graph.add_root(
            "near",
            Transform::from_position(Vec3::new(0.0, 0.0, -2.0)),
            Some(plane_mesh(4.0, 4.0)),
        );
        graph.add_root(
            "far",
            Transform::from_position(Vec3::new(0.0, 0.0, -5.0)),
            Some(plane_mesh(4.0, 4.0)),
        );

        let hit = graph
            .raycast(&Ray::new(Vec3::new(0.3, 0.1, 0.0), Vec3::new(0.0, 0.0, -1.0)))
            .unwrap();
        assert_eq!(hit.node, near);
        assert_relative_eq!(hit.distance, 2.0, epsilon = 1e-12);
        assert_eq!(graph.find_by_name("far"), Some(NodeId(1)));
    }

    #[test]
    fn test_bounds_cover_all_meshes() {
        let mut graph = SceneGraph::new();
        let left = Transform::from_position(Vec3::new(-3.0, 0.0, 0.0));
        let right = Transform::from_position(Vec3::new(3.0, 0.0, 0.0));
        graph.add_root("a", left, Some(plane_mesh(2.0, 2.0)));
        graph.add_root("b", right, Some(plane_mesh(2.0, 2.0)));

        let bounds = graph.bounds();
        assert_relative_eq!(bounds.min.x, -4.0, epsilon = 1e-12);
        assert_relative_eq!(bounds.max.x, 4.0, epsilon = 1e-12);
        assert!(SceneGraph::new().bounds().is_empty());
    }
}
