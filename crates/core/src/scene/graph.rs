//! Named scene nodes
//!
//! The asset loader (outside this crate) inserts one node per named object
//! it finds in the model. The core only ever looks nodes up by name, so a
//! model that has not finished loading simply has no nodes yet.

use crate::core_types::Vec3;
use nalgebra::UnitQuaternion;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub position: Vec3,
    pub rotation: UnitQuaternion<f32>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: UnitQuaternion::identity(),
        }
    }
}

/// Flat list of named nodes. Names are unique; inserting an existing name
/// replaces the old node.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `node`, returning the node it replaced if the name was taken.
    pub fn insert(&mut self, node: SceneNode) -> Option<SceneNode> {
        if let Some(existing) = self.nodes.iter_mut().find(|n| n.name == node.name) {
            return Some(std::mem::replace(existing, node));
        }
        self.nodes.push(node);
        None
    }

    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    pub fn remove(&mut self, name: &str) -> Option<SceneNode> {
        let index = self.nodes.iter().position(|n| n.name == name)?;
        Some(self.nodes.remove(index))
    }

    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let mut graph = SceneGraph::new();
        assert!(graph.is_empty());

        assert!(graph.insert(SceneNode::new("shed", Vec3::zeros())).is_none());
        assert!(graph.insert(SceneNode::new("title", Vec3::new(0.0, 5.0, 0.0))).is_none());

        assert_eq!(graph.len(), 2);
        assert_eq!(graph.find("title").unwrap().position.y, 5.0);
        assert!(graph.find("cradle").is_none());
    }

    #[test]
    fn test_insert_replaces_same_name() {
        let mut graph = SceneGraph::new();
        graph.insert(SceneNode::new("title", Vec3::zeros()));

        let old = graph.insert(SceneNode::new("title", Vec3::new(1.0, 2.0, 3.0)));

        assert_eq!(old.unwrap().position, Vec3::zeros());
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.find("title").unwrap().position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_remove() {
        let mut graph = SceneGraph::new();
        graph.insert(SceneNode::new("cradle", Vec3::zeros()));

        assert!(graph.remove("cradle").is_some());
        assert!(graph.remove("cradle").is_none());
        assert!(graph.is_empty());
    }
}
