//! Demo components and the stand-in scene graph they attach to.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use ecs_runtime::Component;
use glam::Vec3;
use tracing::debug;

/// Minimal scene graph: named nodes with a world-space translation.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: BTreeMap<String, Vec3>,
}

/// Shared handle to the scene, held by the host and by every [`Model`].
pub type SceneHandle = Rc<RefCell<Scene>>;

impl Scene {
    /// Create an empty shared scene.
    #[must_use]
    pub fn shared() -> SceneHandle {
        Rc::new(RefCell::new(Scene::default()))
    }

    /// Attach a node at the origin.
    pub fn attach(&mut self, node: &str) {
        self.nodes.insert(node.to_string(), Vec3::ZERO);
    }

    /// Detach a node. Returns `false` if it was not attached.
    pub fn detach(&mut self, node: &str) -> bool {
        self.nodes.remove(node).is_some()
    }

    /// Move an attached node.
    pub fn set_translation(&mut self, node: &str, at: Vec3) {
        if let Some(slot) = self.nodes.get_mut(node) {
            *slot = at;
        }
    }

    /// Translation of an attached node.
    #[must_use]
    pub fn translation(&self, node: &str) -> Option<Vec3> {
        self.nodes.get(node).copied()
    }

    /// Number of attached nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// World-space position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec3);

impl Position {
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self(Vec3::new(x, y, z))
    }
}

impl Component for Position {}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec3);

impl Component for Velocity {}

/// A renderable model attached to the scene. Detaches its node on cleanup.
#[derive(Debug)]
pub struct Model {
    node: String,
    scene: SceneHandle,
}

impl Model {
    /// Load a model under `node` and attach it to `scene`.
    pub fn load(node: impl Into<String>, scene: &SceneHandle) -> Self {
        let node = node.into();
        scene.borrow_mut().attach(&node);
        Self {
            node,
            scene: Rc::clone(scene),
        }
    }

    /// Name of the scene node backing this model.
    #[must_use]
    pub fn node(&self) -> &str {
        &self.node
    }

    /// Move the backing node.
    pub fn set_pos(&self, at: Vec3) {
        self.scene.borrow_mut().set_translation(&self.node, at);
    }
}

impl Component for Model {
    fn cleanup(&mut self) {
        let detached = self.scene.borrow_mut().detach(&self.node);
        debug!(node = %self.node, detached, "model cleanup");
    }
}
