use glam::Mat4;

use animation::Animation;
use camera::Camera;
use light::Light;
use material::Material;
use mesh::Mesh;
use metadata::MetadataEntry;
use texture::Texture;

pub mod animation;
pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod metadata;
pub mod texture;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SceneFlags: u32 {
        const INCOMPLETE = 0x1;
        const VALIDATED = 0x2;
        const VALIDATION_WARNING = 0x4;
        const NON_VERBOSE_FORMAT = 0x8;
        const TERRAIN = 0x10;
        const ALLOW_SHARED = 0x20;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,

    pub transform: Mat4,
    pub children: Vec<Node>,

    /// Indices into `Scene::meshes`, not owned by the node.
    pub meshes: Vec<u32>,
    pub metadata: Vec<MetadataEntry>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub flags: SceneFlags,
    pub root: Node,

    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub animations: Vec<Animation>,
    pub textures: Vec<Texture>,
    pub lights: Vec<Light>,
    pub cameras: Vec<Camera>,
}
