use glam::{Mat4, Vec3, Vec4};

pub const MAX_TEXCOORD_CHANNELS: usize = 8;
pub const MAX_COLOR_CHANNELS: usize = 8;

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PrimitiveTypes: u32 {
        const POINT = 0x1;
        const LINE = 0x2;
        const TRIANGLE = 0x4;
        const POLYGON = 0x8;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Face {
    pub indices: Vec<u32>,
}

impl Face {
    pub fn triangle(a: u32, b: u32, c: u32) -> Self {
        Self {
            indices: vec![a, b, c],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VertexWeight {
    pub vertex_id: u32,
    pub weight: f32,
}

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    pub offset: Mat4,
    pub weights: Vec<VertexWeight>,
}

/// One texture-coordinate channel. Coordinates are stored as three
/// components regardless of how many `components` are meaningful.
#[derive(Debug, Clone)]
pub struct TexCoordChannel {
    pub components: u32,
    pub coords: Vec<Vec3>,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub primitive_types: PrimitiveTypes,
    pub material_index: u32,

    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
    pub bitangents: Vec<Vec3>,
    pub tex_coords: Vec<TexCoordChannel>,
    pub colors: Vec<Vec<Vec4>>,

    pub faces: Vec<Face>,
    pub bones: Vec<Bone>,
}

impl Mesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_tangents_and_bitangents(&self) -> bool {
        !self.tangents.is_empty() && !self.bitangents.is_empty()
    }
}
