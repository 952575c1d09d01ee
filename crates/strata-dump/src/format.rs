use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

/// Human-readable part of the file signature; the remaining bytes of the
/// 44 byte signature field hold the creation timestamp.
pub const SIGNATURE_PREFIX: &str = "STRATA.binary-dump.";
pub const SIGNATURE_LEN: usize = 44;

pub const VERSION_MAJOR: u32 = 1;
pub const VERSION_MINOR: u32 = 0;

pub const PATH_FIELD_LEN: usize = 256;
pub const COMMAND_FIELD_LEN: usize = 128;
pub const RESERVED_LEN: usize = 64;
pub const RESERVED_FILL: u8 = 0xCD;

/// Fixed size of the uncompressed file header.
pub const HEADER_LENGTH: usize = 512;

pub const FORMAT_HINT_LEN: usize = 8;

pub const CHUNK_CAMERA: u32 = 0x1234;
pub const CHUNK_LIGHT: u32 = 0x1235;
pub const CHUNK_TEXTURE: u32 = 0x1236;
pub const CHUNK_MESH: u32 = 0x1237;
pub const CHUNK_NODE_ANIM: u32 = 0x1238;
pub const CHUNK_SCENE: u32 = 0x1239;
pub const CHUNK_BONE: u32 = 0x123a;
pub const CHUNK_ANIMATION: u32 = 0x123b;
pub const CHUNK_NODE: u32 = 0x123c;
pub const CHUNK_MATERIAL: u32 = 0x123d;
pub const CHUNK_MATERIAL_PROPERTY: u32 = 0x123e;

pub const MESH_HAS_POSITIONS: u32 = 0x1;
pub const MESH_HAS_NORMALS: u32 = 0x2;
pub const MESH_HAS_TANGENTS_AND_BITANGENTS: u32 = 0x4;
pub const MESH_HAS_TEXCOORD_BASE: u32 = 0x100;
pub const MESH_HAS_COLOR_BASE: u32 = 0x10000;

pub fn mesh_has_texcoord(channel: usize) -> u32 {
    MESH_HAS_TEXCOORD_BASE << channel
}

pub fn mesh_has_color(channel: usize) -> u32 {
    MESH_HAS_COLOR_BASE << channel
}

pub const COMPILE_FLAG_DEBUG: u32 = 0x1;
pub const COMPILE_FLAG_64BIT: u32 = 0x2;

/// Library build revision embedded in the header, packed from the crate
/// version as `major << 16 | minor << 8 | patch`.
pub fn build_revision() -> u32 {
    let major: u32 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
    let minor: u32 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    let patch: u32 = env!("CARGO_PKG_VERSION_PATCH").parse().unwrap_or(0);

    (major << 16) | (minor << 8) | patch
}

pub fn compile_flags() -> u32 {
    let mut flags = 0;
    if cfg!(debug_assertions) {
        flags |= COMPILE_FLAG_DEBUG;
    }
    if cfg!(target_pointer_width = "64") {
        flags |= COMPILE_FLAG_64BIT;
    }
    flags
}

/// Parsed fixed-size file header, as read back from an existing dump.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub signature: String,
    pub version_major: u32,
    pub version_minor: u32,
    pub build_revision: u32,
    pub compile_flags: u32,
    pub shortened: bool,
    pub compressed: bool,
    pub path: String,
    pub command: String,
}

impl HeaderInfo {
    pub fn parse<R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        let mut signature = [0u8; SIGNATURE_LEN];
        reader.read_exact(&mut signature)?;

        let version_major = reader.read_u32::<LittleEndian>()?;
        let version_minor = reader.read_u32::<LittleEndian>()?;
        let build_revision = reader.read_u32::<LittleEndian>()?;
        let compile_flags = reader.read_u32::<LittleEndian>()?;
        let shortened = reader.read_u16::<LittleEndian>()? != 0;
        let compressed = reader.read_u16::<LittleEndian>()? != 0;

        let mut path = [0u8; PATH_FIELD_LEN];
        reader.read_exact(&mut path)?;
        let mut command = [0u8; COMMAND_FIELD_LEN];
        reader.read_exact(&mut command)?;
        let mut reserved = [0u8; RESERVED_LEN];
        reader.read_exact(&mut reserved)?;

        Ok(Self {
            signature: zero_trimmed(&signature),
            version_major,
            version_minor,
            build_revision,
            compile_flags,
            shortened,
            compressed,
            path: zero_trimmed(&path),
            command: zero_trimmed(&command),
        })
    }
}

fn zero_trimmed(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).trim_end().to_owned()
}
