use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use chrono::Utc;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use log::{debug, info};
use strata_scene::animation::{Animation, NodeAnim};
use strata_scene::camera::Camera;
use strata_scene::light::{Light, LightKind};
use strata_scene::material::{Material, MaterialProperty};
use strata_scene::mesh::{Bone, Mesh, MAX_COLOR_CHANNELS, MAX_TEXCOORD_CHANNELS};
use strata_scene::metadata::MetadataValue;
use strata_scene::texture::Texture;
use strata_scene::{Node, Scene};

use crate::chunk::chunk;
use crate::encode::{encode_bounds, encode_len, encode_slice, ComponentBounds, Encode};
use crate::error::DumpError;
use crate::format;

#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    /// Replace bulk arrays with min/max envelopes and face hashes.
    pub shortened: bool,
    /// Deflate-compress the scene chunk stream as a whole.
    pub compressed: bool,
}

/// Serialize `scene` into a dump file at `path`. One-shot: any failure
/// aborts the export and leaves no validity guarantee for the partial
/// file. The file handle is closed exactly once on every path out.
pub fn dump_to_file(
    path: &Path,
    command: &str,
    scene: &Scene,
    options: DumpOptions,
) -> Result<(), DumpError> {
    let file = File::create(path).map_err(|source| DumpError::Open {
        path: path.to_owned(),
        source,
    })?;

    let mut out = BufWriter::new(file);
    dump_to(&mut out, &path.to_string_lossy(), command, scene, options)?;
    out.flush()?;

    info!("wrote binary scene dump to {}", path.display());
    Ok(())
}

/// Serialize `scene` into an arbitrary sink. `file_name` and `command`
/// are only recorded in the header.
pub fn dump_to<W: Write + ?Sized>(
    out: &mut W,
    file_name: &str,
    command: &str,
    scene: &Scene,
    options: DumpOptions,
) -> Result<(), DumpError> {
    write_header(out, file_name, command, options)?;

    let writer = SceneWriter {
        shortened: options.shortened,
    };

    if options.compressed {
        // Whole-scene buffering is the trade-off here: serialize fully in
        // memory, compress once, then emit size + payload.
        let mut buffered = Vec::new();
        writer.write_scene(&mut buffered, scene)?;

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
        encoder
            .write_all(&buffered)
            .map_err(DumpError::Compression)?;
        let compressed = encoder.finish().map_err(DumpError::Compression)?;
        debug!(
            "deflated scene stream: {} -> {} bytes",
            buffered.len(),
            compressed.len()
        );

        encode_len(out, buffered.len())?;
        out.write_all(&compressed)?;
    } else {
        writer.write_scene(out, scene)?;
    }

    Ok(())
}

fn write_header<W: Write + ?Sized>(
    out: &mut W,
    file_name: &str,
    command: &str,
    options: DumpOptions,
) -> Result<(), DumpError> {
    let mut header = Vec::with_capacity(format::HEADER_LENGTH);

    // Signature prefix plus a 25 byte asctime-style UTC timestamp fills
    // the 44 byte field exactly.
    let signature = format!(
        "{}{}",
        format::SIGNATURE_PREFIX,
        Utc::now().format("%a %b %e %H:%M:%S %Y\n")
    );
    write_padded(&mut header, signature.as_bytes(), format::SIGNATURE_LEN);

    header.write_u32::<LittleEndian>(format::VERSION_MAJOR)?;
    header.write_u32::<LittleEndian>(format::VERSION_MINOR)?;
    header.write_u32::<LittleEndian>(format::build_revision())?;
    header.write_u32::<LittleEndian>(format::compile_flags())?;
    header.write_u16::<LittleEndian>(options.shortened as u16)?;
    header.write_u16::<LittleEndian>(options.compressed as u16)?;

    write_padded(&mut header, file_name.as_bytes(), format::PATH_FIELD_LEN);
    write_padded(&mut header, command.as_bytes(), format::COMMAND_FIELD_LEN);
    header.extend(std::iter::repeat(format::RESERVED_FILL).take(format::RESERVED_LEN));

    debug_assert_eq!(header.len(), format::HEADER_LENGTH);
    out.write_all(&header)?;

    Ok(())
}

// Truncate-or-pad `bytes` into a fixed-width field.
fn write_padded(header: &mut Vec<u8>, bytes: &[u8], width: usize) {
    let used = bytes.len().min(width);
    header.extend_from_slice(&bytes[..used]);
    header.extend(std::iter::repeat(0u8).take(width - used));
}

/// Walks the scene graph in its fixed traversal order, emitting one chunk
/// per structural unit. Borrows everything; never mutates the scene.
struct SceneWriter {
    shortened: bool,
}

impl SceneWriter {
    fn write_scene<W: Write + ?Sized>(
        &self,
        container: &mut W,
        scene: &Scene,
    ) -> Result<(), DumpError> {
        debug!(
            "writing scene: {} meshes, {} materials, {} animations, {} textures, {} lights, {} cameras",
            scene.meshes.len(),
            scene.materials.len(),
            scene.animations.len(),
            scene.textures.len(),
            scene.lights.len(),
            scene.cameras.len()
        );

        chunk(container, format::CHUNK_SCENE, |out| {
            scene.flags.bits().encode(out)?;
            encode_len(out, scene.meshes.len())?;
            encode_len(out, scene.materials.len())?;
            encode_len(out, scene.animations.len())?;
            encode_len(out, scene.textures.len())?;
            encode_len(out, scene.lights.len())?;
            encode_len(out, scene.cameras.len())?;

            self.write_node(out, &scene.root)?;

            for mesh in &scene.meshes {
                self.write_mesh(out, mesh)?;
            }
            for material in &scene.materials {
                self.write_material(out, material)?;
            }
            for animation in &scene.animations {
                self.write_animation(out, animation)?;
            }
            for texture in &scene.textures {
                self.write_texture(out, texture)?;
            }
            for light in &scene.lights {
                self.write_light(out, light)?;
            }
            for camera in &scene.cameras {
                self.write_camera(out, camera)?;
            }

            Ok(())
        })
    }

    fn write_node<W: Write + ?Sized>(
        &self,
        container: &mut W,
        node: &Node,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_NODE, |out| {
            node.name.encode(out)?;
            node.transform.encode(out)?;
            encode_len(out, node.children.len())?;
            encode_len(out, node.meshes.len())?;
            encode_len(out, node.metadata.len())?;

            for &mesh_index in &node.meshes {
                mesh_index.encode(out)?;
            }

            for child in &node.children {
                self.write_node(out, child)?;
            }

            for entry in &node.metadata {
                entry.key.encode(out)?;
                entry.value.type_tag().encode(out)?;

                match &entry.value {
                    MetadataValue::Bool(value) => {
                        value.encode(out)?;
                    }
                    MetadataValue::Int32(value) => {
                        value.encode(out)?;
                    }
                    MetadataValue::UInt64(value) => {
                        value.encode(out)?;
                    }
                    MetadataValue::Float(value) => {
                        value.encode(out)?;
                    }
                    MetadataValue::Double(value) => {
                        value.encode(out)?;
                    }
                    MetadataValue::Str(value) => {
                        value.encode(out)?;
                    }
                    MetadataValue::Vec3(value) => {
                        value.encode(out)?;
                    }
                    // No encoding exists for these; the key and tag stay,
                    // the value is dropped.
                    MetadataValue::Int64(_) | MetadataValue::UInt32(_) => {}
                }
            }

            Ok(())
        })
    }

    fn write_mesh<W: Write + ?Sized>(
        &self,
        container: &mut W,
        mesh: &Mesh,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_MESH, |out| {
            mesh.primitive_types.bits().encode(out)?;
            encode_len(out, mesh.num_vertices())?;
            encode_len(out, mesh.faces.len())?;
            encode_len(out, mesh.bones.len())?;
            mesh.material_index.encode(out)?;

            // Presence bits first so a reader knows which of the optional
            // blocks follow.
            let mut components = 0u32;
            if !mesh.positions.is_empty() {
                components |= format::MESH_HAS_POSITIONS;
            }
            if mesh.has_normals() {
                components |= format::MESH_HAS_NORMALS;
            }
            if mesh.has_tangents_and_bitangents() {
                components |= format::MESH_HAS_TANGENTS_AND_BITANGENTS;
            }
            for channel in 0..mesh.tex_coords.len().min(MAX_TEXCOORD_CHANNELS) {
                components |= format::mesh_has_texcoord(channel);
            }
            for channel in 0..mesh.colors.len().min(MAX_COLOR_CHANNELS) {
                components |= format::mesh_has_color(channel);
            }
            components.encode(out)?;

            if !mesh.positions.is_empty() {
                self.write_attribute(out, &mesh.positions)?;
            }
            if mesh.has_normals() {
                self.write_attribute(out, &mesh.normals)?;
            }
            if mesh.has_tangents_and_bitangents() {
                self.write_attribute(out, &mesh.tangents)?;
                self.write_attribute(out, &mesh.bitangents)?;
            }
            for channel in mesh.tex_coords.iter().take(MAX_TEXCOORD_CHANNELS) {
                channel.components.encode(out)?;
                self.write_attribute(out, &channel.coords)?;
            }
            for channel in mesh.colors.iter().take(MAX_COLOR_CHANNELS) {
                self.write_attribute(out, channel)?;
            }

            if self.shortened {
                for word in crate::hash::hash_faces(&mesh.faces) {
                    word.encode(out)?;
                }
            } else {
                // 16 bit indices whenever they can address every vertex.
                let wide_indices = mesh.num_vertices() >= (1 << 16);
                for face in &mesh.faces {
                    let index_count = u16::try_from(face.indices.len())
                        .map_err(|_| DumpError::IntegerOverflow)?;
                    index_count.encode(out)?;

                    for &index in &face.indices {
                        if wide_indices {
                            index.encode(out)?;
                        } else {
                            (index as u16).encode(out)?;
                        }
                    }
                }
            }

            for bone in &mesh.bones {
                self.write_bone(out, bone)?;
            }

            Ok(())
        })
    }

    fn write_attribute<W, T>(&self, out: &mut W, items: &[T]) -> Result<usize, DumpError>
    where
        W: Write + ?Sized,
        T: Encode + ComponentBounds + Default,
    {
        if self.shortened {
            encode_bounds(out, items)
        } else {
            encode_slice(out, items)
        }
    }

    fn write_bone<W: Write + ?Sized>(
        &self,
        container: &mut W,
        bone: &Bone,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_BONE, |out| {
            bone.name.encode(out)?;
            encode_len(out, bone.weights.len())?;
            bone.offset.encode(out)?;
            self.write_attribute(out, &bone.weights)?;

            Ok(())
        })
    }

    fn write_material<W: Write + ?Sized>(
        &self,
        container: &mut W,
        material: &Material,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_MATERIAL, |out| {
            encode_len(out, material.properties.len())?;
            for property in &material.properties {
                self.write_material_property(out, property)?;
            }

            Ok(())
        })
    }

    // Materials are small; they are never shortened.
    fn write_material_property<W: Write + ?Sized>(
        &self,
        container: &mut W,
        property: &MaterialProperty,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_MATERIAL_PROPERTY, |out| {
            property.key.encode(out)?;
            property.semantic.encode(out)?;
            property.index.encode(out)?;
            encode_len(out, property.data.len())?;
            u32::from(property.ty).encode(out)?;
            out.write_all(&property.data)?;

            Ok(())
        })
    }

    fn write_animation<W: Write + ?Sized>(
        &self,
        container: &mut W,
        animation: &Animation,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_ANIMATION, |out| {
            animation.name.encode(out)?;
            animation.duration.encode(out)?;
            animation.ticks_per_second.encode(out)?;
            encode_len(out, animation.channels.len())?;

            for channel in &animation.channels {
                self.write_node_anim(out, channel)?;
            }

            Ok(())
        })
    }

    fn write_node_anim<W: Write + ?Sized>(
        &self,
        container: &mut W,
        channel: &NodeAnim,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_NODE_ANIM, |out| {
            channel.node_name.encode(out)?;
            encode_len(out, channel.position_keys.len())?;
            encode_len(out, channel.rotation_keys.len())?;
            encode_len(out, channel.scaling_keys.len())?;
            u32::from(channel.pre_state).encode(out)?;
            u32::from(channel.post_state).encode(out)?;

            if !channel.position_keys.is_empty() {
                self.write_attribute(out, &channel.position_keys)?;
            }
            if !channel.rotation_keys.is_empty() {
                self.write_attribute(out, &channel.rotation_keys)?;
            }
            if !channel.scaling_keys.is_empty() {
                self.write_attribute(out, &channel.scaling_keys)?;
            }

            Ok(())
        })
    }

    fn write_texture<W: Write + ?Sized>(
        &self,
        container: &mut W,
        texture: &Texture,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_TEXTURE, |out| {
            texture.width.encode(out)?;
            texture.height.encode(out)?;

            let mut hint = [0u8; format::FORMAT_HINT_LEN];
            let bytes = texture.format_hint.as_bytes();
            let used = bytes.len().min(hint.len());
            hint[..used].copy_from_slice(&bytes[..used]);
            out.write_all(&hint)?;

            // Pixel data is the one texture payload worth dropping in
            // shortened dumps.
            if !self.shortened {
                out.write_all(&texture.data)?;
            }

            Ok(())
        })
    }

    fn write_light<W: Write + ?Sized>(
        &self,
        container: &mut W,
        light: &Light,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_LIGHT, |out| {
            light.name.encode(out)?;
            u32::from(light.kind).encode(out)?;

            light.position.encode(out)?;
            light.direction.encode(out)?;
            light.up.encode(out)?;

            // Directional lights have no falloff.
            if light.kind != LightKind::Directional {
                light.attenuation_constant.encode(out)?;
                light.attenuation_linear.encode(out)?;
                light.attenuation_quadratic.encode(out)?;
            }

            light.color_diffuse.encode(out)?;
            light.color_specular.encode(out)?;
            light.color_ambient.encode(out)?;

            if light.kind == LightKind::Spot {
                light.angle_inner_cone.encode(out)?;
                light.angle_outer_cone.encode(out)?;
            }

            Ok(())
        })
    }

    fn write_camera<W: Write + ?Sized>(
        &self,
        container: &mut W,
        camera: &Camera,
    ) -> Result<(), DumpError> {
        chunk(container, format::CHUNK_CAMERA, |out| {
            camera.name.encode(out)?;
            camera.position.encode(out)?;
            camera.look_at.encode(out)?;
            camera.up.encode(out)?;
            camera.horizontal_fov.encode(out)?;
            camera.near.encode(out)?;
            camera.far.encode(out)?;
            camera.aspect.encode(out)?;

            Ok(())
        })
    }
}
