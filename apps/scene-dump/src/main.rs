use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use glam::{Mat4, Quat, Vec3};
use strata_dump::{dump_to_file, DumpOptions};
use strata_scene::animation::{Animation, NodeAnim, QuatKey, VectorKey};
use strata_scene::camera::Camera;
use strata_scene::light::{Light, LightKind};
use strata_scene::material::{Material, MaterialProperty};
use strata_scene::mesh::{Face, Mesh, PrimitiveTypes};
use strata_scene::metadata::{MetadataEntry, MetadataValue};
use strata_scene::{Node, Scene};

#[derive(Parser)]
#[command(name = "scene-dump", about = "Write the built-in demo scene as a binary dump")]
struct Args {
    /// Output file path
    output: PathBuf,

    /// Replace bulk arrays with min/max envelopes and face hashes
    #[arg(long)]
    shortened: bool,

    /// Deflate-compress the scene payload
    #[arg(long)]
    compressed: bool,
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let command = std::env::args().collect::<Vec<_>>().join(" ");

    dump_to_file(
        &args.output,
        &command,
        &demo_scene(),
        DumpOptions {
            shortened: args.shortened,
            compressed: args.compressed,
        },
    )?;

    Ok(())
}

fn demo_scene() -> Scene {
    let mut root = Node::new("root");
    root.metadata
        .push(MetadataEntry::new("generator", MetadataValue::Str("scene-dump".to_owned())));

    let mut cube_node = Node::new("cube");
    cube_node.transform = Mat4::from_translation(Vec3::new(0.0, 0.5, 0.0));
    cube_node.meshes.push(0);
    root.children.push(cube_node);

    Scene {
        root,
        meshes: vec![cube_mesh()],
        materials: vec![Material {
            properties: vec![
                MaterialProperty::string("?mat.name", "cube"),
                MaterialProperty::floats("$clr.diffuse", &[0.8, 0.3, 0.1]),
            ],
        }],
        animations: vec![spin_animation()],
        lights: vec![Light {
            name: "sun".to_owned(),
            kind: LightKind::Directional,
            direction: Vec3::new(-0.4, -1.0, -0.3).normalize(),
            color_diffuse: Vec3::ONE,
            color_specular: Vec3::ONE,
            ..Default::default()
        }],
        cameras: vec![Camera {
            name: "main".to_owned(),
            position: Vec3::new(3.0, 2.0, 3.0),
            look_at: Vec3::new(-0.6, -0.3, -0.6).normalize(),
            aspect: 16.0 / 9.0,
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn cube_mesh() -> Mesh {
    let positions = [
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
    ];
    let quads = [
        [0, 1, 2, 3],
        [5, 4, 7, 6],
        [4, 0, 3, 7],
        [1, 5, 6, 2],
        [3, 2, 6, 7],
        [4, 5, 1, 0],
    ];

    let mut faces = Vec::with_capacity(quads.len() * 2);
    for [a, b, c, d] in quads {
        faces.push(Face::triangle(a, b, c));
        faces.push(Face::triangle(a, c, d));
    }

    Mesh {
        primitive_types: PrimitiveTypes::TRIANGLE,
        positions: positions.iter().map(|&p| Vec3::from(p)).collect(),
        faces,
        ..Default::default()
    }
}

fn spin_animation() -> Animation {
    let rotation_keys = (0..=4)
        .map(|i| QuatKey {
            time: i as f64 * 6.0,
            value: Quat::from_rotation_y(i as f32 * std::f32::consts::FRAC_PI_2),
        })
        .collect();

    Animation {
        name: "spin".to_owned(),
        duration: 24.0,
        ticks_per_second: 24.0,
        channels: vec![NodeAnim {
            node_name: "cube".to_owned(),
            rotation_keys,
            position_keys: vec![VectorKey {
                time: 0.0,
                value: Vec3::new(0.0, 0.5, 0.0),
            }],
            ..Default::default()
        }],
    }
}
