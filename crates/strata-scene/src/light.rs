use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LightKind {
    #[default]
    Undefined,
    Directional,
    Point,
    Spot,
    Ambient,
    Area,
}

impl From<LightKind> for u32 {
    fn from(value: LightKind) -> Self {
        match value {
            LightKind::Undefined => 0,
            LightKind::Directional => 1,
            LightKind::Point => 2,
            LightKind::Spot => 3,
            LightKind::Ambient => 4,
            LightKind::Area => 5,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,

    pub position: Vec3,
    pub direction: Vec3,
    pub up: Vec3,

    pub attenuation_constant: f32,
    pub attenuation_linear: f32,
    pub attenuation_quadratic: f32,

    pub color_diffuse: Vec3,
    pub color_specular: Vec3,
    pub color_ambient: Vec3,

    pub angle_inner_cone: f32,
    pub angle_outer_cone: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: LightKind::Undefined,
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
            up: Vec3::ZERO,
            attenuation_constant: 1.0,
            attenuation_linear: 0.0,
            attenuation_quadratic: 0.0,
            color_diffuse: Vec3::ZERO,
            color_specular: Vec3::ZERO,
            color_ambient: Vec3::ZERO,
            angle_inner_cone: std::f32::consts::TAU,
            angle_outer_cone: std::f32::consts::TAU,
        }
    }
}
