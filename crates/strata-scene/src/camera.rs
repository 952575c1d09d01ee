use glam::Vec3;

#[derive(Debug, Clone)]
pub struct Camera {
    pub name: String,

    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,

    pub horizontal_fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, 1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            horizontal_fov: 0.25 * std::f32::consts::PI,
            near: 0.1,
            far: 1000.0,
            aspect: 0.0,
        }
    }
}
