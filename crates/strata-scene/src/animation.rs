use glam::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VectorKey {
    pub time: f64,
    pub value: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QuatKey {
    pub time: f64,
    pub value: Quat,
}

/// What a channel does outside the time range covered by its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimBehavior {
    #[default]
    Default,
    Constant,
    Linear,
    Repeat,
}

impl From<AnimBehavior> for u32 {
    fn from(value: AnimBehavior) -> Self {
        match value {
            AnimBehavior::Default => 0,
            AnimBehavior::Constant => 1,
            AnimBehavior::Linear => 2,
            AnimBehavior::Repeat => 3,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeAnim {
    pub node_name: String,

    pub pre_state: AnimBehavior,
    pub post_state: AnimBehavior,

    pub position_keys: Vec<VectorKey>,
    pub rotation_keys: Vec<QuatKey>,
    pub scaling_keys: Vec<VectorKey>,
}

#[derive(Debug, Clone, Default)]
pub struct Animation {
    pub name: String,
    pub duration: f64,
    pub ticks_per_second: f64,
    pub channels: Vec<NodeAnim>,
}
