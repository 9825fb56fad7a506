//! Command protocol - JSON command/response definitions

use serde::{Deserialize, Serialize};

/// A numeric block argument as the host delivers it.
///
/// Block layers hand over whatever the user typed into a number slot, so an
/// argument may arrive as a JSON number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumArg {
    Number(f64),
    Text(String),
}

impl NumArg {
    pub fn one() -> Self {
        Self::Number(1.0)
    }

    pub fn minus_one() -> Self {
        Self::Number(-1.0)
    }

    fn font_size() -> Self {
        Self::Number(8.0)
    }

    fn light_intensity() -> Self {
        Self::Number(1000.0)
    }

    fn animation_interval() -> Self {
        Self::Number(10.0)
    }

    /// Coerce to a number the way the host runtime casts block inputs.
    ///
    /// Blank text is zero. Text that does not parse yields NaN; rejecting it
    /// is up to the caller.
    pub fn coerce(&self) -> f64 {
        match self {
            Self::Number(v) => *v,
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

impl Default for NumArg {
    fn default() -> Self {
        Self::Number(0.0)
    }
}

impl From<f64> for NumArg {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for NumArg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

fn default_light_type() -> String {
    "point".to_string()
}

/// Commands sent from the host block layer to a voxel session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
    tag = "cmd",
    content = "params",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum VoxelCommand {
    /// Route subsequent snapshots to this room
    SetRoomName { name: String },
    /// Place a box, replacing any box already at that coordinate
    CreateBox {
        x: NumArg,
        y: NumArg,
        z: NumArg,
        r: NumArg,
        g: NumArg,
        b: NumArg,
        #[serde(default = "NumArg::one")]
        alpha: NumArg,
        #[serde(default = "NumArg::minus_one")]
        texture: NumArg,
    },
    /// Remove the box at a coordinate, if any
    RemoveBox { x: NumArg, y: NumArg, z: NumArg },
    /// Edge length of every box
    SetBoxSize { size: NumArg },
    /// Renderer build pacing in seconds
    SetBuildInterval { interval: NumArg },
    /// Write a text label into the scene
    WriteSentence {
        text: String,
        x: NumArg,
        y: NumArg,
        z: NumArg,
        r: NumArg,
        g: NumArg,
        b: NumArg,
        #[serde(default = "NumArg::one")]
        alpha: NumArg,
        #[serde(default = "NumArg::font_size")]
        font_size: NumArg,
        #[serde(default)]
        is_fixed_width: bool,
    },
    /// Add a light source
    SetLight {
        x: NumArg,
        y: NumArg,
        z: NumArg,
        r: NumArg,
        g: NumArg,
        b: NumArg,
        #[serde(default = "NumArg::one")]
        alpha: NumArg,
        #[serde(default = "NumArg::light_intensity")]
        intensity: NumArg,
        #[serde(default = "NumArg::one")]
        interval: NumArg,
        #[serde(default = "default_light_type")]
        light_type: String,
    },
    /// Renderer flag ("float" switches the session to float quantization)
    SetCommand { command: String },
    /// Rasterize a straight line of boxes
    DrawLine {
        x1: NumArg,
        y1: NumArg,
        z1: NumArg,
        x2: NumArg,
        y2: NumArg,
        z2: NumArg,
        r: NumArg,
        g: NumArg,
        b: NumArg,
        #[serde(default = "NumArg::one")]
        alpha: NumArg,
    },
    /// Box shape: box, square or plane
    ChangeShape { shape: String },
    /// Material flags
    ChangeMaterial {
        #[serde(default)]
        is_metallic: bool,
        roughness: NumArg,
    },
    /// Translate and rotate the whole node
    SetNode {
        #[serde(default)]
        x: NumArg,
        #[serde(default)]
        y: NumArg,
        #[serde(default)]
        z: NumArg,
        #[serde(default)]
        pitch: NumArg,
        #[serde(default)]
        yaw: NumArg,
        #[serde(default)]
        roll: NumArg,
    },
    /// Animate the node towards a transform
    AnimateNode(AnimationParams),
    /// Animate the whole scene towards a transform
    AnimateGlobal(AnimationParams),
    /// Start collecting boxes into a new frame
    FrameIn,
    /// Stop collecting boxes into frames
    FrameOut,
    /// Frame playback rate
    SetFrameFps { fps: NumArg },
    /// Frame playback repeat count
    SetFrameRepeats { repeats: NumArg },
    /// Move the turtle along its heading
    Forward { length: NumArg },
    /// Move the turtle against its heading
    Backward { length: NumArg },
    /// Pitch the turtle heading up (degrees)
    Up { angle: NumArg },
    /// Pitch the turtle heading down (degrees)
    Down { angle: NumArg },
    /// Yaw the turtle heading left (degrees)
    Left { angle: NumArg },
    /// Yaw the turtle heading right (degrees)
    Right { angle: NumArg },
    /// Turtle pen color
    SetColor {
        r: NumArg,
        g: NumArg,
        b: NumArg,
        #[serde(default = "NumArg::one")]
        alpha: NumArg,
    },
    /// Draw while moving
    PenDown,
    /// Move without drawing
    PenUp,
    /// Teleport the turtle without drawing
    SetPos { x: NumArg, y: NumArg, z: NumArg },
    /// Restore turtle defaults
    Reset,
    /// Capture the scene into a snapshot and queue it for delivery
    SendData,
    /// Reset the scene to defaults
    ClearData,
    /// Get the turtle's kinematic state
    GetTurtleState,
    /// Get scene counters
    GetSceneInfo,
    /// Ping (health check)
    Ping,
}

impl VoxelCommand {
    /// The command name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetRoomName { .. } => "setRoomName",
            Self::CreateBox { .. } => "createBox",
            Self::RemoveBox { .. } => "removeBox",
            Self::SetBoxSize { .. } => "setBoxSize",
            Self::SetBuildInterval { .. } => "setBuildInterval",
            Self::WriteSentence { .. } => "writeSentence",
            Self::SetLight { .. } => "setLight",
            Self::SetCommand { .. } => "setCommand",
            Self::DrawLine { .. } => "drawLine",
            Self::ChangeShape { .. } => "changeShape",
            Self::ChangeMaterial { .. } => "changeMaterial",
            Self::SetNode { .. } => "setNode",
            Self::AnimateNode(_) => "animateNode",
            Self::AnimateGlobal(_) => "animateGlobal",
            Self::FrameIn => "frameIn",
            Self::FrameOut => "frameOut",
            Self::SetFrameFps { .. } => "setFrameFps",
            Self::SetFrameRepeats { .. } => "setFrameRepeats",
            Self::Forward { .. } => "forward",
            Self::Backward { .. } => "backward",
            Self::Up { .. } => "up",
            Self::Down { .. } => "down",
            Self::Left { .. } => "left",
            Self::Right { .. } => "right",
            Self::SetColor { .. } => "setColor",
            Self::PenDown => "penDown",
            Self::PenUp => "penUp",
            Self::SetPos { .. } => "setPos",
            Self::Reset => "reset",
            Self::SendData => "sendData",
            Self::ClearData => "clearData",
            Self::GetTurtleState => "getTurtleState",
            Self::GetSceneInfo => "getSceneInfo",
            Self::Ping => "ping",
        }
    }
}

/// Target transform of an animation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationParams {
    #[serde(default)]
    pub x: NumArg,
    #[serde(default)]
    pub y: NumArg,
    #[serde(default)]
    pub z: NumArg,
    #[serde(default)]
    pub pitch: NumArg,
    #[serde(default)]
    pub yaw: NumArg,
    #[serde(default)]
    pub roll: NumArg,
    #[serde(default = "NumArg::one")]
    pub scale: NumArg,
    #[serde(default = "NumArg::animation_interval")]
    pub interval: NumArg,
}

/// Responses from the command server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CommandResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    None,
    Pong { message: String },
    Queued { room: String, pending: usize },
    TurtleState {
        position: [f64; 3],
        polar_theta: f64,
        polar_phi: f64,
        pen_down: bool,
        color: [f64; 4],
    },
    SceneInfo {
        room: String,
        box_count: usize,
        frame_box_count: usize,
        sentence_count: usize,
        light_count: usize,
        float_mode: bool,
        pending_snapshots: usize,
    },
}

impl CommandResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn none() -> Self {
        Self::ok(ResponseData::None)
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }
}
