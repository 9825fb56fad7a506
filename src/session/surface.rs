//! Command surfaces: which commands a session accepts.
//!
//! All surfaces drive the same scene engine. They differ only in the
//! capability sets they expose to the host block layer.

use serde::{Deserialize, Serialize};
use voxelamming_link::VoxelCommand;

/// Group of related commands
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// Room, boxes, labels, lights, renderer parameters, clear and send
    Scene,
    /// Node transform, animation and frames
    Node,
    /// Turtle kinematics and pen
    Turtle,
    /// Explicit line drawing
    Line,
}

impl Capability {
    /// Capability a command needs
    pub fn of(cmd: &VoxelCommand) -> Self {
        use VoxelCommand::*;
        match cmd {
            SetRoomName { .. }
            | CreateBox { .. }
            | RemoveBox { .. }
            | SetBoxSize { .. }
            | SetBuildInterval { .. }
            | WriteSentence { .. }
            | SetLight { .. }
            | SetCommand { .. }
            | ChangeShape { .. }
            | ChangeMaterial { .. }
            | SendData
            | ClearData
            | GetSceneInfo
            | Ping => Self::Scene,
            SetNode { .. }
            | AnimateNode(_)
            | AnimateGlobal(_)
            | FrameIn
            | FrameOut
            | SetFrameFps { .. }
            | SetFrameRepeats { .. } => Self::Node,
            Forward { .. }
            | Backward { .. }
            | Up { .. }
            | Down { .. }
            | Left { .. }
            | Right { .. }
            | SetColor { .. }
            | PenDown
            | PenUp
            | SetPos { .. }
            | Reset
            | GetTurtleState => Self::Turtle,
            DrawLine { .. } => Self::Line,
        }
    }
}

/// Command surface a session exposes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Plain box placement
    Box,
    /// Boxes plus node transforms, animation and frames
    Animated,
    /// Boxes plus turtle drawing
    #[default]
    Turtle,
}

impl Surface {
    pub fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Box => &[Capability::Scene],
            Self::Animated => &[Capability::Scene, Capability::Node, Capability::Line],
            Self::Turtle => &[Capability::Scene, Capability::Turtle, Capability::Line],
        }
    }

    /// Whether a command is available on this surface
    pub fn allows(self, cmd: &VoxelCommand) -> bool {
        self.capabilities().contains(&Capability::of(cmd))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Animated => "animated",
            Self::Turtle => "turtle",
        }
    }

    /// Parse a surface name as written in config and on the command line
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "box" => Some(Self::Box),
            "animated" => Some(Self::Animated),
            "turtle" => Some(Self::Turtle),
            _ => None,
        }
    }
}
