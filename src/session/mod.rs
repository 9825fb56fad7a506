//! A voxel session: one room's scene, turtle and outbound queue.
//!
//! Sessions own all of their state. Two sessions never share a scene or a
//! turtle, so a process can serve several rooms side by side.

pub mod args;
pub mod surface;

use voxelamming_link::{CommandHandler, CommandResponse, ResponseData, VoxelCommand};

use crate::core::error::Error;
use crate::core::types::{DVec3, Result};
use crate::snapshot::{build_snapshot, SnapshotQueue};
use crate::turtle::Turtle;
use crate::voxel::{Light, LightType, Scene, Shape};
use args::{color, number, vec3, within_bounds};

pub use surface::{Capability, Surface};

/// Default room name
pub const DEFAULT_ROOM: &str = "1000";

/// Command engine for one room
#[derive(Debug)]
pub struct Session {
    room: String,
    surface: Surface,
    scene: Scene,
    turtle: Turtle,
    queue: SnapshotQueue,
}

impl Session {
    /// Create a session with its own outbound queue
    pub fn new(room: impl Into<String>, surface: Surface) -> Self {
        Self::with_queue(room, surface, SnapshotQueue::new())
    }

    /// Create a session that enqueues into an existing queue
    pub fn with_queue(room: impl Into<String>, surface: Surface, queue: SnapshotQueue) -> Self {
        Self {
            room: room.into(),
            surface,
            scene: Scene::new(),
            turtle: Turtle::new(),
            queue,
        }
    }

    /// Apply one host command.
    ///
    /// Arguments are validated before anything is mutated, so a rejected
    /// command leaves the session unchanged.
    pub fn apply(&mut self, cmd: VoxelCommand) -> Result<ResponseData> {
        if !self.surface.allows(&cmd) {
            return Err(Error::Unsupported {
                command: cmd.name(),
                surface: self.surface.name(),
            });
        }

        match cmd {
            VoxelCommand::SetRoomName { name } => {
                log::info!("Room changed from {} to {}", self.room, name);
                self.room = name;
            }
            VoxelCommand::CreateBox { x, y, z, r, g, b, alpha, texture } => {
                let position = vec3(&x, &y, &z)?;
                let color = color(&r, &g, &b, &alpha)?;
                let texture = number(&texture, "texture")?;
                self.scene.place_box(position, color, texture);
            }
            VoxelCommand::RemoveBox { x, y, z } => {
                self.scene.remove_box(vec3(&x, &y, &z)?);
            }
            VoxelCommand::SetBoxSize { size } => {
                self.scene.set_size(number(&size, "size")?);
            }
            VoxelCommand::SetBuildInterval { interval } => {
                self.scene.set_build_interval(number(&interval, "interval")?);
            }
            VoxelCommand::WriteSentence {
                text,
                x,
                y,
                z,
                r,
                g,
                b,
                alpha,
                font_size,
                is_fixed_width,
            } => {
                let position = vec3(&x, &y, &z)?;
                let color = color(&r, &g, &b, &alpha)?;
                let font_size = number(&font_size, "fontSize")?;
                self.scene
                    .write_sentence(text, position, color, font_size, is_fixed_width);
            }
            VoxelCommand::SetLight {
                x,
                y,
                z,
                r,
                g,
                b,
                alpha,
                intensity,
                interval,
                light_type,
            } => {
                let light = Light {
                    position: vec3(&x, &y, &z)?,
                    color: color(&r, &g, &b, &alpha)?,
                    intensity: number(&intensity, "intensity")?,
                    interval: number(&interval, "interval")?,
                    light_type: LightType::parse(&light_type).ok_or_else(|| {
                        Error::InvalidArgument {
                            name: "lightType",
                            value: light_type.clone(),
                        }
                    })?,
                };
                self.scene.set_light(light);
            }
            VoxelCommand::SetCommand { command } => {
                self.scene.set_command(command);
            }
            VoxelCommand::DrawLine { x1, y1, z1, x2, y2, z2, r, g, b, alpha } => {
                let start = vec3(&x1, &y1, &z1)?;
                let end = vec3(&x2, &y2, &z2)?;
                let color = color(&r, &g, &b, &alpha)?;
                self.scene.draw_line(start, end, color);
            }
            VoxelCommand::ChangeShape { shape } => {
                let parsed = Shape::parse(&shape).ok_or_else(|| Error::InvalidArgument {
                    name: "shape",
                    value: shape.clone(),
                })?;
                self.scene.set_shape(parsed);
            }
            VoxelCommand::ChangeMaterial { is_metallic, roughness } => {
                self.scene
                    .set_material(is_metallic, number(&roughness, "roughness")?);
            }
            VoxelCommand::SetNode { x, y, z, pitch, yaw, roll } => {
                self.scene.set_node([
                    number(&x, "x")?,
                    number(&y, "y")?,
                    number(&z, "z")?,
                    number(&pitch, "pitch")?,
                    number(&yaw, "yaw")?,
                    number(&roll, "roll")?,
                ]);
            }
            VoxelCommand::AnimateNode(params) => {
                self.scene.animate_node(args::animation(&params)?);
            }
            VoxelCommand::AnimateGlobal(params) => {
                self.scene.animate_global(args::animation(&params)?);
            }
            VoxelCommand::FrameIn => {
                self.scene.frame_in();
            }
            VoxelCommand::FrameOut => self.scene.frame_out(),
            VoxelCommand::SetFrameFps { fps } => {
                self.scene.set_frame_fps(number(&fps, "fps")?);
            }
            VoxelCommand::SetFrameRepeats { repeats } => {
                self.scene.set_frame_repeats(number(&repeats, "repeats")?);
            }
            VoxelCommand::Forward { length } => {
                let length = number(&length, "length")?;
                self.check_move(length)?;
                self.turtle.forward(length, &mut self.scene);
            }
            VoxelCommand::Backward { length } => {
                let length = number(&length, "length")?;
                self.check_move(-length)?;
                self.turtle.backward(length, &mut self.scene);
            }
            VoxelCommand::Up { angle } => self.turtle.up(number(&angle, "angle")?),
            VoxelCommand::Down { angle } => self.turtle.down(number(&angle, "angle")?),
            VoxelCommand::Left { angle } => self.turtle.left(number(&angle, "angle")?),
            VoxelCommand::Right { angle } => self.turtle.right(number(&angle, "angle")?),
            VoxelCommand::SetColor { r, g, b, alpha } => {
                self.turtle.set_color(color(&r, &g, &b, &alpha)?);
            }
            VoxelCommand::PenDown => self.turtle.pen_down(),
            VoxelCommand::PenUp => self.turtle.pen_up(),
            VoxelCommand::SetPos { x, y, z } => {
                let position = self.scene.mode().quantize_vec3(vec3(&x, &y, &z)?);
                self.turtle.set_pos(position);
            }
            VoxelCommand::Reset => self.turtle.reset(),
            VoxelCommand::SendData => {
                let pending = self.send_data()?;
                return Ok(ResponseData::Queued {
                    room: self.room.clone(),
                    pending,
                });
            }
            VoxelCommand::ClearData => self.scene.clear(),
            VoxelCommand::GetTurtleState => return Ok(self.turtle_state()),
            VoxelCommand::GetSceneInfo => return Ok(self.scene_info()),
            VoxelCommand::Ping => {
                return Ok(ResponseData::Pong {
                    message: "pong".into(),
                });
            }
        }

        Ok(ResponseData::None)
    }

    /// Build a snapshot of the scene, queue it, and start a fresh batch.
    /// Returns the number of snapshots now pending.
    pub fn send_data(&mut self) -> Result<usize> {
        let snapshot = build_snapshot(&self.room, &mut self.scene)?;
        Ok(self.queue.enqueue(snapshot))
    }

    /// Reject a turtle move whose end point would leave the coordinate bounds
    fn check_move(&self, length: f64) -> Result<()> {
        let target = self.turtle.position() + self.turtle.heading() * length;
        within_bounds(target, "length")?;
        Ok(())
    }

    fn turtle_state(&self) -> ResponseData {
        ResponseData::TurtleState {
            position: self.turtle.position().to_array(),
            polar_theta: self.turtle.polar_theta(),
            polar_phi: self.turtle.polar_phi(),
            pen_down: self.turtle.is_pen_down(),
            color: self.turtle.color().to_array(),
        }
    }

    fn scene_info(&self) -> ResponseData {
        ResponseData::SceneInfo {
            room: self.room.clone(),
            box_count: self.scene.boxes().len(),
            frame_box_count: self.scene.frames().len(),
            sentence_count: self.scene.sentences().len(),
            light_count: self.scene.lights().len(),
            float_mode: self.scene.mode().is_float(),
            pending_snapshots: self.queue.len(),
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn turtle(&self) -> &Turtle {
        &self.turtle
    }

    /// Handle to this session's outbound queue
    pub fn queue(&self) -> &SnapshotQueue {
        &self.queue
    }

    /// Turtle position, for hosts that echo it back to the user
    pub fn turtle_position(&self) -> DVec3 {
        self.turtle.position()
    }
}

impl CommandHandler for Session {
    fn handle_command(&mut self, cmd: VoxelCommand) -> CommandResponse {
        let name = cmd.name();
        match self.apply(cmd) {
            Ok(data) => CommandResponse::ok(data),
            Err(e) => {
                log::warn!("Command {} rejected: {}", name, e);
                CommandResponse::error(e.to_string())
            }
        }
    }
}
