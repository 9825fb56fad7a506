//! The voxel scene: placed boxes plus the renderer parameters sent with them.
//!
//! Boxes are keyed by their quantized coordinate. Placing a box where one
//! already exists replaces it (remove, then append), so the sequence keeps
//! insertion order while holding at most one box per coordinate.

use serde::{Serialize, Serializer};

use crate::core::types::{Color, DVec3};
use super::quantize::QuantizeMode;
use super::raster::rasterize;

/// Default box edge length
pub const DEFAULT_SIZE: f64 = 1.0;
/// Default renderer build interval in seconds
pub const DEFAULT_BUILD_INTERVAL: f64 = 0.01;
/// Default material roughness
pub const DEFAULT_ROUGHNESS: f64 = 0.5;
/// Extra-field value for boxes with no texture
pub const NO_TEXTURE: f64 = -1.0;
/// Largest absolute coordinate a host may place or draw to
pub const MAX_COORDINATE: f64 = 10_000.0;
/// Identity animation: no offset, no rotation, scale 1, interval 0
pub const IDENTITY_ANIMATION: [f64; 8] = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];

/// One placed box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelBox {
    /// Quantized position (the identity key)
    pub position: DVec3,
    pub color: Color,
    /// Texture id; [`NO_TEXTURE`] when unused
    pub texture: f64,
}

impl VoxelBox {
    /// Wire layout `[x, y, z, r, g, b, alpha, texture]`
    pub fn to_array(&self) -> [f64; 8] {
        let p = self.position;
        let c = self.color;
        [p.x, p.y, p.z, c.r, c.g, c.b, c.alpha, self.texture]
    }
}

impl Serialize for VoxelBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_array())
    }
}

/// A box that belongs to one animation frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameBox {
    pub voxel: VoxelBox,
    pub frame_id: u32,
}

impl Serialize for FrameBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let [x, y, z, r, g, b, a, t] = self.voxel.to_array();
        serializer.collect_seq([x, y, z, r, g, b, a, t, f64::from(self.frame_id)])
    }
}

/// A text label
#[derive(Clone, Debug, PartialEq)]
pub struct Sentence {
    pub text: String,
    pub position: DVec3,
    pub color: Color,
    pub font_size: f64,
    pub is_fixed_width: bool,
}

impl Sentence {
    /// Wire layout: every field as a string, fixed width as "1"/"0"
    pub fn to_row(&self) -> Vec<String> {
        let p = self.position;
        let c = self.color;
        vec![
            self.text.clone(),
            p.x.to_string(),
            p.y.to_string(),
            p.z.to_string(),
            c.r.to_string(),
            c.g.to_string(),
            c.b.to_string(),
            c.alpha.to_string(),
            self.font_size.to_string(),
            if self.is_fixed_width { "1" } else { "0" }.to_string(),
        ]
    }
}

impl Serialize for Sentence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_row())
    }
}

/// Kind of light source
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LightType {
    #[default]
    Point,
    Spot,
    Directional,
}

impl LightType {
    /// Parse a block menu value. Unknown names are `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "point" => Some(Self::Point),
            "spot" => Some(Self::Spot),
            "directional" => Some(Self::Directional),
            _ => None,
        }
    }

    /// Numeric code understood by the renderer
    pub fn code(self) -> f64 {
        match self {
            Self::Point => 1.0,
            Self::Spot => 2.0,
            Self::Directional => 3.0,
        }
    }
}

/// A light source
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: DVec3,
    pub color: Color,
    pub intensity: f64,
    pub interval: f64,
    pub light_type: LightType,
}

impl Serialize for Light {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let p = self.position;
        let c = self.color;
        serializer.collect_seq([
            p.x,
            p.y,
            p.z,
            c.r,
            c.g,
            c.b,
            c.alpha,
            self.intensity,
            self.interval,
            self.light_type.code(),
        ])
    }
}

/// Shape the renderer draws for every box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Box,
    Square,
    Plane,
}

impl Shape {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "box" => Some(Self::Box),
            "square" => Some(Self::Square),
            "plane" => Some(Self::Plane),
            _ => None,
        }
    }
}

/// Boxes, labels, lights and renderer parameters for one batch
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    boxes: Vec<VoxelBox>,
    frames: Vec<FrameBox>,
    sentences: Vec<Sentence>,
    lights: Vec<Light>,
    commands: Vec<String>,
    translation: [f64; 6],
    frame_translations: Vec<[f64; 7]>,
    animation: [f64; 8],
    global_animation: [f64; 8],
    size: f64,
    shape: Shape,
    is_metallic: bool,
    roughness: f64,
    build_interval: f64,
    mode: QuantizeMode,
    /// Frame receiving boxes, while framing
    current_frame: Option<u32>,
    last_frame_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create an empty scene with default parameters
    pub fn new() -> Self {
        Self {
            boxes: Vec::new(),
            frames: Vec::new(),
            sentences: Vec::new(),
            lights: Vec::new(),
            commands: Vec::new(),
            translation: [0.0; 6],
            frame_translations: Vec::new(),
            animation: IDENTITY_ANIMATION,
            global_animation: IDENTITY_ANIMATION,
            size: DEFAULT_SIZE,
            shape: Shape::Box,
            is_metallic: false,
            roughness: DEFAULT_ROUGHNESS,
            build_interval: DEFAULT_BUILD_INTERVAL,
            mode: QuantizeMode::Integer,
            current_frame: None,
            last_frame_id: 0,
        }
    }

    /// Reset boxes and every parameter to defaults
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    // -- Boxes ---------------------------------------------------------------

    /// Place a box, replacing any box at the same quantized coordinate.
    /// While framing, the box goes to the current frame instead.
    pub fn place_box(&mut self, position: DVec3, color: Color, texture: f64) {
        let position = self.mode.quantize_vec3(position);
        let voxel = VoxelBox { position, color, texture };

        match self.current_frame {
            Some(frame_id) => {
                self.remove_frame_box(position, frame_id);
                self.frames.push(FrameBox { voxel, frame_id });
            }
            None => {
                self.remove_at(position);
                self.boxes.push(voxel);
            }
        }
    }

    /// Remove the box at a coordinate. Missing boxes are ignored.
    pub fn remove_box(&mut self, position: DVec3) {
        let position = self.mode.quantize_vec3(position);
        match self.current_frame {
            Some(frame_id) => self.remove_frame_box(position, frame_id),
            None => self.remove_at(position),
        }
    }

    fn remove_at(&mut self, position: DVec3) {
        if let Some(i) = self.boxes.iter().position(|b| b.position == position) {
            self.boxes.remove(i);
        }
    }

    fn remove_frame_box(&mut self, position: DVec3, frame_id: u32) {
        if let Some(i) = self
            .frames
            .iter()
            .position(|f| f.frame_id == frame_id && f.voxel.position == position)
        {
            self.frames.remove(i);
        }
    }

    /// Place a box on every voxel of the segment from `start` to `end`.
    /// Returns the number of voxels drawn.
    pub fn draw_line(&mut self, start: DVec3, end: DVec3, color: Color) -> usize {
        let line = rasterize(start, end);
        let count = line.len();
        for voxel in line {
            self.place_box(voxel.as_dvec3(), color, NO_TEXTURE);
        }
        count
    }

    // -- Labels and lights ---------------------------------------------------

    pub fn write_sentence(
        &mut self,
        text: impl Into<String>,
        position: DVec3,
        color: Color,
        font_size: f64,
        is_fixed_width: bool,
    ) {
        let position = self.mode.quantize_vec3(position);
        self.sentences.push(Sentence {
            text: text.into(),
            position,
            color,
            font_size,
            is_fixed_width,
        });
    }

    pub fn set_light(&mut self, mut light: Light) {
        light.position = self.mode.quantize_vec3(light.position);
        self.lights.push(light);
    }

    // -- Renderer parameters -------------------------------------------------

    /// Record a renderer command. `"float"` also switches to float quantization.
    pub fn set_command(&mut self, command: impl Into<String>) {
        let command = command.into();
        if command == "float" {
            self.mode = QuantizeMode::Float;
        }
        self.commands.push(command);
    }

    pub fn set_size(&mut self, size: f64) {
        self.size = size;
    }

    pub fn set_build_interval(&mut self, seconds: f64) {
        self.build_interval = seconds;
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn set_material(&mut self, is_metallic: bool, roughness: f64) {
        self.is_metallic = is_metallic;
        self.roughness = roughness;
    }

    /// Set the node transform `[x, y, z, pitch, yaw, roll]`.
    /// While framing it is also recorded against the current frame.
    pub fn set_node(&mut self, transform: [f64; 6]) {
        let transform = self.mode.quantize_array(transform);
        self.translation = transform;
        if let Some(frame_id) = self.current_frame {
            let [x, y, z, pitch, yaw, roll] = transform;
            self.frame_translations
                .push([x, y, z, pitch, yaw, roll, f64::from(frame_id)]);
        }
    }

    /// Set the node animation `[x, y, z, pitch, yaw, roll, scale, interval]`
    pub fn animate_node(&mut self, animation: [f64; 8]) {
        self.animation = self.quantize_animation(animation);
    }

    /// Set the scene-wide animation
    pub fn animate_global(&mut self, animation: [f64; 8]) {
        self.global_animation = self.quantize_animation(animation);
    }

    fn quantize_animation(&self, animation: [f64; 8]) -> [f64; 8] {
        let [x, y, z, pitch, yaw, roll, scale, interval] = animation;
        let [x, y, z, pitch, yaw, roll] = self.mode.quantize_array([x, y, z, pitch, yaw, roll]);
        [x, y, z, pitch, yaw, roll, scale, interval]
    }

    // -- Frames --------------------------------------------------------------

    /// Start a new frame; returns its id
    pub fn frame_in(&mut self) -> u32 {
        self.last_frame_id += 1;
        self.current_frame = Some(self.last_frame_id);
        self.last_frame_id
    }

    pub fn frame_out(&mut self) {
        self.current_frame = None;
    }

    pub fn set_frame_fps(&mut self, fps: f64) {
        self.commands.push(format!("fps {}", fps));
    }

    pub fn set_frame_repeats(&mut self, repeats: f64) {
        self.commands.push(format!("repeats {}", repeats));
    }

    // -- Accessors -----------------------------------------------------------

    pub fn boxes(&self) -> &[VoxelBox] {
        &self.boxes
    }

    /// Box at a coordinate (quantized with the current mode)
    pub fn box_at(&self, position: DVec3) -> Option<&VoxelBox> {
        let position = self.mode.quantize_vec3(position);
        self.boxes.iter().find(|b| b.position == position)
    }

    pub fn frames(&self) -> &[FrameBox] {
        &self.frames
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn translation(&self) -> [f64; 6] {
        self.translation
    }

    pub fn frame_translations(&self) -> &[[f64; 7]] {
        &self.frame_translations
    }

    pub fn animation(&self) -> [f64; 8] {
        self.animation
    }

    pub fn global_animation(&self) -> [f64; 8] {
        self.global_animation
    }

    pub fn size(&self) -> f64 {
        self.size
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn is_metallic(&self) -> bool {
        self.is_metallic
    }

    pub fn roughness(&self) -> f64 {
        self.roughness
    }

    pub fn build_interval(&self) -> f64 {
        self.build_interval
    }

    pub fn mode(&self) -> QuantizeMode {
        self.mode
    }

    pub fn current_frame(&self) -> Option<u32> {
        self.current_frame
    }
}
