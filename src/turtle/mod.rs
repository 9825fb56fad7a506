//! Turtle cursor: a position and heading moved by relative commands.
//!
//! The heading is two polar angles in degrees with y as the polar axis:
//! theta is measured from +y, phi is the azimuth measured from +z towards +x.
//! At the default heading (theta = 90, phi = 90) the turtle faces +x.

use crate::core::types::{Color, DVec3};
use crate::voxel::Scene;

/// Default polar angle (degrees)
pub const DEFAULT_THETA: f64 = 90.0;
/// Default azimuth (degrees)
pub const DEFAULT_PHI: f64 = 90.0;

/// Turtle kinematic state
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Turtle {
    position: DVec3,
    polar_theta: f64,
    polar_phi: f64,
    pen_down: bool,
    color: Color,
}

impl Default for Turtle {
    fn default() -> Self {
        Self::new()
    }
}

impl Turtle {
    /// Turtle at the origin facing +x with the pen down in opaque black
    pub fn new() -> Self {
        Self {
            position: DVec3::ZERO,
            polar_theta: DEFAULT_THETA,
            polar_phi: DEFAULT_PHI,
            pen_down: true,
            color: Color::BLACK,
        }
    }

    /// Unit vector of the current heading
    pub fn heading(&self) -> DVec3 {
        let theta = self.polar_theta.to_radians();
        let phi = self.polar_phi.to_radians();
        DVec3::new(
            theta.sin() * phi.sin(),
            theta.cos(),
            theta.sin() * phi.cos(),
        )
    }

    /// Move `length` along the heading. With the pen down, the segment from
    /// the old position to the new one is drawn into `scene`.
    ///
    /// The new position is quantized with the scene's mode before it is
    /// stored, so repeated moves do not drift.
    pub fn forward(&mut self, length: f64, scene: &mut Scene) {
        let target = scene.mode().quantize_vec3(self.position + self.heading() * length);

        if self.pen_down {
            let drawn = scene.draw_line(self.position, target, self.color);
            log::trace!("Turtle drew {} voxels to {}", drawn, target);
        }

        self.position = target;
    }

    pub fn backward(&mut self, length: f64, scene: &mut Scene) {
        self.forward(-length, scene);
    }

    /// Pitch up: decreases theta
    pub fn up(&mut self, angle: f64) {
        self.polar_theta -= angle;
    }

    /// Pitch down: increases theta
    pub fn down(&mut self, angle: f64) {
        self.polar_theta += angle;
    }

    /// Yaw left: increases phi
    pub fn left(&mut self, angle: f64) {
        self.polar_phi += angle;
    }

    /// Yaw right: decreases phi
    pub fn right(&mut self, angle: f64) {
        self.polar_phi -= angle;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn pen_down(&mut self) {
        self.pen_down = true;
    }

    pub fn pen_up(&mut self) {
        self.pen_down = false;
    }

    /// Teleport without drawing
    pub fn set_pos(&mut self, position: DVec3) {
        self.position = position;
    }

    /// Restore every field to its default
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    pub fn polar_theta(&self) -> f64 {
        self.polar_theta
    }

    pub fn polar_phi(&self) -> f64 {
        self.polar_phi
    }

    pub fn is_pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn color(&self) -> Color {
        self.color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::IVec3;
    use crate::voxel::QuantizeMode;

    #[test]
    fn test_forward_ten_draws_eleven_boxes() {
        let mut scene = Scene::new();
        let mut turtle = Turtle::new();
        turtle.forward(10.0, &mut scene);

        assert_eq!(turtle.position(), DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(scene.boxes().len(), 11);
        for (i, b) in scene.boxes().iter().enumerate() {
            assert_eq!(b.position, DVec3::new(i as f64, 0.0, 0.0));
            assert_eq!(b.color, Color::new(0.0, 0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_forward_then_backward_returns() {
        for mode_command in [None, Some("float")] {
            let mut scene = Scene::new();
            if let Some(command) = mode_command {
                scene.set_command(command);
            }
            let mut turtle = Turtle::new();
            turtle.up(30.0);
            turtle.left(45.0);
            turtle.forward(7.0, &mut scene);
            turtle.backward(7.0, &mut scene);

            let p = turtle.position();
            let tolerance = if scene.mode() == QuantizeMode::Float { 0.02 } else { 1.0 };
            assert!(p.length() <= tolerance, "{mode_command:?}: {p}");
        }
    }

    #[test]
    fn test_axis_conventions() {
        let mut scene = Scene::new();
        let mut turtle = Turtle::new();
        turtle.pen_up();

        // theta 0 points along +y
        turtle.up(90.0);
        turtle.forward(3.0, &mut scene);
        assert_eq!(turtle.position(), DVec3::new(0.0, 3.0, 0.0));

        // theta 90, phi 0 points along +z
        turtle.reset();
        turtle.pen_up();
        turtle.right(90.0);
        turtle.forward(4.0, &mut scene);
        assert_eq!(turtle.position(), DVec3::new(0.0, 0.0, 4.0));

        assert!(scene.boxes().is_empty());
    }

    #[test]
    fn test_angle_signs() {
        let mut turtle = Turtle::new();
        turtle.up(10.0);
        turtle.right(20.0);
        assert_eq!(turtle.polar_theta(), 80.0);
        assert_eq!(turtle.polar_phi(), 70.0);
        turtle.down(400.0);
        turtle.left(400.0);
        // Angles are not wrapped
        assert_eq!(turtle.polar_theta(), 480.0);
        assert_eq!(turtle.polar_phi(), 470.0);
    }

    #[test]
    fn test_pen_up_moves_without_drawing() {
        let mut scene = Scene::new();
        let mut turtle = Turtle::new();
        turtle.pen_up();
        turtle.forward(5.0, &mut scene);
        assert!(scene.boxes().is_empty());
        assert_eq!(turtle.position(), DVec3::new(5.0, 0.0, 0.0));

        turtle.pen_down();
        turtle.set_color(Color::new(1.0, 0.0, 0.0, 0.5));
        turtle.forward(2.0, &mut scene);
        assert_eq!(scene.boxes().len(), 3);
        assert_eq!(scene.boxes()[0].position, DVec3::new(5.0, 0.0, 0.0));
        assert_eq!(scene.boxes()[2].color, Color::new(1.0, 0.0, 0.0, 0.5));
    }

    #[test]
    fn test_diagonal_forward_stays_connected() {
        let mut scene = Scene::new();
        let mut turtle = Turtle::new();
        turtle.up(45.0);
        turtle.forward(10.0, &mut scene);

        let voxels: Vec<IVec3> = scene
            .boxes()
            .iter()
            .map(|b| b.position.as_ivec3())
            .collect();
        assert_eq!(voxels.first(), Some(&IVec3::ZERO));
        assert_eq!(voxels.last(), Some(&IVec3::new(7, 7, 0)));
        for pair in voxels.windows(2) {
            let step = (pair[1] - pair[0]).abs();
            assert!(step.max_element() <= 1, "{pair:?}");
        }
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut scene = Scene::new();
        let mut turtle = Turtle::new();
        turtle.forward(3.0, &mut scene);
        turtle.up(15.0);
        turtle.pen_up();
        turtle.set_color(Color::new(0.2, 0.3, 0.4, 1.0));
        turtle.reset();
        assert_eq!(turtle, Turtle::new());
    }
}
