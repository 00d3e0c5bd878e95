use serde::{Deserialize, Serialize};

use crate::util::{clamp_unit, Point};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same colour, alpha clamped to [0, 1].
    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: clamp_unit(a),
            ..self
        }
    }
}

pub const BACKGROUND: Rgba = Rgba::new(0, 0, 0, 1.0);
pub const NEURON_FILL: Rgba = Rgba::new(180, 220, 255, 1.0);
pub const NEURON_GLOW: Rgba = Rgba::new(100, 200, 255, 1.0);
pub const AXON_STROKE: Rgba = Rgba::new(180, 220, 255, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f64,
}

/// A 2D drawable surface. Implementations decide how the commands are
/// realised; the simulation only issues them.
pub trait Canvas {
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Rgba);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Glow);

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    FillRect {
        origin: Point,
        width: f64,
        height: f64,
        color: Rgba,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Rgba,
        glow: Glow,
    },
    StrokePolyline {
        points: Vec<Point>,
        color: Rgba,
        line_width: f64,
    },
}

/// Discards everything; for runs where only the simulation state matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCanvas;

impl Canvas for NullCanvas {
    fn fill_rect(&mut self, _origin: Point, _width: f64, _height: f64, _color: Rgba) {}

    fn fill_circle(&mut self, _center: Point, _radius: f64, _color: Rgba, _glow: Glow) {}

    fn stroke_polyline(&mut self, _points: &[Point], _color: Rgba, _line_width: f64) {}
}

/// Canvas that keeps every command it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn polylines(&self) -> impl Iterator<Item = (&[Point], &Rgba)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::StrokePolyline { points, color, .. } => Some((points.as_slice(), color)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (&Point, &Rgba)> + '_ {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillCircle { center, color, .. } => Some((center, color)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            width,
            height,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Glow) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
            glow,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64) {
        self.commands.push(DrawCommand::StrokePolyline {
            points: points.to_vec(),
            color,
            line_width,
        });
    }
}
