use itertools::Itertools;
use std::fmt;

use crate::{
    canvas::{Canvas, Glow, Rgba},
    util::Point,
};

/// Below this an element is invisible on an 8-bit display.
const MIN_VISIBLE_OPACITY: f64 = 1.0 / 255.0;

#[derive(Debug, Clone)]
enum Shape {
    Rect {
        origin: Point,
        width: f64,
        height: f64,
        color: Rgba,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgba,
        glow: Glow,
    },
    Polyline {
        points: Vec<Point>,
        color: Rgba,
        line_width: f64,
    },
}

#[derive(Debug, Clone)]
struct Element {
    shape: Shape,
    opacity: f64,
}

/// Canvas that renders into an SVG document over a black background.
///
/// Translucent black fills over the whole surface are folded into the
/// opacity of what is already drawn, so the trails of earlier frames fade
/// out the same way they do on a raster canvas. Fully faded elements are
/// dropped.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    elements: Vec<Element>,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
        }
    }

    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    fn covers_surface(&self, origin: Point, width: f64, height: f64) -> bool {
        origin.x <= 0.0 && origin.y <= 0.0 && width >= self.width && height >= self.height
    }

    fn fade(&mut self, alpha: f64) {
        let keep = 1.0 - alpha;

        for element in &mut self.elements {
            element.opacity *= keep;
        }

        self.elements
            .retain(|element| element.opacity >= MIN_VISIBLE_OPACITY);
    }

    fn push(&mut self, shape: Shape) {
        self.elements.push(Element {
            shape,
            opacity: 1.0,
        });
    }
}

impl Canvas for SvgCanvas {
    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Rgba) {
        let is_black = color.r == 0 && color.g == 0 && color.b == 0;

        if is_black && self.covers_surface(origin, width, height) {
            self.fade(color.a);
        } else {
            self.push(Shape::Rect {
                origin,
                width,
                height,
                color,
            });
        }
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba, glow: Glow) {
        self.push(Shape::Circle {
            center,
            radius,
            color,
            glow,
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba, line_width: f64) {
        if points.len() < 2 {
            return;
        }

        self.push(Shape::Polyline {
            points: points.to_vec(),
            color,
            line_width,
        });
    }
}

fn rgb(color: &Rgba) -> String {
    format!("rgb({},{},{})", color.r, color.g, color.b)
}

impl fmt::Display for SvgCanvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        )?;
        writeln!(
            f,
            r#"<defs><filter id="glow" x="-200%" y="-200%" width="500%" height="500%"><feGaussianBlur stdDeviation="4"/></filter></defs>"#
        )?;
        writeln!(
            f,
            r#"<rect x="0" y="0" width="{}" height="{}" fill="black"/>"#,
            self.width, self.height
        )?;

        for element in &self.elements {
            match &element.shape {
                Shape::Rect {
                    origin,
                    width,
                    height,
                    color,
                } => writeln!(
                    f,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" fill-opacity="{:.4}"/>"#,
                    origin.x,
                    origin.y,
                    width,
                    height,
                    rgb(color),
                    color.a * element.opacity
                )?,
                Shape::Circle {
                    center,
                    radius,
                    color,
                    glow,
                } => {
                    if glow.blur > 0.0 && glow.color.a > 0.0 {
                        writeln!(
                            f,
                            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="{:.4}" filter="url(#glow)"/>"#,
                            center.x,
                            center.y,
                            radius + glow.blur / 3.0,
                            rgb(&glow.color),
                            glow.color.a * element.opacity * 0.5
                        )?;
                    }

                    writeln!(
                        f,
                        r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" fill-opacity="{:.4}"/>"#,
                        center.x,
                        center.y,
                        radius,
                        rgb(color),
                        color.a * element.opacity
                    )?
                }
                Shape::Polyline {
                    points,
                    color,
                    line_width,
                } => writeln!(
                    f,
                    r#"<polyline points="{}" fill="none" stroke="{}" stroke-opacity="{:.4}" stroke-width="{}"/>"#,
                    points
                        .iter()
                        .map(|point| format!("{:.2},{:.2}", point.x, point.y))
                        .join(" "),
                    rgb(color),
                    color.a * element.opacity,
                    line_width
                )?,
            }
        }

        write!(f, "</svg>")
    }
}
