use std::f64::consts::TAU;

use crate::{
    config,
    types::{Rgb, Vec2},
};

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f64 = 2.0;

/// The 2-D drawing primitives the simulation renders with, in canvas
/// coordinates (`0..DIAMETER` on both axes).
pub trait Surface {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn set_stroke_color(&mut self, color: Rgb);
    fn set_fill_color(&mut self, color: Rgb);
    fn set_line_width(&mut self, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64);
    fn stroke(&mut self);
    fn fill(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PathOp {
    MoveTo(Vec2),
    LineTo(Vec2),
    Ellipse { center: Vec2, rx: f64, ry: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCell {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Option<Rgb>,
}

impl RenderCell {
    const BLANK: RenderCell = RenderCell {
        ch: ' ',
        fg: Rgb::WHITE,
        bg: None,
    };
}

/// Maps the square canvas onto the cell grid, centered and aspect-correct.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CanvasFit {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
}

impl CanvasFit {
    fn new(width: u16, height: u16) -> Self {
        let scale = (width as f64 / config::DIAMETER)
            .min(height as f64 * CELL_ASPECT / config::DIAMETER);
        Self {
            scale,
            offset_x: (width as f64 - config::DIAMETER * scale) / 2.0,
            offset_y: (height as f64 - config::DIAMETER * scale / CELL_ASPECT) / 2.0,
        }
    }

    fn to_cell(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x * self.scale + self.offset_x,
            p.y * self.scale / CELL_ASPECT + self.offset_y,
        )
    }

    fn radii_to_cell(&self, rx: f64, ry: f64) -> (f64, f64) {
        (rx * self.scale, ry * self.scale / CELL_ASPECT)
    }
}

#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
    fit: CanvasFit,
    path: Vec<PathOp>,
    stroke_color: Rgb,
    fill_color: Rgb,
    line_width: f64,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
            fit: CanvasFit::new(width, height),
            path: Vec::new(),
            stroke_color: Rgb::BLACK,
            fill_color: Rgb::BLACK,
            line_width: 1.0,
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.fit = CanvasFit::new(width, height);
        let len = (width as usize).saturating_mul(height as usize);
        if self.cells.len() != len {
            self.cells.resize(len, RenderCell::BLANK);
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = RenderCell::BLANK;
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> RenderCell {
        debug_assert!(x < self.width && y < self.height, "get() out of bounds");
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells[idx]
    }

    fn cell_mut(&mut self, x: i64, y: i64) -> Option<&mut RenderCell> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.cells.get_mut(idx)
    }

    fn plot(&mut self, p: Vec2) {
        if !p.is_finite() {
            return;
        }
        let ch = if self.line_width >= 2.0 { '•' } else { '·' };
        let fg = self.stroke_color;
        if let Some(cell) = self.cell_mut(p.x.floor() as i64, p.y.floor() as i64) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2) {
        let a = self.fit.to_cell(from);
        let b = self.fit.to_cell(to);
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let steps = steps.max(1.0) as usize;
        for i in 0..=steps {
            self.plot(a + delta * (i as f64 / steps as f64));
        }
    }

    fn stroke_ellipse(&mut self, center: Vec2, rx: f64, ry: f64) {
        let c = self.fit.to_cell(center);
        let (rx, ry) = self.fit.radii_to_cell(rx, ry);
        let samples = (TAU * rx.max(ry) * 2.0).ceil().max(8.0) as usize;
        for i in 0..samples {
            let t = TAU * i as f64 / samples as f64;
            self.plot(c + Vec2::new(rx * t.cos(), ry * t.sin()));
        }
    }

    fn fill_ellipse(&mut self, center: Vec2, rx: f64, ry: f64) {
        let c = self.fit.to_cell(center);
        let (rx, ry) = self.fit.radii_to_cell(rx, ry);
        let fill = self.fill_color;
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let min_x = (c.x - rx).floor() as i64;
        let max_x = (c.x + rx).ceil() as i64;
        let min_y = (c.y - ry).floor() as i64;
        let max_y = (c.y + ry).ceil() as i64;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let nx = (x as f64 + 0.5 - c.x) / rx;
                let ny = (y as f64 + 0.5 - c.y) / ry;
                if nx * nx + ny * ny > 1.0 {
                    continue;
                }
                if let Some(cell) = self.cell_mut(x, y) {
                    cell.ch = ' ';
                    cell.bg = Some(fill);
                }
            }
        }
    }
}

impl Surface for FrameBuffer {
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let top_left = self.fit.to_cell(Vec2::new(x, y));
        let bottom_right = self.fit.to_cell(Vec2::new(x + width, y + height));
        let min_x = top_left.x.floor().max(0.0) as i64;
        let min_y = top_left.y.floor().max(0.0) as i64;
        let max_x = bottom_right.x.ceil().min(self.width as f64) as i64;
        let max_y = bottom_right.y.ceil().min(self.height as f64) as i64;
        for cy in min_y..max_y {
            for cx in min_x..max_x {
                if let Some(cell) = self.cell_mut(cx, cy) {
                    *cell = RenderCell::BLANK;
                }
            }
        }
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(PathOp::MoveTo(Vec2::new(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.path.push(PathOp::LineTo(Vec2::new(x, y)));
    }

    fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        self.path.push(PathOp::Ellipse {
            center: Vec2::new(cx, cy),
            rx,
            ry,
        });
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        let mut current: Option<Vec2> = None;
        for op in &path {
            match *op {
                PathOp::MoveTo(p) => current = Some(p),
                PathOp::LineTo(p) => {
                    if let Some(from) = current {
                        self.stroke_line(from, p);
                    }
                    current = Some(p);
                }
                PathOp::Ellipse { center, rx, ry } => {
                    self.stroke_ellipse(center, rx, ry);
                    current = None;
                }
            }
        }
        self.path = path;
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        for op in &path {
            if let PathOp::Ellipse { center, rx, ry } = *op {
                self.fill_ellipse(center, rx, ry);
            }
        }
        self.path = path;
    }
}

#[cfg(test)]
pub mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Command {
        ClearRect(f64, f64, f64, f64),
        StrokeColor(Rgb),
        FillColor(Rgb),
        LineWidth(f64),
        BeginPath,
        MoveTo(f64, f64),
        LineTo(f64, f64),
        Ellipse(f64, f64, f64, f64),
        Stroke,
        Fill,
    }

    /// Records every drawing call for inspection.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub commands: Vec<Command>,
    }

    impl RecordingSurface {
        pub fn count(&self, wanted: &Command) -> usize {
            self.commands.iter().filter(|c| *c == wanted).count()
        }
    }

    impl Surface for RecordingSurface {
        fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
            self.commands.push(Command::ClearRect(x, y, width, height));
        }

        fn set_stroke_color(&mut self, color: Rgb) {
            self.commands.push(Command::StrokeColor(color));
        }

        fn set_fill_color(&mut self, color: Rgb) {
            self.commands.push(Command::FillColor(color));
        }

        fn set_line_width(&mut self, width: f64) {
            self.commands.push(Command::LineWidth(width));
        }

        fn begin_path(&mut self) {
            self.commands.push(Command::BeginPath);
        }

        fn move_to(&mut self, x: f64, y: f64) {
            self.commands.push(Command::MoveTo(x, y));
        }

        fn line_to(&mut self, x: f64, y: f64) {
            self.commands.push(Command::LineTo(x, y));
        }

        fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
            self.commands.push(Command::Ellipse(cx, cy, rx, ry));
        }

        fn stroke(&mut self) {
            self.commands.push(Command::Stroke);
        }

        fn fill(&mut self) {
            self.commands.push(Command::Fill);
        }
    }
}
