use crate::{
    config::GameConfig,
    types::{BallSnapshot, ColorId, Vec2},
};

const GAME_OVER_BANNER: &str = "YOU GOT TRAPPED";

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

// Terminal cells are roughly twice as tall as they are wide, so the world
// maps through a horizontal scale double the vertical one.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    sx: f32,
    sy: f32,
    ox: f32,
    oy: f32,
}

impl Projection {
    pub fn fit(viewport: Viewport, world: f32) -> Projection {
        let scale =
            (viewport.width as f32 / (2.0 * world)).min(viewport.height as f32 / world);
        let sx = scale * 2.0;
        let sy = scale;
        let ox = (viewport.width as f32 - world * sx) / 2.0;
        let oy = (viewport.height as f32 - world * sy) / 2.0;
        Projection { sx, sy, ox, oy }
    }

    pub fn to_cell(&self, pos: Vec2) -> (i32, i32) {
        (
            (pos.x * self.sx + self.ox).round() as i32,
            (pos.y * self.sy + self.oy).round() as i32,
        )
    }

    pub fn cell_center(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(
            (x as f32 - self.ox) / self.sx,
            (y as f32 - self.oy) / self.sy,
        )
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderCell {
    pub ch: char,
    pub priority: i32,
    pub color: ColorId,
}

#[derive(Debug)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<RenderCell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let mut buffer = Self {
            width,
            height,
            cells: Vec::new(),
        };
        buffer.resize(width, height);
        buffer
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        let len = (width as usize).saturating_mul(height as usize);
        if self.cells.len() != len {
            self.cells.resize(
                len,
                RenderCell {
                    ch: ' ',
                    priority: i32::MIN,
                    color: ColorId::White,
                },
            );
        }
        self.clear();
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            cell.ch = ' ';
            cell.priority = i32::MIN;
            cell.color = ColorId::White;
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

    fn set(&mut self, x: i32, y: i32, ch: char, priority: i32, color: ColorId) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        let cell = &mut self.cells[idx];
        if priority >= cell.priority {
            cell.priority = priority;
            cell.ch = ch;
            cell.color = color;
        }
    }
}

pub fn draw(
    snapshot: &[BallSnapshot],
    config: &GameConfig,
    over: bool,
    viewport: Viewport,
    frame: &mut FrameBuffer,
) {
    if frame.width() != viewport.width || frame.height() != viewport.height {
        frame.resize(viewport.width, viewport.height);
    } else {
        frame.clear();
    }

    let proj = Projection::fit(viewport, config.arena);

    draw_border(config, &proj, frame);

    for (layer, ball) in snapshot.iter().enumerate() {
        draw_ball(ball, layer as i32 + 1, &proj, frame);
    }

    if over {
        draw_banner(config.palette.banner, viewport, frame);
    }
}

fn draw_border(config: &GameConfig, proj: &Projection, frame: &mut FrameBuffer) {
    let near = config.wall_inset;
    let far = config.arena - config.wall_inset;
    let (x0, y0) = proj.to_cell(Vec2::new(near, near));
    let (x1, y1) = proj.to_cell(Vec2::new(far, far));
    let color = config.palette.wall;

    for x in x0..=x1 {
        frame.set(x, y0, '─', 0, color);
        frame.set(x, y1, '─', 0, color);
    }
    for y in y0..=y1 {
        frame.set(x0, y, '│', 0, color);
        frame.set(x1, y, '│', 0, color);
    }
    frame.set(x0, y0, '┌', 0, color);
    frame.set(x1, y0, '┐', 0, color);
    frame.set(x0, y1, '└', 0, color);
    frame.set(x1, y1, '┘', 0, color);
}

fn draw_ball(ball: &BallSnapshot, priority: i32, proj: &Projection, frame: &mut FrameBuffer) {
    let glyph = glyph_for(ball.color);
    let (min_x, min_y) = proj.to_cell(Vec2::new(
        ball.pos.x - ball.radius,
        ball.pos.y - ball.radius,
    ));
    let (max_x, max_y) = proj.to_cell(Vec2::new(
        ball.pos.x + ball.radius,
        ball.pos.y + ball.radius,
    ));
    let radius_sq = ball.radius * ball.radius;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let delta = proj.cell_center(x, y) - ball.pos;
            if delta.length_sq() <= radius_sq {
                frame.set(x, y, glyph, priority, ball.color);
            }
        }
    }

    // The smallest balls cover less than one cell; keep them visible.
    let (cx, cy) = proj.to_cell(ball.pos);
    frame.set(cx, cy, glyph, priority, ball.color);
}

fn draw_banner(color: ColorId, viewport: Viewport, frame: &mut FrameBuffer) {
    let row = viewport.height as i32 / 2;
    let start = (viewport.width as i32 - GAME_OVER_BANNER.len() as i32) / 2;
    for (i, ch) in GAME_OVER_BANNER.chars().enumerate() {
        frame.set(start + i as i32, row, ch, i32::MAX, color);
    }
}

fn glyph_for(color: ColorId) -> char {
    match color {
        ColorId::Red => '@',
        ColorId::Green => '+',
        ColorId::Black => '#',
        ColorId::White => 'o',
        ColorId::Sky => '*',
    }
}
