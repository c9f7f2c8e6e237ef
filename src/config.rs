use crate::types::{ColorId, Vec2};

pub const FRAME_HZ: f32 = 40.0;

#[derive(Clone, Copy, Debug)]
pub struct Bounds {
    pub lo: f32,
    pub hi: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Spawn {
    pub pos: Vec2,
    pub radius: f32,
    pub color: ColorId,
}

#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub wall: ColorId,
    pub banner: ColorId,
    pub hud: ColorId,
}

#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub arena: f32,
    pub wall_inset: f32,
    pub wall_depth: f32,
    pub speed: f32,
    pub player: Spawn,
    pub good: Spawn,
    pub bad: Spawn,
    pub reducer: Spawn,
    pub palette: Palette,
}

impl GameConfig {
    // Collision happens at the inner face of the border stroke.
    pub fn bounds(&self) -> Bounds {
        Bounds {
            lo: self.wall_inset + self.wall_depth,
            hi: self.arena - self.wall_inset - self.wall_depth,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            arena: 500.0,
            wall_inset: 10.0,
            wall_depth: 2.0,
            speed: 5.0,
            player: Spawn {
                pos: Vec2::new(50.0, 50.0),
                radius: 20.0,
                color: ColorId::Red,
            },
            good: Spawn {
                pos: Vec2::new(200.0, 200.0),
                radius: 5.0,
                color: ColorId::Green,
            },
            bad: Spawn {
                pos: Vec2::new(400.0, 400.0),
                radius: 20.0,
                color: ColorId::Black,
            },
            reducer: Spawn {
                pos: Vec2::new(200.0, 200.0),
                radius: 5.0,
                color: ColorId::White,
            },
            palette: Palette {
                wall: ColorId::Black,
                banner: ColorId::Black,
                hud: ColorId::Sky,
            },
        }
    }
}
