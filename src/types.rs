use std::ops::{Add, AddAssign, Sub};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length_sq(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Velocity {
    dx: i32,
    dy: i32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { dx: 0, dy: 0 };

    // Screen y grows downward, so dy is negated relative to the math angle.
    pub fn from_angle(degrees: f32, speed: f32) -> Velocity {
        let theta = degrees.to_radians();
        Velocity {
            dx: (speed * theta.cos()).round() as i32,
            dy: (-speed * theta.sin()).round() as i32,
        }
    }

    pub fn dx(self) -> i32 {
        self.dx
    }

    pub fn dy(self) -> i32 {
        self.dy
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wall {
    Right,
    Left,
    Top,
    Bottom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    East,
    NorthEast,
    North,
    NorthWest,
    West,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    pub fn angle(self) -> f32 {
        match self {
            Direction::East => 0.0,
            Direction::NorthEast => 45.0,
            Direction::North => 90.0,
            Direction::NorthWest => 135.0,
            Direction::West => 180.0,
            Direction::SouthWest => 225.0,
            Direction::South => 270.0,
            Direction::SouthEast => 315.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Restart,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorId {
    Red,
    Green,
    Black,
    White,
    Sky,
}

#[derive(Clone, Copy, Debug)]
pub struct BallSnapshot {
    pub pos: Vec2,
    pub radius: f32,
    pub color: ColorId,
}
