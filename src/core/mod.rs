use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::{Bounds, GameConfig, Spawn},
    types::{BallSnapshot, ColorId, Command, Vec2, Velocity, Wall},
};

const GOOD_REWARD: i32 = 20;
const REDUCER_PENALTY: i32 = 10;
const SCORE_FLOOR: i32 = -100;
const LEVEL_STRIDE: i32 = 100;

// Reflection arcs per touched wall, degrees in steps of ten. Each arc is the
// half-turn facing away from its wall, trimmed ten degrees at each end.
const START_ANGLES: [i32; 36] = spread_angles(0);
const RIGHT_WALL_ARC: [i32; 17] = spread_angles(100);
const LEFT_WALL_ARC: [i32; 17] = spread_angles(280);
const TOP_WALL_ARC: [i32; 17] = spread_angles(190);
const BOTTOM_WALL_ARC: [i32; 17] = spread_angles(10);

const fn spread_angles<const N: usize>(start: i32) -> [i32; N] {
    let mut angles = [0; N];
    let mut i = 0;
    while i < N {
        angles[i] = (start + (i as i32) * 10) % 360;
        i += 1;
    }
    angles
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ContactWindow {
    previous: bool,
    current: bool,
}

impl ContactWindow {
    fn push(&mut self, reading: bool) {
        self.previous = self.current;
        self.current = reading;
    }

    pub fn just_separated(self) -> bool {
        self.previous && !self.current
    }

    pub fn touching_now(self) -> bool {
        self.current
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    pub color: ColorId,
    pub vel: Velocity,
}

impl Ball {
    fn from_spawn(spawn: Spawn) -> Self {
        Ball {
            pos: spawn.pos,
            radius: spawn.radius,
            color: spawn.color,
            vel: Velocity::ZERO,
        }
    }

    pub fn set_direction(&mut self, degrees: f32, speed: f32) {
        self.vel = Velocity::from_angle(degrees, speed);
    }

    pub fn pause(&mut self) {
        self.vel = Velocity::ZERO;
    }

    // Precedence is fixed: right, left, top, bottom. A corner reports only
    // the first wall that matches.
    pub fn wall_contact(&self, bounds: Bounds) -> Option<Wall> {
        if self.pos.x + self.radius > bounds.hi {
            Some(Wall::Right)
        } else if self.pos.x - self.radius < bounds.lo {
            Some(Wall::Left)
        } else if self.pos.y - self.radius < bounds.lo {
            Some(Wall::Top)
        } else if self.pos.y + self.radius > bounds.hi {
            Some(Wall::Bottom)
        } else {
            None
        }
    }

    pub fn advance(&mut self, bounds: Bounds, speed: f32) {
        self.reverse_bounce(bounds, speed);
        self.integrate();
    }

    fn reverse_bounce(&mut self, bounds: Bounds, speed: f32) {
        if let Some(wall) = self.wall_contact(bounds) {
            let degrees = match wall {
                Wall::Right => 180.0,
                Wall::Left => 0.0,
                Wall::Top => 270.0,
                Wall::Bottom => 90.0,
            };
            self.set_direction(degrees, speed);
        }
    }

    fn integrate(&mut self) {
        self.pos += Vec2::new(self.vel.dx() as f32, self.vel.dy() as f32);
    }

    pub fn overlaps(&self, other: &Ball) -> bool {
        (self.pos - other.pos).length() < self.radius + other.radius
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Drifter {
    pub ball: Ball,
    contact: ContactWindow,
}

impl Drifter {
    fn from_spawn(spawn: Spawn, speed: f32, rng: &mut StdRng) -> Self {
        let mut drifter = Drifter {
            ball: Ball::from_spawn(spawn),
            contact: ContactWindow::default(),
        };
        drifter.randomize_direction(speed, rng);
        drifter
    }

    pub fn randomize_direction(&mut self, speed: f32, rng: &mut StdRng) {
        let degrees = START_ANGLES[rng.gen_range(0..START_ANGLES.len())];
        self.ball.set_direction(degrees as f32, speed);
    }

    pub fn advance(&mut self, bounds: Bounds, speed: f32, rng: &mut StdRng) {
        self.scatter_bounce(bounds, speed, rng);
        self.ball.integrate();
    }

    fn scatter_bounce(&mut self, bounds: Bounds, speed: f32, rng: &mut StdRng) {
        if let Some(wall) = self.ball.wall_contact(bounds) {
            let arc = match wall {
                Wall::Right => &RIGHT_WALL_ARC,
                Wall::Left => &LEFT_WALL_ARC,
                Wall::Top => &TOP_WALL_ARC,
                Wall::Bottom => &BOTTOM_WALL_ARC,
            };
            let degrees = arc[rng.gen_range(0..arc.len())];
            self.ball.set_direction(degrees as f32, speed);
        }
    }

    pub fn observe_contact(&mut self, player: &Ball) -> ContactWindow {
        self.contact.push(self.ball.overlaps(player));
        self.contact
    }
}

pub struct World {
    pub player: Ball,
    pub good: Drifter,
    pub bad: Drifter,
    pub reducer: Drifter,
    pub score: i32,
    pub level: i32,
    pub over: bool,
    pub config: GameConfig,
    rng: StdRng,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = StdRng::from_entropy();
        let speed = config.speed;
        let player = Ball::from_spawn(config.player);
        let good = Drifter::from_spawn(config.good, speed, &mut rng);
        let bad = Drifter::from_spawn(config.bad, speed, &mut rng);
        let reducer = Drifter::from_spawn(config.reducer, speed, &mut rng);
        World {
            player,
            good,
            bad,
            reducer,
            score: 0,
            level: 1,
            over: false,
            config,
            rng,
        }
    }

    pub fn step(&mut self) {
        self.advance_entities();
        self.resolve_collisions();
        if self.score == SCORE_FLOOR {
            self.over = true;
        }
        self.update_level();
        if self.over {
            self.pause_all();
        }
    }

    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::Steer(direction) => {
                if self.over {
                    self.restart();
                }
                let speed = self.config.speed;
                self.player.set_direction(direction.angle(), speed);
            }
            Command::Restart => {
                if self.over {
                    self.restart();
                }
            }
            // The shell consumes quit before the world sees it.
            Command::Quit => {}
        }
    }

    pub fn snapshot(&self, out: &mut Vec<BallSnapshot>) {
        out.clear();
        for ball in [&self.good.ball, &self.player, &self.bad.ball, &self.reducer.ball] {
            out.push(BallSnapshot {
                pos: ball.pos,
                radius: ball.radius,
                color: ball.color,
            });
        }
    }

    fn advance_entities(&mut self) {
        let bounds = self.config.bounds();
        let speed = self.config.speed;
        self.player.advance(bounds, speed);
        self.good.advance(bounds, speed, &mut self.rng);
        self.bad.advance(bounds, speed, &mut self.rng);
        self.reducer.advance(bounds, speed, &mut self.rng);
    }

    fn resolve_collisions(&mut self) {
        if self.good.observe_contact(&self.player).just_separated() {
            self.score += GOOD_REWARD;
            if self.score > 0 && self.score % LEVEL_STRIDE == 0 && self.player.radius > 1.0 {
                self.player.radius -= 1.0;
            }
        }
        if self.reducer.observe_contact(&self.player).just_separated() {
            self.score -= REDUCER_PENALTY;
            if self.score < 0 {
                self.player.radius += 2.0;
            } else {
                self.player.radius += 0.5;
            }
        }
        if self.bad.observe_contact(&self.player).touching_now() {
            self.over = true;
        }
    }

    fn update_level(&mut self) {
        self.level = if self.score < 0 {
            0
        } else {
            self.score / LEVEL_STRIDE + 1
        };
    }

    fn pause_all(&mut self) {
        self.player.pause();
        self.good.ball.pause();
        self.bad.ball.pause();
        self.reducer.ball.pause();
    }

    fn restart(&mut self) {
        self.score = 0;
        self.over = false;
        self.player.radius = self.config.player.radius;
        let speed = self.config.speed;
        self.good.randomize_direction(speed, &mut self.rng);
        self.bad.randomize_direction(speed, &mut self.rng);
        self.reducer.randomize_direction(speed, &mut self.rng);
    }
}
