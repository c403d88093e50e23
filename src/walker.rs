use glam::Vec2;

use crate::reset::WalkerCommand;
use crate::types::geometry::{heading, rotate_deg};

/// A stand-in user for playback: walks straight ahead at a fixed speed and
/// obeys the reset strategy's commands while a reset runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatedWalker {
    pos: Vec2,
    dir: Vec2,
    /// Meters per tick.
    speed: f32,
}

impl SimulatedWalker {
    pub fn new(pos: Vec2, dir: Vec2, speed: f32) -> Self {
        Self {
            pos,
            dir: heading(dir),
            speed,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn dir(&self) -> Vec2 {
        self.dir
    }

    /// Advance one tick. `command` is `Some` while a reset is in progress.
    pub fn step(&mut self, command: Option<WalkerCommand>) {
        match command {
            Some(command) => {
                self.dir = heading(rotate_deg(self.dir, command.turn_deg));
                self.pos += self.dir * command.advance;
            }
            None => self.pos += self.dir * self.speed,
        }
    }
}
