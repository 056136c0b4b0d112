//! Maze - steer a token through a carved grid to an exit
//!
//! The fingertip picks a target cell; the player steps one cell at a time
//! toward it and only through openings, so walls can never be clipped no
//! matter how far the hand jumps. Between steps the on-screen token glides
//! toward the current cell center.

use crate::engine::{colors, with_alpha, DrawList, ModeContext};
use crate::physics::{distance, step_toward, MappedHand};
use super::maze_grid::{Dir, Maze};
use super::ModeLogic;

pub const EXIT_POINTS: i64 = 50;
/// Pause on the solved maze before the next one appears
const REGENERATE_PAUSE_S: f32 = 0.8;
const PLAYER_SPEED: f32 = 420.0;
/// The next step is taken once the token is this close (fraction of a cell)
const STEP_READY: f32 = 0.25;

const CLASSIC_CELL_SIZE: f32 = 48.0;
const MINI_CELL_SIZE: f32 = 90.0;
const MINI_EXITS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MazeVariant {
    /// Small cells, one exit far from the start
    Classic,
    /// Big cells, several exits
    Mini,
}

impl MazeVariant {
    fn cell_size(self) -> f32 {
        match self {
            MazeVariant::Classic => CLASSIC_CELL_SIZE,
            MazeVariant::Mini => MINI_CELL_SIZE,
        }
    }

    fn exit_count(self) -> usize {
        match self {
            MazeVariant::Classic => 1,
            MazeVariant::Mini => MINI_EXITS,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MazePlayer {
    pub cx: usize,
    pub cy: usize,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub speed: f32,
}

pub struct MazeMode {
    variant: MazeVariant,
    maze: Option<Maze>,
    player: MazePlayer,
    regenerate_in: Option<f32>,
    solved: u32,
}

impl MazeMode {
    pub fn new(variant: MazeVariant) -> Self {
        Self {
            variant,
            maze: None,
            player: MazePlayer::default(),
            regenerate_in: None,
            solved: 0,
        }
    }

    pub fn variant(&self) -> MazeVariant {
        self.variant
    }

    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn player(&self) -> &MazePlayer {
        &self.player
    }

    pub fn solved(&self) -> u32 {
        self.solved
    }

    pub fn is_paused(&self) -> bool {
        self.regenerate_in.is_some()
    }

    /// Fresh maze sized to the canvas, player on the start cell
    pub fn regenerate(&mut self, ctx: &mut ModeContext) {
        let canvas = ctx.canvas();
        let maze = Maze::fit(
            canvas.width,
            canvas.height,
            self.variant.cell_size(),
            self.variant.exit_count(),
            ctx.rng(),
        );
        let (cx, cy) = maze.start();
        let (x, y) = maze.cell_center(cx, cy);
        self.player = MazePlayer {
            cx,
            cy,
            x,
            y,
            target_x: x,
            target_y: y,
            speed: PLAYER_SPEED,
        };
        log::debug!("maze {}x{} exits {:?}", maze.cols, maze.rows, maze.exits);
        self.maze = Some(maze);
        self.regenerate_in = None;
    }

    /// One cell toward `toward`, dominant axis first, the other axis if
    /// that way is walled. Returns true if the player moved.
    pub fn try_step(&mut self, toward: (usize, usize)) -> bool {
        let Some(maze) = &self.maze else {
            return false;
        };
        let (cx, cy) = (self.player.cx, self.player.cy);
        let dx = toward.0 as i32 - cx as i32;
        let dy = toward.1 as i32 - cy as i32;
        if dx == 0 && dy == 0 {
            return false;
        }

        let horizontal = (dx != 0).then(|| if dx > 0 { Dir::East } else { Dir::West });
        let vertical = (dy != 0).then(|| if dy > 0 { Dir::South } else { Dir::North });
        let order = if dx.abs() >= dy.abs() {
            [horizontal, vertical]
        } else {
            [vertical, horizontal]
        };

        for dir in order.into_iter().flatten() {
            if !maze.can_move(cx, cy, dir) {
                continue;
            }
            if let Some((nx, ny)) = maze.neighbor(cx, cy, dir) {
                let (tx, ty) = maze.cell_center(nx, ny);
                self.player.cx = nx;
                self.player.cy = ny;
                self.player.target_x = tx;
                self.player.target_y = ty;
                return true;
            }
        }
        false
    }

    fn on_exit(&self) -> bool {
        let Some(maze) = &self.maze else {
            return false;
        };
        (self.player.cx, self.player.cy) != maze.start() && maze.is_exit(self.player.cx, self.player.cy)
    }
}

impl ModeLogic for MazeMode {
    fn on_start(&mut self, ctx: &mut ModeContext) {
        self.solved = 0;
        self.regenerate(ctx);
    }

    fn update(&mut self, dt: f32, hands: &[MappedHand], ctx: &mut ModeContext) {
        if let Some(left) = self.regenerate_in {
            let left = left - dt;
            if left <= 0.0 {
                self.regenerate(ctx);
            } else {
                self.regenerate_in = Some(left);
            }
            return;
        }

        let cell_size = match &self.maze {
            Some(maze) => maze.cell_size,
            None => return,
        };

        let p = &self.player;
        let settled = distance((p.x, p.y), (p.target_x, p.target_y)) <= cell_size * STEP_READY;
        if settled {
            if let Some(hand) = hands.first() {
                let (tx, ty) = hand.tip();
                let target = self.maze.as_ref().map(|m| m.cell_at(tx, ty));
                if let Some(target) = target {
                    if self.try_step(target) && self.on_exit() {
                        let (x, y) = (self.player.target_x, self.player.target_y);
                        ctx.award(EXIT_POINTS, x, y, colors::GREEN);
                        ctx.play("exit");
                        self.solved += 1;
                        self.regenerate_in = Some(REGENERATE_PAUSE_S);
                    }
                }
            }
        }

        let p = &mut self.player;
        let (x, y) = step_toward((p.x, p.y), (p.target_x, p.target_y), p.speed * dt);
        p.x = x;
        p.y = y;
    }

    fn on_end(&mut self, ctx: &mut ModeContext) {
        self.maze = None;
        self.regenerate_in = None;
        ctx.effects.clear();
    }

    fn draw(&self, list: &mut DrawList) {
        let Some(maze) = &self.maze else {
            return;
        };
        let s = maze.cell_size;
        let wall = with_alpha(colors::CYAN, 0.9);

        for &(ex, ey) in &maze.exits {
            let (x, y) = (maze.origin.0 + ex as f32 * s, maze.origin.1 + ey as f32 * s);
            list.rect(x + 4.0, y + 4.0, s - 8.0, s - 8.0, with_alpha(colors::GREEN, 0.5));
        }

        for cy in 0..maze.rows {
            for cx in 0..maze.cols {
                let walls = &maze.cell(cx, cy).walls;
                let x0 = maze.origin.0 + cx as f32 * s;
                let y0 = maze.origin.1 + cy as f32 * s;
                let (x1, y1) = (x0 + s, y0 + s);
                if walls[Dir::North as usize] {
                    list.line((x0, y0), (x1, y0), 3.0, wall);
                }
                if walls[Dir::West as usize] {
                    list.line((x0, y0), (x0, y1), 3.0, wall);
                }
                if cx == maze.cols - 1 && walls[Dir::East as usize] {
                    list.line((x1, y0), (x1, y1), 3.0, wall);
                }
                if cy == maze.rows - 1 && walls[Dir::South as usize] {
                    list.line((x0, y1), (x1, y1), 3.0, wall);
                }
            }
        }

        let color = if self.is_paused() { colors::GREEN } else { colors::YELLOW };
        list.circle(self.player.x, self.player.y, s * 0.3, color);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::Rng;

    use super::*;
    use crate::modes::testing::{synthetic_hand, Harness};
    use crate::modes::Gesture;

    /// Shortest cell path from `from` to `to` through openings
    fn path(maze: &Maze, from: (usize, usize), to: (usize, usize)) -> Vec<(usize, usize)> {
        let mut prev = vec![None; maze.cols * maze.rows];
        let mut queue = VecDeque::from([from]);
        while let Some((cx, cy)) = queue.pop_front() {
            if (cx, cy) == to {
                break;
            }
            for dir in Dir::ALL {
                if let Some(n) = maze.neighbor(cx, cy, dir) {
                    let i = n.1 * maze.cols + n.0;
                    if maze.can_move(cx, cy, dir) && prev[i].is_none() && n != from {
                        prev[i] = Some((cx, cy));
                        queue.push_back(n);
                    }
                }
            }
        }
        let mut out = vec![to];
        let mut cur = to;
        while let Some(p) = prev[cur.1 * maze.cols + cur.0] {
            out.push(p);
            cur = p;
        }
        out.reverse();
        out
    }

    #[test]
    fn test_random_targets_never_cross_walls() {
        let mut h = Harness::new();
        let mut mode = MazeMode::new(MazeVariant::Classic);
        mode.on_start(&mut h.ctx());

        for _ in 0..2000 {
            let maze = mode.maze().unwrap().clone();
            let before = (mode.player.cx, mode.player.cy);
            let target = (
                h.session.rng.random_range(0..maze.cols),
                h.session.rng.random_range(0..maze.rows),
            );
            if mode.try_step(target) {
                let after = (mode.player.cx, mode.player.cy);
                let dir = Dir::ALL
                    .into_iter()
                    .find(|&d| maze.neighbor(before.0, before.1, d) == Some(after))
                    .expect("steps are to an adjacent cell");
                assert!(!maze.cell(before.0, before.1).walls[dir as usize]);
                assert!(!maze.cell(after.0, after.1).walls[dir.opposite() as usize]);
            }
        }
    }

    #[test]
    fn test_walking_to_exit_scores_and_regenerates() {
        let mut h = Harness::new();
        let mut mode = MazeMode::new(MazeVariant::Classic);
        mode.on_start(&mut h.ctx());

        let maze = mode.maze().unwrap().clone();
        let route = path(&maze, maze.start(), maze.exits[0]);
        assert!(route.len() > 1);

        let dt = 1.0 / 30.0;
        for &(cx, cy) in route.iter().skip(1) {
            let tip = maze.cell_center(cx, cy);
            let hand = synthetic_hand(Gesture::Open, tip);
            for _ in 0..20 {
                if mode.is_paused() || (mode.player.cx, mode.player.cy) == (cx, cy) {
                    break;
                }
                h.advance(dt);
                mode.update(dt, std::slice::from_ref(&hand), &mut h.ctx());
            }
        }

        assert!(mode.is_paused());
        assert_eq!(h.session.score(), EXIT_POINTS);
        assert_eq!(mode.solved(), 1);
        assert_eq!(h.played("exit"), 1);

        for _ in 0..30 {
            h.advance(dt);
            mode.update(dt, &[], &mut h.ctx());
        }
        assert!(!mode.is_paused());
        let fresh = mode.maze().unwrap();
        assert_eq!((mode.player.cx, mode.player.cy), fresh.start());
        assert_eq!(h.session.score(), EXIT_POINTS);
    }

    #[test]
    fn test_mini_variant_has_three_exits() {
        let mut h = Harness::new();
        let mut mode = MazeMode::new(MazeVariant::Mini);
        mode.on_start(&mut h.ctx());
        let maze = mode.maze().unwrap();
        assert_eq!(maze.exits.len(), 3);
        assert_eq!(maze.cell_size, MINI_CELL_SIZE);
    }
}
