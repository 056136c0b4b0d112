//! Maze grid - randomized depth-first carving from the center cell

use std::collections::VecDeque;

use rand::Rng;

/// Wall / direction order used everywhere: north, east, south, west
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Dir {
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    pub fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
        }
    }

    fn delta(self) -> (i32, i32) {
        match self {
            Dir::North => (0, -1),
            Dir::East => (1, 0),
            Dir::South => (0, 1),
            Dir::West => (-1, 0),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Cell {
    pub walls: [bool; 4],
    pub visited: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self { walls: [true; 4], visited: false }
    }
}

#[derive(Clone, Debug)]
pub struct Maze {
    pub cols: usize,
    pub rows: usize,
    pub cell_size: f32,
    /// Top-left of the grid on the canvas
    pub origin: (f32, f32),
    pub cells: Vec<Cell>,
    pub exits: Vec<(usize, usize)>,
}

impl Maze {
    /// Carve a perfect maze and open `exit_count` border cells.
    ///
    /// With one exit it goes on the border cell farthest (by path length)
    /// from the center; with more they are distinct random border cells.
    pub fn generate<R: Rng>(
        cols: usize,
        rows: usize,
        cell_size: f32,
        origin: (f32, f32),
        exit_count: usize,
        rng: &mut R,
    ) -> Self {
        let cols = cols.max(2);
        let rows = rows.max(2);
        let mut maze = Self {
            cols,
            rows,
            cell_size,
            origin,
            cells: vec![Cell::default(); cols * rows],
            exits: Vec::new(),
        };
        maze.carve(rng);
        maze.place_exits(exit_count.max(1), rng);
        maze
    }

    /// Fit the largest grid of `cell_size` cells into the canvas, centered
    pub fn fit<R: Rng>(width: f32, height: f32, cell_size: f32, exit_count: usize, rng: &mut R) -> Self {
        let cols = ((width / cell_size).floor() as usize).max(2);
        let rows = ((height / cell_size).floor() as usize).max(2);
        let origin = (
            (width - cols as f32 * cell_size) / 2.0,
            (height - rows as f32 * cell_size) / 2.0,
        );
        Self::generate(cols, rows, cell_size, origin, exit_count, rng)
    }

    pub fn start(&self) -> (usize, usize) {
        (self.cols / 2, self.rows / 2)
    }

    fn idx(&self, cx: usize, cy: usize) -> usize {
        cy * self.cols + cx
    }

    pub fn cell(&self, cx: usize, cy: usize) -> &Cell {
        &self.cells[self.idx(cx, cy)]
    }

    pub fn neighbor(&self, cx: usize, cy: usize, dir: Dir) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = cx as i32 + dx;
        let ny = cy as i32 + dy;
        if nx < 0 || ny < 0 || nx >= self.cols as i32 || ny >= self.rows as i32 {
            return None;
        }
        Some((nx as usize, ny as usize))
    }

    /// Is there an opening from (cx, cy) toward `dir` leading to another cell?
    pub fn can_move(&self, cx: usize, cy: usize, dir: Dir) -> bool {
        match self.neighbor(cx, cy, dir) {
            Some((nx, ny)) => {
                !self.cell(cx, cy).walls[dir as usize]
                    && !self.cell(nx, ny).walls[dir.opposite() as usize]
            }
            None => false,
        }
    }

    pub fn is_exit(&self, cx: usize, cy: usize) -> bool {
        self.exits.contains(&(cx, cy))
    }

    pub fn cell_center(&self, cx: usize, cy: usize) -> (f32, f32) {
        (
            self.origin.0 + (cx as f32 + 0.5) * self.cell_size,
            self.origin.1 + (cy as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell under a canvas point, clamped onto the grid
    pub fn cell_at(&self, x: f32, y: f32) -> (usize, usize) {
        let gx = ((x - self.origin.0) / self.cell_size).floor();
        let gy = ((y - self.origin.1) / self.cell_size).floor();
        (
            gx.clamp(0.0, (self.cols - 1) as f32) as usize,
            gy.clamp(0.0, (self.rows - 1) as f32) as usize,
        )
    }

    fn remove_wall(&mut self, cx: usize, cy: usize, dir: Dir) {
        if let Some((nx, ny)) = self.neighbor(cx, cy, dir) {
            let a = self.idx(cx, cy);
            let b = self.idx(nx, ny);
            self.cells[a].walls[dir as usize] = false;
            self.cells[b].walls[dir.opposite() as usize] = false;
        }
    }

    /// Iterative randomized DFS from the start cell
    fn carve<R: Rng>(&mut self, rng: &mut R) {
        let start = self.start();
        let si = self.idx(start.0, start.1);
        self.cells[si].visited = true;
        let mut stack = vec![start];

        while let Some(&(cx, cy)) = stack.last() {
            let mut options = [Dir::North; 4];
            let mut n = 0;
            for dir in Dir::ALL {
                if let Some((nx, ny)) = self.neighbor(cx, cy, dir) {
                    if !self.cell(nx, ny).visited {
                        options[n] = dir;
                        n += 1;
                    }
                }
            }

            if n == 0 {
                stack.pop();
                continue;
            }

            let dir = options[rng.random_range(0..n)];
            self.remove_wall(cx, cy, dir);
            if let Some(next) = self.neighbor(cx, cy, dir) {
                let ni = self.idx(next.0, next.1);
                self.cells[ni].visited = true;
                stack.push(next);
            }
        }
    }

    /// Path length from the start cell to every cell
    fn distances(&self) -> Vec<usize> {
        let mut dist = vec![usize::MAX; self.cells.len()];
        let start = self.start();
        dist[self.idx(start.0, start.1)] = 0;
        let mut queue = VecDeque::from([start]);

        while let Some((cx, cy)) = queue.pop_front() {
            let d = dist[self.idx(cx, cy)];
            for dir in Dir::ALL {
                if !self.can_move(cx, cy, dir) {
                    continue;
                }
                if let Some((nx, ny)) = self.neighbor(cx, cy, dir) {
                    let ni = self.idx(nx, ny);
                    if dist[ni] == usize::MAX {
                        dist[ni] = d + 1;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        dist
    }

    fn border_cells(&self) -> Vec<(usize, usize)> {
        (0..self.rows)
            .flat_map(|cy| (0..self.cols).map(move |cx| (cx, cy)))
            .filter(|&(cx, cy)| cx == 0 || cy == 0 || cx == self.cols - 1 || cy == self.rows - 1)
            .collect()
    }

    fn place_exits<R: Rng>(&mut self, count: usize, rng: &mut R) {
        let mut border = self.border_cells();

        if count == 1 {
            let dist = self.distances();
            if let Some(&far) = border.iter().max_by_key(|&&(cx, cy)| dist[self.idx(cx, cy)]) {
                self.exits.push(far);
            }
        } else {
            while self.exits.len() < count && !border.is_empty() {
                let i = rng.random_range(0..border.len());
                self.exits.push(border.swap_remove(i));
            }
        }

        // Open the outer wall so exits read as gaps in the border
        for &(cx, cy) in &self.exits {
            let i = cy * self.cols + cx;
            let cell = &mut self.cells[i];
            if cy == 0 {
                cell.walls[Dir::North as usize] = false;
            } else if cy == self.rows - 1 {
                cell.walls[Dir::South as usize] = false;
            } else if cx == 0 {
                cell.walls[Dir::West as usize] = false;
            } else {
                cell.walls[Dir::East as usize] = false;
            }
        }
    }
}
