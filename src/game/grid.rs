use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::ops::{Index, IndexMut};

use owo_colors::OwoColorize;

use crate::env::{Direction, Vec2D};
use crate::util::OrdPair;

/// Returns if `p` coincides with any of the `cells`.
///
/// Multiple occupant sets (snake bodies, item pools) are passed by chaining
/// their iterators.
pub fn occupied<'a>(p: Vec2D, cells: impl IntoIterator<Item = &'a Vec2D>) -> bool {
    cells.into_iter().any(|&c| c == p)
}

/// Represents a single tile of the board
#[derive(Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Cell {
    #[default]
    Free,
    Occupied,
}

impl std::fmt::Debug for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Cell::Free => write!(f, "."),
            Cell::Occupied => write!(f, "{}", "X".blue()),
        }
    }
}

/// Search bookkeeping of a single grid cell.
#[derive(Clone, Copy)]
struct Node {
    cost: u32,
    parent: Option<Vec2D>,
    closed: bool,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            cost: u32::MAX,
            parent: None,
            closed: false,
        }
    }
}

/// Obstacle field as a dense grid of free and occupied cells.
#[derive(Clone, Default)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
}

impl Grid {
    /// Creates a new grid with the provided dimensions.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Clears the grid.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::Free);
    }

    /// Marks the provided cells as obstacles. Cells outside the grid are ignored.
    pub fn add_obstacles(&mut self, cells: impl IntoIterator<Item = Vec2D>) {
        for p in cells {
            if self.has(p) {
                self[p] = Cell::Occupied;
            }
        }
    }

    /// Returns if `p` is within the boundaries of this grid.
    #[inline]
    pub fn has(&self, p: Vec2D) -> bool {
        p.within(self.width, self.height)
    }

    /// Returns if `p` is inside the grid and not an obstacle.
    #[inline]
    pub fn available(&self, p: Vec2D) -> bool {
        self.has(p) && self[p] == Cell::Free
    }

    /// Shortest 4-connected path from `start` to `target`.
    ///
    /// The path excludes `start` and ends at `target`.
    /// It is empty if `target` is unreachable or equal to `start`.
    pub fn a_star(&self, start: Vec2D, target: Vec2D) -> Vec<Vec2D> {
        self.a_star_traced(start, target, |_, _| {})
    }

    /// A* search that reports every expanded cell together with its f-cost.
    ///
    /// The frontier is ordered by `f = g + h` with the manhattan distance to
    /// `target` as `h`. Equal f-costs are expanded in insertion order.
    /// Closed cells are never reopened.
    pub fn a_star_traced(
        &self,
        start: Vec2D,
        target: Vec2D,
        mut expanded: impl FnMut(Vec2D, u32),
    ) -> Vec<Vec2D> {
        if !self.has(start) || !self.has(target) {
            return Vec::new();
        }

        let mut data = vec![Node::default(); self.cells.len()];
        let mut queue = BinaryHeap::new();
        let mut inserted = 0usize;

        data[self.offset(start)].cost = 0;
        queue.push(OrdPair(Reverse((start.distance(target), inserted)), start));

        while let Some(OrdPair(Reverse((f, _)), front)) = queue.pop() {
            let node = &mut data[self.offset(front)];
            // outdated duplicate of an already expanded cell
            if node.closed {
                continue;
            }
            node.closed = true;
            let cost = node.cost;
            expanded(front, f);

            if front == target {
                return self.make_path(&data, target);
            }

            for d in Direction::iter() {
                let neighbor = front.apply(d);
                if !self.available(neighbor) {
                    continue;
                }
                let next = &mut data[self.offset(neighbor)];
                if next.closed || cost + 1 >= next.cost {
                    continue;
                }
                next.cost = cost + 1;
                next.parent = Some(front);

                inserted += 1;
                let estimated = cost + 1 + neighbor.distance(target);
                queue.push(OrdPair(Reverse((estimated, inserted)), neighbor));
            }
        }

        Vec::new()
    }

    fn make_path(&self, data: &[Node], target: Vec2D) -> Vec<Vec2D> {
        let mut path = Vec::new();
        let mut p = target;
        while let Some(parent) = data[self.offset(p)].parent {
            path.push(p);
            p = parent;
        }
        path.reverse();
        path
    }

    #[inline]
    fn offset(&self, p: Vec2D) -> usize {
        p.x as usize + p.y as usize * self.width
    }
}

impl Index<Vec2D> for Grid {
    type Output = Cell;

    fn index(&self, p: Vec2D) -> &Self::Output {
        assert!(self.has(p));
        &self.cells[self.offset(p)]
    }
}

impl IndexMut<Vec2D> for Grid {
    fn index_mut(&mut self, p: Vec2D) -> &mut Self::Output {
        assert!(self.has(p));
        let offset = self.offset(p);
        &mut self.cells[offset]
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Grid {{")?;
        for y in 0..self.height as i16 {
            write!(f, "  ")?;
            for x in 0..self.width as i16 {
                write!(f, "{:?} ", self[Vec2D::new(x, y)])?;
            }
            writeln!(f)?;
        }
        write!(f, "}}")?;
        Ok(())
    }
}
