//! A* search over grid walkability.
//!
//! Moves are 8-directional with a uniform step cost of 1, so diagonals cost
//! the same as straight steps. The heuristic is the Euclidean distance to
//! the target. The open set is a binary heap ordered by ascending `f` that
//! tolerates duplicate entries: a tile is expanded at most once, and stale
//! heap entries are skipped when popped.
//!
//! The search stops as soon as the target shows up as a neighbor of the tile
//! being expanded. Working arrays are allocated per call; the caller's output
//! buffer is cleared and refilled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pasture_types::TileCoord;

use crate::grid::Grid;
use crate::layout::WorldLayout;

/// Best known route to a tile.
#[derive(Debug, Clone, Copy)]
struct NodeRecord {
    g: f32,
    f: f32,
    parent: TileCoord,
}

/// Heap entry; ordered so that the smallest `f` pops first.
#[derive(Debug, Clone, Copy)]
struct Frontier {
    f: f32,
    coord: TileCoord,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.coord.cmp(&self.coord))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

/// Find a path from `start` to `target`.
///
/// On success `path` holds the route in travel order, excluding `start` and
/// ending at `target`, and the function returns `true`. `start == target`
/// succeeds with an empty path. A non-walkable or off-grid endpoint, or an
/// unreachable target, returns `false` with an empty path.
pub fn find_path(grid: &Grid, start: TileCoord, target: TileCoord, path: &mut Vec<TileCoord>) -> bool {
    path.clear();
    if !grid.is_walkable(start) || !grid.is_walkable(target) {
        return false;
    }
    if start == target {
        return true;
    }

    let layout = grid.layout();
    let count = layout.tile_count();
    let mut closed = vec![false; count];
    let mut records: Vec<Option<NodeRecord>> = vec![None; count];
    let mut open = BinaryHeap::new();

    let h = start.distance(target);
    if let Some(slot) = layout.index(start).and_then(|i| records.get_mut(i)) {
        *slot = Some(NodeRecord {
            g: 0.0,
            f: h,
            parent: start,
        });
    }
    open.push(Frontier { f: h, coord: start });

    while let Some(Frontier { coord: current, .. }) = open.pop() {
        let Some(current_index) = layout.index(current) else {
            continue;
        };
        match closed.get_mut(current_index) {
            Some(done) if !*done => *done = true,
            _ => continue,
        }
        let current_g = records
            .get(current_index)
            .copied()
            .flatten()
            .map_or(0.0, |r| r.g);

        for neighbor in current.neighbors8() {
            if !grid.is_walkable(neighbor) {
                continue;
            }
            let Some(neighbor_index) = layout.index(neighbor) else {
                continue;
            };
            let g = current_g + 1.0;

            if neighbor == target {
                if let Some(slot) = records.get_mut(neighbor_index) {
                    *slot = Some(NodeRecord {
                        g,
                        f: g,
                        parent: current,
                    });
                }
                reconstruct(layout, &records, start, target, path);
                return true;
            }

            if closed.get(neighbor_index).copied().unwrap_or(true) {
                continue;
            }

            let f = g + neighbor.distance(target);
            let Some(slot) = records.get_mut(neighbor_index) else {
                continue;
            };
            if slot.is_none_or(|existing| f < existing.f) {
                *slot = Some(NodeRecord {
                    g,
                    f,
                    parent: current,
                });
                open.push(Frontier { f, coord: neighbor });
            }
        }
    }

    false
}

/// Walk parent links back from `target` and emit the route start-first.
fn reconstruct(
    layout: &WorldLayout,
    records: &[Option<NodeRecord>],
    start: TileCoord,
    target: TileCoord,
    path: &mut Vec<TileCoord>,
) {
    let mut stack = Vec::new();
    let mut cursor = target;
    // Each tile appears at most once on a parent chain.
    for _ in 0..layout.tile_count() {
        if cursor == start {
            break;
        }
        stack.push(cursor);
        let Some(record) = layout.index(cursor).and_then(|i| records.get(i).copied().flatten())
        else {
            break;
        };
        if record.parent == cursor {
            break;
        }
        cursor = record.parent;
    }
    path.extend(stack.into_iter().rev());
}
