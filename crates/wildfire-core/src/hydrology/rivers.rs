//! River tracing by diagonal-biased random walks.
//!
//! Each walk fixes one of four headings for its whole length and, at every
//! step, picks one of the two axis moves belonging to that heading. Walks end
//! on leaving the grid or on reaching a lake. Every step advances along one
//! axis and never reverses, so a walk is at most `width + depth` steps long.

use tracing::trace;

use crate::map::Map;
use crate::rng::RandomSource;

/// The two candidate moves for each heading.
const HEADINGS: [[(i32, i32); 2]; 4] = [
    [(1, 0), (0, 1)],
    [(1, 0), (0, -1)],
    [(-1, 0), (0, 1)],
    [(-1, 0), (0, -1)],
];

/// Trace `count` rivers over `lakes`. Rivers may cross or overlap.
pub fn river_map(lakes: &Map<bool>, count: u32, rng: &mut dyn RandomSource) -> Map<bool> {
    let mut rivers = Map::new(lakes.width, lakes.depth);
    if lakes.width == 0 || lakes.depth == 0 {
        return rivers;
    }
    for _ in 0..count {
        let x = rng.index(lakes.width) as i32;
        let y = rng.index(lakes.depth) as i32;
        let heading = rng.index(HEADINGS.len());
        let length = trace_river(&mut rivers, lakes, (x, y), HEADINGS[heading], rng);
        trace!(x, y, heading, length, "river traced");
    }
    rivers
}

fn trace_river(
    rivers: &mut Map<bool>,
    lakes: &Map<bool>,
    start: (i32, i32),
    moves: [(i32, i32); 2],
    rng: &mut dyn RandomSource,
) -> usize {
    let (mut x, mut y) = start;
    let mut length = 0;
    while lakes.contains(x, y) && !lakes.get(x, y) {
        rivers.set(x, y, true);
        length += 1;
        let (dx, dy) = moves[rng.index(2)];
        x += dx;
        y += dy;
    }
    length
}
