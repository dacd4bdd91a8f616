use tracing::debug;

use crate::config::generation::DungeonParams;
use crate::dungeon::{Dungeon, Region, RegionKind};
use crate::util::geometry::{Coord, Direction, Rect};
use crate::util::random::Random;

/// Smallest room side.
const MIN_ROOM_SIDE: i32 = 2;
/// Longest-to-shortest side ratio at `room_irregularity = 1.0`.
const MAX_ASPECT: f64 = 3.0;

/// Generate a room-and-tunnel layout.
///
/// Starts from one room at the origin, then repeatedly picks an existing
/// room and a side, digs a tunnel out of that side and opens a new room at
/// its far end. A placement whose room or tunnel comes within
/// `minimum_clearance` cells of anything already placed is rejected; after
/// `maximum_failures` rejections generation stops with what it has.
///
/// If `params.seed` is 0 a random seed is chosen and stored on the result.
pub fn generate_dungeon(params: &DungeonParams) -> Dungeon {
    let seed = Random::resolve_seed(params.seed);
    let random = Random::new(seed);

    let (width, height) = room_size(params, &random);
    let first = Rect::new(0, 0, width, height);
    let mut rooms = vec![first];
    let mut tunnels: Vec<Rect> = Vec::new();
    let mut failures = 0;

    while (rooms.len() as u32) < params.maximum_room_count {
        if failures >= params.maximum_failures {
            debug!(
                seed,
                rooms = rooms.len(),
                failures,
                "Room placement failure budget exhausted"
            );
            break;
        }
        let parent = random.index(rooms.len());
        let direction = Direction::all()[random.index(4)];
        match place(params, &random, rooms[parent], direction) {
            Some((tunnel, room)) if fits(params, &rooms, &tunnels, parent, tunnel, room) => {
                tunnels.push(tunnel);
                rooms.push(room);
            }
            _ => failures += 1,
        }
    }

    let start = first.center();
    let stairs = if params.place_stairs {
        rooms.last().and_then(|last| {
            [last.center(), Coord::new(last.right() - 1, last.bottom() - 1)]
                .into_iter()
                .find(|c| *c != start)
        })
    } else {
        None
    };

    // Rooms first so region order matches placement order for rooms.
    let mut regions: Vec<Region> = rooms
        .iter()
        .map(|r| Region::rectangle(RegionKind::Room, *r))
        .collect();
    regions.extend(tunnels.iter().map(|t| Region::rectangle(RegionKind::Tunnel, *t)));

    debug!(seed, rooms = rooms.len(), failures, "Generated dungeon");
    Dungeon {
        seed,
        regions,
        start,
        stairs,
        failures,
        door_chance: params.door_chance,
        ..Default::default()
    }
}

/// Room dimensions for a target area drawn from a bell curve over
/// `[room_area_min, room_area_max]`, stretched by a random aspect ratio.
fn room_size(params: &DungeonParams, random: &Random) -> (i32, i32) {
    let area = random.normal(params.room_area_min as f64, params.room_area_max as f64);
    let aspect = 1.0 + params.room_irregularity * (MAX_ASPECT - 1.0) * random.float();
    let long = (area * aspect).sqrt().round() as i32;
    let long = long.max(MIN_ROOM_SIDE);
    let short = ((area / long as f64).round() as i32).max(MIN_ROOM_SIDE);
    if random.chance(50) {
        (long, short)
    } else {
        (short, long)
    }
}

/// Tunnel leaving `parent` through its `direction` side, and the room at its
/// far end. The tunnel's first cell is in the parent's wall ring and its last
/// cell in the new room's wall ring.
fn place(params: &DungeonParams, random: &Random, parent: Rect, direction: Direction) -> Option<(Rect, Rect)> {
    let length = random.range(params.hallway_length_min, params.hallway_length_max);
    let (width, height) = room_size(params, random);
    let step = direction.delta();

    let start = match direction {
        Direction::North => Coord::new(parent.x + random.below(parent.width), parent.y - 1),
        Direction::South => Coord::new(parent.x + random.below(parent.width), parent.bottom()),
        Direction::West => Coord::new(parent.x - 1, parent.y + random.below(parent.height)),
        Direction::East => Coord::new(parent.right(), parent.y + random.below(parent.height)),
    };
    let end = start + step * (length - 1);
    let tunnel = Rect::spanning(start, end);

    let entry = end + step;
    let room = match direction {
        Direction::North => Rect::new(entry.x - random.below(width), entry.y - height + 1, width, height),
        Direction::South => Rect::new(entry.x - random.below(width), entry.y, width, height),
        Direction::West => Rect::new(entry.x - width + 1, entry.y - random.below(height), width, height),
        Direction::East => Rect::new(entry.x, entry.y - random.below(height), width, height),
    };
    (length >= 2).then_some((tunnel, room))
}

/// Clearance check for a candidate. The parent room is exempt: the tunnel
/// starts in its wall and the new room lies beyond the tunnel.
fn fits(
    params: &DungeonParams,
    rooms: &[Rect],
    tunnels: &[Rect],
    parent: usize,
    tunnel: Rect,
    room: Rect,
) -> bool {
    let clearance = params.minimum_clearance;
    let room_zone = room.expand(clearance + 1);
    let room_clear = rooms
        .iter()
        .enumerate()
        .all(|(i, r)| i == parent || !room_zone.intersects(r))
        && tunnels.iter().all(|t| !room_zone.intersects(t));

    let tail = tunnel_tail(tunnel, rooms[parent]);
    let tail_zone = tail.expand(clearance);
    let tunnel_clear = rooms
        .iter()
        .enumerate()
        .all(|(i, r)| i == parent || !tail_zone.intersects(r))
        && tunnels.iter().all(|t| !tail_zone.intersects(t));

    room_clear && tunnel_clear
}

/// The tunnel without the cell that sits in the parent's wall ring.
fn tunnel_tail(tunnel: Rect, parent: Rect) -> Rect {
    let ring = parent.expand(1);
    if tunnel.width == 1 {
        if ring.contains(Coord::new(tunnel.x, tunnel.y)) {
            Rect::new(tunnel.x, tunnel.y + 1, 1, tunnel.height - 1)
        } else {
            Rect::new(tunnel.x, tunnel.y, 1, tunnel.height - 1)
        }
    } else if ring.contains(Coord::new(tunnel.x, tunnel.y)) {
        Rect::new(tunnel.x + 1, tunnel.y, tunnel.width - 1, 1)
    } else {
        Rect::new(tunnel.x, tunnel.y, tunnel.width - 1, 1)
    }
}
