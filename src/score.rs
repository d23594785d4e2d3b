use crate::map::{Map, RouteId};
use crate::player::PlayerId;
use crate::state::GameState;
use crate::station::Station;

use array_init::array_init;
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;
use strum::EnumCount;

/// Points granted to every holder of a longest trail.
pub const LONGEST_TRAIL_BONUS: i32 = 10;

/// Which stations one player's claimed routes connect to each other.
///
/// Direction never matters, and other players' routes never help.
pub struct Connectivity {
    parent: [u8; Station::COUNT],
}

impl Connectivity {
    /// Builds the connectivity of the subgraph induced by the given routes.
    pub fn new(routes: &[RouteId]) -> Self {
        let map = Map::swiss();
        let mut connectivity = Self {
            parent: array_init(|station| station as u8),
        };

        for route in routes.iter().filter_map(|&id| map.route(id)) {
            let (start, end) = route.stations();
            connectivity.union(start as u8, end as u8);
        }

        connectivity
    }

    fn root(&self, mut station: u8) -> u8 {
        while self.parent[station as usize] != station {
            station = self.parent[station as usize];
        }
        station
    }

    fn union(&mut self, a: u8, b: u8) {
        let root_a = self.root(a);
        let root_b = self.root(b);
        self.parent[root_a as usize] = root_b;
    }

    /// Whether the owner of these routes has connected the two stations.
    pub fn connected(&self, a: Station, b: Station) -> bool {
        self.root(a as u8) == self.root(b as u8)
    }
}

/// The length of the longest trail through the given claimed routes.
///
/// A trail may revisit stations but never reuses a route. The search is
/// exhaustive — an explicit work stack walking every edge-disjoint path, with
/// visited routes tracked in a bitmask — so the result is exact. A player's
/// subgraph never exceeds 40 edges, which keeps this affordable.
///
/// # Example
/// ```
/// use alpine_rails::map::Map;
/// use alpine_rails::score::longest_trail;
/// use alpine_rails::station::Station;
///
/// let map = Map::swiss();
/// let routes = [
///     map.between(Station::Geneve, Station::Lausanne)[0],
///     map.between(Station::Lausanne, Station::Fribourg)[0],
/// ];
///
/// // Lengths 4 and 3, end to end.
/// assert_eq!(longest_trail(&routes), 7);
/// ```
pub fn longest_trail(routes: &[RouteId]) -> u32 {
    let map = Map::swiss();
    let edges: Vec<(Station, Station, u8)> = routes
        .iter()
        .filter_map(|&id| map.route(id))
        .map(|route| {
            let (start, end) = route.stations();
            (start, end, route.length())
        })
        .collect();
    debug_assert!(edges.len() <= 64, "trail bitmask holds at most 64 routes");

    let mut adjacency: [SmallVec<[(usize, Station); 4]>; Station::COUNT] =
        array_init(|_| SmallVec::new());
    for (index, &(start, end, _)) in edges.iter().enumerate() {
        adjacency[start as usize].push((index, end));
        adjacency[end as usize].push((index, start));
    }

    let mut longest = 0;
    let mut work: Vec<(Station, u64, u32)> = edges
        .iter()
        .flat_map(|&(start, end, _)| [(start, 0, 0), (end, 0, 0)])
        .collect();

    while let Some((at, visited, length)) = work.pop() {
        longest = longest.max(length);

        for &(edge, other) in &adjacency[at as usize] {
            let bit = 1u64 << edge;
            if visited & bit == 0 {
                work.push((other, visited | bit, length + u32::from(edges[edge].2)));
            }
        }
    }

    longest
}

/// One player's final score, by component.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PlayerScore {
    /// Points from route claims, accrued during the game.
    pub claim_points: i32,
    /// Points from tickets; unfulfilled tickets subtract.
    pub ticket_points: i32,
    /// The exact length of the player's longest trail.
    pub longest_trail: u32,
    /// Whether the player holds (or shares) the longest trail overall.
    pub longest_trail_bonus: bool,
}

impl PlayerScore {
    /// The player's final score.
    pub fn total(&self) -> i32 {
        let bonus = if self.longest_trail_bonus {
            LONGEST_TRAIL_BONUS
        } else {
            0
        };
        self.claim_points + self.ticket_points + bonus
    }
}

/// Computes every player's final score from a finished game.
///
/// The longest-trail bonus goes to every player tied for the longest trail,
/// not to a single winner.
pub fn final_scores(state: &GameState) -> BTreeMap<PlayerId, PlayerScore> {
    let mut scores: BTreeMap<PlayerId, PlayerScore> = state
        .players()
        .map(|(id, player)| {
            let connectivity = Connectivity::new(player.routes());
            let ticket_points = player
                .tickets()
                .iter()
                .map(|ticket| ticket.points(|a, b| connectivity.connected(a, b)))
                .sum();

            let score = PlayerScore {
                claim_points: player.public().claim_points(),
                ticket_points,
                longest_trail: longest_trail(player.routes()),
                longest_trail_bonus: false,
            };
            (id, score)
        })
        .collect();

    let longest = scores
        .values()
        .map(|score| score.longest_trail)
        .max()
        .unwrap_or(0);
    for score in scores.values_mut() {
        if score.longest_trail == longest {
            score.longest_trail_bonus = true;
        }
    }

    scores
}
