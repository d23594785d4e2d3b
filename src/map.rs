use crate::card::CardColor;
use crate::station::{Station, StationPair};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use strum_macros::Display;

/// Points granted for claiming a route, indexed by route length.
const CLAIM_POINTS: [i32; 7] = [0, 1, 2, 4, 7, 10, 15];

/// Whether a route runs on the surface or through a tunnel.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Surface,
    Underground,
}

/// Identifies a route in the catalog.
///
/// Identifiers are stable for the lifetime of the process: they index into
/// the catalog held by [`Map::swiss`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct RouteId(u8);

impl RouteId {
    /// The position of this route in [`Map::routes`].
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match Map::swiss().route(*self) {
            Some(route) => {
                let (start, end) = route.stations();
                write!(f, "{} – {}", start, end)
            }
            None => write!(f, "#{}", self.0),
        }
    }
}

/// A claimable connection between two adjacent stations.
///
/// Two routes may connect the same station pair; they are each other's
/// "twins", and [`Map::twin_of`] resolves one from the other.
#[derive(Clone, Debug, PartialEq)]
pub struct Route {
    id: RouteId,
    stations: StationPair,
    length: u8,
    level: Level,
    /// The color of cards needed to claim this route.
    /// `None` means any single color matches.
    color: Option<CardColor>,
}

impl Route {
    /// The identifier of this route in the catalog.
    #[inline]
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// The two endpoint stations, in catalog order.
    #[inline]
    pub fn stations(&self) -> StationPair {
        self.stations
    }

    /// The number of cards (and cars) needed to claim this route.
    #[inline]
    pub fn length(&self) -> u8 {
        self.length
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.level
    }

    /// The required card color, or `None` for routes any color can claim.
    #[inline]
    pub fn color(&self) -> Option<CardColor> {
        self.color
    }

    /// Points granted when this route is claimed.
    ///
    /// # Example
    /// ```
    /// use alpine_rails::map::Map;
    /// use alpine_rails::station::Station;
    ///
    /// let map = Map::swiss();
    /// let id = map.between(Station::Geneve, Station::Yverdon)[0];
    /// assert_eq!(map.route(id).unwrap().claim_points(), 15);
    /// ```
    #[inline]
    pub fn claim_points(&self) -> i32 {
        CLAIM_POINTS[self.length as usize]
    }
}

/// Station pairs are stored in a canonical order, so that lookups work
/// regardless of the direction the caller names the endpoints in.
#[inline]
fn ordered(pair: StationPair) -> StationPair {
    let (start, end) = pair;
    if start <= end {
        (start, end)
    } else {
        (end, start)
    }
}

/// Convenience macro to describe one catalog route.
macro_rules! route {
    ($start:ident, $end:ident, $length:literal, $level:ident) => {
        (
            (Station::$start, Station::$end),
            $length,
            Level::$level,
            None,
        )
    };
    ($start:ident, $end:ident, $length:literal, $level:ident, $color:ident) => {
        (
            (Station::$start, Station::$end),
            $length,
            Level::$level,
            Some(CardColor::$color),
        )
    };
}

lazy_static! {
    static ref SWISS_MAP: Map = Map::build_swiss();
}

/// Read-only catalog of all stations and routes on the map.
///
/// Built once per process; all games share it. The map holds no game state:
/// who claimed what lives in the player states.
pub struct Map {
    routes: Vec<Route>,
    between: BTreeMap<StationPair, SmallVec<[RouteId; 2]>>,
}

impl Map {
    /// The map of Switzerland: 51 stations, 87 routes.
    pub fn swiss() -> &'static Map {
        &SWISS_MAP
    }

    fn build_swiss() -> Map {
        Self::build(&[
            route! {Autriche1, SaintGall, 4, Underground},
            route! {Autriche2, Vaduz, 1, Underground, Red},
            route! {Baden, Bale, 3, Underground, Red},
            route! {Baden, Olten, 2, Surface, Violet},
            route! {Baden, Zurich, 1, Surface, Yellow},
            route! {Bale, Allemagne1, 1, Underground, Blue},
            route! {Bale, Delemont, 2, Underground, Yellow},
            route! {Bale, Olten, 2, Underground, Orange},
            route! {Bellinzone, Locarno, 1, Underground, Black},
            route! {Bellinzone, Lugano, 1, Underground, Red},
            route! {Bellinzone, Lugano, 1, Underground, Yellow},
            route! {Bellinzone, Wassen, 4, Underground},
            route! {Bellinzone, Wassen, 4, Underground},
            route! {Berne, Fribourg, 1, Surface, Orange},
            route! {Berne, Fribourg, 1, Surface, Yellow},
            route! {Berne, Interlaken, 3, Surface, Blue},
            route! {Berne, Lucerne, 4, Surface},
            route! {Berne, Lucerne, 4, Surface},
            route! {Berne, Neuchatel, 2, Surface, Red},
            route! {Berne, Soleure, 2, Surface, Black},
            route! {Brigue, Interlaken, 2, Underground, White},
            route! {Brigue, Italie5, 3, Underground, Green},
            route! {Brigue, Locarno, 6, Underground},
            route! {Brigue, Sion, 3, Underground, Black},
            route! {Brigue, Wassen, 4, Underground, Red},
            route! {Brusio, Coire, 5, Underground},
            route! {Brusio, Davos, 4, Underground, Blue},
            route! {Brusio, Italie2, 2, Underground, Green},
            route! {Coire, Davos, 2, Underground, Violet},
            route! {Coire, Sargans, 1, Underground, White},
            route! {Coire, Wassen, 5, Underground},
            route! {Davos, Autriche3, 3, Underground},
            route! {Davos, Italie1, 3, Underground},
            route! {Davos, Sargans, 3, Underground, Black},
            route! {Allemagne2, Schaffhouse, 1, Surface, Yellow},
            route! {Allemagne3, Kreuzlingen, 1, Surface, Orange},
            route! {Allemagne4, Kreuzlingen, 1, Surface, White},
            route! {Allemagne5, SaintGall, 2, Surface},
            route! {Delemont, France4, 2, Underground, Black},
            route! {Delemont, LaChauxDeFonds, 3, Underground, White},
            route! {Delemont, Soleure, 1, Underground, Violet},
            route! {France1, Martigny, 2, Underground},
            route! {France2, Geneve, 1, Surface, Yellow},
            route! {France3, LaChauxDeFonds, 2, Underground, Green},
            route! {Fribourg, Lausanne, 3, Surface, Red},
            route! {Fribourg, Lausanne, 3, Surface, Violet},
            route! {Geneve, Lausanne, 4, Surface, Blue},
            route! {Geneve, Lausanne, 4, Surface, White},
            route! {Geneve, Yverdon, 6, Surface},
            route! {Interlaken, Lucerne, 4, Surface, Violet},
            route! {Italie3, Lugano, 2, Underground, White},
            route! {Italie4, Locarno, 2, Underground, Orange},
            route! {Kreuzlingen, Schaffhouse, 3, Surface, Violet},
            route! {Kreuzlingen, SaintGall, 1, Surface, Green},
            route! {Kreuzlingen, Winterthour, 2, Surface, Yellow},
            route! {Lausanne, Martigny, 4, Underground, Orange},
            route! {Lausanne, Neuchatel, 4, Surface},
            route! {LaChauxDeFonds, Neuchatel, 1, Underground, Orange},
            route! {LaChauxDeFonds, Yverdon, 3, Underground, Yellow},
            route! {Locarno, Lugano, 1, Underground, Violet},
            route! {Lucerne, Olten, 3, Surface, Green},
            route! {Lucerne, Schwyz, 1, Surface, Blue},
            route! {Lucerne, Zoug, 1, Surface, Orange},
            route! {Lucerne, Zoug, 1, Surface, Yellow},
            route! {Martigny, Sion, 2, Underground, Green},
            route! {Neuchatel, Soleure, 4, Surface, Green},
            route! {Neuchatel, Yverdon, 2, Surface, Black},
            route! {Olten, Soleure, 1, Surface, Blue},
            route! {Olten, Zurich, 3, Surface, White},
            route! {Pfaffikon, Sargans, 3, Underground, Yellow},
            route! {Pfaffikon, Schwyz, 1, Surface, Violet},
            route! {Pfaffikon, SaintGall, 3, Surface, Orange},
            route! {Pfaffikon, Zurich, 2, Surface, Blue},
            route! {Sargans, Vaduz, 1, Underground, Orange},
            route! {Schaffhouse, Winterthour, 1, Surface, Black},
            route! {Schaffhouse, Winterthour, 1, Surface, White},
            route! {Schaffhouse, Zurich, 3, Surface, Orange},
            route! {Schwyz, Wassen, 2, Underground, Green},
            route! {Schwyz, Wassen, 2, Underground, Yellow},
            route! {Schwyz, Zoug, 1, Surface, Black},
            route! {Schwyz, Zoug, 1, Surface, White},
            route! {SaintGall, Vaduz, 2, Underground, Blue},
            route! {SaintGall, Winterthour, 3, Surface, Red},
            route! {SaintGall, Zurich, 4, Surface, Black},
            route! {Winterthour, Zurich, 1, Surface, Blue},
            route! {Winterthour, Zurich, 1, Surface, Violet},
            route! {Zoug, Zurich, 1, Surface, Green},
            route! {Zoug, Zurich, 1, Surface, Red},
        ])
    }

    fn build(catalog: &[(StationPair, u8, Level, Option<CardColor>)]) -> Map {
        let mut routes = Vec::with_capacity(catalog.len());
        let mut between: BTreeMap<StationPair, SmallVec<[RouteId; 2]>> = BTreeMap::new();

        for (index, &(stations, length, level, color)) in catalog.iter().enumerate() {
            let (start, end) = stations;
            assert_ne!(start, end, "a route cannot loop on {}", start);
            assert!(
                (1..=6).contains(&length),
                "route between {} and {} has length {}",
                start,
                end,
                length
            );
            assert_ne!(
                color,
                Some(CardColor::Locomotive),
                "a route cannot require locomotives"
            );

            let id = RouteId(index as u8);
            let twins = between.entry(ordered(stations)).or_default();
            assert!(
                twins.len() < 2,
                "more than two routes between {} and {}",
                start,
                end
            );
            twins.push(id);

            routes.push(Route {
                id,
                stations,
                length,
                level,
                color,
            });
        }

        Map { routes, between }
    }

    /// The full route list, ordered by identifier.
    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Looks up a route by identifier.
    ///
    /// Returns `None` for identifiers that do not belong to this catalog.
    #[inline]
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id.index())
    }

    /// All routes connecting two adjacent stations, in either naming order.
    ///
    /// At most two routes connect a station pair. Non-adjacent stations
    /// yield an empty slice.
    ///
    /// # Example
    /// ```
    /// use alpine_rails::map::Map;
    /// use alpine_rails::station::Station;
    ///
    /// let map = Map::swiss();
    /// assert_eq!(map.between(Station::Geneve, Station::Lausanne).len(), 2);
    /// assert_eq!(map.between(Station::Lausanne, Station::Geneve).len(), 2);
    /// assert!(map.between(Station::Geneve, Station::Coire).is_empty());
    /// ```
    pub fn between(&self, start: Station, end: Station) -> &[RouteId] {
        self.between
            .get(&ordered((start, end)))
            .map_or(&[], |twins| twins.as_slice())
    }

    /// The twin of a route, i.e. the other route over the same station pair.
    pub fn twin_of(&self, id: RouteId) -> Option<RouteId> {
        let route = self.route(id)?;

        self.between(route.stations.0, route.stations.1)
            .iter()
            .copied()
            .find(|&other| other != id)
    }
}
