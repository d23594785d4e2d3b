use crate::station::Station;

use lazy_static::lazy_static;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// One origin/destination pair a ticket can be fulfilled through.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Trip {
    pub from: Station,
    pub to: Station,
    pub points: i32,
}

/// A destination ticket.
///
/// Simple tickets hold a single trip. Bordering-country tickets hold one trip
/// per reachable border station, sharing the same origin; at game end only the
/// best-reachable trip counts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ticket {
    trips: SmallVec<[Trip; 5]>,
}

impl Ticket {
    /// A ticket connecting two specific stations.
    pub fn between(from: Station, to: Station, points: i32) -> Self {
        Self::new(smallvec![Trip { from, to, points }])
    }

    /// A ticket from one city towards several countries.
    ///
    /// Every station of a destination country fulfills that country's trip.
    pub fn to_countries(from: Station, destinations: &[(&[Station], i32)]) -> Self {
        let trips = destinations
            .iter()
            .flat_map(|&(stations, points)| {
                stations.iter().map(move |&to| Trip { from, to, points })
            })
            .collect();

        Self::new(trips)
    }

    fn new(trips: SmallVec<[Trip; 5]>) -> Self {
        assert!(!trips.is_empty(), "a ticket needs at least one trip");
        for trip in &trips {
            assert_ne!(trip.from, trip.to, "a trip cannot loop on {}", trip.from);
            assert!(trip.points > 0, "trip values are positive");
        }

        Self { trips }
    }

    /// All the trips this ticket can be fulfilled through.
    #[inline]
    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// How many points this ticket is worth, given which station pairs the
    /// owner has connected.
    ///
    /// The best reachable trip wins. When no trip is reachable, the smallest
    /// trip value is *subtracted* instead.
    ///
    /// # Example
    /// ```
    /// use alpine_rails::station::Station;
    /// use alpine_rails::ticket::Ticket;
    ///
    /// let ticket = Ticket::between(Station::Berne, Station::Coire, 10);
    /// assert_eq!(ticket.points(|_, _| true), 10);
    /// assert_eq!(ticket.points(|_, _| false), -10);
    /// ```
    pub fn points(&self, connected: impl Fn(Station, Station) -> bool) -> i32 {
        let mut best = None;
        let mut smallest = i32::MAX;

        for trip in &self.trips {
            smallest = smallest.min(trip.points);

            if connected(trip.from, trip.to) {
                best = Some(best.map_or(trip.points, |b: i32| b.max(trip.points)));
            }
        }

        best.unwrap_or(-smallest)
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let from = self.trips[0].from;

        if self.trips.len() == 1 {
            let trip = &self.trips[0];
            return write!(f, "{} – {} ({})", from, trip.to, trip.points);
        }

        // Border stations of one country all display the same name; collapse
        // them into a single entry.
        let mut entries: Vec<(String, i32)> = Vec::new();
        for trip in &self.trips {
            let entry = (trip.to.to_string(), trip.points);
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        let entries: Vec<String> = entries
            .into_iter()
            .map(|(name, points)| format!("{} ({})", name, points))
            .collect();
        write!(f, "{} – {{{}}}", from, entries.join(", "))
    }
}

use crate::station::Station::*;

/// Stations standing in for each bordering country.
pub const ALLEMAGNE: [Station; 5] = [Allemagne1, Allemagne2, Allemagne3, Allemagne4, Allemagne5];
pub const AUTRICHE: [Station; 3] = [Autriche1, Autriche2, Autriche3];
pub const ITALIE: [Station; 5] = [Italie1, Italie2, Italie3, Italie4, Italie5];
pub const FRANCE: [Station; 4] = [France1, France2, France3, France4];

lazy_static! {
    /// Every ticket of the game, in catalog order. The dealer shuffles its
    /// own copy per game.
    pub static ref ALL_TICKETS: Vec<Ticket> = build_tickets();
}

fn build_tickets() -> Vec<Ticket> {
    let mut tickets = vec![
        Ticket::between(Bale, Berne, 5),
        Ticket::between(Bale, Brigue, 10),
        Ticket::between(Bale, SaintGall, 8),
        Ticket::between(Berne, Coire, 10),
        Ticket::between(Berne, Lugano, 12),
        Ticket::between(Berne, Schwyz, 5),
        Ticket::between(Berne, Zurich, 6),
        Ticket::between(Fribourg, Lucerne, 5),
        Ticket::between(Geneve, Bale, 13),
        Ticket::between(Geneve, Berne, 8),
        Ticket::between(Geneve, Sion, 10),
        Ticket::between(Geneve, Zurich, 14),
        Ticket::between(Interlaken, Winterthour, 7),
        Ticket::between(Kreuzlingen, Zurich, 3),
        Ticket::between(Lausanne, Interlaken, 7),
        Ticket::between(Lausanne, Lucerne, 8),
        Ticket::between(Lausanne, SaintGall, 13),
        Ticket::between(Lausanne, Zurich, 12),
        Ticket::between(LaChauxDeFonds, Berne, 3),
        Ticket::between(LaChauxDeFonds, Lucerne, 7),
        Ticket::between(LaChauxDeFonds, Zurich, 8),
        Ticket::between(Lucerne, Vaduz, 6),
        Ticket::between(Lucerne, Zurich, 2),
        Ticket::between(Neuchatel, Winterthour, 9),
        Ticket::between(Olten, Schaffhouse, 5),
        Ticket::between(Schaffhouse, Martigny, 15),
        Ticket::between(Schaffhouse, SaintGall, 4),
        Ticket::between(Schaffhouse, Zoug, 3),
        Ticket::between(SaintGall, Brusio, 9),
        Ticket::between(Winterthour, Schwyz, 3),
        Ticket::between(Zurich, Bale, 4),
        Ticket::between(Zurich, Brusio, 11),
        Ticket::between(Zurich, Lugano, 9),
        Ticket::between(Zurich, Vaduz, 6),
    ];

    for (city, points) in [
        (Berne, [6, 11, 8, 5]),
        (Coire, [6, 3, 5, 12]),
        (Lugano, [12, 13, 2, 14]),
        (Zurich, [3, 7, 11, 7]),
    ] {
        tickets.push(Ticket::to_countries(
            city,
            &[
                (&ALLEMAGNE, points[0]),
                (&AUTRICHE, points[1]),
                (&ITALIE, points[2]),
                (&FRANCE, points[3]),
            ],
        ));
    }

    tickets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_ticket_text() {
        let ticket = Ticket::between(Station::Berne, Station::Coire, 10);
        assert_eq!(ticket.to_string(), "Berne – Coire (10)");
    }

    #[test]
    fn country_ticket_text() {
        let ticket = Ticket::to_countries(
            Station::Berne,
            &[
                (&ALLEMAGNE, 6),
                (&AUTRICHE, 11),
                (&ITALIE, 8),
                (&FRANCE, 5),
            ],
        );

        assert_eq!(
            ticket.to_string(),
            "Berne – {Allemagne (6), Autriche (11), Italie (8), France (5)}"
        );
    }

    #[test]
    fn simple_ticket_points() {
        let ticket = Ticket::between(Station::Lausanne, Station::SaintGall, 13);

        assert_eq!(ticket.points(|_, _| true), 13);
        assert_eq!(ticket.points(|_, _| false), -13);
    }

    #[test]
    fn country_ticket_scores_best_reachable_trip() {
        let ticket = Ticket::to_countries(
            Station::Coire,
            &[(&ALLEMAGNE, 6), (&AUTRICHE, 3), (&ITALIE, 5)],
        );

        // Only Italy is reached.
        assert_eq!(
            ticket.points(|_, to| ITALIE.contains(&to)),
            5
        );

        // Germany beats Italy when both are reached.
        assert_eq!(
            ticket.points(|_, to| ITALIE.contains(&to) || ALLEMAGNE.contains(&to)),
            6
        );
    }

    #[test]
    fn country_ticket_penalty_is_smallest_trip() {
        let ticket = Ticket::to_countries(
            Station::Coire,
            &[(&ALLEMAGNE, 6), (&AUTRICHE, 3), (&ITALIE, 5)],
        );

        assert_eq!(ticket.points(|_, _| false), -3);
    }

    #[test]
    fn catalog_has_country_tickets() {
        assert_eq!(ALL_TICKETS.len(), 38);
        assert!(ALL_TICKETS.iter().any(|ticket| ticket.trips().len() > 1));
    }
}
