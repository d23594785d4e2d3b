use crate::card::CardColor;
use crate::error::StateError;
use crate::map::{Map, Route, RouteId};
use crate::ticket::Ticket;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumCount as EnumCountMacro, EnumIter};

/// Every player starts the game with 40 cars.
pub const NUM_OF_CARS: u8 = 40;

/// Identifies one of the up to three players of a game.
///
/// Play order follows declaration order; a 2-player game uses the first two
/// identifiers.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumCountMacro,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlayerId {
    #[strum(serialize = "player 1")]
    One,
    #[strum(serialize = "player 2")]
    Two,
    #[strum(serialize = "player 3")]
    Three,
}

impl PlayerId {
    /// The first `player_count` identifiers, in play order.
    pub fn roster(player_count: usize) -> impl Iterator<Item = PlayerId> {
        PlayerId::iter().take(player_count)
    }

    /// The player whose turn follows this one's, in a game of
    /// `player_count` players.
    pub fn next(self, player_count: usize) -> PlayerId {
        let index = (self as usize + 1) % player_count;
        PlayerId::iter()
            .nth(index)
            .unwrap_or(PlayerId::One)
    }
}

/// Information about a player that is visible to all players.
///
/// Hand contents and ticket identities stay on the private side
/// ([`PlayerState`]); only their counts show through here.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PublicPlayerState {
    ticket_count: usize,
    card_count: usize,
    routes: Vec<RouteId>,
}

impl PublicPlayerState {
    /// Builds a public player state, taking ownership of the route list.
    ///
    /// Fails if a route is not in the catalog, appears twice, or if the
    /// claimed lengths add up to more cars than a player ever has.
    pub fn new(
        ticket_count: usize,
        card_count: usize,
        routes: Vec<RouteId>,
    ) -> Result<Self, StateError> {
        let map = Map::swiss();
        let mut seen = HashSet::new();
        let mut total_length: u32 = 0;

        for &id in &routes {
            let route = map.route(id).ok_or(StateError::UnknownRoute(id))?;
            if !seen.insert(id) {
                return Err(StateError::DuplicateClaim(id));
            }
            total_length += u32::from(route.length());
        }

        if total_length > u32::from(NUM_OF_CARS) {
            return Err(StateError::CarAllotmentExceeded {
                total: total_length,
                allotment: u32::from(NUM_OF_CARS),
            });
        }

        Ok(Self {
            ticket_count,
            card_count,
            routes,
        })
    }

    /// How many tickets the player holds. Which ones is private.
    #[inline]
    pub fn ticket_count(&self) -> usize {
        self.ticket_count
    }

    /// How many transport cards the player holds. Which ones is private.
    #[inline]
    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// The routes this player has claimed.
    #[inline]
    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }

    /// How many cars the player has left.
    pub fn car_count(&self) -> u8 {
        NUM_OF_CARS - claimed_length(&self.routes) as u8
    }

    /// Points accumulated from route claims alone.
    pub fn claim_points(&self) -> i32 {
        let map = Map::swiss();
        self.routes
            .iter()
            .filter_map(|&id| map.route(id))
            .map(Route::claim_points)
            .sum()
    }
}

fn claimed_length(routes: &[RouteId]) -> u32 {
    let map = Map::swiss();
    routes
        .iter()
        .filter_map(|&id| map.route(id))
        .map(|route| u32::from(route.length()))
        .sum()
}

/// The complete state of one player, only visible to its owner.
///
/// The public projection is derived on demand via [`PlayerState::public`]
/// rather than stored alongside; the two can therefore never disagree.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    tickets: Vec<Ticket>,
    /// Ticket options dealt during setup, awaiting the player's selection.
    pending_tickets: SmallVec<[Ticket; 3]>,
    /// Maps every card color to how many of it the player holds.
    /// All colors are present at all times.
    hand: HashMap<CardColor, u8>,
    routes: Vec<RouteId>,
}

impl PlayerState {
    pub(crate) fn new() -> Self {
        let hand = HashMap::from_iter(CardColor::iter().map(|color| (color, 0)));

        Self {
            tickets: Vec::new(),
            pending_tickets: SmallVec::new(),
            hand,
            routes: Vec::new(),
        }
    }

    /// The tickets the player has kept.
    #[inline]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    /// Setup-phase ticket options the player has not decided on yet.
    #[inline]
    pub fn pending_tickets(&self) -> &[Ticket] {
        &self.pending_tickets
    }

    /// The exact hand composition, per color.
    #[inline]
    pub fn hand(&self) -> &HashMap<CardColor, u8> {
        &self.hand
    }

    /// The routes this player has claimed.
    #[inline]
    pub fn routes(&self) -> &[RouteId] {
        &self.routes
    }

    /// How many cars the player has left.
    pub fn car_count(&self) -> u8 {
        NUM_OF_CARS - claimed_length(&self.routes) as u8
    }

    /// How many cards of the given color the player holds.
    pub fn count_of(&self, color: CardColor) -> u8 {
        self.hand.get(&color).copied().unwrap_or(0)
    }

    /// The projection other players are allowed to see.
    pub fn public(&self) -> PublicPlayerState {
        PublicPlayerState {
            ticket_count: self.tickets.len(),
            card_count: self.hand.values().map(|&count| usize::from(count)).sum(),
            routes: self.routes.clone(),
        }
    }

    pub(crate) fn gain_card(&mut self, color: CardColor) {
        *self.hand.entry(color).or_insert(0) += 1;
    }

    /// Removes cards from the hand. The caller has verified they are there.
    pub(crate) fn spend_cards(&mut self, color: CardColor, count: u8) {
        debug_assert!(self.count_of(color) >= count);
        self.hand
            .entry(color)
            .and_modify(|held| *held -= count);
    }

    pub(crate) fn keep_tickets(&mut self, tickets: impl IntoIterator<Item = Ticket>) {
        self.tickets.extend(tickets);
    }

    pub(crate) fn set_pending_tickets(&mut self, tickets: SmallVec<[Ticket; 3]>) {
        self.pending_tickets = tickets;
    }

    pub(crate) fn take_pending_tickets(&mut self) -> SmallVec<[Ticket; 3]> {
        std::mem::take(&mut self.pending_tickets)
    }

    pub(crate) fn claim(&mut self, route: RouteId) {
        self.routes.push(route);
    }
}
