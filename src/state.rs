use crate::deck::{CardDealer, PublicCardState, NUM_INITIAL_CARDS};
use crate::error::StateError;
use crate::map::{Map, RouteId};
use crate::player::{PlayerId, PlayerState, PublicPlayerState};
use crate::turn::GamePhase;

use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::collections::BTreeMap;

pub(crate) const MIN_PLAYERS: usize = 2;
pub(crate) const MAX_PLAYERS: usize = 3;

/// Everything about a game that every player may see.
///
/// Hidden information (hand compositions, ticket identities, pile contents)
/// only shows through as counts. Instances are either projected from a
/// [`GameState`] or assembled by an outer layer through [`PublicGameState::new`],
/// which enforces the construction contract.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PublicGameState {
    tickets_count: usize,
    card_state: PublicCardState,
    current_player: PlayerId,
    player_states: BTreeMap<PlayerId, PublicPlayerState>,
    last_player: Option<PlayerId>,
}

impl PublicGameState {
    /// Builds a public game state, taking ownership of all containers.
    ///
    /// The player state map must hold exactly one entry per roster member —
    /// the roster being the first `player_states.len()` player identifiers —
    /// and both `current_player` and `last_player` (when set) must belong to
    /// it. Claimed routes must be globally unique, and no twin pair may be
    /// claimed on both sides in a game of fewer than 4 players.
    ///
    /// `last_player` is the only optional piece of information: it stays
    /// `None` until the end-game trigger fires.
    pub fn new(
        tickets_count: usize,
        card_state: PublicCardState,
        current_player: PlayerId,
        player_states: BTreeMap<PlayerId, PublicPlayerState>,
        last_player: Option<PlayerId>,
    ) -> Result<Self, StateError> {
        let player_count = player_states.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(StateError::BadPlayerCount(player_count));
        }

        for id in PlayerId::roster(player_count) {
            if !player_states.contains_key(&id) {
                return Err(StateError::MissingPlayer(id));
            }
        }

        if !player_states.contains_key(&current_player) {
            return Err(StateError::UnknownPlayer(current_player));
        }
        if let Some(last) = last_player {
            if !player_states.contains_key(&last) {
                return Err(StateError::UnknownPlayer(last));
            }
        }

        Self::check_claims(&player_states, player_count)?;

        Ok(Self {
            tickets_count,
            card_state,
            current_player,
            player_states,
            last_player,
        })
    }

    fn check_claims(
        player_states: &BTreeMap<PlayerId, PublicPlayerState>,
        player_count: usize,
    ) -> Result<(), StateError> {
        let map = Map::swiss();
        let mut claimed = std::collections::HashSet::new();

        for state in player_states.values() {
            for &id in state.routes() {
                if !claimed.insert(id) {
                    return Err(StateError::DuplicateClaim(id));
                }
            }
        }

        if player_count < 4 {
            for &id in &claimed {
                if let Some(twin) = map.twin_of(id) {
                    if id < twin && claimed.contains(&twin) {
                        return Err(StateError::TwinPairClaimed {
                            first: id,
                            second: twin,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    /// How many tickets remain in the ticket pile.
    #[inline]
    pub fn tickets_count(&self) -> usize {
        self.tickets_count
    }

    /// Whether a ticket draw can still happen.
    #[inline]
    pub fn can_draw_tickets(&self) -> bool {
        self.tickets_count > 0
    }

    /// Whether a card draw can still happen.
    #[inline]
    pub fn can_draw_cards(&self) -> bool {
        self.card_state.can_draw_cards()
    }

    /// The public view of the decks.
    #[inline]
    pub fn card_state(&self) -> &PublicCardState {
        &self.card_state
    }

    /// Whose turn it is.
    #[inline]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// How many players are in this game.
    #[inline]
    pub fn player_count(&self) -> usize {
        self.player_states.len()
    }

    /// One player's public state.
    pub fn player_state(&self, id: PlayerId) -> Option<&PublicPlayerState> {
        self.player_states.get(&id)
    }

    /// All players' public states, keyed by identifier.
    #[inline]
    pub fn player_states(&self) -> &BTreeMap<PlayerId, PublicPlayerState> {
        &self.player_states
    }

    /// Every claimed route, across all players. One entry per route.
    pub fn claimed_routes(&self) -> Vec<RouteId> {
        self.player_states
            .values()
            .flat_map(|state| state.routes().iter().copied())
            .collect()
    }

    /// The player who triggered the final round, once someone has.
    #[inline]
    pub fn last_player(&self) -> Option<PlayerId> {
        self.last_player
    }
}

/// The complete, authoritative state of a game.
///
/// A value of this type is only ever produced by [`GameState::new`] or by an
/// accepted action; rejected actions leave the receiver untouched and produce
/// nothing. Snapshots are plain values: callers may retain, clone and compare
/// them freely, the engine never mutates one after handing it out.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub(crate) phase: GamePhase,
    /// `None` during setup; `Some(n)` once the turn-based game has started.
    pub(crate) turn: Option<u32>,
    /// How many cards the current player has drawn so far this turn.
    pub(crate) cards_drawn: u8,
    pub(crate) current_player: PlayerId,
    pub(crate) last_player: Option<PlayerId>,
    pub(crate) players: BTreeMap<PlayerId, PlayerState>,
    pub(crate) dealer: CardDealer,
}

impl GameState {
    /// Starts a game: shuffles both decks with the given random source, then
    /// deals every player 4 transport cards and 3 ticket options.
    ///
    /// The game opens in [`GamePhase::Starting`]: each player must choose
    /// which of their ticket options to keep before the first turn.
    ///
    /// # Example
    /// ```
    /// use alpine_rails::state::GameState;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let state = GameState::new(2, ChaCha8Rng::seed_from_u64(17)).unwrap();
    /// assert!(GameState::new(4, ChaCha8Rng::seed_from_u64(17)).is_err());
    /// ```
    pub fn new(player_count: usize, rng: ChaCha8Rng) -> Result<Self, StateError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
            return Err(StateError::BadPlayerCount(player_count));
        }

        let mut dealer = CardDealer::new(rng);
        let mut players = BTreeMap::new();

        for id in PlayerId::roster(player_count) {
            let mut player = PlayerState::new();
            for _ in 0..NUM_INITIAL_CARDS {
                if let Some(card) = dealer.draw_blind() {
                    player.gain_card(card);
                }
            }
            players.insert(id, player);
        }

        for player in players.values_mut() {
            player.set_pending_tickets(dealer.draw_tickets());
        }

        Ok(Self {
            phase: GamePhase::Starting,
            turn: None,
            cards_drawn: 0,
            current_player: PlayerId::One,
            last_player: None,
            players,
            dealer,
        })
    }

    /// The phase of the game.
    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// The current turn number, once turns have started.
    #[inline]
    pub fn turn(&self) -> Option<u32> {
        self.turn
    }

    /// Whose turn it is.
    #[inline]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// The player who triggered the final round, once someone has.
    #[inline]
    pub fn last_player(&self) -> Option<PlayerId> {
        self.last_player
    }

    /// How many players are in this game.
    #[inline]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// One player's complete state. Owner-visible information included —
    /// routing it to the right recipient is the caller's concern.
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(&id)
    }

    /// All players and their complete states, in roster order.
    pub fn players(&self) -> impl Iterator<Item = (PlayerId, &PlayerState)> {
        self.players.iter().map(|(&id, state)| (id, state))
    }

    /// How many tickets remain in the ticket pile.
    #[inline]
    pub fn tickets_count(&self) -> usize {
        self.dealer.tickets_count()
    }

    /// Whether a ticket draw can still happen.
    #[inline]
    pub fn can_draw_tickets(&self) -> bool {
        self.tickets_count() > 0
    }

    /// Whether a card draw can still happen.
    #[inline]
    pub fn can_draw_cards(&self) -> bool {
        self.dealer.can_draw_cards()
    }

    /// Projects the information every player may see.
    pub fn public_state(&self) -> PublicGameState {
        PublicGameState {
            tickets_count: self.dealer.tickets_count(),
            card_state: self.dealer.public_state(),
            current_player: self.current_player,
            player_states: self
                .players
                .iter()
                .map(|(&id, player)| (id, player.public()))
                .collect(),
            last_player: self.last_player,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::CardColor;
    use crate::deck::{NUM_DRAWN_TICKETS, NUM_FACE_UP};
    use crate::station::Station;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;

    fn card_state() -> PublicCardState {
        PublicCardState::new([Some(CardColor::Red); NUM_FACE_UP], 30, 10)
    }

    fn empty_player_states(player_count: usize) -> BTreeMap<PlayerId, PublicPlayerState> {
        PlayerId::roster(player_count)
            .map(|id| (id, PublicPlayerState::new(0, 0, Vec::new()).unwrap()))
            .collect()
    }

    fn route_between(start: Station, end: Station, twin: usize) -> RouteId {
        Map::swiss().between(start, end)[twin]
    }

    // Tests for `PublicGameState` construction.

    #[test]
    fn public_game_state_minimal_values() {
        let state = PublicGameState::new(
            0,
            PublicCardState::new([None; NUM_FACE_UP], 0, 0),
            PlayerId::Two,
            empty_player_states(2),
            None,
        )
        .unwrap();

        assert_eq!(state.tickets_count(), 0);
        assert_eq!(state.can_draw_tickets(), false);
        assert_eq!(state.can_draw_cards(), false);
        assert_eq!(state.current_player(), PlayerId::Two);
        assert_eq!(state.claimed_routes(), Vec::new());
        assert_eq!(state.last_player(), None);
    }

    #[test]
    fn public_game_state_draw_predicates() {
        let state = PublicGameState::new(
            12,
            card_state(),
            PlayerId::One,
            empty_player_states(3),
            None,
        )
        .unwrap();

        assert!(state.can_draw_tickets());
        assert!(state.can_draw_cards());
        assert_eq!(state.player_count(), 3);
    }

    #[test]
    fn public_game_state_rejects_bad_roster_sizes() {
        assert_eq!(
            PublicGameState::new(5, card_state(), PlayerId::One, BTreeMap::new(), None),
            Err(StateError::BadPlayerCount(0))
        );

        let mut too_few = empty_player_states(2);
        too_few.remove(&PlayerId::Two);
        assert_eq!(
            PublicGameState::new(5, card_state(), PlayerId::One, too_few, None),
            Err(StateError::BadPlayerCount(1))
        );
    }

    #[test]
    fn public_game_state_rejects_gap_in_roster() {
        let mut states = empty_player_states(3);
        states.remove(&PlayerId::Two);

        // Two entries, but they are One and Three: Two is missing.
        assert_eq!(
            PublicGameState::new(5, card_state(), PlayerId::One, states, None),
            Err(StateError::MissingPlayer(PlayerId::Two))
        );
    }

    #[test]
    fn public_game_state_rejects_foreign_players() {
        assert_eq!(
            PublicGameState::new(
                5,
                card_state(),
                PlayerId::Three,
                empty_player_states(2),
                None
            ),
            Err(StateError::UnknownPlayer(PlayerId::Three))
        );

        assert_eq!(
            PublicGameState::new(
                5,
                card_state(),
                PlayerId::One,
                empty_player_states(2),
                Some(PlayerId::Three)
            ),
            Err(StateError::UnknownPlayer(PlayerId::Three))
        );
    }

    #[test]
    fn public_game_state_rejects_route_claimed_twice() {
        let route = route_between(Station::Berne, Station::Interlaken, 0);
        let mut states = empty_player_states(2);
        for state in states.values_mut() {
            *state = PublicPlayerState::new(0, 0, vec![route]).unwrap();
        }

        assert_eq!(
            PublicGameState::new(5, card_state(), PlayerId::One, states, None),
            Err(StateError::DuplicateClaim(route))
        );
    }

    #[test]
    fn public_game_state_rejects_claimed_twin_pair() {
        let first = route_between(Station::Geneve, Station::Lausanne, 0);
        let second = route_between(Station::Geneve, Station::Lausanne, 1);

        let mut states = empty_player_states(2);
        *states.get_mut(&PlayerId::One).unwrap() =
            PublicPlayerState::new(0, 0, vec![first]).unwrap();
        *states.get_mut(&PlayerId::Two).unwrap() =
            PublicPlayerState::new(0, 0, vec![second]).unwrap();

        assert_eq!(
            PublicGameState::new(5, card_state(), PlayerId::One, states, None),
            Err(StateError::TwinPairClaimed { first, second })
        );
    }

    #[test]
    fn public_game_state_owns_its_containers() {
        let route = route_between(Station::Berne, Station::Soleure, 0);
        let mut states = empty_player_states(2);
        *states.get_mut(&PlayerId::One).unwrap() =
            PublicPlayerState::new(0, 0, vec![route]).unwrap();

        let state =
            PublicGameState::new(5, card_state(), PlayerId::One, states.clone(), None).unwrap();

        // Wiping the caller's map cannot reach into the constructed state.
        states.clear();
        assert_eq!(state.claimed_routes(), vec![route]);
        assert_eq!(state.player_count(), 2);
    }

    #[test]
    fn public_game_state_aggregates_claims() {
        let first = route_between(Station::Berne, Station::Soleure, 0);
        let second = route_between(Station::Lucerne, Station::Olten, 0);

        let mut states = empty_player_states(2);
        *states.get_mut(&PlayerId::One).unwrap() =
            PublicPlayerState::new(0, 0, vec![first]).unwrap();
        *states.get_mut(&PlayerId::Two).unwrap() =
            PublicPlayerState::new(0, 0, vec![second]).unwrap();

        let state = PublicGameState::new(5, card_state(), PlayerId::One, states, None).unwrap();

        let mut claimed = state.claimed_routes();
        claimed.sort();
        let mut expected = vec![first, second];
        expected.sort();
        assert_eq!(claimed, expected);
    }

    // Tests for `GameState`.

    #[test]
    fn new_game_rejects_bad_player_counts() {
        for player_count in [0, 1, 4, 7] {
            assert_eq!(
                GameState::new(player_count, ChaCha8Rng::seed_from_u64(0)).unwrap_err(),
                StateError::BadPlayerCount(player_count)
            );
        }
    }

    #[test]
    fn new_game_initial_deal() {
        let state = GameState::new(3, ChaCha8Rng::seed_from_u64(9)).unwrap();

        assert_eq!(state.phase(), GamePhase::Starting);
        assert_eq!(state.turn(), None);
        assert_eq!(state.current_player(), PlayerId::One);
        assert_eq!(state.last_player(), None);

        for (_, player) in state.players() {
            let cards: u8 = player.hand().values().sum();
            assert_eq!(cards, NUM_INITIAL_CARDS as u8);
            assert_eq!(player.pending_tickets().len(), NUM_DRAWN_TICKETS);
            assert!(player.tickets().is_empty());
        }

        // 110 cards minus the face-up row and three initial hands.
        let public = state.public_state();
        assert_eq!(public.card_state().deck_size(), 110 - NUM_FACE_UP - 3 * 4);
        assert_eq!(
            state.tickets_count(),
            crate::ticket::ALL_TICKETS.len() - 3 * NUM_DRAWN_TICKETS
        );
    }

    #[test]
    fn new_game_is_deterministic() {
        let first = GameState::new(2, ChaCha8Rng::seed_from_u64(4)).unwrap();
        let second = GameState::new(2, ChaCha8Rng::seed_from_u64(4)).unwrap();

        assert_eq!(first.public_state(), second.public_state());
        for ((_, a), (_, b)) in first.players().zip(second.players()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn public_projection_hides_nothing_it_should_show() {
        let state = GameState::new(2, ChaCha8Rng::seed_from_u64(21)).unwrap();
        let public = state.public_state();

        assert_eq!(public.current_player(), state.current_player());
        assert_eq!(public.tickets_count(), state.tickets_count());
        assert_eq!(public.last_player(), None);

        for (id, player) in state.players() {
            let projected = public.player_state(id).unwrap();
            assert_eq!(projected, &player.public());
        }
    }
}
