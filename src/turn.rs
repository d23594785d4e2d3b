use crate::card::CardColor;
use crate::deck::{NUM_DRAWN_TICKETS, NUM_FACE_UP};
use crate::error::Rejection;
use crate::map::{Map, RouteId};
use crate::player::PlayerId;
use crate::state::GameState;
use crate::ticket::Ticket;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A player whose car count falls to this threshold (or below) triggers the
/// final round.
const LAST_TURN_CAR_THRESHOLD: u8 = 2;

/// Minimum tickets to keep out of a mid-game ticket draw.
const MIN_KEPT_TICKETS: usize = 1;
/// Minimum tickets to keep out of the setup-phase options.
const MIN_KEPT_INITIAL_TICKETS: usize = 2;

/// Phases of the game, which act as states in the game's finite-state machine.
///
/// # JSON
/// Phases are serialized in snake_case.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Hands are dealt; players are still choosing their initial tickets.
    Starting,
    /// The main turn-based game.
    Playing,
    /// Someone dropped to two cars or fewer; every other player has exactly
    /// one turn left.
    LastTurn,
    /// No actions can be taken anymore. Time to count points.
    Done,
}

/// Where a drawn transport card comes from.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    /// One of the five visible cards.
    FaceUp(usize),
    /// The top of the face-down pile.
    Blind,
}

/// Which of the drawn tickets a player keeps, index-aligned with the draw.
pub type TicketDecisions = SmallVec<[bool; NUM_DRAWN_TICKETS]>;

/// The turn engine: every method consumes one snapshot by reference and
/// either returns the next state or a [`Rejection`]. A rejected action never
/// touches the receiver, so callers can always fall back to it.
impl GameState {
    /// Settles one player's setup-phase ticket choice.
    ///
    /// At least two of the dealt options must be kept; the rest slides under
    /// the ticket pile. Once every player has chosen, the phase moves to
    /// [`GamePhase::Playing`] and turn 0 begins.
    pub fn choose_initial_tickets(
        &self,
        player_id: PlayerId,
        decisions: &[bool],
    ) -> Result<GameState, Rejection> {
        match self.phase {
            GamePhase::Starting => {}
            GamePhase::Done => return Err(Rejection::GameOver),
            _ => return Err(Rejection::SetupOver),
        }

        let player = self
            .player(player_id)
            .ok_or(Rejection::ForeignPlayer(player_id))?;
        let pending = player.pending_tickets();
        if pending.is_empty() {
            return Err(Rejection::InitialTicketsAlreadyChosen(player_id));
        }
        if decisions.len() != pending.len() {
            return Err(Rejection::TicketDecisionMismatch {
                decided: decisions.len(),
                drawn: pending.len(),
            });
        }

        let kept = decisions.iter().filter(|&&keep| keep).count();
        if kept < MIN_KEPT_INITIAL_TICKETS {
            return Err(Rejection::TooFewTicketsKept {
                kept,
                min: MIN_KEPT_INITIAL_TICKETS,
            });
        }

        let mut next = self.clone();
        let options = next
            .players
            .get_mut(&player_id)
            .map(|player| player.take_pending_tickets())
            .unwrap_or_default();
        let (kept, returned) = split_by_decisions(options, decisions);
        if let Some(player) = next.players.get_mut(&player_id) {
            player.keep_tickets(kept);
        }
        next.dealer.return_tickets(returned);

        if next
            .players
            .values()
            .all(|player| player.pending_tickets().is_empty())
        {
            next.phase = GamePhase::Playing;
            next.turn = Some(0);
        }

        Ok(next)
    }

    /// Draws up to three tickets for the current player and lets the given
    /// chooser — the player driver — decide which to keep.
    ///
    /// At least one must be kept; the rest slides under the pile. Ends the
    /// turn.
    pub fn draw_tickets(
        &self,
        chooser: impl FnOnce(&[Ticket]) -> TicketDecisions,
    ) -> Result<GameState, Rejection> {
        self.require_turn_start()?;
        if !self.can_draw_tickets() {
            return Err(Rejection::TicketPileEmpty);
        }

        let mut next = self.clone();
        let drawn = next.dealer.draw_tickets();
        let decisions = chooser(&drawn);

        if decisions.len() != drawn.len() {
            return Err(Rejection::TicketDecisionMismatch {
                decided: decisions.len(),
                drawn: drawn.len(),
            });
        }
        let kept = decisions.iter().filter(|&&keep| keep).count();
        if kept < MIN_KEPT_TICKETS {
            return Err(Rejection::TooFewTicketsKept {
                kept,
                min: MIN_KEPT_TICKETS,
            });
        }

        let (kept, returned) = split_by_decisions(drawn, &decisions);
        let current = next.current_player;
        if let Some(player) = next.players.get_mut(&current) {
            player.keep_tickets(kept);
        }
        next.dealer.return_tickets(returned);

        next.end_turn();
        Ok(next)
    }

    /// Draws one transport card into the current player's hand.
    ///
    /// Two draws end a turn. A face-up locomotive is only legal as the first
    /// draw and consumes the whole turn. When, after a first draw, no legal
    /// second draw can be supplied anymore, the turn ends early.
    pub fn draw_card(&self, source: DrawSource) -> Result<GameState, Rejection> {
        match self.phase {
            GamePhase::Starting => return Err(Rejection::NotStarted),
            GamePhase::Done => return Err(Rejection::GameOver),
            _ => {}
        }
        let second_draw = self.cards_drawn > 0;

        let mut next = self.clone();
        let card = match source {
            DrawSource::FaceUp(slot) => {
                if slot >= NUM_FACE_UP {
                    return Err(Rejection::FaceUpSlotOutOfBounds(slot));
                }
                let card = next
                    .dealer
                    .peek_face_up(slot)
                    .ok_or(Rejection::FaceUpSlotEmpty(slot))?;
                if second_draw && card.is_locomotive() {
                    return Err(Rejection::LocomotiveOnSecondDraw);
                }

                next.dealer.draw_face_up(slot)?
            }
            DrawSource::Blind => next
                .dealer
                .draw_blind()
                .ok_or(Rejection::CardPilesExhausted)?,
        };

        let current = next.current_player;
        if let Some(player) = next.players.get_mut(&current) {
            player.gain_card(card);
        }

        let whole_turn_card = matches!(source, DrawSource::FaceUp(_)) && card.is_locomotive();
        if whole_turn_card || second_draw || !next.dealer.can_supply_second_draw() {
            next.end_turn();
        } else {
            next.cards_drawn = 1;
        }

        Ok(next)
    }

    /// Claims a route for the current player, paying with the given cards.
    ///
    /// The payment must consist of a single color plus locomotives, summing
    /// to the route's length; for routes without a color requirement the
    /// payment's color is the player's pick. Ends the turn, and fires the
    /// end-game trigger when the claim drops the player to two cars or fewer.
    pub fn claim_route(
        &self,
        route_id: RouteId,
        payment: &[CardColor],
    ) -> Result<GameState, Rejection> {
        self.require_turn_start()?;

        let route = Map::swiss()
            .route(route_id)
            .ok_or(Rejection::UnknownRoute(route_id))?;

        if self.claimer_of(route_id).is_some() {
            return Err(Rejection::RouteAlreadyClaimed(route_id));
        }

        // Parallel routes can be claimed by different players only in games
        // of four or more; a single player can never hold both.
        let twin_claims_allowed = self.player_count() >= 4;
        if let Some(twin) = Map::swiss().twin_of(route_id) {
            match self.claimer_of(twin) {
                Some(claimer) if claimer == self.current_player => {
                    return Err(Rejection::TwinRouteRestricted(route_id));
                }
                Some(_) if !twin_claims_allowed => {
                    return Err(Rejection::TwinRouteRestricted(route_id));
                }
                _ => {}
            }
        }

        let player = match self.player(self.current_player) {
            Some(player) => player,
            None => return Err(Rejection::ForeignPlayer(self.current_player)),
        };
        if player.car_count() < route.length() {
            return Err(Rejection::NotEnoughCars {
                needed: route.length(),
                left: player.car_count(),
            });
        }

        if payment.len() != usize::from(route.length()) {
            return Err(Rejection::PaymentSizeMismatch {
                needed: route.length(),
                offered: payment.len(),
            });
        }

        // All cards in a payment share one color, locomotives aside.
        let mut num_locomotives: u8 = 0;
        let mut colored: Option<(CardColor, u8)> = None;
        for &card in payment {
            if card.is_locomotive() {
                num_locomotives += 1;
                continue;
            }

            colored = match colored {
                Some((color, count)) if color == card => Some((color, count + 1)),
                Some((color, _)) => {
                    return Err(Rejection::MixedPayment {
                        first: color,
                        second: card,
                    });
                }
                None => Some((card, 1)),
            };
        }

        if let (Some(route_color), Some((offered, _))) = (route.color(), colored) {
            if route_color != offered {
                return Err(Rejection::PaymentColorMismatch {
                    route_color,
                    offered,
                });
            }
        }

        if num_locomotives > 0 && player.count_of(CardColor::Locomotive) < num_locomotives {
            return Err(Rejection::CardsNotInHand {
                color: CardColor::Locomotive,
                needed: num_locomotives,
                held: player.count_of(CardColor::Locomotive),
            });
        }
        if let Some((color, count)) = colored {
            if player.count_of(color) < count {
                return Err(Rejection::CardsNotInHand {
                    color,
                    needed: count,
                    held: player.count_of(color),
                });
            }
        }

        // Due diligence is done; the claim goes through.
        let mut next = self.clone();
        let current = next.current_player;
        if let Some(player) = next.players.get_mut(&current) {
            if num_locomotives > 0 {
                player.spend_cards(CardColor::Locomotive, num_locomotives);
            }
            if let Some((color, count)) = colored {
                player.spend_cards(color, count);
            }
            player.claim(route_id);
        }
        next.dealer.discard(payment.iter().copied());

        // End-game trigger: first player to fall to the car threshold fixes
        // the final round.
        let cars_left = next
            .player(current)
            .map_or(crate::player::NUM_OF_CARS, |player| player.car_count());
        if cars_left <= LAST_TURN_CAR_THRESHOLD && next.last_player.is_none() {
            next.last_player = Some(current);
            next.phase = GamePhase::LastTurn;
        }

        next.end_turn();
        Ok(next)
    }

    /// Whether an action that must open a turn is currently legal.
    fn require_turn_start(&self) -> Result<(), Rejection> {
        match self.phase {
            GamePhase::Starting => Err(Rejection::NotStarted),
            GamePhase::Done => Err(Rejection::GameOver),
            _ if self.cards_drawn > 0 => Err(Rejection::CardDrawInProgress),
            _ => Ok(()),
        }
    }

    fn claimer_of(&self, route: RouteId) -> Option<PlayerId> {
        self.players
            .iter()
            .find_map(|(&id, player)| player.routes().contains(&route).then_some(id))
    }

    /// Hands the turn to the next player; closes the game instead when the
    /// final round comes back around to the trigger player.
    fn end_turn(&mut self) {
        self.cards_drawn = 0;

        let next_player = self.current_player.next(self.player_count());
        if self.phase == GamePhase::LastTurn && Some(next_player) == self.last_player {
            self.phase = GamePhase::Done;
        }

        self.current_player = next_player;
        self.turn = self.turn.map(|turn| turn + 1);
    }
}

fn split_by_decisions(
    tickets: SmallVec<[Ticket; NUM_DRAWN_TICKETS]>,
    decisions: &[bool],
) -> (Vec<Ticket>, Vec<Ticket>) {
    let mut kept = Vec::new();
    let mut returned = Vec::new();

    for (ticket, &keep) in tickets.into_iter().zip(decisions) {
        if keep {
            kept.push(ticket);
        } else {
            returned.push(ticket);
        }
    }

    (kept, returned)
}
