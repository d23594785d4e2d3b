use crate::card::CardColor;
use crate::error::Rejection;
use crate::ticket::{Ticket, ALL_TICKETS};

use array_init::array_init;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::VecDeque;
use std::iter::repeat;
use strum::IntoEnumIterator;

/// Number of always-visible transport cards.
pub const NUM_FACE_UP: usize = 5;
/// Number of tickets offered per ticket draw.
pub const NUM_DRAWN_TICKETS: usize = 3;
pub(crate) const NUM_INITIAL_CARDS: usize = 4;

const CARDS_PER_COLOR: usize = 12;
const NUM_LOCOMOTIVES: usize = 14;

/// What everyone can see of the transport card decks: the face-up row and
/// the sizes of the two hidden piles.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct PublicCardState {
    face_up: [Option<CardColor>; NUM_FACE_UP],
    deck_size: usize,
    discard_size: usize,
}

impl PublicCardState {
    pub fn new(
        face_up: [Option<CardColor>; NUM_FACE_UP],
        deck_size: usize,
        discard_size: usize,
    ) -> Self {
        Self {
            face_up,
            deck_size,
            discard_size,
        }
    }

    /// The face-up row. Empty slots only occur once the piles cannot refill
    /// them anymore.
    #[inline]
    pub fn face_up(&self) -> &[Option<CardColor>; NUM_FACE_UP] {
        &self.face_up
    }

    /// The card in a given face-up slot, if the slot exists and is filled.
    pub fn face_up_card(&self, slot: usize) -> Option<CardColor> {
        self.face_up.get(slot).copied().flatten()
    }

    /// How many cards lie face-down in the draw pile.
    #[inline]
    pub fn deck_size(&self) -> usize {
        self.deck_size
    }

    /// How many cards lie in the discard pile.
    #[inline]
    pub fn discard_size(&self) -> usize {
        self.discard_size
    }

    /// Whether at least one more card can be drawn from the piles.
    #[inline]
    pub fn can_draw_cards(&self) -> bool {
        self.deck_size + self.discard_size >= 1
    }
}

/// Entity in charge of dealing and shuffling transport cards and tickets.
///
/// The random source is injected at construction and only ever advanced by
/// shuffles: two dealers built from the same seed and driven through the same
/// operations hold identical piles at every step.
#[derive(Clone, Debug, PartialEq)]
pub struct CardDealer {
    face_up: [Option<CardColor>; NUM_FACE_UP],
    draw_pile: Vec<CardColor>,
    discard_pile: Vec<CardColor>,
    ticket_pile: VecDeque<Ticket>,
    rng: ChaCha8Rng,
}

impl CardDealer {
    /// Creates a new `CardDealer` with both decks shuffled and the face-up
    /// row filled.
    ///
    /// # Example
    /// ```
    /// use alpine_rails::deck::CardDealer;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let dealer = CardDealer::new(ChaCha8Rng::seed_from_u64(17));
    /// assert!(dealer.can_draw_cards());
    /// ```
    pub fn new(mut rng: ChaCha8Rng) -> Self {
        let mut draw_pile = Vec::with_capacity(110);
        for color in CardColor::iter() {
            let copies = if color.is_locomotive() {
                NUM_LOCOMOTIVES
            } else {
                CARDS_PER_COLOR
            };
            draw_pile.extend(repeat(color).take(copies));
        }
        draw_pile.shuffle(&mut rng);

        let mut ticket_pile: Vec<Ticket> = ALL_TICKETS.clone();
        ticket_pile.shuffle(&mut rng);

        let face_up = array_init(|_| draw_pile.pop());

        Self {
            face_up,
            draw_pile,
            discard_pile: Vec::new(),
            ticket_pile: VecDeque::from(ticket_pile),
            rng,
        }
    }

    /// Pops the draw pile, turning the discard pile over first when the draw
    /// pile is exhausted. `None` means both piles are empty.
    fn draw_from_pile(&mut self) -> Option<CardColor> {
        if self.draw_pile.is_empty() && !self.discard_pile.is_empty() {
            self.discard_pile.shuffle(&mut self.rng);
            std::mem::swap(&mut self.draw_pile, &mut self.discard_pile);
        }

        self.draw_pile.pop()
    }

    /// Draws the top of the face-down pile.
    ///
    /// Returns `None` once both the draw pile and the discard pile are empty.
    /// That is a reportable condition, not an error: the game goes on.
    pub fn draw_blind(&mut self) -> Option<CardColor> {
        self.draw_from_pile()
    }

    /// Draws the card in the given face-up slot, and refills the slot from
    /// the face-down pile. An unfillable slot is left empty.
    pub fn draw_face_up(&mut self, slot: usize) -> Result<CardColor, Rejection> {
        if slot >= NUM_FACE_UP {
            return Err(Rejection::FaceUpSlotOutOfBounds(slot));
        }

        let card = self.face_up[slot]
            .take()
            .ok_or(Rejection::FaceUpSlotEmpty(slot))?;
        self.face_up[slot] = self.draw_from_pile();

        Ok(card)
    }

    /// The card in a given face-up slot, without drawing it.
    pub fn peek_face_up(&self, slot: usize) -> Option<CardColor> {
        self.face_up.get(slot).copied().flatten()
    }

    /// Adds the given transport cards to the discard pile.
    ///
    /// Insertion order does not matter; the pile is shuffled before reuse.
    pub fn discard(&mut self, cards: impl IntoIterator<Item = CardColor>) {
        self.discard_pile.extend(cards);
    }

    /// Whether a draw from the piles can still produce a card.
    #[inline]
    pub fn can_draw_cards(&self) -> bool {
        self.draw_pile.len() + self.discard_pile.len() >= 1
    }

    /// Whether a player who just drew one card can legally draw another.
    ///
    /// The second draw must be either a blind card or a face-up card that is
    /// not a locomotive; when neither exists the turn cannot continue.
    pub fn can_supply_second_draw(&self) -> bool {
        self.can_draw_cards()
            || self
                .face_up
                .iter()
                .flatten()
                .any(CardColor::is_not_locomotive)
    }

    /// How many tickets remain in the ticket pile.
    #[inline]
    pub fn tickets_count(&self) -> usize {
        self.ticket_pile.len()
    }

    /// Draws up to [`NUM_DRAWN_TICKETS`] tickets from the top of the pile.
    /// Fewer come back when the pile holds less.
    pub fn draw_tickets(&mut self) -> SmallVec<[Ticket; NUM_DRAWN_TICKETS]> {
        let mut drawn = SmallVec::new();

        for _ in 0..NUM_DRAWN_TICKETS {
            match self.ticket_pile.pop_back() {
                Some(ticket) => drawn.push(ticket),
                None => break,
            }
        }

        drawn
    }

    /// Slides unkept tickets under the pile.
    pub fn return_tickets(&mut self, tickets: impl IntoIterator<Item = Ticket>) {
        for ticket in tickets {
            self.ticket_pile.push_front(ticket);
        }
    }

    /// The public projection of the decks.
    pub fn public_state(&self) -> PublicCardState {
        PublicCardState {
            face_up: self.face_up,
            deck_size: self.draw_pile.len(),
            discard_size: self.discard_pile.len(),
        }
    }

    /// Mutable accessor to the face-up row.
    ///
    /// Should only be used for testing!
    pub fn get_mut_face_up(&mut self) -> &mut [Option<CardColor>; NUM_FACE_UP] {
        &mut self.face_up
    }

    /// Mutable accessor to the draw pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_draw_pile(&mut self) -> &mut Vec<CardColor> {
        &mut self.draw_pile
    }

    /// Accessor to the discard pile.
    ///
    /// Should only be used for testing!
    pub fn get_discard_pile(&self) -> &Vec<CardColor> {
        &self.discard_pile
    }

    /// Mutable accessor to the discard pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_discard_pile(&mut self) -> &mut Vec<CardColor> {
        &mut self.discard_pile
    }

    /// Mutable accessor to the ticket pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_ticket_pile(&mut self) -> &mut VecDeque<Ticket> {
        &mut self.ticket_pile
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::station::Station;

    use rand::SeedableRng;
    use std::collections::HashMap;

    fn dealer(seed: u64) -> CardDealer {
        CardDealer::new(ChaCha8Rng::seed_from_u64(seed))
    }

    fn count_all_cards(dealer: &CardDealer) -> HashMap<CardColor, usize> {
        let mut counts = HashMap::new();

        for card in dealer.face_up.iter().flatten() {
            *counts.entry(*card).or_insert(0) += 1;
        }
        for pile in [&dealer.draw_pile, &dealer.discard_pile] {
            for card in pile {
                *counts.entry(*card).or_insert(0) += 1;
            }
        }

        counts
    }

    #[test]
    fn new_dealer_composition() {
        let dealer = dealer(1);

        assert!(dealer.face_up.iter().all(Option::is_some));
        // 110 cards total, minus the 5 face-up ones.
        assert_eq!(dealer.draw_pile.len(), 105);
        assert!(dealer.discard_pile.is_empty());
        assert_eq!(dealer.tickets_count(), ALL_TICKETS.len());

        let counts = count_all_cards(&dealer);
        for color in CardColor::iter() {
            let expected = if color.is_locomotive() { 14 } else { 12 };
            assert_eq!(counts[&color], expected, "wrong count for {}", color);
        }
    }

    #[test]
    fn same_seed_same_piles() {
        let first = dealer(42);
        let second = dealer(42);

        assert_eq!(first.draw_pile, second.draw_pile);
        assert_eq!(first.face_up, second.face_up);
        assert_eq!(first.ticket_pile, second.ticket_pile);
    }

    #[test]
    fn same_seed_same_draw_sequence() {
        let mut first = dealer(42);
        let mut second = dealer(42);

        for _ in 0..110 {
            assert_eq!(first.draw_blind(), second.draw_blind());
        }
    }

    #[test]
    fn different_seeds_different_piles() {
        let first = dealer(1);
        let second = dealer(2);

        assert_ne!(first.draw_pile, second.draw_pile);
    }

    #[test]
    fn draw_blind_until_exhaustion() {
        let mut dealer = dealer(7);
        dealer.draw_pile = vec![CardColor::Blue];
        dealer.discard_pile = vec![CardColor::Red];

        assert_eq!(dealer.draw_blind(), Some(CardColor::Blue));
        // The discard pile becomes the new draw pile.
        assert_eq!(dealer.draw_blind(), Some(CardColor::Red));
        assert!(dealer.discard_pile.is_empty());
        assert_eq!(dealer.draw_blind(), None);
        assert_eq!(dealer.can_draw_cards(), false);
    }

    #[test]
    fn reshuffle_conserves_cards() {
        let mut dealer = dealer(7);
        dealer.draw_pile.clear();
        dealer.discard_pile.clear();
        dealer.face_up = [None; NUM_FACE_UP];

        let discarded = vec![CardColor::Green, CardColor::Green, CardColor::Locomotive];
        dealer.discard(discarded.clone());

        let mut drawn = Vec::new();
        for _ in 0..discarded.len() + 1 {
            if let Some(card) = dealer.draw_blind() {
                drawn.push(card);
            }
        }

        // One more draw than cards available: nothing lost, nothing invented.
        assert_eq!(drawn.len(), discarded.len());
        drawn.sort_by_key(|card| format!("{card}"));
        let mut expected = discarded;
        expected.sort_by_key(|card| format!("{card}"));
        assert_eq!(drawn, expected);
    }

    #[test]
    fn draw_face_up_refills_slot() {
        let mut dealer = dealer(3);
        dealer.face_up[2] = Some(CardColor::Orange);
        let replacement = *dealer.draw_pile.last().unwrap();

        assert_eq!(dealer.draw_face_up(2), Ok(CardColor::Orange));
        assert_eq!(dealer.face_up[2], Some(replacement));
    }

    #[test]
    fn draw_face_up_out_of_bounds() {
        let mut dealer = dealer(3);

        assert_eq!(
            dealer.draw_face_up(NUM_FACE_UP),
            Err(Rejection::FaceUpSlotOutOfBounds(NUM_FACE_UP))
        );
    }

    #[test]
    fn draw_face_up_from_empty_slot() {
        let mut dealer = dealer(3);
        dealer.face_up[4] = None;

        assert_eq!(dealer.draw_face_up(4), Err(Rejection::FaceUpSlotEmpty(4)));
    }

    #[test]
    fn draw_face_up_with_exhausted_piles_empties_slot() {
        let mut dealer = dealer(3);
        dealer.draw_pile.clear();
        dealer.discard_pile.clear();
        dealer.face_up[0] = Some(CardColor::White);

        assert_eq!(dealer.draw_face_up(0), Ok(CardColor::White));
        assert_eq!(dealer.face_up[0], None);
    }

    #[test]
    fn second_draw_supply() {
        let mut dealer = dealer(3);
        dealer.draw_pile.clear();
        dealer.discard_pile.clear();
        dealer.face_up = [
            Some(CardColor::Locomotive),
            None,
            None,
            None,
            Some(CardColor::Red),
        ];
        assert!(dealer.can_supply_second_draw());

        // Only locomotives left face-up, nothing in the piles.
        dealer.face_up[4] = None;
        assert_eq!(dealer.can_supply_second_draw(), false);
    }

    #[test]
    fn ticket_draw_and_return() {
        let mut dealer = dealer(11);
        dealer.ticket_pile = VecDeque::from(vec![
            Ticket::between(Station::Berne, Station::Coire, 10),
            Ticket::between(Station::Bale, Station::Berne, 5),
        ]);

        let drawn = dealer.draw_tickets();
        // Fewer than three tickets left: the draw returns what is there.
        assert_eq!(drawn.len(), 2);
        assert_eq!(dealer.tickets_count(), 0);

        dealer.return_tickets(drawn.into_iter().take(1));
        assert_eq!(dealer.tickets_count(), 1);
        assert_eq!(
            dealer.ticket_pile[0],
            Ticket::between(Station::Bale, Station::Berne, 5)
        );
    }

    #[test]
    fn public_state_mirrors_piles() {
        let mut dealer = dealer(5);
        dealer.discard(vec![CardColor::Red, CardColor::Blue]);

        let state = dealer.public_state();
        assert_eq!(state.face_up(), &dealer.face_up);
        assert_eq!(state.deck_size(), 105);
        assert_eq!(state.discard_size(), 2);
        assert!(state.can_draw_cards());
        assert_eq!(state.face_up_card(0), dealer.face_up[0]);
        assert_eq!(state.face_up_card(9), None);
    }
}
