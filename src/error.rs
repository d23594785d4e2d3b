use crate::card::CardColor;
use crate::map::RouteId;
use crate::player::PlayerId;

use thiserror::Error;

/// Contract violations caught while assembling state by hand.
///
/// These are programmer errors: they are surfaced synchronously at
/// construction and never repaired.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum StateError {
    #[error("a game needs 2 or 3 players, got a roster of {0}")]
    BadPlayerCount(usize),
    #[error("the player state map has no entry for {0}")]
    MissingPlayer(PlayerId),
    #[error("{0} is not part of the roster")]
    UnknownPlayer(PlayerId),
    #[error("claimed route {0} is not in the catalog")]
    UnknownRoute(RouteId),
    #[error("route {0} appears in more than one claimed list")]
    DuplicateClaim(RouteId),
    #[error("routes {first} and {second} are twins; both claimed below 4 players")]
    TwinPairClaimed { first: RouteId, second: RouteId },
    #[error("claimed routes total {total} cars, above the {allotment} allotment")]
    CarAllotmentExceeded { total: u32, allotment: u32 },
}

/// Why an action was turned down.
///
/// Rejections are expected outcomes of normal play: the engine reports the
/// specific cause and leaves the prior state untouched. Whether to retry is
/// the caller's decision.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Rejection {
    #[error("the game has not started yet")]
    NotStarted,
    #[error("the game is over")]
    GameOver,
    #[error("initial tickets can only be chosen during setup")]
    SetupOver,
    #[error("{0} already chose their initial tickets")]
    InitialTicketsAlreadyChosen(PlayerId),
    #[error("{0} is not in this game")]
    ForeignPlayer(PlayerId),
    #[error("a card draw is in progress; only a second card draw may follow")]
    CardDrawInProgress,
    #[error("the ticket pile is empty")]
    TicketPileEmpty,
    #[error("{decided} ticket decisions submitted, but {drawn} tickets were drawn")]
    TicketDecisionMismatch { decided: usize, drawn: usize },
    #[error("kept {kept} tickets, but at least {min} must be kept")]
    TooFewTicketsKept { kept: usize, min: usize },
    #[error("face-up slot {0} is out of bounds")]
    FaceUpSlotOutOfBounds(usize),
    #[error("face-up slot {0} holds no card")]
    FaceUpSlotEmpty(usize),
    #[error("a face-up locomotive cannot be taken as a second draw")]
    LocomotiveOnSecondDraw,
    #[error("both card piles are exhausted")]
    CardPilesExhausted,
    #[error("route {0} does not exist")]
    UnknownRoute(RouteId),
    #[error("the route {0} is already claimed")]
    RouteAlreadyClaimed(RouteId),
    #[error("the twin of route {0} is already claimed")]
    TwinRouteRestricted(RouteId),
    #[error("route needs {needed} cars, only {left} left")]
    NotEnoughCars { needed: u8, left: u8 },
    #[error("route needs {needed} cards, {offered} were offered")]
    PaymentSizeMismatch { needed: u8, offered: usize },
    #[error("payment mixes {first} and {second} cards")]
    MixedPayment { first: CardColor, second: CardColor },
    #[error("a {route_color} route cannot be paid with {offered} cards")]
    PaymentColorMismatch {
        route_color: CardColor,
        offered: CardColor,
    },
    #[error("payment needs {needed} {color} cards, the hand holds {held}")]
    CardsNotInHand {
        color: CardColor,
        needed: u8,
        held: u8,
    },
}
