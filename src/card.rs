use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Represents the different variants of transport cards.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardColor {
    Black,
    Violet,
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
    White,
    /// The wildcard transport card.
    /// It matches with any color when paying for a route.
    Locomotive,
}

impl CardColor {
    /// Whether the current card is the locomotive, i.e. matches with any color.
    ///
    /// # Examples:
    /// ```
    /// use alpine_rails::card::CardColor;
    ///
    /// let color = CardColor::Black;
    /// assert!(!color.is_locomotive());
    ///
    /// let wildcard = CardColor::Locomotive;
    /// assert!(wildcard.is_locomotive());
    /// ```
    #[inline]
    pub fn is_locomotive(&self) -> bool {
        *self == CardColor::Locomotive
    }

    /// The opposite of `is_locomotive`.
    #[inline]
    pub fn is_not_locomotive(&self) -> bool {
        !self.is_locomotive()
    }
}
