//! Persona domain model.
//!
//! A persona is the "vibe" an attendee presents at the fest. Four of them can be
//! picked by users; `Celebrity` is reserved for public figures found through
//! the directory search.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{FestcardError, Result};

/// Closed set of persona tags carried by every profile.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Persona {
    #[default]
    Socialite,
    Artist,
    Techie,
    Organizer,
    Celebrity,
}

impl Persona {
    /// Personas a user may pick for themselves, in display order.
    pub const SELECTABLE: [Persona; 4] = [
        Persona::Socialite,
        Persona::Artist,
        Persona::Techie,
        Persona::Organizer,
    ];

    /// Whether a user may choose this persona.
    pub fn is_selectable(self) -> bool {
        self != Persona::Celebrity
    }

    /// One-line blurb shown next to the persona picker.
    pub fn description(self) -> &'static str {
        match self {
            Persona::Socialite => "The life of the party, always meeting new people.",
            Persona::Artist => "A creative soul, here for the music and inspiration.",
            Persona::Techie => "Networking and talking about the latest cool tech.",
            Persona::Organizer => "The one making sure everything runs smoothly.",
            Persona::Celebrity => "A public figure spotted at the fest.",
        }
    }

    /// Returns `self` if it is selectable, otherwise `InvalidPersona`.
    pub fn ensure_selectable(self) -> Result<Self> {
        if self.is_selectable() {
            Ok(self)
        } else {
            Err(FestcardError::InvalidPersona(self.to_string()))
        }
    }

    /// Picks a selectable persona uniformly at random.
    pub fn random_selectable<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::SELECTABLE
            .choose(rng)
            .unwrap_or(&Persona::Socialite)
    }
}
