//! Profile domain model.
//!
//! A profile is the business card itself: who someone is, a short bio, and
//! where to find them afterwards.

use serde::{Deserialize, Serialize};

use crate::persona::Persona;

/// Social handles printed on a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    pub instagram: String,
    pub linkedin: String,
}

impl Socials {
    pub fn is_empty(&self) -> bool {
        self.instagram.is_empty() && self.linkedin.is_empty()
    }
}

/// A web citation backing a profile found through the directory search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub uri: String,
    pub title: String,
}

/// An AI-generated persona profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Assigned by whoever stores the profile; generators leave it empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub bio: String,
    #[serde(default)]
    pub socials: Socials,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    pub persona: Persona,
    /// Only ever set on placeholder projections.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_loading: bool,
}

impl Profile {
    pub fn new(name: impl Into<String>, bio: impl Into<String>, persona: Persona) -> Self {
        Self {
            id: None,
            name: name.into(),
            bio: bio.into(),
            socials: Socials::default(),
            sources: Vec::new(),
            persona,
            is_loading: false,
        }
    }

    pub fn with_socials(mut self, instagram: impl Into<String>, linkedin: impl Into<String>) -> Self {
        self.socials = Socials {
            instagram: instagram.into(),
            linkedin: linkedin.into(),
        };
        self
    }

    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}
