//! Offline profile generator.
//!
//! Builds profiles from canned name and bio pools so the app works without an
//! API key. The directory search only knows a handful of fest regulars.

use async_trait::async_trait;
use festcard_core::{Persona, Profile, ProfileGenerator, Result, Source};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Mutex;

struct DirectoryEntry {
    name: &'static str,
    bio: &'static str,
    instagram: &'static str,
    linkedin: &'static str,
    source_title: &'static str,
}

const DIRECTORY: &[DirectoryEntry] = &[
    DirectoryEntry {
        name: "DJ Nova",
        bio: "Headlining DJ known for sunrise techno sets on the main stage.",
        instagram: "@djnova",
        linkedin: "in/dj-nova",
        source_title: "DJ Nova - Festival lineup",
    },
    DirectoryEntry {
        name: "Luna Park Collective",
        bio: "Indie-pop band that started in a campus practice room and now tours nationally.",
        instagram: "@lunaparkcollective",
        linkedin: "",
        source_title: "Luna Park Collective - Band page",
    },
    DirectoryEntry {
        name: "Prof. Kenji Arata",
        bio: "Media-art professor whose light installations frame the festival gates.",
        instagram: "@arata.lightworks",
        linkedin: "in/kenji-arata",
        source_title: "Kenji Arata - Faculty profile",
    },
];

fn first_names(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Socialite => &["Mika", "Sora", "Bianca", "Leo", "Hana"],
        Persona::Artist => &["Rin", "Aurelio", "Juno", "Tamsin", "Kai"],
        Persona::Techie => &["Jun", "Priya", "Ada", "Tomas", "Noor"],
        Persona::Organizer => &["Yui", "Marcus", "Elif", "Grace", "Daichi"],
        Persona::Celebrity => &["Nova", "Vega", "Orion"],
    }
}

fn bios(persona: Persona) -> &'static [&'static str] {
    match persona {
        Persona::Socialite => &[
            "I know someone at every stage. Find me near the food trucks.",
            "Here for the crowd as much as the music. Say hi!",
            "Collecting friends and glow sticks in equal measure.",
        ],
        Persona::Artist => &[
            "Sketching the crowd between sets. Ask to see the zine.",
            "Sound designer chasing the perfect bassline.",
            "Painting the backdrop for tomorrow's closing act.",
        ],
        Persona::Techie => &[
            "Built the festival's lost-and-found bot. Ask me about NFC.",
            "Running a mesh network from my backpack this weekend.",
            "Hardware hacker, synth tinkerer, occasional dancer.",
        ],
        Persona::Organizer => &[
            "Volunteer lead for stage B. If it runs late, blame me.",
            "Keeping the schedule, the water stations and the vibes on track.",
            "Ask me where anything is. I probably set it up.",
        ],
        Persona::Celebrity => &["A familiar face from the lineup poster."],
    }
}

/// Canned-profile generator with an optional fixed seed.
pub struct OfflineProfileGenerator {
    rng: Mutex<StdRng>,
}

impl OfflineProfileGenerator {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic output for a given seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn pick(&self, persona: Persona) -> (&'static str, &'static str) {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let name = first_names(persona).choose(&mut *rng).copied().unwrap_or("Guest");
        let bio = bios(persona).choose(&mut *rng).copied().unwrap_or_default();
        (name, bio)
    }
}

impl Default for OfflineProfileGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn handle(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[async_trait]
impl ProfileGenerator for OfflineProfileGenerator {
    async fn generate_persona_profile(&self, persona: Persona) -> Result<Profile> {
        let (name, bio) = self.pick(persona);
        let slug = format!("{}.{}", handle(name), persona.as_ref().to_lowercase());
        Ok(Profile::new(name, bio, persona)
            .with_socials(format!("@{slug}"), format!("in/{}", slug.replace('.', "-"))))
    }

    async fn search_public_profile(&self, query: &str) -> Result<Option<Profile>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(None);
        }
        let found = DIRECTORY
            .iter()
            .find(|entry| entry.name.to_lowercase().contains(&needle));
        Ok(found.map(|entry| {
            Profile::new(entry.name, entry.bio, Persona::Celebrity)
                .with_socials(entry.instagram, entry.linkedin)
                .with_sources(vec![Source {
                    uri: format!("https://festcard.invalid/directory/{}", handle(entry.name)),
                    title: entry.source_title.to_string(),
                }])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generated_profile_matches_persona() {
        let generator = OfflineProfileGenerator::with_seed(1);
        for persona in Persona::SELECTABLE {
            let profile = generator.generate_persona_profile(persona).await.unwrap();
            assert_eq!(profile.persona, persona);
            assert!(profile.id.is_none());
            assert!(!profile.is_loading);
            assert!(profile.socials.instagram.starts_with('@'));
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_output() {
        let a = OfflineProfileGenerator::with_seed(42);
        let b = OfflineProfileGenerator::with_seed(42);
        assert_eq!(
            a.generate_persona_profile(Persona::Artist).await.unwrap(),
            b.generate_persona_profile(Persona::Artist).await.unwrap()
        );
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_substring() {
        let generator = OfflineProfileGenerator::with_seed(0);
        let found = generator.search_public_profile("dj nova").await.unwrap().unwrap();
        assert_eq!(found.name, "DJ Nova");
        assert_eq!(found.persona, Persona::Celebrity);
        assert_eq!(found.sources.len(), 1);

        assert!(generator.search_public_profile("nonexistent").await.unwrap().is_none());
        assert!(generator.search_public_profile("   ").await.unwrap().is_none());
    }

    #[test]
    fn test_handle_strips_punctuation() {
        assert_eq!(handle("Prof. Kenji Arata"), "profkenjiarata");
    }
}
