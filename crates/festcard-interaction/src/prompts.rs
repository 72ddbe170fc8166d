//! Prompt templates for profile generation.

use festcard_core::{FestcardError, Persona, Result};
use minijinja::{Environment, context};

pub const NOT_FOUND_MARKER: &str = "NOT_FOUND";

const SYSTEM_INSTRUCTION: &str = "You write short, upbeat digital business cards for attendees of a \
university music festival. Never include real phone numbers, addresses or other private data.";

const PERSONA_TEMPLATE: &str = r#"Create a fictional festival attendee profile.

Persona: {{ persona }} ({{ description }})

Requirements:
{% for req in requirements -%}
- {{ req }}
{% endfor %}
Output a JSON object with "name", "bio" and "socials" ("instagram", "linkedin")."#;

const SEARCH_TEMPLATE: &str = r#"Search the web for a public figure matching: "{{ query }}".

If you find one, output ONLY a JSON object:
{"name": "...", "bio": "...", "socials": {"instagram": "...", "linkedin": "..."}}
The bio is one or two sentences about who they are and why someone would meet them at a festival.
Use empty strings for socials you cannot verify.

If nobody plausible matches, output exactly {{ not_found }} and nothing else."#;

pub fn system_instruction() -> &'static str {
    SYSTEM_INSTRUCTION
}

/// Renders the persona generation prompt.
pub fn persona_prompt(persona: Persona) -> Result<String> {
    let requirements = [
        "A believable first name and optional stage name",
        "A bio of at most two sentences, written in the first person",
        "Instagram handle starting with @, LinkedIn as a profile path",
        "Tone that fits the persona",
    ];
    Environment::new()
        .render_str(
            PERSONA_TEMPLATE,
            context! {
                persona => persona.to_string(),
                description => persona.description(),
                requirements => requirements,
            },
        )
        .map_err(|e| FestcardError::internal(format!("failed to render persona prompt: {e}")))
}

/// Renders the directory search prompt.
pub fn search_prompt(query: &str) -> Result<String> {
    Environment::new()
        .render_str(
            SEARCH_TEMPLATE,
            context! {
                query => query,
                not_found => NOT_FOUND_MARKER,
            },
        )
        .map_err(|e| FestcardError::internal(format!("failed to render search prompt: {e}")))
}
