//! Terminal rendering of cards.

use colored::Colorize;
use festcard_core::user::Afterparty;
use festcard_core::{Connection, Profile};

/// Multi-line card for a profile.
pub fn card(profile: &Profile) -> String {
    let mut out = format!(
        "{} {}\n  {}",
        profile.name.bold(),
        format!("[{}]", profile.persona).cyan(),
        profile.bio
    );
    if !profile.socials.instagram.is_empty() {
        out.push_str(&format!("\n  instagram: {}", profile.socials.instagram));
    }
    if !profile.socials.linkedin.is_empty() {
        out.push_str(&format!("\n  linkedin:  {}", profile.socials.linkedin));
    }
    for source in &profile.sources {
        out.push_str(&format!("\n  source:    {} <{}>", source.title, source.uri.dimmed()));
    }
    out
}

/// One connection entry, styled by state.
pub fn connection(entry: &Connection) -> String {
    let shown = entry.display_profile();
    match entry {
        Connection::Pending { .. } => format!(
            "{} {}\n  {}",
            shown.name.yellow(),
            format!("({})", entry.id()).dimmed(),
            shown.bio.dimmed()
        ),
        Connection::Failed { .. } => format!(
            "{} {}\n  {}",
            shown.name.red(),
            format!("({})", entry.id()).dimmed(),
            shown.bio
        ),
        Connection::Resolved { profile, .. } => card(profile),
    }
}

pub fn afterparty(digest: &Afterparty<'_>) -> String {
    let mut out = format!("{}\n", "Afterparty".bold().magenta());
    if digest.cards.is_empty() {
        out.push_str("  No cards yet. Go tap someone!\n");
    } else {
        out.push_str(&format!("  {} cards collected\n", digest.cards.len()));
        for (persona, count) in &digest.by_persona {
            out.push_str(&format!("  {persona:<10} {count}\n"));
        }
        out.push_str(&format!("\n  {}\n", "Follow up with:".bold()));
        for card in &digest.cards {
            let handle = if card.socials.instagram.is_empty() {
                card.socials.linkedin.as_str()
            } else {
                card.socials.instagram.as_str()
            };
            out.push_str(&format!("  - {} {}\n", card.name, handle.dimmed()));
        }
    }
    if digest.pending > 0 {
        out.push_str(&format!("  {} still connecting\n", digest.pending));
    }
    if digest.failed > 0 {
        out.push_str(&format!("  {} failed taps\n", digest.failed));
    }
    out
}
