use anyhow::{Context, Result, anyhow};
use colored::Colorize;
use festcard_application::FestSession;
use festcard_core::Persona;

use super::render;

pub async fn list(session: &FestSession) -> Result<()> {
    let current = session.current_user().await.map(|u| u.selected_persona());
    for persona in Persona::SELECTABLE {
        let marker = if Some(persona) == current { "*" } else { " " };
        println!(
            "{} {:<10} {}",
            marker.green(),
            persona.to_string().bold(),
            persona.description()
        );
    }
    Ok(())
}

pub async fn select(session: &FestSession, name: Option<&str>) -> Result<()> {
    let profile = match name {
        Some(name) => {
            let persona: Persona = name
                .parse()
                .map_err(|_| anyhow!("Unknown persona '{name}'. Run `festcard personas` for the list."))?;
            println!("Switching to {persona}...");
            session.select_persona(persona).await
        }
        None => session.refresh_profile().await,
    }
    .context("Could not fetch a new card")?;

    println!("\n{}", render::card(&profile));
    Ok(())
}
