use anyhow::{Context, Result};
use colored::Colorize;
use festcard_application::FestSession;
use festcard_core::FestcardError;
use festcard_core::connection::PENDING_BIO;

use super::render;

pub async fn tap(session: &FestSession) -> Result<()> {
    println!("{}", PENDING_BIO.dimmed());
    let entry = session
        .add_simulated_connection()
        .await
        .context("Tap failed")?;
    if entry.is_failed() {
        println!("{}", "The tap did not go through.".red());
    } else {
        println!("{}", "New connection!".green().bold());
    }
    println!("\n{}", render::connection(&entry));
    Ok(())
}

pub async fn search(session: &FestSession, query: &str) -> Result<()> {
    if session
        .search_and_add_connection(query)
        .await
        .context("Search failed")?
    {
        let user = session.current_user().await.ok_or(FestcardError::NotLoggedIn)?;
        if let Some(entry) = user.connections.first() {
            println!("{}", "Added to your connections:".green().bold());
            println!("\n{}", render::connection(entry));
        }
    } else {
        println!("Nobody found for \"{query}\".");
    }
    Ok(())
}

pub async fn list(session: &FestSession, json: bool) -> Result<()> {
    let user = session.current_user().await.ok_or(FestcardError::NotLoggedIn)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&user.connections)?);
        return Ok(());
    }
    if user.connections.is_empty() {
        println!("No connections yet. Try `festcard tap`.");
        return Ok(());
    }
    for entry in &user.connections {
        println!("{}\n", render::connection(entry));
    }
    Ok(())
}

pub async fn afterparty(session: &FestSession) -> Result<()> {
    let user = session.current_user().await.ok_or(FestcardError::NotLoggedIn)?;
    print!("{}", render::afterparty(&user.afterparty()));
    Ok(())
}
