use anyhow::{Context, Result};
use colored::Colorize;
use festcard_application::FestSession;

use super::render;

pub async fn register(session: &FestSession, username: &str, password: Option<&str>) -> Result<()> {
    let user = session
        .register(username, password)
        .await
        .context("Registration failed")?;
    println!("Welcome, {}!", user.username.bold());
    println!(
        "You are presenting as {}. Run `festcard persona <name>` to get your card.",
        user.selected_persona()
    );
    Ok(())
}

pub async fn login(session: &FestSession, username: &str, password: Option<&str>) -> Result<()> {
    let user = session
        .login(username, password)
        .await
        .context("Login failed")?;
    println!(
        "Signed in as {} ({} connections)",
        user.username.bold(),
        user.connections.len()
    );
    Ok(())
}

pub async fn logout(session: &FestSession) -> Result<()> {
    session.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(session: &FestSession) -> Result<()> {
    let Some(user) = session.current_user().await else {
        println!("Not signed in.");
        return Ok(());
    };
    println!("{} as {}", user.username.bold(), user.selected_persona());
    match &user.profile {
        Some(profile) => println!("\n{}", render::card(profile)),
        None => println!("No card yet. Run `festcard persona` to fetch one."),
    }
    Ok(())
}
