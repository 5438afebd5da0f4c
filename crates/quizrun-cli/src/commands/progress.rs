//! The `quizrun progress` command.

use std::path::PathBuf;

use anyhow::Result;

use super::open_app;

pub fn execute(reset: bool, config_path: Option<PathBuf>) -> Result<()> {
    let (_, mut app) = open_app(config_path.as_deref())?;

    if reset {
        app.reset_progress()?;
        println!("Progress reset.");
        return Ok(());
    }

    let progress = app.progress();
    println!("Stars: {}", progress.stars());

    let badges = progress.badges();
    if badges.is_empty() {
        println!("Badges: none");
    } else {
        let names: Vec<String> = badges.iter().map(|b| b.to_string()).collect();
        println!("Badges: {}", names.join(", "));
    }

    match progress.next_badge() {
        Some((badge, missing)) => println!("Next badge: {badge} in {missing} stars"),
        None => println!("All badges unlocked."),
    }

    Ok(())
}
