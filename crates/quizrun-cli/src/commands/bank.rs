//! The `quizrun bank` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::open_app;

pub fn execute(clear: bool, config_path: Option<PathBuf>) -> Result<()> {
    let (_, mut app) = open_app(config_path.as_deref())?;

    if clear {
        app.delete_questions()?;
        println!("Question bank cleared.");
        return Ok(());
    }

    let bank = app.bank();
    if bank.is_empty() {
        println!("Question bank is empty. Run `quizrun import --path <file>` to add questions.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Questions"]);
    for (subject, count) in bank.subject_counts() {
        table.add_row(vec![Cell::new(subject), Cell::new(count)]);
    }
    println!("{table}");

    let lists = bank.filter_lists();
    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    println!("Total: {} questions", bank.len());
    println!("Grade levels: {}", join(&lists.grade_levels));
    println!("Identifiers: {}", join(&lists.identifiers));

    Ok(())
}
