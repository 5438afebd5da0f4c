//! The `quizrun import` command.

use std::path::PathBuf;

use anyhow::Result;

use quizrun_core::parser;
use quizrun_remote::config::create_backend;

use super::open_app;

pub async fn execute(
    path: Option<PathBuf>,
    code: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, mut app) = open_app(config_path.as_deref())?;

    let questions = match (path, code) {
        (_, Some(code)) => {
            let backend = create_backend(&config.api)?;
            let questions = backend.load_quiz(&code).await?;
            println!("Quiz {}: {} questions", code.trim(), questions.len());
            questions
        }
        (Some(path), None) => {
            let files = parser::load_path(&path)?;
            let mut questions = Vec::new();
            for file in files {
                if file.skipped.is_empty() {
                    println!("{}: {} questions", file.source.file, file.questions.len());
                } else {
                    println!(
                        "{}: {} questions ({} skipped)",
                        file.source.file,
                        file.questions.len(),
                        file.skipped.len()
                    );
                }
                questions.extend(file.questions);
            }
            questions
        }
        (None, None) => anyhow::bail!("either --path or --code is required"),
    };

    anyhow::ensure!(!questions.is_empty(), "no valid questions found");

    let added = app.import(questions)?;
    println!(
        "Imported {added} new questions ({} total).",
        app.bank().len()
    );
    Ok(())
}
