//! The `quizrun validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(path: PathBuf) -> Result<()> {
    let files = quizrun_core::parser::load_path(&path)?;
    anyhow::ensure!(!files.is_empty(), "no question files found in {}", path.display());

    let mut total_warnings = 0;

    for file in &files {
        println!("File: {} ({} questions)", file.source.file, file.questions.len());

        for skipped in &file.skipped {
            println!("  [item {}] SKIPPED: {}", skipped.index, skipped.reason);
        }

        let warnings = quizrun_core::parser::validate_questions(&file.questions);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len() + file.skipped.len();
    }

    if total_warnings == 0 {
        println!("All question files valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
