//! The `quizrun init` command.

use std::path::Path;

use anyhow::Result;

const EXAMPLE_BANK_PATH: &str = "banks/math_grade1_sample.json";

pub fn execute() -> Result<()> {
    // Create quizrun.toml
    if Path::new("quizrun.toml").exists() {
        println!("quizrun.toml already exists, skipping.");
    } else {
        std::fs::write("quizrun.toml", SAMPLE_CONFIG)?;
        println!("Created quizrun.toml");
    }

    // Create example question bank
    std::fs::create_dir_all("banks")?;
    let example_path = Path::new(EXAMPLE_BANK_PATH);
    if example_path.exists() {
        println!("{EXAMPLE_BANK_PATH} already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created {EXAMPLE_BANK_PATH}");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizrun validate --path banks");
    println!("  2. Run: quizrun import --path banks");
    println!("  3. Run: quizrun take --length 3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizrun configuration

default_test_length = 10
player_name = "${USER}"
data_dir = "./quizrun-data"
# Count an empty multi-select or ordering answer as given.
accept_empty_selection = true

[api]
base_url = "https://quiz-backend-613338700440.us-central1.run.app"
timeout_secs = 30
"#;

const EXAMPLE_BANK: &str = r#"[
  {
    "Question": "What is 2 + 3?",
    "Options": ["4", "5", "6"],
    "answer": "5",
    "Rationale": "Counting on from 2 by 3 gives 5.",
    "hint": "Start at 2 and count up three times."
  },
  {
    "Question": "Which numbers are even?",
    "Options": ["2", "3", "4", "7"],
    "answer": ["2", "4"],
    "type": "multi-select",
    "Rationale": "Even numbers split into two equal groups."
  },
  {
    "Question": "What is half of 9?",
    "answer": 4.5,
    "Rationale": "9 divided by 2 is 4.5."
  },
  {
    "Question": "Put these numbers in order, smallest first.",
    "Options": ["10", "1", "5"],
    "answer": ["1", "5", "10"],
    "type": "ordering",
    "hint": "Which one is the smallest?"
  }
]
"#;
