//! The `quizrun take` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use quizrun_core::bank::QuestionFilter;
use quizrun_core::engine::QuizApp;
use quizrun_core::model::{Answer, Question, QuestionKind};
use quizrun_core::parser;
use quizrun_core::progress::Badge;
use quizrun_core::report::TestReport;
use quizrun_core::results::SessionResult;
use quizrun_core::session::AnswerRecord;
use quizrun_core::traits::{QuizBackend, SessionObserver};
use quizrun_remote::config::create_backend;

use super::open_app;

/// Where the questions for a test come from.
pub enum PoolSource {
    /// The saved question bank.
    Saved,
    /// Files on disk, used for this test only.
    Files(PathBuf),
    /// A quiz published on the quiz service.
    Remote(String),
}

impl PoolSource {
    pub fn from_args(bank: Option<PathBuf>, code: Option<String>) -> Self {
        match (bank, code) {
            (_, Some(code)) => PoolSource::Remote(code),
            (Some(path), None) => PoolSource::Files(path),
            (None, None) => PoolSource::Saved,
        }
    }
}

/// Console observer.
struct ConsoleObserver;

impl SessionObserver for ConsoleObserver {
    fn on_test_started(&self, total: usize) {
        println!("Starting test with {total} questions.");
        println!("Answer with option numbers or text (comma-separated for lists).");
        println!("Commands: :next  :prev  :hint  :quit\n");
    }

    fn on_answer_recorded(&self, index: usize, record: &AnswerRecord) {
        tracing::debug!(
            "question {} answered: {} ({})",
            index + 1,
            record.user_answer(),
            record.is_correct()
        );
    }

    fn on_badge_unlocked(&self, badge: Badge, stars: u32) {
        println!("*** Badge unlocked: {badge} ({stars} stars) ***");
    }

    fn on_test_finished(&self, result: &SessionResult) {
        println!(
            "\nTest complete: {}/{} correct.",
            result.correct_count, result.total
        );
    }
}

pub async fn execute(
    source: PoolSource,
    filter: QuestionFilter,
    length: Option<usize>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, app) = open_app(config_path.as_deref())?;
    let mut app = app.with_observer(Arc::new(ConsoleObserver));

    let mut remote: Option<(Box<dyn QuizBackend>, String)> = None;
    let pool: Vec<Question> = match &source {
        PoolSource::Saved => {
            anyhow::ensure!(
                !app.bank().is_empty(),
                "question bank is empty; run `quizrun import --path <file>` first"
            );
            app.bank().filter(&filter)
        }
        PoolSource::Files(path) => parser::load_path(path)?
            .into_iter()
            .flat_map(|f| f.questions)
            .filter(|q| filter.matches(q))
            .collect(),
        PoolSource::Remote(code) => {
            let backend = create_backend(&config.api)?;
            let questions = backend.load_quiz(code).await?;
            remote = Some((backend, code.trim().to_string()));
            questions
        }
    };

    // An explicit length must fit the pool; the configured default shrinks to it.
    let length = match length {
        Some(n) => n,
        None => config.default_test_length.min(pool.len()),
    };
    anyhow::ensure!(length > 0, "no questions match the selected filters");

    app.start_with_pool(&pool, length)?;

    let mut session_id = None;
    if let Some((backend, code)) = &remote {
        match backend.start_session(code, &config.player_name).await {
            Ok(id) => session_id = Some(id),
            Err(e) => eprintln!("Warning: could not start remote session: {e:#}"),
        }
    }

    let started = Instant::now();
    let stdin = std::io::stdin();
    run_loop(&mut app, &mut stdin.lock())?;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    let result = app.results();
    print_summary(&result);
    println!(
        "Score: {:.1}% ({}/{})",
        result.score_percent, result.correct_count, result.total
    );
    println!("Stars: {}", app.progress().stars());

    if let Some(path) = output {
        let mut report = TestReport::new(&config.player_name, result.clone(), elapsed_ms);
        if let Some((_, code)) = &remote {
            report = report.with_quiz_code(code);
        }
        report.save_json(&path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    if let (Some((backend, _)), Some(id)) = (&remote, session_id) {
        if app.is_finished() {
            match backend.submit_results(&id, &result.records).await {
                Ok(receipt) => println!(
                    "Results submitted{}",
                    receipt
                        .message
                        .map(|m| format!(": {m}"))
                        .unwrap_or_default()
                ),
                Err(e) => eprintln!("Warning: could not submit results: {e:#}"),
            }
        }
    }

    Ok(())
}

/// Ask questions until the test finishes, input ends or the user quits.
fn run_loop(app: &mut QuizApp, input: &mut impl BufRead) -> Result<()> {
    let mut line = String::new();

    while !app.is_finished() {
        let Some(question) = app.current().cloned() else {
            break;
        };
        render_question(app, &question);

        print!("> ");
        std::io::stdout().flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }
        let text = line.trim_end_matches(['\r', '\n']);

        match text.trim() {
            ":quit" | ":q" => break,
            ":next" | ":n" => {
                if app.advance().is_none() {
                    println!("Already on the last question.");
                }
            }
            ":prev" | ":p" => {
                if app.retreat().is_none() {
                    println!("Already on the first question.");
                }
            }
            ":hint" | ":h" => {
                if question.hint.is_empty() {
                    println!("No hint for this question.");
                } else {
                    println!("Hint: {}", question.hint);
                }
            }
            _ => {
                let answer = parse_answer(&question, text);
                match app.submit(answer) {
                    Ok(outcome) => {
                        if outcome.correct {
                            println!("Correct!");
                        } else {
                            println!("Incorrect. The answer is: {}", question.answer);
                        }
                        println!("{}\n", question.rationale);
                        if !outcome.finished {
                            app.advance();
                        }
                    }
                    Err(e) if e.is_silent() => {
                        println!("Already answered; use :next or :prev.");
                    }
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    Ok(())
}

fn render_question(app: &QuizApp, question: &Question) {
    let session = app.session();
    println!(
        "Question {}/{} [{}]",
        session.cursor() + 1,
        session.len(),
        question.kind
    );
    println!("{}", question.prompt);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
    if let Some(record) = session.current_record() {
        let verdict = if record.is_correct() {
            "correct"
        } else {
            "incorrect"
        };
        println!("(answered: {} - {verdict})", record.user_answer());
    }
}

/// Turn typed input into an answer for `question`.
///
/// For option-based kinds each comma-separated item is matched against the
/// option texts first (case-insensitively), then read as a 1-based option
/// number. Anything else is kept as typed and graded as such.
pub fn parse_answer(question: &Question, input: &str) -> Answer {
    match question.kind {
        QuestionKind::FillIn => Answer::FillIn(input.to_string()),
        QuestionKind::Single => Answer::Single(resolve_option(&question.options, input.trim())),
        QuestionKind::MultiSelect | QuestionKind::Ordering => {
            let items = input
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| resolve_option(&question.options, s))
                .collect();
            Answer::from_list(question.kind, items)
        }
    }
}

fn resolve_option(options: &[String], item: &str) -> String {
    if let Some(option) = options.iter().find(|o| o.eq_ignore_ascii_case(item)) {
        return option.clone();
    }
    match item.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => options[n - 1].clone(),
        _ => item.to_string(),
    }
}

fn print_summary(result: &SessionResult) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result"]);

    for (i, slot) in result.records.iter().enumerate() {
        match slot {
            Some(record) => table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&record.question().prompt),
                Cell::new(record.user_answer()),
                Cell::new(&record.question().answer),
                Cell::new(if record.is_correct() { "OK" } else { "WRONG" }),
            ]),
            None => table.add_row(vec![
                Cell::new(i + 1),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("-"),
                Cell::new("SKIPPED"),
            ]),
        };
    }

    println!("\n{table}");
}
