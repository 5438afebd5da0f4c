//! Answer grading.
//!
//! Grading is pure and total: any answer, including one tagged with the
//! wrong kind, produces a verdict instead of an error. Mismatched shapes are
//! resolved through the coercions on [`Answer`]:
//!
//! - scalar kinds compare the text form (`Answer::as_text`, lists joined
//!   with `,`);
//! - list kinds compare lists; a scalar canonical multi-select answer is a
//!   one-element list, any other scalar is the empty list.

use crate::model::{Answer, Question, QuestionKind};

/// Absolute tolerance for numeric fill-in answers.
pub const NUMERIC_TOLERANCE: f64 = 1e-9;

/// Decide whether `answer` is a correct response to `question`.
pub fn evaluate(question: &Question, answer: &Answer) -> bool {
    match question.kind {
        QuestionKind::FillIn => fill_in_matches(&question.answer.as_text(), &answer.as_text()),
        QuestionKind::MultiSelect => {
            let expected = match question.answer.as_list() {
                Some(items) => items.to_vec(),
                None => vec![question.answer.as_text()],
            };
            let given = answer.as_list().map(<[String]>::to_vec).unwrap_or_default();
            same_set(expected, given)
        }
        QuestionKind::Ordering => {
            let expected = question.answer.as_list().unwrap_or_default();
            let given = answer.as_list().unwrap_or_default();
            expected == given
        }
        QuestionKind::Single => answer.as_text() == question.answer.as_text(),
    }
}

/// Strip surrounding whitespace and every comma and space.
///
/// `"1, 000"` and `" 1000 "` both normalize to `"1000"`.
pub fn normalize_fill_in(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect()
}

fn fill_in_matches(expected: &str, given: &str) -> bool {
    let expected = normalize_fill_in(expected);
    let given = normalize_fill_in(given);

    match (leading_number(&expected), leading_number(&given)) {
        (Some(a), Some(b)) => (a - b).abs() < NUMERIC_TOLERANCE,
        _ => expected.to_lowercase() == given.to_lowercase(),
    }
}

/// Read the longest numeric prefix of `s`: optional sign, digits with an
/// optional fraction, then an optional exponent.
///
/// `"12cm"` reads as `12.0`, `"-.5e1x"` as `-5.0`. Text with no leading
/// digits, and prefixes that overflow to infinity, are not numbers.
pub fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|n| n.is_finite())
}

// Equal length and equal sorted content.
fn same_set(mut expected: Vec<String>, mut given: Vec<String>) -> bool {
    if expected.len() != given.len() {
        return false;
    }
    expected.sort();
    given.sort();
    expected == given
}
