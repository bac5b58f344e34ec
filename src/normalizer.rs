use crate::model::{ResponseValue, Submission};

/// Flattens every text answer of every submission into lowercase tokens.
///
/// Order is submission order, then answer order within a submission, then
/// choice order within a multi-select answer. Blank strings, numbers and
/// unsupported shapes are dropped.
pub fn normalize_all(submissions: &[Submission]) -> Vec<String> {
    let mut tokens = Vec::new();
    for submission in submissions {
        for value in submission.responses.values() {
            normalize_value(value, &mut tokens);
        }
    }
    tokens
}

fn normalize_value(value: &ResponseValue, tokens: &mut Vec<String>) {
    match value {
        ResponseValue::Text(text) => push_text(text, tokens),
        ResponseValue::Choices(items) => {
            for item in items {
                // only direct string choices count; nested lists are not a form shape
                if let ResponseValue::Text(text) = item {
                    push_text(text, tokens);
                }
            }
        }
        ResponseValue::Number(_) | ResponseValue::Other(_) => {}
    }
}

fn push_text(text: &str, tokens: &mut Vec<String>) {
    if !text.trim().is_empty() {
        tokens.push(text.to_lowercase());
    }
}
