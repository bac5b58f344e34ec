use crate::model::{
    QuestionAnalysis, QuestionKind, ResponseSummary, ResponseTrend, ResponseValue, Submission, SubmissionStatus,
    TopResponse,
};
use chrono::{DateTime, Duration, Utc};
use indexmap::IndexMap;

pub const TOP_RESPONSES: usize = 5;
pub const TREND_DAYS: i64 = 7;

/// Dashboard counters: completion rate, per-question answer tallies,
/// most common answers and the daily submission trend ending at `now`.
pub fn summarize_responses(submissions: &[Submission], now: DateTime<Utc>) -> ResponseSummary {
    let total_submissions = submissions.len();
    let completed = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Completed)
        .count();
    let completion_rate = if total_submissions > 0 {
        completed as f64 / total_submissions as f64 * 100.0
    } else {
        0.0
    };

    let question_analysis = analyze_questions(submissions);
    let top_responses = question_analysis
        .iter()
        .map(|(question, analysis)| (question.clone(), top_responses(analysis, TOP_RESPONSES)))
        .collect();

    ResponseSummary {
        total_submissions,
        completion_rate,
        question_analysis,
        response_trends: response_trends(submissions, now, TREND_DAYS),
        top_responses,
    }
}

pub fn analyze_questions(submissions: &[Submission]) -> IndexMap<String, QuestionAnalysis> {
    let mut questions: IndexMap<String, QuestionAnalysis> = IndexMap::new();

    for submission in submissions {
        for (question, value) in &submission.responses {
            let entry = questions.entry(question.clone()).or_insert_with(|| QuestionAnalysis {
                total: 0,
                responses: IndexMap::new(),
                kind: QuestionKind::Text,
            });
            entry.total += 1;

            match value {
                ResponseValue::Choices(items) => {
                    entry.kind = QuestionKind::Checkbox;
                    for item in items {
                        if let ResponseValue::Text(choice) = item {
                            *entry.responses.entry(choice.clone()).or_insert(0) += 1;
                        }
                    }
                }
                ResponseValue::Text(text) if !text.is_empty() => {
                    entry.kind = QuestionKind::Text;
                    *entry.responses.entry(text.clone()).or_insert(0) += 1;
                }
                _ => {}
            }
        }
    }

    questions
}

/// Most frequent answers first; equal counts keep first-seen order.
pub fn top_responses(analysis: &QuestionAnalysis, limit: usize) -> Vec<TopResponse> {
    let mut sorted: Vec<(&String, &usize)> = analysis.responses.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1));
    sorted
        .into_iter()
        .take(limit)
        .map(|(response, &count)| TopResponse {
            response: response.clone(),
            count,
            percentage: if analysis.total == 0 {
                0
            } else {
                (count as f64 / analysis.total as f64 * 100.0).round() as u32
            },
        })
        .collect()
}

/// Submissions per UTC day for the `days` days ending on `now`, oldest first.
pub fn response_trends(submissions: &[Submission], now: DateTime<Utc>, days: i64) -> Vec<ResponseTrend> {
    let today = now.date_naive();
    (0..days)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let count = submissions
                .iter()
                .filter_map(|s| s.created_at)
                .filter(|created| created.date_naive() == day)
                .count();
            ResponseTrend {
                date: day.format("%Y-%m-%d").to_string(),
                count,
            }
        })
        .collect()
}
