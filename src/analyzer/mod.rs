// Analyzer module: keyword tables plus one submodule per kind of output.

pub mod business_insights;
pub mod keywords;
pub mod product_insights;
pub mod sales_opportunities;
pub mod summary;

use crate::model::{BusinessInsight, ProductInsight, ResponseSummary, SalesOpportunity, Submission};
use crate::normalizer::normalize_all;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

pub use summary::summarize_responses;

/// Interface for turning a batch of submissions into insight records.
///
/// Every method is a pure function of its input and the fixed keyword tables.
pub trait Analyzer {
    fn analyze_user_responses(&self, submissions: &[Submission]) -> Vec<BusinessInsight>;
    fn generate_product_insights(&self, submissions: &[Submission]) -> Vec<ProductInsight>;
    fn generate_sales_opportunities(&self, submissions: &[Submission]) -> Vec<SalesOpportunity>;

    /// All three outputs for the same batch.
    fn analyze(&self, submissions: &[Submission]) -> AnalysisReport {
        debug!("Analyzing {} submissions", submissions.len());
        AnalysisReport {
            business_insights: self.analyze_user_responses(submissions),
            product_insights: self.generate_product_insights(submissions),
            sales_opportunities: self.generate_sales_opportunities(submissions),
        }
    }
}

/// Keyword-table implementation of the analyzer.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze_user_responses(&self, submissions: &[Submission]) -> Vec<BusinessInsight> {
        business_insights::analyze_tokens(&normalize_all(submissions))
    }

    fn generate_product_insights(&self, submissions: &[Submission]) -> Vec<ProductInsight> {
        product_insights::generate_from_tokens(&normalize_all(submissions))
    }

    fn generate_sales_opportunities(&self, submissions: &[Submission]) -> Vec<SalesOpportunity> {
        sales_opportunities::generate_from_tokens(&normalize_all(submissions))
    }
}

/// The three engine outputs, ready for a rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub business_insights: Vec<BusinessInsight>,
    pub product_insights: Vec<ProductInsight>,
    pub sales_opportunities: Vec<SalesOpportunity>,
}

/// Engine output plus dashboard counters, as written by the driver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ResponseSummary,
    #[serde(flatten)]
    pub analysis: AnalysisReport,
}

impl DashboardReport {
    pub fn build(analyzer: &impl Analyzer, submissions: &[Submission], now: DateTime<Utc>) -> Self {
        Self {
            generated_at: now,
            summary: summarize_responses(submissions, now),
            analysis: analyzer.analyze(submissions),
        }
    }
}
