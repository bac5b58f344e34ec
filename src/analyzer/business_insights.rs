use crate::analyzer::keywords::{
    count_matches, count_tokens_matching, filter_matching, matches_any, top_keywords, CHEAP_KEYWORDS,
    COMPETITIVE_PHRASES, EXPENSIVE_KEYWORDS, NEGATIVE_KEYWORDS, OPPORTUNITY_KEYWORDS, PAIN_POINT_KEYWORDS,
    POSITIVE_KEYWORDS, PRICING_KEYWORDS, PRODUCT_CATALOG, SEGMENTS,
};
use crate::model::{BusinessInsight, Impact};
use crate::utils::capitalize;
use tracing::debug;

/// Runs every insight analysis over the tokens, in a fixed order:
/// sentiment, product performance per category, pain points, pricing,
/// feature requests, segmentation, competitive position.
pub fn analyze_tokens(tokens: &[String]) -> Vec<BusinessInsight> {
    let mut insights = Vec::new();
    insights.extend(analyze_sentiment(tokens));
    insights.extend(analyze_product_performance(tokens));
    insights.extend(analyze_pain_points(tokens));
    insights.extend(analyze_pricing(tokens));
    insights.extend(analyze_feature_requests(tokens));
    insights.extend(analyze_customer_segments(tokens));
    insights.extend(analyze_competitive_position(tokens));
    insights
}

/// `part / (part + other)`, or None when both are zero.
pub(crate) fn share(part: usize, other: usize) -> Option<f64> {
    let total = part + other;
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64)
    }
}

pub(crate) fn percent(ratio: f64) -> u32 {
    (ratio * 100.0).round() as u32
}

fn confidence(points: usize, floor: usize, ceiling: usize) -> u32 {
    points.clamp(floor, ceiling) as u32
}

/// "a and b" from the two leading keywords, or just "a" when only one exists.
fn leading_pair(top: &[&str]) -> String {
    match top {
        [first, second, ..] => format!("{} and {}", first, second),
        [first] => first.to_string(),
        [] => String::new(),
    }
}

pub fn analyze_sentiment(tokens: &[String]) -> Option<BusinessInsight> {
    if tokens.is_empty() {
        return None;
    }

    let positive: usize = tokens.iter().map(|t| count_matches(t, POSITIVE_KEYWORDS)).sum();
    let negative: usize = tokens.iter().map(|t| count_matches(t, NEGATIVE_KEYWORDS)).sum();
    let Some(ratio) = share(positive, negative) else {
        debug!("No sentiment keywords in {} responses", tokens.len());
        return None;
    };

    let (insight, impact, recommendation) = if ratio > 0.7 {
        (
            format!(
                "Strong positive sentiment detected ({}% positive). Customers are highly satisfied with your products.",
                percent(ratio)
            ),
            Impact::High,
            "Leverage positive feedback for marketing campaigns and testimonials. Consider premium pricing for high-value products.",
        )
    } else if ratio > 0.5 {
        (
            format!(
                "Moderate positive sentiment ({}% positive). Room for improvement in customer satisfaction.",
                percent(ratio)
            ),
            Impact::Medium,
            "Focus on addressing pain points and improving product quality to increase satisfaction.",
        )
    } else {
        (
            format!(
                "Negative sentiment detected ({}% negative). Immediate attention required.",
                percent(1.0 - ratio)
            ),
            Impact::High,
            "Conduct detailed customer interviews to understand issues. Prioritize fixing major pain points.",
        )
    };

    Some(BusinessInsight {
        category: "Customer Sentiment".into(),
        insight,
        impact,
        recommendation: recommendation.into(),
        confidence: confidence(tokens.len() * 2, 60, 95),
        data_points: tokens.len(),
    })
}

/// One insight per catalog category that has both product mentions and
/// sentiment to judge them by.
pub fn analyze_product_performance(tokens: &[String]) -> Vec<BusinessInsight> {
    let mut insights = Vec::new();

    for (category, products) in PRODUCT_CATALOG {
        let category_tokens = filter_matching(tokens, products);
        if category_tokens.is_empty() {
            continue;
        }

        let positive = count_tokens_matching(&category_tokens, POSITIVE_KEYWORDS);
        let negative = count_tokens_matching(&category_tokens, NEGATIVE_KEYWORDS);
        let Some(performance) = share(positive, negative) else {
            debug!("Category {} mentioned {} times without sentiment", category, category_tokens.len());
            continue;
        };

        let name = capitalize(category);
        let (insight, impact, recommendation) = if performance > 0.7 {
            (
                format!(
                    "{} products performing excellently with {}% positive feedback.",
                    name,
                    percent(performance)
                ),
                Impact::High,
                format!("Expand {} product line and increase marketing focus on this category.", category),
            )
        } else if performance > 0.5 {
            (
                format!("{} products showing moderate performance.", name),
                Impact::Medium,
                format!("Improve {} product quality and gather more specific feedback.", category),
            )
        } else {
            (
                format!("{} products need immediate attention due to poor feedback.", name),
                Impact::High,
                format!(
                    "Conduct detailed analysis of {} products and implement quality improvements.",
                    category
                ),
            )
        };

        insights.push(BusinessInsight {
            category: "Product Performance".into(),
            insight,
            impact,
            recommendation,
            confidence: confidence(category_tokens.len() * 3, 0, 90),
            data_points: category_tokens.len(),
        });
    }

    insights
}

pub fn analyze_pain_points(tokens: &[String]) -> Option<BusinessInsight> {
    let matched = filter_matching(tokens, PAIN_POINT_KEYWORDS);
    if matched.is_empty() {
        return None;
    }

    let top = top_keywords(&matched, PAIN_POINT_KEYWORDS, 3);
    let impact = if matched.len() as f64 > tokens.len() as f64 * 0.3 {
        Impact::High
    } else {
        Impact::Medium
    };

    Some(BusinessInsight {
        category: "Pain Points".into(),
        insight: format!(
            "Identified {} as top customer pain points affecting {}% of customers.",
            top.join(", "),
            percent(matched.len() as f64 / tokens.len() as f64)
        ),
        impact,
        recommendation: format!(
            "Prioritize addressing {} to improve customer satisfaction and reduce churn.",
            leading_pair(&top)
        ),
        confidence: confidence(matched.len() * 2, 0, 85),
        data_points: matched.len(),
    })
}

pub fn analyze_pricing(tokens: &[String]) -> Option<BusinessInsight> {
    let matched = filter_matching(tokens, PRICING_KEYWORDS);
    if matched.is_empty() {
        return None;
    }

    let expensive = count_tokens_matching(&matched, EXPENSIVE_KEYWORDS);
    let cheap = count_tokens_matching(&matched, CHEAP_KEYWORDS);
    let Some(ratio) = share(expensive, cheap) else {
        debug!("{} pricing mentions lean neither way", matched.len());
        return None;
    };

    let (insight, impact, recommendation) = if ratio > 0.6 {
        (
            format!(
                "{}% of pricing feedback indicates products are perceived as expensive.",
                percent(ratio)
            ),
            Impact::High,
            "Review pricing strategy. Consider value-based pricing or bundling to improve perceived value.",
        )
    } else if ratio < 0.4 {
        (
            format!("{}% of pricing feedback indicates good value perception.", percent(1.0 - ratio)),
            Impact::Medium,
            "Maintain current pricing strategy. Consider premium positioning for high-quality products.",
        )
    } else {
        (
            "Mixed pricing feedback with balanced perception of value.".to_string(),
            Impact::Low,
            "Continue monitoring pricing feedback and optimize based on customer segments.",
        )
    };

    Some(BusinessInsight {
        category: "Pricing Analysis".into(),
        insight,
        impact,
        recommendation: recommendation.into(),
        confidence: confidence(matched.len() * 2, 0, 80),
        data_points: matched.len(),
    })
}

pub fn analyze_feature_requests(tokens: &[String]) -> Option<BusinessInsight> {
    let matched = filter_matching(tokens, OPPORTUNITY_KEYWORDS);
    if matched.is_empty() {
        return None;
    }

    let top = top_keywords(&matched, OPPORTUNITY_KEYWORDS, 3);

    Some(BusinessInsight {
        category: "Feature Requests".into(),
        insight: format!(
            "Customers requesting {} improvements. {}% of customers have feature requests.",
            top.join(", "),
            percent(matched.len() as f64 / tokens.len() as f64)
        ),
        impact: Impact::Medium,
        recommendation: format!(
            "Prioritize {} improvements in product roadmap to meet customer expectations.",
            leading_pair(&top)
        ),
        confidence: confidence(matched.len() * 2, 0, 75),
        data_points: matched.len(),
    })
}

pub fn analyze_customer_segments(tokens: &[String]) -> Option<BusinessInsight> {
    let total = tokens.len();
    if total == 0 {
        return None;
    }

    let mut dominant: Option<(&str, usize)> = None;
    for &(segment, keywords) in SEGMENTS {
        let count = tokens.iter().filter(|t| matches_any(t, keywords)).count();
        // strict comparison keeps the earlier segment on ties
        if dominant.is_none_or(|(_, best)| count > best) {
            dominant = Some((segment, count));
        }
    }
    let (segment, count) = dominant?;

    Some(BusinessInsight {
        category: "Customer Segmentation".into(),
        insight: format!(
            "{} customers represent {}% of your customer base.",
            segment,
            percent(count as f64 / total as f64)
        ),
        impact: Impact::Medium,
        recommendation: format!(
            "Tailor marketing and product development to {} customer needs.",
            segment.to_lowercase()
        ),
        confidence: confidence(total, 0, 70),
        data_points: total,
    })
}

pub fn analyze_competitive_position(tokens: &[String]) -> Option<BusinessInsight> {
    let matched = filter_matching(tokens, COMPETITIVE_PHRASES);
    if matched.is_empty() {
        return None;
    }

    let positive = count_tokens_matching(&matched, POSITIVE_KEYWORDS);
    let ratio = positive as f64 / matched.len() as f64;

    let (insight, impact, recommendation) = if ratio > 0.6 {
        (
            format!(
                "{}% of competitive mentions are positive, indicating strong market position.",
                percent(ratio)
            ),
            Impact::High,
            "Leverage competitive advantages in marketing. Consider premium positioning.",
        )
    } else if ratio < 0.4 {
        (
            format!(
                "{}% of competitive mentions are negative, indicating need for improvement.",
                percent(1.0 - ratio)
            ),
            Impact::High,
            "Analyze competitor strengths and develop differentiation strategy.",
        )
    } else {
        (
            "Mixed competitive positioning with opportunities for improvement.".to_string(),
            Impact::Medium,
            "Focus on unique value propositions and customer experience improvements.",
        )
    };

    Some(BusinessInsight {
        category: "Competitive Analysis".into(),
        insight,
        impact,
        recommendation: recommendation.into(),
        confidence: confidence(matched.len() * 2, 0, 65),
        data_points: matched.len(),
    })
}
