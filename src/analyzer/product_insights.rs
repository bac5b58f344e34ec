use crate::analyzer::keywords::{
    all_products, count_tokens_matching, ADVANTAGE_KEYWORDS, NEGATIVE_KEYWORDS, OPPORTUNITY_KEYWORDS,
    PAIN_POINT_KEYWORDS, POSITIVE_KEYWORDS, PRICING_KEYWORDS,
};
use crate::model::{ProductInsight, Sentiment};

/// Builds one insight per catalog product mentioned in at least one token,
/// in catalog order.
pub fn generate_from_tokens(tokens: &[String]) -> Vec<ProductInsight> {
    identify_products(tokens)
        .into_iter()
        .map(|product| {
            let mentions: Vec<&str> = tokens
                .iter()
                .map(String::as_str)
                .filter(|t| t.contains(product))
                .collect();
            product_insight(product, &mentions)
        })
        .collect()
}

pub fn identify_products(tokens: &[String]) -> Vec<&'static str> {
    all_products()
        .filter(|product| tokens.iter().any(|t| t.contains(product)))
        .collect()
}

fn product_insight(product: &str, mentions: &[&str]) -> ProductInsight {
    let positive = count_tokens_matching(mentions, POSITIVE_KEYWORDS);
    let negative = count_tokens_matching(mentions, NEGATIVE_KEYWORDS);

    let mut pain_points = keywords_present(mentions, PAIN_POINT_KEYWORDS);
    pain_points.truncate(3);
    let feature_requests = keywords_present(mentions, OPPORTUNITY_KEYWORDS);
    let opportunities = feature_requests.iter().take(3).cloned().collect();

    ProductInsight {
        product_name: product.to_string(),
        sentiment: sentiment(positive, negative),
        satisfaction: satisfaction(mentions.len(), positive, negative),
        pain_points,
        opportunities,
        competitive_advantage: keywords_present(mentions, ADVANTAGE_KEYWORDS),
        pricing_feedback: keywords_present(mentions, PRICING_KEYWORDS),
        feature_requests,
    }
}

fn sentiment(positive: usize, negative: usize) -> Sentiment {
    if positive > negative * 2 {
        Sentiment::Positive
    } else if negative > positive * 2 {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// 1..=5 scale from the positive share; 3 when there is nothing to judge.
pub fn satisfaction(mentions: usize, positive: usize, negative: usize) -> u8 {
    if mentions == 0 || positive + negative == 0 {
        return 3;
    }
    let ratio = positive as f64 / (positive + negative) as f64;
    (1.0 + ratio * 4.0).round().clamp(1.0, 5.0) as u8
}

/// Table entries found in any of the tokens, in table order.
fn keywords_present(tokens: &[&str], keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .filter(|k| tokens.iter().any(|t| t.contains(*k)))
        .map(|k| k.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_tokens_no_products() {
        assert!(generate_from_tokens(&[]).is_empty());
        assert!(generate_from_tokens(&tokens(&["nothing relevant"])).is_empty());
    }

    #[test]
    fn test_products_in_catalog_order() {
        let found = identify_products(&tokens(&["pizza and tea", "a muffin"]));
        assert_eq!(found, vec!["muffin", "tea", "pizza"]);
    }

    #[test]
    fn test_product_insight_fields() {
        let toks = tokens(&[
            "love the fresh cookie",
            "cookie is great but slow to arrive, add more flavors",
            "cookie too expensive, bug in the box, missing label, broken lid",
            "unrelated coffee",
        ]);
        let insights = generate_from_tokens(&toks);
        assert_eq!(insights.len(), 2);

        let cookie = &insights[0];
        assert_eq!(cookie.product_name, "cookie");
        // 2 positive tokens vs 1 negative token
        assert_eq!(cookie.sentiment, Sentiment::Neutral);
        assert_eq!(cookie.satisfaction, 4);
        assert_eq!(cookie.pain_points, vec!["slow", "expensive", "missing"]);
        assert_eq!(cookie.opportunities, vec!["add", "more"]);
        assert_eq!(cookie.feature_requests, vec!["add", "more"]);
        assert_eq!(cookie.competitive_advantage, vec!["fresh"]);
        assert_eq!(cookie.pricing_feedback, vec!["expensive", "expensive"]);

        let coffee = &insights[1];
        assert_eq!(coffee.product_name, "coffee");
        assert_eq!(coffee.sentiment, Sentiment::Neutral);
        assert_eq!(coffee.satisfaction, 3);
        assert!(coffee.pain_points.is_empty());
    }

    #[test]
    fn test_sentiment_thresholds() {
        assert_eq!(sentiment(3, 1), Sentiment::Positive);
        assert_eq!(sentiment(2, 1), Sentiment::Neutral);
        assert_eq!(sentiment(1, 3), Sentiment::Negative);
        assert_eq!(sentiment(0, 0), Sentiment::Neutral);
    }

    #[test]
    fn test_satisfaction_range_and_default() {
        assert_eq!(satisfaction(0, 0, 0), 3);
        assert_eq!(satisfaction(4, 0, 0), 3);
        assert_eq!(satisfaction(5, 5, 0), 5);
        assert_eq!(satisfaction(5, 0, 5), 1);
        assert_eq!(satisfaction(4, 1, 1), 3);
        for positive in 0..20 {
            for negative in 0..20 {
                let s = satisfaction(positive + negative, positive, negative);
                assert!((1..=5).contains(&s));
            }
        }
    }

    #[test]
    fn test_opportunities_capped_but_feature_requests_not() {
        let toks = tokens(&["bread: improve, enhance, upgrade, expand it"]);
        let bread = &generate_from_tokens(&toks)[0];
        assert_eq!(bread.opportunities, vec!["improve", "enhance", "upgrade"]);
        assert_eq!(bread.feature_requests, vec!["improve", "enhance", "upgrade", "expand"]);
    }
}
