use crate::analyzer::keywords::{count_tokens_matching, PAIN_POINT_KEYWORDS, POSITIVE_KEYWORDS, PRODUCT_CATALOG};
use crate::model::{Level, OpportunityType, SalesOpportunity, Timeframe};
use crate::utils::capitalize;

const UPSELL_SHARE: f64 = 0.3;
const CROSS_SELL_SHARE: f64 = 0.1;
const RETENTION_SHARE: f64 = 0.2;

/// Upsell, then cross-sell per category, then retention.
pub fn generate_from_tokens(tokens: &[String]) -> Vec<SalesOpportunity> {
    let mut opportunities = Vec::new();
    opportunities.extend(upsell(tokens));
    opportunities.extend(cross_sell(tokens));
    opportunities.extend(retention(tokens));
    opportunities
}

fn exceeds_share(count: usize, total: usize, share: f64) -> bool {
    count as f64 > total as f64 * share
}

fn upsell(tokens: &[String]) -> Option<SalesOpportunity> {
    let satisfied = count_tokens_matching(tokens, POSITIVE_KEYWORDS);
    exceeds_share(satisfied, tokens.len(), UPSELL_SHARE).then(|| SalesOpportunity {
        kind: OpportunityType::Upsell,
        description: "High customer satisfaction indicates potential for premium product upsells".into(),
        potential_revenue: Level::High,
        effort: Level::Medium,
        timeframe: Timeframe::ShortTerm,
        target_segment: "Satisfied Customers".into(),
    })
}

fn cross_sell(tokens: &[String]) -> Vec<SalesOpportunity> {
    PRODUCT_CATALOG
        .iter()
        .filter(|(_, products)| exceeds_share(count_tokens_matching(tokens, products), tokens.len(), CROSS_SELL_SHARE))
        .map(|(category, _)| SalesOpportunity {
            kind: OpportunityType::CrossSell,
            description: format!("Strong interest in {} products indicates cross-selling potential", category),
            potential_revenue: Level::Medium,
            effort: Level::Low,
            timeframe: Timeframe::Immediate,
            target_segment: format!("{} Customers", capitalize(category)),
        })
        .collect()
}

fn retention(tokens: &[String]) -> Option<SalesOpportunity> {
    let at_risk = count_tokens_matching(tokens, PAIN_POINT_KEYWORDS);
    exceeds_share(at_risk, tokens.len(), RETENTION_SHARE).then(|| SalesOpportunity {
        kind: OpportunityType::Retention,
        description: "Multiple pain points identified - risk of customer churn".into(),
        potential_revenue: Level::High,
        effort: Level::High,
        timeframe: Timeframe::Immediate,
        target_segment: "At-Risk Customers".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mix(parts: &[(&str, usize)]) -> Vec<String> {
        parts
            .iter()
            .flat_map(|(t, n)| std::iter::repeat(t.to_string()).take(*n))
            .collect()
    }

    #[test]
    fn test_nothing_from_empty_input() {
        assert!(generate_from_tokens(&[]).is_empty());
    }

    #[test]
    fn test_cross_sell_above_ten_percent() {
        let tokens = mix(&[("fresh bread", 11), ("okay", 89)]);
        let opportunities = generate_from_tokens(&tokens);
        assert_eq!(opportunities.len(), 1);

        let bakery = &opportunities[0];
        assert_eq!(bakery.kind, OpportunityType::CrossSell);
        assert_eq!(bakery.potential_revenue, Level::Medium);
        assert_eq!(bakery.effort, Level::Low);
        assert_eq!(bakery.timeframe, Timeframe::Immediate);
        assert_eq!(bakery.target_segment, "Bakery Customers");
        assert_eq!(bakery.description, "Strong interest in bakery products indicates cross-selling potential");
    }

    #[test]
    fn test_no_cross_sell_at_nine_percent() {
        let tokens = mix(&[("fresh bread", 9), ("okay", 91)]);
        assert!(generate_from_tokens(&tokens).is_empty());
    }

    #[test]
    fn test_exactly_ten_percent_is_not_enough() {
        let tokens = mix(&[("fresh bread", 10), ("okay", 90)]);
        assert!(cross_sell(&tokens).is_empty());
    }

    #[test]
    fn test_upsell_and_retention() {
        let tokens = mix(&[("love it", 4), ("slow checkout", 3), ("okay", 3)]);
        let opportunities = generate_from_tokens(&tokens);
        assert_eq!(opportunities.len(), 2);
        assert_eq!(opportunities[0].kind, OpportunityType::Upsell);
        assert_eq!(opportunities[0].timeframe, Timeframe::ShortTerm);
        assert_eq!(opportunities[0].target_segment, "Satisfied Customers");
        assert_eq!(opportunities[1].kind, OpportunityType::Retention);
        assert_eq!(opportunities[1].effort, Level::High);
        assert_eq!(opportunities[1].target_segment, "At-Risk Customers");
    }

    #[test]
    fn test_thresholds_are_strict() {
        // 3 of 10 positive is not more than 30%, 2 of 10 pain points is not more than 20%
        let tokens = mix(&[("love it", 3), ("slow checkout", 2), ("okay", 5)]);
        assert!(generate_from_tokens(&tokens).is_empty());
    }
}
