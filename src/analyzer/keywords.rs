// Fixed keyword tables and the substring matching every analysis shares.
//
// Matching is plain substring containment on lowercase tokens, not word
// matching: "cost" matches "costly" and "costume" alike.

pub const POSITIVE_KEYWORDS: &[&str] = &[
    "love", "great", "excellent", "amazing", "perfect", "wonderful", "fantastic",
    "satisfied", "happy", "pleased", "impressed", "outstanding", "superb",
    "best", "top", "premium", "quality", "reliable", "trustworthy", "recommend",
];

pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "hate", "terrible", "awful", "horrible", "disappointed", "frustrated",
    "angry", "upset", "annoyed", "bad", "poor", "worst", "useless", "broken",
    "expensive", "overpriced", "cheap", "unreliable", "difficult", "complicated",
];

pub const PAIN_POINT_KEYWORDS: &[&str] = &[
    "problem", "issue", "difficulty", "challenge", "struggle", "frustration",
    "confusion", "complexity", "slow", "expensive", "limited", "missing",
    "broken", "error", "bug", "defect", "fault", "weakness", "drawback",
];

pub const OPPORTUNITY_KEYWORDS: &[&str] = &[
    "improve", "enhance", "better", "upgrade", "add", "include", "expand",
    "develop", "create", "build", "implement", "optimize", "streamline",
    "simplify", "faster", "cheaper", "more", "additional", "new", "innovative",
];

// "expensive" and "cheap" appear twice; pricing feedback lists them twice too.
pub const PRICING_KEYWORDS: &[&str] = &[
    "expensive", "cheap", "affordable", "overpriced", "value", "worth",
    "cost", "price", "budget", "money", "dollar", "expensive", "cheap",
];

pub const EXPENSIVE_KEYWORDS: &[&str] = &["expensive", "overpriced", "cost"];
pub const CHEAP_KEYWORDS: &[&str] = &["cheap", "affordable", "value"];

pub const COMPETITIVE_PHRASES: &[&str] = &[
    "better than", "compared to", "competitor", "alternative", "other brands",
];

pub const ADVANTAGE_KEYWORDS: &[&str] = &["quality", "fresh", "taste", "unique", "premium", "organic"];

/// Named customer segments, in tie-break order.
pub const SEGMENTS: &[(&str, &[&str])] = &[
    ("Quality Focused", &["quality", "fresh", "ingredients"]),
    ("Price Sensitive", &["expensive", "cheap", "price", "cost"]),
    ("Convenience Seekers", &["quick", "fast", "easy", "convenient"]),
    ("Experience Driven", &["taste", "flavor", "enjoy", "experience"]),
];

/// Product categories and the product names that place a token in them.
pub const PRODUCT_CATALOG: &[(&str, &[&str])] = &[
    ("bakery", &["bread", "cake", "pastry", "cookie", "muffin", "croissant", "donut"]),
    ("beverages", &["coffee", "tea", "juice", "smoothie", "milkshake", "soda"]),
    ("desserts", &["ice cream", "pudding", "custard", "gelato", "sorbet"]),
    ("snacks", &["chips", "nuts", "crackers", "popcorn", "pretzels"]),
    ("meals", &["sandwich", "pizza", "pasta", "salad", "soup", "burger"]),
];

/// True if the token contains at least one keyword.
pub fn matches_any(token: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| token.contains(k))
}

/// Number of keywords the token contains, duplicates in the table included.
pub fn count_matches(token: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|k| token.contains(*k)).count()
}

/// Tokens containing at least one keyword, in input order.
pub fn filter_matching<'a>(tokens: &'a [String], keywords: &[&str]) -> Vec<&'a str> {
    tokens
        .iter()
        .map(String::as_str)
        .filter(|t| matches_any(t, keywords))
        .collect()
}

/// Number of tokens containing at least one keyword.
pub fn count_tokens_matching<T: AsRef<str>>(tokens: &[T], keywords: &[&str]) -> usize {
    tokens.iter().filter(|t| matches_any(t.as_ref(), keywords)).count()
}

/// Keyword frequencies over the tokens, ordered by first occurrence.
///
/// Each token adds one to every distinct table entry it contains.
pub fn keyword_frequencies<'k, T: AsRef<str>>(tokens: &[T], keywords: &[&'k str]) -> Vec<(&'k str, usize)> {
    let mut freq: Vec<(&'k str, usize)> = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        for &keyword in keywords {
            if token.contains(keyword) {
                match freq.iter_mut().find(|(k, _)| *k == keyword) {
                    Some((_, count)) => *count += 1,
                    None => freq.push((keyword, 1)),
                }
            }
        }
    }
    freq
}

/// The `n` most frequent keywords; ties keep first-occurrence order.
pub fn top_keywords<'k, T: AsRef<str>>(tokens: &[T], keywords: &[&'k str], n: usize) -> Vec<&'k str> {
    let mut freq = keyword_frequencies(tokens, keywords);
    // sort_by is stable
    freq.sort_by(|a, b| b.1.cmp(&a.1));
    freq.into_iter().take(n).map(|(k, _)| k).collect()
}

/// Every product name across all categories, in catalog order.
pub fn all_products() -> impl Iterator<Item = &'static str> {
    PRODUCT_CATALOG.iter().flat_map(|(_, products)| products.iter().copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_substring_matching_keeps_false_positives() {
        assert!(matches_any("the top shelf", POSITIVE_KEYWORDS));
        // "top" hides inside "laptop"
        assert!(matches_any("my laptop", POSITIVE_KEYWORDS));
        assert!(matches_any("costume", EXPENSIVE_KEYWORDS));
        assert!(!matches_any("nothing here", PAIN_POINT_KEYWORDS));
    }

    #[test]
    fn test_count_matches_counts_every_keyword() {
        // "love" + "great"
        assert_eq!(count_matches("love it, great", POSITIVE_KEYWORDS), 2);
        // duplicated table entries count twice
        assert_eq!(count_matches("expensive", PRICING_KEYWORDS), 2);
    }

    #[test]
    fn test_top_keywords_tie_break_is_first_occurrence() {
        let mut items = Vec::new();
        items.extend(std::iter::repeat("slow delivery").take(5));
        items.extend(std::iter::repeat("too expensive").take(5));
        items.extend(std::iter::repeat("a bug").take(3));
        let toks = tokens(&items);

        let top = top_keywords(&toks, PAIN_POINT_KEYWORDS, 3);
        assert_eq!(top, vec!["slow", "expensive", "bug"]);

        // same counts, opposite arrival order
        let mut reversed = Vec::new();
        reversed.extend(std::iter::repeat("too expensive").take(5));
        reversed.extend(std::iter::repeat("slow delivery").take(5));
        reversed.extend(std::iter::repeat("a bug").take(3));
        let top = top_keywords(&tokens(&reversed), PAIN_POINT_KEYWORDS, 3);
        assert_eq!(top, vec!["expensive", "slow", "bug"]);
    }

    #[test]
    fn test_frequencies_within_token_follow_table_order() {
        // "issue" precedes "slow" in the table even though "slow" comes first in the text
        let freq = keyword_frequencies(&tokens(&["slow issue"]), PAIN_POINT_KEYWORDS);
        assert_eq!(freq, vec![("issue", 1), ("slow", 1)]);
    }

    #[test]
    fn test_all_products_flattened_in_catalog_order() {
        let products: Vec<_> = all_products().collect();
        assert_eq!(products.first(), Some(&"bread"));
        assert_eq!(products.last(), Some(&"burger"));
        assert_eq!(products.len(), 29);
    }
}
