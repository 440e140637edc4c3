use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

pub const MAX_TOPICS: usize = 3;

pub const BUSINESS_TOPICS: &[&str] = &[
    "Stock Market", "Innovation", "Revenue", "Profit", "Loss",
    "Investment", "Expansion", "Regulations", "Competition", "Product Launch",
    "Partnership", "Acquisition", "Layoffs", "Sustainability", "Growth",
    "Technology", "Leadership", "Electric Vehicles", "Autonomous Vehicles", "Renewable Energy",
];

/// Picks up to three topic labels for an article.
///
/// Extracted keywords come first (title-cased), then vocabulary labels found in
/// the text. When neither yields anything, three vocabulary labels are drawn
/// with an RNG seeded from the text so the same article always gets the same
/// topics.
#[derive(Debug, Default, Clone, Copy)]
pub struct TopicExtractor;

impl TopicExtractor {
    pub fn extract(&self, text: &str, keywords: &[String]) -> Vec<String> {
        let mut topics: Vec<String> = keywords
            .iter()
            .filter(|k| !k.trim().is_empty())
            .take(MAX_TOPICS)
            .map(|k| title_case(k.trim()))
            .collect();

        let text_lower = text.to_lowercase();
        for topic in BUSINESS_TOPICS {
            if text_lower.contains(&topic.to_lowercase()) && !topics.iter().any(|t| t == topic) {
                topics.push(topic.to_string());
            }
        }

        if topics.is_empty() {
            let mut rng = StdRng::seed_from_u64(fnv1a(text.as_bytes()));
            topics = BUSINESS_TOPICS
                .choose_multiple(&mut rng, MAX_TOPICS)
                .map(|t| t.to_string())
                .collect();
        }

        topics.truncate(MAX_TOPICS);
        topics
    }
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf29ce484222325, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(0x100000001b3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("electric vehicles"), "Electric Vehicles");
        assert_eq!(title_case("EV-maker"), "Ev-Maker");
        assert_eq!(title_case("q3 earnings"), "Q3 Earnings");
    }

    #[test]
    fn test_keywords_come_first() {
        let topics = TopicExtractor.extract(
            "The company announced an acquisition and strong revenue.",
            &keywords(&["tesla", "battery"]),
        );
        assert_eq!(topics, vec!["Tesla", "Battery", "Revenue"]);
    }

    #[test]
    fn test_only_first_three_keywords() {
        let topics = TopicExtractor.extract("", &keywords(&["a", "b", "c", "d"]));
        assert_eq!(topics, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_vocabulary_matches_in_order() {
        let topics = TopicExtractor.extract(
            "Layoffs follow the acquisition; the stock market shrugged. Growth slows.",
            &[],
        );
        assert_eq!(topics, vec!["Stock Market", "Acquisition", "Layoffs"]);
    }

    #[test]
    fn test_keyword_already_in_vocabulary_is_not_repeated() {
        let topics = TopicExtractor.extract("Growth and innovation", &keywords(&["growth"]));
        assert_eq!(topics, vec!["Growth", "Innovation"]);
    }

    #[test]
    fn test_random_fallback_is_bounded_and_stable() {
        let text = "Nothing relevant in here at all.";
        let first = TopicExtractor.extract(text, &[]);
        assert_eq!(first.len(), 3);
        assert!(first.iter().all(|t| BUSINESS_TOPICS.contains(&t.as_str())));
        assert_eq!(TopicExtractor.extract(text, &[]), first);

        let empty = TopicExtractor.extract("", &keywords(&["  "]));
        assert_eq!(empty.len(), 3);
    }
}
