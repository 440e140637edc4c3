use lazy_static::lazy_static;
use scraper::{Html, Selector};
use serde_json::Value;

lazy_static! {
    static ref LD_JSON_SELECTOR: Selector = Selector::parse("script[type='application/ld+json']").unwrap();
}

/// Every JSON-LD object in the document, flattening top-level arrays and `@graph`.
fn ld_objects(document: &Html) -> Vec<Value> {
    let mut objects = Vec::new();
    for script in document.select(&LD_JSON_SELECTOR) {
        let Ok(json) = serde_json::from_str::<Value>(script.text().collect::<String>().trim()) else {
            continue;
        };
        let items = match json {
            Value::Array(arr) => arr,
            other => vec![other],
        };
        for item in items {
            match item.get("@graph") {
                Some(Value::Array(graph)) => objects.extend(graph.iter().cloned()),
                _ => objects.push(item),
            }
        }
    }
    objects
}

/// Keywords from the first JSON-LD object carrying them, either as a
/// comma-separated string or as an array.
pub fn extract_keywords(document: &Html) -> Vec<String> {
    for object in ld_objects(document) {
        let keywords: Vec<String> = match object.get("keywords") {
            Some(Value::String(s)) => s.split(',').map(|k| k.trim().to_string()).collect(),
            Some(Value::Array(arr)) => arr
                .iter()
                .filter_map(|k| k.as_str())
                .map(|k| k.trim().to_string())
                .collect(),
            _ => continue,
        };
        let keywords: Vec<String> = keywords.into_iter().filter(|k| !k.is_empty()).collect();
        if !keywords.is_empty() {
            return keywords;
        }
    }
    Vec::new()
}

pub fn extract_date_published(document: &Html) -> Option<String> {
    ld_objects(document)
        .iter()
        .find_map(|o| o.get("datePublished").and_then(|d| d.as_str()).map(|d| d.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_string_and_array() {
        let doc = Html::parse_document(
            r#"<script type="application/ld+json">{"@type":"NewsArticle","keywords":"ev, batteries ,"}</script>"#,
        );
        assert_eq!(extract_keywords(&doc), vec!["ev", "batteries"]);

        let doc = Html::parse_document(
            r#"<script type="application/ld+json">[{"@type":"WebPage"},{"keywords":["Earnings","Guidance"]}]</script>"#,
        );
        assert_eq!(extract_keywords(&doc), vec!["Earnings", "Guidance"]);
    }

    #[test]
    fn test_graph_date_published() {
        let doc = Html::parse_document(
            r#"<script type="application/ld+json">{"@graph":[{"@type":"Organization"},{"datePublished":"2024-03-05T10:00:00Z"}]}</script>"#,
        );
        assert_eq!(extract_date_published(&doc).as_deref(), Some("2024-03-05T10:00:00Z"));
    }

    #[test]
    fn test_broken_json_is_ignored() {
        let doc = Html::parse_document(r#"<script type="application/ld+json">{not json</script>"#);
        assert!(extract_keywords(&doc).is_empty());
        assert!(extract_date_published(&doc).is_none());
    }
}
