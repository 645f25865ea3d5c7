use crate::core::alias_index::AliasIndex;
use crate::core::feed_parser::extract_items;
use crate::core::matcher::match_item;
use crate::domain::model::{
    CatalogEntry, FeedItem, MatchedArticle, ModelRecord, OutputDocument, Source, SourceFeed,
};
use chrono::{SecondsFormat, Utc};
use std::collections::{HashMap, HashSet};

/// 每個型號最多保留的文章數
pub const MAX_ARTICLES_PER_MODEL: usize = 5;

/// 逐來源累積比對結果，最後組成輸出文件
pub struct Aggregator {
    catalog: Vec<CatalogEntry>,
    index: AliasIndex,
    articles: HashMap<String, Vec<MatchedArticle>>,
}

impl Aggregator {
    pub fn new(catalog: Vec<CatalogEntry>) -> Self {
        let index = AliasIndex::build(&catalog);
        Self {
            catalog,
            index,
            articles: HashMap::new(),
        }
    }

    /// 回傳此批項目產生的比對數
    pub fn ingest(&mut self, source_name: &str, items: &[FeedItem]) -> usize {
        let mut matched = 0;
        for item in items {
            for key in match_item(item, &self.index) {
                self.articles
                    .entry(key.to_string())
                    .or_default()
                    .push(MatchedArticle::from_item(source_name, item));
                matched += 1;
            }
        }
        matched
    }

    pub fn ingest_feed(&mut self, feed: &SourceFeed) -> usize {
        let items = extract_items(&feed.body);
        let matched = self.ingest(&feed.source.name, &items);
        tracing::info!(
            source = %feed.source.name,
            items = items.len(),
            matched,
            "📰 Processed feed"
        );
        matched
    }

    /// 依型號鍵去重（首筆優先），附上前幾篇文章，別名不輸出
    pub fn finish(mut self, total_sources: usize, updated_at: String) -> OutputDocument {
        let mut seen = HashSet::new();
        let mut models = Vec::new();

        for mut entry in self.catalog {
            let key = entry.key();
            if !seen.insert(key.clone()) {
                continue;
            }

            let mut sources = self.articles.remove(&key).unwrap_or_default();
            sources.truncate(MAX_ARTICLES_PER_MODEL);
            // 種子中同名的 sources 欄位會被比對結果覆蓋
            entry.attributes.remove("sources");

            models.push(ModelRecord {
                entry: CatalogEntry {
                    aliases: None,
                    ..entry
                },
                sources,
            });
        }

        OutputDocument {
            updated_at,
            total_sources,
            models,
        }
    }
}

/// UTC ISO-8601，毫秒精度，`Z` 結尾
pub fn generation_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 純函式版本：(目錄, 來源清單, 已抓取內容) -> 輸出文件
pub fn aggregate(
    catalog: Vec<CatalogEntry>,
    sources: &[Source],
    feeds: &[SourceFeed],
    updated_at: String,
) -> OutputDocument {
    let mut aggregator = Aggregator::new(catalog);
    for feed in feeds {
        aggregator.ingest_feed(feed);
    }
    aggregator.finish(sources.len(), updated_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(value: serde_json::Value) -> Vec<CatalogEntry> {
        serde_json::from_value(value).unwrap()
    }

    fn source(name: &str) -> Source {
        Source {
            name: name.to_string(),
            url: format!("https://{}.example.com/rss", name.to_lowercase()),
        }
    }

    fn feed(name: &str, items: &[(&str, &str)]) -> SourceFeed {
        let body = items
            .iter()
            .map(|(title, link)| format!("<item><title>{}</title><link>{}</link></item>", title, link))
            .collect::<Vec<_>>()
            .join("\n");
        SourceFeed {
            source: source(name),
            body: format!("<rss><channel>{}</channel></rss>", body),
        }
    }

    #[test]
    fn test_pixel_scenario() {
        let catalog = catalog(serde_json::json!([
            {"model": "Pixel 9", "aliases": ["Pixel9"]},
            {"model": "iPhone 16"}
        ]));
        let sources = vec![source("Verge")];
        let feeds = vec![feed("Verge", &[("Google Pixel9 review", "https://x/1")])];

        let doc = aggregate(catalog, &sources, &feeds, "2024-10-01T00:00:00.000Z".to_string());

        assert_eq!(doc.total_sources, 1);
        assert_eq!(doc.models.len(), 2);
        assert_eq!(
            doc.models[0].sources,
            vec![MatchedArticle {
                source: "Verge".to_string(),
                title: "Google Pixel9 review".to_string(),
                link: "https://x/1".to_string(),
                published_at: None,
            }]
        );
        assert!(doc.models[1].sources.is_empty());
    }

    #[test]
    fn test_articles_are_capped_in_discovery_order() {
        let catalog = catalog(serde_json::json!([{"model": "Galaxy S24"}]));
        let items: Vec<(String, String)> = (1..=8)
            .map(|i| (format!("Galaxy S24 story {}", i), format!("https://x/{}", i)))
            .collect();
        let borrowed: Vec<(&str, &str)> =
            items.iter().map(|(t, l)| (t.as_str(), l.as_str())).collect();
        let sources = vec![source("A")];
        let feeds = vec![feed("A", &borrowed)];

        let doc = aggregate(catalog, &sources, &feeds, generation_timestamp());

        let links: Vec<&str> = doc.models[0].sources.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://x/1", "https://x/2", "https://x/3", "https://x/4", "https://x/5"]
        );
    }

    #[test]
    fn test_duplicate_seed_entries_keep_first() {
        let catalog = catalog(serde_json::json!([
            {"model": "Pixel 9", "brand": "Google", "aliases": ["P9"]},
            {"model": "PIXEL 9", "brand": "Other", "aliases": ["Pixel Nine"]}
        ]));
        let sources = vec![source("A")];
        let feeds = vec![feed(
            "A",
            &[("Pixel Nine teased", "https://x/1"), ("Pixel 9 launch", "https://x/2")],
        )];

        let doc = aggregate(catalog, &sources, &feeds, generation_timestamp());

        assert_eq!(doc.models.len(), 1);
        assert_eq!(doc.models[0].entry.attributes["brand"], "Google");
        // 第二筆的別名不參與比對，同一篇文章也只記錄一次
        let links: Vec<&str> = doc.models[0].sources.iter().map(|a| a.link.as_str()).collect();
        assert_eq!(links, vec!["https://x/2"]);
    }

    #[test]
    fn test_every_article_title_contains_a_match_string() {
        let catalog = catalog(serde_json::json!([
            {"model": "Pixel 9", "aliases": ["Pixel9"]},
            {"model": "iPhone 16", "aliases": ["iPhone16"]}
        ]));
        let sources = vec![source("A"), source("B")];
        let feeds = vec![
            feed("A", &[("PIXEL9 hands-on", "https://a/1"), ("Unrelated", "https://a/2")]),
            feed("B", &[("iphone16 vs pixel 9", "https://b/1")]),
        ];

        let index = AliasIndex::build(&catalog);
        let doc = aggregate(catalog, &sources, &feeds, generation_timestamp());

        for model in &doc.models {
            let key = model.entry.key();
            let strings = &index
                .entries()
                .iter()
                .find(|entry| entry.key == key)
                .unwrap()
                .aliases;
            for article in &model.sources {
                let title = article.title.to_lowercase();
                assert!(
                    strings.iter().any(|s| title.contains(s.as_str())),
                    "unexpected article {:?} for {}",
                    article.title,
                    model.entry.model
                );
            }
        }
        assert_eq!(doc.models[0].sources.len(), 2);
        assert_eq!(doc.models[1].sources.len(), 1);
        assert_eq!(doc.models[1].sources[0].source, "B");
    }

    #[test]
    fn test_total_sources_counts_configured_not_fetched() {
        let catalog = catalog(serde_json::json!([{"model": "Pixel 9"}]));
        let sources = vec![source("A"), source("B"), source("C")];
        let feeds = vec![feed("A", &[("Pixel 9 deal", "https://a/1")])];

        let doc = aggregate(catalog, &sources, &feeds, generation_timestamp());

        assert_eq!(doc.total_sources, 3);
        assert_eq!(doc.models[0].sources.len(), 1);
    }

    #[test]
    fn test_same_inputs_differ_only_in_timestamp() {
        let make = |ts: &str| {
            let catalog = catalog(serde_json::json!([
                {"model": "Pixel 9", "aliases": ["Pixel9"]},
                {"model": "iPhone 16"}
            ]));
            let sources = vec![source("A")];
            let feeds = vec![feed("A", &[("Pixel9 and iPhone 16", "https://a/1")])];
            aggregate(catalog, &sources, &feeds, ts.to_string())
        };

        let first = make("2024-10-01T00:00:00.000Z");
        let second = make("2024-10-02T00:00:00.000Z");

        assert_ne!(first.updated_at, second.updated_at);
        assert_eq!(first.models, second.models);
        assert_eq!(first.total_sources, second.total_sources);
    }

    #[test]
    fn test_generation_timestamp_format() {
        let ts = generation_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
