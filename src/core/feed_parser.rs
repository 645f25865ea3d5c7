//! 寬鬆的 RSS 項目擷取。
//!
//! 不是完整的 XML 解析器：只找出 `<item>` 區塊，再分別擷取標題、連結與發佈日期。
//! 缺少標題或連結的項目直接略過。

use crate::domain::model::FeedItem;
use once_cell::sync::Lazy;
use regex::Regex;

static ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<item(?:\s[^>]*)?>(.*?)</item>").expect("valid item regex"));
static TITLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<title>(?:<!\[CDATA\[)?(.*?)(?:\]\]>)?</title>").expect("valid title regex")
});
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<link>(.*?)</link>").expect("valid link regex"));
static PUB_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<pubDate>(.*?)</pubDate>").expect("valid pubDate regex"));

fn capture_trimmed(re: &Regex, block: &str) -> Option<String> {
    re.captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// 依文件順序擷取所有有效項目
pub fn extract_items(xml: &str) -> Vec<FeedItem> {
    ITEM_RE
        .captures_iter(xml)
        .filter_map(|caps| caps.get(1))
        .filter_map(|block| parse_item(block.as_str()))
        .collect()
}

fn parse_item(block: &str) -> Option<FeedItem> {
    let title = capture_trimmed(&TITLE_RE, block)?;
    let link = capture_trimmed(&LINK_RE, block)?;

    Some(FeedItem {
        title,
        link,
        published_at: capture_trimmed(&PUB_DATE_RE, block),
    })
}
