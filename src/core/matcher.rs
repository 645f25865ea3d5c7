use crate::core::alias_index::AliasIndex;
use crate::domain::model::FeedItem;

/// 回傳標題提及的所有型號鍵（不挑最佳者）
pub fn match_item<'a>(item: &FeedItem, index: &'a AliasIndex) -> Vec<&'a str> {
    let title = item.title.to_lowercase();

    index
        .entries()
        .iter()
        .filter(|entry| entry.aliases.iter().any(|alias| title.contains(alias.as_str())))
        .map(|entry| entry.key.as_str())
        .collect()
}
