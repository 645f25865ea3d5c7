use serde::{Deserialize, Serialize};

/// 種子目錄中的一筆手機規格
///
/// 除了 `model` 與 `aliases` 之外的欄位都是自由格式，
/// 數值、null 與巢狀物件都原樣帶到輸出。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub model: String,
    /// 只用於比對，不會輸出
    #[serde(default, skip_serializing)]
    pub aliases: Option<Vec<String>>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl CatalogEntry {
    /// 目錄識別鍵：小寫的型號名稱
    pub fn key(&self) -> String {
        self.model.to_lowercase()
    }

    pub fn aliases(&self) -> &[String] {
        self.aliases.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MatchedArticle {
    pub source: String,
    pub title: String,
    pub link: String,
    pub published_at: Option<String>,
}

impl MatchedArticle {
    pub fn from_item(source_name: &str, item: &FeedItem) -> Self {
        Self {
            source: source_name.to_string(),
            title: item.title.clone(),
            link: item.link.clone(),
            published_at: item.published_at.clone(),
        }
    }
}

/// 輸出中的單一型號：規格欄位加上比對到的文章
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelRecord {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub sources: Vec<MatchedArticle>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputDocument {
    pub updated_at: String,
    pub total_sources: usize,
    pub models: Vec<ModelRecord>,
}

/// 單一來源成功抓取的原始內容
#[derive(Debug, Clone)]
pub struct SourceFeed {
    pub source: Source,
    pub body: String,
}

/// extract 階段的產出
#[derive(Debug, Clone)]
pub struct ExtractResult {
    pub catalog: Vec<CatalogEntry>,
    pub sources: Vec<Source>,
    pub feeds: Vec<SourceFeed>,
}
