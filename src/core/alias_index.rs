use crate::domain::model::CatalogEntry;
use std::collections::HashSet;

/// 單一型號的比對字串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub key: String,
    pub aliases: Vec<String>,
}

/// 型號鍵 -> 小寫比對字串集合，依目錄首次出現順序排列
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    entries: Vec<AliasEntry>,
}

impl AliasIndex {
    /// 重複的型號鍵只保留第一筆，後續重複項目的別名不會加入
    pub fn build(catalog: &[CatalogEntry]) -> Self {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for entry in catalog {
            let key = entry.key();
            if !seen.insert(key.clone()) {
                tracing::debug!(model = %entry.model, "Duplicate catalog model ignored for matching");
                continue;
            }

            let mut aliases = vec![key.clone()];
            for alias in entry.aliases() {
                let alias = alias.to_lowercase();
                // 空白別名會比對到所有標題
                if alias.trim().is_empty() || aliases.contains(&alias) {
                    continue;
                }
                aliases.push(alias);
            }

            entries.push(AliasEntry { key, aliases });
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }
}
