//! 具名 GraphQL 查詢模板。
//!
//! 模板語法：
//! - `{{tag}}`：由 `QueryBuilder::replace_tag` 填入，未設定時移除
//! - `{{#region}} ... {{/region}}`：由 `QueryBuilder::with_include_region` 決定保留或刪除
//! - `...FragmentName`：fragment 展開，`load_fragments` 時自動從 `fragments/` 載入定義
//!
//! `snippets/` 放的是非完整定義的片段，例如遞迴展開用的 `RecurseItems`。

use crate::utils::error::{PcaError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Query,
    Fragment,
    Snippet,
}

impl TemplateKind {
    fn directory(self) -> Option<&'static str> {
        match self {
            TemplateKind::Query => None,
            TemplateKind::Fragment => Some("fragments"),
            TemplateKind::Snippet => Some("snippets"),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateKind::Query => "query",
            TemplateKind::Fragment => "fragment",
            TemplateKind::Snippet => "snippet",
        };
        f.write_str(name)
    }
}

pub trait TemplateSource: Send + Sync + fmt::Debug {
    fn load(&self, kind: TemplateKind, name: &str) -> Result<String>;
}

fn not_found(kind: TemplateKind, name: &str) -> PcaError {
    PcaError::TemplateNotFound {
        kind: kind.to_string(),
        name: name.to_string(),
    }
}

macro_rules! embedded {
    ($dir:literal; $($name:literal),* $(,)?) => {
        &[$(($name, include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/queries/", $dir, $name, ".graphql")))),*]
    };
}

static QUERIES: &[(&str, &str)] = embedded!("";
    "BinaryComponentByCmUri",
    "BinaryComponentById",
    "BinaryComponentByUrl",
    "ComponentPresentation",
    "ComponentPresentations",
    "EntityModelById",
    "ItemQuery",
    "Keyword",
    "Keywords",
    "PageByCmUri",
    "PageById",
    "PageByUrl",
    "PageModelById",
    "PageModelByUrl",
    "Pages",
    "Publication",
    "PublicationMapping",
    "Publications",
    "ResolveBinaryLink",
    "ResolveComponentLink",
    "ResolveDynamicComponentLink",
    "ResolvePageLink",
    "Sitemap",
    "SitemapSubtree",
    "SitemapSubtreeNoRecurse",
    "StructureGroup",
    "StructureGroups",
);

static FRAGMENTS: &[(&str, &str)] = embedded!("fragments/";
    "BinaryComponentFields",
    "CategoryFields",
    "ComponentFields",
    "ComponentPresentationFields",
    "CustomMetaFields",
    "ItemFields",
    "KeywordFields",
    "PageFields",
    "PageItemFields",
    "PublicationFields",
    "RawContentFields",
    "StructureGroupFields",
    "TaxonomyItemFields",
);

static SNIPPETS: &[(&str, &str)] = embedded!("snippets/"; "RecurseItems");

/// 編譯進 crate 的模板（`queries/` 目錄）
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    pub fn names(kind: TemplateKind) -> impl Iterator<Item = &'static str> {
        Self::table(kind).iter().map(|(name, _)| *name)
    }

    fn table(kind: TemplateKind) -> &'static [(&'static str, &'static str)] {
        match kind {
            TemplateKind::Query => QUERIES,
            TemplateKind::Fragment => FRAGMENTS,
            TemplateKind::Snippet => SNIPPETS,
        }
    }
}

impl TemplateSource for EmbeddedTemplates {
    fn load(&self, kind: TemplateKind, name: &str) -> Result<String> {
        Self::table(kind)
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, text)| text.to_string())
            .ok_or_else(|| not_found(kind, name))
    }
}

/// 從目錄讀取模板，找不到時退回內建模板。
/// 目錄結構與 `queries/` 相同：`<root>/<Name>.graphql`、`<root>/fragments/`、`<root>/snippets/`
#[derive(Debug, Clone)]
pub struct DirectoryTemplates {
    root: PathBuf,
    fallback: EmbeddedTemplates,
}

impl DirectoryTemplates {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: EmbeddedTemplates,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, kind: TemplateKind, name: &str) -> PathBuf {
        let mut path = self.root.clone();
        if let Some(dir) = kind.directory() {
            path.push(dir);
        }
        path.push(format!("{}.graphql", name));
        path
    }
}

impl TemplateSource for DirectoryTemplates {
    fn load(&self, kind: TemplateKind, name: &str) -> Result<String> {
        // 名稱只允許識別字，避免跳出模板目錄
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(not_found(kind, name));
        }

        let path = self.path_for(kind, name);
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::debug!("Loaded {} template '{}' from {}", kind, name, path.display());
                Ok(text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => self.fallback.load(kind, name),
            Err(e) => Err(PcaError::IoError(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_queries_are_present() {
        let templates = EmbeddedTemplates;
        for name in EmbeddedTemplates::names(TemplateKind::Query) {
            let text = templates.load(TemplateKind::Query, name).unwrap();
            assert!(text.trim_start().starts_with("query"), "{} is not a query", name);
        }
        for name in EmbeddedTemplates::names(TemplateKind::Fragment) {
            let text = templates.load(TemplateKind::Fragment, name).unwrap();
            assert!(
                text.contains(&format!("fragment {} on", name)),
                "{} does not define itself",
                name
            );
        }
    }

    #[test]
    fn test_unknown_template() {
        let err = EmbeddedTemplates
            .load(TemplateKind::Query, "NoSuchQuery")
            .unwrap_err();
        match err {
            PcaError::TemplateNotFound { kind, name } => {
                assert_eq!(kind, "query");
                assert_eq!(name, "NoSuchQuery");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_directory_override_and_fallback() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("fragments")).unwrap();
        std::fs::write(
            dir.path().join("fragments/PageFields.graphql"),
            "fragment PageFields on Page { url }",
        )
        .unwrap();

        let templates = DirectoryTemplates::new(dir.path());
        assert_eq!(
            templates.load(TemplateKind::Fragment, "PageFields").unwrap(),
            "fragment PageFields on Page { url }"
        );
        // 目錄沒有的模板使用內建版本
        assert!(templates
            .load(TemplateKind::Query, "PageById")
            .unwrap()
            .contains("pageId: $pageId"));
    }

    #[test]
    fn test_directory_rejects_path_like_names() {
        let dir = TempDir::new().unwrap();
        let templates = DirectoryTemplates::new(dir.path());
        assert!(templates.load(TemplateKind::Query, "../secrets").is_err());
        assert!(templates.load(TemplateKind::Query, "").is_err());
    }
}
