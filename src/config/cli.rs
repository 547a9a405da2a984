use crate::config::toml_config::TomlConfig;
use crate::domain::cm_uri::CmUri;
use crate::domain::model::{
    Ancestor, ContentIncludeMode, ContentNamespace, ContentType, DataModelType, DcpType,
    FilterItemType, PageInclusion,
};
use crate::utils::error::{PcaError, Result};
use crate::utils::validation::Validate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pca")]
#[command(about = "Query a public content GraphQL service from the command line")]
pub struct CliConfig {
    /// TOML 配置檔
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// 覆寫配置檔中的 client.endpoint
    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_enum, default_value = "sites")]
    pub namespace: ContentNamespace,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// 載入配置檔（若有指定）並套用命令列覆寫
    pub fn load_config(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) if !path.is_file() => {
                return Err(PcaError::ConfigError {
                    message: format!("config file {} does not exist", path.display()),
                })
            }
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.client.endpoint = Some(endpoint.clone());
        }
        if let Some(timeout) = self.timeout_seconds {
            config.client.timeout_seconds = Some(timeout);
        }
        config.validate()?;
        Ok(config)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            crate::utils::validation::validate_url("--endpoint", endpoint)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            crate::utils::validation::validate_range("--timeout-seconds", timeout, 1, 600)?;
        }
        Ok(())
    }
}

/// 內容請求共用的參數
#[derive(Debug, Clone, Args)]
pub struct ContentArgs {
    #[arg(long)]
    pub custom_meta_filter: Option<String>,

    #[arg(long, value_enum, default_value = "include")]
    pub content: ContentIncludeMode,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// 以 id、URL 或 CM URI 取得頁面
    #[command(group(clap::ArgGroup::new("target").required(true)))]
    Page {
        #[arg(long)]
        publication_id: Option<i32>,
        #[arg(long, group = "target", requires = "publication_id")]
        page_id: Option<i32>,
        #[arg(long, group = "target", requires = "publication_id")]
        url: Option<String>,
        #[arg(long, group = "target")]
        cm_uri: Option<CmUri>,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// 列出符合 URL 的頁面
    Pages {
        #[arg(long)]
        url: String,
        #[arg(long, default_value = "10")]
        first: i32,
        #[arg(long)]
        after: Option<String>,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// 以 id、URL 或 CM URI 取得 binary component
    #[command(group(clap::ArgGroup::new("target").required(true)))]
    Binary {
        #[arg(long)]
        publication_id: Option<i32>,
        #[arg(long, group = "target", requires = "publication_id")]
        binary_id: Option<i32>,
        #[arg(long, group = "target", requires = "publication_id")]
        url: Option<String>,
        #[arg(long, group = "target")]
        cm_uri: Option<CmUri>,
        #[arg(long)]
        custom_meta_filter: Option<String>,
    },
    /// 依條件查詢項目
    Items {
        #[arg(long = "item-type", value_enum)]
        item_types: Vec<FilterItemType>,
        #[arg(long = "publication-id")]
        publication_ids: Vec<i32>,
        #[arg(long, default_value = "10")]
        first: i32,
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        container_items: bool,
        #[command(flatten)]
        content: ContentArgs,
    },
    Publication {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        custom_meta_filter: Option<String>,
    },
    Publications {
        #[arg(long, default_value = "10")]
        first: i32,
        #[arg(long)]
        after: Option<String>,
        #[arg(long)]
        custom_meta_filter: Option<String>,
    },
    PageLink {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        page_id: i32,
        #[arg(long)]
        relative: bool,
    },
    ComponentLink {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        component_id: i32,
        #[arg(long)]
        source_page_id: Option<i32>,
        #[arg(long)]
        exclude_template_id: Option<i32>,
        #[arg(long)]
        relative: bool,
    },
    BinaryLink {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        binary_id: i32,
        #[arg(long)]
        variant_id: Option<String>,
        #[arg(long)]
        relative: bool,
    },
    DynamicComponentLink {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        page_id: i32,
        #[arg(long)]
        component_id: i32,
        #[arg(long)]
        template_id: i32,
        #[arg(long)]
        relative: bool,
    },
    /// 由網址找出所屬 publication
    Mapping {
        #[arg(long)]
        site_url: String,
    },
    #[command(group(clap::ArgGroup::new("target").required(true)))]
    PageModel {
        #[arg(long)]
        publication_id: i32,
        #[arg(long, group = "target")]
        page_id: Option<i32>,
        #[arg(long, group = "target")]
        url: Option<String>,
        #[arg(long, value_enum, default_value = "model")]
        content_type: ContentType,
        #[arg(long, value_enum, default_value = "r2")]
        model_type: DataModelType,
        #[arg(long, value_enum, default_value = "include")]
        page_inclusion: PageInclusion,
        #[arg(long, value_enum, default_value = "include")]
        content: ContentIncludeMode,
    },
    EntityModel {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        entity_id: i32,
        #[arg(long)]
        template_id: i32,
        #[arg(long, value_enum, default_value = "model")]
        content_type: ContentType,
        #[arg(long, value_enum, default_value = "r2")]
        model_type: DataModelType,
        #[arg(long, value_enum, default_value = "default")]
        dcp_type: DcpType,
        #[arg(long, value_enum, default_value = "include")]
        content: ContentIncludeMode,
    },
    ComponentPresentation {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        component_id: i32,
        #[arg(long)]
        template_id: i32,
        #[command(flatten)]
        content: ContentArgs,
    },
    /// 依 schema 或 template 列出 component presentations
    ComponentPresentations {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        schema_id: Option<i32>,
        #[arg(long)]
        template_id: Option<i32>,
        #[arg(long, default_value = "10")]
        first: i32,
        #[arg(long)]
        after: Option<String>,
        #[command(flatten)]
        content: ContentArgs,
    },
    Keywords {
        #[arg(long)]
        publication_id: i32,
        #[arg(long, default_value = "10")]
        first: i32,
        #[arg(long)]
        after: Option<String>,
    },
    Keyword {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        category_id: i32,
        #[arg(long)]
        keyword_id: i32,
    },
    StructureGroups {
        #[arg(long)]
        publication_id: i32,
        #[arg(long, default_value = "10")]
        first: i32,
        #[arg(long)]
        after: Option<String>,
    },
    StructureGroup {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        structure_group_id: i32,
    },
    Sitemap {
        #[arg(long)]
        publication_id: i32,
        #[arg(long, default_value = "1")]
        levels: u32,
    },
    SitemapSubtree {
        #[arg(long)]
        publication_id: i32,
        #[arg(long)]
        node_id: Option<String>,
        #[arg(long, default_value = "1")]
        levels: u32,
        #[arg(long, value_enum, default_value = "none")]
        ancestor: Ancestor,
    },
    /// 透過 introspection 列出 schema 型別
    Schema,
    /// 執行任意 GraphQL 查詢檔
    Query {
        #[arg(long)]
        file: PathBuf,
        /// JSON 物件格式的變數
        #[arg(long)]
        variables: Option<String>,
        #[arg(long)]
        operation_name: Option<String>,
    },
}
