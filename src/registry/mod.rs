// 上游网关模块
// Companies House 开放 API 的认证调用与错误归一化

use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

use crate::config::Config;

pub mod model;

pub use model::{AdvancedSearchCriteria, DocumentContent};
use model::DocumentMetadata;

/// 上游调用的失败分类
///
/// 网关只返回这个枚举，调用方不需要再探测底层错误的形状。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// 凭证未配置，发请求之前就能发现
    MissingApiKey,
    NotFound,
    Unauthorized,
    /// 上游自身在限流，区别于本地配额
    RateLimited,
    /// 元数据里没有文书内容链接
    MissingDocumentLink,
    /// 传输失败、超时、解码失败或其他非 2xx 状态
    Upstream(String),
}

/// Companies House API 客户端
///
/// 认证用 API key 做 basic auth 用户名、密码为空，逐请求附加；
/// 凭证不出现在任何日志里。
pub struct RegistryClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl RegistryClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(config.upstream_timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.registry_api_url.trim_end_matches('/').to_string(),
            api_key: config.companies_house_api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str, RegistryError> {
        self.api_key.as_deref().ok_or(RegistryError::MissingApiKey)
    }

    /// 公司名称/编号搜索
    pub async fn search_companies(
        &self,
        query: &str,
        items_per_page: u32,
        start_index: u32,
    ) -> Result<Value, RegistryError> {
        let url = format!("{}/search/companies", self.base_url);
        self.get_json(
            &url,
            &[
                ("q", query.to_string()),
                ("items_per_page", items_per_page.to_string()),
                ("start_index", start_index.to_string()),
            ],
        )
        .await
    }

    /// 高级搜索，响应归一化成与普通搜索一致的结构
    pub async fn advanced_search(
        &self,
        criteria: &AdvancedSearchCriteria,
        items_per_page: u32,
        start_index: u32,
    ) -> Result<Value, RegistryError> {
        let url = format!("{}/advanced-search/companies", self.base_url);
        let mut params = vec![
            ("items_per_page", items_per_page.to_string()),
            ("start_index", start_index.to_string()),
        ];
        match criteria {
            AdvancedSearchCriteria::SicCodes(codes) => params.push(("sic_codes", codes.clone())),
            AdvancedSearchCriteria::NatureOfBusiness(text) => {
                params.push(("nature_of_business", text.clone()))
            }
        }

        let raw = self.get_json(&url, &params).await?;
        // 高级搜索接口用 hits 表示总数，这里对齐普通搜索的字段名
        Ok(json!({
            "items": raw.get("items").cloned().unwrap_or_else(|| json!([])),
            "total_results": raw.get("hits").cloned().unwrap_or_else(|| json!(0)),
            "items_per_page": items_per_page,
            "start_index": start_index,
        }))
    }

    /// 公司基本信息
    pub async fn company_profile(&self, company_number: &str) -> Result<Value, RegistryError> {
        let url = format!("{}/company/{}", self.base_url, company_number);
        self.get_json(&url, &[]).await
    }

    /// 申报历史
    pub async fn filing_history(
        &self,
        company_number: &str,
        items_per_page: u32,
        start_index: u32,
    ) -> Result<Value, RegistryError> {
        let url = format!("{}/company/{}/filing-history", self.base_url, company_number);
        self.get_json(
            &url,
            &[
                ("items_per_page", items_per_page.to_string()),
                ("start_index", start_index.to_string()),
            ],
        )
        .await
    }

    /// 高管列表
    pub async fn officers(
        &self,
        company_number: &str,
        items_per_page: u32,
        start_index: u32,
    ) -> Result<Value, RegistryError> {
        let url = format!("{}/company/{}/officers", self.base_url, company_number);
        self.get_json(
            &url,
            &[
                ("items_per_page", items_per_page.to_string()),
                ("start_index", start_index.to_string()),
            ],
        )
        .await
    }

    /// 文书下载：先取元数据，再取 links.document 指向的内容
    pub async fn document(&self, metadata_url: &str) -> Result<DocumentContent, RegistryError> {
        let raw = self.get_json(metadata_url, &[]).await?;
        let metadata: DocumentMetadata =
            serde_json::from_value(raw).map_err(|err| RegistryError::Upstream(err.to_string()))?;
        let content_url = metadata
            .links
            .and_then(|links| links.document)
            .ok_or(RegistryError::MissingDocumentLink)?;

        let response = self
            .http
            .get(&content_url)
            .basic_auth(self.api_key()?, Some(""))
            .header(header::ACCEPT, "application/pdf")
            .send()
            .await
            .map_err(|err| RegistryError::Upstream(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("application/pdf")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| RegistryError::Upstream(err.to_string()))?;

        Ok(DocumentContent {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, RegistryError> {
        let mut request = self
            .http
            .get(url)
            .basic_auth(self.api_key()?, Some(""))
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|err| RegistryError::Upstream(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<Value>()
                .await
                .map_err(|err| RegistryError::Upstream(err.to_string()));
        }
        Err(Self::status_error(status, response).await)
    }

    async fn status_error(status: StatusCode, response: reqwest::Response) -> RegistryError {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("registry responded {}: {}", status, body);
        match status {
            StatusCode::NOT_FOUND => RegistryError::NotFound,
            StatusCode::UNAUTHORIZED => RegistryError::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => RegistryError::RateLimited,
            other => RegistryError::Upstream(format!("unexpected status {}", other)),
        }
    }
}
