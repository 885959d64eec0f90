use serde::Deserialize;

/// 搜索接口的查询参数
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// name（默认）、sic_code 或 nature_of_business
    pub search_type: Option<String>,
    pub items_per_page: Option<u32>,
    pub start_index: Option<u32>,
}
