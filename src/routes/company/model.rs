use serde::Deserialize;

/// 申报历史接口的分页参数
#[derive(Debug, Deserialize)]
pub struct FilingHistoryQuery {
    pub items_per_page: Option<u32>,
    pub start_index: Option<u32>,
}
