use serde::Deserialize;

/// 文书下载接口的查询参数
#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    /// 上游文书元数据地址
    pub url: Option<String>,
}
