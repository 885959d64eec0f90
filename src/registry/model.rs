use serde::Deserialize;

/// 高级搜索的筛选条件
#[derive(Debug, Clone)]
pub enum AdvancedSearchCriteria {
    /// SIC 行业代码，调用方已去除空白
    SicCodes(String),
    /// 经营范围描述
    NatureOfBusiness(String),
}

/// 文书元数据中的下载链接部分，其余字段原样忽略
#[derive(Debug, Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub links: Option<DocumentLinks>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentLinks {
    #[serde(default)]
    pub document: Option<String>,
}

/// 下载到的文书内容与其声明的类型
#[derive(Debug, Clone)]
pub struct DocumentContent {
    pub content_type: String,
    pub bytes: Vec<u8>,
}
