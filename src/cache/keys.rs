// 缓存键生成
// 键由操作前缀加所有影响结果的参数拼成；末尾两段分页参数是纯数字，
// 因此带冒号的查询串也不会与其他参数组合撞键。

/// 搜索结果缓存键前缀
const SEARCH_PREFIX: &str = "search:";

/// 公司信息缓存键前缀
const COMPANY_PREFIX: &str = "company:";

/// 申报历史缓存键前缀
const FILING_PREFIX: &str = "filing:";

/// 高管列表缓存键前缀
const OFFICERS_PREFIX: &str = "officers:";

/// 生成搜索结果缓存键
pub fn search_cache_key(
    search_type: &str,
    query: &str,
    items_per_page: u32,
    start_index: u32,
) -> String {
    format!(
        "{}{}:{}:{}:{}",
        SEARCH_PREFIX, search_type, query, items_per_page, start_index
    )
}

/// 生成公司信息缓存键
pub fn company_cache_key(company_number: &str) -> String {
    format!("{}{}", COMPANY_PREFIX, company_number)
}

/// 生成申报历史缓存键
pub fn filing_history_cache_key(
    company_number: &str,
    items_per_page: u32,
    start_index: u32,
) -> String {
    format!(
        "{}{}:{}:{}",
        FILING_PREFIX, company_number, items_per_page, start_index
    )
}

/// 生成高管列表缓存键
pub fn officers_cache_key(company_number: &str, items_per_page: u32, start_index: u32) -> String {
    format!(
        "{}{}:{}:{}",
        OFFICERS_PREFIX, company_number, items_per_page, start_index
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_parameters_share_a_key() {
        assert_eq!(
            search_cache_key("name", "Tesco", 20, 0),
            search_cache_key("name", "Tesco", 20, 0)
        );
    }

    #[test]
    fn pagination_changes_the_key() {
        let base = filing_history_cache_key("00445790", 25, 0);
        assert_ne!(base, filing_history_cache_key("00445790", 25, 25));
        assert_ne!(base, filing_history_cache_key("00445790", 50, 0));
    }

    #[test]
    fn operations_never_collide_on_the_same_company() {
        let company = company_cache_key("00445790");
        let filing = filing_history_cache_key("00445790", 25, 0);
        let officers = officers_cache_key("00445790", 25, 0);
        assert_ne!(company, filing);
        assert_ne!(company, officers);
        assert_ne!(filing, officers);
    }

    #[test]
    fn search_type_and_query_are_both_significant() {
        assert_ne!(
            search_cache_key("name", "6202", 20, 0),
            search_cache_key("sic_code", "6202", 20, 0)
        );
        assert_ne!(
            search_cache_key("name", "Tesco", 20, 0),
            search_cache_key("name", "Sainsbury", 20, 0)
        );
    }

    #[test]
    fn colons_in_the_query_cannot_forge_pagination() {
        // 查询串里带冒号时，键仍与其他 (查询, 分页) 组合不同
        assert_ne!(
            search_cache_key("name", "a:5", 1, 2),
            search_cache_key("name", "a", 5, 1)
        );
    }
}
