//! Query builders for congress.gov list endpoints.
//!
//! Both builders emit `(key, value)` pairs for unset-field-free query
//! strings; `api_key` and `format=json` are appended by the client.

/// Query for the `/member` roster listing.
#[derive(Debug, Clone, Default)]
pub struct MemberListQuery {
    pub congress: Option<u32>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    pub current_member: Option<bool>,
}

impl MemberListQuery {
    pub fn with_congress(mut self, congress: u32) -> Self {
        self.congress = Some(congress);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_current_member(mut self, current: bool) -> Self {
        self.current_member = Some(current);
        self
    }

    /// Build query parameter pairs, excluding unset fields.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(congress) = self.congress {
            params.push(("congress".to_string(), congress.to_string()));
        }
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(current) = self.current_member {
            params.push(("currentMember".to_string(), current.to_string()));
        }
        params
    }
}

/// Plain offset/limit page for per-member sub-listings.
#[derive(Debug, Clone, Default)]
pub struct PageQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn new(offset: i64, limit: i64) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(offset) = self.offset {
            params.push(("offset".to_string(), offset.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_query_default_empty() {
        assert!(MemberListQuery::default().to_query_pairs().is_empty());
    }

    #[test]
    fn member_query_full() {
        let pairs = MemberListQuery::default()
            .with_congress(119)
            .with_offset(250)
            .with_limit(250)
            .to_query_pairs();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.contains(&("congress".to_string(), "119".to_string())));
        assert!(pairs.contains(&("offset".to_string(), "250".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "250".to_string())));
    }

    #[test]
    fn member_query_current_member_flag() {
        let pairs = MemberListQuery::default()
            .with_current_member(true)
            .to_query_pairs();
        assert_eq!(
            pairs,
            vec![("currentMember".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn page_query_pairs() {
        let pairs = PageQuery::new(0, 1).to_query_pairs();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.contains(&("offset".to_string(), "0".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "1".to_string())));
    }
}
