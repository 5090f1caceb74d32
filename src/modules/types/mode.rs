//! Search mode definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported search ranking modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Keyword (term-frequency) ranking
    Keyword,
    /// Semantic (vector-similarity) ranking
    Semantic,
    /// Blended keyword + semantic ranking
    Hybrid,
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Keyword => write!(f, "keyword"),
            SearchMode::Semantic => write!(f, "semantic"),
            SearchMode::Hybrid => write!(f, "hybrid"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "keyword" | "bm25" => Ok(SearchMode::Keyword),
            "semantic" | "vector" => Ok(SearchMode::Semantic),
            "hybrid" => Ok(SearchMode::Hybrid),
            _ => Err(format!("Unknown search mode: {}", s)),
        }
    }
}

impl SearchMode {
    /// Returns all supported search modes
    pub fn all() -> &'static [SearchMode] {
        &[SearchMode::Keyword, SearchMode::Semantic, SearchMode::Hybrid]
    }

    /// Default blend weight for this mode.
    ///
    /// 0 is pure keyword ranking, 1 is pure semantic similarity; hybrid
    /// defaults to 0.7 to lean semantic while keeping keyword precision.
    pub fn default_alpha(&self) -> f64 {
        match self {
            SearchMode::Keyword => 0.0,
            SearchMode::Semantic => 1.0,
            SearchMode::Hybrid => 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!(SearchMode::from_str("keyword").unwrap(), SearchMode::Keyword);
        assert_eq!(SearchMode::from_str("bm25").unwrap(), SearchMode::Keyword);
        assert_eq!(SearchMode::from_str("semantic").unwrap(), SearchMode::Semantic);
        assert_eq!(SearchMode::from_str("vector").unwrap(), SearchMode::Semantic);
        assert_eq!(SearchMode::from_str("hybrid").unwrap(), SearchMode::Hybrid);
        assert!(SearchMode::from_str("unknown").is_err());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(SearchMode::Keyword.to_string(), "keyword");
        assert_eq!(SearchMode::Semantic.to_string(), "semantic");
        assert_eq!(SearchMode::Hybrid.to_string(), "hybrid");
    }

    #[test]
    fn test_mode_default_alpha() {
        assert_eq!(SearchMode::Keyword.default_alpha(), 0.0);
        assert_eq!(SearchMode::Semantic.default_alpha(), 1.0);
        assert_eq!(SearchMode::Hybrid.default_alpha(), 0.7);
    }

    #[test]
    fn test_mode_serde() {
        let json = serde_json::to_string(&SearchMode::Hybrid).unwrap();
        assert_eq!(json, "\"hybrid\"");

        let mode: SearchMode = serde_json::from_str("\"keyword\"").unwrap();
        assert_eq!(mode, SearchMode::Keyword);
    }
}
