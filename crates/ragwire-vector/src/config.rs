//! Index configuration.

/// Which search structure backs a collection.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum IndexKind {
    /// Exact brute-force scan over every stored vector.
    #[default]
    Flat,
    /// Approximate search over an HNSW graph.
    Hnsw(HnswConfig),
}

impl IndexKind {
    /// Short name used in logs and stats.
    pub fn name(&self) -> &'static str {
        match self {
            IndexKind::Flat => "flat",
            IndexKind::Hnsw(_) => "hnsw",
        }
    }
}

/// HNSW graph parameters.
///
/// These control the trade-off between recall, speed and memory.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HnswConfig {
    /// Maximum number of connections per element per layer. Default: 16.
    pub m: usize,

    /// Size of the candidate list during construction. Default: 200.
    pub ef_construction: usize,

    /// Size of the candidate list during search. Raised to `k` when smaller.
    /// Default: 100.
    pub ef_search: usize,

    /// Capacity hint for the graph.
    pub max_elements: usize,

    /// Insert batches with the graph's parallel insertion.
    pub parallel_construction: bool,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: 16,
            ef_construction: 200,
            ef_search: 100,
            max_elements: 100_000,
            parallel_construction: true,
        }
    }
}

impl HnswConfig {
    /// Lower recall, faster construction and search.
    pub fn fast() -> Self {
        Self {
            m: 8,
            ef_construction: 100,
            ef_search: 50,
            ..Self::default()
        }
    }

    /// Higher recall, slower construction and more memory.
    pub fn accurate() -> Self {
        Self {
            m: 32,
            ef_construction: 400,
            ef_search: 200,
            ..Self::default()
        }
    }

    /// Set the M parameter (connections per layer).
    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    /// Set the ef_search parameter.
    pub fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    pub(crate) fn validate(&self) -> crate::Result<()> {
        if self.m == 0 || self.ef_construction == 0 || self.max_elements == 0 {
            return Err(crate::Error::Configuration(
                "HNSW m, ef_construction and max_elements must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_kind_is_flat() {
        assert_eq!(IndexKind::default(), IndexKind::Flat);
        assert_eq!(IndexKind::Hnsw(HnswConfig::default()).name(), "hnsw");
    }

    #[test]
    fn test_hnsw_presets() {
        let fast = HnswConfig::fast();
        let accurate = HnswConfig::accurate();

        assert!(fast.m < accurate.m);
        assert!(fast.ef_construction < accurate.ef_construction);
    }

    #[test]
    fn test_zero_m_rejected() {
        assert!(HnswConfig::default().with_m(0).validate().is_err());
    }
}
