//! Benchmark parameter types.
//!
//! Each type renders a compact Criterion benchmark id.

use std::fmt;

/// Parameters for a covering or renormalisation benchmark run.
#[derive(Clone, Debug)]
pub struct CoveringBenchParams {
    /// Short name of the synthetic network family.
    pub family: &'static str,
    /// Number of vertices in the network.
    pub vertex_count: usize,
    /// Box diameter `lB`.
    pub lb: usize,
}

impl fmt::Display for CoveringBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/n={},lB={}", self.family, self.vertex_count, self.lb)
    }
}

/// Parameters for a scaling-curve benchmark run.
#[derive(Clone, Debug)]
pub struct CurveBenchParams {
    /// Short name of the synthetic network family.
    pub family: &'static str,
    /// Number of vertices in the network.
    pub vertex_count: usize,
}

impl fmt::Display for CurveBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/n={}", self.family, self.vertex_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_name_family_size_and_diameter() {
        let params = CoveringBenchParams {
            family: "flower",
            vertex_count: 44,
            lb: 3,
        };
        assert_eq!(params.to_string(), "flower/n=44,lB=3");
        let curve = CurveBenchParams {
            family: "lattice",
            vertex_count: 100,
        };
        assert_eq!(curve.to_string(), "lattice/n=100");
    }
}
