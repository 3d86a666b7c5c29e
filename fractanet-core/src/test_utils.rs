//! Shared test utilities for `fractanet-core`.

use fractanet_test_support::{ci::property_test_profile::ProptestRunProfile, graphs::GraphFixture};
use proptest::test_runner::Config as ProptestConfig;

use crate::graph::Graph;

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `FRACTANET_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Builds a [`Graph`] from a shared edge-list fixture.
pub(crate) fn graph_of(fixture: GraphFixture) -> Graph {
    Graph::from_edges(fixture.vertex_count, fixture.edges).expect("fixture edges must be in range")
}
