//! Engine-wide tunables, threaded through constructors as a plain struct
//! rather than global state (spec §A: "mirrors the teacher's pattern of a
//! small `Config`-style struct").

/// Construction-time knobs for the solver. No env/file layer sits in front
/// of this — callers build one and pass it in, the way
/// `tsp_solvers::held_karp_mod` takes its parameters directly.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Nearest neighbors scanned per node during the pricer's partial pass
    /// (spec §4.6: "enumerate its 50 nearest neighbors").
    pub pricer_partial_neighbors: usize,
    /// PH-ratio threshold below which a separator round is abandoned
    /// (spec §4.3/§4.4: `ε_PH ≈ 0.01`).
    pub ph_epsilon: f64,
    /// Smallest chunk size considered by the local-cuts separator.
    pub local_cuts_min_chunk: usize,
    /// Largest chunk size considered by the local-cuts separator.
    pub local_cuts_max_chunk: usize,
    /// Whether the safe-GMI separator is enabled. Off by default: it needs
    /// tableau-row access that not every `LpOracle` backend exposes (spec
    /// §6 `init_mir_data`, §7 `ConfigDisabled`).
    pub safe_gmi_enabled: bool,
    /// Tolerance used by `weak_eliminate` and the light-tooth threshold in
    /// the simple-DP separator (spec §4.5: "slack < 0.5").
    pub light_tooth_slack: f64,
    /// Iteration cap on strong branching pivots per candidate/direction
    /// (spec §4.7).
    pub strong_branch_iter_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pricer_partial_neighbors: 50,
            ph_epsilon: 0.01,
            local_cuts_min_chunk: 8,
            local_cuts_max_chunk: 16,
            safe_gmi_enabled: false,
            light_tooth_slack: 0.5,
            strong_branch_iter_limit: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.pricer_partial_neighbors, 50);
        assert!(!cfg.safe_gmi_enabled);
        assert!((cfg.ph_epsilon - 0.01).abs() < 1e-12);
    }
}
