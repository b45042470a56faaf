//! Safe Gomory mixed-integer separator (spec §4.3 step 10, §6): in the
//! original, builds MIR cuts from the current tableau's fractional basic
//! rows, only in sparse mode and only if safe GMI was compiled in.
//!
//! [`crate::lp::LpOracle`] never exposes tableau rows — every other
//! assumed-external primitive this crate needed a concrete stand-in for
//! (min cut, the simplex itself) got one; this one is left as the
//! documented gap spec §6 calls out by name (`init_mir_data for tableau
//! rows (only if safe GMI enabled)`), since fabricating tableau-row access
//! on the trait just to feed this one separator would go beyond what the
//! rest of the engine needs. Always reports [`crate::error::EngineError::ConfigDisabled`];
//! the pivot loop treats that as a recoverable "this feature isn't
//! available" signal (spec §7) and continues the separator pipeline.

use crate::error::EngineError;
use crate::hypergraph::HyperGraph;
use crate::sep::{SeparationContext, Separator};

pub struct SafeGmiSeparator;

impl Separator for SafeGmiSeparator {
    fn name(&self) -> &'static str {
        "safe_gmi"
    }

    fn separate(&mut self, _ctx: &SeparationContext<'_>) -> crate::error::EngineResult<Vec<HyperGraph>> {
        Err(EngineError::ConfigDisabled("safe_gmi"))
    }
}
