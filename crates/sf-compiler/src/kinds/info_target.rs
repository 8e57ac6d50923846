use sf_core::{EntityKind, Schema};

/// `info_target`: a named position for other entities to point at, such as
/// a teleport destination. Compiles to nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoTarget;

impl EntityKind for InfoTarget {
    fn type_name(&self) -> &str {
        "info_target"
    }

    fn description(&self) -> &str {
        "marks a position"
    }

    fn schema(&self) -> Schema {
        Schema::entity()
    }
}
