/// Whether an adapter's row mapping reflects its source.
///
/// A `Dirty` mapping is rebuilt from scratch on the next read. Resets only
/// mark the mapping dirty, so a burst of resets costs a single rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MappingState {
    Clean,
    Dirty,
}

impl MappingState {
    pub(crate) fn is_dirty(self) -> bool {
        self == MappingState::Dirty
    }
}
