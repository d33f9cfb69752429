use thiserror::Error;

/// Errors reported by the checked position operations of [`AvlTreeMap`].
///
/// [`AvlTreeMap`]: crate::AvlTreeMap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The position is the past-the-end sentinel and refers to no entry.
    #[error("position is past the end of the map")]
    End,
    /// The position was obtained from a different map.
    #[error("position belongs to a different map")]
    ForeignMap,
    /// The entry the position referred to has been removed.
    #[error("position refers to a removed entry")]
    Stale,
}
