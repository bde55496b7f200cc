use thiserror::Error;

/// Errors reported by [`SmallAny`](crate::SmallAny) operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Typed access asked for a type other than the stored one, or the container was empty.
    #[error("bad cast: requested `{requested}`, but the container holds `{held}`")]
    BadCast {
        /// Name of the requested type.
        requested: &'static str,
        /// Name of the stored type, or `empty`.
        held: &'static str,
    },
    /// A feature operation was applied to an empty container.
    #[error("no value in container for operator `{op}`")]
    Empty {
        /// The operator that was applied.
        op: &'static str,
    },
    /// A feature operation was applied to containers holding different types.
    #[error("operator `{op}` applied to different types: `{lhs}` and `{rhs}`")]
    TypeMismatch {
        /// The operator that was applied.
        op: &'static str,
        /// Type held by the left operand.
        lhs: &'static str,
        /// Type held by the right operand.
        rhs: &'static str,
    },
    /// The stored value was erased without `Clone` and cannot be duplicated.
    #[error("trying to clone non-cloneable type `{type_name}`")]
    NotCloneable {
        /// Name of the stored type.
        type_name: &'static str,
    },
}
