//! Display names for erased types.

/// Returns a human-readable name for `T`, as reported by the compiler.
///
/// The name is meant for diagnostics only; its exact format is not stable across compiler
/// versions.
///
/// # Example
///
/// ```
/// use smallany::type_name;
///
/// assert_eq!(type_name::<u32>(), "u32");
/// assert!(type_name::<String>().ends_with("String"));
/// ```
#[inline]
pub fn type_name<T: ?Sized>() -> &'static str {
    core::any::type_name::<T>()
}
