//! Macros for binding entity types to URN kinds.

/// Macro to declare which URN kind an entity type is addressed by.
///
/// This generates:
/// - A [`SupportsUrn`](crate::SupportsUrn) impl with the namespace and
///   collection constants
/// - With a trailing field name, a [`HasUrn`](crate::HasUrn) impl returning
///   that field
///
/// # Example
///
/// ```ignore
/// pub struct Widget {
///     urn: Urn,
///     name: String,
/// }
///
/// supports_urn!(Widget, "acme", "widgets", urn);
///
/// let urn = Widget::urn_for("1")?;
/// assert!(urn.is_a::<Widget>());
/// ```
#[macro_export]
macro_rules! supports_urn {
    ($name:ty, $namespace:literal, $collection:literal) => {
        impl $crate::SupportsUrn for $name {
            const URN_NAMESPACE: &'static str = $namespace;
            const URN_COLLECTION: &'static str = $collection;
        }
    };
    ($name:ty, $namespace:literal, $collection:literal, $field:ident) => {
        $crate::supports_urn!($name, $namespace, $collection);

        impl $crate::HasUrn for $name {
            fn urn(&self) -> &$crate::Urn {
                &self.$field
            }
        }
    };
}
