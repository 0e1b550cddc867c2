//! Binding between URN kinds and the entity types they address.
//!
//! An entity type declares a fixed `(namespace, collection)` pair through
//! [`SupportsUrn`] and exposes its own URN through [`HasUrn`]. The helpers
//! here check URNs against those declarations and look entities up by URN.

use std::fmt;

use crate::{Urn, UrnError};

/// A `(namespace, collection)` pair naming a kind of entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UrnKind {
    pub namespace: &'static str,
    pub collection: &'static str,
}

impl UrnKind {
    #[must_use]
    pub const fn new(namespace: &'static str, collection: &'static str) -> Self {
        Self {
            namespace,
            collection,
        }
    }

    /// Returns true if `urn` has this kind's namespace and collection.
    #[must_use]
    pub fn matches(&self, urn: &Urn) -> bool {
        urn.namespace() == self.namespace && urn.collection() == self.collection
    }
}

impl fmt::Display for UrnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.collection)
    }
}

/// Anything that carries its own URN.
pub trait HasUrn {
    fn urn(&self) -> &Urn;
}

impl HasUrn for Urn {
    fn urn(&self) -> &Urn {
        self
    }
}

/// An entity type addressed by URNs of one fixed kind.
///
/// Usually implemented through [`supports_urn!`](crate::supports_urn).
pub trait SupportsUrn: HasUrn {
    /// Namespace every URN for this type carries.
    const URN_NAMESPACE: &'static str;

    /// Collection every URN for this type carries.
    const URN_COLLECTION: &'static str;

    #[must_use]
    fn urn_kind() -> UrnKind {
        UrnKind::new(Self::URN_NAMESPACE, Self::URN_COLLECTION)
    }

    /// Builds a URN of this type's kind from a raw identifier.
    fn urn_for(identifier: impl fmt::Display) -> Result<Urn, UrnError> {
        Urn::build(Self::URN_NAMESPACE, Self::URN_COLLECTION, identifier)
    }
}

/// Returns true if `urn` addresses entities of type `T`.
#[must_use]
pub fn is_a<T: SupportsUrn + ?Sized>(urn: &Urn) -> bool {
    urn.namespace() == T::URN_NAMESPACE && urn.collection() == T::URN_COLLECTION
}

/// Passes `urn` through if it addresses `T`, otherwise fails with
/// [`UrnError::TypeMismatch`].
pub fn ensure_urn_is_for_type<T: SupportsUrn + ?Sized>(urn: Urn) -> Result<Urn, UrnError> {
    if is_a::<T>(&urn) {
        return Ok(urn);
    }
    Err(UrnError::TypeMismatch {
        expected: format!(
            "a URN of type [{}:{}]",
            T::URN_NAMESPACE,
            T::URN_COLLECTION
        ),
        actual: urn.to_string(),
    })
}

/// Passes `urn` through if it matches any of `supported`, otherwise fails
/// with [`UrnError::UnsupportedType`].
pub fn ensure_urn_is_any_of(urn: Urn, supported: &[UrnKind]) -> Result<Urn, UrnError> {
    if supported.iter().any(|kind| kind.matches(&urn)) {
        return Ok(urn);
    }
    Err(UrnError::UnsupportedType {
        urn: urn.to_string(),
        supported: supported
            .iter()
            .map(UrnKind::to_string)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Returns the first item whose URN equals `target`, in iteration order.
pub fn find_by_urn<'a, T, I>(target: &Urn, items: I) -> Option<&'a T>
where
    T: HasUrn + ?Sized + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().find(|item| item.urn() == target)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::supports_urn;

    #[derive(Debug, PartialEq)]
    struct Widget {
        urn: Urn,
        name: &'static str,
    }

    supports_urn!(Widget, "unittest", "widgets", urn);

    impl Widget {
        fn new(identifier: &str, name: &'static str) -> Self {
            Self {
                urn: Widget::urn_for(identifier).unwrap(),
                name,
            }
        }
    }

    struct Gadget {
        urn: Urn,
    }

    supports_urn!(Gadget, "unittest", "gadgets", urn);

    #[test]
    fn test_is_a() {
        let urn = Urn::build("unittest", "widgets", "1").unwrap();
        assert!(is_a::<Widget>(&urn));
        assert!(urn.is_a::<Widget>());
        assert!(!is_a::<Gadget>(&urn));

        let other = Urn::build("other", "widgets", "1").unwrap();
        assert!(!is_a::<Widget>(&other));
    }

    #[test]
    fn test_urn_for_uses_declared_kind() {
        let urn = Widget::urn_for(42).unwrap();
        assert_eq!(urn.to_string(), "unittest:widgets:42");
        assert_eq!(Widget::urn_kind(), UrnKind::new("unittest", "widgets"));
        assert_eq!(Widget::urn_kind().to_string(), urn.partial_urn());
    }

    #[test]
    fn test_ensure_urn_is_for_type() {
        let urn = Urn::build("unittest", "widgets", "1").unwrap();
        assert_eq!(ensure_urn_is_for_type::<Widget>(urn.clone()).unwrap(), urn);

        let other = Urn::build("other", "widgets", "1").unwrap();
        let err = ensure_urn_is_for_type::<Widget>(other).unwrap_err();
        assert!(matches!(err, UrnError::TypeMismatch { .. }));
        let message = err.to_string();
        assert!(message.contains("[unittest:widgets]"));
        assert!(message.contains("other:widgets:1"));
    }

    #[test]
    fn test_ensure_urn_is_any_of() {
        let supported = [Widget::urn_kind(), Gadget::urn_kind()];

        let gadget = Gadget {
            urn: Gadget::urn_for("7").unwrap(),
        };
        assert!(gadget.urn().is_a::<Gadget>());
        assert_eq!(
            ensure_urn_is_any_of(gadget.urn().clone(), &supported).unwrap(),
            *gadget.urn()
        );

        let other = Urn::build("unittest", "sprockets", "7").unwrap();
        let err = ensure_urn_is_any_of(other, &supported).unwrap_err();
        assert_eq!(
            err,
            UrnError::UnsupportedType {
                urn: "unittest:sprockets:7".to_string(),
                supported: "unittest:widgets, unittest:gadgets".to_string(),
            }
        );
    }

    #[test]
    fn test_find_by_urn() {
        let expected = Widget::new("foo", "expected");
        let others = vec![Widget::new("bar", "bar"), Widget::new("baz", "baz")];

        assert_eq!(find_by_urn(&expected.urn, &others), None);

        let empty: Vec<Widget> = Vec::new();
        assert_eq!(find_by_urn(&expected.urn, &empty), None);

        let all = vec![
            Widget::new("bar", "bar"),
            Widget::new("foo", "expected"),
            Widget::new("baz", "baz"),
        ];
        assert_eq!(find_by_urn(&expected.urn, &all), Some(&expected));
    }

    #[test]
    fn test_find_by_urn_returns_first_match() {
        let target = Widget::urn_for("dup").unwrap();
        let items = vec![Widget::new("dup", "first"), Widget::new("dup", "second")];
        assert_eq!(find_by_urn(&target, &items).map(|w| w.name), Some("first"));
    }

    #[test]
    fn test_find_by_urn_over_plain_urns() {
        let urns = [
            Urn::parse("ns:col:1").unwrap(),
            Urn::parse("ns:col:2").unwrap(),
        ];
        let target = Urn::build("ns", "col", "2").unwrap();
        assert_eq!(find_by_urn(&target, &urns), Some(&urns[1]));
    }
}
