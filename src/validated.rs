/// A typed object that has been mapped from a payload and passed every
/// applicable constraint.
///
/// `Validated<T>` cannot be constructed outside this crate. The only producer
/// is [`ShapeRegistry::transform`](crate::ShapeRegistry::transform), which
/// wraps the object after a clean constraint pass. Handlers that take a
/// `Validated<T>` therefore never see an unvalidated form.
///
/// There is deliberately no `Deref`; use [`AsRef::as_ref`] or
/// [`into_inner`](Self::into_inner).
///
/// ```compile_fail
/// use case_pipeline::Validated;
///
/// let forged = Validated::new_unchecked(42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validated<T> {
    inner: T,
}

impl<T> Validated<T> {
    /// Wraps `value` without checking it.
    ///
    /// Callers must have run the shape's constraints first.
    pub(crate) fn new_unchecked(value: T) -> Self {
        Self { inner: value }
    }

    /// Consumes the wrapper and returns the object.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> AsRef<T> for Validated<T> {
    fn as_ref(&self) -> &T {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_ref_does_not_consume() {
        let validated = Validated::new_unchecked(vec![1, 2, 3]);

        let first = validated.as_ref();
        let second = validated.as_ref();
        assert_eq!(first, second);

        assert_eq!(validated.into_inner(), vec![1, 2, 3]);
    }

    #[test]
    fn debug_names_the_wrapper() {
        let validated = Validated::new_unchecked("slot");
        assert!(format!("{:?}", validated).contains("Validated"));
    }
}
