use std::error::Error;
use std::iter::FusedIterator;

/// Iterator over an error and its `source()` chain, outermost first.
///
/// Created by [`StructuredError::chain`](crate::StructuredError::chain) or
/// [`ErrorChainExt::chain`](crate::traits::ErrorChainExt::chain).
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Chain<'a> {
    /// Starts a chain at `head`.
    #[inline]
    pub fn new(head: &'a (dyn Error + 'static)) -> Self {
        Self { next: Some(head) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Error + 'static);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl FusedIterator for Chain<'_> {}
