//! # Inverted Gap Environment
//!
//! Complete Genomics reads from the opposite arm carry their machine gaps at
//! the right end. Reversing both the read and the template window turns such
//! a read into canonical left-gap orientation, so the gapped recurrence only
//! has to handle one layout.
//!
//! The template is mirrored around the read's expected span: coordinate
//! `start + k` of the inverted view is coordinate `start + span - 1 - k` of
//! the inner environment. Bases are not complemented; the alignment score
//! only depends on base identity.

use crate::data::Base;
use crate::model::environment::Environment;

/// Mirror image of another environment.
#[derive(Clone, Debug)]
pub struct InvertedGapEnvironment<E> {
    inner: E,
    span: usize,
}

impl<E: Environment> InvertedGapEnvironment<E> {
    /// `span` is the number of template bases the read is expected to cover
    /// from `inner.start()`.
    pub fn new(inner: E, span: usize) -> Self {
        Self { inner, span }
    }
}

impl<E: Environment> Environment for InvertedGapEnvironment<E> {
    #[inline]
    fn read_length(&self) -> usize {
        self.inner.read_length()
    }

    #[inline]
    fn read(&self, index: usize) -> Base {
        self.inner.read(self.inner.read_length() - 1 - index)
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.inner.quality(self.inner.read_length() - 1 - index)
    }

    #[inline]
    fn template(&self, position: isize) -> Base {
        let mirror = 2 * self.inner.start() + self.span as isize - 1;
        self.inner.template(mirror - position)
    }

    #[inline]
    fn max_shift(&self) -> usize {
        self.inner.max_shift()
    }

    #[inline]
    fn start(&self) -> isize {
        self.inner.start()
    }

    fn absolute_template_position(&self, relative: isize) -> isize {
        self.inner.absolute_template_position(self.span as isize - 1 - relative)
    }
}
