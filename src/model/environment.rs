//! # Alignment Environment
//!
//! Positional access to read bases, read qualities, template bases and band
//! geometry. The DP engine only ever talks to this trait, so the same
//! recurrence scores a plain read against the reference, a read against a
//! hypothesis-substituted template, or a gapped read in canonical orientation.
//!
//! ## Coordinates
//! `start()` is the absolute template coordinate aligned with read position 0
//! on the naive diagonal. Template lookups use absolute coordinates and return
//! [`Base::N`] outside the known template.

use crate::data::{Base, MappedRead};
use crate::error::{AllPathsError, Result};

/// Read/template accessor consumed by the DP engine.
pub trait Environment {
    fn read_length(&self) -> usize;

    /// Read base at zero-based read position `index`.
    fn read(&self, index: usize) -> Base;

    /// Error probability of the base call at `index`.
    fn quality(&self, index: usize) -> f64;

    /// Template base at an absolute coordinate.
    fn template(&self, position: isize) -> Base;

    /// Band radius.
    fn max_shift(&self) -> usize;

    /// Absolute template coordinate of read position 0.
    fn start(&self) -> isize;

    /// Coordinate of the underlying template for an offset from `start()`.
    /// Differs from `start() + relative` only for views that remap positions.
    fn absolute_template_position(&self, relative: isize) -> isize {
        self.start() + relative
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn read_length(&self) -> usize {
        (**self).read_length()
    }

    fn read(&self, index: usize) -> Base {
        (**self).read(index)
    }

    fn quality(&self, index: usize) -> f64 {
        (**self).quality(index)
    }

    fn template(&self, position: isize) -> Base {
        (**self).template(position)
    }

    fn max_shift(&self) -> usize {
        (**self).max_shift()
    }

    fn start(&self) -> isize {
        (**self).start()
    }

    fn absolute_template_position(&self, relative: isize) -> isize {
        (**self).absolute_template_position(relative)
    }
}

/// Base lookup with `N` outside `[0, len)`.
#[inline]
pub(crate) fn base_at(seq: &[Base], position: isize) -> Base {
    if position < 0 {
        return Base::N;
    }
    seq.get(position as usize).copied().unwrap_or(Base::N)
}

/// A real read aligned against a reference window.
#[derive(Clone, Debug)]
pub struct ReadEnvironment<'a> {
    read: &'a [Base],
    quality: Vec<f64>,
    template: &'a [Base],
    start: isize,
    max_shift: usize,
}

impl<'a> ReadEnvironment<'a> {
    /// `quality` holds error probabilities, one per read base.
    pub fn new(
        read: &'a [Base],
        quality: Vec<f64>,
        template: &'a [Base],
        start: isize,
        max_shift: usize,
    ) -> Result<Self> {
        if read.len() != quality.len() {
            return Err(AllPathsError::invalid_data(format!(
                "read has {} bases but {} qualities",
                read.len(),
                quality.len()
            )));
        }
        if let Some((i, q)) = quality
            .iter()
            .enumerate()
            .find(|(_, q)| !(0.0..=1.0).contains(*q))
        {
            return Err(AllPathsError::invalid_data(format!(
                "quality {} at read position {} is not a probability",
                q, i
            )));
        }
        Ok(Self {
            read,
            quality,
            template,
            start,
            max_shift,
        })
    }

    /// Environment for a mapped read against the full reference sequence it
    /// was mapped to.
    pub fn from_mapped_read(read: &'a MappedRead, reference: &'a [Base], max_shift: usize) -> Result<Self> {
        Self::new(
            &read.bases,
            read.error_probabilities(),
            reference,
            read.start as isize,
            max_shift,
        )
    }

    pub fn template_length(&self) -> usize {
        self.template.len()
    }
}

impl Environment for ReadEnvironment<'_> {
    #[inline]
    fn read_length(&self) -> usize {
        self.read.len()
    }

    #[inline]
    fn read(&self, index: usize) -> Base {
        self.read[index]
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.quality[index]
    }

    #[inline]
    fn template(&self, position: isize) -> Base {
        base_at(self.template, position)
    }

    #[inline]
    fn max_shift(&self) -> usize {
        self.max_shift
    }

    #[inline]
    fn start(&self) -> isize {
        self.start
    }
}
