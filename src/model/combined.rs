//! # Hypothesis Environments
//!
//! A hypothesis replaces the reference bases in `[replace_start, replace_end)`
//! with an alternative allele. [`HypothesisTemplate`] presents the edited
//! sequence in the reference's own coordinate frame, shifted by the length
//! change after the replaced region, and [`CombinedEnvironment`] pairs it with
//! a read.

use crate::data::Base;
use crate::error::{AllPathsError, Result};
use crate::model::environment::{base_at, Environment};

/// Reference with one region substituted.
#[derive(Clone, Copy, Debug)]
pub struct HypothesisTemplate<'a> {
    reference: &'a [Base],
    replace_start: usize,
    replace_end: usize,
    hypothesis: &'a [Base],
}

impl<'a> HypothesisTemplate<'a> {
    pub fn new(reference: &'a [Base], replace_start: usize, replace_end: usize, hypothesis: &'a [Base]) -> Result<Self> {
        if replace_start > replace_end || replace_end > reference.len() {
            return Err(AllPathsError::invalid_data(format!(
                "replaced region [{}, {}) is not within a reference of length {}",
                replace_start,
                replace_end,
                reference.len()
            )));
        }
        Ok(Self {
            reference,
            replace_start,
            replace_end,
            hypothesis,
        })
    }

    pub fn replace_start(&self) -> usize {
        self.replace_start
    }

    pub fn replace_end(&self) -> usize {
        self.replace_end
    }

    /// Length change introduced by the hypothesis.
    pub fn delta(&self) -> isize {
        self.hypothesis.len() as isize - (self.replace_end - self.replace_start) as isize
    }

    pub fn len(&self) -> usize {
        (self.reference.len() as isize + self.delta()) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Base at `position` of the edited sequence; `N` outside it.
    pub fn base(&self, position: isize) -> Base {
        let start = self.replace_start as isize;
        let hyp_end = start + self.hypothesis.len() as isize;
        if position < start {
            base_at(self.reference, position)
        } else if position < hyp_end {
            self.hypothesis[(position - start) as usize]
        } else {
            base_at(self.reference, position - self.delta())
        }
    }
}

/// A read scored against a hypothesis-edited template.
#[derive(Clone, Debug)]
pub struct CombinedEnvironment<'a, E> {
    read_env: E,
    template: HypothesisTemplate<'a>,
    start: isize,
    max_shift: usize,
}

impl<'a, E: Environment> CombinedEnvironment<'a, E> {
    /// Reads mapped at or after the replaced region move with the length
    /// change; the band widens by its magnitude so either placement stays
    /// reachable.
    pub fn new(read_env: E, template: HypothesisTemplate<'a>) -> Self {
        let delta = template.delta();
        let start = if read_env.start() >= template.replace_end() as isize {
            read_env.start() + delta
        } else {
            read_env.start()
        };
        let max_shift = read_env.max_shift() + delta.unsigned_abs();
        Self {
            read_env,
            template,
            start,
            max_shift,
        }
    }
}

impl<E: Environment> Environment for CombinedEnvironment<'_, E> {
    #[inline]
    fn read_length(&self) -> usize {
        self.read_env.read_length()
    }

    #[inline]
    fn read(&self, index: usize) -> Base {
        self.read_env.read(index)
    }

    #[inline]
    fn quality(&self, index: usize) -> f64 {
        self.read_env.quality(index)
    }

    #[inline]
    fn template(&self, position: isize) -> Base {
        self.template.base(position)
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
