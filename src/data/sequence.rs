//! # Sequence Symbols and Mapped Reads
//!
//! Base encoding shared by reads and templates, Phred conversion, and the
//! mapped-read record handed over by the alignment-record layer.

use crate::error::{AllPathsError, Result};

/// Nucleotide symbol. `N` (code 0) stands for any unknown or ambiguous base.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum Base {
    #[default]
    N = 0,
    A = 1,
    C = 2,
    G = 3,
    T = 4,
}

impl Base {
    /// Decode an ASCII nucleotide. IUPAC ambiguity codes map to `N`.
    pub fn from_ascii(byte: u8) -> Result<Self> {
        match byte.to_ascii_uppercase() {
            b'A' => Ok(Base::A),
            b'C' => Ok(Base::C),
            b'G' => Ok(Base::G),
            b'T' => Ok(Base::T),
            b'N' | b'R' | b'Y' | b'S' | b'W' | b'K' | b'M' | b'B' | b'D' | b'H' | b'V' => {
                Ok(Base::N)
            }
            other => Err(AllPathsError::invalid_data(format!(
                "not a nucleotide: {:?}",
                other as char
            ))),
        }
    }

    pub fn to_ascii(self) -> u8 {
        match self {
            Base::N => b'N',
            Base::A => b'A',
            Base::C => b'C',
            Base::G => b'G',
            Base::T => b'T',
        }
    }

    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub fn is_unknown(self) -> bool {
        self == Base::N
    }
}

/// Encode an ASCII sequence.
pub fn encode(seq: &[u8]) -> Result<Vec<Base>> {
    seq.iter().map(|&b| Base::from_ascii(b)).collect()
}

/// Render encoded bases back to a `String` (diagnostics and tests).
pub fn decode(bases: &[Base]) -> String {
    bases.iter().map(|b| b.to_ascii() as char).collect()
}

/// Convert a Phred score to a base-call error probability.
#[inline]
pub fn phred_to_error(phred: u8) -> f64 {
    10f64.powf(-(phred as f64) / 10.0)
}

/// A read placed on the reference by the mapping layer.
///
/// `start` is the zero-based reference coordinate of the first read base as
/// derived from the alignment record; `reverse` is the mapped strand. Bases are
/// always stored in reference orientation.
#[derive(Clone, Debug, PartialEq)]
pub struct MappedRead {
    pub name: String,
    pub bases: Vec<Base>,
    pub qualities: Vec<u8>,
    pub start: usize,
    pub reverse: bool,
}

impl MappedRead {
    pub fn new(
        name: impl Into<String>,
        bases: Vec<Base>,
        qualities: Vec<u8>,
        start: usize,
        reverse: bool,
    ) -> Result<Self> {
        if bases.len() != qualities.len() {
            return Err(AllPathsError::invalid_data(format!(
                "read has {} bases but {} qualities",
                bases.len(),
                qualities.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            bases,
            qualities,
            start,
            reverse,
        })
    }

    /// Build from ASCII bases and Phred+33 quality text.
    pub fn from_ascii(
        name: impl Into<String>,
        bases: &[u8],
        phred33: &[u8],
        start: usize,
        reverse: bool,
    ) -> Result<Self> {
        let qualities = phred33
            .iter()
            .map(|&q| {
                q.checked_sub(33).ok_or_else(|| {
                    AllPathsError::invalid_data(format!("quality character {:?} below '!'", q as char))
                })
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::new(name, encode(bases)?, qualities, start, reverse)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Per-base error probabilities.
    pub fn error_probabilities(&self) -> Vec<f64> {
        self.qualities.iter().map(|&q| phred_to_error(q)).collect()
    }
}
