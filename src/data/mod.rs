//! # Data Module
//!
//! In-memory representations handed to the scoring core by the mapping and
//! calibration layers: encoded bases, qualities, mapped reads and the
//! sequencing machine type of a read group.

pub mod sequence;

use serde::{Deserialize, Serialize};

pub use sequence::{decode, encode, phred_to_error, Base, MappedRead};

/// Sequencing technology of a read group.
///
/// Gapped technologies produce reads whose arms are separated by a variable
/// machine gap or overlap and need the gapped recurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineType {
    #[default]
    Illumina,
    IonTorrent,
    CompleteGenomics,
}

impl MachineType {
    pub fn is_gapped(self) -> bool {
        matches!(self, MachineType::CompleteGenomics)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MachineType::Illumina => "illumina",
            MachineType::IonTorrent => "ion_torrent",
            MachineType::CompleteGenomics => "complete_genomics",
        }
    }
}
