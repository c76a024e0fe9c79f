//! The complete serializable spend signature.
//!
//! Wire layout, all integers as varints, scalars and points in their
//! canonical 32-byte encodings:
//!
//! ```text
//! varint(base) ‖ varint(exponent) ‖ masked_index_point
//!   ‖ membership proof (shape fixed by base/exponent) ‖ R ‖ s
//! ```
//!
//! Deserialization reconstructs the structural shape or fails with a decode
//! error; it performs no validity checking. Validity is established only by
//! [`crate::ringct::RingCt::verify`].

use core::fmt;

use curve25519_dalek::ristretto::RistrettoPoint;
use serde_derive::{Deserialize, Serialize};

use crate::proofs::bitmatrix::BitMatrixProof;
use crate::proofs::membership::MembershipProof;
use crate::signatures::multisig::MultiSignature;
use crate::util::cursor::{write_varint, ByteCursor};

/// The full wire artifact authorizing a spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpendSignature {
    /// Decomposition base of the anonymity ring.
    pub decomposition_base: usize,
    /// Decomposition exponent; ring size is `base^exponent`.
    pub decomposition_exponent: usize,
    /// `G·masked_index`, the public half of the net blinding difference.
    pub masked_index_point: RistrettoPoint,
    /// The one-out-of-many membership proof.
    pub signature: MembershipProof,
    /// The aggregate signature over all key-image secrets.
    pub multi_sig: MultiSignature,
}

impl SpendSignature {
    /// Serializes the signature into its wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_varint(&mut bytes, self.decomposition_base as u64);
        write_varint(&mut bytes, self.decomposition_exponent as u64);
        bytes.extend_from_slice(self.masked_index_point.compress().as_bytes());
        bytes.extend_from_slice(&self.signature.to_bytes());
        bytes.extend_from_slice(&self.multi_sig.to_bytes());
        bytes
    }

    /// Parses a signature from wire bytes, reconstructing the shape implied
    /// by the leading base and exponent.
    pub fn from_bytes(bytes: &[u8]) -> Result<SpendSignature, &'static str> {
        let mut cursor = ByteCursor::new(bytes);
        let decomposition_base = cursor.read_varint()? as usize;
        let decomposition_exponent = cursor.read_varint()? as usize;
        if decomposition_base < 2 || decomposition_exponent < 1 {
            return Err("Error::InvalidDecomposition");
        }
        let masked_index_point = cursor.read_point()?;

        let a = cursor.read_point()?;
        let c = cursor.read_point()?;
        let d = cursor.read_point()?;
        let f_matrix =
            cursor.read_scalar_matrix(decomposition_exponent, decomposition_base - 1)?;
        let f_trimmed = f_matrix.as_rows();
        let z_a = cursor.read_scalar()?;
        let z_c = cursor.read_scalar()?;
        let bit_proof = BitMatrixProof {
            A: a,
            C: c,
            D: d,
            f_trimmed,
            z_a,
            z_c,
        };

        let b = cursor.read_point()?;
        let g = cursor.read_pair_array(decomposition_exponent)?;
        let z = cursor.read_scalar()?;
        let signature = MembershipProof {
            bit_proof,
            B: b,
            G: g,
            z,
        };

        let multi_sig = MultiSignature {
            R: cursor.read_point()?,
            s: cursor.read_scalar()?,
        };
        if !cursor.finished() {
            return Err("Error::TrailingBytes");
        }

        Ok(SpendSignature {
            decomposition_base,
            decomposition_exponent,
            masked_index_point,
            signature,
            multi_sig,
        })
    }
}

impl fmt::Display for SpendSignature {
    /// Hex encoding of the wire bytes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.to_bytes()))
    }
}

// ------------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------------
