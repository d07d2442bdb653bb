//! Groth16 proof verification over BN254.
//!
//! The ledger treats verification as an opaque accept/reject boundary; this
//! module is the concrete implementation behind it. Proof points travel as
//! compressed big-endian-agnostic byte strings (arkworks canonical
//! encoding); public inputs travel as 32-byte big-endian scalars and are
//! range-checked against the scalar field before use, since a reduced and an
//! unreduced encoding of the same value would verify differently.

use ark_bn254::{Bn254, Fr, G1Affine, G1Projective, G2Affine};
use ark_ec::pairing::Pairing;
use ark_ec::CurveGroup;
use ark_ff::{One, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use num_bigint::BigUint;

use crate::errors::Groth16Error;

/// Compressed G1 point length in bytes.
pub const COMPRESSED_G1_LEN: usize = 32;
/// Compressed G2 point length in bytes.
pub const COMPRESSED_G2_LEN: usize = 64;
/// Total length of a serialized proof: `A (G1) || B (G2) || C (G1)`.
pub const PROOF_LEN: usize = COMPRESSED_G1_LEN + COMPRESSED_G2_LEN + COMPRESSED_G1_LEN;

/// A Groth16 proof, deserialized and subgroup-checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Groth16Proof {
    /// Proof element A (G1).
    pub a: G1Affine,
    /// Proof element B (G2).
    pub b: G2Affine,
    /// Proof element C (G1).
    pub c: G1Affine,
}

impl Groth16Proof {
    /// Parse a proof from its 128-byte compressed wire form.
    ///
    /// Point decompression includes curve and subgroup checks; malformed
    /// points are rejected here rather than surfacing as pairing failures.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Groth16Error> {
        if bytes.len() != PROOF_LEN {
            return Err(Groth16Error::InvalidProofLength);
        }
        let a = G1Affine::deserialize_compressed(&bytes[..COMPRESSED_G1_LEN])
            .map_err(|_| Groth16Error::InvalidG1)?;
        let b = G2Affine::deserialize_compressed(
            &bytes[COMPRESSED_G1_LEN..COMPRESSED_G1_LEN + COMPRESSED_G2_LEN],
        )
        .map_err(|_| Groth16Error::InvalidG2)?;
        let c = G1Affine::deserialize_compressed(&bytes[COMPRESSED_G1_LEN + COMPRESSED_G2_LEN..])
            .map_err(|_| Groth16Error::InvalidG1)?;
        Ok(Self { a, b, c })
    }

    /// Serialize the proof to its compressed wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Groth16Error> {
        let mut out = Vec::with_capacity(PROOF_LEN);
        self.a
            .serialize_compressed(&mut out)
            .map_err(|_| Groth16Error::InvalidG1)?;
        self.b
            .serialize_compressed(&mut out)
            .map_err(|_| Groth16Error::InvalidG2)?;
        self.c
            .serialize_compressed(&mut out)
            .map_err(|_| Groth16Error::InvalidG1)?;
        Ok(out)
    }
}

/// Verifying key for one circuit.
///
/// `ic` must hold exactly one more point than the circuit has public inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16VerifyingKey {
    /// \[alpha\] in G1.
    pub alpha_g1: G1Affine,
    /// \[beta\] in G2.
    pub beta_g2: G2Affine,
    /// \[gamma\] in G2.
    pub gamma_g2: G2Affine,
    /// \[delta\] in G2.
    pub delta_g2: G2Affine,
    /// Input commitment bases; `ic[0]` is the constant term.
    pub ic: Vec<G1Affine>,
}

impl Groth16VerifyingKey {
    /// Number of public inputs this key expects.
    pub fn nr_pubinputs(&self) -> usize {
        self.ic.len().saturating_sub(1)
    }
}

/// Whether a 32-byte big-endian value is strictly below the BN254 scalar
/// field modulus.
pub fn is_less_than_bn254_field_size_be(bytes: &[u8; 32]) -> bool {
    let bigint = BigUint::from_bytes_be(bytes);
    bigint < Fr::MODULUS.into()
}

/// Fold the public inputs into the verifying key's input commitment:
/// `ic[0] + Σ input_i · ic[i + 1]`.
fn prepare_inputs(
    vk: &Groth16VerifyingKey,
    public_inputs: &[[u8; 32]],
) -> Result<G1Projective, Groth16Error> {
    if public_inputs.len() + 1 != vk.ic.len() {
        return Err(Groth16Error::InvalidPublicInputsLength);
    }

    let mut acc: G1Projective = vk.ic[0].into();
    for (input, base) in public_inputs.iter().zip(vk.ic.iter().skip(1)) {
        if !is_less_than_bn254_field_size_be(input) {
            return Err(Groth16Error::PublicInputGreaterThanFieldSize);
        }
        let scalar = Fr::from_be_bytes_mod_order(input);
        acc += *base * scalar;
    }
    Ok(acc)
}

/// Verify a Groth16 proof against public inputs assembled in circuit order.
///
/// The pairing product checked is
/// `e(-A, B) · e(prepared, gamma) · e(C, delta) · e(alpha, beta) = 1`.
///
/// Returns `Ok(true)` on acceptance; every rejection is an `Err` so callers
/// can distinguish malformed inputs from a failed pairing when debugging.
pub fn verify_groth16(
    proof: &Groth16Proof,
    public_inputs: &[[u8; 32]],
    vk: &Groth16VerifyingKey,
) -> Result<bool, Groth16Error> {
    let prepared = prepare_inputs(vk, public_inputs)?.into_affine();

    let pairing = Bn254::multi_pairing(
        [-proof.a, prepared, proof.c, vk.alpha_g1],
        [proof.b, vk.gamma_g2, vk.delta_g2, vk.beta_g2],
    );

    if pairing.0.is_one() {
        Ok(true)
    } else {
        Err(Groth16Error::ProofVerificationFailed)
    }
}
