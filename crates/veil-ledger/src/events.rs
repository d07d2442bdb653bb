//! Ledger event encoding.
//!
//! Events are the ledger's public audit trail: one `Registered` per accepted
//! commitment, one `Consumed` per accepted reveal. Encodings are a fixed
//! little-endian `u64` discriminator followed by a plain-old-data header;
//! `Consumed` appends a Borsh-serialized payload body behind a length field
//! so readers that only care about nullifiers can skip it.

use borsh::{BorshDeserialize, BorshSerialize};
use bytemuck::{Pod, Zeroable};
use num_enum::TryFromPrimitive;

/// Event discriminators, stable across versions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive, strum::IntoStaticStr)]
#[repr(u64)]
pub enum EventType {
    /// A commitment was appended to the accumulator.
    Registered = 1,
    /// A nullifier was consumed and its payload effect applied.
    Consumed = 2,
}

/// Fixed header of a `Registered` event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct RegisteredEventHeader {
    /// The appended commitment.
    pub commitment: [u8; 32],
    /// Leaf index assigned to the commitment.
    pub index: u64,
}

/// Fixed header of a `Consumed` event; a Borsh payload body follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ConsumedEventHeader {
    /// The nullifier hash that was marked spent.
    pub nullifier_hash: [u8; 32],
    /// Length in bytes of the payload body that follows the header.
    pub payload_len: u32,
    pub(crate) _padding: [u8; 4],
}

/// An emitted ledger event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent<P> {
    /// Commitment accepted at a leaf index.
    Registered {
        /// The appended commitment.
        commitment: [u8; 32],
        /// Leaf index assigned to the commitment.
        index: u64,
    },
    /// Nullifier consumed with its payload.
    Consumed {
        /// The nullifier hash that was marked spent.
        nullifier_hash: [u8; 32],
        /// The reveal payload the effect was applied with.
        payload: P,
    },
}

impl<P: BorshSerialize> LedgerEvent<P> {
    /// The event's discriminator.
    pub fn event_type(&self) -> EventType {
        match self {
            LedgerEvent::Registered { .. } => EventType::Registered,
            LedgerEvent::Consumed { .. } => EventType::Consumed,
        }
    }

    /// Encode the event to its wire form.
    pub fn to_event_bytes(&self) -> borsh::io::Result<Vec<u8>> {
        let mut out = Vec::new();
        out.extend_from_slice(&(self.event_type() as u64).to_le_bytes());
        match self {
            LedgerEvent::Registered { commitment, index } => {
                let header = RegisteredEventHeader {
                    commitment: *commitment,
                    index: *index,
                };
                out.extend_from_slice(bytemuck::bytes_of(&header));
            }
            LedgerEvent::Consumed {
                nullifier_hash,
                payload,
            } => {
                let body = borsh::to_vec(payload)?;
                let header = ConsumedEventHeader {
                    nullifier_hash: *nullifier_hash,
                    payload_len: body.len() as u32,
                    _padding: [0u8; 4],
                };
                out.extend_from_slice(bytemuck::bytes_of(&header));
                out.extend_from_slice(&body);
            }
        }
        Ok(out)
    }
}

impl<P: BorshDeserialize> LedgerEvent<P> {
    /// Decode an event from its wire form. Returns `None` for truncated
    /// buffers, unknown discriminators, or an undecodable payload body.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let (disc, rest) = bytes.split_at_checked(8)?;
        let disc = u64::from_le_bytes(disc.try_into().ok()?);
        match EventType::try_from(disc).ok()? {
            EventType::Registered => {
                if rest.len() != size_of::<RegisteredEventHeader>() {
                    return None;
                }
                // Wire buffers carry no alignment guarantee.
                let header: RegisteredEventHeader = bytemuck::pod_read_unaligned(rest);
                Some(LedgerEvent::Registered {
                    commitment: header.commitment,
                    index: header.index,
                })
            }
            EventType::Consumed => {
                let (header, body) = rest.split_at_checked(size_of::<ConsumedEventHeader>())?;
                let header: ConsumedEventHeader = bytemuck::pod_read_unaligned(header);
                if body.len() != header.payload_len as usize {
                    return None;
                }
                let payload = P::try_from_slice(body).ok()?;
                Some(LedgerEvent::Consumed {
                    nullifier_hash: header.nullifier_hash,
                    payload,
                })
            }
        }
    }
}
