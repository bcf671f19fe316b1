use serde::{Deserialize, Serialize};

use crate::canonical::to_canonical_bytes;
use crate::crypto::{hash::sha256, Hash, Hashable, PrivateKey, PublicKey, Signature};
use crate::time::TimestampSeconds;

/// Fields that get signed: everything except the signature itself and the
/// transient runtime flags (`is_from_peer`, `is_confirmed`).
#[derive(Serialize)]
struct SignPayload<'a> {
    saddr: &'a Option<PublicKey>,
    raddr: &'a PublicKey,
    amount: u64,
    timestamp: TimestampSeconds,
}

/// Fields that get hashed for the transaction's identity: the sign payload
/// plus the signature, still excluding transient flags.
#[derive(Serialize)]
struct HashPayload<'a> {
    saddr: &'a Option<PublicKey>,
    raddr: &'a PublicKey,
    amount: u64,
    timestamp: TimestampSeconds,
    signature: &'a Option<Signature>,
}

/// A transfer of value from `saddr` to `raddr`, or - when `saddr` is absent -
/// a system reward (mining reward or airdrop).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Transaction {
    /// Sender; absent for system rewards.
    pub saddr: Option<PublicKey>,
    pub raddr: PublicKey,
    pub amount: u64,
    pub timestamp: TimestampSeconds,
    pub signature: Option<Signature>,

    /// Set when this transaction arrived over the network rather than being
    /// submitted locally. Never part of the hash, set at most once.
    #[serde(skip, default)]
    pub is_from_peer: bool,
    /// Set once this transaction is first observed inside an appended block.
    #[serde(skip, default)]
    pub is_confirmed: bool,
}

impl Transaction {
    pub fn new_unsigned(
        saddr: Option<PublicKey>,
        raddr: PublicKey,
        amount: u64,
        timestamp: TimestampSeconds,
    ) -> Self {
        Transaction {
            saddr,
            raddr,
            amount,
            timestamp,
            signature: None,
            is_from_peer: false,
            is_confirmed: false,
        }
    }

    /// Build a system reward transaction (mining reward or airdrop): no
    /// sender, no signature.
    pub fn new_reward(raddr: PublicKey, amount: u64, timestamp: TimestampSeconds) -> Self {
        Transaction::new_unsigned(None, raddr, amount, timestamp)
    }

    fn sign_payload_bytes(&self) -> Vec<u8> {
        to_canonical_bytes(&SignPayload {
            saddr: &self.saddr,
            raddr: &self.raddr,
            amount: self.amount,
            timestamp: self.timestamp,
        })
    }

    /// Sign this transaction with `key`. The caller is responsible for
    /// ensuring `key`'s public half matches `self.saddr`.
    pub fn sign(&mut self, key: &PrivateKey) {
        let payload = self.sign_payload_bytes();
        self.signature = Some(key.sign(&payload));
    }

    /// A transaction verifies if it carries no sender (a reward, checked
    /// elsewhere for forgery) or if its signature matches `saddr` over the
    /// sign payload.
    pub fn verify_sign(&self) -> bool {
        match (&self.saddr, &self.signature) {
            (None, _) => true,
            (Some(saddr), Some(sig)) => sig.verify(saddr, &self.sign_payload_bytes()),
            (Some(_), None) => false,
        }
    }

    pub fn is_reward(&self) -> bool {
        self.saddr.is_none()
    }

    pub fn to_summary(&self) -> TransactionSummary {
        TransactionSummary {
            hash: self.hash(),
            saddr: self.saddr,
            raddr: self.raddr,
            amount: self.amount,
            timestamp: self.timestamp,
            signature: self.signature,
            is_confirmed: self.is_confirmed,
        }
    }
}

impl Hashable for Transaction {
    fn hash(&self) -> Hash {
        let payload = HashPayload {
            saddr: &self.saddr,
            raddr: &self.raddr,
            amount: self.amount,
            timestamp: self.timestamp,
            signature: &self.signature,
        };
        sha256(&to_canonical_bytes(&payload))
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.hash() == other.hash()
    }
}
impl Eq for Transaction {}

/// Wire shape of a transaction, as exchanged between peers and returned by
/// read endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub hash: Hash,
    pub saddr: Option<PublicKey>,
    pub raddr: PublicKey,
    pub amount: u64,
    pub timestamp: TimestampSeconds,
    pub signature: Option<Signature>,
    pub is_confirmed: bool,
}
