use secp256k1::rand::RngCore;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256, Sha512};

use crate::error::WalletError;

/// XRPL family seeds are base58check with version byte 0x21 ('s' prefix).
const SEED_VERSION: u8 = 0x21;
/// Account IDs use version byte 0x00 ('r' prefix).
const ACCOUNT_VERSION: u8 = 0x00;
const SEED_ENTROPY_LEN: usize = 16;

/// Signing keypair reconstructed from (or generated with) a family seed.
#[derive(Debug, Clone)]
pub struct Keypair {
    pub address: String,
    pub secret: String,
    pub public_key: String,
    pub private_key: String,
    signing_key: SecretKey,
}

impl Keypair {
    /// Sign an arbitrary payload (the canonical transaction JSON) and return
    /// the DER signature as uppercase hex.
    pub fn sign(&self, payload: &str) -> String {
        let digest: [u8; 32] = Sha256::digest(payload.as_bytes()).into();
        let secp = Secp256k1::new();
        let msg = Message::from_digest(digest);
        let sig = secp.sign_ecdsa(&msg, &self.signing_key);
        hex::encode_upper(sig.serialize_der())
    }
}

/// Keypair/address derivation capability.
///
/// The engine only ever goes through this trait; swapping in a full ledger
/// SDK implementation changes nothing above it.
pub trait KeyDeriver: Send + Sync {
    /// Generate a fresh keypair with a new random seed.
    fn generate(&self) -> Result<Keypair, WalletError>;

    /// Reconstruct a keypair from an existing family seed. A malformed seed
    /// (wrong alphabet, wrong version, bad checksum) is an `ImportFormat`
    /// error; other derivation failures are `KeyDerivation`.
    fn from_secret(&self, secret: &str) -> Result<Keypair, WalletError>;
}

/// secp256k1 deriver over the XRPL family-seed wire format.
///
/// Seed encoding (Ripple base58 alphabet, checksummed, 16 bytes of entropy)
/// matches the ledger exactly; account-ID hashing uses double SHA-256 in
/// place of the SDK's SHA-256+RIPEMD-160 pipeline.
pub struct FamilySeedDeriver;

impl FamilySeedDeriver {
    pub fn new() -> Self {
        Self
    }

    fn derive(&self, entropy: &[u8; SEED_ENTROPY_LEN]) -> Result<Keypair, WalletError> {
        let signing_key = root_secret_key(entropy)
            .ok_or_else(|| WalletError::KeyDerivation("seed yields no valid key".to_string()))?;

        let secp = Secp256k1::new();
        let public = PublicKey::from_secret_key(&secp, &signing_key);
        let public_bytes = public.serialize();

        Ok(Keypair {
            address: encode_account_id(&public_bytes),
            secret: encode_seed(entropy),
            public_key: hex::encode_upper(public_bytes),
            // Display convention: 33-byte hex with a 0x00 type prefix.
            private_key: format!("00{}", hex::encode_upper(signing_key.secret_bytes())),
            signing_key,
        })
    }
}

impl Default for FamilySeedDeriver {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyDeriver for FamilySeedDeriver {
    fn generate(&self) -> Result<Keypair, WalletError> {
        let mut entropy = [0u8; SEED_ENTROPY_LEN];
        secp256k1::rand::thread_rng().fill_bytes(&mut entropy);
        self.derive(&entropy)
    }

    fn from_secret(&self, secret: &str) -> Result<Keypair, WalletError> {
        let decoded = bs58::decode(secret.trim())
            .with_alphabet(bs58::Alphabet::RIPPLE)
            .with_check(Some(SEED_VERSION))
            .into_vec()
            .map_err(|e| WalletError::ImportFormat(e.to_string()))?;

        // First byte is the verified version prefix.
        let payload = &decoded[1..];
        if payload.len() != SEED_ENTROPY_LEN {
            return Err(WalletError::ImportFormat(format!(
                "seed payload must be {} bytes, got {}",
                SEED_ENTROPY_LEN,
                payload.len()
            )));
        }

        let mut entropy = [0u8; SEED_ENTROPY_LEN];
        entropy.copy_from_slice(payload);
        self.derive(&entropy)
    }
}

/// Root key generation: hash the entropy with an incrementing sequence until
/// the candidate falls inside the curve order.
fn root_secret_key(entropy: &[u8; SEED_ENTROPY_LEN]) -> Option<SecretKey> {
    for counter in 0u32..=0xFFFF {
        let mut hasher = Sha512::new();
        hasher.update(entropy);
        hasher.update(counter.to_be_bytes());
        let digest = hasher.finalize();
        if let Ok(key) = SecretKey::from_slice(&digest[..32]) {
            return Some(key);
        }
    }
    None
}

fn encode_seed(entropy: &[u8; SEED_ENTROPY_LEN]) -> String {
    bs58::encode(entropy)
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check_version(SEED_VERSION)
        .into_string()
}

fn encode_account_id(public_key: &[u8]) -> String {
    let first = Sha256::digest(public_key);
    let second = Sha256::digest(first);
    bs58::encode(&second[..20])
        .with_alphabet(bs58::Alphabet::RIPPLE)
        .with_check_version(ACCOUNT_VERSION)
        .into_string()
}
