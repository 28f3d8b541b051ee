//! Symmetric encryption of page paths sent to the revalidation endpoint.
//!
//! Paths are encrypted with AES in CBC mode under a shared secret and a fresh
//! random IV. An HMAC-SHA256 tag over `iv || ciphertext` authenticates the
//! payload so forged or altered bodies are rejected before decryption. The MAC
//! key is derived from the shared secret, so one secret configures both sides.

use std::fmt;
use std::str::FromStr;

use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// AES block and IV length in bytes.
pub const IV_LEN: usize = 16;

const MAC_CONTEXT: &[u8] = b"folio-revalidation-mac";

type HmacSha256 = Hmac<Sha256>;

macro_rules! cbc_encrypt {
    ($cipher:ty, $key:expr, $iv:expr, $plaintext:expr) => {
        cbc::Encryptor::<$cipher>::new_from_slices($key, $iv)
            .map(|cipher| cipher.encrypt_padded_vec_mut::<Pkcs7>($plaintext))
            .map_err(|_| PathCodecError::Encrypt)
    };
}

macro_rules! cbc_decrypt {
    ($cipher:ty, $key:expr, $iv:expr, $ciphertext:expr) => {
        cbc::Decryptor::<$cipher>::new_from_slices($key, $iv)
            .map_err(|_| PathCodecError::Decrypt)
            .and_then(|cipher| {
                cipher
                    .decrypt_padded_vec_mut::<Pkcs7>($ciphertext)
                    .map_err(|_| PathCodecError::Decrypt)
            })
    };
}

/// Supported block cipher configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CipherAlgorithm {
    /// `aes-128-cbc`, 16-byte key.
    Aes128Cbc,
    /// `aes-192-cbc`, 24-byte key.
    Aes192Cbc,
    /// `aes-256-cbc`, 32-byte key.
    #[default]
    Aes256Cbc,
}

impl CipherAlgorithm {
    /// Required key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::Aes128Cbc => 16,
            Self::Aes192Cbc => 24,
            Self::Aes256Cbc => 32,
        }
    }

    /// Conventional lower-case name, e.g. `aes-256-cbc`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aes128Cbc => "aes-128-cbc",
            Self::Aes192Cbc => "aes-192-cbc",
            Self::Aes256Cbc => "aes-256-cbc",
        }
    }
}

impl fmt::Display for CipherAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CipherAlgorithm {
    type Err = PathCodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-128-cbc" => Ok(Self::Aes128Cbc),
            "aes-192-cbc" => Ok(Self::Aes192Cbc),
            "aes-256-cbc" => Ok(Self::Aes256Cbc),
            other => Err(PathCodecError::UnsupportedAlgorithm {
                name: other.to_owned(),
            }),
        }
    }
}

/// Wire form of an encrypted path: hex IV, hex ciphertext and hex MAC tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedPath {
    /// Hex-encoded 16-byte initialisation vector.
    pub iv: String,
    /// Hex-encoded PKCS#7-padded ciphertext.
    pub content: String,
    /// Hex-encoded HMAC-SHA256 over the IV and ciphertext.
    pub tag: String,
}

/// Failures raised while configuring the codec or decoding a payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathCodecError {
    /// The configured algorithm name is not one of the AES-CBC variants.
    #[error("unsupported cipher algorithm {name:?}")]
    UnsupportedAlgorithm { name: String },
    /// The shared secret does not match the algorithm's key size.
    #[error("{algorithm} requires a {expected}-byte key, got {actual} bytes")]
    KeyLength {
        algorithm: CipherAlgorithm,
        expected: usize,
        actual: usize,
    },
    /// A payload field is not hex.
    #[error("payload field `{field}` is not valid hex")]
    InvalidHex { field: &'static str },
    /// The decoded IV is not one block long.
    #[error("initialisation vector must be 16 bytes, got {actual}")]
    IvLength { actual: usize },
    /// The MAC tag does not match the IV and ciphertext.
    #[error("payload authentication failed")]
    Tampered,
    /// The cipher rejected the key or IV while encrypting.
    #[error("path could not be encrypted")]
    Encrypt,
    /// Authenticated ciphertext with bad padding or length.
    #[error("ciphertext could not be decrypted")]
    Decrypt,
    /// The plaintext is not a UTF-8 path.
    #[error("decrypted path is not valid UTF-8")]
    NotUtf8,
}

/// Encrypts and decrypts revalidation paths under one shared secret.
///
/// ```
/// use folio::domain::{CipherAlgorithm, PathCodec};
///
/// let codec = PathCodec::new(CipherAlgorithm::Aes256Cbc, &[7_u8; 32]).unwrap();
/// let payload = codec.encrypt("/article/hello-world_abc").unwrap();
/// assert_eq!(codec.decrypt(&payload).unwrap(), "/article/hello-world_abc");
/// ```
pub struct PathCodec {
    algorithm: CipherAlgorithm,
    key: Zeroizing<Vec<u8>>,
    mac_key: Zeroizing<Vec<u8>>,
}

impl fmt::Debug for PathCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathCodec")
            .field("algorithm", &self.algorithm)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl PathCodec {
    /// Build a codec, checking that `key` matches the algorithm's key size.
    pub fn new(algorithm: CipherAlgorithm, key: &[u8]) -> Result<Self, PathCodecError> {
        if key.len() != algorithm.key_len() {
            return Err(PathCodecError::KeyLength {
                algorithm,
                expected: algorithm.key_len(),
                actual: key.len(),
            });
        }
        let mac_key = Sha256::new()
            .chain_update(MAC_CONTEXT)
            .chain_update(key)
            .finalize()
            .to_vec();
        Ok(Self {
            algorithm,
            key: Zeroizing::new(key.to_vec()),
            mac_key: Zeroizing::new(mac_key),
        })
    }

    /// Cipher this codec was built for.
    #[must_use]
    pub fn algorithm(&self) -> CipherAlgorithm {
        self.algorithm
    }

    /// Encrypt `path` under a fresh random IV.
    pub fn encrypt(&self, path: &str) -> Result<EncryptedPath, PathCodecError> {
        let mut iv = [0_u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        self.encrypt_with_iv(path, &iv)
    }

    fn encrypt_with_iv(
        &self,
        path: &str,
        iv: &[u8; IV_LEN],
    ) -> Result<EncryptedPath, PathCodecError> {
        let plaintext = path.as_bytes();
        let ciphertext = match self.algorithm {
            CipherAlgorithm::Aes128Cbc => cbc_encrypt!(aes::Aes128, &self.key, iv, plaintext),
            CipherAlgorithm::Aes192Cbc => cbc_encrypt!(aes::Aes192, &self.key, iv, plaintext),
            CipherAlgorithm::Aes256Cbc => cbc_encrypt!(aes::Aes256, &self.key, iv, plaintext),
        }?;
        let tag = self.tag(iv, &ciphertext)?.finalize().into_bytes();
        Ok(EncryptedPath {
            iv: hex::encode(iv),
            content: hex::encode(&ciphertext),
            tag: hex::encode(tag),
        })
    }

    /// Authenticate and decrypt `payload` back into the original path.
    pub fn decrypt(&self, payload: &EncryptedPath) -> Result<String, PathCodecError> {
        let iv = decode_hex("iv", &payload.iv)?;
        if iv.len() != IV_LEN {
            return Err(PathCodecError::IvLength { actual: iv.len() });
        }
        let ciphertext = decode_hex("content", &payload.content)?;
        let tag = decode_hex("tag", &payload.tag)?;
        self.tag(&iv, &ciphertext)?
            .verify_slice(&tag)
            .map_err(|_| PathCodecError::Tampered)?;

        let plaintext = match self.algorithm {
            CipherAlgorithm::Aes128Cbc => cbc_decrypt!(aes::Aes128, &self.key, &iv, &ciphertext),
            CipherAlgorithm::Aes192Cbc => cbc_decrypt!(aes::Aes192, &self.key, &iv, &ciphertext),
            CipherAlgorithm::Aes256Cbc => cbc_decrypt!(aes::Aes256, &self.key, &iv, &ciphertext),
        }?;
        String::from_utf8(plaintext).map_err(|_| PathCodecError::NotUtf8)
    }

    fn tag(&self, iv: &[u8], ciphertext: &[u8]) -> Result<HmacSha256, PathCodecError> {
        let mut mac = <HmacSha256 as Mac>::new_from_slice(&self.mac_key)
            .map_err(|_| PathCodecError::Tampered)?;
        mac.update(iv);
        mac.update(ciphertext);
        Ok(mac)
    }
}

fn decode_hex(field: &'static str, raw: &str) -> Result<Vec<u8>, PathCodecError> {
    hex::decode(raw).map_err(|_| PathCodecError::InvalidHex { field })
}
