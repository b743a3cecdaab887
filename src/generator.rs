use rand::Rng;

use crate::error::{AppError, AppResult};

const DIGITS: &[u8] = b"0123456789";
const ALPHANUMERIC: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Character set codes are drawn from. Always non-empty ASCII.
#[derive(Clone, Debug)]
pub struct Alphabet {
    chars: Vec<u8>,
}

impl Alphabet {
    pub fn digits() -> Self {
        Self {
            chars: DIGITS.to_vec(),
        }
    }

    pub fn alphanumeric() -> Self {
        Self {
            chars: ALPHANUMERIC.to_vec(),
        }
    }

    pub fn custom(chars: &str) -> AppResult<Self> {
        if chars.is_empty() {
            return Err(AppError::InvalidArgument(
                "alphabet must not be empty".into(),
            ));
        }
        if !chars.is_ascii() {
            return Err(AppError::InvalidArgument("alphabet must be ASCII".into()));
        }
        Ok(Self {
            chars: chars.as_bytes().to_vec(),
        })
    }

    pub fn contains(&self, c: char) -> bool {
        c.is_ascii() && self.chars.contains(&(c as u8))
    }
}

/// Batch generator over a fixed alphabet. Pure and stateless, so it is
/// safe to share across request handlers.
///
/// Uses `thread_rng`, which is not cryptographically strong; generated
/// codes are not secrets in this service.
#[derive(Clone)]
pub struct CodeGenerator {
    alphabet: Alphabet,
}

impl CodeGenerator {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet }
    }

    pub fn generate(&self, length: usize) -> String {
        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| {
                let idx = rng.gen_range(0..self.alphabet.chars.len());
                self.alphabet.chars[idx] as char
            })
            .collect()
    }

    /// Returns exactly `count` codes of exactly `length` characters each.
    /// Duplicates are possible within and across batches.
    pub fn generate_batch(&self, length: usize, count: usize) -> Vec<String> {
        (0..count).map(|_| self.generate(length)).collect()
    }
}
