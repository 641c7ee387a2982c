use bcrypt::{hash, verify, BcryptError};

/// Lowest and highest cost factors bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Hashes `password` with a fresh salt at the given bcrypt cost.
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// Compares `password` with a stored bcrypt hash. A malformed hash is an error,
/// not a mismatch.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, BcryptError> {
    verify(password, hashed_password)
}
