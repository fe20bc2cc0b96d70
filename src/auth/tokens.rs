use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, RngCore, distributions::Alphanumeric, rngs::OsRng};

pub const REFRESH_TOKEN_BYTES: usize = 32;
pub const VERIFY_CODE_LEN: usize = 6;

/// 256 bits from the OS CSPRNG, base64url without padding.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn generate_verify_code() -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(VERIFY_CODE_LEN)
        .map(char::from)
        .collect()
}
