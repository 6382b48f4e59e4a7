use data_encoding::HEXLOWER;
use ring::digest::{Context, SHA256};

/// Length in bytes of a SHA-256 output
pub const SHA256_LEN: usize = 32;

pub fn sha256_digest(data: &[u8]) -> [u8; SHA256_LEN] {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();

    let mut out = [0u8; SHA256_LEN];
    out.copy_from_slice(digest.as_ref());
    out
}

pub fn hex_encode(data: &[u8]) -> String {
    HEXLOWER.encode(data)
}
