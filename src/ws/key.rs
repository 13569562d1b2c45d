static MAGIC_BYTES: &[u8] = "258EAFA5-E914-47DA-95CA-C5AB0DC85B11".as_bytes();

pub(crate) fn compute_accept_key(challenge: &str) -> String {
    use base64::Engine;
    use sha1::Digest;

    let mut hasher = sha1::Sha1::new();
    hasher.update(challenge.as_bytes());
    hasher.update(MAGIC_BYTES);
    base64::engine::general_purpose::STANDARD.encode(hasher.finalize().as_slice())
}
