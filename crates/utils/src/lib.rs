use rand::Rng;

const SECRET_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates an alphanumeric secret of the given length, used for
/// webhook signing keys when none is configured.
pub fn create_random_secret(secret_len: usize) -> String {
    let mut rng = rand::thread_rng();

    std::iter::repeat_with(|| {
        let idx = rng.gen_range(0..SECRET_CHARSET.len());
        SECRET_CHARSET[idx] as char
    })
    .take(secret_len)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_random_secret() {
        for len in &[16, 30, 47] {
            assert_eq!(create_random_secret(*len).len(), *len);
        }
        assert_ne!(create_random_secret(24), create_random_secret(24));
    }
}
