use rand::rngs::OsRng;
use rand::Rng;

const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random suffix drawn from lowercase ascii letters and digits using the OS rng.
/// Collisions are unlikely but not excluded.
pub fn random_string(length: usize) -> String {
    let mut rng = OsRng;
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
