pub const DEFAULT_PORT: u16 = 8080;

/// Client seeds are folded into the engine's 32-bit seed space. Without one, a fresh random
/// seed is drawn.
pub fn normalize_seed(value: Option<i64>) -> u32 {
    match value {
        Some(seed) => seed as u32,
        None => rand::random::<u32>(),
    }
}

pub fn parse_port(raw: Option<&str>) -> u16 {
    raw.and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|port| *port != 0)
        .unwrap_or(DEFAULT_PORT)
}
