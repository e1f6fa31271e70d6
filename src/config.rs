/// Process-wide garden parameters. Read-only once the server or CLI starts;
/// individual requests may override fields per call.
#[derive(Clone, Debug, PartialEq)]
pub struct GardenConfig {
    // Flower bed
    pub garden_radius: f64,
    pub min_separation: f64,
    pub max_attempts: usize,
    pub fallback_inset: f64,

    // Flower shape
    pub stem_height_min: f64,
    pub stem_height_max: f64,

    // Coin ring
    pub coin_count: usize,
    pub coin_inner_radius: f64,
    pub coin_outer_radius: f64,
    pub coin_height: f64,

    // Decoration ring
    pub decoration_count: usize,
    pub decoration_inner_radius: f64,
    pub decoration_outer_radius: f64,
    pub tree_probability: f64,
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            garden_radius: 10.0,
            min_separation: 2.0,
            max_attempts: 50,
            fallback_inset: 0.5,
            stem_height_min: 0.5,
            stem_height_max: 1.7,
            coin_count: 20,
            coin_inner_radius: 10.0,
            coin_outer_radius: 30.0,
            coin_height: 0.5,
            decoration_count: 20,
            decoration_inner_radius: 15.0,
            decoration_outer_radius: 30.0,
            tree_probability: 0.3,
        }
    }
}

/// Unlock price per feature category, in coins.
pub const UNLOCK_COST: u32 = 1;

/// Upper bound on `max_attempts` accepted from callers.
pub const MAX_ATTEMPTS_LIMIT: usize = 10_000;

/// Upper bound on flowers planted by one demo seeding request.
pub const MAX_DEMO_FLOWERS: usize = 500;
