/// The expiry sweep runs this many times per expiry horizon.
pub const EXPIRY_SWEEPS_PER_HORIZON: u32 = 4;

/// Lower bound on the time between two expiry sweeps.
pub const MIN_EXPIRY_SWEEP_INTERVAL_MS: u64 = 10;
