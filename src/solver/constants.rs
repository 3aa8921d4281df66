/// Upper bound on simplex pivots for a single `solve` call
pub const DEFAULT_MAX_PIVOTS: usize = 10_000;
