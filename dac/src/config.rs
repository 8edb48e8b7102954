/// Knobs for the pairing-product evaluation inside proof generation and
/// verification. The accept/reject outcome is independent of these settings;
/// they only trade latency for resources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of worker tasks evaluating queued pairing products. `0` spawns
    /// one task per product, `1` evaluates sequentially, `n > 1` assigns the
    /// queue round-robin to `n` workers.
    pub workers: usize,
    /// Fuse the Miller loops of a product and run a single final
    /// exponentiation instead of exponentiating each pairing separately.
    pub optimize_tate: bool,
    /// Master switch for parallel evaluation; `false` forces sequential
    /// execution regardless of `workers`.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 0,
            optimize_tate: true,
            parallel: true,
        }
    }
}
