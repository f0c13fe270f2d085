/// The two knobs exposed to callers. Held only for the duration
/// of a single `layout()` call; the engine keeps no persistent state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Divisor in the final scaling pass. X is scaled by `2 * scale_factor`,
    /// Y by `scale_factor`. Typical range 1.0-10.0.
    pub scale_factor: f64,
    /// When true, signals whose system is not `Ks` are stripped from the
    /// topology before layout begins.
    pub remove_non_ks_signals: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            scale_factor: 4.5,
            remove_non_ks_signals: false,
        }
    }
}
