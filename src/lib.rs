//! # Finsight workspace
//!
//! Umbrella crate re-exporting the analytics core and its numeric helpers.
//!
//! ## Example
//!
//! ```
//! use finsight_workspace::finsight::{ForecastMethod, ForecastingOptions};
//!
//! let options = ForecastingOptions::new(ForecastMethod::Exponential, 4);
//! assert_eq!(options.periods, 4);
//! ```

pub use finsight;
pub use stat_math;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports_are_usable() {
        let options = finsight::ForecastingOptions::default();
        assert_eq!(options.periods, 6);
        assert_eq!(stat_math::descriptive::mean(&[1.0, 2.0, 3.0]).ok(), Some(2.0));
    }
}
