//! Shared value types for PWM channels.

/// Logic level of a digital output pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// Output polarities.
///
/// Polarity maps the logical phase ("on"/"off") to an electrical level.
/// `Normal` drives the pin high during the "on" phase; `Inverse` swaps the
/// mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Normal,
    Inverse,
}

impl Polarity {
    /// Electrical level representing the "on" phase for this polarity.
    pub fn on_level(self) -> Level {
        match self {
            Polarity::Normal => Level::High,
            Polarity::Inverse => Level::Low,
        }
    }

    /// Electrical level representing the "off" phase for this polarity.
    pub fn off_level(self) -> Level {
        match self {
            Polarity::Normal => Level::Low,
            Polarity::Inverse => Level::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_polarity_levels() {
        assert_eq!(Polarity::Normal.on_level(), Level::High);
        assert_eq!(Polarity::Normal.off_level(), Level::Low);
    }

    #[test]
    fn inverse_polarity_levels() {
        assert_eq!(Polarity::Inverse.on_level(), Level::Low);
        assert_eq!(Polarity::Inverse.off_level(), Level::High);
    }
}
