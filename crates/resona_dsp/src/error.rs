//! DSP Error Types

use thiserror::Error;

/// Errors that can occur during filter design
#[derive(Error, Debug)]
pub enum DesignError {
    #[error("Sample rate must be positive, got {0}")]
    InvalidSampleRate(f32),

    #[error("Quality factor must be positive, got {0}")]
    InvalidQ(f32),

    #[error("Invalid filter coefficients for frequency {frequency}Hz at sample rate {sample_rate}Hz")]
    InvalidCoefficients { frequency: f32, sample_rate: f32 },

    #[error("Invalid peak band index: {0} (must be 0-4)")]
    InvalidBandIndex(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesignError::InvalidSampleRate(-1.0);
        assert!(err.to_string().contains("-1"));

        let err = DesignError::InvalidCoefficients {
            frequency: 1000.0,
            sample_rate: 48000.0,
        };
        assert!(err.to_string().contains("1000"));
        assert!(err.to_string().contains("48000"));
    }
}
