use super::format::FrameFormat;
use crate::messages::PulseState;

/// Mean absolute deviation of a frame from the waveform midpoint.
///
/// This measures full-waveform amplitude, not low-frequency energy. An empty
/// frame is silent.
pub fn loudness(frame: &[f32]) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    let sum: f32 = frame
        .iter()
        .map(|sample| (sample - FrameFormat::MIDPOINT).abs())
        .sum();

    sum / frame.len() as f32
}

/// Strictly louder than the threshold pulses
pub fn classify(loudness: f32, threshold: f32) -> PulseState {
    if loudness > threshold {
        PulseState::Pulsing
    } else {
        PulseState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 150.0;

    #[test]
    fn test_silent_frame() {
        let frame = [128.0, 128.0, 128.0, 128.0];
        assert_eq!(loudness(&frame), 0.0);
        assert_eq!(classify(loudness(&frame), THRESHOLD), PulseState::Idle);
    }

    #[test]
    fn test_full_scale_square_wave_stays_below_threshold() {
        let frame = [0.0, 255.0, 0.0, 255.0];
        assert_eq!(loudness(&frame), 127.5);
        assert_eq!(classify(loudness(&frame), THRESHOLD), PulseState::Idle);

        let frame = [0.0, 255.0, 0.0, 255.0, 0.0, 255.0];
        assert_eq!(loudness(&frame), 127.5);
    }

    #[test]
    fn test_synthetic_loud_frame_pulses() {
        // Out of the realistic byte range, to exercise the comparison
        let frame = [-72.0, 328.0, -72.0, 328.0];
        assert_eq!(loudness(&frame), 200.0);
        assert_eq!(classify(loudness(&frame), THRESHOLD), PulseState::Pulsing);
    }

    #[test]
    fn test_threshold_boundary_is_strict() {
        assert_eq!(classify(150.0, THRESHOLD), PulseState::Idle);
        assert_eq!(classify(151.0, THRESHOLD), PulseState::Pulsing);

        let at_threshold = [-22.0, 278.0];
        assert_eq!(loudness(&at_threshold), 150.0);
        assert_eq!(classify(loudness(&at_threshold), THRESHOLD), PulseState::Idle);
    }

    #[test]
    fn test_empty_frame_is_silent() {
        assert_eq!(loudness(&[]), 0.0);
    }
}
