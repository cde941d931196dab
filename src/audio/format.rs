// NOTE: Loudness analysis works on the unsigned byte waveform scale (0..=255, silence at 128),
// the same scale a browser analyser reports for byte time-domain data.
// Thresholds in the config are expressed on this scale.

/// Shape of one analysis frame
#[derive(Debug, Clone, Copy)]
pub struct FrameFormat {
    pub frame_len: usize,
}

impl FrameFormat {
    /// Value of a silent sample
    pub const MIDPOINT: f32 = 128.0;
    pub const MAX_BYTE: f32 = 255.0;

    /// Convert a float sample (-1.0..=1.0) to the byte scale
    pub fn to_byte_scale(sample: f32) -> f32 {
        (Self::MIDPOINT * (sample + 1.0)).floor().clamp(0.0, Self::MAX_BYTE)
    }
}

impl Default for FrameFormat {
    fn default() -> Self {
        // Half of a 256-point analyser window
        Self { frame_len: 128 }
    }
}
