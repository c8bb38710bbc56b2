pub const APP_NAME: &str = "storydeck";

/// Convert user volume percentage (0-100) to the amplitude multiplier the
/// audio device expects (0.0-1.0).
///
/// The mapping is linear: the service reports volume back to subscribers as
/// the exact percentage it was given, so the stored value must round-trip.
pub fn volume_percent_to_amplitude(percent: u8) -> f32 {
    (percent.min(100) as f32) / 100.0
}

/// Clamp an arbitrary percentage input to the 0-100 range.
pub fn clamp_percent(percent: f32) -> f32 {
    percent.clamp(0.0, 100.0)
}
