use crate::config::DistanceKind;

/// Maps a raw Qdrant score into a similarity in `[0, 1]`, rounded to 2 decimals.
///
/// Cosine and dot scores are already "higher is closer" and get clamped.
/// Euclidean scores are distances and go through `exp(-d)`.
pub fn normalize_score(distance: DistanceKind, raw: f32) -> f64 {
    let raw = f64::from(raw);
    let sim = match distance {
        DistanceKind::Cosine | DistanceKind::Dot => raw.clamp(0.0, 1.0),
        DistanceKind::Euclid => (-raw.max(0.0)).exp(),
    };
    if sim.is_nan() {
        return 0.0;
    }
    (sim * 100.0).round() / 100.0
}
