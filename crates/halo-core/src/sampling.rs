use rand::Rng;

/// Draws a point uniformly from the unit quarter-disc by rejection.
///
/// Candidates come uniformly from `[0,1]²` and are kept iff `x² + y² <= 1`.
/// Acceptance probability is π/4 per draw, so the loop ends with
/// probability 1.
pub fn sample_quarter_disc<R: Rng + ?Sized>(rng: &mut R) -> (f32, f32) {
    loop {
        let x: f32 = rng.gen_range(0.0..=1.0);
        let y: f32 = rng.gen_range(0.0..=1.0);
        if x * x + y * y <= 1.0 {
            return (x, y);
        }
    }
}
