use std::f32::consts::TAU;

/*
Gaussian Noise
==============

Box–Muller turns two uniform draws into one normally distributed sample:

    n = sqrt(-2 ln u1) * cos(2π u2)

u1 is drawn from (0, 1] so the logarithm stays finite. The result is then
passed through tanh, which keeps the occasional large draw inside (-1, 1)
without clipping hard.
*/

/// Seeded, allocation-free source of tanh-shaped Gaussian noise.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    rng: oorandom::Rand32,
}

impl GaussianNoise {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: oorandom::Rand32::new(seed),
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let u1 = 1.0 - self.rng.rand_float();
        let u2 = self.rng.rand_float();
        ((-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()).tanh()
    }

    pub fn fill(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
    }
}
