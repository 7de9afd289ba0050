// Cubics with three real roots of distinct magnitudes.

/// Coefficients, highest degree first, of (x - r₁)(x - r₂)(x - r₃).
fn from_roots([r1, r2, r3]: [f64; 3]) -> [f64; 4] {
    [1.,
     -(r1 + r2 + r3),
     r1 * r2 + r1 * r3 + r2 * r3,
     -(r1 * r2 * r3)]
}

/// Return the test cubics, the one of the lab first.
#[inline]
pub fn test_cubics() -> Vec<[f64; 4]> {
    let mut v = vec![[1., -3., 0., 2.5]];
    for r in [[3., -2., 1.], [10., 5., -1.], [-7., 4., 0.5],
              [100., -30., 2.], [1.5, -1.2, 0.1]] {
        v.push(from_roots(r));
    }
    v
}

/// Evaluate the cubic `p` at `x`.
#[inline]
pub fn eval([a0, a1, a2, a3]: [f64; 4], x: f64) -> f64 {
    ((a0 * x + a1) * x + a2) * x + a3
}
