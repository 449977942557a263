//! Normalized-Hill logic functions.
//!
//! These are the functions referenced by generated derivative code:
//! `act`, `inhib`, `AND` and `OR`. Activities are normalized to [0, 1].
//!
//! The activation curve is a Hill function rescaled so that
//! act(0) = 0, act(EC50) = w/2 and act(1) = w.
//!
//! Reference: Kraeutler MJ, Soltis AR, Saucerman JJ. BMC Syst Biol. 2010;4:157

/// Normalized-Hill activation
///
/// beta = (EC50^n - 1) / (2 EC50^n - 1)
/// K^n = beta - 1
/// f = w * beta * x^n / (K^n + x^n), capped at w
///
/// # Arguments
/// * `x` - Upstream species activity
/// * `w` - Reaction weight
/// * `n` - Hill coefficient
/// * `ec50` - Half-maximal activity
#[inline]
pub fn act(x: f64, w: f64, n: f64, ec50: f64) -> f64 {
    let ec50_n = ec50.powf(n);
    let beta = (ec50_n - 1.0) / (2.0 * ec50_n - 1.0);
    let k_n = beta - 1.0;
    let x_n = x.max(0.0).powf(n);
    let f = w * beta * x_n / (k_n + x_n);
    if f > w {
        w
    } else {
        f
    }
}

/// Normalized-Hill inhibition: the complement of activation
#[inline]
pub fn inhib(x: f64, w: f64, n: f64, ec50: f64) -> f64 {
    w - act(x, w, n, ec50)
}

/// Logical AND: product of the gated terms.
///
/// The weight is carried for signature compatibility; each term already
/// includes it.
#[allow(non_snake_case)]
pub fn AND(_w: f64, terms: &[f64]) -> f64 {
    terms.iter().product()
}

/// Logical OR: probabilistic union of two activities
#[allow(non_snake_case)]
#[inline]
pub fn OR(a: f64, b: f64) -> f64 {
    a + b - a * b
}
