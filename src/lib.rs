//! Isolation of the real roots of low degree polynomials.
//!
//! This crate offers two classical methods for real polynomials
//! given by their coefficients, highest degree first:
//!
//! - [`bernoulli`] computes an interval containing the positive root
//!   of largest magnitude and one containing the negative root of
//!   largest magnitude, from four transforms of the coefficients;
//! - [`lobachevsky`] applies the Lobachevsky–Graeffe root squaring
//!   to a cubic until the magnitudes of its three roots are
//!   separated, then recovers their signs by evaluating the function.
//!
//! # Example
//!
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use rootsep::{bernoulli, lobachevsky, Sign};
//! let p = [1., -3., 0., 2.5]; // x³ - 3x² + 2.5
//! let bounds = bernoulli(&p)?;
//! assert_eq!(bounds[Sign::Positive].upper, 4.);
//!
//! let f = |x: f64| x * x * x - 3. * x * x + 2.5;
//! let roots = lobachevsky(f, &p).fault(1e-4).roots()?;
//! assert_eq!(roots.len(), 3);
//! assert!(roots.iter().all(|&r| f(r).abs() < 1e-4));
//! # Ok(()) }
//! ```
//!
//! # Use with your own types
//!
//! Both methods are generic over the scalar type.  They can readily
//! be used with `f64` and `f32`.  For another type, implement the
//! trait [`Real`] which also provides the default fault tolerance.
//!
//! The function given to [`lobachevsky`] may return either a float
//! or a `Result` (see [`FloatOrError`]); in the latter case errors
//! are reported as [`Error::Fun`].

#![cfg_attr(feature = "nightly", feature(never_type))]

use std::{
    fmt::{self, Debug, Display, Formatter},
    ops::{Neg, Add, Sub, Mul, Div, Index},
    marker::PhantomData,
    result::Result,
};
use tracing::{debug, trace};

pub mod plot;

#[cfg(doctest)]
doc_comment::doctest!("../README.md");

#[cfg(feature = "nightly")]
/// Type indicating that no error is raised by the function.
pub type NoError = !;
#[cfg(not(feature = "nightly"))]
#[derive(Debug)]
/// Type indicating that no error is raised by the function.
pub enum NoError {}

/// Errors that may be returned by the root isolation methods.
#[derive(Debug)]
pub enum Error<T, E = NoError> {
    /// Error indicating that the function evaluated at `x` returned
    /// the non-finite value `fx`.
    NotFinite { x: T, fx: T },
    /// Error returned by the function evaluated at `x`.
    Fun { x: T, err: E },
    /// The coefficient at position `index` is NaN or infinite.
    NonFiniteCoefficient { index: usize, value: T },
    /// The polynomial has `len` coefficients which the method does
    /// not support.
    UnsupportedDegree { len: usize },
    /// The leading coefficient of the given transform of the
    /// polynomial vanishes.  Transform `0` is the polynomial itself.
    ZeroLeading { transform: usize },
    /// The given transform of the polynomial has no negative
    /// coefficient, so the Bernoulli method does not apply.
    NoNegativeCoefficient { transform: usize },
    /// The coefficient at `index` of the `iter`-th root squaring is
    /// zero or not finite while it is used as a divisor (or, for the
    /// constant term, not finite).
    DegenerateCoefficient { iter: usize, index: usize, value: T },
    /// The ratio of consecutive coefficients at `index` of the
    /// `iter`-th root squaring is negative: the polynomial has
    /// complex roots.
    ComplexRoots { iter: usize, index: usize, ratio: T },
    /// The maximum number of iterations `iter` has been reached
    /// without the candidates passing the fault test.
    NonConvergent { iter: usize },
}

impl<T: Display, E: Debug> Display for Error<T, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotFinite { x, fx } => {
                write!(f, "evaluating the function at {} yields {} which is \
                           not finite", x, fx)
            }
            Error::Fun { x, err } => {
                write!(f, "evaluating the function at {} yields the error \
                          {:?}", x, err)
            }
            Error::NonFiniteCoefficient { index, value } =>
                write!(f, "coefficient {index} is {value} which is not \
                           finite"),
            Error::UnsupportedDegree { len } =>
                write!(f, "polynomials with {len} coefficients are not \
                           supported"),
            Error::ZeroLeading { transform } =>
                write!(f, "the leading coefficient of P{transform} is zero"),
            Error::NoNegativeCoefficient { transform } =>
                write!(f, "P{transform} has no negative coefficient"),
            Error::DegenerateCoefficient { iter, index, value } =>
                write!(f, "iteration {iter}: coefficient A{index} = {value} \
                           is degenerate"),
            Error::ComplexRoots { iter, index, ratio } =>
                write!(f, "iteration {iter}: A{}/A{index} = {ratio} is \
                           negative (complex roots)", index + 1),
            Error::NonConvergent { iter } => {
                write!(f, "no convergence after {} iterations", iter)
            }
        }
    }
}

impl<T: Debug + Display, E: Debug> std::error::Error for Error<T, E> {}

////////////////////////////////////////////////////////////////////////
//
// Error returning functions

/// A float type or a Result type for floats.  This is intended for
/// copy types.
pub trait FloatOrError<T> {
    type Error;
    fn to_result(self) -> Result<T, Self::Error>;
}

macro_rules! impl_float_or_error { ($t: ty) => {
    impl FloatOrError<$t> for $t {
        type Error = NoError;

        #[inline]
        fn to_result(self) -> Result<$t, NoError> { Ok(self) }
    }
    impl<E> FloatOrError<$t> for Result<$t, E> {
        type Error = E;

        #[inline]
        fn to_result(self) -> Result<$t, E> { self }
    }
}}

impl_float_or_error!(f64);
impl_float_or_error!(f32);

/// Evaluate `f` at `x`, reporting errors and non-finite values.
#[inline]
fn eval_finite<T, F, R>(f: &mut F, x: T) -> Result<T, Error<T, R::Error>>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
{
    let fx = f(x).to_result().map_err(|err| Error::Fun { x, err })?;
    if fx.is_finite() { Ok(fx) } else { Err(Error::NotFinite { x, fx }) }
}

////////////////////////////////////////////////////////////////////////
//
// Scalars

/// Requirements on the scalar type `T` of the polynomials.
pub trait Real:
    Copy
    + PartialOrd
    + Debug
    + Display
    + Neg<Output = Self>
    + Add<Self, Output = Self>
    + Sub<Self, Output = Self>
    + Mul<Self, Output = Self>
    + Div<Self, Output = Self>
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;
    const HALF: Self;
    const THIRD: Self;
    const QUARTER: Self;
    /// Default fault tolerance of [`lobachevsky`].
    const FAULT: Self;

    fn abs(self) -> Self;

    fn sqrt(self) -> Self;

    /// Raise `self` ≥ 0 to the power `e`.
    fn powf(self, e: Self) -> Self;

    /// Returns `true` iff `self` is neither infinite nor NaN.
    fn is_finite(self) -> bool;
}

macro_rules! impl_real_fXX {
    ($t: ty) => {
        impl Real for $t {
            const ZERO: Self = 0.;
            const ONE: Self = 1.;
            const TWO: Self = 2.;
            const HALF: Self = 0.5;
            const THIRD: Self = 1. / 3.;
            const QUARTER: Self = 0.25;
            const FAULT: Self = 1e-4;
            #[inline]
            fn abs(self) -> Self { <$t>::abs(self) }
            #[inline]
            fn sqrt(self) -> Self { <$t>::sqrt(self) }
            #[inline]
            fn powf(self, e: Self) -> Self { <$t>::powf(self, e) }
            #[inline]
            fn is_finite(self) -> bool { <$t>::is_finite(self) }
        }
    }
}

impl_real_fXX!(f64);
impl_real_fXX!(f32);

////////////////////////////////////////////////////////////////////////
//
// Polynomials

/// Check that `coeffs` are finite and that the leading one is non-zero.
fn check_coeffs<T: Real, E>(coeffs: &[T]) -> Result<(), Error<T, E>> {
    let Some(&lead) = coeffs.first() else {
        return Err(Error::UnsupportedDegree { len: 0 })
    };
    for (index, &value) in coeffs.iter().enumerate() {
        if !value.is_finite() {
            return Err(Error::NonFiniteCoefficient { index, value })
        }
    }
    if lead == T::ZERO {
        return Err(Error::ZeroLeading { transform: 0 })
    }
    Ok(())
}

/// Real polynomial given by its coefficients, the coefficient of the
/// highest degree term first.  So `[a, b, c]` is `a x² + b x + c`.
///
/// Transforms return new polynomials.  Their leading coefficient may
/// vanish (e.g., [`Poly::reversed`] when the constant term is zero).
#[derive(Clone, Debug, PartialEq)]
pub struct Poly<T> {
    coeffs: Vec<T>,
}

impl<T: Real> Poly<T> {
    /// Create a polynomial with the given coefficients, highest
    /// degree first.  The coefficients must be finite and the leading
    /// one non-zero.
    pub fn new(coeffs: &[T]) -> Result<Self, Error<T>> {
        check_coeffs::<T, NoError>(coeffs)?;
        Ok(Poly { coeffs: coeffs.to_vec() })
    }

    /// The coefficients, highest degree first.
    pub fn coeffs(&self) -> &[T] { &self.coeffs }

    pub fn degree(&self) -> usize { self.coeffs.len() - 1 }

    /// The coefficient of the highest degree term.
    pub fn leading(&self) -> T { self.coeffs[0] }

    /// Evaluate the polynomial at `x` (Horner scheme).
    pub fn eval(&self, x: T) -> T {
        let mut acc = T::ZERO;
        for &c in &self.coeffs {
            acc = acc * x + c;
        }
        acc
    }

    /// Return the coefficients in reverse order, i.e. the polynomial
    /// xⁿ P(1/x).
    #[must_use]
    pub fn reversed(&self) -> Self {
        Poly { coeffs: self.coeffs.iter().rev().copied().collect() }
    }

    /// Return P(-x): the coefficient of the term of degree d is
    /// multiplied by (-1)ᵈ.
    #[must_use]
    pub fn alternated(&self) -> Self {
        let n = self.degree();
        let coeffs = self.coeffs.iter().enumerate()
            .map(|(i, &c)| if (n - i) % 2 == 1 { -c } else { c })
            .collect();
        Poly { coeffs }
    }

    /// Return -P(x).
    #[must_use]
    pub fn negated(&self) -> Self {
        Poly { coeffs: self.coeffs.iter().map(|&c| -c).collect() }
    }

    /// Return the smallest coefficient if it is negative.
    pub fn most_negative(&self) -> Option<T> {
        let mut min: Option<T> = None;
        for &c in &self.coeffs {
            if c < T::ZERO && min.map_or(true, |m| c < m) {
                min = Some(c);
            }
        }
        min
    }
}

////////////////////////////////////////////////////////////////////////
//
// Bernoulli bounds

/// Closed interval \[`lower`, `upper`\].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interval<T> {
    pub lower: T,
    pub upper: T,
}

impl<T: PartialOrd> Interval<T> {
    /// Return `true` if `x` ∈ \[`lower`, `upper`\].
    pub fn contains(&self, x: &T) -> bool {
        &self.lower <= x && x <= &self.upper
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Sign of the roots an [`Interval`] of [`Bounds`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Positive,
    Negative,
}

impl Display for Sign {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Sign::Positive => f.write_str("positive"),
            Sign::Negative => f.write_str("negative"),
        }
    }
}

/// Intervals returned by [`bernoulli`].
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds<T> {
    /// Interval \[1/n₁, n₀\] containing the largest positive root.
    pub positive: Interval<T>,
    /// Interval \[-n₂, -1/n₃\] containing the negative root of
    /// largest magnitude.
    pub negative: Interval<T>,
    /// The special values \[n₀, n₁, n₂, n₃\].
    pub special: [T; 4],
}

impl<T> Index<Sign> for Bounds<T> {
    type Output = Interval<T>;

    fn index(&self, sign: Sign) -> &Interval<T> {
        match sign {
            Sign::Positive => &self.positive,
            Sign::Negative => &self.negative,
        }
    }
}

/// Return `1 + root(b / |lead|)` where `b` is the absolute value of
/// the most negative coefficient of `p`.
fn special_value<T: Real>(
    p: &Poly<T>, transform: usize, root: fn(T) -> T
) -> Result<T, Error<T>> {
    let lead = p.leading();
    if lead == T::ZERO {
        return Err(Error::ZeroLeading { transform })
    }
    let b = match p.most_negative() {
        Some(c) => c.abs(),
        None => return Err(Error::NoNegativeCoefficient { transform }),
    };
    let n = T::ONE + root(b / lead.abs());
    trace!(transform, coeffs = ?p.coeffs(), b = ?b, n = ?n, "special value");
    Ok(n)
}

/// Return the special values \[n₀, n₁, n₂, n₃\] of the Bernoulli
/// method for the polynomial with coefficients `coeffs` (highest
/// degree first).  All of them are ≥ 1.
///
/// With B the absolute value of the most negative coefficient of the
/// transform Pₖ, nₖ = 1 + (B / |Pₖ\[0\]|)^(1/(k+1)) where
/// - P₀ is the polynomial itself,
/// - P₁ is P₀ [reversed][Poly::reversed],
/// - P₂ is P₀ [alternated][Poly::alternated], i.e. P(-x),
/// - P₃ is P₂ [negated][Poly::negated] and reversed.
///
/// Returns [`Error::NoNegativeCoefficient`] if some Pₖ has no
/// negative coefficient and [`Error::ZeroLeading`] if the leading
/// coefficient of some Pₖ vanishes (in particular if the constant
/// term is zero).
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), rootsep::Error<f64>> {
/// let [n0, n1, n2, n3] = rootsep::bernoulli_coefficients(&[1., -3., 0., 2.5])?;
/// assert_eq!(n0, 4.);
/// assert_eq!(n3, 2.);
/// assert!(n1 >= 1. && n2 >= 1.);
/// # Ok(()) }
/// ```
pub fn bernoulli_coefficients<T: Real>(
    coeffs: &[T]
) -> Result<[T; 4], Error<T>> {
    if coeffs.len() < 2 {
        return Err(Error::UnsupportedDegree { len: coeffs.len() })
    }
    let p0 = Poly::new(coeffs)?;
    let p1 = p0.reversed();
    let p2 = p0.alternated();
    let p3 = p2.negated().reversed();
    Ok([special_value(&p0, 0, |r| r)?,
        special_value(&p1, 1, T::sqrt)?,
        special_value(&p2, 2, |r| r.powf(T::THIRD))?,
        special_value(&p3, 3, |r| r.powf(T::QUARTER))?])
}

/// Bernoulli method: return an interval containing the positive root
/// of largest magnitude and an interval containing the negative root
/// of largest magnitude of the polynomial with coefficients `coeffs`
/// (highest degree first), provided these roots exist.
///
/// See [`bernoulli_coefficients`] for the errors.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), rootsep::Error<f64>> {
/// use rootsep::{bernoulli, Sign};
/// let b = bernoulli(&[1., -3., 0., 2.5])?;
/// assert!(b[Sign::Positive].contains(&2.6417835));
/// assert!(b[Sign::Negative].contains(&-0.8100377));
/// # Ok(()) }
/// ```
pub fn bernoulli<T: Real>(coeffs: &[T]) -> Result<Bounds<T>, Error<T>> {
    let special = bernoulli_coefficients(coeffs)?;
    let [n0, n1, n2, n3] = special;
    let bounds = Bounds {
        positive: Interval { lower: T::ONE / n1, upper: n0 },
        negative: Interval { lower: -n2, upper: -(T::ONE / n3) },
        special,
    };
    debug!(positive = %bounds.positive, negative = %bounds.negative,
           "bernoulli bounds");
    Ok(bounds)
}

////////////////////////////////////////////////////////////////////////
//
// Lobachevsky–Graeffe

/// Policy deciding whether a value `fx` of the function is small
/// enough for its argument to be accepted as a root.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Acceptance {
    /// Accept when `fx < fault`.  This is a signed comparison: any
    /// negative value, however large, is accepted.  Non-finite values
    /// (including -∞) are rejected with [`Error::NotFinite`] before
    /// the comparison.
    #[default]
    Signed,
    /// Accept when `|fx| < fault`.
    Magnitude,
}

impl Acceptance {
    #[inline]
    pub fn accepts<T: Real>(self, fx: T, fault: T) -> bool {
        match self {
            Acceptance::Signed => fx < fault,
            Acceptance::Magnitude => fx.abs() < fault,
        }
    }
}

/// One root squaring step: return the coefficients of the cubic whose
/// roots are the squares of the roots of a₀x³ + a₁x² + a₂x + a₃
/// (up to the sign of the polynomial).
///
/// ```
/// assert_eq!(rootsep::graeffe([1., -3., 0., 2.5]), [1., 9., 15., 6.25]);
/// ```
#[must_use]
pub fn graeffe<T: Real>([a0, a1, a2, a3]: [T; 4]) -> [T; 4] {
    [a0 * a0,
     a1 * a1 - T::TWO * a0 * a2,
     a2 * a2 - T::TWO * a1 * a3,
     a3 * a3]
}

/// Lobachevsky–Graeffe method for the cubic with coefficients
/// `coeffs` = \[a₀, a₁, a₂, a₃\] (highest degree first), `f` being
/// the function x ↦ a₀x³ + a₁x² + a₂x + a₃.  It is the caller's
/// responsibility to make sure `f` and `coeffs` agree.
///
/// At iteration k, the coefficients \[A₀, A₁, A₂, A₃\] of the cubic
/// whose roots are the 2ᵏ-th powers of the roots are computed (see
/// [`graeffe`]) and the candidate root magnitudes are
/// xᵢ = (Aᵢ / Aᵢ₋₁)^(1/2ᵏ).  The iteration stops as soon as, for
/// each xᵢ, `f`(xᵢ) or `f`(-xᵢ) is accepted for the fault tolerance
/// (see [`Acceptance`]).  The signs are then determined the same
/// way, see [`Lobachevsky::roots`].
///
/// The default fault tolerance is [`Real::FAULT`] (`1e-4` for `f64`
/// and `f32`), the default maximum number of iterations is `100`
/// and the default acceptance is [`Acceptance::Signed`].  Nothing is
/// computed until the [`roots`][Lobachevsky::roots] or
/// [`unsigned_roots`][Lobachevsky::unsigned_roots] method is used.
///
/// The method requires three real roots of distinct magnitudes.
/// When it does not apply, the coefficients eventually vanish or
/// overflow ([`Error::DegenerateCoefficient`]) or a ratio becomes
/// negative ([`Error::ComplexRoots`]).
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), rootsep::Error<f64>> {
/// use rootsep::lobachevsky;
/// let f = |x: f64| x * x * x - 3. * x * x + 2.5;
/// let r = lobachevsky(f, &[1., -3., 0., 2.5]).maxiter(10).roots()?;
/// assert!((r[0] - 2.6417835).abs() < 1e-6);
/// assert!((r[2] + 0.8100377).abs() < 1e-6);
/// # Ok(()) }
/// ```
pub fn lobachevsky<T, F, R>(
    f: F, coeffs: &[T]
) -> Lobachevsky<'_, T, F, R::Error>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>
{
    Lobachevsky::new(f, coeffs)
}

/// Lobachevsky–Graeffe method (see [`lobachevsky`]).
pub struct Lobachevsky<'a, T, F, E> {
    f: F,
    coeffs: &'a [T],
    error: PhantomData<E>, // Error that `f` might return
    fault: T,
    maxiter: usize,
    acceptance: Acceptance,
}

impl<'a, T: Real, F, E> Lobachevsky<'a, T, F, E> {
    #[must_use]
    fn new(f: F, coeffs: &'a [T]) -> Self {
        Lobachevsky {
            f,  coeffs,
            error: PhantomData,
            fault: T::FAULT,
            maxiter: 100,
            acceptance: Acceptance::Signed,
        }
    }

    /// Set the fault tolerance.
    ///
    /// Set the default value if `fault` is ≤ 0 or not finite.
    pub fn fault(mut self, fault: T) -> Self {
        self.fault = if fault > T::ZERO && fault.is_finite() { fault }
                     else { T::FAULT };
        self
    }

    /// Set the maximum number of iterations.
    ///
    /// If `n` is `0`, it is interpreted as “unlimited” (actually
    /// [`usize::MAX`]).
    pub fn maxiter(mut self, n: usize) -> Self {
        if n == 0 {
            self.maxiter = usize::MAX;
        } else {
            self.maxiter = n;
        }
        self
    }

    /// Set the policy accepting a value of the function as zero.
    pub fn acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }
}

impl<'a, T, F, R> Lobachevsky<'a, T, F, R::Error>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
{
    /// Return the coefficients as a cubic.
    fn cubic(&self) -> Result<[T; 4], Error<T, R::Error>> {
        match *self.coeffs {
            [a0, a1, a2, a3] => {
                check_coeffs::<T, R::Error>(self.coeffs)?;
                Ok([a0, a1, a2, a3])
            }
            _ => Err(Error::UnsupportedDegree { len: self.coeffs.len() }),
        }
    }

    /// Return `true` if `f`(x) or `f`(-x) is accepted.
    fn is_root_magnitude(&mut self, x: T) -> Result<bool, Error<T, R::Error>> {
        Ok(self.acceptance.accepts(eval_finite(&mut self.f, x)?, self.fault)
           || self.acceptance.accepts(eval_finite(&mut self.f, -x)?,
                                      self.fault))
    }

    /// Return the magnitudes \[x₁, x₂, x₃\] of the roots, in the
    /// order of the ratios A₁/A₀, A₂/A₁, A₃/A₂ (thus decreasing).
    ///
    /// The error [`Error::UnsupportedDegree`] is returned if there
    /// are not exactly 4 coefficients and [`Error::ZeroLeading`] if
    /// the leading one is zero.  If the maximum number of iterations
    /// is reached, [`Error::NonConvergent`] is returned.
    pub fn unsigned_roots(&mut self) -> Result<[T; 3], Error<T, R::Error>> {
        let mut a = self.cubic()?;
        let mut e = T::ONE; // 1/2ᵏ
        let mut iter = 0;
        while iter < self.maxiter {
            iter += 1;
            let na = graeffe(a);
            for (index, &value) in na.iter().enumerate() {
                if !value.is_finite() || (index < 3 && value == T::ZERO) {
                    return Err(Error::DegenerateCoefficient {
                        iter, index, value })
                }
            }
            e = e * T::HALF;
            let mut x = [T::ZERO; 3];
            for (index, xi) in x.iter_mut().enumerate() {
                let ratio = na[index + 1] / na[index];
                if ratio < T::ZERO {
                    return Err(Error::ComplexRoots { iter, index, ratio })
                }
                *xi = ratio.powf(e);
            }
            trace!(iter, coeffs = ?na, "root squaring");
            debug!(iter, candidates = ?x, "lobachevsky iteration");
            if self.is_root_magnitude(x[0])?
                && self.is_root_magnitude(x[1])?
                && self.is_root_magnitude(x[2])? {
                    return Ok(x)
                }
            a = na;
        }
        debug!(iter, "lobachevsky: maximum number of iterations reached");
        Err(Error::NonConvergent { iter })
    }

    /// Return the roots of the cubic, in the order of
    /// [`unsigned_roots`][Lobachevsky::unsigned_roots], with their
    /// sign determined by [`assign_signs`].  Fewer than three roots
    /// are returned if some magnitude is accepted neither as a
    /// positive nor as a negative root.
    pub fn roots(&mut self) -> Result<Vec<T>, Error<T, R::Error>> {
        let x = self.unsigned_roots()?;
        assign_signs(&mut self.f, &x, self.fault, self.acceptance)
    }
}

/// For each magnitude `x` in `candidates`, return `x` if `f`(x) is
/// accepted, `-x` if `f`(-x) is accepted, and drop it otherwise.
/// The order of `candidates` is preserved.
///
/// With [`Acceptance::Signed`], the test is `f(x) < fault`, so a
/// candidate where `f` is very negative is kept as is.
///
/// ```
/// # fn main() -> Result<(), rootsep::Error<f64>> {
/// use rootsep::{assign_signs, Acceptance};
/// let f = |x: f64| x * x - 4.;
/// let r = assign_signs(f, &[2., 5.], 1e-9, Acceptance::Magnitude)?;
/// assert_eq!(r, [2.]);
/// # Ok(()) }
/// ```
pub fn assign_signs<T, F, R>(
    mut f: F, candidates: &[T], fault: T, acceptance: Acceptance,
) -> Result<Vec<T>, Error<T, R::Error>>
where
    T: Real,
    F: FnMut(T) -> R,
    R: FloatOrError<T>,
{
    let mut roots = Vec::with_capacity(candidates.len());
    for &x in candidates {
        if acceptance.accepts(eval_finite(&mut f, x)?, fault) {
            roots.push(x);
        } else if acceptance.accepts(eval_finite(&mut f, -x)?, fault) {
            roots.push(-x);
        } else {
            debug!(x = ?x, "candidate rejected with both signs");
        }
    }
    Ok(roots)
}

////////////////////////////////////////////////////////////////////////
//
// Tests

#[cfg(test)]
macro_rules! assert_approx_eq {
    ($a: expr, $b: expr, $err: expr) => {
        let a = $a;
        let b = $b;
        if ! ((a.clone() - b.clone()).abs() <= $err) {
            panic!("|left - right| ≤ {:e}\n  left: {}\n right: {}",
                   $err, a, b);
        }
    }
}
#[cfg(test)]
pub(crate) use assert_approx_eq;

#[cfg(test)]
mod tests {
    use std::fmt::{Debug, Display};
    use rand::prelude::*;
    use crate::{self as rootsep, Acceptance, NoError, Poly, Sign};

    type R<T> = Result<(), rootsep::Error<T, NoError>>;

    const P: [f64; 4] = [1., -3., 0., 2.5];

    fn f(x: f64) -> f64 { x * x * x - 3. * x * x + 2.5 }

    #[test]
    fn error_is_static() {
        // Compile time test.
        fn _f<T>(x: T) -> Result<(), Box<dyn std::error::Error + 'static>>
        where T: Debug + Display + 'static + Clone {
            let fx = x.clone();
            Err(Box::new(rootsep::Error::<_, NoError>::NotFinite{x, fx}))
        }
    }

    #[test]
    fn poly_transforms() -> R<f64> {
        let p = Poly::new(&P)?;
        assert_eq!(p.degree(), 3);
        assert_eq!(p.reversed().coeffs(), [2.5, 0., -3., 1.]);
        assert_eq!(p.alternated().coeffs(), [-1., -3., 0., 2.5]);
        assert_eq!(p.alternated().negated().reversed().coeffs(),
                   [-2.5, 0., 3., 1.]);
        assert_eq!(p.reversed().reversed(), p);
        assert_eq!(p.most_negative(), Some(-3.));
        assert_eq!(Poly::new(&[1., 2.])?.most_negative(), None);
        Ok(())
    }

    #[test]
    fn poly_eval() -> R<f64> {
        let p = Poly::new(&P)?;
        for x in [-3., -0.5, 0., 1.25, 2.] {
            assert_approx_eq!(p.eval(x), f(x), 1e-14);
        }
        // P(-x) is the alternated polynomial.
        assert_approx_eq!(p.alternated().eval(1.5), f(-1.5), 1e-14);
        Ok(())
    }

    #[test]
    fn poly_invalid() {
        assert!(matches!(Poly::<f64>::new(&[]),
                         Err(rootsep::Error::UnsupportedDegree { len: 0 })));
        assert!(matches!(Poly::new(&[0., 1., -1.]),
                         Err(rootsep::Error::ZeroLeading { transform: 0 })));
        assert!(matches!(
            Poly::new(&[1., f64::NAN]),
            Err(rootsep::Error::NonFiniteCoefficient { index: 1, .. })));
    }

    #[test]
    fn bernoulli_test_polynomial() -> R<f64> {
        let [n0, n1, n2, n3] = rootsep::bernoulli_coefficients(&P)?;
        assert_eq!(n0, 4.);
        assert_approx_eq!(n1, 1. + 1.2f64.sqrt(), 1e-15);
        assert_approx_eq!(n2, 1. + 3f64.powf(1. / 3.), 1e-15);
        assert_eq!(n3, 2.);
        let b = rootsep::bernoulli(&P)?;
        assert_approx_eq!(b.positive.lower, 0.47722557505166113, 1e-15);
        assert_eq!(b.positive.upper, 4.);
        assert_approx_eq!(b.negative.lower, -2.4422495703074083, 1e-15);
        assert_eq!(b.negative.upper, -0.5);
        assert_eq!(b[Sign::Positive], b.positive);
        assert_eq!(b[Sign::Negative], b.negative);
        // The extremal roots are inside.
        assert!(b.positive.contains(&2.6417835274533035));
        assert!(b.negative.contains(&-0.8100377230156204));
        Ok(())
    }

    #[test]
    fn bernoulli_idempotent() -> R<f64> {
        assert_eq!(rootsep::bernoulli(&P)?, rootsep::bernoulli(&P)?);
        Ok(())
    }

    #[test]
    fn bernoulli_f32() -> R<f32> {
        let b = rootsep::bernoulli(&[1f32, -3., 0., 2.5])?;
        assert_eq!(b.positive.upper, 4.);
        assert_eq!(b.negative.upper, -0.5);
        Ok(())
    }

    #[test]
    fn bernoulli_no_negative_coefficient() {
        assert!(matches!(
            rootsep::bernoulli(&[1., 2., 3.]),
            Err(rootsep::Error::NoNegativeCoefficient { transform: 0 })));
        // P₂ = [-1, -1] but P₃ = [1, 1].
        assert!(matches!(
            rootsep::bernoulli(&[1., -1.]),
            Err(rootsep::Error::NoNegativeCoefficient { transform: 3 })));
    }

    #[test]
    fn bernoulli_zero_leading() {
        assert!(matches!(
            rootsep::bernoulli(&[0., -3., 0., 2.5]),
            Err(rootsep::Error::ZeroLeading { transform: 0 })));
        // Zero constant term: P₁ has a zero leading coefficient.
        assert!(matches!(
            rootsep::bernoulli(&[1., -3., 2., 0.]),
            Err(rootsep::Error::ZeroLeading { transform: 1 })));
        assert!(matches!(
            rootsep::bernoulli(&[-3.]),
            Err(rootsep::Error::UnsupportedDegree { len: 1 })));
    }

    #[test]
    fn bernoulli_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0 .. 1000 {
            let len = rng.gen_range(2 ..= 8);
            let p: Vec<f64> = (0 .. len)
                .map(|_| rng.gen_range(-10. .. 10.)).collect();
            let Ok(b) = rootsep::bernoulli(&p) else { continue };
            assert!(b.special.iter().all(|&n| n >= 1.), "{p:?}");
            assert!(b.positive.lower <= b.positive.upper, "{p:?}");
            assert!(b.negative.lower <= b.negative.upper, "{p:?}");
        }
    }

    #[test]
    fn graeffe_step() {
        assert_eq!(rootsep::graeffe(P), [1., 9., 15., 6.25]);
        assert_eq!(rootsep::graeffe([1., 9., 15., 6.25]),
                   [1., 51., 112.5, 39.0625]);
    }

    #[test]
    fn lobachevsky_test_polynomial() -> R<f64> {
        let x = rootsep::lobachevsky(f, &P).maxiter(5).unsigned_roots()?;
        assert_approx_eq!(x[0], 2.6417835274533035, 1e-12);
        assert_approx_eq!(x[1], 1.1682546991935217, 1e-12);
        assert_approx_eq!(x[2], 0.8100377230156204, 1e-12);
        let r = rootsep::lobachevsky(f, &P).fault(1e-4).roots()?;
        assert_eq!(r.len(), 3);
        assert!(r[0] > 0. && r[1] > 0. && r[2] < 0.);
        for &x in &r {
            assert!(f(x).abs() < 1e-4, "f({x}) = {}", f(x));
        }
        Ok(())
    }

    #[test]
    fn lobachevsky_against_cubic_solver() -> R<f64> {
        let mut r = rootsep::lobachevsky(f, &P).roots()?;
        r.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let expected = roots::find_roots_cubic(1., -3., 0., 2.5);
        let mut expected = expected.as_ref().to_vec();
        expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(expected.len(), 3);
        for (x, y) in r.iter().zip(&expected) {
            assert_approx_eq!(*x, *y, 1e-5);
        }
        Ok(())
    }

    #[test]
    fn lobachevsky_f32() -> R<f32> {
        let f = |x: f32| x * x * x - 3. * x * x + 2.5;
        let r = rootsep::lobachevsky(f, &[1f32, -3., 0., 2.5])
            .maxiter(8).roots()?;
        assert_eq!(r.len(), 3);
        assert_approx_eq!(r[0], 2.6417835f32, 1e-5);
        assert_approx_eq!(r[2], -0.8100377f32, 1e-5);
        Ok(())
    }

    #[test]
    fn lobachevsky_unsupported_degree() {
        for p in [&[1., -3., 2.][..], &[1., 0., -3., 0., 2.5][..]] {
            assert!(matches!(
                rootsep::lobachevsky(|x: f64| x, p).roots(),
                Err(rootsep::Error::UnsupportedDegree { len })
                    if len == p.len()));
        }
    }

    #[test]
    fn lobachevsky_zero_leading() {
        assert!(matches!(
            rootsep::lobachevsky(|x: f64| x, &[0., -3., 0., 2.5]).roots(),
            Err(rootsep::Error::ZeroLeading { transform: 0 })));
    }

    #[test]
    fn lobachevsky_degenerate() {
        // x³ + 1: A₁ = 0.
        assert!(matches!(
            rootsep::lobachevsky(|x: f64| x * x * x + 1., &[1., 0., 0., 1.])
                .roots(),
            Err(rootsep::Error::DegenerateCoefficient {
                iter: 1, index: 1, .. })));
        // Never accepted: coefficients overflow before `maxiter`.
        assert!(matches!(
            rootsep::lobachevsky(|_| 1., &P).roots(),
            Err(rootsep::Error::DegenerateCoefficient {
                iter: 10, index: 1, .. })));
    }

    #[test]
    fn lobachevsky_complex_roots() {
        // (x - 1)(x² + 1)
        let f = |x: f64| x * x * x - x * x + x - 1.;
        assert!(matches!(
            rootsep::lobachevsky(f, &[1., -1., 1., -1.]).roots(),
            Err(rootsep::Error::ComplexRoots { iter: 1, index: 0, .. })));
    }

    #[test]
    fn lobachevsky_non_convergent() {
        assert!(matches!(
            rootsep::lobachevsky(|_| 1., &P).maxiter(5).roots(),
            Err(rootsep::Error::NonConvergent { iter: 5 })));
    }

    #[test]
    fn lobachevsky_fun_error() {
        let g = |x: f64| if x > 2. { Err("too large") } else { Ok(f(x)) };
        assert!(matches!(rootsep::lobachevsky(g, &P).roots(),
                         Err(rootsep::Error::Fun { x, err: "too large" })
                             if x == 3.));
    }

    #[test]
    fn lobachevsky_f_nan() {
        assert!(matches!(
            rootsep::lobachevsky(|_| f64::NAN, &P).roots(),
            Err(rootsep::Error::NotFinite { x, .. }) if x == 3.));
    }

    #[test]
    fn lobachevsky_f_neg_infinity() {
        assert!(matches!(
            rootsep::lobachevsky(|_| f64::NEG_INFINITY, &P).roots(),
            Err(rootsep::Error::NotFinite { x, fx })
                if x == 3. && fx == f64::NEG_INFINITY));
    }

    // The acceptance test is `f(x) < fault`, not `|f(x)| < fault`.
    #[test]
    fn lobachevsky_signed_acceptance() -> R<f64> {
        // A negative function accepts the first candidates as they are.
        let r = rootsep::lobachevsky(|_| -1., &P).roots()?;
        assert_eq!(r.len(), 3);
        assert_approx_eq!(r[0], 3., 1e-15);
        assert!(r.iter().all(|&x| x > 0.));
        // Negative only on the negative axis: all signs flip.
        let g = |x: f64| if x < 0. { -1e6 } else { 1e6 };
        let r = rootsep::lobachevsky(g, &P).roots()?;
        assert_approx_eq!(r[0], -3., 1e-15);
        assert!(r.iter().all(|&x| x < 0.));
        Ok(())
    }

    #[test]
    fn lobachevsky_magnitude_acceptance() -> R<f64> {
        assert!(matches!(
            rootsep::lobachevsky(|_| -1., &P).maxiter(5)
                .acceptance(Acceptance::Magnitude).roots(),
            Err(rootsep::Error::NonConvergent { iter: 5 })));
        let r = rootsep::lobachevsky(f, &P)
            .acceptance(Acceptance::Magnitude).roots()?;
        assert_eq!(r.len(), 3);
        Ok(())
    }

    #[test]
    fn default_fault() {
        let l = rootsep::lobachevsky(f, &P).fault(-1.);
        assert_eq!(l.fault, 1e-4);
        let l = rootsep::lobachevsky(f, &P).fault(f64::NAN);
        assert_eq!(l.fault, 1e-4);
        let l = rootsep::lobachevsky(f, &P).maxiter(0);
        assert_eq!(l.maxiter, usize::MAX);
    }

    #[test]
    fn assign_signs_asymmetric() -> R<f64> {
        let g = |x: f64| if x.abs() == 2. { 1. } else { -1. };
        let r = rootsep::assign_signs(g, &[1., 2., 3.], 1e-4,
                                      Acceptance::Signed)?;
        assert_eq!(r, [1., 3.]);
        let g = |x: f64| if x > 0. { 5. } else { -5. };
        let r = rootsep::assign_signs(g, &[1., 2., 3.], 1e-4,
                                      Acceptance::Signed)?;
        assert_eq!(r, [-1., -2., -3.]);
        let r = rootsep::assign_signs(g, &[1., 2., 3.], 1e-4,
                                      Acceptance::Magnitude)?;
        assert!(r.is_empty());
        Ok(())
    }

    #[test]
    fn error_display() {
        let e = rootsep::Error::<f64>::NoNegativeCoefficient { transform: 2 };
        assert_eq!(e.to_string(), "P2 has no negative coefficient");
        let e = rootsep::Error::<f64>::NonConvergent { iter: 7 };
        assert_eq!(e.to_string(), "no convergence after 7 iterations");
        let e = rootsep::Error::<f64>::ComplexRoots {
            iter: 1, index: 0, ratio: -1. };
        assert_eq!(e.to_string(),
                   "iteration 1: A1/A0 = -1 is negative (complex roots)");
    }

    #[test]
    fn sign_display() {
        assert_eq!(Sign::Positive.to_string(), "positive");
        assert_eq!(Sign::Negative.to_string(), "negative");
    }

    // The lab driver prints whole bounds as "4.0", not "4".
    #[test]
    fn bounds_debug_format() -> R<f64> {
        let b = rootsep::bernoulli(&P)?;
        let pos = Sign::Positive;
        assert_eq!(format!("{pos}: {:?}", b[pos].upper), "positive: 4.0");
        assert_eq!(format!("{:?}", b[Sign::Negative].upper), "-0.5");
        Ok(())
    }
}
