//! Display of the curve y = f(x) of a function.
//!
//! A [`Curve`] samples a function on a half-open range; a
//! [`Renderer`] shows it.  The root isolation methods do not depend
//! on this module.
//!
//! ```
//! use rootsep::plot::{Curve, Renderer, TextPlot};
//! let curve = Curve::sample(|x: f64| x * x - 1., -2., 2., 0.01)
//!     .unwrap_or_else(|e| match e {});
//! let mut plot = TextPlot::new(Vec::new()).width(40).height(10);
//! plot.render(&curve)?;
//! assert_eq!(String::from_utf8_lossy(&plot.into_inner()).lines().count(), 11);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use tracing::warn;
use crate::FloatOrError;

/// Largest number of points [`Curve::sample`] produces.
pub const MAX_POINTS: usize = 1 << 20;

/// Points (x, f(x)) with x = `start` + i·`step` < `end`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Curve {
    /// Sample `f` on \[`start`, `end`\[ with the given `step`.  The
    /// number of points is ⌈(`end` - `start`) / `step`⌉; the curve is
    /// empty if `step` ≤ 0 or the range is empty or not finite.  If
    /// more than [`MAX_POINTS`] points would be needed, the step is
    /// widened to give exactly [`MAX_POINTS`] points.
    pub fn sample<F, R>(
        mut f: F, start: f64, end: f64, step: f64
    ) -> Result<Self, R::Error>
    where
        F: FnMut(f64) -> R,
        R: FloatOrError<f64>,
    {
        let n = (end - start) / step;
        if !(step > 0. && n > 0. && n.is_finite()) {
            return Ok(Curve::default())
        }
        let (n, step) = if n > MAX_POINTS as f64 {
            let wide = (end - start) / MAX_POINTS as f64;
            warn!(step, wide, "too many points, widening the sampling step");
            (MAX_POINTS, wide)
        } else {
            (n.ceil() as usize, step)
        };
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for i in 0 .. n {
            let x = start + i as f64 * step;
            ys.push(f(x).to_result()?);
            xs.push(x);
        }
        Ok(Curve { xs, ys })
    }

    pub fn xs(&self) -> &[f64] { &self.xs }

    pub fn ys(&self) -> &[f64] { &self.ys }

    pub fn len(&self) -> usize { self.xs.len() }

    pub fn is_empty(&self) -> bool { self.xs.is_empty() }

    /// Smallest and largest finite values of the function, if any.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.ys.iter().filter(|y| y.is_finite())
            .fold(None, |r, &y| match r {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}

/// Something able to display a [`Curve`].
pub trait Renderer {
    type Error;

    fn render(&mut self, curve: &Curve) -> Result<(), Self::Error>;
}

const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

/// Render a curve as a grid of characters, together with the dashed
/// line y = 0 when it is in range.
pub struct TextPlot<W> {
    out: W,
    width: usize,
    height: usize,
    color: bool,
}

impl<W: Write> TextPlot<W> {
    /// Plot to `out` on a 72 × 20 grid, with a red zero line.
    pub fn new(out: W) -> Self {
        TextPlot { out, width: 72, height: 20, color: true }
    }

    /// Set the number of columns (at least 2).
    pub fn width(mut self, width: usize) -> Self {
        self.width = width.max(2);
        self
    }

    /// Set the number of rows (at least 2).
    pub fn height(mut self, height: usize) -> Self {
        self.height = height.max(2);
        self
    }

    /// If `color` is `true` (the default), draw the zero line in red
    /// using ANSI escape codes.
    pub fn color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn into_inner(self) -> W { self.out }
}

#[derive(Clone, Copy, PartialEq)]
enum Cell { Empty, Curve, Zero }

impl<W: Write> Renderer for TextPlot<W> {
    type Error = io::Error;

    fn render(&mut self, curve: &Curve) -> io::Result<()> {
        let Some((mut lo, mut hi)) = curve.y_range() else {
            return writeln!(self.out, "(nothing to plot)")
        };
        if lo == hi {
            lo -= 1.;
            hi += 1.;
        }
        let (w, h) = (self.width, self.height);
        let row = |y: f64| ((hi - y) / (hi - lo) * (h - 1) as f64).round()
            as usize;
        let mut grid = vec![vec![Cell::Empty; w]; h];
        if lo <= 0. && 0. <= hi {
            let r = row(0.);
            for c in (0 .. w).step_by(2) {
                grid[r][c] = Cell::Zero;
            }
        }
        let n = curve.len();
        let mut prev: Option<usize> = None;
        for c in 0 .. w {
            let y = curve.ys[c * (n - 1) / (w - 1)];
            if !y.is_finite() {
                prev = None;
                continue
            }
            let r = row(y);
            // Join with the previous column so steep parts stay visible.
            let (r0, r1) = match prev {
                Some(p) if p < r => (p + 1, r),
                Some(p) if p > r => (r, p - 1),
                _ => (r, r),
            };
            for line in &mut grid[r0 ..= r1] {
                line[c] = Cell::Curve;
            }
            prev = Some(r);
        }
        for (r, line) in grid.iter().enumerate() {
            if r == 0 {
                write!(self.out, "{:>10.3} |", hi)?;
            } else if r == h - 1 {
                write!(self.out, "{:>10.3} |", lo)?;
            } else {
                write!(self.out, "{:>10} |", "")?;
            }
            for &cell in line {
                match cell {
                    Cell::Empty => write!(self.out, " ")?,
                    Cell::Curve => write!(self.out, "*")?,
                    Cell::Zero if self.color =>
                        write!(self.out, "{RED}-{RESET}")?,
                    Cell::Zero => write!(self.out, "-")?,
                }
            }
            writeln!(self.out)?;
        }
        let (x0, x1) = (curve.xs[0], curve.xs[n - 1]);
        let x0 = format!("{x0:.3}");
        writeln!(self.out, "{:>10}  {x0}{:>pad$.3}", "", x1,
                 pad = w.saturating_sub(x0.len()))?;
        self.out.flush()
    }
}
