//! Bernoulli bounds and Lobachevsky roots of x³ - 3x² + 2.5, printed
//! while the curve of the polynomial is rendered.
//!
//! Run with `RUST_LOG=rootsep=debug` to follow the iterations.

use std::{error::Error, io::{self, Write}};
use clap::Parser;
use rootsep::{bernoulli, lobachevsky, plot::{Curve, Renderer, TextPlot},
              Sign};
use tracing_subscriber::EnvFilter;

const POLYNOM: [f64; 4] = [1., -3., 0., 2.5];

fn function(x: f64) -> f64 {
    x.powi(3) - 3. * x.powi(2) + 2.5
}

#[derive(Parser, Debug)]
#[command(about = "Isolate the roots of x³ - 3x² + 2.5")]
struct Args {
    /// Start of the plotted range.
    #[arg(long, default_value_t = -3., allow_hyphen_values = true)]
    start: f64,
    /// End (excluded) of the plotted range.
    #[arg(long, default_value_t = 3., allow_hyphen_values = true)]
    end: f64,
    /// Sampling step of the plot.
    #[arg(long, default_value_t = 0.0001)]
    step: f64,
    /// Fault tolerance of the Lobachevsky method.
    #[arg(long, default_value_t = 0.0001)]
    fault: f64,
    /// Maximum number of root squarings (0 = unlimited).
    #[arg(long, default_value_t = 100)]
    maxiter: usize,
    /// Number of columns of the plot.
    #[arg(long, default_value_t = 72)]
    width: usize,
    /// Number of rows of the plot.
    #[arg(long, default_value_t = 20)]
    height: usize,
    /// Draw the zero line without colour.
    #[arg(long)]
    no_color: bool,
    /// Do not plot the polynomial.
    #[arg(long)]
    no_plot: bool,
}

fn plot(args: &Args) -> io::Result<Vec<u8>> {
    let curve = Curve::sample(function, args.start, args.end, args.step)
        .unwrap_or_else(|e| match e {});
    let mut out = TextPlot::new(Vec::new())
        .width(args.width).height(args.height).color(!args.no_color);
    out.render(&curve)?;
    Ok(out.into_inner())
}

fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let (figure, computed) = rayon::join(
        || if args.no_plot { Ok(None) } else { plot(&args).map(Some) },
        || -> Result<_, rootsep::Error<f64>> {
            let bounds = bernoulli(&POLYNOM)?;
            let roots = lobachevsky(function, &POLYNOM)
                .fault(args.fault).maxiter(args.maxiter).roots()?;
            Ok((bounds, roots))
        });
    let (bounds, roots) = computed?;

    // `{:?}` keeps the ".0" of whole values.
    let (pos, neg) = (Sign::Positive, Sign::Negative);
    println!("{pos}: {:?}  to  {:?}", bounds[pos].lower, bounds[pos].upper);
    println!("{neg}: {:?} to {:?}", bounds[neg].lower, bounds[neg].upper);
    let roots: Vec<_> = roots.iter().map(|r| format!("{r:?}")).collect();
    println!("roots is:  {}", roots.join(",  "));

    if let Some(figure) = figure? {
        let mut stdout = io::stdout().lock();
        writeln!(stdout)?;
        stdout.write_all(&figure)?;
    }
    Ok(())
}
