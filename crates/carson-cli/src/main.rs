//! carson CLI: evaluate Carson's correction three ways and print them side by side.
//!
//! Usage:
//!   carson [p] [q] [--tol <eps>] [--plot]
//!   carson --geometry <h_i> <h_k> <x_ik> <f> <rho> [--tol <eps>] [--plot]
//!
//! Options:
//!   p, q          Evaluation point (default: 5.0 1.0)
//!   --tol <eps>   Sum the EMTP series until two successive terms are below
//!                 eps instead of to a fixed order (default: fixed order 25
//!                 for a point, eps = 1e-6 with --geometry)
//!   --plot        Also print every quadrature sample as "mu re im" lines
//!   --geometry    Evaluate the mutual term between two conductors
//!                 (heights and horizontal separation in m, frequency in Hz,
//!                 earth resistivity in Ohm.m); h_k = h_i, x_ik = 0 gives the
//!                 self term
//!
//! Set RUST_LOG=debug for per-method diagnostics.

use anyhow::{bail, Context, Result};
use num_complex::Complex64;

use carson_core::constants::{AGREEMENT_TOL, DEFAULT_EMTP_TOLERANCE, DEFAULT_P, DEFAULT_Q};
use carson_core::{
    Comparison, EarthReturn, EmtpTruncation, Evaluator, EvaluatorConfig, SeriesConfig,
};

/// CLI configuration parsed from command-line arguments.
struct CliConfig {
    mode: Mode,
    emtp: EmtpTruncation,
    plot: bool,
}

enum Mode {
    Point { p: f64, q: f64 },
    Geometry(EarthReturn),
}

fn parse_number(arg: &str, name: &str) -> Result<f64> {
    arg.parse::<f64>()
        .with_context(|| format!("{} must be a number, got '{}'", name, arg))
}

fn parse_args() -> Result<CliConfig> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut plot = false;
    let mut geometry = false;
    let mut tolerance = None;
    let mut values: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--plot" => plot = true,
            "--geometry" => geometry = true,
            "--tol" => {
                i += 1;
                let arg = args.get(i).context("--tol requires a value")?;
                tolerance = Some(parse_number(arg, "tol")?);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            value => values.push(value),
        }
        i += 1;
    }

    let mode = if geometry {
        let names = ["h_i", "h_k", "x_ik", "f", "rho"];
        if values.len() != names.len() {
            bail!("--geometry expects 5 values: h_i h_k x_ik f rho");
        }
        let v = values
            .iter()
            .zip(names)
            .map(|(arg, name)| parse_number(arg, name))
            .collect::<Result<Vec<f64>>>()?;
        let er = if v[0] == v[1] && v[2] == 0.0 {
            EarthReturn::self_term(v[0], v[3], v[4])?
        } else {
            EarthReturn::mutual(v[0], v[1], v[2], v[3], v[4])?
        };
        Mode::Geometry(er)
    } else {
        if values.len() > 2 {
            bail!("expected at most two values: p q");
        }
        let p = match values.first() {
            Some(arg) => parse_number(arg, "p")?,
            None => DEFAULT_P,
        };
        let q = match values.get(1) {
            Some(arg) => parse_number(arg, "q")?,
            None => DEFAULT_Q,
        };
        Mode::Point { p, q }
    };

    let emtp = match (tolerance, &mode) {
        (Some(eps), _) => EmtpTruncation::Tolerance(eps),
        (None, Mode::Geometry(_)) => EmtpTruncation::Tolerance(DEFAULT_EMTP_TOLERANCE),
        (None, Mode::Point { .. }) => EmtpTruncation::default(),
    };

    Ok(CliConfig { mode, emtp, plot })
}

fn print_row(label: &str, value: Complex64, deviation: Option<f64>) {
    match deviation {
        Some(d) => println!("  {:<12} P = {:>22.15e}  Q = {:>22.15e}  rel. dev = {:.3e}", label, value.re, value.im, d),
        None => println!("  {:<12} P = {:>22.15e}  Q = {:>22.15e}", label, value.re, value.im),
    }
}

fn print_comparison(cmp: &Comparison) {
    let point = &cmp.point;
    println!(
        "p = {}, q = {}  (r = {}, theta = {})",
        point.p(),
        point.q(),
        point.r(),
        point.theta()
    );

    print_row("quadrature", cmp.reference(), None);
    match &cmp.asymptotic {
        Ok(value) => print_row("asymptotic", *value, cmp.asymptotic_deviation()),
        Err(e) => println!("  {:<12} failed: {}", "asymptotic", e),
    }
    print_row("emtp", cmp.emtp.value, Some(cmp.emtp_deviation()));
    println!("  {:<12} summed to order {}", "", cmp.emtp.order);
    if cmp.emtp.is_degraded() {
        println!("  {:<12} degraded: not authoritative", "");
    }

    if let Some(err) = cmp.quadrature.error_estimate {
        println!("  richardson error estimate: {:.3e}", err);
    }
    println!("  truncated tail bound:      {:.3e}", cmp.quadrature.tail_bound);
    println!(
        "  agreement within {:e}: {}",
        AGREEMENT_TOL,
        if cmp.agrees_within(AGREEMENT_TOL) { "yes" } else { "no" }
    );
}

fn main() -> Result<()> {
    env_logger::init();

    let config = parse_args()?;
    let evaluator = Evaluator::with_config(EvaluatorConfig {
        series: SeriesConfig {
            emtp: config.emtp,
            ..Default::default()
        },
        ..Default::default()
    })?;

    let (cmp, geometry) = match config.mode {
        Mode::Point { p, q } => (evaluator.evaluate(p, q)?, None),
        Mode::Geometry(er) => (evaluator.evaluate_geometry(&er)?, Some(er)),
    };

    print_comparison(&cmp);

    if let Some(er) = geometry {
        println!();
        println!(
            "earth-return correction at {} Hz, {} Ohm.m (a = {:.6}, D = {:.3} m):",
            er.frequency,
            er.resistivity,
            er.parameter(),
            er.image_distance()
        );
        let rows = [
            ("quadrature", Some(cmp.reference())),
            ("asymptotic", cmp.asymptotic.as_ref().ok().copied()),
            ("emtp", Some(cmp.emtp.value)),
        ];
        for (label, value) in rows {
            if let Some(value) = value {
                let dz = er.correction(value);
                println!("  {:<12} dR = {:.6e} Ohm/km  dX = {:.6e} Ohm/km", label, dz.re, dz.im);
            }
        }
    }

    if config.plot {
        println!();
        println!("# mu re(f) im(f)");
        let point = cmp.point;
        for (mu, f) in evaluator.integrand_samples(point.p(), point.q())? {
            println!("{:.6e} {:.15e} {:.15e}", mu, f.re, f.im);
        }
    }

    Ok(())
}
