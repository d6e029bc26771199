use narwhal::{Algorithm, Context, Format, Graph, Layout, RenderOptions};
use std::io::{Read, Write};
use std::time::{Duration, Instant};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Narwhal(narwhal::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Narwhal(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Narwhal(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Layout,
    Render,
    Engines,
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    engine: String,
    options: Option<String>,
    pretty: bool,
    format: Format,
    scale: f64,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Layout,
            input: None,
            engine: "stress".to_string(),
            options: None,
            pretty: false,
            format: Format::Svg,
            scale: RenderOptions::default().scale,
            out: None,
        }
    }
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [layout] [--engine <name>] [--options <path>] [--pretty] [<path>|-]\n\
  narwhal-cli render [--engine <name>] [--options <path>] [--format svg|json] [--scale <n>] [--out <path>] [<path>|-]\n\
  narwhal-cli engines\n\
\n\
NOTES:\n\
  - Input is a JSON graph: {\"nodes\": [{\"id\": ..}], \"edges\": [{\"source\": .., \"target\": .., \"length\": ..}]}.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - --options is a JSON file with options for the selected engine; missing fields keep their defaults.\n\
  - layout prints node coordinates as JSON; render prints SVG to stdout unless --out is given.\n\
  - Set NARWHAL_TIMING=1 to print phase timings to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "layout" => args.command = Command::Layout,
            "render" => args.command = Command::Render,
            "engines" => args.command = Command::Engines,
            "--pretty" => args.pretty = true,
            "--engine" => {
                let Some(name) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.engine = name.clone();
            }
            "--options" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options = Some(path.clone());
            }
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.format = fmt
                    .parse::<Format>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let Some(scale) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.scale = scale.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_bytes(bytes: &[u8], out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
        Some(path) => std::fs::write(path, bytes)?,
    }
    Ok(())
}

/// Replaces the options of the engine registered as `engine` with the ones in `text`.
fn configure_engine(ctx: &mut Context, engine: &str, text: &str) -> Result<(), CliError> {
    let Some(current) = ctx.engine(engine) else {
        return Err(narwhal::Error::UnknownEngine {
            name: engine.to_string(),
        }
        .into());
    };
    let configured = match current {
        Algorithm::Stress(_) => Algorithm::Stress(serde_json::from_str(text)?),
        Algorithm::UniformStress(_) => Algorithm::UniformStress(serde_json::from_str(text)?),
        Algorithm::Circle(_) => Algorithm::Circle(serde_json::from_str(text)?),
    };
    ctx.register(engine, configured);
    Ok(())
}

#[derive(Debug, Default)]
struct Timings {
    read: Duration,
    layout: Duration,
    render: Duration,
}

fn run(args: Args) -> Result<(), CliError> {
    let timing_enabled = std::env::var("NARWHAL_TIMING").ok().as_deref() == Some("1");
    let total_start = timing_enabled.then(Instant::now);
    let mut timings = Timings::default();

    let mut ctx = Context::new();
    if let Command::Engines = args.command {
        for name in ctx.engines() {
            println!("{name}");
        }
        return Ok(());
    }
    if let Some(path) = args.options.as_deref() {
        let text = std::fs::read_to_string(path)?;
        configure_engine(&mut ctx, &args.engine, &text)?;
    }

    let read_start = timing_enabled.then(Instant::now);
    let text = read_input(args.input.as_deref())?;
    let mut graph = Graph::from_json(&text)?;
    if let Some(s) = read_start {
        timings.read = s.elapsed();
    }

    let layout_start = timing_enabled.then(Instant::now);
    let layout = Layout::new(&ctx, &mut graph, &args.engine)?;
    if let Some(s) = layout_start {
        timings.layout = s.elapsed();
    }

    let render_start = timing_enabled.then(Instant::now);
    let (format, out) = match args.command {
        Command::Layout => (Format::Json, None),
        _ => (args.format, args.out.as_deref()),
    };
    let options = RenderOptions {
        scale: args.scale,
        pretty: args.pretty,
        ..Default::default()
    };
    let data = layout.render_with(format, &options)?;
    write_bytes(data.as_bytes(), out)?;
    if let Some(s) = render_start {
        timings.render = s.elapsed();
    }

    if let Some(s) = total_start {
        eprintln!(
            "narwhal timing: read={:?} layout={:?} render={:?} total={:?} nodes={} engine={}",
            timings.read,
            timings.layout,
            timings.render,
            s.elapsed(),
            layout.positions().map_or(0, |p| p.len()),
            layout.engine(),
        );
    }
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        std::iter::once("narwhal-cli")
            .chain(items.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn parse_args_reads_render_flags() {
        let args = parse_args(&argv(&[
            "render", "--engine", "uniform", "--format", "JSON", "--scale", "10", "--out", "o.json",
            "g.json",
        ]))
        .unwrap();
        assert!(matches!(args.command, Command::Render));
        assert_eq!(args.engine, "uniform");
        assert_eq!(args.format, Format::Json);
        assert_eq!(args.scale, 10.0);
        assert_eq!(args.out.as_deref(), Some("o.json"));
        assert_eq!(args.input.as_deref(), Some("g.json"));
    }

    #[test]
    fn parse_args_rejects_bad_usage() {
        for bad in [
            &["--format", "png"][..],
            &["--scale", "0"],
            &["--engine"],
            &["a.json", "b.json"],
            &["--bogus"],
        ] {
            assert!(
                matches!(parse_args(&argv(bad)), Err(CliError::Usage(_))),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn stdin_dash_is_an_input() {
        let args = parse_args(&argv(&["layout", "-"])).unwrap();
        assert_eq!(args.input.as_deref(), Some("-"));
    }

    #[test]
    fn options_replace_the_engine_configuration() {
        let mut ctx = Context::new();
        configure_engine(&mut ctx, "stress", r#"{"max_hops": 2, "dim": 3}"#).unwrap();
        match ctx.engine("stress") {
            Some(Algorithm::Stress(opts)) => {
                assert_eq!(opts.max_hops, Some(2));
                assert_eq!(opts.dim, 3);
                assert_eq!(opts.max_iterations, 300);
            }
            other => panic!("unexpected engine: {other:?}"),
        }
        assert!(matches!(
            configure_engine(&mut ctx, "dot", "{}"),
            Err(CliError::Narwhal(narwhal::Error::UnknownEngine { .. }))
        ));
    }
}
