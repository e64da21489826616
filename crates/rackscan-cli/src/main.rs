use rackscan::export::{ExportFormat, HeadlessError, export_scan};
use rackscan::{ScanOptions, Scanner, TilePatternWindow};
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Scan(rackscan::Error),
    Export(HeadlessError),
    EmptyInventory,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Scan(err) => write!(f, "{err}"),
            CliError::Export(err) => write!(f, "{err}"),
            CliError::EmptyInventory => write!(f, "No floor-plan objects recognized"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<rackscan::Error> for CliError {
    fn from(value: rackscan::Error) -> Self {
        Self::Scan(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        match value {
            HeadlessError::Load(err) => Self::Scan(err),
            other => Self::Export(other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Scan,
    Report,
    Annotate,
    Konva,
    Fabric,
}

impl Command {
    fn format(self) -> ExportFormat {
        match self {
            Command::Scan => ExportFormat::Inventory,
            Command::Report => ExportFormat::ReportCsv,
            Command::Annotate => ExportFormat::AnnotatedSvg,
            Command::Konva => ExportFormat::Konva,
            Command::Fabric => ExportFormat::Fabric,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    out: Option<String>,
    config: Option<String>,
    narrow_tiles: bool,
    fail_empty: bool,
}

fn usage() -> &'static str {
    "rackscan-cli\n\
\n\
USAGE:\n\
  rackscan-cli [scan] [--pretty] [--config <path>] [--narrow-tiles] [--fail-empty] [--out <path>] [<path>|-]\n\
  rackscan-cli report [--config <path>] [--narrow-tiles] [--fail-empty] [--out <path>] [<path>|-]\n\
  rackscan-cli annotate [--config <path>] [--narrow-tiles] [--fail-empty] [--out <path>] [<path>|-]\n\
  rackscan-cli konva [--pretty] [--config <path>] [--narrow-tiles] [--fail-empty] [--out <path>] [<path>|-]\n\
  rackscan-cli fabric [--pretty] [--config <path>] [--narrow-tiles] [--fail-empty] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - scan prints the inventory JSON; report prints CSV; annotate prints SVG.\n\
  - --config reads scan options from a JSON file; --narrow-tiles overrides its tile window.\n\
  - --fail-empty exits with status 3 when nothing was recognized.\n\
  - Log verbosity follows RACKSCAN_LOG (or RUST_LOG), default 'warn'.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "scan" => args.command = Command::Scan,
            "report" => args.command = Command::Report,
            "annotate" => args.command = Command::Annotate,
            "konva" => args.command = Command::Konva,
            "fabric" => args.command = Command::Fabric,
            "--pretty" => args.pretty = true,
            "--narrow-tiles" => args.narrow_tiles = true,
            "--fail-empty" => args.fail_empty = true,
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
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
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
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

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn source_file_name(input: Option<&str>) -> String {
    match input {
        Some(path) if path != "-" => Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string()),
        _ => "stdin".to_string(),
    }
}

fn scan_options(args: &Args) -> Result<ScanOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => ScanOptions::from_json(&std::fs::read_to_string(path)?)?,
        None => ScanOptions::default(),
    };
    if args.narrow_tiles {
        options.tile_pattern = TilePatternWindow::narrow();
    }
    Ok(options)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("RACKSCAN_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    let options = scan_options(&args)?;
    let svg = read_input(args.input.as_deref())?;

    let scan = Scanner::new().with_options(options).scan_str(&svg)?;
    if args.fail_empty && scan.inventory.is_empty() {
        return Err(CliError::EmptyInventory);
    }

    let source = source_file_name(args.input.as_deref());
    tracing::info!(command = ?args.command, source = %source, "writing output");
    let text = export_scan(&scan, args.command.format(), &source, args.pretty)?;
    write_text(&text, args.out.as_deref())
}

fn main() {
    init_tracing();

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

    match run(args) {
        Ok(()) => {}
        Err(CliError::EmptyInventory) => {
            eprintln!("{}", CliError::EmptyInventory);
            std::process::exit(3);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
