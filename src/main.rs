//! Command-line interface for scte224

#[cfg(feature = "cli")]
use clap::{ArgAction, Parser, Subcommand};

#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use scte224::comparison::compare_xml;
#[cfg(feature = "cli")]
use scte224::duration::{parse_duration, Duration, DurationPolicy};
#[cfg(feature = "cli")]
use scte224::generator::{default_start, generate, GeneratorConfig};
#[cfg(feature = "cli")]
use scte224::loaders::Loader;
#[cfg(feature = "cli")]
use scte224::locations::Location;
#[cfg(feature = "cli")]
use scte224::schema::{Document, SchemaVersion};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "scte224")]
#[command(author, version, about = "SCTE-224 document conversion tool", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a document to another schema revision
    Convert {
        /// Document path, inline XML, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Target revision: 2015, 2018 or 2020
        #[arg(short, long)]
        to: SchemaVersion,

        /// Source revision; detected when omitted
        #[arg(short, long)]
        from: Option<SchemaVersion>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every dropped feature to stderr
        #[arg(short, long)]
        report: bool,

        /// Write without indentation
        #[arg(long)]
        compact: bool,
    },

    /// Show the revision, root entity and entity counts of a document
    Inspect {
        /// Document path, inline XML, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Print the parsed model as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Parse and re-serialize a document, checking nothing was lost
    Roundtrip {
        /// Document path, inline XML, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: String,

        /// Print the re-serialized document
        #[arg(short, long)]
        print: bool,
    },

    /// Expand a template Media into a MediaPoint schedule
    Generate {
        /// Template Media with a start and an end MediaPoint
        #[arg(value_name = "TEMPLATE")]
        template: String,

        /// Schedule start (RFC 3339); defaults to the previous full hour
        #[arg(short, long)]
        start: Option<String>,

        /// Total span, as an ISO 8601 duration
        #[arg(long, default_value = "PT336H")]
        span: String,

        /// Window of each point pair, as an ISO 8601 duration
        #[arg(short, long, default_value = "PT30M")]
        window: String,

        /// Revision of the generated document
        #[arg(short, long, default_value = "2018")]
        to: SchemaVersion,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a duration literal
    Duration {
        /// Duration literal, e.g. PT1M15S
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,

        /// Reject malformed literals instead of reading them as zero
        #[arg(long)]
        strict: bool,
    },
}

#[cfg(feature = "cli")]
fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            file,
            to,
            from,
            output,
            report,
            compact,
        } => cmd_convert(file, to, from, output, report, compact),
        Commands::Inspect { file, json } => cmd_inspect(file, json),
        Commands::Roundtrip { file, print } => cmd_roundtrip(file, print),
        Commands::Generate {
            template,
            start,
            span,
            window,
            to,
            output,
        } => cmd_generate(template, start, span, window, to, output),
        Commands::Duration { value, strict } => cmd_duration(value, strict),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scte224={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn write_output(text: &str, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(output_path) = output {
        fs::write(output_path, text)?;
    } else {
        println!("{}", text);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_convert(
    file: String,
    to: SchemaVersion,
    from: Option<SchemaVersion>,
    output: Option<PathBuf>,
    print_report: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let loader = Loader::new();
    let location = Location::from_arg(&file);
    let doc = match from {
        Some(version) => loader.load_document_as(&location, version)?,
        None => loader.load_document(&location)?,
    };

    let (converted, report) = doc.convert_to(to);
    if print_report {
        if report.is_lossless() {
            eprintln!("{} -> {}: lossless", doc.version(), to);
        } else {
            eprintln!("{} -> {}: {} dropped", doc.version(), to, report.losses().len());
            for loss in report.losses() {
                eprintln!("  - {}", loss);
            }
        }
    }

    let xml = if compact {
        converted.to_xml()?
    } else {
        converted.to_xml_pretty()?
    };
    write_output(&xml, output)
}

#[cfg(feature = "cli")]
fn cmd_inspect(file: String, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let doc = Loader::new().load_document(&Location::from_arg(&file))?;
    if json_output {
        println!("{}", doc.to_json()?);
    } else {
        println!("scte224 v{}", scte224::VERSION);
        println!();
        println!("{}", doc.summary());
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_roundtrip(file: String, print: bool) -> Result<(), Box<dyn std::error::Error>> {
    let loader = Loader::new();
    let original = loader.load(&Location::from_arg(&file))?;
    let doc = Document::parse_with(&original, &loader.parse_options())?;
    let written = doc.to_xml_pretty()?;

    if print {
        println!("{}", written);
    }

    let differences = compare_xml(&original, &written)?;
    if differences.is_empty() {
        println!("✓ {} {} round-trips", doc.version(), doc.kind());
        Ok(())
    } else {
        println!("✗ {} {} changed on round trip", doc.version(), doc.kind());
        println!();
        println!("Differences:");
        for difference in &differences {
            println!("  - {}", difference);
        }
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn cmd_generate(
    template: String,
    start: Option<String>,
    span: String,
    window: String,
    to: SchemaVersion,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = match start {
        Some(text) => chrono::DateTime::parse_from_rfc3339(&text)
            .map_err(|e| format!("invalid start time '{}': {}", text, e))?,
        None => default_start(),
    };
    let config = GeneratorConfig::starting_at(start)
        .with_span(parse_duration(&span, DurationPolicy::Strict)?)
        .with_window(parse_duration(&window, DurationPolicy::Strict)?);

    let doc = Loader::new().load_document(&Location::from_arg(&template))?;
    let media = match doc.convert(SchemaVersion::V2018) {
        Document::V2018(scte224::v2018::Root::Media(media)) => media,
        other => {
            return Err(format!("template must be a Media document, found {}", other.kind()).into())
        }
    };

    let schedule = generate(&media, &config)?;
    let generated = Document::V2018(scte224::v2018::Root::Media(schedule));
    let (converted, _) = generated.convert_to(to);
    write_output(&converted.to_xml_pretty()?, output)
}

#[cfg(feature = "cli")]
fn cmd_duration(value: String, strict: bool) -> Result<(), Box<dyn std::error::Error>> {
    let policy = if strict {
        DurationPolicy::Strict
    } else {
        DurationPolicy::Lenient
    };
    let decoded = parse_duration(&value, policy)?;
    let seconds = decoded.num_milliseconds() as f64 / 1000.0;
    println!("seconds:   {}", seconds);
    println!("canonical: {}", Duration::from_chrono(decoded));
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
