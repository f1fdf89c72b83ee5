use std::error::Error;
use std::fs;
use std::io::{self, Write};

use clap::{ArgAction, Parser, ValueEnum};
use kv3scan::num::{format_float, format_int};
use kv3scan::{encode_hex, parse_path, Document, ParseOptions, Value};

#[derive(Parser, Debug)]
#[command(name = "kv3q", version, about = "Lazy path queries over KeyValues3 collision text")]
struct Args {
    /// Input document (.vphys KeyValues3 text).
    input: String,

    /// Dot-separated path, e.g. m_parts.0.m_rnShape.m_hulls.0.m_Hull.
    /// Digit-only segments index into lists. Omit for the document root.
    path: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Output format: json, raw (bare scalars, blob bytes verbatim), or
    /// hex (uppercase space-separated blob text).
    #[arg(short, long, value_enum, value_name = "format", default_value_t = Format::Json)]
    format: Format,

    /// Skip boundary balance validation.
    #[arg(long = "no-strict", action = ArgAction::SetFalse, default_value_t = true)]
    strict: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Raw,
    Hex,
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("ERROR  {err}");
            std::process::exit(1);
        }
    }
}

fn run() -> Result<i32, Box<dyn Error>> {
    let args = Args::parse();
    let text = fs::read_to_string(&args.input)?;
    let options = ParseOptions::new().with_strict(args.strict);
    let document = Document::parse_with_options(&text, &options)?;

    let raw_path = args.path.as_deref().unwrap_or("");
    let path = parse_path(raw_path);
    let Some(value) = document.search(&path)? else {
        eprintln!("no value at {}", if raw_path.is_empty() { "<root>" } else { raw_path });
        return Ok(2);
    };

    with_output_writer(args.output.as_deref(), |writer| {
        render(writer, value, args.format)
    })?;
    Ok(0)
}

fn render(writer: &mut dyn Write, value: Value<'_>, format: Format) -> Result<(), Box<dyn Error>> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *writer, &value)?;
            writeln!(writer)?;
        }
        Format::Raw => match value {
            Value::Bool(flag) => writeln!(writer, "{flag}")?,
            Value::Int(number) => writeln!(writer, "{}", format_int(number))?,
            Value::Float(number) => writeln!(writer, "{}", format_float(number))?,
            Value::Hex(blob) => writer.write_all(&blob.bytes()?)?,
            Value::Dict(_) | Value::List(_) => {
                return Err("raw output needs a scalar or hex value; use --format json".into())
            }
        },
        Format::Hex => match value {
            Value::Hex(blob) => writeln!(writer, "{}", encode_hex(&blob.bytes()?))?,
            _ => return Err("hex output needs a hex blob; use --format json".into()),
        },
    }
    Ok(())
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}
