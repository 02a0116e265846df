//! # Labelsmith CLI
//!
//! Command-line interface for compiling and printing label templates.
//!
//! ## Usage
//!
//! ```bash
//! # Write a starter template on 58 x 40 mm stock
//! labelsmith new --preset "58 x 40 mm" --output shelf.json
//!
//! # Compile to ZPL with a variable override
//! labelsmith compile shelf.json --lang zpl --var sku=SKU-42
//!
//! # Show annotated ESC/POS bytes
//! labelsmith compile shelf.json --lang escpos --comments
//!
//! # Send to the printer
//! labelsmith print shelf.json --device /dev/rfcomm0
//!
//! # Run the HTTP API
//! labelsmith serve --listen 0.0.0.0:8080 --session session.json
//! ```

use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use labelsmith::{
    Document, LabelError, PrinterLanguage, VariableMap,
    document::Template,
    editor::Editor,
    printer::config::{DEFAULT_PRESET, preset, presets},
    printer::fonts::font_families,
    protocol,
    server::{self, DEFAULT_LISTEN_ADDR, ServerConfig},
    session::FileStore,
    transport::{DeviceTransport, Transport, device::DEFAULT_DEVICE},
};

/// Labelsmith - Thermal label compiler and printer utility
#[derive(Parser, Debug)]
#[command(name = "labelsmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the label comes from.
#[derive(clap::Args, Debug)]
struct Source {
    /// Template JSON file (omit to use the session or the default layout)
    template: Option<PathBuf>,

    /// Session file to read the label and settings from
    #[arg(long, value_name = "FILE", conflicts_with = "template")]
    session: Option<PathBuf>,

    /// Printer language: tspl, zpl or escpos
    #[arg(long)]
    lang: Option<String>,

    /// Variable override, repeatable (KEY=VALUE; braces optional)
    #[arg(long = "var", value_name = "KEY=VALUE")]
    vars: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile a label and print the commands to stdout
    Compile {
        #[command(flatten)]
        source: Source,

        /// Annotate ESC/POS output with command descriptions
        #[arg(long)]
        comments: bool,

        /// Write to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Compile a label and send it to the printer
    Print {
        #[command(flatten)]
        source: Source,

        /// Printer device path
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,
    },

    /// Write the starter layout as a template
    New {
        /// Label size preset
        #[arg(long, default_value = DEFAULT_PRESET)]
        preset: String,

        /// Write to a file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List label presets and font families
    Presets,

    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = DEFAULT_LISTEN_ADDR)]
        listen: String,

        /// Printer device path
        #[arg(long, default_value = DEFAULT_DEVICE)]
        device: String,

        /// Session file (in-memory if omitted)
        #[arg(long, value_name = "FILE")]
        session: Option<PathBuf>,
    },
}

fn main() {
    labelsmith::init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LabelError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            source,
            comments,
            output,
        } => {
            let (lang, doc, vars) = load(&source)?;
            let text = protocol::compile(lang, &doc, &vars, comments);
            write_output(output.as_deref(), &text)?;
        }
        Commands::Print { source, device } => {
            let (lang, doc, vars) = load(&source)?;
            let payload = protocol::payload(lang, &doc, &vars);
            let mut transport = DeviceTransport::open(&device)?;
            transport.write_all(&payload)?;
            println!("Printed {} bytes of {} to {}", payload.len(), lang, device);
        }
        Commands::New { preset: name, output } => {
            let size = preset(&name)
                .ok_or_else(|| LabelError::InvalidArgument(format!("unknown preset '{}'", name)))?;
            let mut doc = Document::default_layout();
            doc.set_label_size(size);
            write_output(output.as_deref(), &Template::export(&doc)?)?;
        }
        Commands::Presets => {
            println!("Label presets:");
            for size in presets() {
                println!("  {:<14} {} x {} mm", size.name, size.width, size.height);
            }
            println!("\nFont families:");
            for family in font_families() {
                println!("  {}", family);
            }
            println!("\nPrinter languages:");
            for lang in PrinterLanguage::ALL {
                println!("  {}", lang);
            }
        }
        Commands::Serve {
            listen,
            device,
            session,
        } => {
            let config = ServerConfig {
                device_path: device,
                listen_addr: listen,
                session_path: session,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(config))?;
        }
    }

    Ok(())
}

/// Resolve the label, language and variables for compile/print.
fn load(source: &Source) -> Result<(PrinterLanguage, Document, VariableMap), LabelError> {
    let overrides = parse_vars(&source.vars)?;
    let lang_arg = source.lang.as_deref().map(str::parse::<PrinterLanguage>).transpose()?;

    if let Some(path) = &source.session {
        let editor = Editor::new(FileStore::new(path));
        let mut vars = editor.variables();
        vars.extend(&overrides);
        let lang = lang_arg.unwrap_or(editor.printer_language());
        return Ok((lang, editor.document().clone(), vars));
    }

    let doc = match &source.template {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            Template::import(&json)?.into_document()
        }
        None => Document::default_layout(),
    };
    info!(elements = doc.elements.len(), "label loaded");
    let vars = VariableMap::with_defaults(Local::now(), &overrides);
    Ok((lang_arg.unwrap_or_default(), doc, vars))
}

/// Parse `KEY=VALUE` pairs; keys without braces get them added.
fn parse_vars(pairs: &[String]) -> Result<VariableMap, LabelError> {
    let mut vars = VariableMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| LabelError::InvalidArgument(format!("expected KEY=VALUE, got '{}'", pair)))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(LabelError::InvalidArgument(format!("empty variable name in '{}'", pair)));
        }
        let key = if key.starts_with('{') && key.ends_with('}') {
            key.to_string()
        } else {
            format!("{{{}}}", key)
        };
        vars.insert(key, value);
    }
    Ok(vars)
}

fn write_output(path: Option<&Path>, text: &str) -> Result<(), LabelError> {
    match path {
        Some(path) => {
            fs::write(path, text)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}
