//! Sluice CLI - inspect and produce encoded mutation events
//!
//! Works offline on files or stdin; nothing here talks to a broker.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sluice_cdc::avro::WIRE_SCHEMA_JSON;
use sluice_cdc::{MutationEvent, MutationEventSerializer, SerializationConfig};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sluice")]
#[command(about = "Sluice - encode and decode CDC mutation events")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Avro wire schema
    Schema,

    /// Decode an encoded event and print it as JSON
    Decode {
        /// Input file, `-` for stdin
        input: PathBuf,

        /// Input is hex text rather than raw bytes
        #[arg(long)]
        hex: bool,

        #[command(flatten)]
        format: FormatArgs,
    },

    /// Encode an event given as JSON
    Encode {
        /// JSON input file, `-` for stdin
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write hex text rather than raw bytes
        #[arg(long)]
        hex: bool,

        #[command(flatten)]
        format: FormatArgs,
    },
}

#[derive(Args, Debug, Default)]
struct FormatArgs {
    /// YAML file with serialization settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bare Avro datums, no wire header
    #[arg(long)]
    bare: bool,

    /// Schema id for the wire header
    #[arg(long)]
    schema_id: Option<u32>,
}

impl FormatArgs {
    /// Config file settings with command line overrides applied
    fn load(&self) -> anyhow::Result<SerializationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                parse_config(&text)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => SerializationConfig::default(),
        };

        if self.bare {
            config = config.with_confluent_wire_format(false);
        }
        if let Some(schema_id) = self.schema_id {
            config = config.with_schema_id(schema_id);
        }
        debug!(?config, "Loaded serialization config");
        Ok(config)
    }
}

fn parse_config(text: &str) -> anyhow::Result<SerializationConfig> {
    if text.trim().is_empty() {
        return Ok(SerializationConfig::default());
    }
    Ok(serde_yaml::from_str(text)?)
}

fn read_input(path: &Path) -> anyhow::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

fn parse_hex(input: &[u8]) -> anyhow::Result<Vec<u8>> {
    let text = std::str::from_utf8(input).context("hex input is not UTF-8")?;
    let digits: String = text.split_whitespace().collect();
    let digits = digits.strip_prefix("0x").unwrap_or(&digits);
    hex::decode(digits).context("invalid hex input")
}

fn decode(input: &Path, hex: bool, format: &FormatArgs) -> anyhow::Result<String> {
    let serializer = MutationEventSerializer::new(format.load()?);
    let mut bytes = read_input(input)?;
    if hex {
        bytes = parse_hex(&bytes)?;
    }
    let event = serializer.decode(&bytes)?;
    info!(
        topic = %event.topic_name(),
        partition_keys = event.partition_keys.len(),
        "Decoded event"
    );
    Ok(serde_json::to_string_pretty(&event)?)
}

fn encode(input: &Path, hex: bool, format: &FormatArgs) -> anyhow::Result<Vec<u8>> {
    let serializer = MutationEventSerializer::new(format.load()?);
    let json = read_input(input)?;
    let event: MutationEvent =
        serde_json::from_slice(&json).context("input is not a valid mutation event")?;
    let bytes = serializer.encode(&event)?;
    info!(topic = %event.topic_name(), bytes = bytes.len(), "Encoded event");

    if hex {
        let mut text = hex::encode(&bytes);
        text.push('\n');
        Ok(text.into_bytes())
    } else {
        Ok(bytes.to_vec())
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing; logs go to stderr so stdout stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema => {
            println!("{}", WIRE_SCHEMA_JSON);
        }

        Commands::Decode { input, hex, format } => {
            println!("{}", decode(&input, hex, &format)?);
        }

        Commands::Encode {
            input,
            output,
            hex,
            format,
        } => {
            let bytes = encode(&input, hex, &format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!("✓ Wrote {} bytes to {}", bytes.len(), path.display());
                }
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
    }

    Ok(())
}
