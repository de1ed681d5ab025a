use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transit_catalogue::Base;
use transit_catalogue_cli::requests::{self, BaseDocument, StatDocument};

#[derive(StructOpt)]
#[structopt(
    name = "transit-catalogue",
    about = "Build a transport base and answer statistics, map and route queries."
)]
enum Options {
    /// Read base_requests and settings, build the base, serialize it to the
    /// configured file.
    #[structopt(name = "make_base")]
    MakeBase {
        /// path of the JSON document; standard input when omitted
        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
    },
    /// Load a serialized base and answer stat_requests on standard output.
    #[structopt(name = "process_requests")]
    ProcessRequests {
        /// path of the JSON document; standard input when omitted
        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
    },
}

fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn read_document<T: serde::de::DeserializeOwned>(input: Option<&Path>) -> anyhow::Result<T> {
    let mut text = String::new();
    match input {
        Some(path) => {
            File::open(path)
                .with_context(|| format!("cannot open input file {}", path.display()))?
                .read_to_string(&mut text)?;
        }
        None => {
            io::stdin().read_to_string(&mut text)?;
        }
    }
    serde_json::from_str(&text).context("malformed request document")
}

fn make_base(input: Option<&Path>) -> anyhow::Result<()> {
    let document: BaseDocument = read_document(input)?;
    let base = requests::build_base(&document)?;

    let path = &document.serialization_settings.file;
    let file =
        File::create(path).with_context(|| format!("cannot create base file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    base.save_to(&mut writer)?;
    writer.flush()?;
    info!(file = %path.display(), "base written");
    Ok(())
}

fn process_requests(input: Option<&Path>) -> anyhow::Result<()> {
    let document: StatDocument = read_document(input)?;

    let path = &document.serialization_settings.file;
    let file =
        File::open(path).with_context(|| format!("cannot open base file {}", path.display()))?;
    let base = Base::load_from(&mut BufReader::new(file))?;
    info!(
        stops = base.catalogue.nb_of_stops(),
        buses = base.catalogue.nb_of_buses(),
        "base loaded"
    );

    let responses = requests::process_requests(&base, &document.stat_requests)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &responses)?;
    writeln!(out)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logger();
    match Options::from_args() {
        Options::MakeBase { input } => make_base(input.as_deref()),
        Options::ProcessRequests { input } => process_requests(input.as_deref()),
    }
}
