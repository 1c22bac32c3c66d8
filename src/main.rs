use std::error::Error;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use encoding_rs::Encoding;
use tracing_subscriber::EnvFilter;

use assetrev::config::ConfigManager;
use assetrev::core::{print_error_message, print_info_message};
use assetrev::env::{core::LogLevel, core::NoColor, generate_env_docs, EnvVar};
use assetrev::{AssetRevisionPlugin, BuildOutput, HashFunction, HtmlEmission, RevisionOptions};

const STDIN_TARGET: &str = "-";
const DEFAULT_OUTPUT_NAME: &str = "index.html";

#[derive(Parser, Debug)]
#[command(
    name = "assetrev",
    version,
    about = "Content-hash and rename the assets of <link>/<script> tags marked with rev or md5"
)]
struct Cli {
    /// HTML file to process, or "-" to read from stdin
    #[arg(required_unless_present_any = ["write_config", "env_docs"])]
    input: Option<String>,

    /// Directory that receives the rewritten HTML and the generated assets
    #[arg(short = 'o', long, default_value = "dist")]
    output_dir: PathBuf,

    /// File name of the rewritten HTML [default: input file name or index.html]
    #[arg(short = 'n', long)]
    output_name: Option<String>,

    /// Base URL the generated assets are served under
    #[arg(short = 'p', long, default_value = "/")]
    public_path: String,

    /// Filename template using {name}, {hash} and {ext}
    #[arg(short = 'f', long)]
    filename: Option<String>,

    /// Route every asset request through this proxy host
    #[arg(long)]
    server_ip: Option<String>,

    /// Proxy port
    #[arg(long)]
    port: Option<u16>,

    /// Per-request deadline in milliseconds
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Content digest: md5 (default), sha256, sha512 or blake3
    #[arg(long)]
    hash: Option<HashFunction>,

    /// Base URL for relative asset URLs
    #[arg(short = 'b', long)]
    base_url: Option<String>,

    /// Config file (TOML or JSON)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Character encoding of the input document
    #[arg(short = 'E', long, default_value = "utf-8")]
    encoding: String,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Write a config file with the default options and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Print the supported environment variables and exit
    #[arg(long)]
    env_docs: bool,
}

impl Cli {
    fn apply_overrides(&self, options: &mut RevisionOptions) {
        if let Some(filename) = &self.filename {
            options.filename = filename.clone();
        }
        if let Some(server_ip) = &self.server_ip {
            options.server_ip = Some(server_ip.clone());
        }
        if let Some(port) = self.port {
            options.port = port;
        }
        if let Some(timeout) = self.timeout {
            options.timeout = timeout;
        }
        if let Some(hash) = self.hash {
            options.hash = hash;
        }
        if let Some(base_url) = &self.base_url {
            options.base_url = Some(base_url.clone());
        }
    }

    fn output_name(&self) -> String {
        if let Some(output_name) = &self.output_name {
            return output_name.clone();
        }

        self.input
            .as_deref()
            .filter(|input| *input != STDIN_TARGET)
            .and_then(|input| Path::new(input).file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string())
    }
}

fn init_tracing(cli: &Cli) {
    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => LogLevel::get_or_default("info".to_string()),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("assetrev={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(!NoColor::get_or_default(false))
        .with_target(false)
        .init();
}

fn read_input(target: &str) -> io::Result<Vec<u8>> {
    if target == STDIN_TARGET {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        Ok(buf)
    } else {
        fs::read(target)
    }
}

async fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let mut options = ConfigManager::load(cli.config.as_deref())?.into_options();
    cli.apply_overrides(&mut options);
    let plugin = AssetRevisionPlugin::new(options)?;

    let encoding = Encoding::for_label(cli.encoding.as_bytes())
        .ok_or_else(|| format!("unknown encoding \"{}\"", cli.encoding))?;

    let target = cli.input.as_deref().unwrap_or(STDIN_TARGET);
    let input_data =
        read_input(target).map_err(|e| format!("failed to read \"{target}\": {e}"))?;
    let (html, _, _) = encoding.decode(&input_data);

    let mut output = BuildOutput::new(cli.public_path.clone());
    let emission = plugin
        .before_emit(
            HtmlEmission {
                html: html.into_owned(),
                output_name: cli.output_name(),
            },
            &mut output,
        )
        .await?;

    fs::create_dir_all(&cli.output_dir)?;
    for path in output.write_to(&cli.output_dir)? {
        tracing::info!("wrote {}", path.display());
    }

    let html_path = cli.output_dir.join(&emission.output_name);
    let (encoded, _, _) = encoding.encode(&emission.html);
    fs::write(&html_path, &encoded)?;
    tracing::info!("wrote {}", html_path.display());

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.env_docs {
        print_info_message(&generate_env_docs());
        return;
    }

    if let Some(path) = &cli.write_config {
        if let Err(e) = ConfigManager::generate_example_config(path) {
            print_error_message(&e.to_string());
            process::exit(1);
        }
        print_info_message(&format!("wrote {}", path.display()));
        return;
    }

    if let Err(e) = run(&cli).await {
        print_error_message(&e.to_string());
        process::exit(1);
    }
}
