use std::error::Error;
use std::path::PathBuf;

use bpaf::Bpaf;
use tracing_subscriber::EnvFilter;
use xanova_pulsar::{BacklightMode, KeylightMode, ModeRequest, Pulsar};

use crate::config::Config;

mod config;

#[derive(Clone, Debug, Bpaf)]
enum Command {
    /// Change backlight effect
    #[bpaf(command)]
    Backlight {
        /// Effect speed (some effects ignore this setting): 0-255
        #[bpaf(short, long, argument("N"))]
        speed: Option<u8>,
        /// Backlight effect mode.
        /// [off|breathing|static|alternatewave|scanwave|wave-right|wave-down|rippling-left|rippling-right|fireworks|star|boom]
        #[bpaf(positional("MODE"))]
        mode: BacklightMode,
    },
    /// Change keylight effect
    #[bpaf(command)]
    Keylight {
        /// Effect speed (some effects ignore this setting): 0-255
        #[bpaf(short, long, argument("N"))]
        speed: Option<u8>,
        /// Keylight effect mode.
        /// [off|fade|hexagon|ripple|runoutsig|runinsig|runin]
        #[bpaf(positional("MODE"))]
        mode: KeylightMode,
    },
    /// Change backlight brightness
    #[bpaf(command)]
    Brightness {
        /// Brightness level: 0-255
        #[bpaf(positional("LEVEL"))]
        level: u8,
    },
}

impl Command {
    /// Resolve into a request, filling omitted speeds from the config
    fn into_request(self, config: &Config) -> ModeRequest {
        match self {
            Command::Backlight { speed, mode } => ModeRequest::Backlight {
                mode,
                speed: speed.unwrap_or(config.backlight.speed),
            },
            Command::Keylight { speed, mode } => ModeRequest::Keylight {
                mode,
                speed: speed.unwrap_or(config.keylight.speed),
            },
            Command::Brightness { level } => ModeRequest::Brightness { level },
        }
    }
}

#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version, descr(env!("CARGO_PKG_DESCRIPTION")))]
struct Cli {
    /// Enable debug logging, overriding RUST_LOG
    #[bpaf(short, long)]
    verbose: bool,
    /// Config file to use instead of the platform default
    #[bpaf(long, argument("PATH"))]
    config: Option<PathBuf>,
    #[bpaf(external(command))]
    command: Command,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = cli().run();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    let request = cli.command.into_request(&config);
    tracing::debug!("resolved request: {request:?}");

    let mut pulsar = Pulsar::open()?;
    pulsar.apply(request)?;
    pulsar.close();

    println!("set {request}");
    Ok(())
}
