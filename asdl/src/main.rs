use clap::Parser;
use codespan_reporting::term::termcolor::{BufferedStandardStream, ColorChoice};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// A parser and checker for ASDL descriptions
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    /// When to use colours in diagnostics
    #[clap(long = "color", value_enum, default_value = "auto", global = true)]
    color: Color,
    #[clap(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Parse an ASDL description, printing the parsed module to stdout
    Parse {
        /// Path to the description, or `-` to read from stdin
        #[clap(name = "FILE")]
        file: PathOrStdin,
    },
    /// Parse and check an ASDL description for well-formedness
    Check {
        /// Path to the description, or `-` to read from stdin
        #[clap(name = "FILE")]
        file: PathOrStdin,
    },
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum Color {
    Auto,
    Always,
    Never,
}

impl Color {
    fn choice(self, stream: atty::Stream) -> ColorChoice {
        match self {
            Color::Auto if atty::is(stream) => ColorChoice::Auto,
            Color::Auto | Color::Never => ColorChoice::Never,
            Color::Always => ColorChoice::Always,
        }
    }
}

#[derive(Clone, Debug)]
enum PathOrStdin {
    StdIn,
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(src: &str) -> Result<PathOrStdin, std::convert::Infallible> {
        match src {
            "-" => Ok(PathOrStdin::StdIn),
            _ => Ok(PathOrStdin::Path(PathBuf::from(src))),
        }
    }
}

fn unwrap_or_exit<T>(option: Option<T>) -> T {
    option.unwrap_or_else(|| std::process::exit(asdl::Status::Error.exit_code()))
}

fn load_file_or_exit(driver: &mut asdl::Driver, file: PathOrStdin) -> usize {
    unwrap_or_exit(match file {
        PathOrStdin::StdIn => driver.load_source("<stdin>".to_owned(), std::io::stdin()),
        PathOrStdin::Path(path) => driver.load_source_path(&path),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ASDL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ! {
    init_tracing();

    let cli = Cli::parse();
    let mut driver = asdl::Driver::new();
    driver.set_diagnostic_writer(BufferedStandardStream::stderr(
        cli.color.choice(atty::Stream::Stderr),
    ));
    driver.set_emit_writer(BufferedStandardStream::stdout(
        cli.color.choice(atty::Stream::Stdout),
    ));

    let status = match cli.command {
        Command::Parse { file } => {
            let file_id = load_file_or_exit(&mut driver, file);
            driver.parse_and_emit_module(file_id)
        }
        Command::Check { file } => {
            let file_id = load_file_or_exit(&mut driver, file);
            driver.check_module(file_id)
        }
    };

    std::process::exit(status.exit_code());
}
