//! The `Args` module helps giving command line options to tycon

use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "tycon", about = "Instantiate a type constructor")]
pub struct Args {
    #[structopt(short, long)]
    version: bool,

    #[structopt(short, long)]
    log: bool,

    #[structopt(long = "no-prelude")]
    no_prelude: bool,

    /// Only print the name of the produced type, without its members
    #[structopt(short, long)]
    short: bool,

    #[structopt()]
    constructor: Option<String>,

    /// Names of the argument types, primitives or constructors without parameters
    #[structopt()]
    arguments: Vec<String>,
}

impl Args {
    fn print_version() {
        println!("{}", env!("CARGO_PKG_VERSION"));

        std::process::exit(0);
    }

    /// Parses the command line arguments, executes stopping options (such as --help
    /// or --version) and returns the given arguments
    pub fn handle() -> Args {
        let args = Args::from_args();

        if args.version {
            Args::print_version()
        }

        args
    }

    pub fn log(&self) -> bool {
        self.log
    }

    /// Is the prelude disabled
    pub fn no_prelude(&self) -> bool {
        self.no_prelude
    }

    pub fn short(&self) -> bool {
        self.short
    }

    pub fn constructor(&self) -> Option<&str> {
        self.constructor.as_deref()
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}
