mod args;

use colored::Colorize;

use args::Args;
use tycon::{Compilation, Config, Error, ErrorHandler};

fn exit_with(err: Error) -> ! {
    err.emit();
    err.exit()
}

fn main() {
    let args = Args::handle();

    let config = Config {
        prelude: !args.no_prelude(),
        log: args.log(),
    };
    let mut compilation = Compilation::with_config(config).unwrap_or_else(|e| exit_with(e));

    let ctor = match args.constructor() {
        Some(ctor) => ctor,
        None => {
            compilation
                .constructors()
                .names()
                .for_each(|name| println!("{}", name.access().green()));
            return;
        }
    };

    // resolve every argument before giving up, so that all unknown names get reported
    let mut errors = ErrorHandler::default();
    let arguments = args
        .arguments()
        .iter()
        .filter_map(|name| errors.keep(compilation.resolve(name)))
        .collect::<Vec<_>>();

    if let Err(e) = errors.finish() {
        exit_with(e)
    }

    match compilation.instantiate(ctor, arguments) {
        Ok(ty) if args.short() => println!("{}", ty.to_string().green()),
        Ok(ty) => println!("{}", format!("{ty:#}").green()),
        Err(e) => exit_with(e),
    }
}
