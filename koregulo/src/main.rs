//! A translator from rule source files to Rust source.

use koregulo::{translate, translate_file, Error, Opt};
use structopt::StructOpt;

fn main() -> Result<(), Error> {
    use env_logger::Env;
    // log warnings and errors by default
    // allow setting the logging level by using the environment variable "LOG"
    // e.g. `LOG=info koregulo ...`
    env_logger::from_env(Env::default().filter_or("LOG", "warn")).init();

    let opt = Opt::from_args();

    let mut failed = 0;
    for file in &opt.files {
        let result = if opt.stdout {
            translate(file).map(|code| print!("{}", code))
        } else {
            translate_file(file).map(|out| log::info!("wrote {}", out.display()))
        };
        if let Err(err) = result {
            eprintln!("{}: {}", file.display(), err);
            failed += 1;
        }
    }
    if failed > 0 {
        return Err(Error::Failed(failed));
    }
    Ok(())
}
