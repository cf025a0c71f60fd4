use core::fmt::{self, Display};
use std::io;

/// Central error type.
#[derive(Debug)]
pub enum Error {
    Parse(regulo_parse::Error),
    Io(io::Error),
    /// Number of input files that failed to translate.
    Failed(usize),
}

impl From<regulo_parse::Error> for Error {
    fn from(err: regulo_parse::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Parse(e) => e.fmt(f),
            Self::Io(e) => e.fmt(f),
            Self::Failed(n) => write!(f, "{} file(s) failed to translate", n),
        }
    }
}
