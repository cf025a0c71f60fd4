//! Translation of rule source files to Rust source.

mod error;
mod gen;
mod opt;

pub use error::Error;
pub use gen::generate;
pub use opt::Opt;

use std::path::{Path, PathBuf};

/// Translate one rule source file to a sibling `.rs` file, returning
/// the path written.
pub fn translate_file(path: &Path) -> Result<PathBuf, Error> {
    let out = path.with_extension("rs");
    let code = translate(path)?;
    std::fs::write(&out, code)?;
    Ok(out)
}

/// Translate one rule source file, returning the generated source.
pub fn translate(path: &Path) -> Result<String, Error> {
    let src = std::fs::read_to_string(path)?;
    let items = regulo_parse::Items::new(&src).collect::<Result<Vec<_>, _>>()?;
    let name = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(generate(&name, &items))
}
