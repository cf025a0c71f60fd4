use std::path::PathBuf;
use structopt::StructOpt;

/// Translate rule source files to Rust source.
///
/// Top-level functions whose name starts with "rule_" are rules; for
/// each, the output contains a function installing the rule's node
/// subgraph into a rete, a function running the rule body per
/// activation, and a registration adding the rule to a catalog.
/// Everything else in the input is passed through unchanged.
#[derive(Clone, Debug, StructOpt)]
pub struct Opt {
    /// Print generated code to standard output instead of writing files
    #[structopt(long)]
    pub stdout: bool,

    /// Rule files to translate (cumulative)
    ///
    /// Each FILE is translated to a sibling file with the ".rs"
    /// extension. A file that fails to parse is skipped with a
    /// diagnostic, and the exit status is non-zero.
    #[structopt(name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}
