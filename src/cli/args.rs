use clap::Args;
use std::path::PathBuf;

/// Arguments for encoding script text or a JSON document
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Names file: a JSON object of column name to type
    #[arg(short = 'n', long, value_name = "JSON")]
    pub names: Option<PathBuf>,

    /// Input is a JSON document rather than script text
    #[arg(long)]
    pub json: bool,

    /// Rename object member names too
    #[arg(long, requires = "json")]
    pub keys: bool,

    /// Only replace string values that are exactly a column name
    #[arg(long, requires = "json")]
    pub strict: bool,

    /// Prefix under which columns are also encoded (repeatable)
    #[arg(short = 'p', long = "prefix", value_name = "PREFIX", conflicts_with = "json")]
    pub prefixes: Vec<String>,

    /// Print the names found per prefix to stderr
    #[arg(long, conflicts_with = "json")]
    pub found: bool,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for decoding script text or a JSON document
#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Names file: a JSON object of column name to type
    #[arg(short = 'n', long, value_name = "JSON")]
    pub names: Option<PathBuf>,

    /// Input is a JSON document rather than script text
    #[arg(long)]
    pub json: bool,

    /// Decode object member names too
    #[arg(long, requires = "json")]
    pub keys: bool,

    /// HTML-escape decoded names (implies --keys)
    #[arg(long, requires = "json")]
    pub html: bool,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for encoding an analysis options document
#[derive(Args, Debug)]
pub struct OptionsArgs {
    /// Options document (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Names file: a JSON object of column name to type
    #[arg(short = 'n', long, value_name = "JSON")]
    pub names: Option<PathBuf>,

    /// Qualify variables with their column type
    #[arg(long)]
    pub preloading: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for renaming columns in a script
#[derive(Args, Debug)]
pub struct RenameArgs {
    /// Script file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Renames: a JSON object of old name to new name
    #[arg(short = 'm', long, value_name = "JSON")]
    pub map: PathBuf,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for removing columns from a script
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Script file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Column to remove (repeatable)
    #[arg(short = 'c', long = "column", value_name = "NAME", required = true)]
    pub columns: Vec<String>,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for showing the effective configuration
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Output as JSON instead of TOML
    #[arg(long)]
    pub json: bool,
}
