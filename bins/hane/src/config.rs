use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "hane", about = "Declarative entity-to-representation converter")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a JSON document with a configured converter
    Convert(ConvertArgs),
    /// Scaffold a new converter source file
    Make(MakeArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ConvertArgs {
    /// Path to TOML configuration file
    #[arg(long, default_value = "hane.toml", env = "HANE_CONFIG")]
    pub config: String,

    /// Name of the converter to run
    #[arg(long)]
    pub converter: String,

    /// JSON input file (`-` for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Caller parameters as a query string, e.g. `include=author&collection_key=id`
    #[arg(long, default_value = "")]
    pub query: String,

    /// Comma-separated field whitelist
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Envelope key
    #[arg(long)]
    pub wrap: Option<String>,

    /// JSON file with an object merged next to the envelope key
    #[arg(long, requires = "wrap")]
    pub attach: Option<String>,

    /// Pretty-print the output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Clone, Debug)]
pub struct MakeArgs {
    /// Converter name, e.g. `Post` or `blog_post`
    pub name: String,

    /// Project root; a template at `<base>/stubs/converter.stub` overrides the built-in one
    #[arg(long, default_value = ".")]
    pub base: String,

    /// Target directory, relative to the project root
    #[arg(long, default_value = "src/converters")]
    pub dir: String,

    /// Entity type the converter handles (defaults to the converter name)
    #[arg(long)]
    pub entity: Option<String>,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
