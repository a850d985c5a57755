use std::path::PathBuf;
use structopt::StructOpt;

#[derive(Debug, Clone, StructOpt)]
#[structopt(name = "rowlogdump", about = "Dump MySQL binlog files as readable events")]
pub struct Opts {
    /// binlog file to read
    #[structopt(parse(from_os_str))]
    pub file: PathBuf,
    /// only show table maps and row events of databases matching this regex
    #[structopt(short = "d", long)]
    pub database: Option<String>,
    /// only show table maps and row events of tables matching this regex
    #[structopt(short = "t", long)]
    pub table: Option<String>,
    /// stop after printing this many events
    #[structopt(short = "n", long)]
    pub limit: Option<usize>,
}
