use clap::Parser;
use clap_num::maybe_hex;
use lazy_static::lazy_static;

#[derive(Parser, Debug)]
#[command(author,version,about,long_about=None)]
pub struct Args {
    /// Raw binary (.bin, .com) or Intel hex (.hex) file to disassemble
    pub file: String,

    /// Starting offset for the listing (hex ok with '0x')
    #[arg(long,value_parser=maybe_hex::<u32>, default_value_t=0)]
    pub org: u32,

    /// After a decode error, skip one byte and try again instead of stopping
    #[arg(short, long)]
    pub resync: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the listing to a .lst file next to the input instead of stdout
    #[arg(short, long)]
    pub write_files: bool,
}

lazy_static! {
    pub static ref ARGS: Args = if cfg!(test) {
        // manually set parameters for running tests
        Args::parse_from(["test", "test"])
    } else {
        Args::parse()
    };
}

pub fn init() {}
pub fn resync() -> bool { ARGS.resync }
