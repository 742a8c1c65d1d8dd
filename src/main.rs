//! # A 16-bit x86 subset disassembler written in Rust.
//!
//! Decodes raw 8086 machine code into assembly text: mnemonic, operand
//! width and operands. Coverage is the classic arithmetic/stack subset
//! (add/or/adc/sbb/sub/and, push/pop of segment registers, inc).
//!
//! ## Getting Started
//! To disassemble a raw binary:
//! ```
//! cargo run -- /path/to/program.com
//! ```
//! ...or if you've already built the binary then just...
//! ```
//! dasm86 /path/to/program.com
//! ```
//! Intel hex images (.hex) are also accepted.
//! ## Options
//! Help for command line options is available using -h or --help.
#[macro_use]
mod macros;
mod config;
mod disasm;
mod error;
mod hex;
mod instructions;
mod listing;
mod modrm;
mod registers;
use crate::disasm::Disasm;
use hex::HexRecordCollection;
use std::ffi::OsStr;
use std::fs::File;
use std::io;
use std::path::Path;
use std::result::Result;
pub(crate) use crate::error::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::init();
    // process_file does all the work
    if let Err(e) = process_file(config::ARGS.file.as_str()) {
        println!("{}", e);
        return Err(Box::new(e));
    }
    Ok(())
}
/// process_file drives the top level functionality (load, disassemble, write) of the app
fn process_file(filename: &str) -> Result<(), Error> {
    let path = Path::new(filename);
    let ext = path.extension().and_then(OsStr::to_str).unwrap_or("");
    let mut d = Disasm::new();
    match ext.to_ascii_lowercase().as_str() {
        "hex" => {
            // the file looks like machine code in hex format; read it
            let hex = HexRecordCollection::read_from_file(path)?;
            info!("Successfully loaded hex file {}", filename);
            d.load_hex(&hex)?;
        }
        // anything else is treated as a raw binary image
        _ => {
            d.load_bin(path)?;
        }
    }
    if config::ARGS.write_files {
        let lst = path.with_extension("lst");
        let mut f = File::create(&lst)?;
        d.run(&mut f)?;
        info!("Wrote listing to {}", lst.display());
    } else {
        let stdout = io::stdout();
        d.run(&mut stdout.lock())?;
    }
    verbose_println!("disassembled {} instruction(s)", d.line_count);
    Ok(())
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::{classify, Mnemonic, Operands};

    // add ax / inc word [0x1234] / push es / pop ds / inc si / or [bp+di-0x1]
    const PROGRAM01: &[u8] = &[
        0x01, 0xd8, 0xff, 0x06, 0x34, 0x12, 0x06, 0x1f, 0x46, 0x0a, 0x43, 0xff,
    ];

    #[test]
    fn disassembles_a_small_program() -> Result<(), Error> {
        let mut d = Disasm::from_bytes(PROGRAM01);
        let mut out = Vec::new();
        d.run(&mut out)?;
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            [
                "00000000  01D8   add ax",
                "00000002  FF061234   inc word [0x1234]",
                "00000006  06   push es",
                "00000007  1F   pop ds",
                "00000008  46   inc si",
                "00000009  0A43FF   or [bp+di-0x1]",
            ]
        );
        assert_eq!(d.line_count, 6);
        Ok(())
    }

    #[test]
    fn worked_classifier_examples() {
        let c = classify(&[0x01, 0x00]).unwrap();
        assert_eq!((c.mnem, c.d, c.w, c.l), (Mnemonic::Add, 0, 1, 2));
        let c = classify(&[0x05, 0x00]).unwrap();
        assert_eq!((c.mnem, c.w, c.l), (Mnemonic::Add, 1, 2));
        let c = classify(&[0x06, 0x00]).unwrap();
        assert_eq!((c.mnem, c.l, c.operands), (Mnemonic::Push, 1, Operands::Sreg(0)));
        let c = classify(&[0x07, 0x00]).unwrap();
        assert_eq!((c.mnem, c.l, c.operands), (Mnemonic::Pop, 1, Operands::Sreg(0)));
    }

    #[test]
    fn decodes_every_segment_register() -> Result<(), Error> {
        // push es/cs/ss/ds then pop es/ss padded to keep the 2-byte lookahead happy
        let mut d = Disasm::from_bytes(&[0x06, 0x0e, 0x16, 0x1e, 0x07, 0x17, 0x01, 0xd8]);
        let mut out = Vec::new();
        d.run(&mut out)?;
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text.lines().collect::<Vec<_>>(),
            [
                "00000000  06   push es",
                "00000001  0E   push cs",
                "00000002  16   push ss",
                "00000003  1E   push ds",
                "00000004  07   pop es",
                "00000005  17   pop ss",
                "00000006  01D8   add ax",
            ]
        );
        Ok(())
    }
}
