/// Implements the decode loop that drives the disassembler.
use super::*;
use crate::hex::{HexRecordCollection, HexRecordType};
use crate::instructions::Operands;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// The Disasm struct owns the loaded code image and the byte cursor.
/// The decode core (classifier, ModRM resolver, formatter) is pure; only
/// this driver advances the offset, and only by the number of bytes each
/// decode reports as consumed.
pub struct Disasm {
    /// the code image being disassembled
    code: Vec<u8>,
    /// cursor into the image
    pos: usize,
    /// display offset of the byte at the cursor
    offset: usize,
    /// number of listing lines emitted so far
    pub line_count: usize,
}

impl Disasm {
    pub fn new() -> Disasm {
        Disasm {
            code: Vec::new(),
            pos: 0,
            offset: config::ARGS.org as usize,
            line_count: 0,
        }
    }

    /// from_bytes builds a Disasm over a slice of machine code.
    /// This is only used in tests atm.
    #[cfg(test)]
    pub fn from_bytes(bytes: &[u8]) -> Disasm {
        let mut d = Disasm::new();
        d.code = bytes.to_vec();
        d
    }

    /// load_bin reads an entire raw binary file into the code image
    pub fn load_bin(&mut self, path: &Path) -> Result<usize, Error> {
        let mut f = File::open(path)?;
        let extent = f.read_to_end(&mut self.code)?;
        verbose_println!("loaded {} bytes from binary file \"{}\"", extent, path.display());
        Ok(extent)
    }

    /// load_hex materializes the contents of a HexRecordCollection into a
    /// contiguous code image starting at the lowest record address. The base
    /// address is added to the display offset; gaps between records are
    /// zero-filled.
    pub fn load_hex(&mut self, hex: &HexRecordCollection) -> Result<usize, Error> {
        let mut base = usize::MAX;
        let mut top = 0usize;
        let mut eof = false;
        for r in hex.iter() {
            match r.record_type {
                HexRecordType::Data => {
                    if r.data.is_some() {
                        base = base.min(r.address as usize);
                        top = top.max(r.address as usize + r.data_size as usize);
                    }
                }
                HexRecordType::EndOfFile => {
                    eof = true;
                    break;
                }
                _ => warn!("ignoring unsupported record type ({}) in hex file.", r.record_type),
            }
        }
        if !eof {
            return Err(general_err!("failed to find EOF record in hex file"));
        }
        if base == usize::MAX {
            return Err(general_err!("hex file contains no data records"));
        }
        self.code = vec![0u8; top - base];
        let mut extent = 0usize;
        for r in hex.iter() {
            if r.record_type != HexRecordType::Data {
                continue;
            }
            if let Some(data) = r.data.as_ref() {
                let at = r.address as usize - base;
                self.code[at..at + data.len()].copy_from_slice(data);
                extent += data.len();
            }
        }
        if extent < top - base {
            verbose_println!("zero-filled {} gap byte(s) between hex records", top - base - extent);
        }
        self.offset += base;
        verbose_println!("loaded {} bytes from hex file", extent);
        Ok(extent)
    }

    /// Decodes the instruction at the cursor and returns its listing line,
    /// or None at a clean end of stream. The cursor and display offset
    /// advance by the number of bytes actually consumed; a failed decode
    /// consumes nothing and emits nothing.
    fn decode_next(&mut self) -> Result<Option<String>, Error> {
        let rest = &self.code[self.pos..];
        if rest.is_empty() {
            return Ok(None);
        }
        let window = &rest[..rest.len().min(instructions::NUM_BYTES_PEEKED)];
        let cmd = instructions::classify(window).map_err(|e| e.at(self.offset))?;
        verbose_println!(
            "{:08X}: {} l={} d={} w={} {:?}",
            self.offset,
            cmd.mnem,
            cmd.l,
            cmd.d,
            cmd.w,
            cmd.operands
        );
        let (consumed, opr1) = match cmd.operands {
            Operands::ModRm => {
                // the resolver reports how much of modrm + displacement it consumed
                let trailing = &rest[2..rest.len().min(4)];
                let res = modrm::resolve(rest[1], trailing).map_err(|e| e.at(self.offset))?;
                (1 + res.consumed, res.operand)
            }
            Operands::Reg(r) => (cmd.l as usize, registers::reg16(r).to_string()),
            Operands::Sreg(r) => (cmd.l as usize, registers::sreg(r).to_string()),
            Operands::Implied => (cmd.l as usize, String::new()),
        };
        let qualifier = if cmd.word { "word " } else { "" };
        let line = listing::format_line(self.offset, &rest[..consumed], cmd.mnem, qualifier, &opr1, "");
        self.pos += consumed;
        self.offset += consumed;
        Ok(Some(line))
    }

    /// Runs the decode loop to completion, writing one line per instruction.
    /// With --resync a decode error is reported, one byte is skipped and the
    /// loop continues; otherwise the first error stops the run.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<(), Error> {
        loop {
            match self.decode_next() {
                Ok(Some(line)) => {
                    writeln!(out, "{}", line)?;
                    self.line_count += 1;
                }
                Ok(None) => return Ok(()),
                Err(e) if config::resync() => {
                    warn!("{}; skipping one byte", e);
                    self.pos += 1;
                    self.offset += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(code: &[u8]) -> Vec<String> {
        let mut d = Disasm::from_bytes(code);
        let mut out = Vec::new();
        d.run(&mut out).unwrap();
        String::from_utf8(out).unwrap().lines().map(String::from).collect()
    }

    #[test]
    fn offsets_track_consumption() {
        let got = lines(&[0xff, 0x06, 0x34, 0x12, 0x43, 0x06, 0x01, 0xd8]);
        assert_eq!(
            got,
            [
                "00000000  FF061234   inc word [0x1234]",
                "00000004  43   inc bx",
                "00000005  06   push es",
                "00000006  01D8   add ax",
            ]
        );
    }

    #[test]
    fn displacement_forms() {
        let got = lines(&[0x00, 0x58, 0x05, 0x03, 0x87, 0x10, 0x27, 0x1e, 0x08, 0xc1]);
        assert_eq!(
            got,
            [
                "00000000  005805   add [bx+si+0x5]",
                "00000003  03871027   add [bx+0x2710]",
                "00000007  1E   push ds",
                "00000008  08C1   or cx",
            ]
        );
    }

    #[test]
    fn acc_imm_forms_consume_their_nominal_length() {
        let got = lines(&[0x04, 0x05, 0x99]);
        assert_eq!(got, ["00000000  04   add ", "00000001  0599   add "]);
    }

    #[test]
    fn trailing_byte_is_truncated_input() {
        let mut d = Disasm::from_bytes(&[0x01, 0xd8, 0x43]);
        let mut out = Vec::new();
        let e = d.run(&mut out).unwrap_err();
        assert_eq!(e.kind, ErrorKind::TruncatedInput);
        assert_eq!(e.ctx, Some(2));
        // the good line before the failure was still emitted
        assert_eq!(String::from_utf8(out).unwrap(), "00000000  01D8   add ax\n");
    }

    #[test]
    fn missing_displacement_is_insufficient_bytes() {
        let mut d = Disasm::from_bytes(&[0xff, 0x06, 0x34]);
        let e = d.run(&mut Vec::new()).unwrap_err();
        assert_eq!(e.kind, ErrorKind::InsufficientBytes);
        assert_eq!(e.ctx, Some(0));
    }

    #[test]
    fn unrecognized_opcode_stops_the_run() {
        let mut d = Disasm::from_bytes(&[0x90, 0x90]);
        let e = d.run(&mut Vec::new()).unwrap_err();
        assert_eq!(e.kind, ErrorKind::UnrecognizedOpcode);
    }

    #[test]
    fn hex_image_sets_the_base_offset() {
        let hex = HexRecordCollection::from_str_iter([":04010000FF063412B0", ":00000001FF"]).unwrap();
        let mut d = Disasm::new();
        assert_eq!(d.load_hex(&hex).unwrap(), 4);
        let mut out = Vec::new();
        d.run(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "00000100  FF061234   inc word [0x1234]\n");
    }
}
