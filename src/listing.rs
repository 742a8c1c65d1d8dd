/// Listing-line assembly. The layout is fixed and whitespace-significant:
/// 8-hex-digit offset, two spaces, the consumed bytes as contiguous uppercase
/// hex, three spaces, mnemonic, space, optional width qualifier, operands.
use crate::instructions::Mnemonic;
use std::fmt::Write;

/// Renders raw instruction bytes as contiguous uppercase hex with no separators.
pub fn hex_bytes(bs: &[u8]) -> String {
    let mut out = String::with_capacity(2 * bs.len());
    bs.iter().for_each(|&b| _ = write!(out, "{:02X}", b));
    out
}

/// Builds one disassembled line of output.
/// Pure and deterministic; callers pass `""` for an absent qualifier or operand.
pub fn format_line(offset: usize, bs: &[u8], mnem: Mnemonic, qualifier: &str, opr1: &str, opr2: &str) -> String {
    format!("{:08X}  {}   {} {}{}{}", offset, hex_bytes(bs), mnem, qualifier, opr1, opr2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_render_uppercase_and_contiguous() {
        assert_eq!(hex_bytes(&[0xff, 0x06, 0x34, 0x12]), "FF061234");
        assert_eq!(hex_bytes(&[]), "");
    }
    #[test]
    fn line_layout() {
        let line = format_line(0, &[0x01, 0xd8], Mnemonic::Add, "", "ax", "");
        assert_eq!(line, "00000000  01D8   add ax");
        let line = format_line(0x1234, &[0xff, 0x06, 0x34, 0x12], Mnemonic::Inc, "word ", "[0x1234]", "");
        assert_eq!(line, "00001234  FF061234   inc word [0x1234]");
    }
    #[test]
    fn formatting_is_deterministic() {
        let a = format_line(16, &[0x43], Mnemonic::Inc, "", "bx", "");
        let b = format_line(16, &[0x43], Mnemonic::Inc, "", "bx", "");
        assert_eq!(a, b);
    }
}
