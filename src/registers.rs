#![allow(dead_code)]
/// 8086 register and effective-address name tables.
/// These are read-only process-wide data, indexed by the 3-bit (2-bit for
/// segment) field values pulled out of opcode and ModRM bytes.

/// 8-bit registers
pub static REG8: [&str; 8] = ["al", "cl", "dl", "bl", "ah", "ch", "dh", "bh"];
/// 16-bit registers
pub static REG16: [&str; 8] = ["ax", "cx", "dx", "bx", "sp", "bp", "si", "di"];
/// segment registers
pub static SREG: [&str; 4] = ["es", "cs", "ss", "ds"];
/// effective-address base+index combinations
pub static EA: [&str; 8] = ["bx+si", "bx+di", "bp+si", "bp+di", "si", "di", "bp", "bx"];

pub fn reg8(i: u8) -> &'static str { REG8[(i & 0x7) as usize] }
pub fn reg16(i: u8) -> &'static str { REG16[(i & 0x7) as usize] }
pub fn sreg(i: u8) -> &'static str { SREG[(i & 0x3) as usize] }
pub fn ea(i: u8) -> &'static str { EA[(i & 0x7) as usize] }

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn table_indexing() {
        assert_eq!(reg16(0), "ax");
        assert_eq!(reg16(3), "bx");
        assert_eq!(reg16(7), "di");
        assert_eq!(reg8(0), "al");
        assert_eq!(reg8(7), "bh");
        assert_eq!(sreg(0), "es");
        assert_eq!(sreg(3), "ds");
        assert_eq!(ea(0), "bx+si");
        assert_eq!(ea(6), "bp");
    }
    #[test]
    fn indexes_are_masked() {
        // field extraction already masks, but out-of-range indexes must not panic
        assert_eq!(reg16(0x0b), "bx");
        assert_eq!(sreg(0x06), "ss");
    }
}
