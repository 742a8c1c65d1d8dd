/// Addressing-mode resolution for the ModRM byte that follows the
/// register/memory instruction forms.
use super::*;

/// The decoded operand text plus the number of bytes consumed, counting the
/// ModRM byte itself (so always 1, 2 or 3).
#[derive(Debug, PartialEq, Eq)]
pub struct AddressingResult {
    pub operand: String,
    pub consumed: usize,
}

/// Renders a displacement with an explicit sign, e.g. -0x1 or +0x10.
fn signed_hex(v: i32) -> String {
    if v < 0 {
        format!("-{:#x}", -v)
    } else {
        format!("+{:#x}", v)
    }
}

/// Interprets a `[mod *** r/m]` byte and however many trailing bytes are
/// available. `trailing` may hold more bytes than the mode needs; only the
/// displacement the mod field demands is consumed.
pub fn resolve(modrm: u8, trailing: &[u8]) -> Result<AddressingResult, Error> {
    let md = modrm >> 6; // [00]000000: upper two bits
    let rm = modrm & 0x7; // 00000[000]: lower three bits
    match md {
        0x0 => {
            if rm == 0x6 {
                // direct address: 16-bit little-endian absolute, no register component
                if trailing.len() < 2 {
                    return Err(decode_err!(
                        ErrorKind::InsufficientBytes,
                        None,
                        "direct address needs 2 bytes but only {} remain",
                        trailing.len()
                    ));
                }
                return Ok(AddressingResult {
                    operand: format!("[0x{:02x}{:02x}]", trailing[1], trailing[0]),
                    consumed: 3,
                });
            }
            Ok(AddressingResult {
                operand: format!("[{}]", registers::ea(rm)),
                consumed: 1,
            })
        }
        0x1 => {
            if trailing.is_empty() {
                return Err(decode_err!(
                    ErrorKind::InsufficientBytes,
                    None,
                    "mod 01 needs 1 displacement byte but none remain"
                ));
            }
            let disp = trailing[0] as i8;
            Ok(AddressingResult {
                operand: format!("[{}{}]", registers::ea(rm), signed_hex(disp as i32)),
                consumed: 2,
            })
        }
        0x2 => {
            if trailing.len() < 2 {
                return Err(decode_err!(
                    ErrorKind::InsufficientBytes,
                    None,
                    "mod 10 needs 2 displacement bytes but only {} remain",
                    trailing.len()
                ));
            }
            let disp = i16::from_le_bytes([trailing[0], trailing[1]]);
            Ok(AddressingResult {
                operand: format!("[{}{}]", registers::ea(rm), signed_hex(disp as i32)),
                consumed: 3,
            })
        }
        0x3 => Ok(AddressingResult {
            operand: registers::reg16(rm).to_string(),
            consumed: 1,
        }),
        // structurally impossible given the two-bit extraction above
        _ => Err(decode_err!(
            ErrorKind::InvalidField,
            None,
            "either mod {} or r/m {} is invalid",
            md,
            rm
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_address() {
        let r = resolve(0x06, &[0x34, 0x12]).unwrap();
        assert_eq!(r.operand, "[0x1234]");
        assert_eq!(r.consumed, 3);
        // low addresses keep their zero padding
        assert_eq!(resolve(0x06, &[0x12, 0x00]).unwrap().operand, "[0x0012]");
    }
    #[test]
    fn no_displacement() {
        let r = resolve(0x07, &[]).unwrap();
        assert_eq!(r.operand, "[bx]");
        assert_eq!(r.consumed, 1);
        assert_eq!(resolve(0x00, &[0xff, 0xff]).unwrap().operand, "[bx+si]");
    }
    #[test]
    fn byte_displacement() {
        let r = resolve(0x40, &[0xff]).unwrap();
        assert_eq!(r.operand, "[bx+si-0x1]");
        assert_eq!(r.consumed, 2);
        assert_eq!(resolve(0x47, &[0x10]).unwrap().operand, "[bx+0x10]");
        assert_eq!(resolve(0x44, &[0x00]).unwrap().operand, "[si+0x0]");
        assert_eq!(resolve(0x45, &[0x80]).unwrap().operand, "[di-0x80]");
    }
    #[test]
    fn word_displacement() {
        let r = resolve(0x82, &[0x00, 0x80]).unwrap();
        assert_eq!(r.operand, "[bp+si-0x8000]");
        assert_eq!(r.consumed, 3);
        assert_eq!(resolve(0x87, &[0x34, 0x12]).unwrap().operand, "[bx+0x1234]");
    }
    #[test]
    fn register_direct() {
        let r = resolve(0xc3, &[]).unwrap();
        assert_eq!(r.operand, "bx");
        assert_eq!(r.consumed, 1);
        assert_eq!(resolve(0xc0, &[]).unwrap().operand, "ax");
    }
    #[test]
    fn insufficient_bytes() {
        assert_eq!(resolve(0x06, &[0x34]).unwrap_err().kind, ErrorKind::InsufficientBytes);
        assert_eq!(resolve(0x40, &[]).unwrap_err().kind, ErrorKind::InsufficientBytes);
        assert_eq!(resolve(0x82, &[0x00]).unwrap_err().kind, ErrorKind::InsufficientBytes);
    }
}
