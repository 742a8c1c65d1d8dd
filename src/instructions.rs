use super::*;
use std::fmt;

/// The number of bytes peeked ahead of the cursor to classify an instruction.
pub const NUM_BYTES_PEEKED: usize = 2;

/// The operations covered by the modeled instruction subset.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mnemonic {
    Add,
    Or,
    Adc,
    Sbb,
    Sub,
    And,
    Push,
    Pop,
    Inc,
}
impl Mnemonic {
    pub fn name(&self) -> &'static str {
        match self {
            Mnemonic::Add => "add",
            Mnemonic::Or => "or",
            Mnemonic::Adc => "adc",
            Mnemonic::Sbb => "sbb",
            Mnemonic::Sub => "sub",
            Mnemonic::And => "and",
            Mnemonic::Push => "push",
            Mnemonic::Pop => "pop",
            Mnemonic::Inc => "inc",
        }
    }
}
impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.name()) }
}

/// Where an instruction's operand text comes from.
/// Exactly one source applies to any given form: the register/memory forms
/// defer to the ModRM resolver while the embedded-register forms carry the
/// selector in the opcode byte itself. The accumulator-immediate forms render
/// no operand at all.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operands {
    /// no operand text is rendered
    Implied,
    /// a ModRM byte follows the opcode and is resolved separately
    ModRm,
    /// 16-bit register index embedded in bits 0-2 of the opcode
    Reg(u8),
    /// segment register index embedded in bits 3-4 of the opcode
    Sreg(u8),
}

/// The structural shape shared by a family of opcode encodings.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Form {
    /// register/memory arithmetic; d and w live in the opcode, ModRM follows
    RegMem,
    /// accumulator-immediate arithmetic; nominal length 1 + w, no ModRM
    AccImm,
    /// push/pop with a segment register embedded in the opcode
    SegReg,
    /// inc r/m with the "word" width qualifier; ModRM follows
    WordMem,
    /// inc with a 16-bit register embedded in the opcode
    WordReg,
}

/// A transient descriptor built fresh for each decoded instruction: the
/// matched mnemonic plus the structural fields the driver needs to finish
/// the decode and format the line.
#[derive(Clone, Copy, Debug)]
pub struct Command {
    pub mnem: Mnemonic,
    /// nominal length in bytes from the rule table; ModRM forms grow by
    /// whatever displacement the resolver reports
    pub l: u8,
    /// direction bit: ModRM register field is destination (1) or source (0)
    pub d: u8,
    /// width bit: byte (0) or word (1) operand
    pub w: u8,
    pub operands: Operands,
    /// true if the listing line carries the "word " qualifier
    pub word: bool,
}

/// One row of the classifier: a bit pattern on the leading byte plus the
/// form that a match builds. A byte `b` matches when `(b & mask) >> shift == want`.
struct Rule {
    mask: u8,
    shift: u8,
    want: u8,
    mnem: Mnemonic,
    form: Form,
}

/// The ordered rule table; first match wins, so row order is significant
/// (e.g. push/pop must be tested before the or rows claim 0x0E).
///
/// The modeled subset is deliberately partial: sub has no
/// accumulator-immediate row, and the and-immediate row tests
/// `b>>1 == 0x12` (bytes 0x24/0x25) rather than the single-shift style of
/// its siblings. Both quirks are kept as-is.
#[rustfmt::skip]
static RULES: [Rule; 15] = [
    Rule { mask: 0xff, shift: 2, want: 0x00, mnem: Mnemonic::Add,  form: Form::RegMem },
    Rule { mask: 0xff, shift: 1, want: 0x02, mnem: Mnemonic::Add,  form: Form::AccImm },
    Rule { mask: 0xe7, shift: 0, want: 0x06, mnem: Mnemonic::Push, form: Form::SegReg },
    Rule { mask: 0xe7, shift: 0, want: 0x07, mnem: Mnemonic::Pop,  form: Form::SegReg },
    Rule { mask: 0xff, shift: 2, want: 0x02, mnem: Mnemonic::Or,   form: Form::RegMem },
    Rule { mask: 0xff, shift: 1, want: 0x06, mnem: Mnemonic::Or,   form: Form::AccImm },
    Rule { mask: 0xff, shift: 2, want: 0x04, mnem: Mnemonic::Adc,  form: Form::RegMem },
    Rule { mask: 0xff, shift: 1, want: 0x0a, mnem: Mnemonic::Adc,  form: Form::AccImm },
    Rule { mask: 0xff, shift: 2, want: 0x06, mnem: Mnemonic::Sbb,  form: Form::RegMem },
    Rule { mask: 0xff, shift: 1, want: 0x0e, mnem: Mnemonic::Sbb,  form: Form::AccImm },
    Rule { mask: 0xff, shift: 2, want: 0x0a, mnem: Mnemonic::Sub,  form: Form::RegMem },
    Rule { mask: 0xff, shift: 2, want: 0x08, mnem: Mnemonic::And,  form: Form::RegMem },
    Rule { mask: 0xff, shift: 1, want: 0x12, mnem: Mnemonic::And,  form: Form::AccImm },
    Rule { mask: 0xff, shift: 1, want: 0x7f, mnem: Mnemonic::Inc,  form: Form::WordMem },
    Rule { mask: 0xff, shift: 3, want: 0x08, mnem: Mnemonic::Inc,  form: Form::WordReg },
];

fn getd(b: u8) -> u8 { (b >> 1) & 0x1 }
fn getw(b: u8) -> u8 { b & 0x1 }

fn build(r: &Rule, b: u8) -> Command {
    match r.form {
        Form::RegMem => Command {
            mnem: r.mnem,
            l: 2,
            d: getd(b),
            w: getw(b),
            operands: Operands::ModRm,
            word: false,
        },
        Form::AccImm => {
            let w = getw(b);
            Command {
                mnem: r.mnem,
                l: 1 + w,
                d: 0,
                w,
                operands: Operands::Implied,
                word: false,
            }
        }
        Form::SegReg => Command {
            mnem: r.mnem,
            l: 1,
            d: 0,
            w: 0,
            operands: Operands::Sreg((b >> 3) & 0x3),
            word: false,
        },
        Form::WordMem => Command {
            mnem: r.mnem,
            l: 3,
            d: 0,
            w: getw(b),
            operands: Operands::ModRm,
            word: true,
        },
        Form::WordReg => Command {
            mnem: r.mnem,
            l: 1,
            d: 0,
            w: 0,
            operands: Operands::Reg(b & 0x7),
            word: false,
        },
    }
}

/// Classifies the leading instruction byte against the ordered rule table.
/// `window` is the two-byte lookahead at the cursor; the second byte is only
/// needed by forms whose structure spans byte boundaries, but the full peek
/// must be available before any classification is attempted.
pub fn classify(window: &[u8]) -> Result<Command, Error> {
    if window.len() < NUM_BYTES_PEEKED {
        return Err(decode_err!(
            ErrorKind::TruncatedInput,
            None,
            "opcode lookahead needs {} bytes but only {} remain",
            NUM_BYTES_PEEKED,
            window.len()
        ));
    }
    let b = window[0];
    for r in RULES.iter() {
        if (b & r.mask) >> r.shift == r.want {
            return Ok(build(r, b));
        }
    }
    Err(decode_err!(
        ErrorKind::UnrecognizedOpcode,
        None,
        "no rule matches opcode byte {:02X}",
        b
    ))
}
