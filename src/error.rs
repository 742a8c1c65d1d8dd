use std::{convert::From, fmt};

/// Simple custom Error for the disassembler
pub struct Error {
    pub kind: ErrorKind,
    pub ctx: Option<usize>,
    pub msg: String,
}

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// fewer bytes available than the two-byte opcode lookahead needs
    TruncatedInput,
    /// no classifier rule matched the leading byte
    UnrecognizedOpcode,
    /// the mod field demands displacement bytes that are missing
    InsufficientBytes,
    /// a mod or r/m field outside its defined range (defensive, should be unreachable)
    InvalidField,
    /// underlying io error
    IO,
    /// catch-all for other errors
    General,
}

impl Error {
    pub fn new(kind: ErrorKind, ctx: Option<usize>, message: &str) -> Error {
        Error {
            kind,
            ctx,
            msg: String::from(message),
        }
    }
    /// Attaches the stream offset at which the decode failed.
    pub fn at(mut self, offset: usize) -> Error {
        self.ctx = Some(offset);
        self
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self { Error::new(ErrorKind::IO, None, e.to_string().as_str()) }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}: {}", red!("dasm::Error"), self.msg) }
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut res = write!(f, "{}", self.msg);
        if res.is_ok() {
            if let Some(ctx) = self.ctx {
                res = write!(f, "\nContext: offset {:08X}", ctx);
            }
        }
        res
    }
}
impl std::error::Error for Error {}
