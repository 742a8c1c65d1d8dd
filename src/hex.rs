#![allow(non_snake_case, non_upper_case_globals)]

//! Reader for machine code in Intel hex format, so images produced by the
//! usual 8-bit/16-bit toolchains can be fed straight to the disassembler.
//!
//! This is an implementation of the I8HEX subset described in
//! [this wikipedia article](https://en.wikipedia.org/wiki/Intel_HEX).

use regex::Regex;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::Error;

pub mod HexRecordType {
    // Only the Data and EndOfFile record types of I8HEX are supported
    pub const Data: u8 = 0;
    pub const EndOfFile: u8 = 1;
}

pub struct HexRecord {
    pub data_size: u8,
    pub address: u16,
    pub record_type: u8,
    pub data: Option<Vec<u8>>,
    pub checksum: u8,
}

impl HexRecord {
    pub fn from_str<S: AsRef<str>>(s: S) -> Result<Option<Self>, ()> {
        let re = Regex::new(r"(?i)^.*:([0-9a-f]{2})([0-9a-f]{4})([0-9a-f]{2})((?:[0-9a-f]{2})*)([0-9a-f]{2})")
            .map_err(|_| ())?;
        if let Some(c) = re.captures(s.as_ref()) {
            Ok(Some(Self::from_captures(&c).ok_or(())?))
        } else {
            Ok(None)
        }
    }
    pub fn from_captures(c: &regex::Captures) -> Option<Self> {
        let data_size = u8::from_str_radix(c.get(1)?.as_str(), 16).ok()?;
        let h = HexRecord {
            data_size,
            address: u16::from_str_radix(c.get(2)?.as_str(), 16).ok()?,
            record_type: u8::from_str_radix(c.get(3)?.as_str(), 16).ok()?,
            data: HexRecord::data_from_str(c.get(4)?.as_str(), data_size),
            checksum: u8::from_str_radix(c.get(5)?.as_str(), 16).ok()?,
        };
        h.calc_checksum().filter(|&c| c == h.checksum).map(|_| h)
    }
    fn data_from_str(s: &str, byte_count: u8) -> Option<Vec<u8>> {
        if byte_count == 0 || s.len() < (2 * byte_count) as usize {
            return None;
        }
        let mut data: Vec<u8> = Vec::with_capacity(byte_count as usize);
        let mut i = 0u8;
        while i < byte_count {
            data.push(u8::from_str_radix(&s[(i * 2) as usize..((i + 1) * 2) as usize], 16).ok()?);
            i += 1;
        }
        Some(data)
    }
    fn calc_checksum(&self) -> Option<u8> {
        let mut sum = 0u16;
        sum += self.data_size as u16;
        sum += self.address >> 8;
        sum += self.address & 0xff;
        sum += self.record_type as u16;
        if let Some(data) = self.data.as_ref() {
            data.iter().for_each(|&b| sum += b as u16);
            if data.len() != self.data_size as usize {
                return None;
            }
        }
        Some((sum as u8).wrapping_neg())
    }
}

pub struct HexRecordCollection {
    records: Vec<HexRecord>,
    eof: bool,
}

impl HexRecordCollection {
    pub fn from_str_iter<I, T>(iter: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut hf = HexRecordCollection {
            records: Vec::new(),
            eof: false,
        };
        for s in iter {
            let hr = HexRecord::from_str(s.into()).map_err(|_| general_err!("failed to parse hex file"))?;
            if let Some(hr) = hr {
                hf.add_record(hr)?
            }
        }
        if hf.eof {
            Ok(hf)
        } else {
            Err(general_err!("EOF record not found in hex file"))
        }
    }
    fn add_record(&mut self, h: HexRecord) -> Result<(), Error> {
        if self.eof {
            return Err(general_err!("records after EOF in hex file"));
        }
        if h.record_type == HexRecordType::EndOfFile {
            self.eof = true
        }
        self.records.push(h);
        Ok(())
    }
    pub fn read_from_file(path: &Path) -> Result<Self, Error> {
        let file = BufReader::new(File::open(path)?)
            .lines()
            .collect::<Result<Vec<String>, io::Error>>()?;
        HexRecordCollection::from_str_iter(file)
    }
}

use std::ops::Deref;
impl Deref for HexRecordCollection {
    type Target = Vec<HexRecord>;
    fn deref(&self) -> &Self::Target { &self.records }
}
