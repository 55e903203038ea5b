/*  ************************************************************

    QR-Grid: http://qrgrid.kaarposoft.dk

    Copyright (C) 2018 Henrik Kaare Poulsen

    Licensed under the Apache License, Version 2.0 (the "License");
    you may not use this file except in compliance with the License.
    You may obtain a copy of the License at

     http://www.apache.org/licenses/LICENSE-2.0

    Unless required by applicable law or agreed to in writing, software
    distributed under the License is distributed on an "AS IS" BASIS,
    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
    See the License for the specific language governing permissions and
    limitations under the License.

    ************************************************************ */


//  ************************************************************
//! Segments: typed runs of input characters encoded under one mode
//  ************************************************************

use super::bits::{BitStream, MAX_BITS};
use super::error::{QrError, QrResult};
use super::logging;
use super::qr;
use super::Mode;


//  ************************************************************
/// The 45 characters encodable in alphanumeric mode;
/// each character's value is its index in this string
//  ************************************************************

pub const ALPHANUMERIC_CHARSET: &[u8; 45] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";


//  ************************************************************
/// A run of input characters encoded under a single mode
///
/// `bits` holds only the payload bits: no mode indicator,
/// no character count field.
//  ************************************************************

#[derive(Clone, Debug)]
pub struct Segment {
    mode: Mode,
    n_chars: usize,
    bits: BitStream,
}

//  ************************************************************
impl Segment {
    //  ************************************************************
    /// Assemble a segment from parts; the caller is responsible for
    /// `bits` matching the mode's encoding of `n_chars` characters
    //  ************************************************************
    pub fn new(mode: Mode, n_chars: usize, bits: BitStream) -> Self {
        Segment { mode, n_chars, bits }
    }

    //  ************************************************************
    pub fn mode(&self) -> Mode {
        self.mode
    }

    //  ************************************************************
    pub fn n_chars(&self) -> usize {
        self.n_chars
    }

    //  ************************************************************
    pub fn bits(&self) -> &BitStream {
        &self.bits
    }

    //  ************************************************************
    /// Encode arbitrary binary data in 8 bit mode
    //  ************************************************************
    pub fn make_bytes(data: &[u8]) -> QrResult<Segment> {
        let mut bits = BitStream::new();
        for b in data {
            bits.append_bits(u32::from(*b), 8)?;
        }
        Ok(Segment::new(Mode::EightBit, data.len(), bits))
    }

    //  ************************************************************
    /// Encode a string of decimal digits in numeric mode
    ///
    /// Digits are packed in groups of three from the left:
    /// 3 digits in 10 bits, 2 in 7 bits, a single digit in 4 bits
    //  ************************************************************
    pub fn make_numeric(text: &str) -> QrResult<Segment> {
        let mut bits = BitStream::new();
        for chunk in text.as_bytes().chunks(3) {
            let mut val: u32 = 0;
            for b in chunk {
                if *b < b'0' || *b > b'9' {
                    return Err(QrError::InvalidArgument("numeric mode only encodes the digits 0-9"));
                }
                val = val * 10 + u32::from(b - b'0');
            }
            bits.append_bits(val, chunk.len() * 3 + 1)?;
        }
        Ok(Segment::new(Mode::Numeric, text.len(), bits))
    }

    //  ************************************************************
    /// Encode text in alphanumeric mode
    ///
    /// Characters are packed in pairs: `first * 45 + second` in 11
    /// bits, a trailing single character in 6 bits
    //  ************************************************************
    pub fn make_alpha_numeric(text: &str) -> QrResult<Segment> {
        let mut bits = BitStream::new();
        for chunk in text.as_bytes().chunks(2) {
            if chunk.len() == 2 {
                let val = 45 * ascii_to_alnum(chunk[0])? + ascii_to_alnum(chunk[1])?;
                bits.append_bits(val, 11)?;
            } else {
                bits.append_bits(ascii_to_alnum(chunk[0])?, 6)?;
            }
        }
        Ok(Segment::new(Mode::AlphaNumeric, text.len(), bits))
    }

    //  ************************************************************
    /// Encode an Extended Channel Interpretation designator
    //  ************************************************************
    pub fn make_eci(value: u32) -> QrResult<Segment> {
        let mut bits = BitStream::new();
        if value < 1 << 7 {
            bits.append_bits(value, 8)?;
        } else if value < 1 << 14 {
            bits.append_bits(0b10, 2)?;
            bits.append_bits(value, 14)?;
        } else if value < 1_000_000 {
            bits.append_bits(0b110, 3)?;
            bits.append_bits(value, 21)?;
        } else {
            return Err(QrError::InvalidArgument("ECI assignment value must be below 1000000"));
        }
        Ok(Segment::new(Mode::Eci, 0, bits))
    }

    //  ************************************************************
    /// Represent `text` as a list of segments, choosing the densest
    /// single mode that covers every character
    //  ************************************************************
    pub fn make_segments(text: &str) -> QrResult<Vec<Segment>> {
        let segs = if text.is_empty() {
            Vec::new()
        } else if is_numeric(text) {
            vec![Segment::make_numeric(text)?]
        } else if is_alpha_numeric(text) {
            vec![Segment::make_alpha_numeric(text)?]
        } else {
            vec![Segment::make_bytes(text.as_bytes())?]
        };
        debug!("make_segments: text.len={} mode={:?}", text.len(), segs.first().map(|s| s.mode));
        Ok(segs)
    }
}


//  ************************************************************
/// Bits needed to emit `segs` at `version`, including each
/// segment's mode indicator and character count field
///
/// `None` if a segment's character count does not fit its count
/// field at this version, or the total exceeds 2^31 - 1
//  ************************************************************

pub fn total_bits(segs: &[Segment], version: u8) -> Option<usize> {
    let mut result: usize = 0;
    for seg in segs {
        let ccbits = qr::n_count_bits(version, seg.mode);
        if seg.n_chars >= 1usize << ccbits {
            return None;
        }
        result = result.checked_add(4 + ccbits)?;
        result = result.checked_add(seg.bits.bit_length())?;
        if result > MAX_BITS {
            return None;
        }
    }
    Some(result)
}


//  ************************************************************
/// True if every character of `text` is a decimal digit
//  ************************************************************

pub fn is_numeric(text: &str) -> bool {
    text.bytes().all(|b| b >= b'0' && b <= b'9')
}


//  ************************************************************
/// True if every character of `text` is in [`ALPHANUMERIC_CHARSET`]
//  ************************************************************

pub fn is_alpha_numeric(text: &str) -> bool {
    text.bytes().all(|b| ALPHANUMERIC_CHARSET.contains(&b))
}


//  ************************************************************
/// Value of an alphanumeric-mode character
//  ************************************************************

pub fn ascii_to_alnum(ascii: u8) -> QrResult<u32> {
    match ALPHANUMERIC_CHARSET.iter().position(|c| *c == ascii) {
        Some(i) => Ok(i as u32),
        None => Err(QrError::InvalidArgument("alphanumeric mode only encodes 0-9, A-Z, space, $ % * + - . / :")),
    }
}


//  ************************************************************
/// Character for an alphanumeric-mode value
//  ************************************************************

pub fn alnum_to_ascii(alnum: u8) -> u8 {
    assert!(alnum < 45, "invalid alphanumeric value {}", alnum);
    ALPHANUMERIC_CHARSET[alnum as usize]
}
