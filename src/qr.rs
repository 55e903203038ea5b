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
//! Common definitions for QR codes
//!
//! # References
//!
//! * [Wikipedia on QR codes](https://en.wikipedia.org/wiki/QR_code)
//! * [ISO 18004:2015](https://www.iso.org/standard/62021.html)
//! * [ISO 18004:2005](http://www.arscreatio.com/repositorio/images/n_23/SC031-N-1915-18004Text.pdf)
//  ************************************************************

use super::logging;
use super::{ErrorCorrectionLevel, Mode};


//  ************************************************************

pub const VERSION_MIN: u8 = 1;
pub const VERSION_MAX: u8 = 40;


//  ************************************************************

pub fn n_modules_from_version(version: u8) -> usize {
    (17 + 4 * version) as usize
}


//  ************************************************************
/// Width of the character count field for `mode` at `version`
//  ************************************************************

pub fn n_count_bits(version: u8, mode: Mode) -> usize {
    match mode {
        Mode::EightBit if version < 10 => 8,
        Mode::EightBit => 16,
        Mode::AlphaNumeric if version < 10 => 9,
        Mode::AlphaNumeric if version < 27 => 11,
        Mode::AlphaNumeric => 13,
        Mode::Numeric if version < 10 => 10,
        Mode::Numeric if version < 27 => 12,
        Mode::Numeric => 14,
        Mode::Kanji if version < 10 => 8,
        Mode::Kanji if version < 27 => 10,
        Mode::Kanji => 12,
        Mode::Eci => 0,
    }
}


//  ************************************************************
/// True if data module `(x, y)` is inverted by mask pattern `m`
//  ************************************************************

pub fn mask(m: u8, x: usize, y: usize) -> bool {
    match m {
        0 => (x + y) % 2 == 0,
        1 => y % 2 == 0,
        2 => x % 3 == 0,
        3 => (x + y) % 3 == 0,
        4 => (x / 3 + y / 2) % 2 == 0,
        5 => (x * y) % 2 + (x * y) % 3 == 0,
        6 => ((x * y) % 2 + (x * y) % 3) % 2 == 0,
        7 => ((x + y) % 2 + (x * y) % 3) % 2 == 0,
        _ => false,
    }
}


//  ************************************************************
/// Error correction codewords per block, indexed by
/// `[ec format indicator][version]` (column 0 is padding, never read)
//  ************************************************************

#[rustfmt::skip]
const ECC_CODEWORDS_PER_BLOCK: [[u8; 41]; 4] = [
    //0   1   2   3   4   5   6   7   8   9  10  11  12  13  14  15  16  17  18  19  20  21  22  23  24  25  26  27  28  29  30  31  32  33  34  35  36  37  38  39  40
    [ 0, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28], // M
    [ 0,  7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30, 30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // L
    [ 0, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // H
    [ 0, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30, 30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30], // Q
];


//  ************************************************************
/// Number of error correction blocks, indexed by
/// `[ec format indicator][version]` (column 0 is padding, never read)
//  ************************************************************

#[rustfmt::skip]
const NUM_ERROR_CORRECTION_BLOCKS: [[u8; 41]; 4] = [
    //0  1  2  3  4  5  6  7  8  9 10  11  12  13  14  15  16  17  18  19  20  21  22  23  24  25  26  27  28  29  30  31  32  33  34  35  36  37  38  39  40
    [ 0, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5,  5,  8,  9,  9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21, 23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49], // M
    [ 0, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4,  4,  4,  4,  4,  6,  6,  6,  6,  7,  8,  8,  9,  9, 10, 12, 12, 12, 13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25], // L
    [ 0, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35, 37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81], // H
    [ 0, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8,  8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29, 34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68], // Q
];


//  ************************************************************

pub fn n_ec_codewords_per_block(version: u8, ec: ErrorCorrectionLevel) -> usize {
    trace!("n_ec_codewords_per_block v={} e={:?}", version, ec);
    ECC_CODEWORDS_PER_BLOCK[ec as usize][version as usize] as usize
}


//  ************************************************************

pub fn n_ec_blocks(version: u8, ec: ErrorCorrectionLevel) -> usize {
    trace!("n_ec_blocks v={} e={:?}", version, ec);
    NUM_ERROR_CORRECTION_BLOCKS[ec as usize][version as usize] as usize
}


//  ************************************************************
/// Number of data modules available after all function patterns are placed
//  ************************************************************

pub fn n_raw_data_modules(version: u8) -> usize {
    debug_assert!(version >= VERSION_MIN && version <= VERSION_MAX);
    let n = n_modules_from_version(version);
    let mut result = n * n;
    result -= 192;          // finder patterns with separators
    result -= 31;           // format information and dark module
    result -= 2 * (n - 16); // timing patterns
    if version >= 2 {
        let a = version as usize / 7 + 2;
        result -= 25 * (a - 1) * (a - 1) + 40 * (a - 2); // alignment patterns, net of timing overlap
        if version >= 7 {
            result -= 36; // two version information blocks
        }
    }
    debug_assert!(result >= 208 && result <= 29_648);
    result
}


//  ************************************************************
/// Number of 8-bit data codewords (pre error correction)
//  ************************************************************

pub fn n_data_codewords(version: u8, ec: ErrorCorrectionLevel) -> usize {
    n_raw_data_modules(version) / 8 - n_ec_codewords_per_block(version, ec) * n_ec_blocks(version, ec)
}


//  ************************************************************
/// Number of characters (bytes in 8 bit mode) a single segment of
/// `mode` can hold at `version` and `ec`
//  ************************************************************

pub fn data_capacity(version: u8, mode: Mode, ec: ErrorCorrectionLevel) -> usize {
    let bits = n_data_codewords(version, ec) * 8 - 4 - n_count_bits(version, mode);
    match mode {
        Mode::EightBit => bits / 8,
        Mode::AlphaNumeric => {
            let cap = bits / 11 * 2;
            if bits >= cap / 2 * 11 + 6 {
                cap + 1
            } else {
                cap
            }
        }
        Mode::Numeric => {
            let cap = bits / 10 * 3;
            if bits >= cap / 3 * 10 + 7 {
                cap + 2
            } else if bits >= cap / 3 * 10 + 4 {
                cap + 1
            } else {
                cap
            }
        }
        Mode::Kanji => bits / 13,
        Mode::Eci => 0,
    }
}


//  ************************************************************
/// Center coordinates (in both axes) of the alignment patterns
//  ************************************************************

pub fn alignment_positions(version: u8) -> Vec<usize> {
    if version == 1 {
        return Vec::with_capacity(0);
    }
    let ver = version as usize;
    let n_align = ver / 7 + 2;
    let step = if ver == 32 { 26 } else { (ver * 4 + n_align * 2 + 1) / (n_align * 2 - 2) * 2 };
    let n_modules = n_modules_from_version(version);
    let mut result: Vec<usize> = (0..n_align - 1).map(|i| n_modules - 7 - i * step).collect();
    result.push(6);
    result.reverse();
    result
}


//  ************************************************************
/// The 15 format bits for `mask` and `ec`: BCH(15,5) with
/// generator 0x537, masked with 0x5412
//  ************************************************************

pub fn format_info(mask: u8, ec: ErrorCorrectionLevel) -> u16 {
    debug_assert!(mask <= 7);
    let data = u32::from(ec as u8) << 3 | u32::from(mask);
    let mut rem = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * 0x537);
    }
    let bits = (data << 10 | rem) ^ 0x5412;
    debug_assert!(bits >> 15 == 0);
    bits as u16
}


//  ************************************************************
/// The 18 version bits for `version`: BCH(18,6) with generator 0x1F25
//  ************************************************************

pub fn version_info(version: u8) -> u32 {
    debug_assert!(version >= 7 && version <= VERSION_MAX);
    let ver = u32::from(version);
    let mut rem = ver;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * 0x1F25);
    }
    let bits = ver << 12 | rem;
    debug_assert!(bits >> 18 == 0);
    bits
}
