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
//! Test the structure of encoded QR code matrices
//  ************************************************************

extern crate qrgrid_wasm;

use std::str;

use qrgrid_wasm::logging;
use qrgrid_wasm::prng::Rng;
use qrgrid_wasm::qr;
use qrgrid_wasm::qrencode::{encode_binary, encode_segments, encode_segments_advanced, encode_text};
use qrgrid_wasm::segment::Segment;
use qrgrid_wasm::{ErrorCorrectionLevel, Mode};

mod common;
use common::verify_structure;


//  ************************************************************
//  Reference scenarios
//  ************************************************************

#[test]
fn encode_hello_world_quartile() {
    let code = encode_text("HELLO WORLD", ErrorCorrectionLevel::Q).unwrap();
    assert_eq!(code.version(), 1);
    assert_eq!(code.ec(), ErrorCorrectionLevel::Q);
    assert_eq!(Segment::make_segments("HELLO WORLD").unwrap()[0].mode(), Mode::AlphaNumeric);
    verify_structure(&code);
}

#[test]
fn encode_pi_digits_medium() {
    let code = encode_text("31415926535897932384626433832795", ErrorCorrectionLevel::M).unwrap();
    assert_eq!(code.version(), 1);
    assert_eq!(Segment::make_segments("31415926535897932384626433832795").unwrap()[0].mode(), Mode::Numeric);
    verify_structure(&code);
}

#[test]
fn encode_all_byte_values_low() {
    let data: Vec<u8> = (0u16..256).map(|b| b as u8).collect();
    let code = encode_binary(&data, ErrorCorrectionLevel::L).unwrap();
    // 256 bytes and a 16 bit count field need the 274 data codewords of version 10
    assert_eq!(code.version(), 10);
    assert_eq!(code.ec(), ErrorCorrectionLevel::L);
    verify_structure(&code);
}

#[test]
fn encode_empty_text() {
    // An empty segment list still yields a valid version 1 symbol of pure padding
    let code = encode_text("", ErrorCorrectionLevel::L).unwrap();
    assert_eq!(code.version(), 1);
    verify_structure(&code);
}

#[test]
fn encode_eci_then_bytes() {
    let segs = vec![
        Segment::make_eci(123_456).unwrap(),
        Segment::make_bytes("\u{30c7}\u{30fc}\u{30bf}".as_bytes()).unwrap(),
    ];
    let code = encode_segments(&segs, ErrorCorrectionLevel::H).unwrap();
    verify_structure(&code);
}

#[test]
fn encode_with_pinned_versions_and_mask() {
    let payload = vec![0x5Au8; 80];
    let segs = vec![Segment::make_bytes(&payload).unwrap()];
    let code = encode_segments_advanced(&segs, ErrorCorrectionLevel::L, 1, 5, Some(3), true).unwrap();
    assert_eq!(code.version(), 5);
    assert_eq!(code.mask(), 3);
    verify_structure(&code);
}

#[test]
fn every_fixed_mask_yields_a_valid_symbol() {
    for m in 0..8u8 {
        let segs = Segment::make_segments("FIXED MASK CHECK").unwrap();
        let code = encode_segments_advanced(&segs, ErrorCorrectionLevel::M, 1, 40, Some(m), false).unwrap();
        assert_eq!(code.mask(), m);
        verify_structure(&code);
    }
}


//  ************************************************************
//  Full-capacity payloads across versions, by mode and level
//  ************************************************************

#[test]
fn matrix_8bit_l() {
    matrix_test(Mode::EightBit, ErrorCorrectionLevel::L, &ALL_VERSIONS, 311);
}

#[test]
fn matrix_8bit_m() {
    matrix_test(Mode::EightBit, ErrorCorrectionLevel::M, &ALL_VERSIONS, 321);
}

#[test]
fn matrix_8bit_q() {
    matrix_test(Mode::EightBit, ErrorCorrectionLevel::Q, &SOME_VERSIONS, 331);
}

#[test]
fn matrix_8bit_h() {
    matrix_test(Mode::EightBit, ErrorCorrectionLevel::H, &SOME_VERSIONS, 341);
}

#[test]
fn matrix_anum_l() {
    matrix_test(Mode::AlphaNumeric, ErrorCorrectionLevel::L, &MANY_VERSIONS, 312);
}

#[test]
fn matrix_anum_m() {
    matrix_test(Mode::AlphaNumeric, ErrorCorrectionLevel::M, &SOME_VERSIONS, 322);
}

#[test]
fn matrix_anum_q() {
    matrix_test(Mode::AlphaNumeric, ErrorCorrectionLevel::Q, &SOME_VERSIONS, 332);
}

#[test]
fn matrix_anum_h() {
    matrix_test(Mode::AlphaNumeric, ErrorCorrectionLevel::H, &SOME_VERSIONS, 342);
}

#[test]
#[allow(non_snake_case)]
fn matrix_num__l() {
    matrix_test(Mode::Numeric, ErrorCorrectionLevel::L, &MANY_VERSIONS, 313);
}

#[test]
#[allow(non_snake_case)]
fn matrix_num__m() {
    matrix_test(Mode::Numeric, ErrorCorrectionLevel::M, &SOME_VERSIONS, 323);
}

#[test]
#[allow(non_snake_case)]
fn matrix_num__q() {
    matrix_test(Mode::Numeric, ErrorCorrectionLevel::Q, &SOME_VERSIONS, 333);
}

#[test]
#[allow(non_snake_case)]
fn matrix_num__h() {
    matrix_test(Mode::Numeric, ErrorCorrectionLevel::H, &SOME_VERSIONS, 343);
}


//  ************************************************************

const ALL_VERSIONS: [u8; 40] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, 33,
    34, 35, 36, 37, 38, 39, 40,
];

const MANY_VERSIONS: [u8; 15] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 14, 21, 27, 32, 40];

const SOME_VERSIONS: [u8; 4] = [1, 7, 20, 40];


//  ************************************************************
//  Encode a payload filling the given version exactly, then check
//  that the chosen version matches and the symbol is well formed
//  ************************************************************

fn matrix_test(mode: Mode, ec: ErrorCorrectionLevel, versions: &[u8], seed: u32) {
    logging::set_loglevel(0);
    let mut rng = Rng::new(seed);
    for version in versions {
        let capacity = qr::data_capacity(*version, mode, ec);
        let mut data = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            data.push(rng.get_u8_with_mode(mode));
        }
        let segs = match mode {
            Mode::Numeric => vec![Segment::make_numeric(str::from_utf8(&data).unwrap()).unwrap()],
            Mode::AlphaNumeric => vec![Segment::make_alpha_numeric(str::from_utf8(&data).unwrap()).unwrap()],
            _ => vec![Segment::make_bytes(&data).unwrap()],
        };
        let code = encode_segments_advanced(&segs, ec, 1, 40, None, false).unwrap();
        assert_eq!(
            code.version(),
            *version,
            "wrong version for mode={:?} ec={:?} capacity={}",
            mode,
            ec,
            capacity
        );
        assert_eq!(code.ec(), ec);
        verify_structure(&code);
    }
}
