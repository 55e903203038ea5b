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
//! Web Assembly (wasm) interface for QR-Grid
//  ************************************************************

extern crate js_sys;
extern crate wasm_bindgen;

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::prelude::*;

#[macro_use]
pub mod logging;
pub mod bits;
pub mod error;
pub mod prng;
pub mod qr;
pub mod qrencode;
pub mod reedsolomon;
pub mod segment;
pub mod web_sys_fallback;

use crate::error::QrResult;
use crate::qrencode::QrCode;


//  ************************************************************
/// Mode (Numeric, Alpha Numeric, 8 bit, ECI, Kanji) as defined by ISO 18004
//  ************************************************************
///
/// Defines how a segment's characters are encoded into the QR code.
/// The discriminant of each variant is its 4 bit mode indicator.
///
/// # Note
///
/// Segment constructors exist for Numeric, Alpha Numeric, 8 bit, and ECI.
/// Kanji is defined for completeness but no constructor builds Kanji segments.

#[wasm_bindgen]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Numeric = 1,
    AlphaNumeric = 2,
    EightBit = 4,
    Eci = 7,
    Kanji = 8,
}


//  ************************************************************
/// Error Correction Level (L/M/Q/H) as defined by ISO 18004
//  ************************************************************
///
/// The discriminant of each variant is its 2 bit format information
/// indicator, which does not follow the robustness ordering;
/// the static tables are indexed by it.

#[wasm_bindgen]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCorrectionLevel {
    /// ~ 7% error correction capability
    L = 1,
    /// ~ 15% error correction capability
    M = 0,
    /// ~ 25% error correction capability
    Q = 3,
    /// ~ 30% error correction capability
    H = 2,
}


//  ************************************************************
/// Set logging level
//  ************************************************************

#[wasm_bindgen]
pub fn set_loglevel(lvl: usize) {
    logging::set_loglevel(lvl);
}


//  ************************************************************
/// Encode text and return the result as a JavaScript object
///
/// On success the object carries `version`, `size`, `mask`, `ec`
/// and `modules` (a flat row-major array of booleans);
/// on failure it carries `err`
//  ************************************************************

#[wasm_bindgen]
pub fn encode_text_to_object(txt: &str, ec: ErrorCorrectionLevel) -> Object {
    result_to_object(qrencode::encode_text(txt, ec))
}


//  ************************************************************
/// Encode binary data (8 bit mode) and return the result as a
/// JavaScript object, shaped as for [`encode_text_to_object`]
//  ************************************************************

#[wasm_bindgen]
pub fn encode_binary_to_object(data: &[u8], ec: ErrorCorrectionLevel) -> Object {
    result_to_object(qrencode::encode_binary(data, ec))
}


//  ************************************************************
/// Marshal an encoding result into a JavaScript object
//  ************************************************************

fn result_to_object(res: QrResult<QrCode>) -> Object {
    let mut out: JsValue = Object::new().into();
    let (err, code) = match res {
        Ok(code) => (None, Some(code)),
        Err(e) => (Some(format!("{}", e)), None),
    };
    set_optional(&mut out, "err", err);
    if let Some(code) = code {
        set_value(&mut out, "version", code.version());
        set_value(&mut out, "size", code.size() as u32);
        set_value(&mut out, "mask", code.mask());
        set_value(&mut out, "ec", code.ec() as u8);
        set_modules_array(&mut out, "modules", &code);
    }
    out.into()
}


//  ************************************************************
/// Helper function to assign a value to a field in a JsValue object
//  ************************************************************

fn set_value<F: Into<JsValue>>(object: &mut JsValue, field: &str, value: F) {
    let _ = Reflect::set(object, &JsValue::from(field), &value.into());
}


//  ************************************************************
/// Helper function to assign an optional value to a field in a JsValue object, if the optional value is not None
//  ************************************************************

fn set_optional<F: Into<JsValue>>(object: &mut JsValue, field: &str, value: Option<F>) {
    if let Some(v) = value {
        let _ = Reflect::set(object, &JsValue::from(field), &v.into());
    }
}


//  ************************************************************
/// Helper function to assign the module matrix to a field in a JsValue object
//  ************************************************************

fn set_modules_array(object: &mut JsValue, field: &str, code: &QrCode) {
    let a = Array::new();
    let n = code.size() as i32;
    for y in 0..n {
        for x in 0..n {
            a.push(&JsValue::from(code.get_module(x, y)));
        }
    }
    let _ = Reflect::set(object, &JsValue::from(field), &a.into());
}
