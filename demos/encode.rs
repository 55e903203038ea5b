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

extern crate clap;
extern crate image;
extern crate qrgrid_wasm;

use clap::{App, Arg, Error, ErrorKind};
use qrgrid_wasm::logging;
use qrgrid_wasm::qrencode::{encode_segments_advanced, QrCode};
use qrgrid_wasm::segment::Segment;
use qrgrid_wasm::{qr, ErrorCorrectionLevel};
use std::io::{self, Write};


//  ************************************************************

const ABOUT: &str = "Encode data into a QR Code

The <DATA> provided is encoded into a QR Code.
The encoding mode and the version are chosen automatically;
the version may be constrained with --min-version/--max-version.

By default the QR Code is output as text to stdout.
By specifying --ansi the output to stdout uses ANSI escape codes on stdout.
By specifying --file <FILE> the output will be written to the <FILE> specified.
The file type (eg .png, or .jpg) determines the format of the <FILE>.
";


//  ************************************************************

const ARG_DEBUG: &str = "DEBUG";
const ARG_EC: &str = "EC";
const ARG_MIN_VERSION: &str = "MIN_VERSION";
const ARG_MAX_VERSION: &str = "MAX_VERSION";
const ARG_MASK: &str = "MASK";
const ARG_NO_BOOST: &str = "NO_BOOST";
const ARG_ANSI: &str = "ANSI";
const ARG_PPM: &str = "PPM";
const ARG_FILE: &str = "FILE";
const ARG_DATA: &str = "DATA";


//  ************************************************************

fn main() {
    let matches = App::new("QR Code encoder")
        .version("0.1")
        .author("Henrik <henrik@kaarposoft.dk>")
        .about(ABOUT)
        .arg(
            Arg::with_name(ARG_DEBUG)
                .short("d")
                .long("debug")
                .help("Specify -d/--debug one or more times to increase debug level")
                .multiple(true),
        ).arg(
            Arg::with_name(ARG_EC)
                .short("e")
                .long("error-correction-level")
                .help("Error correction level (may be raised further unless --no-boost)")
                .value_name(ARG_EC)
                .possible_values(&["L", "l", "M", "m", "Q", "q", "H", "h"]),
        ).arg(
            Arg::with_name(ARG_MIN_VERSION)
                .long("min-version")
                .help("Smallest QR Code version to consider [possible values: 1-40]")
                .value_name(ARG_MIN_VERSION)
                .takes_value(true),
        ).arg(
            Arg::with_name(ARG_MAX_VERSION)
                .long("max-version")
                .help("Largest QR Code version to consider [possible values: 1-40]")
                .value_name(ARG_MAX_VERSION)
                .takes_value(true),
        ).arg(
            Arg::with_name(ARG_MASK)
                .short("m")
                .long("mask")
                .help("Force a mask pattern instead of choosing by penalty [possible values: 0-7]")
                .value_name(ARG_MASK)
                .takes_value(true),
        ).arg(Arg::with_name(ARG_NO_BOOST).long("no-boost").help("Keep the requested error correction level as is"))
        .arg(Arg::with_name(ARG_ANSI).short("a").long("ansi").help("Output ansi control codes (when encoding to stdout)"))
        .arg(
            Arg::with_name(ARG_PPM)
                .short("p")
                .long("pixels-per-module")
                .help("Image pixels per QR Code module (when encoding to file) [possible values: 1-16]")
                .takes_value(true)
                .requires(ARG_FILE),
        ).arg(
            Arg::with_name(ARG_FILE)
                .short("f")
                .long("file")
                .help("File (path) to write QR Code image to")
                .value_name(ARG_FILE)
                .takes_value(true)
                .conflicts_with(ARG_ANSI),
        ).arg(Arg::with_name(ARG_DATA).value_name("DATA").help("Data to be encoded").required(true))
        .get_matches();

    let debug_level = matches.occurrences_of(ARG_DEBUG);
    logging::set_loglevel(debug_level as usize);

    let data = matches.value_of(ARG_DATA).unwrap();

    let ec = match matches.value_of(ARG_EC) {
        None => ErrorCorrectionLevel::M,
        Some("L") | Some("l") => ErrorCorrectionLevel::L,
        Some("M") | Some("m") => ErrorCorrectionLevel::M,
        Some("Q") | Some("q") => ErrorCorrectionLevel::Q,
        Some("H") | Some("h") => ErrorCorrectionLevel::H,
        Some(e) => panic!("unknown error correction level {}", e),
    };

    let min_version = parse_version(matches.value_of(ARG_MIN_VERSION), qr::VERSION_MIN);
    let max_version = parse_version(matches.value_of(ARG_MAX_VERSION), qr::VERSION_MAX);

    let mask = match matches.value_of(ARG_MASK) {
        None => None,
        Some(m) => match m.parse::<u8>() {
            Err(_) => invalid_exit("invalid mask [possible values 0-7]"),
            Ok(m) => {
                if m > 7 {
                    invalid_exit("largest possible mask is 7");
                }
                Some(m)
            }
        },
    };

    let boost = !matches.is_present(ARG_NO_BOOST);

    let ppm = match matches.value_of(ARG_PPM) {
        Some(p) => match p.parse::<usize>() {
            Err(_) => invalid_exit("invalid pixels-per-module [possible values 1-16]"),
            Ok(p) => {
                if p > 16 {
                    invalid_exit("largest possible pixels-per-module is 16");
                }
                p
            }
        },
        None => 4,
    };

    let segs = match Segment::make_segments(data) {
        Err(e) => invalid_exit(&format!("{}", e)),
        Ok(segs) => segs,
    };
    let code = match encode_segments_advanced(&segs, ec, min_version, max_version, mask, boost) {
        Err(e) => invalid_exit(&format!("{}", e)),
        Ok(code) => code,
    };

    let ansi = matches.is_present(ARG_ANSI);
    let file = matches.value_of(ARG_FILE);

    match file {
        None => {
            if ansi {
                write_to_stdout_ansi(&code);
            } else {
                write_to_stdout(&code);
            }
        }
        Some(f) => {
            write_to_path(&code, ppm, f);
        }
    }
}


//  ************************************************************

fn parse_version(arg: Option<&str>, default: u8) -> u8 {
    match arg {
        None => default,
        Some(v) => match v.parse::<u8>() {
            Err(_) => invalid_exit("invalid version [possible values 1-40]"),
            Ok(v) => {
                if v < 1 || v > 40 {
                    invalid_exit("version must be between 1 and 40");
                }
                v
            }
        },
    }
}


//  ************************************************************

fn write_to_stdout(code: &QrCode) {
    let n = code.size() as i32;
    for y in 0..n {
        let mut s = String::with_capacity(code.size() + 1);
        for x in 0..n {
            if code.get_module(x, y) {
                s.push('@');
            } else {
                s.push('.');
            }
        }
        s.push('\n');
        io::stdout().write(s.as_bytes()).unwrap();
    }
}


//  ************************************************************

fn write_to_stdout_ansi(code: &QrCode) {
    let n = code.size() as i32;
    let border = 4;
    let mut border_lines = String::new();
    for _ in 0..border / 2 {
        border_lines.push('\n');
    }
    io::stdout().write(border_lines.as_bytes()).unwrap();

    for y in 0..n {
        let mut s = String::new();
        for _ in 0..border {
            s.push(' ');
        }
        for x in 0..n {
            if code.get_module(x, y) {
                s.push_str("\x1B[40m  ");
            } else {
                s.push_str("\x1B[107m  ");
            }
        }
        s.push_str("\x1B[0m\n");
        io::stdout().write(s.as_bytes()).unwrap();
    }
    io::stdout().write(border_lines.as_bytes()).unwrap();
}


//  ************************************************************

fn write_to_path(code: &QrCode, ppm: usize, path: &str) {
    let n = code.size();
    let dark = 48u8;
    let light = 240u8;
    let border = 4;
    let dim = ppm * (n + 2 * border);
    let mut img_data = Vec::with_capacity(dim * dim);
    for _y in 0..ppm * border {
        for _x in 0..dim {
            img_data.push(light);
        }
    }
    for y in 0..n {
        for _ in 1..=ppm {
            for _x in 0..ppm * border {
                img_data.push(light);
            }
            for x in 0..n {
                let gray = if code.get_module(x as i32, y as i32) { dark } else { light };
                for _ in 1..=ppm {
                    img_data.push(gray);
                }
            }
            for _x in 0..ppm * border {
                img_data.push(light);
            }
        }
    }
    for _y in 0..ppm * border {
        for _x in 0..dim {
            img_data.push(light);
        }
    }
    image::save_buffer(path, &img_data, dim as u32, dim as u32, image::ColorType::L8).unwrap()
}


//  ************************************************************

fn invalid_exit(msg: &str) -> ! {
    let err = Error::with_description(msg, ErrorKind::InvalidValue);
    err.exit()
}
