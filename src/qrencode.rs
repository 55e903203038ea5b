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
//! Encode text or binary data to a QR code
//  ************************************************************

use std::cmp;

use super::bits::BitStream;
use super::error::{QrError, QrResult};
use super::logging;
use super::qr;
use super::reedsolomon::ReedSolomonEncoder;
use super::segment::{self, Segment};
use super::ErrorCorrectionLevel;


/* note
 * (x,y) = (column, row)  -  x selects the column, y selects the row
*/


//  ************************************************************
/// Encode `text` with the given `ErrorCorrectionLevel`
///
/// The densest mode covering the text is chosen, then the smallest
/// of the 40 versions that fits it. The error correction level may
/// be raised and the mask is chosen by penalty scoring.
///
/// Any text of at most 738 Unicode code points is guaranteed to fit
/// at [`ErrorCorrectionLevel::L`]
//  ************************************************************

pub fn encode_text(text: &str, ec: ErrorCorrectionLevel) -> QrResult<QrCode> {
    let segs = Segment::make_segments(text)?;
    encode_segments(&segs, ec)
}


//  ************************************************************
/// Encode arbitrary bytes in 8 bit mode with the given `ErrorCorrectionLevel`
///
/// At most 2953 bytes fit (version 40 at [`ErrorCorrectionLevel::L`])
//  ************************************************************

pub fn encode_binary(data: &[u8], ec: ErrorCorrectionLevel) -> QrResult<QrCode> {
    let segs = vec![Segment::make_bytes(data)?];
    encode_segments(&segs, ec)
}


//  ************************************************************
/// Encode pre-built segments, searching all versions, boosting the
/// error correction level and choosing the mask automatically
//  ************************************************************

pub fn encode_segments(segs: &[Segment], ec: ErrorCorrectionLevel) -> QrResult<QrCode> {
    encode_segments_advanced(segs, ec, qr::VERSION_MIN, qr::VERSION_MAX, None, true)
}


//  ************************************************************
/// Encode pre-built segments with full control
///
/// The smallest version in `min_version..=max_version` whose data
/// capacity at `ec` holds all segments is chosen. With `boost_ec`
/// the level is then raised as far as the payload allows. `mask`
/// `None` selects the mask by penalty scoring; `Some(0..=7)` forces
/// one.
//  ************************************************************

pub fn encode_segments_advanced(
    segs: &[Segment],
    ec: ErrorCorrectionLevel,
    min_version: u8,
    max_version: u8,
    mask: Option<u8>,
    boost_ec: bool,
) -> QrResult<QrCode> {
    if min_version < qr::VERSION_MIN || min_version > max_version || max_version > qr::VERSION_MAX {
        return Err(QrError::InvalidArgument("version range must satisfy 1 <= min <= max <= 40"));
    }
    log!("encode_segments: begin encoding qr code");

    // Find the smallest version whose data capacity fits all segments
    let mut version = min_version;
    let used = loop {
        let capacity = qr::n_data_codewords(version, ec) * 8;
        let used = segment::total_bits(segs, version);
        if let Some(n) = used {
            if n <= capacity {
                break n;
            }
        }
        if version >= max_version {
            debug!("encode_segments: does not fit: used={:?} capacity={}", used, capacity);
            return Err(match used {
                Some(n) => QrError::DataTooLong { data_bits: n, capacity_bits: capacity },
                None => QrError::SegmentTooLong,
            });
        }
        version += 1;
    };

    // Raise the error correction level as far as the payload allows
    let mut ec = ec;
    if boost_ec {
        for new_ec in
            [ErrorCorrectionLevel::L, ErrorCorrectionLevel::M, ErrorCorrectionLevel::Q, ErrorCorrectionLevel::H].iter()
        {
            if used <= qr::n_data_codewords(version, *new_ec) * 8 {
                ec = *new_ec;
            }
        }
    }
    debug!("encode_segments: version={} used={} ec={:?}", version, used, ec);

    // Mode indicator, character count and payload bits of every segment
    let mut bs = BitStream::new();
    for seg in segs {
        bs.append_bits(u32::from(seg.mode() as u8), 4)?;
        bs.append_bits(seg.n_chars() as u32, qr::n_count_bits(version, seg.mode()))?;
        bs.append_data(seg.bits())?;
    }
    debug_assert_eq!(bs.bit_length(), used);

    // Terminator, zero bits up to a byte boundary, then alternating pad bytes
    let capacity = qr::n_data_codewords(version, ec) * 8;
    let n_terminator = cmp::min(4, capacity - bs.bit_length());
    bs.append_bits(0, n_terminator)?;
    let n_byte_align = (8 - bs.bit_length() % 8) % 8;
    bs.append_bits(0, n_byte_align)?;
    let pad: [u32; 2] = [0xEC, 0x11];
    let mut pi = 0;
    while bs.bit_length() < capacity {
        bs.append_bits(pad[pi], 8)?;
        pi = 1 - pi;
    }
    debug_assert_eq!(bs.bit_length(), capacity);

    let code = QrCode::new(version, ec, &bs.into_bytes(), mask)?;
    log!("encode_segments: done encoding qr code");
    Ok(code)
}


//  ************************************************************
/// A finished QR code symbol
///
/// Immutable once constructed; `get_module` exposes the matrix
//  ************************************************************

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrCode {
    version: u8,
    n_modules: usize,
    ec: ErrorCorrectionLevel,
    mask: u8,
    modules: Vec<bool>,
}

//  ************************************************************
impl QrCode {
    //  ************************************************************
    /// Build a symbol from raw data codewords
    ///
    /// `data_codewords.len()` must equal
    /// [`qr::n_data_codewords`]`(version, ec)`; `mask` `None` selects
    /// the mask by penalty scoring
    //  ************************************************************
    pub fn new(version: u8, ec: ErrorCorrectionLevel, data_codewords: &[u8], mask: Option<u8>) -> QrResult<QrCode> {
        if version < qr::VERSION_MIN || version > qr::VERSION_MAX {
            return Err(QrError::InvalidArgument("version must be between 1 and 40"));
        }
        if let Some(m) = mask {
            if m > 7 {
                return Err(QrError::InvalidArgument("mask must be between 0 and 7"));
            }
        }
        if data_codewords.len() != qr::n_data_codewords(version, ec) {
            return Err(QrError::InvalidArgument("wrong number of data codewords for this version and level"));
        }
        let n_modules = qr::n_modules_from_version(version);
        let mut matrix = Matrix::new(n_modules);

        // Timing
        set_timing_patterns(&mut matrix);

        // Finder
        set_finder_pattern(&mut matrix, 3, 3);
        set_finder_pattern(&mut matrix, n_modules - 4, 3);
        set_finder_pattern(&mut matrix, 3, n_modules - 4);

        // Alignment
        set_alignment_patterns(&mut matrix, version);

        // Format placeholder; the real bits are written once the mask is known
        set_format(&mut matrix, 0, ec);

        if version >= 7 {
            set_version(&mut matrix, version);
        }

        // Data
        let all_codewords = add_error_correction(data_codewords, version, ec);
        set_data_snaked(&mut matrix, &all_codewords, version);

        // Mask
        let mask = match mask {
            Some(m) => {
                apply_mask(&mut matrix, m);
                set_format(&mut matrix, m, ec);
                m
            }
            None => {
                let m = best_penalty(&mut matrix, ec);
                apply_mask(&mut matrix, m);
                set_format(&mut matrix, m, ec);
                m
            }
        };

        let Matrix { modules, .. } = matrix; // is_function ends here
        Ok(QrCode { version, n_modules, ec, mask, modules })
    }

    //  ************************************************************
    pub fn version(&self) -> u8 {
        self.version
    }

    //  ************************************************************
    /// Width and height in modules, `4 * version + 17`
    //  ************************************************************
    pub fn size(&self) -> usize {
        self.n_modules
    }

    //  ************************************************************
    pub fn ec(&self) -> ErrorCorrectionLevel {
        self.ec
    }

    //  ************************************************************
    pub fn mask(&self) -> u8 {
        self.mask
    }

    //  ************************************************************
    /// True if the module in column `x` of row `y` is dark;
    /// false for any coordinate outside the symbol
    //  ************************************************************
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let n = self.n_modules as i32;
        if x < 0 || y < 0 || x >= n || y >= n {
            return false;
        }
        self.modules[(x + y * n) as usize]
    }
}


//  ************************************************************
/// The module matrix under construction, with a parallel map of
/// which modules belong to function patterns
//  ************************************************************

struct Matrix {
    n_modules: usize,
    modules: Vec<bool>,
    is_function: Vec<bool>,
}

//  ************************************************************
impl Matrix {
    fn new(n_modules: usize) -> Self {
        Matrix { n_modules, modules: vec![false; n_modules * n_modules], is_function: vec![false; n_modules * n_modules] }
    }
    fn get(&self, x: usize, y: usize) -> bool {
        self.modules[x + y * self.n_modules]
    }
    fn set_data(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[x + y * self.n_modules] = dark;
    }
    fn set_function(&mut self, x: usize, y: usize, dark: bool) {
        self.modules[x + y * self.n_modules] = dark;
        self.is_function[x + y * self.n_modules] = true;
    }
    fn is_function(&self, x: usize, y: usize) -> bool {
        self.is_function[x + y * self.n_modules]
    }
    fn flip(&mut self, x: usize, y: usize) {
        self.modules[x + y * self.n_modules] ^= true;
    }
}


//  ************************************************************
fn set_timing_patterns(matrix: &mut Matrix) {
    for i in 0..matrix.n_modules {
        matrix.set_function(i, 6, i % 2 == 0);
        matrix.set_function(6, i, i % 2 == 0);
    }
}

//  ************************************************************
fn set_finder_pattern(matrix: &mut Matrix, x: usize, y: usize) {
    // 9x9 stamp centered on (x, y) including the light separator, clipped at the edges
    let n = matrix.n_modules as i32;
    for dy in -4i32..=4 {
        for dx in -4i32..=4 {
            let xx = x as i32 + dx;
            let yy = y as i32 + dy;
            if xx >= 0 && yy >= 0 && xx < n && yy < n {
                let dist = cmp::max(dx.abs(), dy.abs());
                matrix.set_function(xx as usize, yy as usize, dist != 2 && dist != 4);
            }
        }
    }
}

//  ************************************************************
fn set_alignment_patterns(matrix: &mut Matrix, version: u8) {
    let positions = qr::alignment_positions(version);
    let n_align = positions.len();
    for i in 0..n_align {
        for j in 0..n_align {
            // The three corners occupied by finder patterns get no alignment pattern
            if (i == 0 && j == 0) || (i == 0 && j == n_align - 1) || (i == n_align - 1 && j == 0) {
                continue;
            }
            // 5x5 stamp centered on the position pair
            for dy in -2i32..=2 {
                for dx in -2i32..=2 {
                    let xx = (positions[i] as i32 + dx) as usize;
                    let yy = (positions[j] as i32 + dy) as usize;
                    matrix.set_function(xx, yy, cmp::max(dx.abs(), dy.abs()) != 1);
                }
            }
        }
    }
}

//  ************************************************************
fn set_format(matrix: &mut Matrix, mask: u8, ec: ErrorCorrectionLevel) {
    let bits = u32::from(qr::format_info(mask, ec));
    let n = matrix.n_modules;

    // First copy, around the top left finder
    for i in 0..6 {
        matrix.set_function(8, i, (bits >> i) & 1 != 0);
    }
    matrix.set_function(8, 7, (bits >> 6) & 1 != 0);
    matrix.set_function(8, 8, (bits >> 7) & 1 != 0);
    matrix.set_function(7, 8, (bits >> 8) & 1 != 0);
    for i in 9..15 {
        matrix.set_function(14 - i, 8, (bits >> i) & 1 != 0);
    }

    // Second copy, split between the two other finders
    for i in 0..8 {
        matrix.set_function(n - 1 - i, 8, (bits >> i) & 1 != 0);
    }
    for i in 8..15 {
        matrix.set_function(8, n - 15 + i, (bits >> i) & 1 != 0);
    }

    // The dark module
    matrix.set_function(8, n - 8, true);
}

//  ************************************************************
fn set_version(matrix: &mut Matrix, version: u8) {
    let bits = qr::version_info(version);
    let n = matrix.n_modules;
    // 3x6 block below the bottom left finder, mirrored right of the top right finder
    for i in 0..18 {
        let dark = (bits >> i) & 1 != 0;
        let a = n - 11 + i % 3;
        let b = i / 3;
        matrix.set_function(a, b, dark);
        matrix.set_function(b, a, dark);
    }
}

//  ************************************************************
/// Split `data` into blocks, append Reed Solomon parity to each,
/// and interleave everything column by column
//  ************************************************************
fn add_error_correction(data: &[u8], version: u8, ec: ErrorCorrectionLevel) -> Vec<u8> {
    debug!("add_error_correction: data.len={} version={} ec={:?}", data.len(), version, ec);
    let n_blocks = qr::n_ec_blocks(version, ec);
    let ec_len = qr::n_ec_codewords_per_block(version, ec);
    let raw = qr::n_raw_data_modules(version) / 8;
    let n_short = n_blocks - raw % n_blocks;
    let short_len = raw / n_blocks;
    debug_assert_eq!(data.len(), raw - ec_len * n_blocks);
    trace!(
        "add_error_correction: n_blocks={} ec_len={} raw={} n_short={} short_len={}",
        n_blocks,
        ec_len,
        raw,
        n_short,
        short_len
    );

    let rs = ReedSolomonEncoder::new(ec_len);
    let mut blocks: Vec<Vec<u8>> = Vec::with_capacity(n_blocks);
    let mut k = 0;
    for i in 0..n_blocks {
        let data_len = short_len - ec_len + if i < n_short { 0 } else { 1 };
        let mut block = data[k..k + data_len].to_vec();
        k += data_len;
        let parity = rs.encode(&block);
        if i < n_short {
            block.push(0); // hole, skipped again below so every block is the same length
        }
        block.extend_from_slice(&parity);
        blocks.push(block);
    }
    debug_assert_eq!(k, data.len());

    let mut out = Vec::with_capacity(raw);
    for i in 0..blocks[0].len() {
        for (j, block) in blocks.iter().enumerate() {
            if i != short_len - ec_len || j >= n_short {
                out.push(block[i]);
            }
        }
    }
    if out.len() != raw {
        warn!("add_error_correction: INCONSISTENT NUMBER OF OUTPUT CODEWORDS: out.len={} raw={}", out.len(), raw);
    }
    debug_assert_eq!(out.len(), raw);
    out
}

//  ************************************************************
/// Place the codeword bits along the two-column zig-zag, skipping
/// function modules and the vertical timing column
//  ************************************************************
fn set_data_snaked(matrix: &mut Matrix, codewords: &[u8], version: u8) {
    debug!("set_data_snaked: begin; codewords.len={}", codewords.len());
    debug_assert_eq!(codewords.len(), qr::n_raw_data_modules(version) / 8);
    let n = matrix.n_modules;
    let mut i: usize = 0;
    let mut right: i32 = n as i32 - 1;
    while right >= 1 {
        if right == 6 {
            right = 5;
        }
        let upward = (right + 1) & 2 == 0;
        for vert in 0..n {
            let y = if upward { n - 1 - vert } else { vert };
            for j in 0..2 {
                let x = (right - j) as usize;
                if !matrix.is_function(x, y) && i < codewords.len() * 8 {
                    matrix.set_data(x, y, (codewords[i >> 3] >> (7 - (i & 7))) & 1 != 0);
                    i += 1;
                }
            }
        }
        right -= 2;
    }
    // Only the 0..=7 remainder modules stay unwritten (light)
    if i != codewords.len() * 8 {
        error!("set_data_snaked: WRONG NUMBER OF BITS PLACED: placed={} expected={}", i, codewords.len() * 8);
    }
    debug_assert_eq!(i, codewords.len() * 8);
    debug!("set_data_snaked: done");
}

//  ************************************************************
/// XOR mask pattern `mask` onto every non-function module
///
/// Applying the same mask twice restores the matrix
//  ************************************************************
fn apply_mask(matrix: &mut Matrix, mask: u8) {
    for y in 0..matrix.n_modules {
        for x in 0..matrix.n_modules {
            if qr::mask(mask, x, y) && !matrix.is_function(x, y) {
                matrix.flip(x, y);
            }
        }
    }
}

//  ************************************************************
/// Try all 8 masks and return the one with the lowest penalty;
/// ties go to the lowest mask number
//  ************************************************************
fn best_penalty(matrix: &mut Matrix, ec: ErrorCorrectionLevel) -> u8 {
    let mut best_penalty = u32::max_value();
    let mut best_mask = 0u8;
    for mask in 0..8 {
        apply_mask(matrix, mask);
        set_format(matrix, mask, ec);
        let p = penalty(matrix);
        if p < best_penalty {
            best_penalty = p;
            best_mask = mask;
        }
        apply_mask(matrix, mask); // undo; masking is an XOR involution
    }
    debug!("best_penalty: best_penalty={} best_mask={}", best_penalty, best_mask);
    best_mask
}


//  ************************************************************

const PENALTY_N1: u32 = 3;
const PENALTY_N2: u32 = 3;
const PENALTY_N3: u32 = 40;
const PENALTY_N4: u32 = 10;

//  ************************************************************
fn penalty(matrix: &Matrix) -> u32 {
    let p_adjacent = penalty_adjacent(matrix);
    let p_blocks = penalty_blocks(matrix);
    let p_ratio = penalty_ratio(matrix);
    let p_dark = penalty_dark(matrix);
    let p_total = p_adjacent + p_blocks + p_ratio + p_dark;
    trace!(
        "penalty: p_adjacent={} p_blocks={} p_ratio={} p_dark={} p_total={}",
        p_adjacent,
        p_blocks,
        p_ratio,
        p_dark,
        p_total
    );
    p_total
}

//  ************************************************************
/// Calculate penalty for adjacent modules in row/column in same color
///
/// # Feature:
/// Adjacent modules in row/column in same color
///
/// # Evaluation condition:
/// No. of modules = (5 + i)
///
/// # Points:
/// N1 + i
//  ************************************************************
fn penalty_adjacent(matrix: &Matrix) -> u32 {
    let n = matrix.n_modules;
    let mut points = 0;
    for rc in [true, false].iter() {
        for i in 0..n {
            let mut counting_dark = false;
            let mut run = 0u32;
            for j in 0..n {
                let is_dark = if *rc { matrix.get(j, i) } else { matrix.get(i, j) };
                if j == 0 {
                    counting_dark = is_dark;
                    run = 0;
                }
                if counting_dark == is_dark {
                    run += 1;
                    if run == 5 {
                        points += PENALTY_N1;
                    } else if run > 5 {
                        points += 1;
                    }
                } else {
                    counting_dark = is_dark;
                    run = 1;
                }
            }
        }
    }
    points
}

//  ************************************************************
/// Calculate penalty for block of modules in same color
///
/// # Feature:
/// 2x2 block of modules in same color
///
/// # Evaluation condition:
/// All four modules agree
///
/// # Points:
/// N2
//  ************************************************************
fn penalty_blocks(matrix: &Matrix) -> u32 {
    let n = matrix.n_modules;
    let mut points = 0;
    for y in 0..n - 1 {
        for x in 0..n - 1 {
            let c = matrix.get(x, y);
            if c == matrix.get(x + 1, y) && c == matrix.get(x, y + 1) && c == matrix.get(x + 1, y + 1) {
                points += PENALTY_N2;
            }
        }
    }
    points
}

//  ************************************************************
/// Calculate penalty for 1:1:3:1:1 ratio (dark:light:dark:light:dark) pattern in row/column
///
/// # Feature:
/// 1:1:3:1:1 ratio (dark:light:dark:light:dark) pattern in row/column,
/// preceded or followed by light area 4 ratio units wide
///
/// # Evaluation condition:
/// Existence of the pattern
///
/// # Points:
/// N3
//  ************************************************************
fn penalty_ratio(matrix: &Matrix) -> u32 {
    let n = matrix.n_modules;
    let mut points = 0;
    for rc in [true, false].iter() {
        for i in 0..n {
            let mut pat = PenaltyPattern::new(n);
            let mut run_dark = false;
            let mut run_len: usize = 0;
            for j in 0..n {
                let is_dark = if *rc { matrix.get(j, i) } else { matrix.get(i, j) };
                if is_dark == run_dark {
                    run_len += 1;
                } else {
                    pat.push(run_len);
                    if !run_dark {
                        points += PENALTY_N3 * pat.count_like_finder();
                    }
                    run_dark = is_dark;
                    run_len = 1;
                }
            }
            points += PENALTY_N3 * pat.terminate_and_count(run_dark, run_len);
        }
    }
    points
}

//  ************************************************************
/// Calculate penalty for proportion of dark modules in entire symbol
///
/// # Feature:
/// Proportion of dark modules in entire symbol
///
/// # Evaluation condition:
/// 50 +/- (5*k)% to 50 +/- (5*(k+1))%
///
/// # Points:
/// N4 x k
//  ************************************************************
fn penalty_dark(matrix: &Matrix) -> u32 {
    let n = matrix.n_modules;
    let mut dark: usize = 0;
    for y in 0..n {
        for x in 0..n {
            if matrix.get(x, y) {
                dark += 1;
            }
        }
    }
    let total = n * n;
    let diff = if dark * 20 >= total * 10 { dark * 20 - total * 10 } else { total * 10 - dark * 20 };
    let k = (diff + total - 1) / total - 1;
    debug_assert!(k <= 9);
    (k as u32) * PENALTY_N4
}


//  ************************************************************
/// Helper structure to find 1:1:3:1:1 patterns to give penalty
///
/// Keeps the lengths of the last 7 terminated runs. The first and
/// last run of every line are extended by a full symbol width of
/// light modules, standing in for the quiet zone
//  ************************************************************

#[derive(Debug)]
struct PenaltyPattern {
    n_modules: usize,
    runs: [usize; 7],
}

//  ************************************************************
impl PenaltyPattern {
    //  ************************************************************
    fn new(n_modules: usize) -> Self {
        PenaltyPattern { n_modules, runs: [0; 7] }
    }

    //  ************************************************************
    /// Record a terminated run, padding the very first run of the
    /// line with the implicit light border
    //  ************************************************************
    fn push(&mut self, mut run_len: usize) {
        if self.runs[0] == 0 {
            run_len += self.n_modules;
        }
        let mut i = self.runs.len() - 1;
        while i > 0 {
            self.runs[i] = self.runs[i - 1];
            i -= 1;
        }
        self.runs[0] = run_len;
    }

    //  ************************************************************
    /// How many finder-like patterns end in the light run just
    /// pushed: the middle five runs must be n,n,3n,n,n with a light
    /// run of at least 4n on one side and at least n on the other
    //  ************************************************************
    fn count_like_finder(&self) -> u32 {
        let r = &self.runs;
        let n = r[1];
        debug_assert!(n <= self.n_modules * 3);
        let core = n > 0 && r[2] == n && r[3] == n * 3 && r[4] == n && r[5] == n;
        let mut count = 0;
        if core && r[0] >= n * 4 && r[6] >= n {
            count += 1;
        }
        if core && r[6] >= n * 4 && r[0] >= n {
            count += 1;
        }
        count
    }

    //  ************************************************************
    /// Close the line: flush a pending dark run, extend the final
    /// light run with the implicit border, and count
    //  ************************************************************
    fn terminate_and_count(mut self, run_dark: bool, mut run_len: usize) -> u32 {
        if run_dark {
            self.push(run_len);
            run_len = 0;
        }
        run_len += self.n_modules;
        self.push(run_len);
        self.count_like_finder()
    }
}


//  ************************************************************
#[cfg(test)]
//  ************************************************************

mod qrencode {
    use super::super::Mode;
    use super::*;

    //  ************************************************************
    //  Mask mechanics
    //  ************************************************************

    #[test]
    fn mask_is_an_involution() {
        for m in 0..8u8 {
            let mut matrix = Matrix::new(21);
            // A few function cells must stay untouched
            matrix.set_function(0, 0, true);
            matrix.set_function(10, 10, false);
            let before: Vec<bool> = matrix.modules.clone();
            apply_mask(&mut matrix, m);
            apply_mask(&mut matrix, m);
            assert!(matrix.modules == before, "mask {} applied twice must be the identity", m);
        }
    }

    #[test]
    fn mask_leaves_function_modules_alone() {
        let mut matrix = Matrix::new(21);
        matrix.set_function(0, 0, true);
        apply_mask(&mut matrix, 0); // mask 0 inverts (0, 0) of data modules
        assert!(matrix.get(0, 0), "function module must not be masked");
        assert!(matrix.get(2, 0), "data module on the mask-0 diagonal grid must flip");
    }

    //  ************************************************************
    //  Penalty rules on hand-built matrices
    //  ************************************************************

    fn all_light(n: usize) -> Matrix {
        Matrix::new(n)
    }

    #[test]
    fn penalty_adjacent_counts_long_runs() {
        let mut m = all_light(11);
        // One dark row of 11: in that row a run of 11 (3 + 6 points);
        // every column gets runs 1 and 10 dark/light mix
        for x in 0..11 {
            m.set_data(x, 5, true);
        }
        // Rows: 10 light rows of 11 -> 10 * (3 + 6); dark row -> 3 + 6
        // Columns: each has runs 5, 1, 5 -> 5 needs >= 5 -> 3 points each
        let expected = 10 * 9 + 9 + 11 * (3 + 3);
        assert_eq!(penalty_adjacent(&m), expected);
    }

    #[test]
    fn penalty_blocks_counts_2x2_blocks() {
        let m = all_light(3);
        // All light 3x3: four 2x2 blocks, all uniform
        assert_eq!(penalty_blocks(&m), 4 * PENALTY_N2);
    }

    #[test]
    fn penalty_ratio_detects_finder_pattern() {
        // A lone 1:1:3:1:1 run in the middle of a light row scores twice
        // (borders on both sides are >= 4 light modules)
        let mut m = all_light(21);
        let y = 10;
        for x in &[6usize, 8, 9, 10, 12] {
            m.set_data(*x, y, true);
        }
        // Dark cells at 6, 8..10, 12: runs light 6, dark 1, light 1, dark 3, light 1, dark 1, light 8
        let p = penalty_ratio(&m);
        // One pattern found in the row, counted from both sides: 2 * 40.
        // The columns holding dark cells each break up otherwise uniform light columns: no 1:1:3:1:1 there.
        assert_eq!(p, 2 * PENALTY_N3);
    }

    #[test]
    fn penalty_dark_measures_imbalance() {
        // All light: 50% off balance -> k = 9
        let m = all_light(21);
        assert_eq!(penalty_dark(&m), 9 * PENALTY_N4);
        // Roughly half dark: no penalty
        let mut m = all_light(21);
        let mut c = 0;
        for y in 0..21 {
            for x in 0..21 {
                if c < 220 {
                    m.set_data(x, y, true);
                }
                c += 1;
            }
        }
        assert_eq!(penalty_dark(&m), 0);
    }

    //  ************************************************************
    //  Driver behavior
    //  ************************************************************

    #[test]
    fn version_is_the_smallest_that_fits() {
        // 32 digits at M: 121 bits used, fits the 128 data bits of version 1 at M
        let code = encode_text("31415926535897932384626433832795", ErrorCorrectionLevel::M).unwrap();
        assert_eq!(code.version(), 1);
        assert_eq!(code.ec(), ErrorCorrectionLevel::M);
        assert_eq!(code.size(), 21);
    }

    #[test]
    fn ec_is_boosted_when_capacity_allows() {
        // Empty payload fits every level, so L is boosted all the way to H
        let code = encode_text("", ErrorCorrectionLevel::L).unwrap();
        assert_eq!(code.version(), 1);
        assert_eq!(code.ec(), ErrorCorrectionLevel::H);
    }

    #[test]
    fn ec_boost_never_demotes() {
        let code = encode_text("HELLO WORLD", ErrorCorrectionLevel::Q).unwrap();
        assert_eq!(code.version(), 1);
        assert_eq!(code.ec(), ErrorCorrectionLevel::Q, "74 bits do not fit the 72 bits of 1-H");
    }

    #[test]
    fn fixed_mask_is_respected() {
        for m in 0..8u8 {
            let segs = Segment::make_segments("MASKS").unwrap();
            let code =
                encode_segments_advanced(&segs, ErrorCorrectionLevel::L, 1, 40, Some(m), true).unwrap();
            assert_eq!(code.mask(), m);
        }
    }

    #[test]
    fn automatic_mask_is_in_range() {
        let code = encode_text("AUTOMATIC MASK", ErrorCorrectionLevel::L).unwrap();
        assert!(code.mask() <= 7);
    }

    #[test]
    fn eci_plus_bytes_round_trip() {
        let segs = vec![
            Segment::make_eci(123_456).unwrap(),
            Segment::make_bytes("\u{30c7}\u{30fc}\u{30bf}".as_bytes()).unwrap(),
        ];
        let code = encode_segments(&segs, ErrorCorrectionLevel::H).unwrap();
        assert_eq!(code.version(), 2, "28 + 84 bits need the 128 data bits of 2-H");
        assert_eq!(code.ec(), ErrorCorrectionLevel::H);
    }

    #[test]
    fn boost_and_fixed_mask_on_a_pinned_version_range() {
        // 80 bytes use 652 bits: too big for 4-L (640), fits 5-L (864) and 5-M (688)
        let payload = vec![0x5Au8; 80];
        let segs = vec![Segment::make_bytes(&payload).unwrap()];
        let code = encode_segments_advanced(&segs, ErrorCorrectionLevel::L, 1, 5, Some(3), true).unwrap();
        assert_eq!(code.version(), 5);
        assert_eq!(code.mask(), 3);
        assert_eq!(code.ec(), ErrorCorrectionLevel::M);
    }

    #[test]
    fn data_too_long_reports_the_deficit() {
        // 1274 bytes use 10212 bits; version 40 at H offers 10208
        let payload = vec![0u8; 1274];
        let segs = vec![Segment::make_bytes(&payload).unwrap()];
        let err = encode_segments(&segs, ErrorCorrectionLevel::H).unwrap_err();
        assert_eq!(err, QrError::DataTooLong { data_bits: 10_212, capacity_bits: 10_208 });
        // One byte less fits
        let segs = vec![Segment::make_bytes(&payload[1..]).unwrap()];
        assert!(encode_segments(&segs, ErrorCorrectionLevel::H).is_ok());
    }

    #[test]
    fn one_bit_over_capacity_is_too_long() {
        // Version 40 at H offers 10208 data bits; a byte segment header at
        // version 40 takes 20 bits, so 10189 payload bits miss by exactly one
        let mut bits = BitStream::new();
        for _ in 0..10_189 {
            bits.push_bit(false).unwrap();
        }
        let seg = Segment::new(Mode::EightBit, 100, bits);
        let err = encode_segments(&[seg], ErrorCorrectionLevel::H).unwrap_err();
        assert_eq!(err, QrError::DataTooLong { data_bits: 10_209, capacity_bits: 10_208 });
    }

    #[test]
    fn binary_capacity_limit_is_2953_bytes() {
        let payload = vec![0xA5u8; 2953];
        let code = encode_binary(&payload, ErrorCorrectionLevel::L).unwrap();
        assert_eq!(code.version(), 40);
        assert_eq!(code.ec(), ErrorCorrectionLevel::L);
        let payload = vec![0xA5u8; 2954];
        assert!(encode_binary(&payload, ErrorCorrectionLevel::L).is_err());
    }

    #[test]
    fn get_module_is_false_outside_the_symbol() {
        let code = encode_text("OUT OF RANGE", ErrorCorrectionLevel::L).unwrap();
        let n = code.size() as i32;
        assert!(!code.get_module(-1, 0));
        assert!(!code.get_module(0, -1));
        assert!(!code.get_module(n, 0));
        assert!(!code.get_module(0, n));
    }

    #[test]
    fn low_level_constructor_checks_codeword_count() {
        let err = QrCode::new(1, ErrorCorrectionLevel::L, &[0u8; 18], None).unwrap_err();
        assert_eq!(err, QrError::InvalidArgument("wrong number of data codewords for this version and level"));
        assert!(QrCode::new(1, ErrorCorrectionLevel::L, &[0u8; 19], None).is_ok());
        let err = QrCode::new(1, ErrorCorrectionLevel::L, &[0u8; 19], Some(8)).unwrap_err();
        assert_eq!(err, QrError::InvalidArgument("mask must be between 0 and 7"));
    }

    #[test]
    fn version_range_is_validated() {
        let segs = Segment::make_segments("42").unwrap();
        assert!(encode_segments_advanced(&segs, ErrorCorrectionLevel::L, 0, 40, None, true).is_err());
        assert!(encode_segments_advanced(&segs, ErrorCorrectionLevel::L, 5, 4, None, true).is_err());
        assert!(encode_segments_advanced(&segs, ErrorCorrectionLevel::L, 1, 41, None, true).is_err());
    }

    #[test]
    fn mode_indicators_reach_the_bit_stream() {
        // The first 4 bits of a single-segment symbol are the mode indicator;
        // check indirectly through the chosen segment modes
        assert_eq!(Segment::make_segments("0123").unwrap()[0].mode() as u8, 0x1);
        assert_eq!(Segment::make_segments("ABC").unwrap()[0].mode() as u8, 0x2);
        assert_eq!(Segment::make_segments("abc").unwrap()[0].mode() as u8, 0x4);
        assert_eq!(Segment::make_eci(4).unwrap().mode() as u8, 0x7);
        assert_eq!(Mode::Kanji as u8, 0x8);
    }
}
