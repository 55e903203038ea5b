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
//! Pseudo random number generator
//  ************************************************************

use super::segment;
use super::Mode;

//  ************************************************************
/// Very simple XORSHIFT pseudo random number generator
///
/// # References
///
/// - <https://en.wikipedia.org/wiki/Xorshift>
/// - <http://www.jstatsoft.org/v08/i14/paper>
///
/// The `Rng` is only used for generating testdata
//  ************************************************************

pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        Rng { state: seed }
    }
    pub fn get_u32(&mut self) -> u32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state - 1
    }
    pub fn get_u8(&mut self) -> u8 {
        self.get_u32() as u8
    }
    pub fn get_u8_vec(&mut self, len: usize) -> Vec<u8> {
        let mut v = Vec::with_capacity(len);
        for _ in 0..len {
            v.push(self.get_u8());
        }
        v
    }
    pub fn get_usize_clamped(&mut self, min: usize, max: usize) -> usize {
        if min == max {
            min
        } else {
            min + (self.get_u32() as usize) % (max - min)
        }
    }
    /// A random character (or byte) acceptable to the given encoding mode
    pub fn get_u8_with_mode(&mut self, mode: Mode) -> u8 {
        let u = self.get_u8();
        match mode {
            Mode::Numeric => 0x30 + u % 10,
            Mode::AlphaNumeric => segment::alnum_to_ascii(u % 45),
            Mode::EightBit | Mode::Kanji | Mode::Eci => u,
        }
    }
}
