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
//! Reed Solomon error correction over GF(2^8) with reducing polynomial 0x11D
//  ************************************************************

use std::ops::{Add, AddAssign, Mul};

use super::logging;


//  ************************************************************
/// Reed Solomon encoder
///
/// Precomputes the generator polynomial for a fixed number of
/// error correction bytes, then produces parity for message blocks.
//  ************************************************************

pub struct ReedSolomonEncoder {
    n_ec_bytes: usize,
    gen_poly: Vec<G>,
}

impl ReedSolomonEncoder {
    //  ************************************************************
    pub fn new(n_ec_bytes: usize) -> Self {
        let gen_poly = rs_generator(n_ec_bytes);
        ReedSolomonEncoder { n_ec_bytes, gen_poly }
    }

    //  ************************************************************
    /// Compute the `n_ec_bytes` parity bytes for `msg`
    //  ************************************************************
    pub fn encode(&self, msg: &[u8]) -> Vec<u8> {
        trace!("ReedSolomonEncoder::encode begin; n={} msg.len={}", self.n_ec_bytes, msg.len());
        let parity = rs_remainder(msg, &self.gen_poly);
        trace!("ReedSolomonEncoder::encode done; parity={:?}", parity);
        parity
    }
}


//  ************************************************************
/// Coefficients of the generator polynomial for `degree` parity bytes
///
/// The polynomial is the product of `(x - a^i)` for `i` in
/// `0..degree` with `a = 2`; coefficients are returned from the
/// second-highest power down, the leading 1 being implicit.
//  ************************************************************

pub fn rs_generator(degree: usize) -> Vec<G> {
    assert!(degree >= 1 && degree <= 255, "rs_generator: degree {} out of range", degree);
    trace!("rs_generator begin; degree={}", degree);

    // Start with the monomial x^0, then multiply by (x - a^i) one root at a time
    let mut coef = vec![G(0); degree - 1];
    coef.push(G(1));
    let mut root = G(1);
    for _ in 0..degree {
        for j in 0..degree {
            coef[j] = coef[j] * root;
            if j + 1 < degree {
                let next = coef[j + 1];
                coef[j] += next;
            }
        }
        root = root * G(2);
    }
    trace!("rs_generator done; coef={:?}", coef);
    coef
}


//  ************************************************************
/// Remainder of `data`, shifted up by `divisor.len()` zero bytes,
/// modulo the monic polynomial with low coefficients `divisor`
//  ************************************************************

pub fn rs_remainder(data: &[u8], divisor: &[G]) -> Vec<u8> {
    let mut rem = vec![0u8; divisor.len()];
    for b in data {
        // Polynomial division: one input byte slides in, one window byte slides out
        let factor = G(*b ^ rem.remove(0));
        rem.push(0);
        for (r, g) in rem.iter_mut().zip(divisor.iter()) {
            *r ^= (*g * factor).0;
        }
    }
    rem
}


//  ************************************************************
/// Multiply two field elements
//  ************************************************************

pub fn gf_multiply(x: u8, y: u8) -> u8 {
    (G(x) * G(y)).into()
}


//  ************************************************************
/// Element in Galois Field GF(2^8) mod 0x11D
//  ************************************************************

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct G(u8);

impl From<G> for u8 {
    fn from(g: G) -> u8 {
        g.0
    }
}

//  ************************************************************
impl From<G> for usize {
    fn from(g: G) -> usize {
        g.0 as usize
    }
}

//  ************************************************************
impl Mul for G {
    type Output = G;

    fn mul(self, other: G) -> G {
        // Russian peasant multiplication with modular reduction on every doubling
        let x = u32::from(self.0);
        let y = u32::from(other.0);
        let mut z: u32 = 0;
        let mut i = 8;
        while i > 0 {
            i -= 1;
            z = (z << 1) ^ ((z >> 7) * 0x11D);
            z ^= ((y >> i) & 1) * x;
        }
        debug_assert!(z >> 8 == 0);
        G(z as u8)
    }
}

//  ************************************************************
impl Add for G {
    type Output = G;
    fn add(self, other: G) -> G {
        G(self.0 ^ other.0)
    }
}

//  ************************************************************
impl AddAssign for G {
    fn add_assign(&mut self, other: G) {
        *self = *self + other;
    }
}
