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
//! Error type shared by all fallible operations of the crate
//  ************************************************************

use std::error::Error;
use std::fmt;


//  ************************************************************
/// Why an encoding operation was aborted
///
/// All errors are final: nothing is retried or recovered internally.
//  ************************************************************

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QrError {
    /// An argument was outside its documented domain
    InvalidArgument(&'static str),
    /// A segment holds more characters than its count field can express
    SegmentTooLong,
    /// The payload does not fit the largest permitted version
    /// at the requested error correction level
    DataTooLong {
        /// Bits needed by the payload (at the largest permitted version)
        data_bits: usize,
        /// Bits available at that version and level
        capacity_bits: usize,
    },
    /// A bit stream would grow beyond 2^31 - 1 bits
    Overflow,
    /// A bit index outside `[0, length)` was read
    IndexOutOfRange {
        index: usize,
        length: usize,
    },
}


//  ************************************************************
/// Result alias used throughout the crate
//  ************************************************************

pub type QrResult<T> = Result<T, QrError>;


//  ************************************************************
impl fmt::Display for QrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QrError::InvalidArgument(what) => write!(f, "invalid argument: {}", what),
            QrError::SegmentTooLong => write!(f, "segment length does not fit its character count field"),
            QrError::DataTooLong { data_bits, capacity_bits } => {
                write!(f, "data length = {} bits, max capacity = {} bits", data_bits, capacity_bits)
            }
            QrError::Overflow => write!(f, "bit stream would exceed 2^31 - 1 bits"),
            QrError::IndexOutOfRange { index, length } => {
                write!(f, "bit index {} out of range for length {}", index, length)
            }
        }
    }
}


//  ************************************************************
impl Error for QrError {}
