use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

use rand::{thread_rng, Rng};
use zero85::{FromZ85, ToZ85};

use crate::error::SeedError;

const CODE_LENGTH: usize = 10;
const FRAME_LENGTH: usize = 5;
const Z85_ALPHABET: &[u8] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ.-:+=^!/*?&<>()[]{}@%$#";

/// Checks every character is Z85 and every frame fits in four bytes.
///
/// The decoder does neither, and overflows on frames above `u32::MAX`.
fn check_frames(code: &str) -> bool {
    code.as_bytes().chunks(FRAME_LENGTH).all(|frame| {
        frame.iter().try_fold(0u64, |value, &c| {
            Z85_ALPHABET.iter().position(|&z| z == c).map(|digit| value * 85 + digit as u64)
        }).map_or(false, |value| value <= u64::from(u32::max_value()))
    })
}

/// Shuffle seed for a deal. Shown to the player as a 10 character Z85 code so a deal can
/// be replayed with `--seed`.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
#[derive(Debug)]
pub struct Seed(u64);

impl Seed {
    pub fn new(value: u64) -> Seed {
        Seed(value)
    }

    pub fn random() -> Seed {
        Seed(thread_rng().gen())
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn code(self) -> String {
        // Eight bytes is always a whole number of Z85 frames.
        self.0.to_be_bytes()[..].to_z85().unwrap_or_default()
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.code())
    }
}

impl FromStr for Seed {
    type Err = SeedError;

    fn from_str(code: &str) -> Result<Seed, SeedError> {
        let code = code.trim();
        if code.len() != CODE_LENGTH {
            return Err(SeedError::Length(code.len()));
        }
        if !check_frames(code) {
            return Err(SeedError::Encoding(code.to_string()));
        }
        let bytes = code.from_z85().map_err(|_| SeedError::Encoding(code.to_string()))?;
        let bytes = <[u8; 8]>::try_from(bytes.as_slice())
            .map_err(|_| SeedError::Encoding(code.to_string()))?;
        Ok(Seed(u64::from_be_bytes(bytes)))
    }
}
