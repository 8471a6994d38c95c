use crate::error::GeneratorError;
use crate::Generator;
use snip_core::ShortCode;
use std::iter;

/// The 62-character alphabet codes are drawn from.
pub const ALPHABET: &[u8; 62] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const DEFAULT_LENGTH: usize = 6;
pub const MAX_LENGTH: usize = 32;

/// Generates fixed-length codes with every character drawn uniformly and
/// independently from [`ALPHABET`].
///
/// With the default length there are 62^6 (about 5.7e10) possible codes, so
/// collisions are rare but not impossible.
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    length: usize,
}

impl RandomGenerator {
    pub fn new(length: usize) -> Result<Self, GeneratorError> {
        if length == 0 || length > MAX_LENGTH {
            return Err(GeneratorError::InvalidLength {
                got: length,
                max: MAX_LENGTH,
            });
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
        }
    }
}

impl Generator for RandomGenerator {
    fn generate(&self) -> ShortCode {
        let code: String =
            iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
                .take(self.length)
                .collect();
        ShortCode::new_unchecked(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn alphabet_is_62_unique_alphanumerics() {
        let unique: HashSet<_> = ALPHABET.iter().collect();
        assert_eq!(unique.len(), 62);
        assert!(ALPHABET.iter().all(u8::is_ascii_alphanumeric));
    }

    #[test]
    fn default_generates_six_alphanumeric_chars() {
        let generator = RandomGenerator::default();
        for _ in 0..1_000 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)));
            assert!(ShortCode::new(code.as_str()).is_ok());
        }
    }

    #[test]
    fn custom_length() {
        let generator = RandomGenerator::new(10).unwrap();
        assert_eq!(generator.generate().as_str().len(), 10);
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert_eq!(
            RandomGenerator::new(0).unwrap_err(),
            GeneratorError::InvalidLength { got: 0, max: 32 }
        );
        assert!(RandomGenerator::new(33).is_err());
        assert!(RandomGenerator::new(32).is_ok());
    }

    #[test]
    fn consecutive_codes_differ() {
        let generator = RandomGenerator::default();
        let codes: HashSet<_> = (0..100).map(|_| generator.generate()).collect();
        // 100 draws from 62^6 colliding is vanishingly unlikely.
        assert_eq!(codes.len(), 100);
    }

    #[test]
    fn covers_the_whole_alphabet() {
        let generator = RandomGenerator::new(32).unwrap();
        let seen: HashSet<u8> = (0..200)
            .flat_map(|_| generator.generate().as_str().bytes().collect::<Vec<_>>())
            .collect();
        assert_eq!(seen.len(), ALPHABET.len());
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RandomGenerator>();
    }
}
