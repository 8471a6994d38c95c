use crate::error::GeneratorError;
use crate::Generator;
use snip_core::ShortCode;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A generator that replays a fixed sequence of codes.
///
/// Codes are handed out in order and the sequence wraps around once it is
/// exhausted. Useful for deterministic collision scenarios, where the first
/// few candidates are known to be taken already.
#[derive(Debug)]
pub struct SequenceGenerator {
    codes: Vec<ShortCode>,
    cursor: AtomicUsize,
}

impl SequenceGenerator {
    pub fn new<I, S>(codes: I) -> Result<Self, GeneratorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let codes = codes
            .into_iter()
            .map(|code| {
                ShortCode::new(code.as_ref())
                    .map_err(|_| GeneratorError::InvalidCode(code.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if codes.is_empty() {
            return Err(GeneratorError::EmptySequence);
        }

        Ok(Self {
            codes,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Number of codes handed out so far.
    pub fn issued(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl Generator for SequenceGenerator {
    fn generate(&self) -> ShortCode {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.codes[index % self.codes.len()].clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replays_codes_in_order() {
        let generator = SequenceGenerator::new(["aaa111", "bbb222", "ccc333"]).unwrap();

        assert_eq!(generator.generate().as_str(), "aaa111");
        assert_eq!(generator.generate().as_str(), "bbb222");
        assert_eq!(generator.generate().as_str(), "ccc333");
        assert_eq!(generator.issued(), 3);
    }

    #[test]
    fn wraps_around() {
        let generator = SequenceGenerator::new(["aaa111", "bbb222"]).unwrap();
        generator.generate();
        generator.generate();

        assert_eq!(generator.generate().as_str(), "aaa111");
    }

    #[test]
    fn rejects_empty_sequence() {
        let err = SequenceGenerator::new(Vec::<String>::new()).unwrap_err();
        assert_eq!(err, GeneratorError::EmptySequence);
    }

    #[test]
    fn rejects_invalid_codes() {
        let err = SequenceGenerator::new(["ok1", "not/ok"]).unwrap_err();
        assert_eq!(err, GeneratorError::InvalidCode("not/ok".to_string()));
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SequenceGenerator>();
    }
}
