//! Cashier code generation policies.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use rand::Rng;

use smart_cart_core::CashierCode;

/// Produces the code handed to a customer for a cash intent.
pub trait CodeGenerator: Send + Sync + std::fmt::Debug {
    fn generate(&self) -> CashierCode;
}

/// Uniformly random numeric codes with a fixed number of digits.
///
/// The first digit is never zero, so the code survives clients that send it
/// back as a JSON number.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    digits: u32,
}

impl RandomCodeGenerator {
    /// Digits in a production cashier code.
    pub const DEFAULT_DIGITS: u32 = 6;

    /// Generator for `digits`-digit codes, clamped to 1..=18.
    #[must_use]
    pub fn new(digits: u32) -> Self {
        Self {
            digits: digits.clamp(1, 18),
        }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIGITS)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> CashierCode {
        let low = 10_u64.pow(self.digits - 1);
        let high = 10_u64.pow(self.digits);
        CashierCode::from_number(rand::rng().random_range(low..high))
    }
}

/// Hands out a fixed list of codes in order, repeating the last one.
///
/// For tests that need to know the code in advance.
#[derive(Debug)]
pub struct SequenceCodeGenerator {
    queue: Mutex<VecDeque<CashierCode>>,
    last: Mutex<CashierCode>,
}

impl SequenceCodeGenerator {
    /// # Panics
    ///
    /// Panics if `codes` is empty or any code is blank.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let queue: VecDeque<CashierCode> = codes
            .into_iter()
            .map(|c| CashierCode::parse(c.as_ref()).expect("blank code in sequence"))
            .collect();
        let last = queue.back().cloned().expect("empty code sequence");
        Self {
            queue: Mutex::new(queue),
            last: Mutex::new(last),
        }
    }
}

impl CodeGenerator for SequenceCodeGenerator {
    fn generate(&self) -> CashierCode {
        let next = self
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(code) = next {
            *last = code;
        }
        last.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_random_codes_have_requested_digits() {
        let generator = RandomCodeGenerator::default();
        for _ in 0..200 {
            let code = generator.generate();
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
            assert!(!code.as_str().starts_with('0'));
        }
    }

    #[test]
    fn test_sequence_repeats_last() {
        let generator = SequenceCodeGenerator::new(["482913", "100200"]);
        assert_eq!(generator.generate().as_str(), "482913");
        assert_eq!(generator.generate().as_str(), "100200");
        assert_eq!(generator.generate().as_str(), "100200");
    }
}
