use std::ops::AddAssign;

/// Token usage reported by the provider for one completion call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenUsage {
    /// The model used for this request
    pub model: String,
    /// Number of tokens in the input/prompt
    pub input_tokens: u64,
    /// Number of tokens in the output/completion
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

// Summing usage across tasks keeps the first model name seen
impl AddAssign<&TokenUsage> for TokenUsage {
    fn add_assign(&mut self, other: &TokenUsage) {
        if self.model.is_empty() {
            self.model = other.model.clone();
        }
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_tokens() {
        assert_eq!(TokenUsage::new("gemini-2.0-flash", 10, 5).total_tokens(), 15);
    }

    #[test]
    fn test_accumulate() {
        let mut total = TokenUsage::default();
        total += &TokenUsage::new("gemini-2.0-flash", 10, 5);
        total += &TokenUsage::new("gemini-2.0-flash", 1, 2);
        assert_eq!(total, TokenUsage::new("gemini-2.0-flash", 11, 7));
    }
}
