//! Extension traits for `str` type conversions.
//!
//! JSON clients frequently send `""` for fields they mean to leave unset;
//! these helpers give such values empty-as-none semantics.

/// Extension trait for `str` to handle empty-as-none semantics.
pub trait StrExt {
    /// Returns the trimmed value if non-empty, `None` otherwise.
    #[must_use]
    fn to_opt(&self) -> Option<String>;
}

impl StrExt for str {
    #[inline]
    fn to_opt(&self) -> Option<String> {
        let trimmed = self.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Extension trait for `Option<String>` with the same semantics.
pub trait OptionStrExt {
    /// Trims the inner value and maps blank strings to `None`.
    ///
    /// # Example
    /// ```
    /// use burger_core::OptionStrExt;
    ///
    /// assert_eq!(Some("  Lyon ".to_string()).normalized(), Some("Lyon".to_string()));
    /// assert_eq!(Some("   ".to_string()).normalized(), None);
    /// assert_eq!(None::<String>.normalized(), None);
    /// ```
    #[must_use]
    fn normalized(self) -> Option<String>;
}

impl OptionStrExt for Option<String> {
    #[inline]
    fn normalized(self) -> Option<String> {
        self.as_deref().and_then(StrExt::to_opt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_become_none() {
        assert_eq!("".to_opt(), None);
        assert_eq!("  \t".to_opt(), None);
        assert_eq!(" bob ".to_opt(), Some("bob".to_string()));
    }
}
