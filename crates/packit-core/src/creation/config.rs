//! Options for archive building.

use crate::PackitError;
use crate::Result;

/// Tunables for one build.
///
/// # Examples
///
/// ```
/// use packit_core::creation::BuildOptions;
///
/// let options = BuildOptions::default().with_compression_level(9);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Compression level (1-9). `None` uses the format default.
    ///
    /// Default: `Some(6)`.
    pub compression_level: Option<u8>,

    /// Store unix permission bits with each entry.
    ///
    /// Default: `true`.
    pub preserve_permissions: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            compression_level: Some(6),
            preserve_permissions: true,
        }
    }
}

impl BuildOptions {
    /// Sets the compression level.
    ///
    /// Out-of-range levels are reported by [`BuildOptions::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = Some(level);
        self
    }

    /// Sets whether to preserve permissions.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCompressionLevel` if the level is outside 1-9.
    pub fn validate(&self) -> Result<()> {
        if let Some(level) = self.compression_level
            && !(1..=9).contains(&level)
        {
            return Err(PackitError::InvalidCompressionLevel { level });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_options_default() {
        let options = BuildOptions::default();
        assert_eq!(options.compression_level, Some(6));
        assert!(options.preserve_permissions);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_build_options_builder() {
        let options = BuildOptions::default()
            .with_compression_level(1)
            .with_preserve_permissions(false);
        assert_eq!(options.compression_level, Some(1));
        assert!(!options.preserve_permissions);
    }

    #[test]
    fn test_build_options_validate_invalid() {
        for level in [0, 10] {
            let options = BuildOptions::default().with_compression_level(level);
            assert!(matches!(
                options.validate(),
                Err(PackitError::InvalidCompressionLevel { level: l }) if l == level
            ));
        }

        let options = BuildOptions {
            compression_level: None,
            ..Default::default()
        };
        assert!(options.validate().is_ok());
    }
}
