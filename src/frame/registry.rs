use std::collections::HashMap;

use crate::frame::{FrameStyle, PixelArtFrame, ReferenceFrame};

/// Registry of available frame styles
///
/// Styles are registered by name with a factory, so each lookup hands out a
/// fresh instance.
pub struct FrameStyleRegistry {
    styles: HashMap<String, Box<dyn Fn() -> Box<dyn FrameStyle>>>,
}

impl FrameStyleRegistry {
    /// Create a new registry with all built-in styles
    pub fn new() -> Self {
        let mut registry = Self {
            styles: HashMap::new(),
        };
        registry.register_builtin_styles();
        registry
    }

    fn register_builtin_styles(&mut self) {
        self.styles.insert(
            "reference".to_string(),
            Box::new(|| Box::new(ReferenceFrame::new())),
        );

        self.styles.insert(
            "pixel-art".to_string(),
            Box::new(|| Box::new(PixelArtFrame::new())),
        );
    }

    /// Register a custom style
    pub fn register<F>(&mut self, name: String, factory: F)
    where
        F: Fn() -> Box<dyn FrameStyle> + 'static,
    {
        self.styles.insert(name, Box::new(factory));
    }

    /// Get a new instance of a style, or None if it is not registered
    pub fn get_style(&self, name: &str) -> Option<Box<dyn FrameStyle>> {
        self.styles.get(name).map(|factory| factory())
    }

    /// All registered style names, sorted
    pub fn available_styles(&self) -> Vec<String> {
        let mut names: Vec<String> = self.styles.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for FrameStyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_styles_available() {
        let registry = FrameStyleRegistry::new();

        assert!(registry.has_style("reference"));
        assert!(registry.has_style("pixel-art"));
        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
        assert_eq!(registry.available_styles(), vec!["pixel-art", "reference"]);
    }

    #[test]
    fn test_get_style() {
        let registry = FrameStyleRegistry::new();

        let style = registry.get_style("pixel-art");
        assert_eq!(style.map(|s| s.name().to_string()), Some("pixel-art".to_string()));
        assert!(registry.get_style("neon").is_none());
    }

    #[test]
    fn test_custom_style_registration() {
        let mut registry = FrameStyleRegistry::new();
        registry.register("keep".to_string(), || Box::new(ReferenceFrame::new()));

        assert!(registry.has_style("keep"));
        assert_eq!(registry.len(), 3);
    }
}
