//! Widget registry.

use std::collections::HashMap;

use crate::counter::CounterWidget;
use crate::traits::Widget;

/// Registry of available widgets, keyed by manifest name.
pub struct WidgetRegistry {
    widgets: HashMap<&'static str, Box<dyn Widget>>,
}

impl WidgetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            widgets: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in widgets.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CounterWidget::new()));
        registry
    }

    /// Register a widget under its own name.
    pub fn register(&mut self, widget: Box<dyn Widget>) {
        self.widgets.insert(widget.name(), widget);
    }

    /// Look up a widget by name.
    pub fn get(&self, name: &str) -> Option<&dyn Widget> {
        self.widgets.get(name).map(|w| w.as_ref())
    }

    /// Whether a widget with the given name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.widgets.contains_key(name)
    }

    /// Names of all registered widgets, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.widgets.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_include_counter() {
        let registry = WidgetRegistry::with_builtins();

        assert!(registry.contains("counter"));
        assert_eq!(registry.names(), vec!["counter"]);
    }

    #[test]
    fn lookup_returns_widget() {
        let registry = WidgetRegistry::with_builtins();

        let widget = registry.get("counter").unwrap();

        assert_eq!(widget.name(), "counter");
        assert!(widget.initial_html().contains("counter-value"));
    }

    #[test]
    fn unknown_widget_is_absent() {
        let registry = WidgetRegistry::with_builtins();

        assert!(registry.get("carousel").is_none());
    }
}
