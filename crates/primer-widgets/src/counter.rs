//! The counter widget.
//!
//! A single integer state cell with two transitions: increment by one and
//! decrement by one. The value is unbounded within the native integer range;
//! there is no clamping and neither operation can fail.

use crate::traits::Widget;

/// The counter's state cell.
///
/// Created at mount time with a value of zero and discarded on unmount. The
/// displayed text always equals the stored integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Counter {
    value: i64,
}

impl Counter {
    /// Create a counter with the initial value of 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Increase the value by exactly 1.
    pub fn increment(&mut self) {
        self.value += 1;
    }

    /// Decrease the value by exactly 1.
    pub fn decrement(&mut self) {
        self.value -= 1;
    }

    /// Render the counter as HTML.
    ///
    /// The container holds three children in order: the decrement control, the
    /// text display of the current value, and the increment control.
    pub fn render(&self) -> String {
        format!(
            r#"<div class="counter"><button class="counter-decrement">-</button><span class="counter-value">{}</span><button class="counter-increment">+</button></div>"#,
            self.value
        )
    }
}

/// The counter as a mountable demo widget.
#[derive(Debug, Default)]
pub struct CounterWidget;

impl CounterWidget {
    pub fn new() -> Self {
        Self
    }
}

impl Widget for CounterWidget {
    fn name(&self) -> &'static str {
        "counter"
    }

    fn initial_html(&self) -> String {
        Counter::new().render()
    }

    fn script(&self, mount_id: &str) -> String {
        // The script mirrors the transitions of `Counter`: the displayed text
        // is re-rendered from the stored integer on every change.
        format!(
            r#"
(function() {{
  'use strict';

  const root = document.querySelector('#{mount_id}');
  if (root === null) {{
    console.error("Failed to start counter: couldn't find the #{mount_id} element");
    return;
  }}

  const display = root.querySelector('.counter-value');
  const decrement = root.querySelector('.counter-decrement');
  const increment = root.querySelector('.counter-increment');

  let value = {initial};

  function render() {{
    display.textContent = String(value);
  }}

  decrement.addEventListener('click', function() {{
    value = value - 1;
    render();
  }});

  increment.addEventListener('click', function() {{
    value = value + 1;
    render();
  }});

  render();
}})();
"#,
            mount_id = mount_id,
            initial = Counter::new().value(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn starts_at_zero() {
        let counter = Counter::new();

        assert_eq!(counter.value(), 0);
        assert!(counter.render().contains(r#"<span class="counter-value">0</span>"#));
    }

    #[test]
    fn increment_adds_one() {
        let mut counter = Counter::new();

        counter.increment();
        assert_eq!(counter.value(), 1);

        counter.increment();
        assert_eq!(counter.value(), 2);
    }

    #[test]
    fn decrement_subtracts_one() {
        let mut counter = Counter::new();
        counter.increment();
        counter.increment();

        counter.decrement();

        assert_eq!(counter.value(), 1);
    }

    #[test]
    fn three_up_one_down_displays_two() {
        let mut counter = Counter::new();

        counter.increment();
        counter.increment();
        counter.increment();
        counter.decrement();

        assert_eq!(counter.value(), 2);
        assert!(counter.render().contains(">2</span>"));
    }

    #[test]
    fn decrement_below_zero_is_not_clamped() {
        let mut counter = Counter::new();

        counter.decrement();

        assert_eq!(counter.value(), -1);
        assert!(counter.render().contains(">-1</span>"));
    }

    #[test]
    fn renders_controls_in_order() {
        let html = Counter::new().render();

        let decrement = html.find("counter-decrement").unwrap();
        let display = html.find("counter-value").unwrap();
        let increment = html.find("counter-increment").unwrap();

        assert!(decrement < display);
        assert!(display < increment);
    }

    #[test]
    fn widget_markup_matches_fresh_counter() {
        let widget = CounterWidget::new();

        assert_eq!(widget.initial_html(), Counter::new().render());
    }

    #[test]
    fn script_targets_mount_and_starts_at_zero() {
        let script = CounterWidget::new().script("root");

        assert!(script.contains("document.querySelector('#root')"));
        assert!(script.contains("let value = 0;"));
        assert!(script.contains("value - 1"));
        assert!(script.contains("value + 1"));
        assert!(script.contains("couldn't find the #root element"));
    }
}
