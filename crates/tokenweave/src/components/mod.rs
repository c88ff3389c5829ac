//! Built-in component styles.

pub mod calendar;

pub use calendar::{
    build_calendar_styles, calendar_component, calendar_defaults, calendar_derivations,
    calendar_schema, date_content_height, CALENDAR,
};

use crate::registry::{ComponentStyle, StyleAccessor, StyleRegistry};

/// Every built-in component, freshly constructed.
pub fn builtin() -> Vec<ComponentStyle> {
    vec![calendar_component()]
}

/// Registers every built-in component with `registry`.
pub fn register_builtin(registry: &StyleRegistry) {
    for component in builtin() {
        registry.register(component);
    }
}

/// Registers the calendar with the process-wide registry.
pub fn register_calendar() -> StyleAccessor<'static> {
    StyleRegistry::global().register(calendar_component())
}

/// Class prefix a built-in component is styled under by default.
pub fn default_prefix(component: &str) -> Option<&'static str> {
    match component {
        CALENDAR => Some(calendar::DEFAULT_PREFIX),
        _ => None,
    }
}
