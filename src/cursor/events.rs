// Pointer events and interactive-target matching.
// The selector set mirrors the host app's hoverable elements: links,
// buttons, form controls, labelled roles, and named UI classes.

const INTERACTIVE_TAGS: [&str; 6] = ["a", "button", "input", "textarea", "select", "label"];
const INTERACTIVE_ROLES: [&str; 1] = ["button"];
const INTERACTIVE_CLASSES: [&str; 3] = ["upload-zone", "feature-card", "btn"];

/// A single element as the overlay sees it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercase.
    pub tag: String,
    /// Explicit role attribute, if any.
    pub role: Option<String>,
    /// Class list.
    pub classes: Vec<String>,
}

impl Element {
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            role: None,
            classes: Vec::new(),
        }
    }

    pub fn with_role(mut self, role: &str) -> Self {
        self.role = Some(role.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    /// Whether this element alone matches the interactive selector set.
    pub fn is_interactive(&self) -> bool {
        if INTERACTIVE_TAGS.contains(&self.tag.as_str()) {
            return true;
        }
        if self
            .role
            .as_deref()
            .is_some_and(|role| INTERACTIVE_ROLES.contains(&role))
        {
            return true;
        }
        self.classes
            .iter()
            .any(|class| INTERACTIVE_CLASSES.contains(&class.as_str()))
    }
}

/// The element under the pointer plus its ancestor chain, innermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub path: Vec<Element>,
}

impl Target {
    pub fn of(element: Element) -> Self {
        Self {
            path: vec![element],
        }
    }

    pub fn nested(path: Vec<Element>) -> Self {
        Self { path }
    }

    /// closest()-style check: the element itself or any ancestor matches.
    pub fn is_interactive(&self) -> bool {
        self.path.iter().any(Element::is_interactive)
    }
}

/// Typed pointer input consumed by the overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    /// Pointer moved to viewport coordinates. Applied unsmoothed.
    Moved { x: f32, y: f32 },
    /// Pointer entered a target.
    Over { target: Target },
    /// Pointer left a target.
    Out { target: Target },
    /// Primary button pressed.
    Down,
    /// Primary button released.
    Up,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_tags_and_roles() {
        assert!(Element::tag("a").is_interactive());
        assert!(Element::tag("BUTTON").is_interactive());
        assert!(Element::tag("select").is_interactive());
        assert!(Element::tag("div").with_role("button").is_interactive());
        assert!(!Element::tag("div").with_role("banner").is_interactive());
        assert!(!Element::tag("p").is_interactive());
    }

    #[test]
    fn test_interactive_classes() {
        assert!(Element::tag("div").with_class("upload-zone").is_interactive());
        assert!(Element::tag("span").with_class("btn").is_interactive());
        assert!(!Element::tag("span").with_class("hint").is_interactive());
    }

    #[test]
    fn test_closest_matches_through_ancestors() {
        // A span nested inside a button counts as interactive.
        let nested = Target::nested(vec![
            Element::tag("span"),
            Element::tag("button"),
            Element::tag("body"),
        ]);
        assert!(nested.is_interactive());

        let plain = Target::nested(vec![Element::tag("span"), Element::tag("body")]);
        assert!(!plain.is_interactive());
    }
}
