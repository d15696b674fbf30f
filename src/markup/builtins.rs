//! Built-in vocabulary of the markup template language.

use std::collections::HashMap;
use std::sync::LazyLock;

/// A documented built-in name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinDef {
    pub name: &'static str,
    pub description: &'static str,
}

const fn def(name: &'static str, description: &'static str) -> BuiltinDef {
    BuiltinDef { name, description }
}

fn index(defs: &[BuiltinDef]) -> HashMap<&'static str, BuiltinDef> {
    defs.iter().map(|d| (d.name, *d)).collect()
}

/// Events accepted after `@`.
pub static EVENTS: LazyLock<HashMap<&'static str, BuiltinDef>> = LazyLock::new(|| {
    index(&[
        // ==================== Mouse ====================
        def("click", "Fired when a pointing device button is pressed and released on an element."),
        def("dblclick", "Fired when a pointing device button is clicked twice on an element."),
        def("mousedown", "Fired when a pointing device button is pressed on an element."),
        def("mouseup", "Fired when a pointing device button is released over an element."),
        def("mouseenter", "Fired when a pointing device is moved onto the element. Does not bubble."),
        def("mouseleave", "Fired when a pointing device is moved off the element. Does not bubble."),
        def("mousemove", "Fired when a pointing device is moved while over an element."),
        def("contextmenu", "Fired when the user attempts to open a context menu."),
        def("wheel", "Fired when the user rotates a wheel button on a pointing device."),
        // ==================== Keyboard ====================
        def("keydown", "Fired when a key is pressed."),
        def("keyup", "Fired when a key is released."),
        // ==================== Form ====================
        def("input", "Fired when the value of an input, select or textarea changes."),
        def("change", "Fired when the user commits a change to an element's value."),
        def("submit", "Fired when a form is submitted."),
        def("reset", "Fired when a form is reset."),
        def("focus", "Fired when an element receives focus. Does not bubble."),
        def("blur", "Fired when an element loses focus. Does not bubble."),
        // ==================== Drag & touch ====================
        def("drag", "Fired every few hundred milliseconds while an element is being dragged."),
        def("dragstart", "Fired when the user starts dragging an element."),
        def("dragend", "Fired when a drag operation ends."),
        def("drop", "Fired when an element is dropped on a valid drop target."),
        def("touchstart", "Fired when one or more touch points are placed on the surface."),
        def("touchend", "Fired when one or more touch points are removed from the surface."),
        def("touchmove", "Fired when one or more touch points are moved along the surface."),
        // ==================== Other ====================
        def("scroll", "Fired when the element has been scrolled."),
        def("load", "Fired when a resource and its dependent resources have finished loading."),
        def("error", "Fired when a resource failed to load."),
    ])
});

/// Modifiers accepted after `@event.`.
pub static MODIFIERS: LazyLock<HashMap<&'static str, BuiltinDef>> = LazyLock::new(|| {
    index(&[
        def("stop", "Calls `event.stopPropagation()` before the handler runs."),
        def("prevent", "Calls `event.preventDefault()` before the handler runs."),
        def("self", "Only runs the handler if the event target is the element itself."),
        def("once", "Removes the listener after its first invocation."),
        def("capture", "Adds the listener in capture mode."),
        def("passive", "Adds the listener with `{ passive: true }`."),
        def("enter", "Only runs the handler for the Enter key."),
        def("esc", "Only runs the handler for the Escape key."),
        def("tab", "Only runs the handler for the Tab key."),
        def("space", "Only runs the handler for the Space key."),
    ])
});

/// Plain HTML elements known to completion and quick info.
pub static ELEMENTS: LazyLock<HashMap<&'static str, BuiltinDef>> = LazyLock::new(|| {
    index(&[
        def("a", "Hyperlink to another page, file or location."),
        def("article", "Self-contained composition intended to be independently distributable."),
        def("br", "Line break. Void element."),
        def("button", "Clickable button."),
        def("div", "Generic flow content container."),
        def("footer", "Footer for its nearest sectioning content."),
        def("form", "Section containing interactive controls for submitting information."),
        def("h1", "Top-level section heading."),
        def("h2", "Second-level section heading."),
        def("header", "Introductory content for its nearest sectioning content."),
        def("hr", "Thematic break between paragraphs. Void element."),
        def("img", "Embedded image. Void element."),
        def("input", "Interactive form control. Void element."),
        def("label", "Caption for a form control."),
        def("li", "Item in a list."),
        def("main", "Dominant content of the document body."),
        def("nav", "Section with navigation links."),
        def("ol", "Ordered list."),
        def("option", "Item in a select or datalist."),
        def("p", "Paragraph."),
        def("section", "Generic standalone section."),
        def("select", "Control offering a menu of options."),
        def("slot", "Placeholder filled with a component's children."),
        def("span", "Generic inline container."),
        def("table", "Tabular data."),
        def("td", "Table data cell."),
        def("textarea", "Multi-line plain-text editing control."),
        def("tr", "Table row."),
        def("ul", "Unordered list."),
    ])
});

/// Elements that never have a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Attributes offered inside any tag.
pub static ATTRIBUTES: LazyLock<HashMap<&'static str, BuiltinDef>> = LazyLock::new(|| {
    index(&[
        def("class", "Space-separated list of CSS classes."),
        def("disabled", "Disables a form control."),
        def("hidden", "Hides the element."),
        def("href", "URL a link points to."),
        def("id", "Unique identifier of the element."),
        def("name", "Name of a form control."),
        def("placeholder", "Hint shown in an empty input."),
        def("src", "URL of embedded content."),
        def("style", "Inline CSS declarations."),
        def("title", "Advisory information shown as a tooltip."),
        def("type", "Type of a button or input."),
        def("value", "Current value of a form control."),
    ])
});

/// CSS properties offered inside `style="..."`.
pub static STYLE_PROPERTIES: LazyLock<HashMap<&'static str, BuiltinDef>> = LazyLock::new(|| {
    index(&[
        def("align-items", "Alignment of flex or grid items on the cross axis."),
        def("background", "Shorthand for all background properties."),
        def("background-color", "Background color of the element."),
        def("border", "Shorthand for border width, style and color."),
        def("border-radius", "Rounds the corners of the border edge."),
        def("color", "Foreground color of text content."),
        def("display", "Display type of the element."),
        def("flex", "Shorthand for flex-grow, flex-shrink and flex-basis."),
        def("font-size", "Size of the font."),
        def("font-weight", "Weight of the font."),
        def("gap", "Gaps between rows and columns."),
        def("height", "Height of the element."),
        def("justify-content", "Distribution of space along the main axis."),
        def("margin", "Shorthand for the margin on all four sides."),
        def("opacity", "Opacity of the element."),
        def("padding", "Shorthand for the padding on all four sides."),
        def("position", "Positioning method of the element."),
        def("width", "Width of the element."),
    ])
});

/// Names usable inside expressions without a declaration.
pub const EXPRESSION_KEYWORDS: &[&str] = &[
    "true", "false", "null", "undefined", "this", "typeof", "instanceof", "in", "new", "void",
    "$event",
];

pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name.to_ascii_lowercase().as_str())
}

/// Names of a dataset in alphabetical order.
pub fn sorted_names(dataset: &HashMap<&'static str, BuiltinDef>) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = dataset.keys().copied().collect();
    names.sort_unstable();
    names
}

/// The closest known event to a misspelled one, if within two edits.
pub fn closest_event(name: &str) -> Option<&'static str> {
    sorted_names(&EVENTS)
        .into_iter()
        .map(|candidate| (edit_distance(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= 2)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datasets_have_docs() {
        for dataset in [&*EVENTS, &*MODIFIERS, &*ELEMENTS, &*ATTRIBUTES, &*STYLE_PROPERTIES] {
            assert!(!dataset.is_empty());
            for def in dataset.values() {
                assert!(!def.description.is_empty(), "{} has no docs", def.name);
            }
        }
    }

    #[test]
    fn void_elements_ignore_case() {
        assert!(is_void_element("br"));
        assert!(is_void_element("IMG"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("click", "click"), 0);
        assert_eq!(edit_distance("clik", "click"), 1);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
    }

    #[test]
    fn closest_event_within_two_edits() {
        assert_eq!(closest_event("clik"), Some("click"));
        assert_eq!(closest_event("submt"), Some("submit"));
        assert_eq!(closest_event("frobnicate"), None);
    }
}
