//! Card template: document tree model and builder
//!
//! The layout engine consumes an abstract styled tree rather than markup, so
//! the template is composed here as plain data. `sanitize` mirrors what
//! layout engines expect of their input: no empty or whitespace-only text
//! nodes anywhere in the tree.

use crate::content::PostCard;
use crate::fit;

/// Bump whenever the card design changes incompatibly with old artifacts.
/// The value participates in every fingerprint, so a bump re-renders
/// everything on the next run.
pub const TEMPLATE_VERSION: &str = "v3";

/// A node of the styled document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// A styled container
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub style: Style,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element with the given tag and no children
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            style: Style::default(),
            children: Vec::new(),
        }
    }
}

/// Flex child distribution along the main axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justify {
    Start,
    SpaceBetween,
}

/// Flex child alignment on the cross axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
}

/// Main axis of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Column,
    Row,
}

/// Background paint
#[derive(Debug, Clone, PartialEq)]
pub enum Background {
    Solid(String),
    /// Two-stop gradient; the angle is in CSS degrees (0 points up)
    LinearGradient { angle: f32, from: String, to: String },
}

/// The style subset the card design uses, typed instead of CSS strings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub max_width: Option<f32>,
    /// (vertical, horizontal)
    pub padding: Option<(f32, f32)>,
    pub direction: Option<Direction>,
    pub justify: Option<Justify>,
    pub align: Option<Align>,
    pub gap: Option<f32>,
    pub background: Option<Background>,
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub font_weight: Option<u16>,
    pub line_height: Option<f32>,
    pub letter_spacing: Option<f32>,
    pub border_radius: Option<f32>,
    pub uppercase: bool,
}

/// Drop empty and whitespace-only text nodes from a tree
///
/// Kept text is trimmed. Containers are kept even when all their children
/// are dropped (the accent bar has none to begin with). Pure and total over
/// arbitrary trees.
pub fn sanitize(node: Node) -> Option<Node> {
    match node {
        Node::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(Node::Text(trimmed.to_string()))
            }
        }
        Node::Element(mut element) => {
            element.children = element
                .children
                .drain(..)
                .filter_map(sanitize)
                .collect();
            Some(Node::Element(element))
        }
    }
}

/// Builds the card document tree for a post
///
/// All knobs are explicit values so tests can vary them independently of
/// the process-wide defaults.
#[derive(Debug, Clone)]
pub struct CardTemplate {
    pub version: String,
    pub width: f32,
    pub height: f32,
    pub brand: String,
}

impl CardTemplate {
    /// Create a template with the given canvas size and brand wordmark
    pub fn new(width: u32, height: u32, brand: &str) -> Self {
        Self {
            version: TEMPLATE_VERSION.to_string(),
            width: width as f32,
            height: height as f32,
            brand: brand.to_string(),
        }
    }

    /// Compose the sanitized document tree for one post
    pub fn build(&self, post: &PostCard) -> Node {
        let title = fit::fit_title(&post.title);
        let excerpt = fit::fit_excerpt(&post.excerpt);

        let title_node = Node::Element(Element {
            tag: "div".to_string(),
            style: Style {
                font_size: Some(title.font_size),
                font_weight: Some(700),
                line_height: Some(title.line_height),
                letter_spacing: title.letter_spacing,
                ..Style::default()
            },
            children: vec![Node::Text(title.text)],
        });

        let excerpt_node = Node::Element(Element {
            tag: "div".to_string(),
            style: Style {
                font_size: Some(excerpt.font_size),
                font_family: Some("Inter".to_string()),
                font_weight: Some(400),
                line_height: Some(excerpt.line_height),
                color: Some("rgba(17,17,17,0.78)".to_string()),
                max_width: Some(820.0),
                ..Style::default()
            },
            children: vec![Node::Text(excerpt.text)],
        });

        let content = Node::Element(Element {
            tag: "div".to_string(),
            style: Style {
                direction: Some(Direction::Column),
                gap: Some(24.0),
                max_width: Some(920.0),
                ..Style::default()
            },
            children: vec![title_node, excerpt_node],
        });

        let accent_bar = Node::Element(Element {
            tag: "div".to_string(),
            style: Style {
                width: Some(160.0),
                height: Some(6.0),
                background: Some(Background::Solid("#ffb700".to_string())),
                border_radius: Some(999.0),
                ..Style::default()
            },
            children: Vec::new(),
        });

        let wordmark = Node::Element(Element {
            tag: "div".to_string(),
            style: Style {
                font_family: Some("Inter".to_string()),
                font_weight: Some(500),
                font_size: Some(28.0),
                color: Some("#d97706".to_string()),
                letter_spacing: Some(7.0),
                uppercase: true,
                ..Style::default()
            },
            children: vec![Node::Text(self.brand.clone())],
        });

        let footer = Node::Element(Element {
            tag: "div".to_string(),
            style: Style {
                direction: Some(Direction::Row),
                justify: Some(Justify::SpaceBetween),
                align: Some(Align::Center),
                ..Style::default()
            },
            children: vec![accent_bar, wordmark],
        });

        let root = Node::Element(Element {
            tag: "div".to_string(),
            style: Style {
                width: Some(self.width),
                height: Some(self.height),
                direction: Some(Direction::Column),
                justify: Some(Justify::SpaceBetween),
                padding: Some((72.0, 80.0)),
                background: Some(Background::LinearGradient {
                    angle: 135.0,
                    from: "#fff9c4".to_string(),
                    to: "#ffd166".to_string(),
                }),
                color: Some("#111111".to_string()),
                font_family: Some("Lexend".to_string()),
                ..Style::default()
            },
            children: vec![content, footer],
        });

        // The fitter already trims, but an all-whitespace excerpt still
        // yields an empty text node that must not reach the engine
        sanitize(root).unwrap_or_else(|| Node::Element(Element::new("div")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> CardTemplate {
        CardTemplate::new(1200, 630, "Subspace")
    }

    fn post() -> PostCard {
        PostCard::new("a", "Hello World", "A short post.")
    }

    #[test]
    fn test_build_contains_title_and_excerpt() {
        let tree = card().build(&post());
        let texts = collect_texts(&tree);
        assert!(texts.contains(&"Hello World".to_string()));
        assert!(texts.contains(&"A short post.".to_string()));
        assert!(texts.contains(&"Subspace".to_string()));
    }

    #[test]
    fn test_build_drops_empty_excerpt_text() {
        let tree = card().build(&PostCard::new("a", "Title", "   "));
        let texts = collect_texts(&tree);
        assert!(!texts.iter().any(|t| t.trim().is_empty()));
        assert!(texts.contains(&"Title".to_string()));
    }

    #[test]
    fn test_root_canvas_size() {
        let Node::Element(root) = card().build(&post()) else {
            panic!("root must be an element");
        };
        assert_eq!(root.style.width, Some(1200.0));
        assert_eq!(root.style.height, Some(630.0));
    }

    #[test]
    fn test_sanitize_strips_whitespace_nodes() {
        let tree = Node::Element(Element {
            tag: "div".to_string(),
            style: Style::default(),
            children: vec![
                Node::Text("  ".to_string()),
                Node::Text(" kept ".to_string()),
                Node::Element(Element {
                    tag: "div".to_string(),
                    style: Style::default(),
                    children: vec![Node::Text("\n\t".to_string())],
                }),
            ],
        });

        let Some(Node::Element(sanitized)) = sanitize(tree) else {
            panic!("element roots survive");
        };
        assert_eq!(sanitized.children.len(), 2);
        assert_eq!(sanitized.children[0], Node::Text("kept".to_string()));
        let Node::Element(inner) = &sanitized.children[1] else {
            panic!("inner element kept");
        };
        assert!(inner.children.is_empty());
    }

    #[test]
    fn test_sanitize_whitespace_text_root() {
        assert_eq!(sanitize(Node::Text("   ".to_string())), None);
    }

    fn collect_texts(node: &Node) -> Vec<String> {
        match node {
            Node::Text(t) => vec![t.clone()],
            Node::Element(e) => e.children.iter().flat_map(collect_texts).collect(),
        }
    }
}
