//! Minimal SVG document builder
//!
//! Documents are assembled from a handful of layout primitives and turned
//! into text by a single [`SvgDocument::serialize`] call. Serialisation is
//! deterministic: the same primitives always produce the same bytes.

use std::fmt::Write;

/// Horizontal anchoring of a text element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    End,
}

impl TextAnchor {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

/// A text element
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub x: f64,
    pub y: f64,
    pub content: String,
    pub font_size: u32,
    pub font_weight: FontWeight,
    pub fill: String,
    pub anchor: Option<TextAnchor>,
}

impl Text {
    pub fn new(x: f64, y: f64, content: impl Into<String>) -> Self {
        Self {
            x,
            y,
            content: content.into(),
            font_size: 10,
            font_weight: FontWeight::Normal,
            fill: "black".to_string(),
            anchor: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = FontWeight::Bold;
        self
    }

    pub fn fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = fill.into();
        self
    }

    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = Some(anchor);
        self
    }
}

/// A layout primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(Text),
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
    },
    Group(Vec<Element>),
}

impl From<Text> for Element {
    fn from(text: Text) -> Self {
        Element::Text(text)
    }
}

/// An SVG document with a solid background
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    width: u32,
    height: u32,
    background: String,
    elements: Vec<Element>,
}

impl SvgDocument {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: "white".to_string(),
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: impl Into<Element>) -> &mut Self {
        self.elements.push(element.into());
        self
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        let _ = writeln!(
            out,
            "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">",
            self.width, self.height
        );
        let _ = writeln!(
            out,
            "  <rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            escape(&self.background)
        );
        for element in &self.elements {
            write_element(&mut out, element, 1);
        }
        out.push_str("</svg>\n");
        out
    }
}

fn write_element(out: &mut String, element: &Element, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        Element::Text(text) => {
            let _ = write!(
                out,
                "{indent}<text x=\"{}\" y=\"{}\" font-family=\"Arial\" font-size=\"{}\" font-weight=\"{}\" fill=\"{}\"",
                text.x,
                text.y,
                text.font_size,
                text.font_weight.as_str(),
                escape(&text.fill)
            );
            if let Some(anchor) = text.anchor {
                let _ = write!(out, " text-anchor=\"{}\"", anchor.as_str());
            }
            let _ = writeln!(out, ">{}</text>", escape(&text.content));
        }
        Element::Rect {
            x,
            y,
            width,
            height,
            fill,
        } => {
            let _ = writeln!(
                out,
                "{indent}<rect x=\"{x}\" y=\"{y}\" width=\"{width}\" height=\"{height}\" fill=\"{}\"/>",
                escape(fill)
            );
        }
        Element::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
        } => {
            let _ = writeln!(
                out,
                "{indent}<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\" stroke=\"{}\" stroke-width=\"{stroke_width}\"/>",
                escape(stroke)
            );
        }
        Element::Group(children) => {
            let _ = writeln!(out, "{indent}<g>");
            for child in children {
                write_element(out, child, depth + 1);
            }
            let _ = writeln!(out, "{indent}</g>");
        }
    }
}

/// Escape text for use in XML content and attribute values
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
