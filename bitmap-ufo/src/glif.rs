//! Serializing glyph outlines as UFO `.glif` documents (format 2)

use std::fmt::Write;

use kurbo::{Point, Rect};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// The contents of one `.glif` file.
#[derive(Clone, Debug, PartialEq)]
pub struct GlifDocument<'a> {
    pub name: &'a str,
    pub unicode: Option<char>,
    pub advance: i32,
    /// One closed contour per rectangle.
    pub contours: &'a [Rect],
}

impl GlifDocument<'_> {
    pub fn to_xml(&self) -> String {
        let mut out = String::from(XML_DECLARATION);
        // writing to a String cannot fail
        let _ = write!(out, r#"<glyph name="{}" format="2">"#, escape(self.name));
        if let Some(ch) = self.unicode {
            let _ = write!(out, r#"<unicode hex="{:X}" />"#, ch as u32);
        }
        let _ = write!(out, r#"<advance width="{}" />"#, self.advance);
        out.push_str("<outline>");
        for rect in self.contours {
            out.push_str("<contour>");
            for point in corners(rect) {
                let _ = write!(
                    out,
                    r#"<point x="{}" y="{}" type="line" />"#,
                    point.x, point.y
                );
            }
            out.push_str("</contour>");
        }
        out.push_str("</outline></glyph>");
        out
    }
}

/// The corners of `rect` in contour order: up the left edge, across the top,
/// down the right edge.
pub fn corners(rect: &Rect) -> [Point; 4] {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x1, rect.y0),
    ]
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            // not representable in XML 1.0, even as a character reference
            c if c.is_control() => out.push('_'),
            c => out.push(c),
        }
    }
    out
}
