//! Structured serialization of a grid model as an indented tag document.
//!
//! The document shape is:
//!
//! ```text
//! <imageinfo>
//!   <cells_x>W</cells_x>
//!   <cells_y>H</cells_y>
//!   <segment x1="1" x2="3" y1="2" y2="2"></segment>
//! </imageinfo>
//! ```
//!
//! There is no XML declaration and no trailing newline. Attribute order on
//! `<segment>` is always `x1, x2, y1, y2`.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::model::{GridModel, Segment};

const INDENT: &str = "  ";

/// Errors that can occur when parsing a serialized grid.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed document: {0}")]
    Malformed(String),

    #[error("missing element <{0}>")]
    MissingElement(&'static str),

    #[error("unexpected element <{0}>")]
    UnexpectedElement(String),

    #[error("segment is missing attribute '{0}'")]
    MissingAttribute(&'static str),

    #[error("invalid number '{value}' for {field}")]
    InvalidNumber { field: String, value: String },

    #[error("segments do not fit a {cells_x}x{cells_y} grid in row order")]
    InvalidLayout { cells_x: u32, cells_y: u32 },
}

/// Serialize a grid model to the tag document.
///
/// Serialization is pure: the same grid always yields the same bytes.
pub fn to_xml(grid: &GridModel) -> String {
    let mut out = String::with_capacity(64 + grid.segments().len() * 56);
    out.push_str("<imageinfo>\n");
    out.push_str(&format!("{INDENT}<cells_x>{}</cells_x>\n", grid.cells_x()));
    out.push_str(&format!("{INDENT}<cells_y>{}</cells_y>\n", grid.cells_y()));
    for s in grid.segments() {
        out.push_str(&format!(
            "{INDENT}<segment x1=\"{}\" x2=\"{}\" y1=\"{}\" y2=\"{}\"></segment>\n",
            s.x1, s.x2, s.y1, s.y2
        ));
    }
    out.push_str("</imageinfo>");
    out
}

/// Child of `<imageinfo>` currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Child {
    CellsX,
    CellsY,
    Segment,
}

/// Parse a tag document back into a grid model.
///
/// Segments must fit the declared dimensions and appear in strictly
/// increasing row order. Unknown segment attributes are ignored.
pub fn from_xml(input: &str) -> Result<GridModel, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut in_root = false;
    let mut open: Option<Child> = None;
    let mut cells_x = None;
    let mut cells_y = None;
    let mut seen_x = false;
    let mut seen_y = false;
    let mut segments = Vec::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| XmlError::Malformed(e.to_string()))?;

        match event {
            // Children of <imageinfo> do not nest.
            Event::Start(e) if open.is_some() => return Err(unexpected(e.name().as_ref())),
            Event::Empty(e) if open.is_some() => return Err(unexpected(e.name().as_ref())),
            Event::Start(e) => match e.name().as_ref() {
                b"imageinfo" if !in_root => in_root = true,
                b"cells_x" if in_root && !seen_x => {
                    seen_x = true;
                    open = Some(Child::CellsX);
                }
                b"cells_y" if in_root && !seen_y => {
                    seen_y = true;
                    open = Some(Child::CellsY);
                }
                b"segment" if in_root => {
                    segments.push(parse_segment(&e)?);
                    open = Some(Child::Segment);
                }
                other => return Err(unexpected(other)),
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"segment" if in_root => segments.push(parse_segment(&e)?),
                other => return Err(unexpected(other)),
            },
            Event::Text(t) => {
                let text = std::str::from_utf8(&t)
                    .map_err(|e| XmlError::Malformed(e.to_string()))?;
                match open {
                    Some(Child::CellsX) => cells_x = Some(parse_number("cells_x", text)?),
                    Some(Child::CellsY) => cells_y = Some(parse_number("cells_y", text)?),
                    _ => {}
                }
            }
            Event::End(e) => {
                if open.take().is_none() && e.name().as_ref() == b"imageinfo" {
                    break;
                }
            }
            Event::Eof => {
                return Err(if in_root {
                    XmlError::Malformed("unexpected end of document".to_string())
                } else {
                    XmlError::MissingElement("imageinfo")
                });
            }
            _ => {}
        }
    }

    let cells_x = cells_x.ok_or(XmlError::MissingElement("cells_x"))?;
    let cells_y = cells_y.ok_or(XmlError::MissingElement("cells_y"))?;

    GridModel::from_segments(cells_x, cells_y, segments)
        .ok_or(XmlError::InvalidLayout { cells_x, cells_y })
}

fn unexpected(name: &[u8]) -> XmlError {
    XmlError::UnexpectedElement(String::from_utf8_lossy(name).into_owned())
}

fn parse_number(field: &str, value: &str) -> Result<u32, XmlError> {
    value.trim().parse().map_err(|_| XmlError::InvalidNumber {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_segment(element: &BytesStart<'_>) -> Result<Segment, XmlError> {
    let mut x1 = None;
    let mut x2 = None;
    let mut y1 = None;
    let mut y2 = None;

    for attr in element.attributes() {
        let attr = attr.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = attr.key.as_ref();
        let slot = match key {
            b"x1" => &mut x1,
            b"x2" => &mut x2,
            b"y1" => &mut y1,
            b"y2" => &mut y2,
            _ => continue,
        };
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| XmlError::Malformed(e.to_string()))?;
        *slot = Some(parse_number(&String::from_utf8_lossy(key), value)?);
    }

    Ok(Segment {
        x1: x1.ok_or(XmlError::MissingAttribute("x1"))?,
        x2: x2.ok_or(XmlError::MissingAttribute("x2"))?,
        y1: y1.ok_or(XmlError::MissingAttribute("y1"))?,
        y2: y2.ok_or(XmlError::MissingAttribute("y2"))?,
    })
}
