//! Tolerant parser for the inline HTML the editor stores in paragraph blocks.
//!
//! Only the top level of the markup tree carries style: a text node is
//! `Normal`, a `<b>`/`<strong>` element is `Bold`, an `<i>`/`<em>` element is
//! `Italic`. Nested markup collapses to the text content of its outermost
//! element, and elements of any other kind are dropped together with their text.

use folio_types::{RunStyle, StyledRun};
use nom::branch::alt;
use nom::bytes::complete::{tag, take_till, take_till1, take_until, take_while, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{map, not, recognize, value};
use nom::sequence::{delimited, terminated};
use nom::{IResult, Parser};

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "wbr", "input", "meta", "link"];

/// A node of the parsed inline markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode<'a> {
    Text(&'a str),
    Element {
        name: String,
        children: Vec<MarkupNode<'a>>,
    },
}

impl MarkupNode<'_> {
    /// Concatenated, entity-decoded text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            MarkupNode::Text(text) => out.push_str(&decode_entities(text)),
            MarkupNode::Element { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
        }
    }

    fn style(&self) -> Option<RunStyle> {
        match self {
            MarkupNode::Text(_) => Some(RunStyle::Normal),
            MarkupNode::Element { name, .. } => match name.as_str() {
                "b" | "strong" => Some(RunStyle::Bold),
                "i" | "em" => Some(RunStyle::Italic),
                _ => None,
            },
        }
    }
}

/// Decomposes paragraph markup into a flat, ordered list of styled runs.
pub fn parse_inline_markup(html: &str) -> Vec<StyledRun> {
    parse_markup(html)
        .iter()
        .filter_map(|node| {
            let style = node.style()?;
            Some(StyledRun::new(node.text_content(), style))
        })
        .collect()
}

/// Parses `input` into top-level markup nodes. Never fails: unmatched closing
/// tags are skipped and unclosed elements extend to the end of their parent.
pub fn parse_markup(input: &str) -> Vec<MarkupNode<'_>> {
    let mut out = Vec::new();
    let mut rest = input;
    while !rest.is_empty() {
        if let Ok((remaining, mut parsed)) = nodes(rest) {
            out.append(&mut parsed);
            rest = remaining;
        }
        if rest.is_empty() {
            break;
        }
        rest = match close_tag(rest) {
            Ok((remaining, _)) => remaining,
            Err(_) => {
                out.push(MarkupNode::Text(&rest[..2]));
                &rest[2..]
            }
        };
    }
    out
}

fn nodes(input: &str) -> IResult<&str, Vec<MarkupNode<'_>>> {
    children(input, &[])
}

/// Parses the content of the innermost element in `open`.
///
/// A closing tag for that element is consumed and ends it. A closing tag for
/// an outer element ends it without being consumed. Any other closing tag is
/// skipped.
fn children<'a>(mut input: &'a str, open: &[String]) -> IResult<&'a str, Vec<MarkupNode<'a>>> {
    let mut out = Vec::new();
    loop {
        if let Ok((rest, name)) = close_tag(input) {
            let name = name.to_ascii_lowercase();
            if open.last() == Some(&name) {
                return Ok((rest, out));
            }
            if open.contains(&name) {
                return Ok((input, out));
            }
            input = rest;
            continue;
        }
        match node(input, open) {
            Ok((rest, parsed)) => {
                out.extend(parsed);
                input = rest;
            }
            Err(_) => return Ok((input, out)),
        }
    }
}

fn node<'a>(input: &'a str, open: &[String]) -> IResult<&'a str, Option<MarkupNode<'a>>> {
    alt((
        value(None, comment),
        map(take_till1(|c: char| c == '<'), |text| Some(MarkupNode::Text(text))),
        map(|i| element(i, open), Some),
        // A lone '<' that does not start a tag is literal text.
        map(terminated(tag("<"), not(char('/'))), |text| {
            Some(MarkupNode::Text(text))
        }),
    ))
    .parse(input)
}

fn element<'a>(input: &'a str, open: &[String]) -> IResult<&'a str, MarkupNode<'a>> {
    let (rest, (name, self_closing)) = open_tag(input)?;
    let name = name.to_ascii_lowercase();
    if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
        return Ok((
            rest,
            MarkupNode::Element {
                name,
                children: Vec::new(),
            },
        ));
    }
    let mut stack = open.to_vec();
    stack.push(name.clone());
    let (rest, children) = children(rest, &stack)?;
    Ok((rest, MarkupNode::Element { name, children }))
}

fn tag_name(input: &str) -> IResult<&str, &str> {
    recognize((
        take_while1(|c: char| c.is_ascii_alphabetic()),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '-'),
    ))
    .parse(input)
}

fn open_tag(input: &str) -> IResult<&str, (&str, bool)> {
    let (rest, _) = char('<').parse(input)?;
    let (rest, name) = tag_name(rest)?;
    let (rest, attributes) = take_till(|c: char| c == '>').parse(rest)?;
    let (rest, _) = char('>').parse(rest)?;
    Ok((rest, (name, attributes.trim_end().ends_with('/'))))
}

fn close_tag(input: &str) -> IResult<&str, &str> {
    delimited(tag("</"), tag_name, (multispace0, char('>'))).parse(input)
}

fn comment(input: &str) -> IResult<&str, &str> {
    recognize((tag("<!--"), take_until("-->"), tag("-->"))).parse(input)
}

/// Replaces HTML character references with the characters they denote.
/// Unknown or malformed references are kept verbatim.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|c| (c, end)));
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{A0}'),
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse().ok()?,
            };
            char::from_u32(code)
        }
    }
}
