use crate::ast::TemplateNode;
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Tag(String),
    Text(String),
    TagEnd(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Initial,
    TagOpen,
    TagName,
    Text,
    TagEnd,
    TagEndName,
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// Splits plain `<tag>text</tag>` markup into tokens. Attributes,
/// self-closing tags and comments are not part of the grammar.
pub fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut state = State::Initial;
    let mut buf = String::new();

    for (offset, c) in src.char_indices() {
        let unexpected = || ParseError::UnexpectedChar { found: c, offset };
        state = match (state, c) {
            (State::Initial, '<') => State::TagOpen,
            (State::Initial, c) => {
                buf.push(c);
                State::Text
            }
            (State::TagOpen, '/') => State::TagEnd,
            (State::TagOpen, c) if c.is_ascii_alphabetic() => {
                buf.push(c);
                State::TagName
            }
            (State::TagName, '>') => {
                tokens.push(Token::Tag(std::mem::take(&mut buf)));
                State::Initial
            }
            (State::TagName, c) if is_name_char(c) => {
                buf.push(c);
                State::TagName
            }
            (State::Text, '<') => {
                tokens.push(Token::Text(std::mem::take(&mut buf)));
                State::TagOpen
            }
            (State::Text, c) => {
                buf.push(c);
                State::Text
            }
            (State::TagEnd, c) if c.is_ascii_alphabetic() => {
                buf.push(c);
                State::TagEndName
            }
            (State::TagEndName, '>') => {
                tokens.push(Token::TagEnd(std::mem::take(&mut buf)));
                State::Initial
            }
            (State::TagEndName, c) if is_name_char(c) => {
                buf.push(c);
                State::TagEndName
            }
            _ => return Err(unexpected()),
        };
    }

    match state {
        State::Initial => {}
        State::Text => tokens.push(Token::Text(buf)),
        _ => return Err(ParseError::UnexpectedEof),
    }
    Ok(tokens)
}

/// Parses markup into a `Root` node. Whitespace-only text between tags is
/// dropped.
pub fn parse(src: &str) -> Result<TemplateNode, ParseError> {
    // (tag, children) per open element; the bottom frame collects the roots
    let mut stack: Vec<(Option<String>, Vec<TemplateNode>)> = vec![(None, Vec::new())];

    for token in tokenize(src)? {
        match token {
            Token::Tag(tag) => stack.push((Some(tag), Vec::new())),
            Token::Text(content) => {
                if content.trim().is_empty() {
                    continue;
                }
                if let Some((_, children)) = stack.last_mut() {
                    children.push(TemplateNode::text(content));
                }
            }
            Token::TagEnd(name) => {
                let Some((Some(tag), children)) = stack.pop() else {
                    return Err(ParseError::UnexpectedClose(name));
                };
                if tag != name {
                    return Err(ParseError::MismatchedTag {
                        expected: tag,
                        found: name,
                    });
                }
                if let Some((_, parent)) = stack.last_mut() {
                    parent.push(TemplateNode::element(tag, children));
                }
            }
        }
    }

    match stack.pop() {
        Some((None, roots)) if stack.is_empty() => Ok(TemplateNode::root(roots)),
        Some((Some(tag), _)) => Err(ParseError::UnclosedTag(tag)),
        _ => Err(ParseError::UnexpectedEof),
    }
}
