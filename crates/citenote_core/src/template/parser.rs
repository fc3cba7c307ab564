/*
SPDX-License-Identifier: MPL-2.0
SPDX-FileCopyrightText: © 2023-2026 Bruce D'Arcus
*/

//! Template source → node tree.
//!
//! Parsing happens in three passes: the source is split into text and tag
//! tokens (tags are parsed with winnow), block tags that sit alone on a line
//! have that line removed, and the token stream is folded into nested blocks.

use super::{Block, BlockKind, Node, Path, TemplateError};
use winnow::ascii::{multispace0, multispace1};
use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_until, take_while};

type PResult<T> = Result<T, ErrMode<ContextError>>;

#[derive(Debug, Clone, PartialEq)]
enum Token<'s> {
    Text(String),
    Variable(&'s str),
    Open { helper: &'s str, arg: Option<&'s str> },
    Close(&'s str),
    Else,
    Comment,
}

impl Token<'_> {
    /// Tags that produce no output of their own and may occupy a whole line.
    fn may_stand_alone(&self) -> bool {
        matches!(
            self,
            Token::Open { .. } | Token::Close(_) | Token::Else | Token::Comment
        )
    }
}

/// Parse a template source into its node tree.
pub(super) fn parse(source: &str) -> Result<Vec<Node>, TemplateError> {
    let mut tokens = tokenize(source)?;
    strip_standalone_lines(&mut tokens);
    build(tokens)
}

fn path_token<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '@' | '$')
    })
    .parse_next(input)
}

fn helper_name<'s>(input: &mut &'s str) -> PResult<&'s str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_').parse_next(input)
}

fn comment<'s>(input: &mut &'s str) -> PResult<Token<'s>> {
    alt((
        delimited("{{!--", take_until(0.., "--}}"), "--}}"),
        delimited("{{!", take_until(0.., "}}"), "}}"),
    ))
    .value(Token::Comment)
    .parse_next(input)
}

fn raw_variable<'s>(input: &mut &'s str) -> PResult<Token<'s>> {
    delimited(("{{{", multispace0), path_token, (multispace0, "}}}"))
        .map(Token::Variable)
        .parse_next(input)
}

fn block_open<'s>(input: &mut &'s str) -> PResult<Token<'s>> {
    (
        ("{{", multispace0, '#', multispace0),
        helper_name,
        opt(preceded(multispace1, path_token)),
        (multispace0, "}}"),
    )
        .map(|(_, helper, arg, _)| Token::Open { helper, arg })
        .parse_next(input)
}

fn block_close<'s>(input: &mut &'s str) -> PResult<Token<'s>> {
    delimited(
        ("{{", multispace0, '/', multispace0),
        helper_name,
        (multispace0, "}}"),
    )
    .map(Token::Close)
    .parse_next(input)
}

fn else_tag<'s>(input: &mut &'s str) -> PResult<Token<'s>> {
    ("{{", multispace0, "else", multispace0, "}}")
        .value(Token::Else)
        .parse_next(input)
}

fn variable<'s>(input: &mut &'s str) -> PResult<Token<'s>> {
    delimited(("{{", multispace0), path_token, (multispace0, "}}"))
        .map(Token::Variable)
        .parse_next(input)
}

fn tag<'s>(input: &mut &'s str) -> PResult<Token<'s>> {
    alt((comment, raw_variable, block_open, block_close, else_tag, variable)).parse_next(input)
}

fn push_text(tokens: &mut Vec<(usize, Token<'_>)>, offset: usize, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some((_, Token::Text(previous))) = tokens.last_mut() {
        previous.push_str(text);
    } else {
        tokens.push((offset, Token::Text(text.to_string())));
    }
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token<'_>)>, TemplateError> {
    let mut input = source;
    let mut tokens = Vec::new();

    while !input.is_empty() {
        let offset = source.len() - input.len();

        if input.starts_with("{{") {
            let token = tag
                .parse_next(&mut input)
                .map_err(|_| malformed_tag(&source[offset..], offset))?;
            tokens.push((offset, token));
            continue;
        }

        let (text, remaining) = match input.find("{{") {
            Some(at) => input.split_at(at),
            None => (input, ""),
        };
        input = remaining;

        // `\{{` is a literal opening brace pair; `\\{{` is a backslash
        // followed by a tag.
        if !input.is_empty() {
            if let Some(kept) = text.strip_suffix("\\\\") {
                push_text(&mut tokens, offset, kept);
                push_text(&mut tokens, offset + kept.len(), "\\");
                continue;
            }
        }
        match text.strip_suffix('\\') {
            Some(escaped) if !input.is_empty() => {
                push_text(&mut tokens, offset, escaped);
                push_text(&mut tokens, offset + escaped.len(), "{{");
                input = &input[2..];
            }
            _ => push_text(&mut tokens, offset, text),
        }
    }

    Ok(tokens)
}

fn malformed_tag(rest: &str, offset: usize) -> TemplateError {
    let message = match rest.find("}}") {
        None => "unclosed '{{' tag".to_string(),
        Some(end) => format!("unsupported tag '{}'", &rest[..end + 2]),
    };
    TemplateError::syntax(offset, message)
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t')
}

fn starts_line(tokens: &[(usize, Token<'_>)], i: usize) -> bool {
    if i == 0 {
        return true;
    }
    match &tokens[i - 1].1 {
        Token::Text(text) => match text.rfind('\n') {
            Some(nl) => is_blank(&text[nl + 1..]),
            None => i == 1 && is_blank(text),
        },
        _ => false,
    }
}

fn ends_line(tokens: &[(usize, Token<'_>)], i: usize) -> bool {
    if i + 1 == tokens.len() {
        return true;
    }
    match &tokens[i + 1].1 {
        Token::Text(text) => match text.find('\n') {
            Some(nl) => is_blank(text[..nl].trim_end_matches('\r')),
            None => i + 2 == tokens.len() && is_blank(text),
        },
        _ => false,
    }
}

/// Remove the surrounding whitespace and line break of block tags that are
/// the only thing on their line, so they leave no blank line behind.
fn strip_standalone_lines(tokens: &mut [(usize, Token<'_>)]) {
    let standalone: Vec<bool> = (0..tokens.len())
        .map(|i| tokens[i].1.may_stand_alone() && starts_line(tokens, i) && ends_line(tokens, i))
        .collect();

    for (i, alone) in standalone.into_iter().enumerate() {
        if !alone {
            continue;
        }
        if i > 0 {
            if let Token::Text(text) = &mut tokens[i - 1].1 {
                let keep = text.trim_end_matches([' ', '\t']).len();
                text.truncate(keep);
            }
        }
        if let Some((_, Token::Text(text))) = tokens.get_mut(i + 1) {
            match text.find('\n') {
                Some(nl) => {
                    text.drain(..=nl);
                }
                None => text.clear(),
            }
        }
    }
}

struct OpenBlock<'s> {
    helper: &'s str,
    offset: usize,
    kind: BlockKind,
    path: Path,
    body: Vec<Node>,
    inverse: Option<Vec<Node>>,
}

fn current<'a>(root: &'a mut Vec<Node>, stack: &'a mut [OpenBlock<'_>]) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(OpenBlock {
            inverse: Some(inverse),
            ..
        }) => inverse,
        Some(block) => &mut block.body,
        None => root,
    }
}

fn build(tokens: Vec<(usize, Token<'_>)>) -> Result<Vec<Node>, TemplateError> {
    let mut root = Vec::new();
    let mut stack: Vec<OpenBlock<'_>> = Vec::new();

    for (offset, token) in tokens {
        match token {
            Token::Text(text) => {
                if !text.is_empty() {
                    current(&mut root, &mut stack).push(Node::Text(text));
                }
            }
            Token::Comment => {}
            Token::Variable(path) => {
                let path = Path::parse(path).map_err(|m| TemplateError::syntax(offset, m))?;
                current(&mut root, &mut stack).push(Node::Variable(path));
            }
            Token::Open { helper, arg } => {
                let kind = BlockKind::from_helper(helper).ok_or_else(|| {
                    TemplateError::syntax(offset, format!("unknown block helper '#{}'", helper))
                })?;
                let arg = arg.ok_or_else(|| {
                    TemplateError::syntax(offset, format!("'#{}' needs a field to test", helper))
                })?;
                let path = Path::parse(arg).map_err(|m| TemplateError::syntax(offset, m))?;
                stack.push(OpenBlock {
                    helper,
                    offset,
                    kind,
                    path,
                    body: Vec::new(),
                    inverse: None,
                });
            }
            Token::Else => match stack.last_mut() {
                None => {
                    return Err(TemplateError::syntax(offset, "'else' outside of a block"));
                }
                Some(block) if block.inverse.is_some() => {
                    return Err(TemplateError::syntax(
                        offset,
                        format!("second 'else' in '#{}' block", block.helper),
                    ));
                }
                Some(block) => block.inverse = Some(Vec::new()),
            },
            Token::Close(name) => {
                let block = stack.pop().ok_or_else(|| {
                    TemplateError::syntax(offset, format!("'/{}' closes no open block", name))
                })?;
                if block.helper != name {
                    return Err(TemplateError::syntax(
                        offset,
                        format!("'/{}' does not close '#{}'", name, block.helper),
                    ));
                }
                let node = Node::Block(Block {
                    kind: block.kind,
                    path: block.path,
                    body: block.body,
                    inverse: block.inverse.unwrap_or_default(),
                });
                current(&mut root, &mut stack).push(node);
            }
        }
    }

    match stack.pop() {
        Some(block) => Err(TemplateError::syntax(
            block.offset,
            format!("'#{}' block is never closed", block.helper),
        )),
        None => Ok(root),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(source: &str) -> Vec<Token<'_>> {
        let mut tokens = tokenize(source).unwrap();
        strip_standalone_lines(&mut tokens);
        tokens.into_iter().map(|(_, t)| t).collect()
    }

    #[test]
    fn test_tokenize_tags() {
        let tokens: Vec<_> = tokenize("a {{ title }} {{#if year}}{{year}}{{else}}n.d.{{/if}}")
            .unwrap()
            .into_iter()
            .map(|(_, t)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                Token::Text("a ".to_string()),
                Token::Variable("title"),
                Token::Text(" ".to_string()),
                Token::Open {
                    helper: "if",
                    arg: Some("year")
                },
                Token::Variable("year"),
                Token::Else,
                Token::Text("n.d.".to_string()),
                Token::Close("if"),
            ]
        );
    }

    #[test]
    fn test_offsets() {
        let tokens = tokenize("ab{{x}}").unwrap();
        assert_eq!(tokens[0].0, 0);
        assert_eq!(tokens[1].0, 2);
    }

    #[test]
    fn test_comments_and_raw() {
        let tokens = texts("{{! note }}{{!-- has }} inside --}}{{{title}}}");
        assert_eq!(
            tokens,
            vec![Token::Comment, Token::Comment, Token::Variable("title")]
        );
    }

    #[test]
    fn test_escaped_backslash_before_tag() {
        assert_eq!(
            texts(r"a\\{{citekey}}"),
            vec![Token::Text(r"a\".to_string()), Token::Variable("citekey")]
        );
        assert_eq!(
            parse(r"\\{{x}}").unwrap(),
            vec![
                Node::Text(r"\".to_string()),
                Node::Variable(Path::parse("x").unwrap())
            ]
        );
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(
            texts(r"\{{citekey}}"),
            vec![Token::Text("{{citekey}}".to_string())]
        );
    }

    #[test]
    fn test_standalone_lines_removed() {
        let tokens = texts("list:\n  {{#each authors}}\n- x\n  {{/each}}\nend");
        assert_eq!(
            tokens,
            vec![
                Token::Text("list:\n".to_string()),
                Token::Open {
                    helper: "each",
                    arg: Some("authors")
                },
                Token::Text("- x\n".to_string()),
                Token::Close("each"),
                Token::Text("end".to_string()),
            ]
        );
    }

    #[test]
    fn test_inline_blocks_keep_whitespace() {
        let tokens = texts("a {{#if x}} b {{/if}} c");
        assert_eq!(tokens[0], Token::Text("a ".to_string()));
        assert_eq!(tokens[2], Token::Text(" b ".to_string()));
        assert_eq!(tokens[4], Token::Text(" c".to_string()));
    }

    #[test]
    fn test_malformed_tags() {
        let err = tokenize("x {{lookup a b}}").unwrap_err();
        assert_eq!(
            err,
            TemplateError::syntax(2, "unsupported tag '{{lookup a b}}'")
        );
        let err = tokenize("{{title").unwrap_err();
        assert_eq!(err, TemplateError::syntax(0, "unclosed '{{' tag"));
    }

    #[test]
    fn test_block_errors() {
        assert!(parse("{{#loop items}}{{/loop}}").is_err());
        assert!(parse("{{#if}}{{/if}}").is_err());
        assert!(parse("{{#if a}}").is_err());
        assert!(parse("{{/if}}").is_err());
        assert!(parse("{{#if a}}{{/each}}").is_err());
        assert!(parse("{{else}}").is_err());
        assert!(parse("{{#if a}}{{else}}{{else}}{{/if}}").is_err());
    }
}
