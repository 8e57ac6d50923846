use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use super::SnbtError;
use super::lexer::Token;
use crate::tag::Tag;

type Span = SimpleSpan;

/// Build the SNBT value parser.
fn value_parser<'a, I>() -> impl Parser<'a, I, Tag, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    recursive(|value| {
        let word = select! { Token::Word(w) => w }.labelled("value");
        let string = select! { Token::Str(s) => s }.labelled("string");

        let key = choice((string, word)).labelled("key");
        let entry = key.then_ignore(just(Token::Colon)).then(value.clone());
        let compound = entry
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<(String, Tag)>>()
            .delimited_by(just(Token::LBrace), just(Token::RBrace))
            .map(|entries| Tag::Compound(entries.into_iter().collect()))
            .labelled("compound");

        let array_kind = select! {
            Token::Word(ref w) if matches!(w.as_str(), "B" | "I" | "L") => w.clone()
        };
        let array = array_kind
            .then_ignore(just(Token::Semicolon))
            .then(
                word.separated_by(just(Token::Comma))
                    .allow_trailing()
                    .collect::<Vec<String>>(),
            )
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .try_map(|(kind, items), span| {
                array_from_words(&kind, &items).map_err(|msg| Rich::custom(span, msg))
            })
            .labelled("array");

        let list = value
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<Tag>>()
            .delimited_by(just(Token::LBracket), just(Token::RBracket))
            .map(Tag::List)
            .labelled("list");

        choice((
            compound,
            array,
            list,
            string.map(Tag::String),
            word.map(|w| scalar_from_word(&w)),
        ))
    })
}

/// Interpret an unquoted word: booleans, suffixed numbers, plain numbers,
/// and finally a bare string.
pub(crate) fn scalar_from_word(word: &str) -> Tag {
    match word {
        "true" => return Tag::Byte(1),
        "false" => return Tag::Byte(0),
        _ => {}
    }

    if let Some((body, suffix)) = split_suffix(word) {
        let parsed = match suffix {
            'b' | 'B' => body.parse().ok().map(Tag::Byte),
            's' | 'S' => body.parse().ok().map(Tag::Short),
            'l' | 'L' => body.parse().ok().map(Tag::Long),
            'f' | 'F' => body.parse().ok().map(Tag::Float),
            'd' | 'D' => body.parse().ok().map(Tag::Double),
            _ => None,
        };
        if let Some(tag) = parsed {
            return tag;
        }
    }

    if let Ok(v) = word.parse::<i32>() {
        return Tag::Int(v);
    }
    if word.contains(['.', 'e', 'E']) {
        if let Ok(v) = word.parse::<f64>() {
            return Tag::Double(v);
        }
    }
    Tag::String(word.to_string())
}

fn split_suffix(word: &str) -> Option<(&str, char)> {
    let suffix = word.chars().last()?;
    if word.len() < 2 || !suffix.is_ascii_alphabetic() {
        return None;
    }
    Some((&word[..word.len() - 1], suffix))
}

fn array_from_words(kind: &str, items: &[String]) -> Result<Tag, String> {
    let bad = |item: &str| format!("invalid {kind} array element: {item}");
    match kind {
        "B" => items
            .iter()
            .map(|i| match scalar_from_word(i) {
                Tag::Byte(v) => Ok(v),
                _ => Err(bad(i)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Tag::ByteArray),
        "I" => items
            .iter()
            .map(|i| match scalar_from_word(i) {
                Tag::Int(v) => Ok(v),
                _ => Err(bad(i)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Tag::IntArray),
        _ => items
            .iter()
            .map(|i| match scalar_from_word(i) {
                Tag::Long(v) => Ok(v),
                Tag::Int(v) => Ok(i64::from(v)),
                _ => Err(bad(i)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Tag::LongArray),
    }
}

/// Parse a token stream into a single tag. Trailing tokens are an error.
pub fn parse(tokens: &[(Token, std::ops::Range<usize>)]) -> Result<Tag, Vec<SnbtError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: Span = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = value_parser()
        .then_ignore(end())
        .parse(stream)
        .into_output_errors();

    if let Some(tag) = output
        && errors.is_empty()
    {
        return Ok(tag);
    }

    Err(errors
        .into_iter()
        .map(|e| SnbtError {
            span: e.span().into_range(),
            message: e.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snbt::lexer;

    fn parse_source(source: &str) -> Result<Tag, Vec<SnbtError>> {
        let (tokens, errors) = lexer::lex(source);
        assert!(errors.is_empty());
        parse(&tokens)
    }

    #[test]
    fn words_with_letter_suffix_but_no_number_stay_strings() {
        assert_eq!(scalar_from_word("b"), Tag::from("b"));
        assert_eq!(scalar_from_word("north"), Tag::from("north"));
        assert_eq!(scalar_from_word("minecraft.stone"), Tag::from("minecraft.stone"));
    }

    #[test]
    fn integer_overflow_falls_back_to_string() {
        assert_eq!(scalar_from_word("300b"), Tag::from("300b"));
    }

    #[test]
    fn trailing_commas_are_allowed() {
        assert_eq!(
            parse_source("[1,2,]").unwrap(),
            Tag::List(vec![Tag::Int(1), Tag::Int(2)])
        );
    }

    #[test]
    fn list_that_starts_with_array_letter() {
        assert_eq!(
            parse_source("[B, I]").unwrap(),
            Tag::List(vec![Tag::from("B"), Tag::from("I")])
        );
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let errors = parse_source("{} {}").unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn missing_colon_reports_span() {
        let errors = parse_source("{a 1}").unwrap_err();
        assert!(errors.iter().any(|e| e.span.start == 3), "{errors:?}");
    }
}
