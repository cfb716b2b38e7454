
use crate::format::{FormatSpec, Symbolic, Picture, Style, SignFlag, Marker};

mod nc {
    pub use nom::{
        combinator::*,
        multi::*,
        sequence::*,
        branch::*,
        character::complete::*,
    };
}

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;
pub type Error<'a> = nom_greedyerror::GreedyError<Span<'a>, nom::error::ErrorKind>;
pub type Parsed<'a, T> = nom::IResult<Span<'a>, T, Error<'a>>;

/// A numeric literal as accepted by the VALUE builtin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericLiteral {
    Integer(i64),
    Real(f64),
}

// main

pub fn parse_format(input: &str) -> Result<FormatSpec, String> {
    let input = Span::new(input);
    match format_spec(input) {
        Ok((_, spec)) =>
            Ok(spec),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) =>
            Err(nom_greedyerror::convert_error(input, err)),
        Err(nom::Err::Incomplete(_)) =>
            Err("unexpected end of format string".into()),
    }
}

pub fn parse_numeric_literal(input: &str) -> Option<NumericLiteral> {
    let input = Span::new(input);
    numeric_literal(input).ok().map(|(_, literal)| literal)
}

fn format_spec(input: Span<'_>) -> Parsed<'_, FormatSpec> {
    nc::complete(nc::all_consuming(
        nc::alt((
            nc::map(symbolic, FormatSpec::Symbolic),
            nc::map(picture, FormatSpec::Picture),
        )),
    ))(input)
}

fn numeric_literal(input: Span<'_>) -> Parsed<'_, NumericLiteral> {
    nc::complete(nc::all_consuming(
        nc::delimited(
            nc::multispace0,
            nc::alt((
                nc::map(real, NumericLiteral::Real),
                nc::map(int, NumericLiteral::Integer),
            )),
            nc::multispace0,
        ),
    ))(input)
}

// symbolic

fn count(input: Span<'_>) -> Parsed<'_, usize> {
    nc::map_opt(nc::digit1, |span: Span<'_>| span.fragment().parse().ok())(input)
}

fn sign_flag(input: Span<'_>) -> Parsed<'_, SignFlag> {
    nc::alt((
        nc::value(SignFlag::Always, nc::char('+')),
        nc::value(SignFlag::Negative, nc::char('-')),
    ))(input)
}

fn width(input: Span<'_>) -> Parsed<'_, (bool, usize)> {
    nc::alt((
        nc::map(nc::preceded(nc::char('0'), count), |width| (true, width)),
        nc::map(count, |width| (false, width)),
    ))(input)
}

fn style(input: Span<'_>) -> Parsed<'_, Style> {
    nc::alt((
        nc::value(Style::Integer, nc::one_of("Ii")),
        nc::value(Style::Fixed, nc::one_of("Ff")),
        nc::value(Style::Exponent, nc::one_of("Ee")),
    ))(input)
}

fn symbolic(input: Span<'_>) -> Parsed<'_, Symbolic> {
    nc::map(
        nc::tuple((
            nc::opt(sign_flag),
            width,
            nc::opt(nc::preceded(nc::char('.'), count)),
            style,
        )),
        |(sign, (zero_pad, width), decimals, style)| Symbolic {
            sign: sign.unwrap_or(SignFlag::Negative),
            zero_pad,
            width,
            decimals,
            style,
        },
    )(input)
}

// picture

fn slots(input: Span<'_>) -> Parsed<'_, usize> {
    nc::many1_count(nc::char('#'))(input)
}

fn picture_body(input: Span<'_>) -> Parsed<'_, (usize, Option<(char, usize)>)> {
    nc::pair(
        slots,
        nc::opt(nc::pair(nc::one_of(".,"), nc::cut(slots))),
    )(input)
}

fn picture(input: Span<'_>) -> Parsed<'_, Picture> {
    let build = |marker| move |(integer_slots, fraction): (usize, Option<(char, usize)>)| Picture {
        marker,
        integer_slots,
        separator: fraction.map(|(separator, _)| separator),
        fraction_slots: fraction.map(|(_, slots)| slots).unwrap_or(0),
    };
    nc::alt((
        nc::map(
            nc::preceded(nc::char('('), nc::cut(nc::terminated(picture_body, nc::char(')')))),
            build(Marker::Parentheses),
        ),
        nc::map(nc::preceded(nc::char('+'), picture_body), build(Marker::Plus)),
        nc::map(nc::preceded(nc::char('-'), picture_body), build(Marker::Minus)),
        nc::map(picture_body, build(Marker::None)),
    ))(input)
}

// literals

fn sign(input: Span<'_>) -> Parsed<'_, char> {
    nc::one_of("+-")(input)
}

fn int(input: Span<'_>) -> Parsed<'_, i64> {
    nc::map_opt(
        nc::recognize(nc::pair(nc::opt(sign), nc::digit1)),
        |span: Span<'_>| span.fragment().parse().ok(),
    )(input)
}

fn real(input: Span<'_>) -> Parsed<'_, f64> {
    nc::map_opt(
        nc::recognize(nc::tuple((
            nc::opt(sign),
            nc::digit1,
            nc::char('.'),
            nc::opt(nc::digit1),
            nc::opt(nc::tuple((
                nc::one_of("eE"),
                nc::opt(sign),
                nc::digit1,
            ))),
        ))),
        |span: Span<'_>| span.fragment().parse().ok(),
    )(input)
}
