use anyhow::anyhow;
use log::warn;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while_m_n};
use nom::character::complete::{alpha1, multispace0};
use nom::combinator::{all_consuming, map, map_res};
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};
use std::fmt::{self, Display};

/// An opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);
    pub const BLACK: Color = Color(0, 0, 0);
    pub const DIM_GRAY: Color = Color(105, 105, 105);
    pub const DARK_SLATE_GRAY: Color = Color(47, 79, 79);

    /// Parses `#rgb`, `#rrggbb` or a CSS color keyword.
    pub fn parse(text: &str) -> anyhow::Result<Self> {
        match all_consuming(delimited(multispace0, color, multispace0)).parse(text) {
            Ok((_, color)) => Ok(color),
            Err(e) => {
                warn!("Failed to parse color {text:?}: {e:?}");
                Err(anyhow!("Failed to parse color {text:?}: {e:?}"))
            }
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Linear blend of two colors in RGB space, clamped to the end points.
pub fn interpolate(color1: Color, color2: Color, start: f64, end: f64, value: f64) -> Color {
    let x = (value - start) / (end - start);
    if x.is_nan() || x <= 0.0 {
        color1
    } else if x >= 1.0 {
        color2
    } else {
        let channel = |a: u8, b: u8| (a as f64 * (1.0 - x) + b as f64 * x).round() as u8;
        Color(
            channel(color1.0, color2.0),
            channel(color1.1, color2.1),
            channel(color1.2, color2.2),
        )
    }
}

fn color(i: &str) -> IResult<&str, Color> {
    alt((preceded(tag("#"), alt((long_hex, short_hex))), keyword)).parse(i)
}

fn long_hex(i: &str) -> IResult<&str, Color> {
    map((hex_byte, hex_byte, hex_byte), |(r, g, b)| Color(r, g, b)).parse(i)
}

fn short_hex(i: &str) -> IResult<&str, Color> {
    map((hex_digit, hex_digit, hex_digit), |(r, g, b)| {
        Color(r * 17, g * 17, b * 17)
    })
    .parse(i)
}

fn hex_byte(i: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()), |s| {
        u8::from_str_radix(s, 16)
    })
    .parse(i)
}

fn hex_digit(i: &str) -> IResult<&str, u8> {
    map_res(take_while_m_n(1, 1, |c: char| c.is_ascii_hexdigit()), |s| {
        u8::from_str_radix(s, 16)
    })
    .parse(i)
}

fn keyword(i: &str) -> IResult<&str, Color> {
    map_res(alpha1, |s: &str| match s.to_ascii_lowercase().as_str() {
        "black" => Ok(Color::BLACK),
        "white" => Ok(Color::WHITE),
        "red" => Ok(Color(255, 0, 0)),
        "green" => Ok(Color(0, 128, 0)),
        "blue" => Ok(Color(0, 0, 255)),
        "orange" => Ok(Color(255, 165, 0)),
        "gray" | "grey" => Ok(Color(128, 128, 128)),
        "dimgray" | "dimgrey" => Ok(Color::DIM_GRAY),
        "darkslategray" | "darkslategrey" => Ok(Color::DARK_SLATE_GRAY),
        "steelblue" => Ok(Color(70, 130, 180)),
        _ => Err(format!("Unknown color keyword: {s}")),
    })
    .parse(i)
}
