pub mod interpolation;
pub mod parse;

pub use interpolation::{Token, has_interpolation, interpolate_with, tokenize};
pub use parse::{ParseError, parse_fragment, parse_template};
