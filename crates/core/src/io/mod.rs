//! I/O for the ESRI ASCII grid format

mod ascii;

pub use ascii::{
    parse_ascii_grid, read_ascii_grid, to_ascii_grid, write_ascii_grid, AsciiGridOptions,
    AsciiHeader,
};
