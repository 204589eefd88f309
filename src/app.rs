pub mod approot;
pub mod outfmt;
