// Plain string errors, for the outer layers which only ever report them.
pub type SError = String;
