pub mod basic;
pub mod date;
pub mod decimal;
pub mod rw;
pub mod sys;

pub mod os;
