pub mod support;

mod index;
mod list;
mod run;
