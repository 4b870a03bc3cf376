#![forbid(unsafe_code)]

mod cats;
mod missions;
mod targets;
